use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("package '{0}' was not found in the package index")]
    PackageNotFound(String),
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct DependencyEdge {
    pub from: String,
    pub to: String,
}

/// A dependency token that matched neither a package nor a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnresolvedDependency {
    pub package: String,
    pub token: String,
}

/// Edges and visited packages of one closure computation, in discovery order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClosureResult {
    pub root: String,
    pub edges: Vec<DependencyEdge>,
    pub visited: Vec<String>,
    pub unresolved: Vec<UnresolvedDependency>,
}

impl ClosureResult {
    pub(crate) fn leaf(root: &str) -> Self {
        Self {
            root: root.to_string(),
            edges: Vec::new(),
            visited: vec![root.to_string()],
            unresolved: Vec::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.edges.is_empty()
    }
}
