use std::collections::{BTreeSet, HashSet, VecDeque};

use apkgraph_core::{PackageIndex, PackageRecord, ProvidesMap};
use tracing::debug;

use crate::types::{ClosureResult, DependencyEdge, ResolveError, UnresolvedDependency};

/// Walks the runtime dependencies of `start` breadth-first.
///
/// Every package is expanded at most once, so cycles terminate. Tokens that
/// name neither a package nor a known capability are recorded in
/// [`ClosureResult::unresolved`] and produce no edge.
pub fn resolve(
    index: &PackageIndex,
    provides: &ProvidesMap,
    start: &str,
) -> Result<ClosureResult, ResolveError> {
    let root = index
        .get(start)
        .ok_or_else(|| ResolveError::PackageNotFound(start.to_string()))?;

    let mut result = ClosureResult::leaf(start);
    if root.is_leaf() {
        return Ok(result);
    }

    let mut visited: HashSet<&str> = HashSet::with_capacity(index.len());
    let mut worklist: VecDeque<&PackageRecord> = VecDeque::with_capacity(index.len());
    visited.insert(root.name.as_str());
    worklist.push_back(root);

    while let Some(package) = worklist.pop_front() {
        let mut direct: BTreeSet<&str> = BTreeSet::new();
        for (token, name) in package.depends_on.iter().zip(package.bare_dependencies()) {
            match resolve_token(index, provides, name) {
                Some(dependency) => {
                    direct.insert(dependency);
                }
                None => {
                    debug!(package = %package.name, token = %token, "dropping unresolved dependency");
                    result.unresolved.push(UnresolvedDependency {
                        package: package.name.clone(),
                        token: token.clone(),
                    });
                }
            }
        }

        for dependency in direct {
            result.edges.push(DependencyEdge {
                from: package.name.clone(),
                to: dependency.to_string(),
            });
            if !visited.insert(dependency) {
                continue;
            }
            result.visited.push(dependency.to_string());
            match index.get(dependency) {
                Some(record) => worklist.push_back(record),
                None => debug!(provider = %dependency, "provider has no index record"),
            }
        }
    }

    debug!(
        root = %start,
        packages = result.visited.len(),
        edges = result.edges.len(),
        unresolved = result.unresolved.len(),
        "resolved dependency closure"
    );
    Ok(result)
}

fn resolve_token<'a>(
    index: &'a PackageIndex,
    provides: &'a ProvidesMap,
    name: &'a str,
) -> Option<&'a str> {
    if index.contains(name) {
        return Some(name);
    }
    provides.provider(name)
}
