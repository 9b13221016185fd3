use serde::Serialize;

use crate::index::strip_version_qualifier;

/// One package entry of an APKINDEX.
///
/// `depends_on` and `provides` keep the raw tokens, including any version
/// qualifier; use the `bare_*` iterators to get plain names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PackageRecord {
    pub name: String,
    pub depends_on: Vec<String>,
    pub provides: Vec<String>,
}

impl PackageRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_depends<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.depends_on = tokens.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_provides<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.provides = tokens.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.depends_on.is_empty()
    }

    pub fn bare_dependencies(&self) -> impl Iterator<Item = &str> {
        self.depends_on
            .iter()
            .map(|token| strip_version_qualifier(token))
    }

    pub fn bare_provides(&self) -> impl Iterator<Item = &str> {
        self.provides
            .iter()
            .map(|token| strip_version_qualifier(token))
    }
}
