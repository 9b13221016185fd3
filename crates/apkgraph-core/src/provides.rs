use std::collections::BTreeMap;

use serde::Serialize;

use crate::index::PackageIndex;

/// Virtual capabilities that no index record declares but that other
/// packages depend on.
pub const BUILTIN_PROVIDERS: [(&str, &str); 5] = [
    ("/bin/sh", "busybox-binsh"),
    ("icu-data", "icu-data-en"),
    ("dnsmasq", "dnsmasq"),
    ("openssh-client", "openssh-client-default"),
    ("cmd:ssh", "openssh-client-default"),
];

/// Capability name to providing package.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ProvidesMap {
    providers: BTreeMap<String, String>,
}

impl ProvidesMap {
    /// Collects every record's provides in index order, then applies
    /// [`BUILTIN_PROVIDERS`]. Later entries win.
    pub fn build(index: &PackageIndex) -> Self {
        let mut providers = BTreeMap::new();
        for record in index.records() {
            for capability in record.bare_provides() {
                providers.insert(capability.to_string(), record.name.clone());
            }
        }
        for (capability, provider) in BUILTIN_PROVIDERS {
            providers.insert(capability.to_string(), provider.to_string());
        }

        Self { providers }
    }

    pub fn with_overrides<I, K, V>(mut self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (capability, provider) in overrides {
            self.providers.insert(capability.into(), provider.into());
        }
        self
    }

    pub fn provider(&self, capability: &str) -> Option<&str> {
        self.providers.get(capability).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}
