use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_MIRROR: &str = "https://dl-cdn.alpinelinux.org/alpine";
pub const DEFAULT_RELEASE: &str = "v3.20";
pub const DEFAULT_REPOSITORY: &str = "main";
pub const DEFAULT_ARCH: &str = "x86_64";

const INDEX_ARCHIVE_NAME: &str = "APKINDEX.tar.gz";

/// Where an Alpine repository index lives on a mirror.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MirrorLocation {
    pub mirror: String,
    pub release: String,
    pub repository: String,
    pub arch: String,
}

impl Default for MirrorLocation {
    fn default() -> Self {
        Self {
            mirror: DEFAULT_MIRROR.to_string(),
            release: DEFAULT_RELEASE.to_string(),
            repository: DEFAULT_REPOSITORY.to_string(),
            arch: DEFAULT_ARCH.to_string(),
        }
    }
}

impl MirrorLocation {
    pub fn index_url(&self) -> Result<String> {
        let mirror = self.mirror.trim().trim_end_matches('/');
        if mirror.is_empty() {
            return Err(anyhow!("mirror URL must not be empty"));
        }
        validate_path_segment("release", &self.release)?;
        validate_path_segment("repository", &self.repository)?;
        validate_path_segment("arch", &self.arch)?;

        Ok(format!(
            "{mirror}/{}/{}/{}/{INDEX_ARCHIVE_NAME}",
            self.release, self.repository, self.arch
        ))
    }
}

fn validate_path_segment(field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(anyhow!("mirror {field} must not be empty"));
    }
    if value
        .chars()
        .any(|ch| !(ch.is_ascii_alphanumeric() || ch == '.' || ch == '-' || ch == '_'))
    {
        return Err(anyhow!("invalid mirror {field} '{value}'"));
    }
    Ok(())
}
