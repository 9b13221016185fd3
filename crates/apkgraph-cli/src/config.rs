use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use apkgraph_registry::MirrorLocation;
use serde::Deserialize;

pub(crate) const DEFAULT_RENDERER_URL: &str = "https://mermaid.ink/img/";
pub(crate) const DEFAULT_IMAGE_PATH: &str = "downloaded_image.png";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct AppConfig {
    pub(crate) index: MirrorLocation,
    pub(crate) render: RenderConfig,
    /// Extra capability providers, applied after the built-in ones.
    pub(crate) provides: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct RenderConfig {
    pub(crate) base_url: String,
    pub(crate) image_path: PathBuf,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_RENDERER_URL.to_string(),
            image_path: PathBuf::from(DEFAULT_IMAGE_PATH),
        }
    }
}

impl AppConfig {
    pub(crate) fn from_toml_str(input: &str) -> Result<Self> {
        toml::from_str(input).context("failed to parse apkgraph config")
    }

    pub(crate) fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed reading config: {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("failed loading config: {}", path.display()))
    }
}
