use std::fs;
use std::path::Path;
use std::process::Command;

use anyhow::{anyhow, Context, Result};
use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use reqwest::blocking::Client;

/// mermaid.ink takes the diagram as padded URL-safe base64 in the path.
pub(crate) fn mermaid_ink_url(base_url: &str, diagram: &str) -> String {
    let encoded = URL_SAFE.encode(diagram.as_bytes());
    format!("{}/{encoded}", base_url.trim_end_matches('/'))
}

pub(crate) fn render_image(client: &Client, base_url: &str, diagram: &str) -> Result<Vec<u8>> {
    let url = mermaid_ink_url(base_url, diagram);
    apkgraph_registry::fetch_bytes(client, &url).context("failed rendering dependency graph")
}

pub(crate) fn write_image(path: &Path, image: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed creating image directory: {}", parent.display()))?;
    }
    fs::write(path, image).with_context(|| format!("failed writing image: {}", path.display()))
}

/// Runs `bash <script> <image>` and waits for it.
pub(crate) fn run_display_script(script: &Path, image: &Path) -> Result<()> {
    let status = Command::new("bash")
        .arg(script)
        .arg(image)
        .status()
        .with_context(|| format!("failed launching display script: {}", script.display()))?;
    if !status.success() {
        return Err(anyhow!(
            "display script {} failed with {status}",
            script.display()
        ));
    }
    Ok(())
}
