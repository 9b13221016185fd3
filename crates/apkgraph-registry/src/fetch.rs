use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use apkgraph_core::PackageIndex;
use reqwest::blocking::Client;
use tracing::debug;

use crate::archive::{extract_apkindex, is_gzip};
use crate::mirror::MirrorLocation;

const HTTP_TIMEOUT: Duration = Duration::from_secs(60);

/// Where the raw package index comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexSource {
    Mirror(MirrorLocation),
    /// Plain `APKINDEX` text or an `APKINDEX.tar.gz` on disk.
    File(PathBuf),
}

impl IndexSource {
    pub fn describe(&self) -> String {
        match self {
            Self::Mirror(location) => location
                .index_url()
                .unwrap_or_else(|_| location.mirror.clone()),
            Self::File(path) => path.display().to_string(),
        }
    }
}

pub fn http_client() -> Result<Client> {
    Client::builder()
        .user_agent(concat!("apkgraph/", env!("CARGO_PKG_VERSION")))
        .timeout(HTTP_TIMEOUT)
        .build()
        .context("failed building HTTP client")
}

/// GETs `url`, failing on any non-success status.
pub fn fetch_bytes(client: &Client, url: &str) -> Result<Vec<u8>> {
    let response = client
        .get(url)
        .send()
        .with_context(|| format!("failed requesting {url}"))?
        .error_for_status()
        .with_context(|| format!("server rejected request for {url}"))?;
    let body = response
        .bytes()
        .with_context(|| format!("failed reading response body from {url}"))?;
    debug!(url, bytes = body.len(), "downloaded");
    Ok(body.to_vec())
}

/// Returns the uncompressed `APKINDEX` text bytes for `source`.
pub fn load_index_bytes(client: &Client, source: &IndexSource) -> Result<Vec<u8>> {
    match source {
        IndexSource::Mirror(location) => {
            let url = location.index_url()?;
            let archive = fetch_bytes(client, &url)
                .with_context(|| format!("failed fetching package index from {url}"))?;
            extract_apkindex(&archive)
                .with_context(|| format!("failed extracting package index from {url}"))
        }
        IndexSource::File(path) => {
            let raw = fs::read(path)
                .with_context(|| format!("failed reading package index: {}", path.display()))?;
            if !is_gzip(&raw) {
                return Ok(raw);
            }
            extract_apkindex(&raw).with_context(|| {
                format!("failed extracting package index: {}", path.display())
            })
        }
    }
}

pub fn load_package_index(client: &Client, source: &IndexSource) -> Result<PackageIndex> {
    let raw = load_index_bytes(client, source)?;
    apkgraph_core::parse_bytes(&raw)
        .with_context(|| format!("failed parsing package index from {}", source.describe()))
}
