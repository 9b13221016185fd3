mod archive;
mod fetch;
mod mirror;

pub use archive::{extract_apkindex, is_gzip, APKINDEX_MEMBER};
pub use fetch::{fetch_bytes, http_client, load_index_bytes, load_package_index, IndexSource};
pub use mirror::MirrorLocation;

#[cfg(test)]
mod tests;
