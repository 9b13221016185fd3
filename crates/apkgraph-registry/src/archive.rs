use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context, Result};
use flate2::read::MultiGzDecoder;
use tar::Archive;

pub const APKINDEX_MEMBER: &str = "APKINDEX";

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

pub fn is_gzip(bytes: &[u8]) -> bool {
    bytes.starts_with(&GZIP_MAGIC)
}

/// Pulls the `APKINDEX` member out of an `APKINDEX.tar.gz`.
///
/// Signed indexes are several gzip streams back to back (signature first),
/// so every member is decoded as one tar stream.
pub fn extract_apkindex(archive: &[u8]) -> Result<Vec<u8>> {
    let mut tar = Archive::new(MultiGzDecoder::new(archive));
    let entries = tar.entries().context("failed reading index archive")?;
    for entry in entries {
        let mut entry = entry.context("failed reading index archive entry")?;
        let is_index = entry
            .path()
            .context("index archive entry has an invalid path")?
            .as_ref()
            == Path::new(APKINDEX_MEMBER);
        if !is_index {
            continue;
        }

        let mut contents = Vec::new();
        entry
            .read_to_end(&mut contents)
            .with_context(|| format!("failed reading {APKINDEX_MEMBER} from index archive"))?;
        return Ok(contents);
    }

    bail!("index archive has no {APKINDEX_MEMBER} member")
}
