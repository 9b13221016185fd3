use indexmap::IndexMap;
use tracing::debug;

use crate::error::IndexFormatError;
use crate::record::PackageRecord;

/// Packages whose index key carries their version (`<name>=<version>`).
///
/// These two names collide in the upstream index; keep the table narrow
/// rather than versioning every key.
pub const VERSIONED_KEY_PACKAGES: [&str; 2] = ["boost-dev", "zfs-virt"];

/// Returns the bare name of a dependency or provides token.
///
/// Everything from the first `>=`, `=` or `>` onward is dropped. Other apk
/// operators are left in place.
pub fn strip_version_qualifier(token: &str) -> &str {
    let end = token.find(['>', '=']).unwrap_or(token.len());
    &token[..end]
}

/// Package records keyed by name, in index order.
///
/// A later record with the same name replaces the earlier one and moves to
/// the end, so iteration follows the order records were last declared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageIndex {
    packages: IndexMap<String, PackageRecord>,
}

impl PackageIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, record: PackageRecord) -> Option<PackageRecord> {
        let previous = self.packages.shift_remove(&record.name);
        self.packages.insert(record.name.clone(), record);
        previous
    }

    pub fn get(&self, name: &str) -> Option<&PackageRecord> {
        self.packages.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.packages.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = &PackageRecord> {
        self.packages.values()
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.packages.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl FromIterator<PackageRecord> for PackageIndex {
    fn from_iter<T: IntoIterator<Item = PackageRecord>>(iter: T) -> Self {
        let mut index = Self::new();
        for record in iter {
            index.insert(record);
        }
        index
    }
}

pub fn parse_bytes(raw: &[u8]) -> Result<PackageIndex, IndexFormatError> {
    let text = std::str::from_utf8(raw)?;
    parse(text)
}

pub fn parse(text: &str) -> Result<PackageIndex, IndexFormatError> {
    let mut index = PackageIndex::new();
    let mut stanza = Stanza::default();
    let mut line_number = 0;

    for (offset, line) in text.lines().enumerate() {
        line_number = offset + 1;
        if line.trim().is_empty() {
            stanza.commit(&mut index, line_number)?;
            continue;
        }

        let (tag, value) = split_tag(line).ok_or_else(|| IndexFormatError::MalformedLine {
            line: line_number,
            content: line.to_string(),
        })?;
        stanza.apply(tag, value);
    }
    stanza.commit(&mut index, line_number)?;

    debug!(packages = index.len(), "parsed package index");
    Ok(index)
}

fn split_tag(line: &str) -> Option<(char, &str)> {
    let mut chars = line.char_indices();
    let (_, tag) = chars.next()?;
    let (colon_at, colon) = chars.next()?;
    if colon != ':' {
        return None;
    }
    Some((tag, &line[colon_at + 1..]))
}

#[derive(Debug, Default)]
struct Stanza {
    tagged: bool,
    name: Option<String>,
    version: Option<String>,
    depends_on: Vec<String>,
    provides: Vec<String>,
}

impl Stanza {
    fn apply(&mut self, tag: char, value: &str) {
        self.tagged = true;
        match tag {
            'P' => self.name = Some(value.trim().to_string()),
            'V' => self.version = Some(value.trim().to_string()),
            'D' => self.depends_on = split_tokens(value),
            'p' => self.provides = split_tokens(value),
            _ => {}
        }
    }

    fn commit(&mut self, index: &mut PackageIndex, line: usize) -> Result<(), IndexFormatError> {
        let stanza = std::mem::take(self);
        if !stanza.tagged {
            return Ok(());
        }

        let Some(name) = stanza.name.filter(|name| !name.is_empty()) else {
            return Err(IndexFormatError::MissingName { line });
        };
        let name = index_key(name, stanza.version.as_deref());
        index.insert(PackageRecord {
            name,
            depends_on: stanza.depends_on,
            provides: stanza.provides,
        });
        Ok(())
    }
}

fn split_tokens(value: &str) -> Vec<String> {
    value.split_whitespace().map(str::to_string).collect()
}

fn index_key(name: String, version: Option<&str>) -> String {
    match version {
        Some(version) if VERSIONED_KEY_PACKAGES.contains(&name.as_str()) => {
            format!("{name}={version}")
        }
        _ => name,
    }
}
