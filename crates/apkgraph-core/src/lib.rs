mod error;
mod index;
mod provides;
mod record;

pub use error::IndexFormatError;
pub use index::{parse, parse_bytes, strip_version_qualifier, PackageIndex, VERSIONED_KEY_PACKAGES};
pub use provides::{ProvidesMap, BUILTIN_PROVIDERS};
pub use record::PackageRecord;
