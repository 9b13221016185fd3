use thiserror::Error;

/// Raised when index bytes do not follow the `<tag>:<value>` stanza layout.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IndexFormatError {
    #[error("index is not valid UTF-8: {0}")]
    NotUtf8(#[from] std::str::Utf8Error),
    #[error("malformed index line {line}: expected '<tag>:<value>', found {content:?}")]
    MalformedLine { line: usize, content: String },
    #[error("index stanza ending at line {line} has no package name")]
    MissingName { line: usize },
}
