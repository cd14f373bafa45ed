//! Error types for format conversion

/// Errors raised while converting between formats
///
/// Malformed embedded directives are never an error: the preprocessor degrades them to plain
/// code comments. Only input that cannot be read at all, or a capability a format lacks, fails.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    /// The format does not implement the requested direction
    #[error("{0}")]
    NotSupported(String),

    /// The source bytes are not valid UTF-8
    #[error("source is not valid UTF-8: {0}")]
    ParseInput(#[from] std::str::Utf8Error),
}
