//! Error types for the structural consumers

use slim_parser::SelectorError;
use thiserror::Error;

/// Failures of extraction and repair.
///
/// Validation has no error type of its own: structural defects are collected as messages in a
/// [crate::ValidationReport], never raised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// The source could not be read as UTF-8 text.
    #[error("invalid input: {0}")]
    ParseInput(String),

    #[error(transparent)]
    Selector(#[from] SelectorError),

    /// Nothing to work on.
    #[error("{0}")]
    Reference(String),

    /// Options that cannot be combined.
    #[error("conflicting options: {0}")]
    Configuration(String),
}

impl From<std::str::Utf8Error> for AnalysisError {
    fn from(err: std::str::Utf8Error) -> Self {
        AnalysisError::ParseInput(err.to_string())
    }
}
