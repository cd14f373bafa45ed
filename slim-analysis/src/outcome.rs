//! Batch-safe result envelope
//!
//!     Extraction and repair are meant to run unattended over many files. Their string entry
//!     points never propagate an error: whatever happened is folded into an [Outcome] that
//!     serializes as `{"success": true, ...payload}` or `{"success": false, "error": "..."}`.

use serde::Serialize;

use crate::error::AnalysisError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome<T> {
    pub success: bool,

    #[serde(flatten)]
    pub value: Option<T>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> Outcome<T> {
    pub fn ok(value: T) -> Self {
        Self {
            success: true,
            value: Some(value),
            error: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            value: None,
            error: Some(message.into()),
        }
    }

    pub fn into_result(self) -> Result<T, String> {
        match (self.value, self.error) {
            (Some(value), _) => Ok(value),
            (None, error) => Err(error.unwrap_or_default()),
        }
    }
}

impl<T> From<Result<T, AnalysisError>> for Outcome<T> {
    fn from(result: Result<T, AnalysisError>) -> Self {
        match result {
            Ok(value) => Outcome::ok(value),
            Err(err) => {
                tracing::warn!(error = %err, "operation failed");
                Outcome::failed(err.to_string())
            }
        }
    }
}
