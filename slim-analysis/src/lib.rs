//! # slim-analysis
//!
//! Tools that read existing Slim text: validation, extraction and repair.
//!
//!     All three consume the flat record sequence produced by slim-parser and never build a
//!     tree of their own. Parent and subtree questions go through [slim_parser::Structure].
//!
//!     src
//!       ├── validation.rs   Errors and warnings, collected and never raised
//!       ├── extraction.rs   Outline, selector and keep/remove extraction
//!       ├── repair.rs       Slash and multiline text rewrites
//!       ├── outcome.rs      The batch-safe {success, error} envelope
//!       └── error.rs
//!
//! Failure Policy
//!
//!     Validation reports problems inside its [ValidationReport]. Extraction and repair have
//!     typed entry points returning `Result`, and `*_str` entry points that fold any failure into
//!     an [Outcome] so a batch over many files keeps going.

pub mod error;
pub mod extraction;
pub mod outcome;
pub mod repair;
pub mod validation;

pub use error::AnalysisError;
pub use extraction::{
    extract_bytes, extract_str, try_extract, ExtractOptions, Extraction, ExtractionSummary,
    DEFAULT_REMOVE,
};
pub use outcome::Outcome;
pub use repair::{fix, fix_str, try_fix_bytes, FixOptions, FixReport};
pub use validation::{
    validate, validate_bytes, ValidateOptions, ValidationReport, DEFAULT_MAX_LINE_LENGTH,
};
