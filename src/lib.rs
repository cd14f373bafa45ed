//! # slim
//!
//! Tooling between HTML/ERB markup and Slim templates.
//!
//!     Two independent paths share one vocabulary of indentation and line kinds:
//!
//!         markup → slim-babel → Slim text                      (conversion)
//!         Slim text → slim-parser records → slim-analysis      (validation, extraction, repair)
//!
//!     The crates underneath are usable on their own with their plain option structs. This
//!     crate adds [Toolchain], which takes every option from a [SlimConfig] so a batch driver
//!     configures once and then hands over text.
//!
//!     Everything is pure: text in, text or reports out. Reading and writing files, backups
//!     and prompts belong to the caller.

use serde::{Deserialize, Serialize};

pub use slim_analysis::{
    extract_str, fix, fix_str, try_extract, validate, AnalysisError, ExtractOptions, Extraction,
    ExtractionSummary, FixOptions, FixReport, Outcome, ValidateOptions, ValidationReport,
};
pub use slim_babel::{convert, convert_bytes, ConvertOptions, FormatError};
pub use slim_config::{load_defaults, ConfigError, Loader, SlimConfig};
pub use slim_parser::{classify_line, LineKind, LineRecord, ParseOptions, Selector, Structure};

/// Which part of a document to extract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractMode {
    /// Records shallower than the depth
    Outline(usize),

    /// Blocks whose root matches the selector
    Selector(String),

    /// Blocks kept or removed by name. Both lists empty means the configured default removals.
    Sections { keep: Vec<String>, remove: Vec<String> },
}

impl ExtractMode {
    fn apply(self, options: &mut ExtractOptions) {
        match self {
            ExtractMode::Outline(depth) => options.outline = Some(depth),
            ExtractMode::Selector(selector) => options.selector = Some(selector),
            ExtractMode::Sections { keep, remove } => {
                options.keep = keep;
                options.remove = remove;
            }
        }
    }
}

/// Every operation, configured from one [SlimConfig].
#[derive(Debug, Clone)]
pub struct Toolchain {
    config: SlimConfig,
}

impl Toolchain {
    pub fn new(config: SlimConfig) -> Self {
        Self { config }
    }

    /// A toolchain over the embedded defaults.
    pub fn with_defaults() -> Result<Self, ConfigError> {
        Ok(Self::new(load_defaults()?))
    }

    pub fn config(&self) -> &SlimConfig {
        &self.config
    }

    /// Convert HTML/ERB to Slim.
    pub fn convert(&self, source: &str) -> Result<String, FormatError> {
        convert(source, &self.config.convert_options())
    }

    pub fn validate(&self, source: &str) -> ValidationReport {
        validate(source, &self.config.validate_options())
    }

    pub fn extract(&self, source: &str, mode: ExtractMode) -> Outcome<Extraction> {
        let mut options = self.config.extract_options();
        mode.apply(&mut options);
        extract_str(source, &options)
    }

    pub fn fix(&self, source: &str) -> Outcome<FixReport> {
        fix_str(source, &self.config.fix_options())
    }
}
