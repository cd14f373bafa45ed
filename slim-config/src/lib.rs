//! Shared configuration loader for the slim toolchain.
//!
//! `defaults/slim.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`SlimConfig`].
//!
//! Each group converts into the option struct of the crate that owns the
//! behavior, so components only ever see explicit values.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File, FileFormat, ValueKind};
use serde::Deserialize;
use slim_analysis::{ExtractOptions, FixOptions, ValidateOptions};
use slim_babel::ConvertOptions;
use slim_parser::ParseOptions;
use std::path::Path;

pub use config::ConfigError;

const DEFAULT_TOML: &str = include_str!("../defaults/slim.default.toml");

/// Top-level configuration consumed by slim applications.
#[derive(Debug, Clone, Deserialize)]
pub struct SlimConfig {
    pub parse: ParseConfig,
    pub convert: ConvertConfig,
    pub validate: ValidateConfig,
    pub extract: ExtractConfig,
    pub fix: FixConfig,
}

/// How Slim text is read back into records.
#[derive(Debug, Clone, Deserialize)]
pub struct ParseConfig {
    pub indent_width: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConvertConfig {
    pub indent_width: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ValidateConfig {
    pub check_conventions: bool,
    pub strict: bool,
    pub max_line_length: usize,
}

/// Extraction knobs that do not depend on the request. The mode itself (outline, selector
/// or keep/remove names) is chosen per call.
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractConfig {
    pub remove_wrapper: bool,
    pub default_remove: Vec<String>,
    pub reject_conflicting_modes: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FixConfig {
    pub fix_slashes: bool,
    pub fix_multiline: bool,
    pub preview_only: bool,
}

impl SlimConfig {
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions::new(self.parse.indent_width)
    }

    pub fn convert_options(&self) -> ConvertOptions {
        ConvertOptions::new(self.convert.indent_width)
    }

    pub fn validate_options(&self) -> ValidateOptions {
        ValidateOptions {
            check_conventions: self.validate.check_conventions,
            strict: self.validate.strict,
            max_line_length: self.validate.max_line_length,
            parse: self.parse_options(),
        }
    }

    /// Extraction options with no mode selected yet.
    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            remove_wrapper: self.extract.remove_wrapper,
            default_remove: self.extract.default_remove.clone(),
            reject_conflicting_modes: self.extract.reject_conflicting_modes,
            parse: self.parse_options(),
            ..ExtractOptions::default()
        }
    }

    pub fn fix_options(&self) -> FixOptions {
        FixOptions {
            fix_slashes: self.fix.fix_slashes,
            fix_multiline: self.fix.fix_multiline,
            preview_only: self.fix.preview_only,
            parse: self.parse_options(),
        }
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for command line flags).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<SlimConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<SlimConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(config.convert.indent_width, 2);
        assert_eq!(config.validate.max_line_length, 120);
        assert!(config.fix.fix_slashes);
        assert!(!config.extract.reject_conflicting_modes);
    }

    #[test]
    fn defaults_match_library_defaults() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(config.convert_options(), ConvertOptions::default());
        assert_eq!(config.validate_options(), ValidateOptions::default());
        assert_eq!(config.extract_options(), ExtractOptions::default());
        assert_eq!(config.fix_options(), FixOptions::default());
        assert_eq!(config.parse_options(), ParseOptions::default());
    }

    #[test]
    fn supports_overrides() {
        let config = Loader::new()
            .set_override("validate.strict", true)
            .expect("override to apply")
            .set_override("parse.indent_width", 4i64)
            .expect("override to apply")
            .build()
            .expect("config to build");
        let options = config.validate_options();
        assert!(options.strict);
        assert_eq!(options.parse, ParseOptions::new(4));
        assert_eq!(config.fix_options().parse.indent_width, 4);
    }

    #[test]
    fn default_removal_set_is_configurable() {
        let config = Loader::new()
            .set_override("extract.default_remove", vec!["aside", "footer"])
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert_eq!(
            config.extract_options().default_remove,
            vec!["aside".to_string(), "footer".to_string()]
        );
    }

    #[test]
    fn missing_optional_file_is_ignored() {
        let config = Loader::new()
            .with_optional_file("does/not/exist/slim.toml")
            .build()
            .expect("config to build");
        assert_eq!(config.parse.indent_width, 2);
    }

    #[test]
    fn missing_required_file_fails() {
        let result = Loader::new().with_file("does/not/exist/slim.toml").build();
        assert!(result.is_err());
    }
}
