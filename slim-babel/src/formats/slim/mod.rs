//! Slim format implementation
//!
//!     Serialization only: the markup tree is written out as Slim by the walker in
//!     [serializer]. Reading Slim back is a different job with a different model, see the
//!     slim-parser crate.

pub mod serializer;

use serde::{Deserialize, Serialize};
use slim_parser::slim::record::DEFAULT_INDENT_WIDTH;
use slim_parser::ParseOptions;

use crate::error::FormatError;
use crate::format::Format;
use crate::markup::Document;

pub use serializer::{serialize_to_slim, tag_line, VOID_ELEMENTS};

/// Options for writing Slim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertOptions {
    /// Spaces per nesting level
    pub indent_width: usize,
}

impl ConvertOptions {
    pub fn new(indent_width: usize) -> Self {
        Self { indent_width }
    }

    /// The indentation layout shared with the Slim parser.
    pub fn layout(&self) -> ParseOptions {
        ParseOptions::new(self.indent_width)
    }
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            indent_width: DEFAULT_INDENT_WIDTH,
        }
    }
}

/// Slim as a target format
#[derive(Debug, Clone, Copy, Default)]
pub struct SlimFormat {
    options: ConvertOptions,
}

impl SlimFormat {
    pub fn new(options: ConvertOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }
}

impl Format for SlimFormat {
    fn name(&self) -> &str {
        "slim"
    }

    fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
        Ok(serialize_to_slim(doc, &self.options))
    }
}
