//! Format trait definition
//!
//! This module defines the Format trait shared by the markup side and the Slim side of a
//! conversion. A format either reads text into a [Document], writes a [Document] out as text, or
//! both.

use crate::error::FormatError;
use crate::markup::Document;

/// Trait for document formats
///
/// # Examples
///
/// ```ignore
/// let document = HtmlFormat.parse("<p>Hello</p>")?;
/// let slim = SlimFormat::default().serialize(&document)?;
/// assert_eq!(slim, "p Hello\n");
/// ```
pub trait Format: Send + Sync {
    /// The name of this format (e.g., "html", "slim")
    fn name(&self) -> &str;

    /// Parse source text into a Document
    ///
    /// Default implementation returns NotSupported error.
    fn parse(&self, _source: &str) -> Result<Document, FormatError> {
        Err(FormatError::NotSupported(format!(
            "Format '{}' does not support parsing",
            self.name()
        )))
    }

    /// Serialize a Document into source text
    ///
    /// Default implementation returns NotSupported error.
    fn serialize(&self, _doc: &Document) -> Result<String, FormatError> {
        Err(FormatError::NotSupported(format!(
            "Format '{}' does not support serialization",
            self.name()
        )))
    }
}
