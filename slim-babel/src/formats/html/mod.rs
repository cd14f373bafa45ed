//! HTML format implementation
//!
//!     Parsing only. The heavy lifting is html5ever's: it already knows how to recover from
//!     unclosed tags, imply `head` and `body`, and nest whatever the directive preprocessor
//!     produced. This module just adapts its RcDom into the owned [markup](crate::markup) tree.

pub mod parser;

use crate::error::FormatError;
use crate::format::Format;
use crate::markup::Document;

pub use parser::parse_html;

/// HTML (with optional ERB directives) as a source format
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlFormat;

impl Format for HtmlFormat {
    fn name(&self) -> &str {
        "html"
    }

    fn parse(&self, source: &str) -> Result<Document, FormatError> {
        Ok(parse_html(source))
    }
}
