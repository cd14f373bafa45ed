//! HTML/ERB to Slim conversion
//!
//!     This crate turns markup, optionally carrying ERB directives, into Slim. It is a pure lib:
//!     it takes text and returns text, never touching files, the environment or stdout.
//!
//! Architecture
//!
//!     - Format trait: uniform interface for the markup side and the Slim side
//!     - Directive preprocessing: ERB rewritten into markup before the HTML parser sees it
//!     - Markup tree: an owned tree with a dedicated variant for block directives
//!     - Serializer: the walker that writes the tree out as indented Slim lines
//!
//!     The file structure :
//!     .
//!     ├── error.rs
//!     ├── format.rs               # Format trait definition
//!     ├── doctype.rs              # <!DOCTYPE> detection and mapping
//!     ├── markup.rs               # Owned markup tree
//!     ├── directives
//!     │   ├── passes.rs           # Ordered rewrite passes
//!     │   └── comments.rs         # Structural comment encoding
//!     ├── formats
//!     │   ├── html
//!     │   │   ├── parser.rs       # html5ever RcDom → markup tree
//!     │   │   └── mod.rs
//!     │   └── slim
//!     │       ├── serializer.rs   # markup tree → Slim lines
//!     │       └── mod.rs
//!     └── lib.rs
//!
//! Testing
//!     tests
//!     ├── conversion.rs
//!     ├── snapshots
//!     └── fixtures
//!         └── <docname>.html.erb
//!
//! Implementation Principles
//!
//!     HTML parsing is offloaded entirely to html5ever. The work here is the adaptation on both
//!     ends: making ERB survive the parser with its nesting intact, and mapping the parsed tree
//!     onto Slim's indentation rules.
//!
//!     Conversion is best effort and does not fail on odd directives: anything the passes do not
//!     recognize still comes out, as a `-` code line.

pub mod directives;
pub mod doctype;
pub mod error;
pub mod format;
pub mod formats;
pub mod markup;

pub use doctype::Doctype;
pub use error::FormatError;
pub use format::Format;
pub use formats::{ConvertOptions, HtmlFormat, SlimFormat};
pub use markup::{DirectiveMarker, Document, Element, Node};

/// Convert HTML/ERB source to Slim.
///
/// The result always ends in exactly one newline.
pub fn convert(source: &str, options: &ConvertOptions) -> Result<String, FormatError> {
    let document = HtmlFormat.parse(source)?;
    SlimFormat::new(*options).serialize(&document)
}

/// Convert raw bytes, failing with [FormatError::ParseInput] when they are not UTF-8.
pub fn convert_bytes(source: &[u8], options: &ConvertOptions) -> Result<String, FormatError> {
    convert(std::str::from_utf8(source)?, options)
}
