//! Embedded directive handling
//!
//!     ERB-style directives (`<% code %>`, `<%= output %>`) are not markup, so an HTML parser
//!     would either keep them as text or mangle them. Before parsing, [passes] rewrites them
//!     into constructs the parser understands:
//!
//!         - block directives become an unclosed marker `template`, so the parser nests
//!           whatever follows inside it exactly as the directive nests it, table rows and
//!           select options included
//!         - every other directive becomes a structural comment, see [comments]
//!
//!     The markup adapter turns marker templates into [DirectiveMarker](crate::markup::DirectiveMarker)
//!     nodes and the serializer turns structural comments back into Slim lines.

pub mod comments;
pub mod passes;

pub use comments::{decode, encode, CommentTag, DecodedComment};
pub use passes::{preprocess, Pass, MARKER_ATTRIBUTE, MARKER_ELEMENT, PASSES};
