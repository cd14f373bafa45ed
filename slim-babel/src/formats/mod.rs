//! Format implementations
//!
//! `html` reads markup into the [markup](crate::markup) tree, `slim` writes that tree out as
//! Slim.

pub mod html;
pub mod slim;

pub use html::HtmlFormat;
pub use slim::{ConvertOptions, SlimFormat};
