//! # slim-parser
//!
//! Structural parsing for Slim templates.
//!
//! File Layout
//!
//!     This crate does not build a full Slim AST. The tools that consume Slim text (validation,
//!     extraction, repair) only need to know, for every non-blank physical line, how deep it
//!     sits and what kind of line it is. Nesting is implicit in the indentation, exactly as Slim
//!     itself defines it, so a flat sequence of records plus a parent index per record is enough
//!     to answer every structural question those tools ask.
//!
//!     src/slim
//!       ├── record.rs          LineRecord, LineKind and re-linearization
//!       ├── classification.rs  Prefix rules, tried in declaration order
//!       ├── structure.rs       Record sequence with precomputed parent indices
//!       ├── shorthand.rs       Lightweight element / id / class head scanner
//!       └── selector.rs        CSS-like selectors matched against records
//!
//!     Everything here is pure: parsing takes the source text and a [ParseOptions] value and
//!     returns owned data. There is no shared state between calls.

pub mod slim;

pub use slim::classification::classify_line;
pub use slim::record::{
    leading_spaces, relinearize, LineKind, LineRecord, ParseOptions, DEFAULT_INDENT_WIDTH,
};
pub use slim::selector::{Selector, SelectorError, SimpleSelector};
pub use slim::shorthand::{scan_element_head, ElementHead};
pub use slim::structure::Structure;
