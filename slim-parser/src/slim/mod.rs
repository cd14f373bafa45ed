//! Main module for slim structural parsing

pub mod classification;
pub mod record;
pub mod selector;
pub mod shorthand;
pub mod structure;
