//! Doctype detection
//!
//!     The doctype declaration is taken out of the markup before anything else runs and mapped
//!     onto one of Slim's doctype keywords. The mapping is a case-insensitive search of the
//!     declaration body, tried in this order:
//!
//!         strict        -> doctype strict
//!         transitional  -> doctype transitional
//!         frameset      -> doctype frameset
//!         ...html       -> doctype html      (body ends with "html")
//!         anything else -> doctype

use std::borrow::Cow;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

static DOCTYPE_DECLARATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<!DOCTYPE\s+(.+?)>").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Doctype {
    Strict,
    Transitional,
    Frameset,
    Html,
    Generic,
}

impl Doctype {
    /// Classify the body of a `<!DOCTYPE ...>` declaration.
    pub fn from_declaration(body: &str) -> Self {
        let lowered = body.trim().to_ascii_lowercase();
        if lowered.contains("strict") {
            Doctype::Strict
        } else if lowered.contains("transitional") {
            Doctype::Transitional
        } else if lowered.contains("frameset") {
            Doctype::Frameset
        } else if lowered.ends_with("html") {
            Doctype::Html
        } else {
            Doctype::Generic
        }
    }

    /// The Slim line for this doctype.
    pub fn keyword_line(self) -> &'static str {
        match self {
            Doctype::Strict => "doctype strict",
            Doctype::Transitional => "doctype transitional",
            Doctype::Frameset => "doctype frameset",
            Doctype::Html => "doctype html",
            Doctype::Generic => "doctype",
        }
    }
}

impl fmt::Display for Doctype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword_line())
    }
}

/// Find the first doctype declaration and return it with the declaration removed from `source`.
pub fn strip_doctype(source: &str) -> (Option<Doctype>, Cow<'_, str>) {
    match DOCTYPE_DECLARATION.captures(source) {
        Some(captures) => {
            let doctype = Doctype::from_declaration(&captures[1]);
            (Some(doctype), DOCTYPE_DECLARATION.replace(source, ""))
        }
        None => (None, Cow::Borrowed(source)),
    }
}
