//! CSS-like selectors over Slim records
//!
//!     Supported forms:
//!
//!         - `article`, `#content`, `.main`, `section#intro.highlight`
//!         - `parent > child`, where both sides are one of the simple forms above
//!
//!     A simple selector matches a record when the record's head (see
//!     [scan_element_head](super::shorthand::scan_element_head)) has the requested element name,
//!     the requested id and every requested class. Bare shorthand lines count as `div`.
//!
//!     The child form additionally requires the record's nearest enclosing record to match the
//!     parent selector. The enclosing record comes from the parent indices precomputed by
//!     [Structure], so matching stays linear over a whole document.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

use super::record::LineRecord;
use super::shorthand::scan_element_head;
use super::structure::Structure;

static COMPOUND_SELECTOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^([a-z][a-z0-9]*)?([#.][\w\-#.]*)?$").unwrap());
static ID_PART: Lazy<Regex> = Lazy::new(|| Regex::new(r"#([\w\-]+)").unwrap());
static CLASS_PART: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.([\w\-]+)").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    #[error("selector is empty")]
    Empty,

    #[error("selector '{0}' has an empty side around '>'")]
    EmptyCombinatorSide(String),

    #[error("selector '{0}' chains more than one '>' combinator")]
    UnsupportedCombinator(String),
}

/// `element#id.class.class`, every part optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimpleSelector {
    pub element: Option<String>,
    pub id: Option<String>,
    pub classes: Vec<String>,
}

impl SimpleSelector {
    fn parse(selector: &str) -> Self {
        let mut parts = SimpleSelector::default();

        if let Some(captures) = COMPOUND_SELECTOR.captures(selector) {
            parts.element = captures.get(1).map(|m| m.as_str().to_string());
            if let Some(markers) = captures.get(2) {
                parts.id = ID_PART
                    .captures(markers.as_str())
                    .map(|id| id[1].to_string());
                parts.classes = CLASS_PART
                    .captures_iter(markers.as_str())
                    .map(|class| class[1].to_string())
                    .collect();
            }
        } else if let Some(id) = selector.strip_prefix('#') {
            parts.id = Some(id.to_string());
        } else if let Some(class) = selector.strip_prefix('.') {
            parts.classes.push(class.to_string());
        } else {
            parts.element = Some(selector.to_string());
        }

        parts
    }

    /// Whether a single record satisfies this selector.
    pub fn matches_record(&self, record: &LineRecord) -> bool {
        if !record.line_kind.is_element() {
            return false;
        }
        let Some(head) = scan_element_head(&record.content) else {
            return false;
        };

        if let Some(element) = &self.element {
            if !head.effective_element().eq_ignore_ascii_case(element) {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if head.id != Some(id.as_str()) {
                return false;
            }
        }
        self.classes.iter().all(|class| head.has_class(class))
    }
}

impl fmt::Display for SimpleSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(element) = &self.element {
            write!(f, "{}", element)?;
        }
        if let Some(id) = &self.id {
            write!(f, "#{}", id)?;
        }
        for class in &self.classes {
            write!(f, ".{}", class)?;
        }
        Ok(())
    }
}

/// A parsed selector query. Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    Simple(SimpleSelector),
    Child {
        parent: SimpleSelector,
        child: SimpleSelector,
    },
}

impl Selector {
    pub fn parse(selector: &str) -> Result<Self, SelectorError> {
        let selector = selector.trim();
        if selector.is_empty() {
            return Err(SelectorError::Empty);
        }

        match selector.split_once('>') {
            None => Ok(Selector::Simple(SimpleSelector::parse(selector))),
            Some((parent, child)) => {
                let (parent, child) = (parent.trim(), child.trim());
                if child.contains('>') {
                    return Err(SelectorError::UnsupportedCombinator(selector.to_string()));
                }
                if parent.is_empty() || child.is_empty() {
                    return Err(SelectorError::EmptyCombinatorSide(selector.to_string()));
                }
                Ok(Selector::Child {
                    parent: SimpleSelector::parse(parent),
                    child: SimpleSelector::parse(child),
                })
            }
        }
    }

    pub fn is_child_combinator(&self) -> bool {
        matches!(self, Selector::Child { .. })
    }

    /// Whether the record at `index` in `structure` matches.
    pub fn matches(&self, structure: &Structure, index: usize) -> bool {
        let Some(record) = structure.get(index) else {
            return false;
        };

        match self {
            Selector::Simple(simple) => simple.matches_record(record),
            Selector::Child { parent, child } => {
                child.matches_record(record)
                    && structure
                        .parent_record(index)
                        .is_some_and(|enclosing| parent.matches_record(enclosing))
            }
        }
    }
}

impl FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Selector::parse(s)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Simple(simple) => write!(f, "{}", simple),
            Selector::Child { parent, child } => write!(f, "{} > {}", parent, child),
        }
    }
}
