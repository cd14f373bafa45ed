//! Markup tree
//!
//!     An owned, read-only view of the parsed markup, detached from the html5ever DOM so the
//!     serializer never touches `Rc`/`RefCell` handles. Besides the three node kinds every markup
//!     tree has, it carries a [DirectiveMarker] variant: the synthetic elements the preprocessor
//!     plants for block directives are recognized once, while adapting the DOM, and from then on
//!     the walker dispatches on the variant instead of sniffing a reserved attribute.

use crate::doctype::Doctype;

/// A whole converted document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub doctype: Option<Doctype>,
    pub nodes: Vec<Node>,
}

impl Document {
    pub fn new(doctype: Option<Doctype>, nodes: Vec<Node>) -> Self {
        Self { doctype, nodes }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
    Comment(String),
    Directive(DirectiveMarker),
}

impl Node {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Node::Text(text) => Some(text),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Lowercased tag name
    pub name: String,

    /// Attributes in document order
    pub attributes: Vec<(String, String)>,

    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// The sole child, when it is a text node.
    pub fn single_text_child(&self) -> Option<&str> {
        match self.children.as_slice() {
            [only] => only.as_text(),
            _ => None,
        }
    }
}

/// A block directive and the nodes it encloses
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectiveMarker {
    /// Written as an output directive (`<%= ... do %>`) rather than a code directive
    pub is_output: bool,

    /// The directive source, output prefix removed
    pub code: String,

    pub children: Vec<Node>,
}

impl DirectiveMarker {
    /// Decode the value of the reserved marker attribute. A leading `=` marks output.
    pub fn from_attribute(value: &str, children: Vec<Node>) -> Self {
        let (is_output, code) = match value.strip_prefix('=') {
            Some(rest) => (true, rest),
            None => (false, value),
        };
        Self {
            is_output,
            code: code.trim().to_string(),
            children,
        }
    }
}
