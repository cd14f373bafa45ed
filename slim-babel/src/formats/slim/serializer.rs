//! Slim serialization (markup tree → Slim)
//!
//!     The walker renders one node at a time into indented lines. Nesting depth is the only
//!     state; every child is rendered exactly one level below its parent, so the output never
//!     jumps more than one level (structural comments carrying an `:INDENT:n` suffix are the
//!     single exception, by request).
//!
//! Elements
//!
//!     The tag line starts from the tag name. A `div` with an id or a class drops its name, the
//!     shorthand implies it. Then come `#id`, one `.class` per class token, and a bracketed
//!     list of every other attribute in document order.
//!
//!     Children, in priority order:
//!
//!         1. void elements            tag line only
//!         2. no children              tag line only
//!         3. a single text child      inlined, see below
//!         4. anything else            tag line, then each child one level deeper
//!
//!     Inlining a sole text child: blank text adds nothing; `pre` keeps its line breaks as a
//!     literal `\n` marker; text spanning several non-blank lines becomes one `|` line each;
//!     otherwise the collapsed text goes after the tag, unless it starts with `/` (that would
//!     read as a comment), in which case it moves to a `|` line below.

use once_cell::sync::Lazy;
use regex::Regex;
use slim_parser::slim::shorthand::IMPLIED_ELEMENT;
use slim_parser::ParseOptions;

use crate::directives::comments::{decode, CommentTag};
use crate::markup::{DirectiveMarker, Document, Element, Node};

use super::ConvertOptions;

/// Elements that never have content.
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Element whose text keeps its line breaks.
const PREFORMATTED_ELEMENT: &str = "pre";

static PRE_LINE_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*").unwrap());
static CONTROL_KEYWORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(if|unless|case|for|while|elsif|else|when)\b").unwrap());

/// Serialize a markup tree to Slim text ending in exactly one newline.
pub fn serialize_to_slim(doc: &Document, options: &ConvertOptions) -> String {
    let mut writer = SlimWriter::new(options.layout());
    if let Some(doctype) = doc.doctype {
        writer.push(0, doctype.keyword_line());
    }
    for node in &doc.nodes {
        writer.node(node, 0);
    }

    tracing::debug!(lines = writer.lines.len(), "serialized slim");
    let mut output = writer.lines.join("\n");
    output.push('\n');
    output
}

/// Build the tag line of an element: name, `#id`, `.class`es and bracketed attributes.
pub fn tag_line(element: &Element) -> String {
    let id = element
        .attr("id")
        .map(str::trim)
        .filter(|id| !id.is_empty());
    let classes: Vec<&str> = element
        .attr("class")
        .map(|class| class.split_whitespace().collect())
        .unwrap_or_default();
    let attributes: Vec<&(String, String)> = element
        .attributes
        .iter()
        .filter(|(key, _)| key != "id" && key != "class")
        .collect();

    let mut line = if element.name == IMPLIED_ELEMENT && (id.is_some() || !classes.is_empty()) {
        String::new()
    } else {
        element.name.clone()
    };
    if let Some(id) = id {
        line.push('#');
        line.push_str(id);
    }
    for class in classes {
        line.push('.');
        line.push_str(class);
    }
    if !attributes.is_empty() {
        line.push_str(&attribute_list(&attributes));
    }

    if line.is_empty() {
        element.name.clone()
    } else {
        line
    }
}

fn attribute_list(attributes: &[&(String, String)]) -> String {
    let parts: Vec<String> = attributes
        .iter()
        .map(|(key, value)| {
            let value = value.replace('\n', " ");
            if value.is_empty() {
                key.clone()
            } else if value.contains('"') {
                format!("{}='{}'", key, value)
            } else {
                format!("{}=\"{}\"", key, value)
            }
        })
        .collect();
    format!("[{}]", parts.join(" "))
}

struct SlimWriter {
    layout: ParseOptions,
    lines: Vec<String>,
}

impl SlimWriter {
    fn new(layout: ParseOptions) -> Self {
        Self {
            layout,
            lines: Vec::new(),
        }
    }

    fn push(&mut self, depth: usize, text: impl AsRef<str>) {
        self.lines
            .push(format!("{}{}", self.layout.indent_string(depth), text.as_ref()));
    }

    fn node(&mut self, node: &Node, depth: usize) {
        match node {
            Node::Element(element) => self.element(element, depth),
            Node::Directive(marker) => self.directive(marker, depth),
            Node::Text(text) => self.text(text, depth),
            Node::Comment(text) => self.comment(text, depth),
        }
    }

    fn children(&mut self, children: &[Node], depth: usize) {
        for child in children {
            self.node(child, depth);
        }
    }

    fn directive(&mut self, marker: &DirectiveMarker, depth: usize) {
        tracing::trace!(code = %marker.code, output = marker.is_output, "directive marker");
        if marker.code.is_empty() {
            self.children(&marker.children, depth);
            return;
        }

        let line = if marker.is_output && !CONTROL_KEYWORD.is_match(&marker.code) {
            format!("= {}", marker.code)
        } else {
            format!("- {}", marker.code)
        };
        self.push(depth, line);
        self.children(&marker.children, depth + 1);
    }

    fn element(&mut self, element: &Element, depth: usize) {
        let tag = tag_line(element);

        if VOID_ELEMENTS.contains(&element.name.as_str()) || element.children.is_empty() {
            self.push(depth, tag);
        } else if let Some(text) = element.single_text_child() {
            self.inline_text(element, tag, text, depth);
        } else {
            self.push(depth, tag);
            self.children(&element.children, depth + 1);
        }
    }

    fn inline_text(&mut self, element: &Element, tag: String, text: &str, depth: usize) {
        let text = text.trim();
        if text.is_empty() {
            self.push(depth, tag);
            return;
        }

        if element.name == PREFORMATTED_ELEMENT {
            let marked = PRE_LINE_BREAK.replace_all(text, r"\n ");
            self.push(depth, format!("{} {}", tag, marked));
            return;
        }

        let lines = non_blank_lines(text);
        if lines.len() > 1 {
            self.push(depth, tag);
            for line in lines {
                self.push(depth + 1, format!("| {}", line));
            }
            return;
        }

        let text = collapse_whitespace(text);
        if text.starts_with('/') {
            self.push(depth, tag);
            self.push(depth + 1, format!("| {}", text));
        } else {
            self.push(depth, format!("{} {}", tag, text));
        }
    }

    fn text(&mut self, text: &str, depth: usize) {
        let lines = non_blank_lines(text);
        if lines.len() > 1 {
            for line in lines {
                self.push(depth, format!("| {}", line));
            }
        } else if !lines.is_empty() {
            self.push(depth, format!("| {}", collapse_whitespace(text)));
        }
    }

    fn comment(&mut self, text: &str, depth: usize) {
        let decoded = decode(text);
        let depth = depth + decoded.extra_indent;
        let body = decoded.body.trim();

        match decoded.tag {
            Some(CommentTag::MultilineCode) => {
                self.push(depth, "ruby:");
                for line in dedented_lines(&decoded.body) {
                    self.push(depth + 1, line);
                }
            }
            Some(CommentTag::MultilineOutput) => match non_blank_lines(body).as_slice() {
                [] => {}
                [only] => self.push(depth, output_line(only)),
                [first, middle @ .., last] => {
                    self.push(depth, format!("{} \\", output_line(first)));
                    for line in middle {
                        self.push(depth + 1, format!("{} \\", line));
                    }
                    self.push(depth + 1, *last);
                }
            },
            Some(CommentTag::Output | CommentTag::OutputBlock) => {
                if !body.is_empty() {
                    self.push(depth, output_line(body));
                }
            }
            Some(CommentTag::Code | CommentTag::CodeBlock) => {
                if !body.is_empty() {
                    self.push(depth, format!("- {}", body));
                }
            }
            Some(CommentTag::End) => {}
            None => match non_blank_lines(body).split_first() {
                None => self.push(depth, "/!"),
                Some((first, rest)) => {
                    self.push(depth, format!("/! {}", first));
                    for line in rest {
                        self.push(depth + 1, line);
                    }
                }
            },
        }
    }
}

/// `= expr`, or `== expr` for an unescaped `<%==` directive.
fn output_line(expression: &str) -> String {
    match expression.strip_prefix('=') {
        Some(raw) => format!("== {}", raw.trim()),
        None => format!("= {}", expression),
    }
}

fn non_blank_lines(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Non-blank lines, right-trimmed, with the indentation they all share removed.
fn dedented_lines(text: &str) -> Vec<&str> {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .collect();
    let shared = lines
        .iter()
        .map(|line| line.len() - line.trim_start_matches([' ', '\t']).len())
        .min()
        .unwrap_or(0);
    lines.into_iter().map(|line| &line[shared..]).collect()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
