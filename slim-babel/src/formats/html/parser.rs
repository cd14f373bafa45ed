//! HTML parsing (HTML/ERB → markup tree)
//!
//! Pipeline: source → doctype stripped → directives preprocessed → html5ever RcDom → [Document]

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::directives::{preprocess, MARKER_ATTRIBUTE, MARKER_ELEMENT};
use crate::doctype::strip_doctype;
use crate::markup::{DirectiveMarker, Document, Element, Node};

static ROOT_ELEMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<html").unwrap());

/// Parse HTML, possibly carrying ERB directives, into a markup tree.
///
/// Sources that mention an `<html` tag are treated as whole documents and only the root element
/// is kept. Anything else is a fragment: the head and body the parser implies are dissolved and
/// their children become the top-level nodes.
pub fn parse_html(source: &str) -> Document {
    let (doctype, source) = strip_doctype(source);
    let whole_document = ROOT_ELEMENT.is_match(&source);
    let markup = preprocess(&source);

    let dom = parse_document(RcDom::default(), Default::default()).one(markup);
    let top_level = dom.document.children.borrow();

    let nodes = if whole_document {
        match top_level.iter().find(|handle| is_element(handle, "html")) {
            Some(root) => convert_handle(root).into_iter().collect(),
            None => convert_all(top_level.iter()),
        }
    } else {
        let mut nodes = Vec::new();
        for handle in top_level.iter() {
            if is_element(handle, "html") {
                for child in handle.children.borrow().iter() {
                    if is_element(child, "head") || is_element(child, "body") {
                        nodes.extend(convert_all(child.children.borrow().iter()));
                    } else {
                        nodes.extend(convert_handle(child));
                    }
                }
            } else {
                nodes.extend(convert_handle(handle));
            }
        }
        nodes
    };

    tracing::debug!(
        whole_document,
        doctype = ?doctype,
        top_level = nodes.len(),
        "parsed markup"
    );
    Document::new(doctype, nodes)
}

fn is_element(handle: &Handle, tag: &str) -> bool {
    matches!(&handle.data, NodeData::Element { name, .. } if &*name.local == tag)
}

fn convert_all<'a>(handles: impl Iterator<Item = &'a Handle>) -> Vec<Node> {
    handles.filter_map(convert_handle).collect()
}

fn convert_handle(handle: &Handle) -> Option<Node> {
    match &handle.data {
        NodeData::Element {
            name,
            attrs,
            template_contents,
            ..
        } => {
            let children = match template_contents.borrow().as_ref() {
                Some(contents) => convert_all(contents.children.borrow().iter()),
                None => convert_all(handle.children.borrow().iter()),
            };
            let attributes: Vec<(String, String)> = attrs
                .borrow()
                .iter()
                .map(|attr| {
                    let key = match &attr.name.prefix {
                        Some(prefix) => format!("{}:{}", prefix, attr.name.local),
                        None => attr.name.local.to_string(),
                    };
                    (key, attr.value.to_string())
                })
                .collect();

            let marker = attributes
                .iter()
                .find(|(key, _)| &*name.local == MARKER_ELEMENT && key == MARKER_ATTRIBUTE)
                .map(|(_, value)| value.clone());
            if let Some(directive) = marker {
                return Some(Node::Directive(DirectiveMarker::from_attribute(
                    &directive, children,
                )));
            }

            Some(Node::Element(Element {
                name: name.local.to_string(),
                attributes,
                children,
            }))
        }
        NodeData::Text { contents } => Some(Node::Text(contents.borrow().to_string())),
        NodeData::Comment { contents } => Some(Node::Comment(contents.to_string())),
        NodeData::Document
        | NodeData::Doctype { .. }
        | NodeData::ProcessingInstruction { .. } => None,
    }
}
