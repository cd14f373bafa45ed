//! Property-based tests across conversion and analysis
//!
//! Markup is generated from a small tree of elements, text and output directives, converted,
//! and the Slim that comes out is fed back through the parser and the consumers.

use proptest::prelude::*;
use slim::{
    convert, fix, try_extract, validate, ConvertOptions, ExtractOptions, FixOptions, LineKind,
    ParseOptions, Structure, ValidateOptions,
};

#[derive(Debug, Clone)]
enum Piece {
    Element {
        tag: &'static str,
        class: Option<String>,
        children: Vec<Piece>,
    },
    Text(String),
    Output(String),
}

const TAGS: &[&str] = &[
    "div", "section", "article", "p", "span", "ul", "li", "em", "strong",
];

impl Piece {
    fn render(&self, html: &mut String) {
        match self {
            Piece::Element {
                tag,
                class,
                children,
            } => {
                html.push('<');
                html.push_str(tag);
                if let Some(class) = class {
                    html.push_str(&format!(" class=\"{}\"", class));
                }
                html.push('>');
                for child in children {
                    child.render(html);
                }
                html.push_str(&format!("</{}>", tag));
            }
            Piece::Text(text) => html.push_str(text),
            Piece::Output(code) => html.push_str(&format!("<%= {} %>", code)),
        }
    }

    fn outputs(&self) -> usize {
        match self {
            Piece::Element { children, .. } => children.iter().map(Piece::outputs).sum(),
            Piece::Text(_) => 0,
            Piece::Output(_) => 1,
        }
    }
}

fn piece() -> impl Strategy<Value = Piece> {
    let leaf = prop_oneof![
        "[a-z]{1,8}( [a-z]{1,8}){0,3}".prop_map(Piece::Text),
        "[a-z]{1,5}".prop_map(|name| Piece::Output(format!("@item_{}", name))),
    ];
    leaf.prop_recursive(4, 32, 4, |inner| {
        (
            prop::sample::select(TAGS),
            prop::option::of("[a-z]{1,6}"),
            prop::collection::vec(inner, 0..4),
        )
            .prop_map(|(tag, class, children)| Piece::Element {
                tag,
                class,
                children,
            })
    })
}

/// A root div around generated content, so there is always at least one element.
fn document() -> impl Strategy<Value = (String, usize)> {
    prop::collection::vec(piece(), 1..4).prop_map(|children| {
        let root = Piece::Element {
            tag: "div",
            class: None,
            children,
        };
        let mut html = String::new();
        root.render(&mut html);
        (html, root.outputs())
    })
}

const HEADS: &[&str] = &["p", "span.price", "div", "a[href=\"/x\"]", ".note", "#main"];
const TEXTS: &[&str] = &["Hello", "/month", "more text", "//keep", "= @x"];

fn slim_line() -> impl Strategy<Value = String> {
    let head = prop::sample::select(HEADS);
    let text = prop::sample::select(TEXTS);
    (0usize..4, head, prop::option::of(text), any::<bool>()).prop_map(
        |(level, head, text, bare_text)| {
            let indent = "  ".repeat(level);
            match (text, bare_text) {
                (Some(text), true) => format!("{}{}", indent, text),
                (Some(text), false) => format!("{}{} {}", indent, head, text),
                (None, _) => format!("{}{}", indent, head),
            }
        },
    )
}

proptest! {
    #[test]
    fn conversion_ends_with_one_newline_and_has_no_blank_lines((html, _) in document()) {
        let output = convert(&html, &ConvertOptions::default()).unwrap();
        prop_assert!(output.ends_with('\n'));
        prop_assert!(!output.ends_with("\n\n"));
        for line in output.trim_end_matches('\n').split('\n') {
            prop_assert!(!line.trim().is_empty(), "blank line in {:?}", output);
        }
    }

    #[test]
    fn conversion_output_reparses_cleanly((html, outputs) in document()) {
        let output = convert(&html, &ConvertOptions::default()).unwrap();
        let structure = Structure::parse(&output, &ParseOptions::default());

        let output_lines: Vec<_> = structure
            .iter()
            .filter(|record| record.content.starts_with("= @item_"))
            .collect();
        prop_assert_eq!(output_lines.len(), outputs);
        for record in output_lines {
            prop_assert_eq!(record.line_kind, LineKind::OutputStatement);
        }

        let report = validate(&output, &ValidateOptions::default());
        prop_assert!(
            report.errors.iter().all(|error| !error.contains("Invalid indentation jump")),
            "{:?}\n{}",
            report.errors,
            output
        );
    }

    #[test]
    fn outline_never_reaches_its_depth((html, _) in document(), depth in 0usize..6) {
        let output = convert(&html, &ConvertOptions::default()).unwrap();
        let extraction = try_extract(&output, &ExtractOptions::outline(depth)).unwrap();
        let structure = Structure::parse(&extraction.content, &ParseOptions::default());
        for record in &structure {
            prop_assert!(record.indent_level < depth);
        }
    }

    #[test]
    fn repair_is_idempotent(lines in prop::collection::vec(slim_line(), 1..12)) {
        let source = lines.join("\n");
        let first = fix(&source, &FixOptions::default());
        let second = fix(&first.content, &FixOptions::default());
        prop_assert_eq!(&second.content, &first.content);
        prop_assert!(second.fixes.is_empty(), "{:?}", second.fixes);
    }
}
