//! Directive rewrite passes
//!
//!     Each pass is a pure `&str -> String` rewrite. [preprocess] folds the source through
//!     [PASSES] in declaration order; that order is load-bearing:
//!
//!         a. protect_attribute_directives   directives inside a tag become placeholders
//!         b. multiline_code                 `<%\n ... \n%>` -> code block comment
//!         c. multiline_output               `<%=\n ... \n%>` -> output block comment, or one line
//!                                           when it ends in `do |x|`
//!         d. simple_output                  `<%= expr %>` -> output comment (do blocks skipped)
//!         e. block_openers                  `if` / `unless` / `case` / `for` / `until` / `while`
//!                                           and `... do |x|` -> open marker
//!         f. branches                       `else` / `elsif` / `when` -> close + open marker
//!         g. terminators                    `end` / `}` -> close marker
//!         h. catch_all                      anything left -> code comment
//!         i. restore_attribute_directives   placeholders back to the original directive text
//!
//!     Block openers must only ever see directives that the earlier passes left in place, and
//!     the attribute placeholders must wrap every other pass so that no rewrite lands inside a
//!     tag. Nothing here fails: a directive that fits no shape ends up as a code comment.
//!
//!     Markers are `template` elements. HTML parsing inserts a template wherever it appears,
//!     including between table rows and select options, so the nesting of the markers is the
//!     nesting of the directives. Directive code is carried with only its ends trimmed; the one
//!     exception is a multiline output opener ending in `do`, which is joined onto one line.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::comments::{encode, CommentTag};

/// Reserved attribute carrying a block directive on a marker element.
pub const MARKER_ATTRIBUTE: &str = "data-slim-directive";

/// Element planted for block directives.
pub const MARKER_ELEMENT: &str = "template";

static MULTILINE_CODE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<%[ \t]*\r?\n((?:[^%]|%[^>])*?)\r?\n[ \t]*-?%>").unwrap()
});
static MULTILINE_OUTPUT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<%=[ \t]*\r?\n((?:[^%]|%[^>])*?)\r?\n[ \t]*-?%>").unwrap()
});
static OUTPUT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<%=((?:[^%]|%[^>])*?)-?%>").unwrap());
static DIRECTIVE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<%([-=])?((?:[^%]|%[^>])*?)-?%>").unwrap());
static DO_BLOCK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bdo\s*(\|[^|]*\|)?\s*$").unwrap());
static BLOCK_KEYWORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(case|if|for|unless|until|while)\s").unwrap());
static BRANCH_KEYWORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(else$|elsif\s|when\s)").unwrap());
static ATTRIBUTE_PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"__SLIM_ATTR_DIRECTIVE_(\d+)__").unwrap());

/// State threaded through one preprocessing run.
#[derive(Debug, Default)]
pub struct RewriteContext {
    attribute_directives: Vec<String>,
    rewrites: usize,
}

impl RewriteContext {
    fn protect(&mut self, directive: &str) -> String {
        let placeholder = format!("__SLIM_ATTR_DIRECTIVE_{}__", self.attribute_directives.len());
        self.attribute_directives.push(directive.to_string());
        self.rewrites += 1;
        placeholder
    }

    fn rewrote(&mut self) {
        self.rewrites += 1;
    }
}

/// One named rewrite step.
pub struct Pass {
    pub name: &'static str,
    pub rewrite: fn(&str, &mut RewriteContext) -> String,
}

/// All passes, in the order they must run.
pub const PASSES: &[Pass] = &[
    Pass {
        name: "protect_attribute_directives",
        rewrite: protect_attribute_directives,
    },
    Pass {
        name: "multiline_code",
        rewrite: multiline_code,
    },
    Pass {
        name: "multiline_output",
        rewrite: multiline_output,
    },
    Pass {
        name: "simple_output",
        rewrite: simple_output,
    },
    Pass {
        name: "block_openers",
        rewrite: block_openers,
    },
    Pass {
        name: "branches",
        rewrite: branches,
    },
    Pass {
        name: "terminators",
        rewrite: terminators,
    },
    Pass {
        name: "catch_all",
        rewrite: catch_all,
    },
    Pass {
        name: "restore_attribute_directives",
        rewrite: restore_attribute_directives,
    },
];

/// Rewrite every embedded directive in `source` into markup the HTML parser can nest.
pub fn preprocess(source: &str) -> String {
    let mut context = RewriteContext::default();
    PASSES.iter().fold(source.to_string(), |text, pass| {
        context.rewrites = 0;
        let rewritten = (pass.rewrite)(&text, &mut context);
        tracing::debug!(pass = pass.name, rewrites = context.rewrites, "directive pass");
        rewritten
    })
}

/// (a) Swap every directive that sits between a tag's `<` and `>` for a placeholder.
fn protect_attribute_directives(text: &str, context: &mut RewriteContext) -> String {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut copied = 0;
    let mut i = 0;

    while i < bytes.len() {
        let opens_tag = bytes[i] == b'<'
            && bytes
                .get(i + 1)
                .is_some_and(|next| next.is_ascii_alphabetic() || *next == b'/');
        if !opens_tag {
            i += 1;
            continue;
        }

        let mut j = i + 1;
        let mut quote: Option<u8> = None;
        while j < bytes.len() {
            if bytes[j..].starts_with(b"<%") {
                let Some(close) = find(bytes, j + 2, b"%>") else {
                    j = bytes.len();
                    break;
                };
                out.push_str(&text[copied..j]);
                out.push_str(&context.protect(&text[j..close + 2]));
                copied = close + 2;
                j = close + 2;
                continue;
            }
            match (quote, bytes[j]) {
                (Some(q), b) if b == q => quote = None,
                (None, b'"' | b'\'') if bytes[j - 1] == b'=' => quote = Some(bytes[j]),
                (None, b'>') => {
                    j += 1;
                    break;
                }
                _ => {}
            }
            j += 1;
        }
        i = j;
    }

    out.push_str(&text[copied..]);
    out
}

/// (b) Code directives whose delimiters sit on their own lines.
fn multiline_code(text: &str, context: &mut RewriteContext) -> String {
    MULTILINE_CODE
        .replace_all(text, |captures: &Captures| {
            context.rewrote();
            let body = captures[1].trim_end().trim_start_matches(['\r', '\n']);
            encode(CommentTag::MultilineCode, body)
        })
        .into_owned()
}

/// (c) Output directives whose delimiters sit on their own lines.
fn multiline_output(text: &str, context: &mut RewriteContext) -> String {
    MULTILINE_OUTPUT
        .replace_all(text, |captures: &Captures| {
            context.rewrote();
            let code = captures[1].trim();
            if DO_BLOCK.is_match(code) {
                format!("<%= {} %>", collapse_whitespace(code))
            } else {
                encode(CommentTag::MultilineOutput, code)
            }
        })
        .into_owned()
}

/// (d) Output directives that do not open a block.
fn simple_output(text: &str, context: &mut RewriteContext) -> String {
    OUTPUT
        .replace_all(text, |captures: &Captures| {
            let code = captures[1].trim();
            if DO_BLOCK.is_match(code) {
                return captures[0].to_string();
            }
            context.rewrote();
            if code.contains('\n') {
                encode(CommentTag::MultilineOutput, code)
            } else {
                encode(CommentTag::Output, code)
            }
        })
        .into_owned()
}

/// (e) Conditionals, loops and `do` blocks open a marker that stays open.
fn block_openers(text: &str, context: &mut RewriteContext) -> String {
    rewrite_directives(text, |kind, code| {
        if !(BLOCK_KEYWORD.is_match(code) || DO_BLOCK.is_match(code)) {
            return None;
        }
        context.rewrote();
        let prefix = if kind == Some('=') { "=" } else { "" };
        Some(open_marker(&format!("{}{}", prefix, code)))
    })
}

/// (f) Branches close the current marker and open a sibling.
fn branches(text: &str, context: &mut RewriteContext) -> String {
    rewrite_directives(text, |kind, code| {
        if kind == Some('=') || !BRANCH_KEYWORD.is_match(code) {
            return None;
        }
        context.rewrote();
        Some(format!("</{}>{}", MARKER_ELEMENT, open_marker(code)))
    })
}

/// (g) Block terminators close the current marker.
fn terminators(text: &str, context: &mut RewriteContext) -> String {
    rewrite_directives(text, |kind, code| {
        if kind == Some('=') || !matches!(code, "end" | "}") {
            return None;
        }
        context.rewrote();
        Some(format!("</{}>", MARKER_ELEMENT))
    })
}

/// (h) Whatever is left becomes a single-line comment.
fn catch_all(text: &str, context: &mut RewriteContext) -> String {
    rewrite_directives(text, |kind, code| {
        context.rewrote();
        if code.is_empty() {
            return Some(String::new());
        }
        let tag = if kind == Some('=') {
            CommentTag::Output
        } else {
            CommentTag::Code
        };
        Some(encode(tag, code))
    })
}

/// (i) Put the directives protected by (a) back.
fn restore_attribute_directives(text: &str, context: &mut RewriteContext) -> String {
    let directives = std::mem::take(&mut context.attribute_directives);
    ATTRIBUTE_PLACEHOLDER
        .replace_all(text, |captures: &Captures| {
            let restored = captures[1]
                .parse::<usize>()
                .ok()
                .and_then(|index| directives.get(index));
            match restored {
                Some(directive) => {
                    context.rewrote();
                    directive.clone()
                }
                None => captures[0].to_string(),
            }
        })
        .into_owned()
}

/// Apply `rewrite` to every remaining directive. `None` leaves the directive untouched.
///
/// The closure receives the directive kind (`-`, `=` or none) and the trimmed code.
fn rewrite_directives<F>(text: &str, mut rewrite: F) -> String
where
    F: FnMut(Option<char>, &str) -> Option<String>,
{
    DIRECTIVE
        .replace_all(text, |captures: &Captures| {
            let kind = captures
                .get(1)
                .and_then(|m| m.as_str().chars().next());
            rewrite(kind, captures[2].trim()).unwrap_or_else(|| captures[0].to_string())
        })
        .into_owned()
}

fn open_marker(directive: &str) -> String {
    format!(
        r#"<{} {}="{}">"#,
        MARKER_ELEMENT,
        MARKER_ATTRIBUTE,
        directive.replace('&', "&amp;").replace('"', "&quot;")
    )
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn find(haystack: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    haystack
        .get(from..)?
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|offset| from + offset)
}
