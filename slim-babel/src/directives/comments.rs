//! Structural comments
//!
//!     Directives that do not open a block are carried through the markup parser as HTML
//!     comments whose body starts with a tag, e.g. `<!--SLIM_OUTPUT:@user.name-->`. The walker
//!     decodes them back into Slim lines. A body can never contain a literal `-->`, so it is
//!     swapped for [ARROW_PLACEHOLDER] on the way in and restored on the way out.
//!
//!     A structural comment may also end in `:INDENT:n`, asking the walker to emit it `n`
//!     levels deeper than the comment node itself sits.

use once_cell::sync::Lazy;
use regex::Regex;

/// Stand-in for `-->` inside a structural comment body.
pub const ARROW_PLACEHOLDER: &str = "__SLIM_ARROW__";

static EXTRA_INDENT: Lazy<Regex> = Lazy::new(|| Regex::new(r":INDENT:(\d+)$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentTag {
    /// A `<% ... %>` spanning several lines, rendered as a `ruby:` block
    MultilineCode,

    /// A `<%= ... %>` spanning several lines, rendered with line continuations
    MultilineOutput,

    OutputBlock,

    /// A single-line `<%= ... %>`
    Output,

    CodeBlock,

    /// Any other `<% ... %>`
    Code,

    /// A block terminator, rendered as nothing
    End,
}

impl CommentTag {
    /// Tags in decoding order.
    pub const ALL: [CommentTag; 7] = [
        CommentTag::MultilineCode,
        CommentTag::MultilineOutput,
        CommentTag::OutputBlock,
        CommentTag::Output,
        CommentTag::CodeBlock,
        CommentTag::Code,
        CommentTag::End,
    ];

    pub fn prefix(self) -> &'static str {
        match self {
            CommentTag::MultilineCode => "SLIM_MULTILINE_CODE:",
            CommentTag::MultilineOutput => "SLIM_MULTILINE_OUTPUT:",
            CommentTag::OutputBlock => "SLIM_OUTPUT_BLOCK:",
            CommentTag::Output => "SLIM_OUTPUT:",
            CommentTag::CodeBlock => "SLIM_CODE_BLOCK:",
            CommentTag::Code => "SLIM_CODE:",
            CommentTag::End => "SLIM_END",
        }
    }
}

/// Render a structural comment as markup.
pub fn encode(tag: CommentTag, body: &str) -> String {
    format!("<!--{}{}-->", tag.prefix(), body.replace("-->", ARROW_PLACEHOLDER))
}

/// A comment node's text, split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedComment {
    /// `None` for a genuine comment written by the author
    pub tag: Option<CommentTag>,

    /// Body with the tag, the indent suffix and the arrow placeholder removed
    pub body: String,

    pub extra_indent: usize,
}

/// Decode the text of a comment node.
pub fn decode(text: &str) -> DecodedComment {
    let mut text = text.trim();
    let mut extra_indent = 0;
    if let Some(captures) = EXTRA_INDENT.captures(text) {
        extra_indent = captures[1].parse().unwrap_or(0);
        text = &text[..captures.get(0).map_or(text.len(), |m| m.start())];
    }

    let tagged = CommentTag::ALL.iter().find_map(|tag| {
        let body = match tag {
            CommentTag::End => (text == tag.prefix()).then_some(""),
            _ => text.strip_prefix(tag.prefix()),
        }?;
        Some((*tag, body))
    });

    match tagged {
        Some((tag, body)) => DecodedComment {
            tag: Some(tag),
            body: body.replace(ARROW_PLACEHOLDER, "-->"),
            extra_indent,
        },
        None => DecodedComment {
            tag: None,
            body: text.to_string(),
            extra_indent,
        },
    }
}
