//! Line records
//!
//!     A [LineRecord] is one non-blank physical line of Slim source, annotated with its indent
//!     level and its [LineKind]. Blank lines never become records, but records keep their
//!     original 1-based line number, so gaps in the numbering are exactly where blank lines were.
//!
//!     The indent level is derived from leading *space* characters only. Tabs are left alone
//!     (they are stripped from the content like any other whitespace but do not count towards
//!     the level); validation reports them separately.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::classification::classify_line;

/// Default number of spaces per indentation level.
pub const DEFAULT_INDENT_WIDTH: usize = 2;

/// Options shared by everything that turns Slim text into records and back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseOptions {
    /// Spaces per indentation level. A width of zero is treated as one.
    pub indent_width: usize,
}

impl ParseOptions {
    pub fn new(indent_width: usize) -> Self {
        Self { indent_width }
    }

    /// The indent width, never zero.
    pub fn width(&self) -> usize {
        self.indent_width.max(1)
    }

    /// Leading whitespace for the given level.
    pub fn indent_string(&self, level: usize) -> String {
        " ".repeat(self.width() * level)
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            indent_width: DEFAULT_INDENT_WIDTH,
        }
    }
}

/// The classification of a Slim line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    /// `doctype html`
    Doctype,

    /// `/! visible html comment`
    HtmlComment,

    /// `/ template comment`
    TemplateComment,

    /// `- ruby code`
    CodeStatement,

    /// `= ruby output`
    OutputStatement,

    /// `ruby:` embedded block header
    RubyBlockMarker,

    /// `| literal text`
    TextPipe,

    /// `#id` or `.class`, an implied div
    ShorthandDiv,

    /// Anything starting with an element name
    Element,

    /// Everything else
    PlainText,
}

impl LineKind {
    /// Comment lines, visible or not.
    pub fn is_comment(self) -> bool {
        matches!(self, LineKind::HtmlComment | LineKind::TemplateComment)
    }

    /// Lines that open an element, explicitly named or implied by shorthand.
    pub fn is_element(self) -> bool {
        matches!(self, LineKind::Element | LineKind::ShorthandDiv)
    }
}

impl fmt::Display for LineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LineKind::Doctype => "doctype",
            LineKind::HtmlComment => "html-comment",
            LineKind::TemplateComment => "template-comment",
            LineKind::CodeStatement => "code",
            LineKind::OutputStatement => "output",
            LineKind::RubyBlockMarker => "ruby-block",
            LineKind::TextPipe => "text-pipe",
            LineKind::ShorthandDiv => "div-shorthand",
            LineKind::Element => "element",
            LineKind::PlainText => "text",
        };
        write!(f, "{}", name)
    }
}

/// One classified, indent-leveled line of Slim source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRecord {
    /// The original line, leading whitespace included
    pub raw_line: String,

    /// The line with surrounding whitespace removed
    pub content: String,

    /// Leading spaces divided by the indent width
    pub indent_level: usize,

    /// 1-based position in the source
    pub line_number: usize,

    pub line_kind: LineKind,
}

impl LineRecord {
    /// Build a record from a physical line. Returns `None` for blank lines.
    pub fn from_line(line: &str, line_number: usize, options: &ParseOptions) -> Option<Self> {
        let content = line.trim();
        if content.is_empty() {
            return None;
        }

        Some(Self {
            raw_line: line.to_string(),
            content: content.to_string(),
            indent_level: leading_spaces(line) / options.width(),
            line_number,
            line_kind: classify_line(content),
        })
    }

    /// The leading run of spaces of the raw line, verbatim.
    pub fn indent(&self) -> &str {
        &self.raw_line[..leading_spaces(&self.raw_line)]
    }

    pub fn has_tab(&self) -> bool {
        self.raw_line.contains('\t')
    }
}

/// Count of leading space characters (tabs are not spaces).
pub fn leading_spaces(line: &str) -> usize {
    line.bytes().take_while(|b| *b == b' ').count()
}

/// Write records back as Slim text.
///
/// Indentation is renormalized: the shallowest record lands at column zero and every level is
/// rendered with `options.indent_width` spaces. Lines are joined with `\n`, without a trailing
/// newline.
pub fn relinearize(records: &[LineRecord], options: &ParseOptions) -> String {
    let min_level = records
        .iter()
        .map(|record| record.indent_level)
        .min()
        .unwrap_or(0);

    records
        .iter()
        .map(|record| {
            format!(
                "{}{}",
                options.indent_string(record.indent_level - min_level),
                record.content
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
