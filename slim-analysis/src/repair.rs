//! Repair
//!
//!     Two rewrites, run in this order and each optional:
//!
//!         slashes    text that starts with `/` is a comment to Slim. Inline text after an
//!                    element head is moved to a pipe line one level deeper; a standalone line
//!                    becomes a pipe line in place.
//!         multiline  an element with inline text followed by deeper plain text lines becomes
//!                    the bare element plus one pipe line per text line.
//!
//!     Both rewrites work on physical lines, so blank lines and untouched lines come out
//!     exactly as they went in. Every line remembers the source line it came from, and fix
//!     descriptions always use that number.
//!
//!     Repairing already repaired text changes nothing.
//!
//! Multiline Detection
//!
//!     Collection of text lines stops at the first line that is not deeper than the element or
//!     that looks like Slim syntax: a line starting with one of `= - | / ! # .`, or a tag name
//!     immediately followed by `#`, `.` or `[`. This is a heuristic. A child element written as
//!     a bare tag name with text (`span inline`) is indistinguishable from plain text and is
//!     folded into the pipe lines.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use slim_parser::{classify_line, leading_spaces, scan_element_head, LineKind, ParseOptions};

use crate::error::AnalysisError;
use crate::outcome::Outcome;

static SYNTAX_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[=\-|/!#.]").unwrap());
static TAG_WITH_MARKERS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^[a-z]+[#.\[]").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixOptions {
    pub fix_slashes: bool,
    pub fix_multiline: bool,

    /// Report what would change; the caller should not write the result
    pub preview_only: bool,

    pub parse: ParseOptions,
}

impl Default for FixOptions {
    fn default() -> Self {
        Self {
            fix_slashes: true,
            fix_multiline: true,
            preview_only: false,
            parse: ParseOptions::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FixReport {
    /// The repaired text, newline terminated
    pub content: String,

    /// One description per fix, in source order per rewrite
    pub fixes: Vec<String>,

    pub changed: bool,

    pub preview: bool,
}

/// A physical line and the source line it came from.
#[derive(Debug, Clone)]
struct Line {
    origin: usize,
    text: String,
}

impl Line {
    fn new(origin: usize, text: String) -> Self {
        Self { origin, text }
    }

    fn indent(&self) -> &str {
        &self.text[..leading_spaces(&self.text)]
    }

    fn content(&self) -> &str {
        self.text.trim()
    }
}

/// Repair Slim source.
pub fn fix(source: &str, options: &FixOptions) -> FixReport {
    let mut lines: Vec<Line> = source
        .lines()
        .enumerate()
        .map(|(index, text)| Line::new(index + 1, text.to_string()))
        .collect();
    let mut fixes = Vec::new();

    if options.fix_slashes {
        lines = fix_slashes(lines, options, &mut fixes);
    }
    if options.fix_multiline {
        lines = fix_multiline(lines, options, &mut fixes);
    }

    let mut content = lines
        .into_iter()
        .map(|line| line.text)
        .collect::<Vec<_>>()
        .join("\n");
    content.push('\n');

    tracing::debug!(
        fixes = fixes.len(),
        preview = options.preview_only,
        "repaired slim source"
    );
    FixReport {
        content,
        changed: !fixes.is_empty(),
        fixes,
        preview: options.preview_only,
    }
}

/// Batch-safe [fix].
pub fn fix_str(source: &str, options: &FixOptions) -> Outcome<FixReport> {
    Outcome::ok(fix(source, options))
}

/// Repair raw bytes, failing when they are not UTF-8.
pub fn try_fix_bytes(source: &[u8], options: &FixOptions) -> Result<FixReport, AnalysisError> {
    Ok(fix(std::str::from_utf8(source)?, options))
}

fn fix_slashes(lines: Vec<Line>, options: &FixOptions, fixes: &mut Vec<String>) -> Vec<Line> {
    let mut fixed = Vec::with_capacity(lines.len());
    for line in lines {
        let content = line.content();
        let indent = line.indent();

        if let Some((head, text)) = slash_after_head(content) {
            fixed.push(Line::new(line.origin, format!("{}{}", indent, head)));
            fixed.push(Line::new(
                line.origin,
                format!("{}{}| {}", indent, options.parse.indent_string(1), text),
            ));
        } else if is_bare_slash_text(content) {
            fixed.push(Line::new(line.origin, format!("{}| {}", indent, content)));
        } else {
            fixed.push(line);
            continue;
        }
        fixes.push(format!("slash text at line {}", line.origin));
    }
    fixed
}

/// The head and text of an element line whose inline text starts with a single slash.
fn slash_after_head(content: &str) -> Option<(&str, &str)> {
    if !classify_line(content).is_element() {
        return None;
    }
    let head = scan_element_head(content)?;
    let text = head.inline_text()?;
    (text.starts_with('/') && !text.starts_with("//")).then_some((head.head, text))
}

fn is_bare_slash_text(content: &str) -> bool {
    let kind = classify_line(content);
    content.starts_with('/') && kind != LineKind::HtmlComment && kind != LineKind::TemplateComment
}

fn fix_multiline(lines: Vec<Line>, options: &FixOptions, fixes: &mut Vec<String>) -> Vec<Line> {
    let mut fixed = Vec::with_capacity(lines.len());
    let mut index = 0;

    while index < lines.len() {
        let line = &lines[index];
        if let Some((head, first_text)) = element_with_text(line.content()) {
            let depth = line.indent().len();
            let mut texts = vec![first_text];
            let mut next = index + 1;
            while let Some(candidate) = lines.get(next) {
                if candidate.indent().len() <= depth || is_syntax(candidate.content()) {
                    break;
                }
                texts.push(candidate.content());
                next += 1;
            }

            if texts.len() > 1 {
                let indent = line.indent();
                let child_indent = format!("{}{}", indent, options.parse.indent_string(1));
                fixed.push(Line::new(line.origin, format!("{}{}", indent, head)));
                fixed.extend(lines[index..next].iter().zip(&texts).map(|(source, text)| {
                    Line::new(source.origin, format!("{}| {}", child_indent, text))
                }));
                fixes.push(format!("multiline text at line {}", line.origin));
                index = next;
                continue;
            }
        }

        fixed.push(line.clone());
        index += 1;
    }
    fixed
}

fn element_with_text(content: &str) -> Option<(&str, &str)> {
    if !classify_line(content).is_element() {
        return None;
    }
    let head = scan_element_head(content)?;
    Some((head.head, head.inline_text()?))
}

fn is_syntax(content: &str) -> bool {
    content.is_empty() || SYNTAX_PREFIX.is_match(content) || TAG_WITH_MARKERS.is_match(content)
}
