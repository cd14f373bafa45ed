//! Line Classification
//!
//!     Slim decides what a line is from its first few characters. The rules below are tried in
//!     declaration order and the first one that matches wins, so the order is part of the
//!     grammar: `/!` must be tested before `/ `, and the shorthand `#`/`.` prefixes before the
//!     generic element rule.
//!
//! Classification Order
//!
//!     1. doctype            `doctype` (any case)
//!     2. html comment       `/!`
//!     3. template comment   `/` followed by whitespace
//!     4. code               `-`
//!     5. output             `=`
//!     6. ruby block         `ruby:`
//!     7. text pipe          `|`
//!     8. div shorthand      `#` or `.`
//!     9. element            an ASCII letter
//!     10. plain text        anything else

use super::record::LineKind;

type Rule = fn(&str) -> bool;

/// Classification rules, tried in declaration order.
pub(crate) const LINE_RULES: &[(LineKind, Rule)] = &[
    (LineKind::Doctype, is_doctype),
    (LineKind::HtmlComment, is_html_comment),
    (LineKind::TemplateComment, is_template_comment),
    (LineKind::CodeStatement, is_code),
    (LineKind::OutputStatement, is_output),
    (LineKind::RubyBlockMarker, is_ruby_block),
    (LineKind::TextPipe, is_text_pipe),
    (LineKind::ShorthandDiv, is_shorthand),
    (LineKind::Element, is_element),
];

/// Determine the kind of a trimmed Slim line.
pub fn classify_line(content: &str) -> LineKind {
    LINE_RULES
        .iter()
        .find(|(_, rule)| rule(content))
        .map(|(kind, _)| *kind)
        .unwrap_or(LineKind::PlainText)
}

fn is_doctype(line: &str) -> bool {
    line.get(..7)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("doctype"))
}

fn is_template_comment(line: &str) -> bool {
    let mut chars = line.chars();
    chars.next() == Some('/') && chars.next().is_some_and(char::is_whitespace)
}

fn is_html_comment(line: &str) -> bool {
    line.starts_with("/!")
}

fn is_code(line: &str) -> bool {
    line.starts_with('-')
}

fn is_output(line: &str) -> bool {
    line.starts_with('=')
}

fn is_ruby_block(line: &str) -> bool {
    line.starts_with("ruby:")
}

fn is_text_pipe(line: &str) -> bool {
    line.starts_with('|')
}

fn is_shorthand(line: &str) -> bool {
    line.starts_with('#') || line.starts_with('.')
}

fn is_element(line: &str) -> bool {
    line.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
}
