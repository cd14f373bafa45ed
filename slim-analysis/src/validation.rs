//! Validation
//!
//!     One pass over the records. Most checks look at a single line in isolation and live in the
//!     three check tables below; the indentation check is the only stateful one and runs inline,
//!     against a stack of open indent levels seeded with a virtual level of -1.
//!
//!     Every finding is a message of the form `Line N: ...`. Validation never fails: defects go
//!     into `errors` or `warnings` and the caller decides what to do with them. A report is valid
//!     when it carries no errors.
//!
//! Check Tables
//!
//!     SYNTAX_CHECKS      errors: text Slim would read as something else
//!     STYLE_CHECKS       warnings: legal but likely unintended
//!     CONVENTION_CHECKS  warnings: Rails helper conventions, only with `check_conventions`
//!
//!     Within a table checks run in declaration order, so messages for one line always come out
//!     in the same order.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use slim_parser::{LineRecord, ParseOptions, Structure};

/// Default limit for the long line warning.
pub const DEFAULT_MAX_LINE_LENGTH: usize = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidateOptions {
    /// Also run the Rails convention checks
    pub check_conventions: bool,

    /// Tabs become errors and inline styles are reported
    pub strict: bool,

    pub max_line_length: usize,

    pub parse: ParseOptions,
}

impl Default for ValidateOptions {
    fn default() -> Self {
        Self {
            check_conventions: false,
            strict: false,
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
            parse: ParseOptions::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    fn from_findings(errors: Vec<String>, warnings: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
            warnings,
        }
    }
}

type Check = fn(&LineRecord, &ValidateOptions) -> Option<String>;

const SYNTAX_CHECKS: &[Check] = &[
    slash_prefix,
    slash_after_head,
    bracket_balance,
    empty_code_marker,
    strict_tabs,
];

const STYLE_CHECKS: &[Check] = &[
    slash_in_text,
    line_length,
    quoted_text,
    long_inline_text,
    lenient_tabs,
    inline_style,
];

const CONVENTION_CHECKS: &[Check] = &[
    stylesheet_link,
    javascript_include,
    image_path,
    form_helpers,
    csrf_token,
    path_helpers,
];

static SLASH_AFTER_HEAD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^([a-z#.][^\s]*)\s+(/[^/].*)$").unwrap());
static EMPTY_CODE_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[=-]\s*$").unwrap());
static SLASH_IN_TEXT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\w+.*\s/\w+").unwrap());
static LONG_INLINE_TEXT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^[a-z#.][^\s]*\s+[^=\-|].{50,}").unwrap());
static STYLESHEET_HREF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"link.*href=["'].*\.(css|scss)"#).unwrap());
static SCRIPT_SRC: Lazy<Regex> = Lazy::new(|| Regex::new(r#"script.*src=["'].*\.js"#).unwrap());
static SRC_ATTRIBUTE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"src=["']"#).unwrap());
static MUTATING_FORM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)^form\[.*method=["'](post|patch|put|delete)"#).unwrap());
static RESOURCE_HREF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"href=["']/(users|posts|articles|products)"#).unwrap());

/// Validate Slim source.
pub fn validate(source: &str, options: &ValidateOptions) -> ValidationReport {
    let structure = Structure::parse(source, &options.parse);

    let mut errors = Vec::new();
    let mut open_levels: Vec<isize> = vec![-1];
    for record in &structure {
        let level = record.indent_level as isize;
        let top = open_levels.last().copied().unwrap_or(-1);
        if level > top + 1 {
            errors.push(finding(
                record,
                format!(
                    "Invalid indentation jump (expected {}, got {})",
                    top + 1,
                    level
                ),
            ));
        }
        while open_levels.last().is_some_and(|&open| open > level) {
            open_levels.pop();
        }
        if open_levels.last().map_or(true, |&open| level > open) {
            open_levels.push(level);
        }

        run_checks(SYNTAX_CHECKS, record, options, &mut errors);
    }

    let mut warnings = Vec::new();
    for record in &structure {
        run_checks(STYLE_CHECKS, record, options, &mut warnings);
    }
    if options.check_conventions {
        for record in &structure {
            run_checks(CONVENTION_CHECKS, record, options, &mut warnings);
        }
    }

    tracing::debug!(
        lines = structure.len(),
        errors = errors.len(),
        warnings = warnings.len(),
        "validated slim source"
    );
    ValidationReport::from_findings(errors, warnings)
}

/// Validate raw bytes. Undecodable input yields an invalid report rather than an error.
pub fn validate_bytes(source: &[u8], options: &ValidateOptions) -> ValidationReport {
    match std::str::from_utf8(source) {
        Ok(text) => validate(text, options),
        Err(err) => ValidationReport::from_findings(
            vec![format!("Failed to read or validate file: {}", err)],
            Vec::new(),
        ),
    }
}

fn run_checks(
    checks: &[Check],
    record: &LineRecord,
    options: &ValidateOptions,
    into: &mut Vec<String>,
) {
    into.extend(
        checks
            .iter()
            .filter_map(|check| check(record, options))
            .map(|message| finding(record, message)),
    );
}

fn finding(record: &LineRecord, message: impl AsRef<str>) -> String {
    format!("Line {}: {}", record.line_number, message.as_ref())
}

const SLASH_AS_COMMENT: &str = "Forward slash will be interpreted as comment.";
const TABS: &str = "Contains tabs (use spaces for indentation)";

fn slash_prefix(record: &LineRecord, _: &ValidateOptions) -> Option<String> {
    let line = &record.content;
    let rest = line.strip_prefix('/')?;
    let comment = rest
        .chars()
        .next()
        .is_some_and(|c| c == '!' || c == '|' || c.is_whitespace());
    (!comment).then(|| format!("{} Use pipe notation for text: | {}", SLASH_AS_COMMENT, line))
}

fn slash_after_head(record: &LineRecord, _: &ValidateOptions) -> Option<String> {
    SLASH_AFTER_HEAD
        .is_match(&record.content)
        .then(|| format!("{} Use pipe notation for text", SLASH_AS_COMMENT))
}

fn bracket_balance(record: &LineRecord, _: &ValidateOptions) -> Option<String> {
    let line = &record.content;
    match (line.contains('['), line.contains(']')) {
        (true, false) => Some("Unclosed attribute bracket".to_string()),
        (false, true) => Some("Unexpected closing bracket".to_string()),
        _ => None,
    }
}

fn empty_code_marker(record: &LineRecord, _: &ValidateOptions) -> Option<String> {
    EMPTY_CODE_MARKER
        .is_match(&record.content)
        .then(|| "Ruby code marker without code".to_string())
}

fn strict_tabs(record: &LineRecord, options: &ValidateOptions) -> Option<String> {
    (options.strict && record.has_tab()).then(|| TABS.to_string())
}

fn slash_in_text(record: &LineRecord, _: &ValidateOptions) -> Option<String> {
    SLASH_IN_TEXT
        .is_match(&record.content)
        .then(|| "Text containing '/' might need pipe notation".to_string())
}

fn line_length(record: &LineRecord, options: &ValidateOptions) -> Option<String> {
    (record.raw_line.chars().count() > options.max_line_length)
        .then(|| format!("Line exceeds {} characters", options.max_line_length))
}

fn quoted_text(record: &LineRecord, _: &ValidateOptions) -> Option<String> {
    record
        .content
        .starts_with('\'')
        .then(|| "Single quote for text interpolation is deprecated".to_string())
}

fn long_inline_text(record: &LineRecord, _: &ValidateOptions) -> Option<String> {
    LONG_INLINE_TEXT
        .is_match(&record.content)
        .then(|| "Long inline text might be better as multiline with pipe notation".to_string())
}

fn lenient_tabs(record: &LineRecord, options: &ValidateOptions) -> Option<String> {
    (!options.strict && record.has_tab()).then(|| TABS.to_string())
}

fn inline_style(record: &LineRecord, options: &ValidateOptions) -> Option<String> {
    (options.strict && record.content.contains("style="))
        .then(|| "Inline styles detected (consider using classes)".to_string())
}

fn stylesheet_link(record: &LineRecord, _: &ValidateOptions) -> Option<String> {
    STYLESHEET_HREF
        .is_match(&record.content)
        .then(|| "Consider using stylesheet_link_tag for CSS files".to_string())
}

fn javascript_include(record: &LineRecord, _: &ValidateOptions) -> Option<String> {
    SCRIPT_SRC
        .is_match(&record.content)
        .then(|| "Consider using javascript_include_tag for JS files".to_string())
}

/// An `img` followed somewhere by a `src` that is neither absolute nor protocol-relative.
fn image_path(record: &LineRecord, _: &ValidateOptions) -> Option<String> {
    let line = &record.content;
    let after_img = line.find("img")? + 3;
    let relative = SRC_ATTRIBUTE
        .find_iter(&line[after_img..])
        .map(|src| &line[after_img + src.end()..])
        .any(|value| !value.starts_with("http") && !value.starts_with("//"));
    relative.then(|| "Consider using image_tag helper for images".to_string())
}

fn form_helpers(record: &LineRecord, _: &ValidateOptions) -> Option<String> {
    let line = &record.content;
    (line.starts_with("form") && !line.contains("form_for") && !line.contains("form_with"))
        .then(|| "Consider using Rails form helpers (form_for, form_with)".to_string())
}

fn csrf_token(record: &LineRecord, _: &ValidateOptions) -> Option<String> {
    MUTATING_FORM
        .is_match(&record.content)
        .then(|| "Ensure CSRF token is included in form".to_string())
}

fn path_helpers(record: &LineRecord, _: &ValidateOptions) -> Option<String> {
    RESOURCE_HREF
        .is_match(&record.content)
        .then(|| "Consider using Rails path helpers instead of hardcoded URLs".to_string())
}
