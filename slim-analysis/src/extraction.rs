//! Extraction
//!
//!     Cut a part out of a Slim document. Three modes, and exactly one of them runs:
//!
//!         1. outline    keep every record shallower than a depth
//!         2. selector   keep every block whose root matches a selector, descendants included
//!         3. sections   keep or drop blocks by element name, class or id
//!
//!     When several are configured the first one in that list wins, unless
//!     `reject_conflicting_modes` asks for an error instead.
//!
//!     The selected records then go through two cleanups: the optional removal of a single
//!     wrapping element (never in outline mode), and the removal of comments left with nothing
//!     under or after them. Finally the records are written back with indentation renormalized
//!     so the shallowest one lands at column zero.
//!
//! Section Names
//!
//!     Names are given as lists whose items may themselves be comma separated. They are
//!     trimmed and lowercased. `doctype` matches the doctype line; `script`, `style`, `link`
//!     and `meta` match any line that starts with the name; every other name matches an
//!     element line by tag name, class or id. A block matched by a name is taken whole.

use serde::{Deserialize, Serialize};
use slim_parser::{relinearize, LineKind, LineRecord, ParseOptions, Selector, Structure};

use crate::error::AnalysisError;
use crate::outcome::Outcome;

/// Removed when no keep or remove names are given.
pub const DEFAULT_REMOVE: &[&str] = &["doctype", "head", "nav", "header", "footer", "script"];

const PREFIX_NAMES: &[&str] = &["script", "style", "link", "meta"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractOptions {
    /// Keep records shallower than this depth
    pub outline: Option<usize>,

    pub selector: Option<String>,

    pub keep: Vec<String>,

    pub remove: Vec<String>,

    /// Drop a single element wrapping everything that was extracted
    pub remove_wrapper: bool,

    /// The remove list used when neither `keep` nor `remove` is given
    pub default_remove: Vec<String>,

    /// Fail instead of picking one mode when more than one is configured
    pub reject_conflicting_modes: bool,

    pub parse: ParseOptions,
}

impl ExtractOptions {
    pub fn outline(depth: usize) -> Self {
        Self {
            outline: Some(depth),
            ..Self::default()
        }
    }

    pub fn selector(selector: impl Into<String>) -> Self {
        Self {
            selector: Some(selector.into()),
            ..Self::default()
        }
    }

    pub fn sections<K, R>(keep: K, remove: R) -> Self
    where
        K: IntoIterator,
        K::Item: Into<String>,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        Self {
            keep: keep.into_iter().map(Into::into).collect(),
            remove: remove.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    fn configured_modes(&self) -> Vec<&'static str> {
        let mut modes = Vec::new();
        if self.outline.is_some() {
            modes.push("outline");
        }
        if self.selector.is_some() {
            modes.push("selector");
        }
        if !self.keep.is_empty() || !self.remove.is_empty() {
            modes.push("keep/remove");
        }
        modes
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            outline: None,
            selector: None,
            keep: Vec::new(),
            remove: Vec::new(),
            remove_wrapper: false,
            default_remove: DEFAULT_REMOVE.iter().map(|name| name.to_string()).collect(),
            reject_conflicting_modes: false,
            parse: ParseOptions::default(),
        }
    }
}

/// What an extraction did. Outline and selector summaries carry a `mode` key; the
/// keep/remove summary is just `{removed, kept}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum ExtractionSummary {
    Outline { depth: usize },
    Selector { selector: String },
    #[serde(untagged)]
    Sections {
        removed: Vec<String>,
        kept: Option<Vec<String>>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Extraction {
    /// The extracted Slim text, newline terminated
    pub content: String,

    #[serde(flatten)]
    pub summary: ExtractionSummary,
}

/// Extract part of a Slim document.
pub fn try_extract(source: &str, options: &ExtractOptions) -> Result<Extraction, AnalysisError> {
    let modes = options.configured_modes();
    if options.reject_conflicting_modes && modes.len() > 1 {
        return Err(AnalysisError::Configuration(format!(
            "only one extraction mode may be given, got {}",
            modes.join(", ")
        )));
    }

    let structure = Structure::parse(source, &options.parse);
    if structure.is_empty() {
        return Err(AnalysisError::Reference("no content to extract".to_string()));
    }

    let (mut records, summary) = if let Some(depth) = options.outline {
        (outline(&structure, depth), ExtractionSummary::Outline { depth })
    } else if let Some(selector) = &options.selector {
        let parsed = Selector::parse(selector)?;
        (
            select(&structure, &parsed),
            ExtractionSummary::Selector {
                selector: selector.clone(),
            },
        )
    } else {
        let keep = normalize_names(&options.keep);
        let mut remove = normalize_names(&options.remove);
        if keep.is_empty() && remove.is_empty() {
            remove = normalize_names(&options.default_remove);
        }
        let records = sections(&structure, &keep, &remove);
        let kept = (!keep.is_empty()).then_some(keep);
        (
            records,
            ExtractionSummary::Sections {
                removed: remove,
                kept,
            },
        )
    };

    if options.remove_wrapper && options.outline.is_none() {
        records = remove_wrapper(records);
    }
    let records = drop_orphan_comments(records);

    tracing::debug!(
        source_lines = structure.len(),
        extracted_lines = records.len(),
        summary = ?summary,
        "extracted slim content"
    );

    let mut content = relinearize(&records, &options.parse);
    content.push('\n');
    Ok(Extraction { content, summary })
}

/// Batch-safe [try_extract].
pub fn extract_str(source: &str, options: &ExtractOptions) -> Outcome<Extraction> {
    try_extract(source, options).into()
}

/// Batch-safe extraction from raw bytes.
pub fn extract_bytes(source: &[u8], options: &ExtractOptions) -> Outcome<Extraction> {
    std::str::from_utf8(source)
        .map_err(AnalysisError::from)
        .and_then(|text| try_extract(text, options))
        .into()
}

fn outline(structure: &Structure, depth: usize) -> Vec<LineRecord> {
    structure
        .iter()
        .filter(|record| record.indent_level < depth)
        .cloned()
        .collect()
}

/// Every matching block that is not already inside a kept block.
fn select(structure: &Structure, selector: &Selector) -> Vec<LineRecord> {
    let mut records = Vec::new();
    let mut index = 0;
    while index < structure.len() {
        if selector.matches(structure, index) {
            let end = structure.subtree_end(index);
            records.extend_from_slice(&structure.records()[index..end]);
            index = end;
        } else {
            index += 1;
        }
    }
    records
}

fn sections(structure: &Structure, keep: &[String], remove: &[String]) -> Vec<LineRecord> {
    let mut records = Vec::new();
    let mut skip_under: Option<usize> = None;
    let mut keep_under: Option<usize> = None;

    for record in structure {
        let level = record.indent_level;
        if let Some(skipped) = skip_under {
            if level > skipped {
                continue;
            }
            skip_under = None;
        }
        if keep_under.is_some_and(|kept| level <= kept) {
            keep_under = None;
        }

        if !keep.is_empty() {
            if keep_under.is_some() {
                records.push(record.clone());
            } else if matches_any_name(record, keep) {
                keep_under = Some(level);
                records.push(record.clone());
            }
        } else if matches_any_name(record, remove) {
            skip_under = Some(level);
        } else {
            records.push(record.clone());
        }
    }

    records
}

fn normalize_names(names: &[String]) -> Vec<String> {
    names
        .iter()
        .flat_map(|name| name.split(','))
        .map(|name| name.trim().to_lowercase())
        .filter(|name| !name.is_empty())
        .collect()
}

fn matches_any_name(record: &LineRecord, names: &[String]) -> bool {
    names.iter().any(|name| matches_name(record, name))
}

fn matches_name(record: &LineRecord, name: &str) -> bool {
    if name == "doctype" {
        return record.line_kind == LineKind::Doctype;
    }
    if PREFIX_NAMES.contains(&name) {
        return record.content.starts_with(name);
    }
    if !record.line_kind.is_element() {
        return false;
    }
    slim_parser::scan_element_head(&record.content).is_some_and(|head| {
        head.effective_element().eq_ignore_ascii_case(name)
            || head.id == Some(name)
            || head.has_class(name)
    })
}

/// Drop the only record at the minimum level if it is an element, lifting everything under it.
fn remove_wrapper(records: Vec<LineRecord>) -> Vec<LineRecord> {
    let Some(min_level) = records.iter().map(|record| record.indent_level).min() else {
        return records;
    };
    let mut roots = records
        .iter()
        .enumerate()
        .filter(|(_, record)| record.indent_level == min_level);
    let (Some((wrapper, root)), None) = (roots.next(), roots.next()) else {
        return records;
    };
    if !root.line_kind.is_element() {
        return records;
    }

    records
        .into_iter()
        .enumerate()
        .filter(|(index, _)| *index != wrapper)
        .map(|(_, mut record)| {
            record.indent_level -= 1;
            record
        })
        .collect()
}

/// Comments with nothing at their level or deeper right after them.
fn drop_orphan_comments(records: Vec<LineRecord>) -> Vec<LineRecord> {
    let mut kept: Vec<LineRecord> = Vec::with_capacity(records.len());
    for record in records.into_iter().rev() {
        let followed = kept
            .last()
            .is_some_and(|next| next.indent_level >= record.indent_level);
        if record.line_kind.is_comment() && !followed {
            continue;
        }
        kept.push(record);
    }
    kept.reverse();
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PAGE: &str = "\
doctype html
html
  head
    title Shop
  body
    header
      nav
        a[href=\"/\"] Home
    main#content.page
      h1 Products
      .grid
        .card
          p First
        .card
          p Second
    footer
      p Legal
    script[src=\"/app.js\"]
";

    fn extract(options: &ExtractOptions) -> Extraction {
        try_extract(PAGE, options).unwrap()
    }

    #[test]
    fn test_outline() {
        let extraction = extract(&ExtractOptions::outline(2));
        assert_eq!(extraction.content, "doctype html\nhtml\n  head\n  body\n");
        assert_eq!(extraction.summary, ExtractionSummary::Outline { depth: 2 });
    }

    #[test]
    fn test_outline_zero_is_empty() {
        assert_eq!(extract(&ExtractOptions::outline(0)).content, "\n");
    }

    #[test]
    fn test_selector_keeps_block_and_renormalizes() {
        let extraction = extract(&ExtractOptions::selector("main#content"));
        assert_eq!(
            extraction.content,
            "main#content.page\n  h1 Products\n  .grid\n    .card\n      p First\n    .card\n      p Second\n"
        );
    }

    #[test]
    fn test_selector_keeps_every_occurrence() {
        let extraction = extract(&ExtractOptions::selector(".card"));
        assert_eq!(extraction.content, ".card\n  p First\n.card\n  p Second\n");
    }

    #[test]
    fn test_child_selector() {
        let extraction = extract(&ExtractOptions::selector("footer > p"));
        assert_eq!(extraction.content, "p Legal\n");
    }

    #[test]
    fn test_selector_without_match_is_empty() {
        let extraction = extract(&ExtractOptions::selector("aside"));
        assert_eq!(extraction.content, "\n");
    }

    #[test]
    fn test_invalid_selector() {
        let result = try_extract(PAGE, &ExtractOptions::selector("  "));
        assert_eq!(
            result,
            Err(AnalysisError::Selector(slim_parser::SelectorError::Empty))
        );
    }

    #[test]
    fn test_default_removal() {
        let extraction = extract(&ExtractOptions::default());
        assert_eq!(
            extraction.content,
            "html\n  body\n    main#content.page\n      h1 Products\n      .grid\n        .card\n          p First\n        .card\n          p Second\n"
        );
        assert_eq!(
            extraction.summary,
            ExtractionSummary::Sections {
                removed: DEFAULT_REMOVE.iter().map(|n| n.to_string()).collect(),
                kept: None,
            }
        );
    }

    #[test]
    fn test_keep_takes_precedence_over_remove() {
        let options = ExtractOptions::sections(["Footer, title"], ["footer"]);
        let extraction = extract(&options);
        assert_eq!(extraction.content, "title Shop\nfooter\n  p Legal\n");
        assert_eq!(
            extraction.summary,
            ExtractionSummary::Sections {
                removed: vec!["footer".to_string()],
                kept: Some(vec!["footer".to_string(), "title".to_string()]),
            }
        );
    }

    #[test]
    fn test_nested_keep_match_does_not_cut_the_outer_block() {
        let source = "section.keep\n  div\n    p.keep Inner\n  p After\n";
        let options = ExtractOptions::sections(["keep"], Vec::<String>::new());
        let extraction = try_extract(source, &options).unwrap();
        assert_eq!(extraction.content, source);
    }

    #[test]
    fn test_remove_by_class_and_id() {
        let source = "#top\n  p A\n.ad\n  p B\np C\n";
        let options = ExtractOptions::sections(Vec::<String>::new(), ["top,ad"]);
        let extraction = try_extract(source, &options).unwrap();
        assert_eq!(extraction.content, "p C\n");
    }

    #[test]
    fn test_remove_wrapper() {
        let options = ExtractOptions {
            remove_wrapper: true,
            ..ExtractOptions::selector("main")
        };
        let extraction = extract(&options);
        assert_eq!(
            extraction.content,
            "h1 Products\n.grid\n  .card\n    p First\n  .card\n    p Second\n"
        );
    }

    #[test]
    fn test_remove_wrapper_needs_a_single_element_root() {
        let options = ExtractOptions {
            remove_wrapper: true,
            ..ExtractOptions::selector(".card")
        };
        let extraction = extract(&options);
        assert_eq!(extraction.content, ".card\n  p First\n.card\n  p Second\n");
    }

    #[test]
    fn test_remove_wrapper_is_ignored_for_outlines() {
        let options = ExtractOptions {
            remove_wrapper: true,
            ..ExtractOptions::outline(1)
        };
        assert_eq!(extract(&options).content, "doctype html\nhtml\n");
    }

    #[test]
    fn test_orphan_comments_are_dropped() {
        let source = "div\n  / Navigation\n  nav\n    a Home\n  / Trailing note\np Body\n/ End of file\n";
        let extraction = try_extract(
            source,
            &ExtractOptions::sections(Vec::<String>::new(), ["nav"]),
        )
        .unwrap();
        assert_eq!(extraction.content, "div\np Body\n");
    }

    #[test]
    fn test_empty_source_is_a_reference_error() {
        let result = try_extract("\n  \n", &ExtractOptions::outline(2));
        assert!(matches!(result, Err(AnalysisError::Reference(_))));
    }

    #[test]
    fn test_mode_priority_and_rejection() {
        let both = ExtractOptions {
            outline: Some(1),
            selector: Some("main".to_string()),
            ..ExtractOptions::default()
        };
        assert_eq!(
            extract(&both).summary,
            ExtractionSummary::Outline { depth: 1 }
        );

        let strict = ExtractOptions {
            reject_conflicting_modes: true,
            ..both
        };
        assert!(matches!(
            try_extract(PAGE, &strict),
            Err(AnalysisError::Configuration(_))
        ));
    }

    #[test]
    fn test_sections_summary_has_no_mode() {
        let summary = ExtractionSummary::Sections {
            removed: vec!["nav".to_string()],
            kept: Some(vec!["main".to_string()]),
        };
        assert_eq!(
            serde_json::to_value(&summary).unwrap(),
            serde_json::json!({ "removed": ["nav"], "kept": ["main"] })
        );
        assert_eq!(
            serde_json::to_value(ExtractionSummary::Selector {
                selector: "main".to_string()
            })
            .unwrap(),
            serde_json::json!({ "mode": "selector", "selector": "main" })
        );
    }

    #[test]
    fn test_outcome_json_shape() {
        let outcome = extract_str(PAGE, &ExtractOptions::outline(2));
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["mode"], "outline");
        assert_eq!(json["depth"], 2);

        let failed = extract_str("", &ExtractOptions::outline(2));
        assert_eq!(
            serde_json::to_value(&failed).unwrap(),
            serde_json::json!({ "success": false, "error": "no content to extract" })
        );
    }

    #[test]
    fn test_extract_bytes_rejects_invalid_utf8() {
        let outcome = extract_bytes(&[b'p', 0xff], &ExtractOptions::outline(1));
        assert!(!outcome.success);
        assert!(outcome.error.unwrap().starts_with("invalid input: "));
    }
}
