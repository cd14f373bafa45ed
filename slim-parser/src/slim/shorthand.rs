//! Element head scanning
//!
//!     The "head" of an element line is everything up to the inline text: the tag name, any
//!     `#id` / `.class` shorthand, and an optional bracketed attribute list. This is a
//!     lightweight prefix scan, not a full Slim parse. It knows just enough about brackets and
//!     quotes to find where the head ends, so `a[title="x y"] Text` splits after the `]`.

/// Tag name implied by bare `#id` / `.class` shorthand.
pub const IMPLIED_ELEMENT: &str = "div";

/// The scanned head of an element line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementHead<'a> {
    /// Explicit tag name, if the line starts with one
    pub element: Option<&'a str>,

    pub id: Option<&'a str>,

    pub classes: Vec<&'a str>,

    /// The bracketed attribute list, brackets included
    pub attributes: Option<&'a str>,

    /// The whole head as written
    pub head: &'a str,

    /// Whatever follows the head, untrimmed
    pub remainder: &'a str,
}

impl<'a> ElementHead<'a> {
    /// The element name, defaulting to the implied div for shorthand.
    pub fn effective_element(&self) -> &'a str {
        self.element.unwrap_or(IMPLIED_ELEMENT)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|candidate| *candidate == class)
    }

    /// Inline text following the head, when separated from it by whitespace.
    pub fn inline_text(&self) -> Option<&'a str> {
        if !self.remainder.starts_with(char::is_whitespace) {
            return None;
        }
        let text = self.remainder.trim();
        (!text.is_empty()).then_some(text)
    }
}

/// Scan the head of a trimmed line.
///
/// Returns `None` when the line does not start with a tag name or a `#`/`.` shorthand marker.
pub fn scan_element_head(content: &str) -> Option<ElementHead<'_>> {
    let bytes = content.as_bytes();
    let first = *bytes.first()?;

    let mut pos = 0;
    let element = if first.is_ascii_alphabetic() {
        pos = take_while(bytes, 1, is_tag_byte);
        Some(&content[..pos])
    } else if first == b'#' || first == b'.' {
        None
    } else {
        return None;
    };

    let mut id = None;
    let mut classes = Vec::new();
    while pos < bytes.len() && (bytes[pos] == b'#' || bytes[pos] == b'.') {
        let end = take_while(bytes, pos + 1, is_name_byte);
        if end == pos + 1 {
            break;
        }
        let name = &content[pos + 1..end];
        if bytes[pos] == b'#' {
            id.get_or_insert(name);
        } else {
            classes.push(name);
        }
        pos = end;
    }

    let mut attributes = None;
    if bytes.get(pos) == Some(&b'[') {
        let end = closing_bracket(bytes, pos).map_or(bytes.len(), |close| close + 1);
        attributes = Some(&content[pos..end]);
        pos = end;
    }

    Some(ElementHead {
        element,
        id,
        classes,
        attributes,
        head: &content[..pos],
        remainder: &content[pos..],
    })
}

fn is_tag_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_' || b == b':'
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_'
}

fn take_while(bytes: &[u8], start: usize, accept: fn(u8) -> bool) -> usize {
    let mut end = start;
    while end < bytes.len() && accept(bytes[end]) {
        end += 1;
    }
    end
}

/// Index of the `]` matching the `[` at `open`, skipping quoted values.
fn closing_bracket(bytes: &[u8], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<u8> = None;
    for (i, &b) in bytes.iter().enumerate().skip(open) {
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None => match b {
                b'"' | b'\'' => quote = Some(b),
                b'[' => depth += 1,
                b']' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(i);
                    }
                }
                _ => {}
            },
        }
    }
    None
}
