//! YAML frontmatter handling.
//!
//! Stories may open with a `---` delimited YAML block carrying the story
//! key, title, and status. Frontmatter is optional and a malformed block
//! is never fatal: the split records the YAML error and hands the rest of
//! the document to the section parser untouched.

use serde_yaml::Value;

/// Result of splitting a document into frontmatter and body.
#[derive(Debug)]
pub struct FrontmatterSplit<'a> {
    /// Parsed YAML value, when a well-formed block was present.
    pub value: Option<Value>,
    /// YAML parse error, when a block was present but did not parse.
    pub error: Option<String>,
    /// Document body with the frontmatter block removed.
    pub body: &'a str,
    /// One-based line number of the first body line in the original
    /// document. `1` when no frontmatter was consumed.
    pub body_start_line: usize,
}

/// Splits optional YAML frontmatter off the top of a document.
///
/// A frontmatter block starts with `---` on the very first line and ends
/// at the next line that is exactly `---`. An opening delimiter with no
/// terminator is reported as an error and the whole input is treated as
/// body, so a stray rule at the top of a file cannot swallow the story.
#[must_use]
pub fn split_frontmatter(source: &str) -> FrontmatterSplit<'_> {
    let no_frontmatter = FrontmatterSplit {
        value: None,
        error: None,
        body: source,
        body_start_line: 1,
    };

    let mut offsets = line_offsets(source);
    let Some((first_start, first_end)) = offsets.next() else {
        return no_frontmatter;
    };
    if source[first_start..first_end].trim_end() != "---" {
        return no_frontmatter;
    }

    let mut consumed_lines = 1usize;
    for (start, end) in offsets {
        consumed_lines += 1;
        if source[start..end].trim_end() == "---" {
            let yaml = &source[first_end..start];
            let body = &source[end..];
            let body_start_line = consumed_lines + 1;
            return match serde_yaml::from_str::<Value>(yaml) {
                Ok(Value::Null) => FrontmatterSplit {
                    value: None,
                    error: None,
                    body,
                    body_start_line,
                },
                Ok(value) => FrontmatterSplit {
                    value: Some(value),
                    error: None,
                    body,
                    body_start_line,
                },
                Err(err) => FrontmatterSplit {
                    value: None,
                    error: Some(err.to_string()),
                    body,
                    body_start_line,
                },
            };
        }
    }

    FrontmatterSplit {
        error: Some("frontmatter block opened with `---` but never closed".to_string()),
        ..no_frontmatter
    }
}

/// Yields `(start, end)` byte ranges for each line, where `end` points
/// one past the trailing newline.
fn line_offsets(source: &str) -> impl Iterator<Item = (usize, usize)> + '_ {
    let mut pos = 0usize;
    std::iter::from_fn(move || {
        if pos >= source.len() {
            return None;
        }
        let start = pos;
        let end = source[pos..]
            .find('\n')
            .map_or(source.len(), |i| pos + i + 1);
        pos = end;
        Some((start, end))
    })
}
