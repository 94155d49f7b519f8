//! Source citation extraction.
//!
//! Dev notes cite their provenance inline as `[Source: path#anchor]`.
//! The scanner finds every citation in a document, keeps its line number,
//! and separates well-formed references from ones that only look like
//! citations.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Anything that opens like a citation: `[Source:` up to the closing
/// bracket.
static LOOSE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[\s*[Ss]ource\s*:[^\]]*\]").expect("loose citation pattern")
});

/// A well-formed citation: a path with no whitespace, optionally followed
/// by `#anchor`.
static STRICT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\[\s*[Ss]ource\s*:\s*([^\]#\s]+?)\s*(?:#\s*([^\]]+?)\s*)?\]$")
        .expect("strict citation pattern")
});

/// A well-formed `[Source: ...]` reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Citation {
    /// The citation text exactly as written.
    pub raw: String,
    /// Cited path, relative to the docs root.
    pub path: String,
    /// Optional `#anchor` naming a heading in the cited document.
    pub anchor: Option<String>,
    /// One-based line the citation appears on.
    pub line: usize,
}

/// Text that opens like a citation but does not parse as one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MalformedCitation {
    /// The offending text.
    pub raw: String,
    /// One-based line it appears on.
    pub line: usize,
}

/// Scans a document for citations, fenced code excluded.
#[must_use]
pub fn scan_citations(source: &str) -> (Vec<Citation>, Vec<MalformedCitation>) {
    let mut citations = Vec::new();
    let mut malformed = Vec::new();
    let mut in_fence = false;

    for (index, line) in source.lines().enumerate() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            continue;
        }
        let line_no = index + 1;
        for hit in LOOSE.find_iter(line) {
            let raw = hit.as_str();
            match STRICT.captures(raw) {
                Some(caps) => citations.push(Citation {
                    raw: raw.to_string(),
                    path: caps[1].to_string(),
                    anchor: caps.get(2).map(|m| m.as_str().to_string()),
                    line: line_no,
                }),
                None => malformed.push(MalformedCitation {
                    raw: raw.to_string(),
                    line: line_no,
                }),
            }
        }
    }

    (citations, malformed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn extracts_path_and_anchor() {
        let doc = "Uses repositories. [Source: architecture/data-layer.md#Repository Pattern]\n";
        let (ok, bad) = scan_citations(doc);
        assert!(bad.is_empty());
        assert_eq!(ok.len(), 1);
        assert_eq!(ok[0].path, "architecture/data-layer.md");
        assert_eq!(ok[0].anchor.as_deref(), Some("Repository Pattern"));
        assert_eq!(ok[0].line, 1);
    }

    #[test]
    fn anchor_is_optional() {
        let (ok, _) = scan_citations("[Source: prd/epic-2.md]");
        assert_eq!(ok[0].path, "prd/epic-2.md");
        assert_eq!(ok[0].anchor, None);
    }

    #[test]
    fn several_citations_on_one_line() {
        let doc = "[Source: a.md#x] and [Source: b.md]";
        let (ok, _) = scan_citations(doc);
        assert_eq!(ok.len(), 2);
        assert_eq!(ok[1].path, "b.md");
    }

    #[test]
    fn path_with_spaces_is_malformed() {
        let doc = "bad: [Source: my docs/file.md]\n";
        let (ok, bad) = scan_citations(doc);
        assert!(ok.is_empty());
        assert_eq!(bad.len(), 1);
        assert_eq!(bad[0].line, 1);
    }

    #[test]
    fn empty_citation_is_malformed() {
        let (ok, bad) = scan_citations("[Source:]");
        assert!(ok.is_empty());
        assert_eq!(bad.len(), 1);
    }

    #[test]
    fn lowercase_source_keyword_is_accepted() {
        let (ok, bad) = scan_citations("[source: guide.md#setup]");
        assert!(bad.is_empty());
        assert_eq!(ok[0].path, "guide.md");
    }

    #[test]
    fn citations_inside_code_fences_are_ignored() {
        let doc = "```\n[Source: example.md]\n```\n[Source: real.md]\n";
        let (ok, bad) = scan_citations(doc);
        assert!(bad.is_empty());
        assert_eq!(ok.len(), 1);
        assert_eq!(ok[0].path, "real.md");
        assert_eq!(ok[0].line, 4);
    }

    #[test]
    fn plain_links_are_not_citations() {
        let (ok, bad) = scan_citations("[a link](https://example.com) and [ref]\n");
        assert!(ok.is_empty());
        assert!(bad.is_empty());
    }
}
