//! Heading-delimited section tree.
//!
//! Stories and checklists are organized by ATX headings. The tree is a
//! flat, document-ordered list of sections, each owning the body text
//! between its heading and the next heading of any level. Line numbers
//! are preserved so findings can point at the offending line.

use crate::markdown::slugify;
use serde::Serialize;
use std::ops::Range;

/// One heading-delimited region of a document.
#[derive(Debug, Clone, Serialize)]
pub struct Section {
    /// Heading level, 1 through 6.
    pub level: u8,
    /// Heading text as written, without the leading `#` run.
    pub title: String,
    /// GitHub-style anchor slug of the title.
    pub slug: String,
    /// Body text between this heading and the next one.
    pub body: String,
    /// One-based line range covering the heading and its body. The end
    /// bound is exclusive.
    pub lines: Range<usize>,
}

impl Section {
    /// Iterates over body lines with their absolute one-based line numbers.
    pub fn body_lines(&self) -> impl Iterator<Item = (usize, &str)> {
        let first = self.lines.start + 1;
        self.body
            .lines()
            .enumerate()
            .map(move |(i, line)| (first + i, line))
    }

    /// Whether the body contains nothing but whitespace.
    #[inline]
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.body.trim().is_empty()
    }
}

/// All sections of a document, in source order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SectionTree {
    sections: Vec<Section>,
}

impl SectionTree {
    /// Parses a document into sections, numbering lines from 1.
    #[must_use]
    pub fn parse(source: &str) -> Self {
        Self::parse_at(source, 1)
    }

    /// Parses a document whose first line has the given absolute number.
    ///
    /// Used after frontmatter has been split off, so section line numbers
    /// still refer to the original file. Headings inside fenced code
    /// blocks are ignored. Text before the first heading belongs to no
    /// section.
    #[must_use]
    pub fn parse_at(source: &str, start_line: usize) -> Self {
        let mut sections: Vec<Section> = Vec::new();
        let mut in_fence: Option<&str> = None;
        let mut line_no = start_line;

        for line in source.lines() {
            let trimmed = line.trim_start();
            if let Some(marker) = fence_marker(trimmed) {
                match in_fence {
                    None => in_fence = Some(marker),
                    Some(open) if trimmed.starts_with(open) => in_fence = None,
                    Some(_) => {}
                }
            } else if in_fence.is_none() {
                if let Some((level, title)) = heading_line(trimmed) {
                    if let Some(previous) = sections.last_mut() {
                        previous.lines.end = line_no;
                    }
                    sections.push(Section {
                        level,
                        title: title.to_string(),
                        slug: slugify(title),
                        body: String::new(),
                        lines: line_no..line_no + 1,
                    });
                    line_no += 1;
                    continue;
                }
            }
            if let Some(current) = sections.last_mut() {
                current.body.push_str(line);
                current.body.push('\n');
                current.lines.end = line_no + 1;
            }
            line_no += 1;
        }

        Self { sections }
    }

    /// All sections in document order.
    #[inline]
    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// The first level-1 heading, if any.
    #[must_use]
    pub fn document_title(&self) -> Option<&Section> {
        self.sections.iter().find(|s| s.level == 1)
    }

    /// Finds the first section whose normalized title equals the query.
    #[must_use]
    pub fn find(&self, title: &str) -> Option<&Section> {
        let wanted = normalize_title(title);
        self.sections
            .iter()
            .find(|s| normalize_title(&s.title) == wanted)
    }

    /// Finds the first section whose normalized title starts with the
    /// query. Lets `Tasks` match a `Tasks / Subtasks` heading.
    #[must_use]
    pub fn find_prefix(&self, title: &str) -> Option<&Section> {
        let wanted = normalize_title(title);
        self.sections
            .iter()
            .find(|s| normalize_title(&s.title).starts_with(&wanted))
    }
}

/// Normalizes a heading title for comparison: lowercased alphanumeric
/// words joined by single spaces. `Tasks / Subtasks` becomes
/// `tasks subtasks`.
#[must_use]
pub fn normalize_title(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    let mut last_was_space = true;
    for c in title.chars() {
        if c.is_alphanumeric() {
            out.extend(c.to_lowercase());
            last_was_space = false;
        } else if !last_was_space {
            out.push(' ');
            last_was_space = true;
        }
    }
    out.trim_end().to_string()
}

/// Recognizes an opening or closing code fence.
fn fence_marker(trimmed: &str) -> Option<&'static str> {
    if trimmed.starts_with("```") {
        Some("```")
    } else if trimmed.starts_with("~~~") {
        Some("~~~")
    } else {
        None
    }
}

/// Parses an ATX heading line into level and title.
fn heading_line(trimmed: &str) -> Option<(u8, &str)> {
    let hashes = trimmed.bytes().take_while(|b| *b == b'#').count();
    if hashes == 0 || hashes > 6 {
        return None;
    }
    let rest = &trimmed[hashes..];
    if rest.is_empty() {
        // ATX headings may be empty, e.g. a bare `##` line.
        return Some((hashes as u8, ""));
    }
    if !rest.starts_with(' ') && !rest.starts_with('\t') {
        return None;
    }
    Some((hashes as u8, rest.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    const STORY: &str = "\
# Story 2.3: Report export

## Status

Draft

## Acceptance Criteria

1. Exports render as Markdown.

## Tasks / Subtasks

- [ ] Build renderer (AC: 1)
";

    #[test]
    fn splits_on_headings_with_line_ranges() {
        let tree = SectionTree::parse(STORY);
        let sections = tree.sections();
        assert_eq!(sections.len(), 4);

        assert_eq!(sections[0].title, "Story 2.3: Report export");
        assert_eq!(sections[0].level, 1);
        assert_eq!(sections[0].lines, 1..3);

        assert_eq!(sections[1].title, "Status");
        assert_eq!(sections[1].body.trim(), "Draft");
        assert_eq!(sections[1].lines, 3..7);

        assert_eq!(sections[3].title, "Tasks / Subtasks");
        assert_eq!(sections[3].lines, 11..14);
    }

    #[test]
    fn body_lines_report_absolute_numbers() {
        let tree = SectionTree::parse(STORY);
        let status = tree.find("Status").unwrap();
        let numbered: Vec<(usize, &str)> = status
            .body_lines()
            .filter(|(_, line)| !line.trim().is_empty())
            .collect();
        assert_eq!(numbered, vec![(5, "Draft")]);
    }

    #[test]
    fn parse_at_offsets_every_line_number() {
        let tree = SectionTree::parse_at("# Title\n\nbody\n", 10);
        assert_eq!(tree.sections()[0].lines, 10..13);
    }

    #[test]
    fn heading_inside_fence_does_not_split() {
        let doc = "## Dev Notes\n\n```md\n## Not A Section\n```\n\ntail\n";
        let tree = SectionTree::parse(doc);
        assert_eq!(tree.sections().len(), 1);
        assert!(tree.sections()[0].body.contains("## Not A Section"));
        assert!(tree.sections()[0].body.contains("tail"));
    }

    #[test]
    fn hash_without_space_is_not_a_heading() {
        let tree = SectionTree::parse("#hashtag\n\n## Real\n");
        assert_eq!(tree.sections().len(), 1);
        assert_eq!(tree.sections()[0].title, "Real");
    }

    #[test]
    fn preamble_before_first_heading_is_dropped() {
        let tree = SectionTree::parse("loose text\n\n# First\nbody\n");
        assert_eq!(tree.sections().len(), 1);
        assert_eq!(tree.sections()[0].title, "First");
        assert_eq!(tree.sections()[0].body.trim(), "body");
    }

    #[test]
    fn find_is_normalized_and_prefix_matches() {
        let tree = SectionTree::parse("## Tasks / Subtasks\n\n- [ ] one\n");
        assert!(tree.find("tasks subtasks").is_some());
        assert!(tree.find_prefix("Tasks").is_some());
        assert!(tree.find("tasks").is_none());
    }

    #[test]
    fn normalize_title_collapses_punctuation() {
        assert_eq!(normalize_title("Tasks / Subtasks"), "tasks subtasks");
        assert_eq!(normalize_title("  Dev   Notes  "), "dev notes");
        assert_eq!(normalize_title("ACCEPTANCE CRITERIA"), "acceptance criteria");
    }

    proptest! {
        #[test]
        fn parser_never_panics(source in "\\PC{0,400}") {
            let _ = SectionTree::parse(&source);
        }

        #[test]
        fn section_ranges_are_ordered(source in "(#{1,3} [a-z ]{0,12}\n|[a-z `~#]{0,20}\n){0,30}") {
            let tree = SectionTree::parse(&source);
            let mut last_end = 0usize;
            for section in tree.sections() {
                prop_assert!(section.lines.start >= 1);
                prop_assert!(section.lines.start > last_end.saturating_sub(1));
                prop_assert!(section.lines.end > section.lines.start);
                last_end = section.lines.end;
            }
        }
    }
}
