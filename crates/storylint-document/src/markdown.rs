//! Low-level Markdown helpers shared by the section parser and the
//! checks that inspect referenced documents.
//!
//! These walk `pulldown-cmark` event streams rather than regexes so that
//! headings inside fenced code blocks, inline HTML, and emphasis are
//! handled the way a renderer would handle them.

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};

/// A heading discovered in a Markdown document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingRef {
    /// Heading level, 1 through 6.
    pub level: u8,
    /// Rendered heading text with inline formatting stripped.
    pub title: String,
    /// GitHub-style anchor slug for the heading.
    pub slug: String,
}

fn parser_options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options
}

/// Collects every heading in the document, in order.
///
/// Callers that deal with frontmatter should strip it first via
/// [`crate::frontmatter::split_frontmatter`]; a YAML block at the top of
/// the input would otherwise be parsed as Markdown.
#[must_use]
pub fn heading_refs(source: &str) -> Vec<HeadingRef> {
    let mut headings = Vec::new();
    let mut current: Option<(u8, String)> = None;

    for event in Parser::new_ext(source, parser_options()) {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                current = Some((level as u8, String::new()));
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some((level, text)) = current.take() {
                    let title = text.trim().to_string();
                    let slug = slugify(&title);
                    headings.push(HeadingRef { level, title, slug });
                }
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some((_, buffer)) = current.as_mut() {
                    buffer.push_str(&text);
                }
            }
            Event::SoftBreak | Event::HardBreak => {
                if let Some((_, buffer)) = current.as_mut() {
                    buffer.push(' ');
                }
            }
            _ => {}
        }
    }

    headings
}

/// Extracts the readable text of a Markdown fragment.
///
/// Inline formatting is dropped, fenced and indented code blocks are
/// skipped entirely, and runs of whitespace collapse to single spaces.
/// Used by checks that measure the prose of acceptance criteria.
#[must_use]
pub fn plain_text(source: &str) -> String {
    let mut out = String::new();
    let mut code_depth = 0usize;

    for event in Parser::new_ext(source, parser_options()) {
        match event {
            Event::Start(Tag::CodeBlock(_)) => code_depth += 1,
            Event::End(TagEnd::CodeBlock) => code_depth = code_depth.saturating_sub(1),
            Event::Text(text) | Event::Code(text) if code_depth == 0 => {
                if !out.is_empty() && !out.ends_with(' ') {
                    out.push(' ');
                }
                out.push_str(text.trim());
            }
            Event::SoftBreak | Event::HardBreak => {
                if !out.is_empty() && !out.ends_with(' ') {
                    out.push(' ');
                }
            }
            _ => {}
        }
    }

    out.trim().to_string()
}

/// Converts a heading title into its GitHub-style anchor slug.
///
/// Lowercases, drops everything except alphanumerics, spaces, hyphens,
/// and underscores, then replaces each space with a hyphen. Consecutive
/// spaces produce consecutive hyphens, matching GitHub's renderer.
#[must_use]
pub fn slugify(title: &str) -> String {
    title
        .trim()
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == ' ' || *c == '-' || *c == '_')
        .flat_map(char::to_lowercase)
        .map(|c| if c == ' ' { '-' } else { c })
        .collect()
}
