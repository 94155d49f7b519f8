//! Checklist parsing.
//!
//! A checklist is Markdown: a level-1 title, `## N. CATEGORY` headings,
//! and `- [ ]` items. Two markers bind an item to the validator:
//! `(auto: check-id)` wires it to a built-in check, and
//! `(severity: warning)` overrides the default critical weight.
//! `[[LLM: ...]]` instruction blocks are stripped before parsing.

use crate::error::ChecklistError;
use crate::model::{Category, Checklist, ChecklistItem, ItemKind};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use storylint_checks::{is_builtin, CheckId, Severity, BUILTIN_IDS};
use storylint_document::SectionTree;

/// Default size limit for checklist files.
pub const DEFAULT_MAX_CHECKLIST_BYTES: u64 = 1024 * 1024;

static ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*[-*]\s+\[[ xX]?\]\s*(.*)$").expect("item pattern"));

static AUTO: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\(\s*auto:\s*([^)]*)\)").expect("auto marker pattern"));

static SEVERITY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\(\s*severity:\s*([^)]*)\)").expect("severity marker pattern"));

static CATEGORY_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)[.)]\s*(.*)$").expect("category number pattern"));

/// Parses checklist text.
///
/// # Errors
///
/// Returns [`ChecklistError`] when the checklist holds no items, an
/// `(auto:)` marker is malformed or names an unknown check, or a
/// `(severity:)` marker holds an unknown value.
pub fn parse_checklist(source: &str, source_name: &str) -> Result<Checklist, ChecklistError> {
    let stripped = strip_llm_blocks(source);
    let tree = SectionTree::parse(&stripped);

    let mut title: Option<String> = None;
    let mut categories: Vec<Category> = Vec::new();

    if tree.is_empty() {
        // A headingless file is still usable as one flat category.
        let items = parse_items(
            stripped
                .lines()
                .enumerate()
                .map(|(index, line)| (index + 1, line)),
        )?;
        if !items.is_empty() {
            categories.push(Category {
                number: None,
                title: "General".to_string(),
                items,
                line: 1,
            });
        }
    }

    for section in tree.sections() {
        let items = parse_items(section.body_lines())?;
        match section.level {
            1 => {
                if title.is_none() {
                    title = Some(section.title.clone());
                }
                if !items.is_empty() {
                    categories.push(Category {
                        number: None,
                        title: "General".to_string(),
                        items,
                        line: section.lines.start,
                    });
                }
            }
            2 => {
                let (number, name) = split_category_title(&section.title);
                categories.push(Category {
                    number,
                    title: name,
                    items,
                    line: section.lines.start,
                });
            }
            _ => match categories.last_mut() {
                Some(current) => current.items.extend(items),
                None => {
                    if !items.is_empty() {
                        categories.push(Category {
                            number: None,
                            title: section.title.clone(),
                            items,
                            line: section.lines.start,
                        });
                    }
                }
            },
        }
    }

    if categories.iter().all(|category| category.items.is_empty()) {
        return Err(ChecklistError::Empty {
            name: source_name.to_string(),
        });
    }

    Ok(Checklist {
        title: title.unwrap_or_else(|| source_name.to_string()),
        source_name: source_name.to_string(),
        categories,
    })
}

/// Loads and parses a checklist file.
///
/// # Errors
///
/// Returns [`ChecklistError`] on I/O trouble, oversized or non-UTF-8
/// files, and every parse error of [`parse_checklist`].
pub async fn load_checklist(path: &Path, max_bytes: u64) -> Result<Checklist, ChecklistError> {
    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|source| ChecklistError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    if metadata.len() > max_bytes {
        return Err(ChecklistError::TooLarge {
            path: path.to_path_buf(),
            actual: metadata.len(),
            limit: max_bytes,
        });
    }

    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| ChecklistError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    let source = String::from_utf8(bytes).map_err(|_| ChecklistError::InvalidUtf8 {
        path: path.to_path_buf(),
    })?;

    let checklist = parse_checklist(&source, &path.display().to_string())?;
    tracing::debug!(
        path = %path.display(),
        items = checklist.item_count(),
        auto = checklist.auto_check_ids().len(),
        "loaded checklist"
    );
    Ok(checklist)
}

/// Removes `[[LLM: ...]]` blocks while preserving line numbering.
fn strip_llm_blocks(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut rest = source;
    while let Some(start) = rest.find("[[LLM:") {
        out.push_str(&rest[..start]);
        let block = &rest[start..];
        match block.find("]]") {
            Some(end) => {
                out.extend(block[..end + 2].chars().filter(|c| *c == '\n'));
                rest = &block[end + 2..];
            }
            None => {
                // Unterminated block swallows the remainder.
                out.extend(block.chars().filter(|c| *c == '\n'));
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

fn parse_items<'a>(
    lines: impl Iterator<Item = (usize, &'a str)>,
) -> Result<Vec<ChecklistItem>, ChecklistError> {
    let mut items = Vec::new();
    for (line, text) in lines {
        let Some(caps) = ITEM.captures(text) else {
            continue;
        };
        let raw = &caps[1];

        let kind = match AUTO.captures(raw) {
            Some(marker) => {
                let id = CheckId::parse(marker[1].trim())
                    .map_err(|source| ChecklistError::InvalidCheckId { line, source })?;
                if !is_builtin(id.as_str()) {
                    return Err(ChecklistError::UnknownCheck {
                        id: id.as_str().to_string(),
                        line,
                        known: BUILTIN_IDS.join(", "),
                    });
                }
                ItemKind::Auto(id)
            }
            None => ItemKind::Manual,
        };

        let severity = match SEVERITY.captures(raw) {
            Some(marker) => marker[1]
                .trim()
                .parse::<Severity>()
                .map_err(|source| ChecklistError::InvalidSeverity { line, source })?,
            None => Severity::Critical,
        };

        let text = SEVERITY
            .replace_all(&AUTO.replace_all(raw, ""), "")
            .trim()
            .to_string();
        if text.is_empty() {
            tracing::warn!(line, "skipping checklist item with no text");
            continue;
        }

        items.push(ChecklistItem {
            text,
            kind,
            severity,
            line,
        });
    }
    Ok(items)
}

fn split_category_title(title: &str) -> (Option<u32>, String) {
    match CATEGORY_NUMBER.captures(title) {
        Some(caps) => (caps[1].parse().ok(), caps[2].trim().to_string()),
        None => (None, title.to_string()),
    }
}
