//! Checklist data model.

use serde::Serialize;
use storylint_checks::{CheckId, Severity};

/// How a checklist item gets its status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ItemKind {
    /// Bound to a built-in check via an `(auto: id)` marker; its status
    /// comes from that check's findings.
    Auto(CheckId),
    /// No binding; a human has to judge it.
    Manual,
}

/// One item of a checklist.
#[derive(Debug, Clone, Serialize)]
pub struct ChecklistItem {
    /// Item text with markers stripped.
    pub text: String,
    /// Automatic or manual.
    pub kind: ItemKind,
    /// How much this item weighs on the verdict and score.
    pub severity: Severity,
    /// One-based line of the item in its source.
    pub line: usize,
}

impl ChecklistItem {
    /// The bound check identifier, for auto items.
    #[must_use]
    pub fn check_id(&self) -> Option<&CheckId> {
        match &self.kind {
            ItemKind::Auto(id) => Some(id),
            ItemKind::Manual => None,
        }
    }
}

/// A numbered group of checklist items.
#[derive(Debug, Clone, Serialize)]
pub struct Category {
    /// Category number, when the heading carries one (`## 2. ...`).
    pub number: Option<u32>,
    /// Category title without the number prefix.
    pub title: String,
    /// Items in source order.
    pub items: Vec<ChecklistItem>,
    /// One-based line of the category heading.
    pub line: usize,
}

/// A parsed checklist.
#[derive(Debug, Clone, Serialize)]
pub struct Checklist {
    /// Checklist title, from the level-1 heading or the source name.
    pub title: String,
    /// Where the checklist came from: `story-draft` for the built-in,
    /// a path otherwise.
    pub source_name: String,
    /// Categories in source order.
    pub categories: Vec<Category>,
}

impl Checklist {
    /// Iterates over every item across all categories, in source order.
    pub fn items(&self) -> impl Iterator<Item = &ChecklistItem> {
        self.categories.iter().flat_map(|c| c.items.iter())
    }

    /// Total number of items.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.categories.iter().map(|c| c.items.len()).sum()
    }

    /// Check identifiers referenced by `(auto:)` markers, deduplicated
    /// in order of first appearance.
    #[must_use]
    pub fn auto_check_ids(&self) -> Vec<CheckId> {
        let mut ids: Vec<CheckId> = Vec::new();
        for item in self.items() {
            if let Some(id) = item.check_id() {
                if !ids.contains(id) {
                    ids.push(id.clone());
                }
            }
        }
        ids
    }
}
