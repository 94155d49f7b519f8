//! Report data model.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use storylint_checks::{CheckId, Finding, Severity};
use storylint_document::{SourceDigest, StoryKey, StoryStatus};
use ulid::Ulid;

/// Unique report identifier (ULID for sortability).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ReportId(pub Ulid);

impl ReportId {
    /// Generates a fresh identifier.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for ReportId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ReportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Judgement of one checklist item after validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ItemStatus {
    /// The bound check ran and found nothing worse than info.
    Pass,
    /// The bound check found warnings but nothing critical.
    Partial,
    /// The bound check found at least one critical problem.
    Fail,
    /// No check is bound; a human must judge the item.
    NeedsReview,
    /// The bound check could not run in this configuration.
    Skipped,
}

impl ItemStatus {
    /// Rank for aggregation; higher dominates.
    #[must_use]
    pub(crate) const fn rank(self) -> u8 {
        match self {
            Self::Pass => 0,
            Self::Skipped => 1,
            Self::NeedsReview => 2,
            Self::Partial => 3,
            Self::Fail => 4,
        }
    }

    /// The more severe of two statuses.
    #[must_use]
    pub fn worst(self, other: Self) -> Self {
        if other.rank() > self.rank() {
            other
        } else {
            self
        }
    }

    /// Short uppercase label for tables.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Partial => "PARTIAL",
            Self::Fail => "FAIL",
            Self::NeedsReview => "REVIEW",
            Self::Skipped => "SKIP",
        }
    }

    /// Report glyph.
    #[must_use]
    pub const fn glyph(self) -> &'static str {
        match self {
            Self::Pass => "✅",
            Self::Partial => "⚠️",
            Self::Fail => "❌",
            Self::NeedsReview => "❓",
            Self::Skipped => "⏭️",
        }
    }
}

/// Overall go/no-go decision for the story.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Verdict {
    /// The story is ready for implementation.
    Go,
    /// The story is not ready; blocking items exist.
    NoGo,
}

impl Verdict {
    /// Label used in the report heading.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Go => "GO",
            Self::NoGo => "NO-GO",
        }
    }
}

/// One checklist item with its judgement.
#[derive(Debug, Clone, Serialize)]
pub struct ItemResult {
    /// Item text from the checklist.
    pub text: String,
    /// Bound check, for auto items.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check: Option<CheckId>,
    /// Weight of the item.
    pub severity: Severity,
    /// Judgement.
    pub status: ItemStatus,
    /// Findings of the bound check, empty otherwise.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub findings: Vec<Finding>,
    /// Why the bound check skipped, when it did.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_reason: Option<String>,
}

/// One checklist category with its aggregated judgement.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryResult {
    /// Category number, when the checklist numbers it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<u32>,
    /// Category title.
    pub title: String,
    /// Worst status among the items.
    pub status: ItemStatus,
    /// Item judgements in checklist order.
    pub items: Vec<ItemResult>,
}

/// Identity of the validated story as the report states it.
#[derive(Debug, Clone, Serialize)]
pub struct StoryInfo {
    /// Epic/story key, when the story declares one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<StoryKey>,
    /// Story title, when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Workflow status, when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<StoryStatus>,
    /// Path the story was loaded from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Digest of the validated bytes.
    pub digest: SourceDigest,
}

/// Identity of the checklist the story was judged against.
#[derive(Debug, Clone, Serialize)]
pub struct ChecklistInfo {
    /// Checklist title.
    pub title: String,
    /// `story-draft` for the built-in, a path otherwise.
    pub source_name: String,
}

/// The complete outcome of validating one story against one checklist.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    /// Identifier of this validation run.
    pub id: ReportId,
    /// Version of the tool that produced the report.
    pub tool_version: String,
    /// The story that was judged.
    pub story: StoryInfo,
    /// The rubric it was judged against.
    pub checklist: ChecklistInfo,
    /// Go or no-go.
    pub verdict: Verdict,
    /// Readiness score, 0 through 10.
    pub readiness: u8,
    /// Whether warnings were promoted to blockers.
    pub strict: bool,
    /// When the report was generated.
    pub generated_at: DateTime<Utc>,
    /// Category judgements in checklist order.
    pub categories: Vec<CategoryResult>,
}

impl ValidationReport {
    /// Iterates over every item result across categories.
    pub fn items(&self) -> impl Iterator<Item = &ItemResult> {
        self.categories.iter().flat_map(|c| c.items.iter())
    }

    /// Number of items with the given status.
    #[must_use]
    pub fn count(&self, status: ItemStatus) -> usize {
        self.items().filter(|item| item.status == status).count()
    }

    /// Every finding across all items, in checklist order.
    pub fn findings(&self) -> impl Iterator<Item = &Finding> {
        self.items().flat_map(|item| item.findings.iter())
    }

    /// Serializes the report as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`serde_json::Error`] if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worst_status_follows_rank() {
        use ItemStatus::*;
        assert_eq!(Pass.worst(Skipped), Skipped);
        assert_eq!(Skipped.worst(NeedsReview), NeedsReview);
        assert_eq!(NeedsReview.worst(Partial), Partial);
        assert_eq!(Partial.worst(Fail), Fail);
        assert_eq!(Fail.worst(Pass), Fail);
    }

    #[test]
    fn labels_are_stable() {
        assert_eq!(ItemStatus::NeedsReview.label(), "REVIEW");
        assert_eq!(Verdict::NoGo.label(), "NO-GO");
    }

    #[test]
    fn report_ids_are_unique() {
        assert_ne!(ReportId::new(), ReportId::new());
    }
}
