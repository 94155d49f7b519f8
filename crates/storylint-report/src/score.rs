//! Scoring: from check outcomes to item statuses, verdict, and
//! readiness.
//!
//! The rubric:
//!
//! - An auto item takes its status from its check: critical findings
//!   fail it, warnings make it partial, info findings leave it passing.
//! - Manual items need human review; skipped checks judge nothing.
//! - The verdict is NO-GO exactly when an item failed. Strict mode also
//!   counts partial items. Skipped and needs-review items never block.
//! - Readiness weighs items by severity (critical 3, warning 2, info 1),
//!   grants full credit for a pass and half for a partial, leaves
//!   skipped items out of the denominator, and scales to 0..=10.

use crate::model::{
    CategoryResult, ChecklistInfo, ItemResult, ItemStatus, ReportId, StoryInfo, ValidationReport,
    Verdict,
};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use storylint_checks::{worst_severity, CheckId, CheckOutcome, Severity};
use storylint_checklist::{Checklist, ChecklistItem, ItemKind};
use storylint_document::StoryDocument;

/// Everything [`build_report`] needs.
pub struct ReportInputs<'a> {
    /// The validated story.
    pub story: &'a StoryDocument,
    /// The checklist it was judged against.
    pub checklist: &'a Checklist,
    /// Outcome of every check the checklist references, keyed by id.
    pub outcomes: &'a IndexMap<CheckId, CheckOutcome>,
    /// Promote warnings to blockers.
    pub strict: bool,
    /// Timestamp to stamp the report with.
    pub generated_at: DateTime<Utc>,
}

/// Assembles the full report from check outcomes.
#[must_use]
pub fn build_report(inputs: ReportInputs<'_>) -> ValidationReport {
    let categories: Vec<CategoryResult> = inputs
        .checklist
        .categories
        .iter()
        .map(|category| {
            let items: Vec<ItemResult> = category
                .items
                .iter()
                .map(|item| judge_item(item, inputs.outcomes))
                .collect();
            let status = items
                .iter()
                .fold(ItemStatus::Pass, |acc, item| acc.worst(item.status));
            CategoryResult {
                number: category.number,
                title: category.title.clone(),
                status,
                items,
            }
        })
        .collect();

    let all_items = || categories.iter().flat_map(|c| c.items.iter());
    let verdict = decide_verdict(all_items(), inputs.strict);
    let readiness = readiness_score(all_items());

    tracing::debug!(
        story = %inputs.story.display_name(),
        verdict = verdict.label(),
        readiness,
        "report assembled"
    );

    ValidationReport {
        id: ReportId::new(),
        tool_version: env!("CARGO_PKG_VERSION").to_string(),
        story: StoryInfo {
            key: inputs.story.key,
            title: inputs.story.title.clone(),
            status: inputs.story.status.clone(),
            path: inputs.story.source_path.clone(),
            digest: inputs.story.digest,
        },
        checklist: ChecklistInfo {
            title: inputs.checklist.title.clone(),
            source_name: inputs.checklist.source_name.clone(),
        },
        verdict,
        readiness,
        strict: inputs.strict,
        generated_at: inputs.generated_at,
        categories,
    }
}

fn judge_item(item: &ChecklistItem, outcomes: &IndexMap<CheckId, CheckOutcome>) -> ItemResult {
    let (status, findings, skip_reason) = match &item.kind {
        ItemKind::Manual => (ItemStatus::NeedsReview, Vec::new(), None),
        ItemKind::Auto(id) => match outcomes.get(id) {
            None => (
                ItemStatus::Skipped,
                Vec::new(),
                Some(format!("check `{id}` did not run")),
            ),
            Some(CheckOutcome::Skipped { reason }) => {
                (ItemStatus::Skipped, Vec::new(), Some(reason.clone()))
            }
            Some(CheckOutcome::Completed { findings }) => {
                let status = match worst_severity(findings) {
                    Some(Severity::Critical) => ItemStatus::Fail,
                    Some(Severity::Warning) => ItemStatus::Partial,
                    Some(Severity::Info) | None => ItemStatus::Pass,
                };
                (status, findings.clone(), None)
            }
        },
    };

    ItemResult {
        text: item.text.clone(),
        check: item.check_id().cloned(),
        severity: item.severity,
        status,
        findings,
        skip_reason,
    }
}

fn decide_verdict<'a>(items: impl Iterator<Item = &'a ItemResult>, strict: bool) -> Verdict {
    let mut blocked = false;
    for item in items {
        match item.status {
            ItemStatus::Fail => blocked = true,
            ItemStatus::Partial if strict => blocked = true,
            _ => {}
        }
    }
    if blocked {
        Verdict::NoGo
    } else {
        Verdict::Go
    }
}

/// Weighted readiness on a 0..=10 scale.
fn readiness_score<'a>(items: impl Iterator<Item = &'a ItemResult>) -> u8 {
    let mut half_credits: u64 = 0;
    let mut weight_total: u64 = 0;
    for item in items {
        if item.status == ItemStatus::Skipped {
            continue;
        }
        let weight = u64::from(item.severity.weight());
        weight_total += weight;
        half_credits += weight
            * match item.status {
                ItemStatus::Pass => 2,
                ItemStatus::Partial => 1,
                _ => 0,
            };
    }
    if weight_total == 0 {
        return 0;
    }
    // round(10 * half_credits / (2 * weight_total)) in integers
    let rounded = (10 * half_credits + weight_total) / (2 * weight_total);
    u8::try_from(rounded).unwrap_or(10)
}
