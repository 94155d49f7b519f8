//! Markdown rendering of validation reports.
//!
//! The rendered report is meant to live next to the story it judges:
//! GitHub-flavored Markdown, one heading per checklist category, every
//! finding attached to the item that raised it.

use crate::model::{CategoryResult, ItemResult, ItemStatus, ValidationReport};
use storylint_checks::Finding;

/// Renders the full report as Markdown.
#[must_use]
pub fn render_markdown(report: &ValidationReport) -> String {
    let mut out = String::with_capacity(4096);

    push_line(&mut out, format!("# Validation Report: {}", report_title(report)));
    push_line(&mut out, String::new());
    render_header(&mut out, report);
    push_line(&mut out, String::new());
    render_verdict(&mut out, report);
    push_line(&mut out, String::new());
    render_category_table(&mut out, report);

    for category in &report.categories {
        push_line(&mut out, String::new());
        render_category(&mut out, category);
    }

    push_line(&mut out, String::new());
    render_review_queue(&mut out, report);
    render_summary(&mut out, report);
    out
}

fn report_title(report: &ValidationReport) -> String {
    match (&report.story.key, &report.story.title) {
        (Some(key), Some(title)) => format!("Story {key}: {title}"),
        (Some(key), None) => format!("Story {key}"),
        (None, Some(title)) => title.clone(),
        (None, None) => report
            .story
            .path
            .as_deref()
            .map_or_else(|| "unnamed story".to_string(), |p| p.display().to_string()),
    }
}

fn render_header(out: &mut String, report: &ValidationReport) {
    push_line(
        out,
        format!(
            "- **Checklist:** {} (`{}`)",
            report.checklist.title, report.checklist.source_name
        ),
    );
    if let Some(path) = &report.story.path {
        push_line(
            out,
            format!(
                "- **Story file:** `{}` at digest `{}`",
                path.display(),
                report.story.digest.short()
            ),
        );
    } else {
        push_line(
            out,
            format!("- **Story digest:** `{}`", report.story.digest.short()),
        );
    }
    if let Some(status) = &report.story.status {
        push_line(out, format!("- **Story status:** {status}"));
    }
    push_line(
        out,
        format!(
            "- **Generated:** {}",
            report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ),
    );
    push_line(out, format!("- **Tool:** storylint {}", report.tool_version));
    let mode = if report.strict {
        "strict (warnings block)"
    } else {
        "standard"
    };
    push_line(out, format!("- **Mode:** {mode}"));
}

fn render_verdict(out: &mut String, report: &ValidationReport) {
    let glyph = match report.verdict {
        crate::model::Verdict::Go => "✅",
        crate::model::Verdict::NoGo => "❌",
    };
    push_line(
        out,
        format!(
            "## Verdict: {glyph} {} (readiness {}/10)",
            report.verdict.label(),
            report.readiness
        ),
    );
}

fn render_category_table(out: &mut String, report: &ValidationReport) {
    push_line(out, "| # | Category | Status | Issues |".to_string());
    push_line(out, "|---|----------|--------|--------|".to_string());
    for category in &report.categories {
        let number = category
            .number
            .map_or_else(|| "-".to_string(), |n| n.to_string());
        let issues: usize = category.items.iter().map(|item| item.findings.len()).sum();
        push_line(
            out,
            format!(
                "| {number} | {} | {} {} | {issues} |",
                escape_pipes(&category.title),
                category.status.glyph(),
                category.status.label()
            ),
        );
    }
}

fn render_category(out: &mut String, category: &CategoryResult) {
    let heading = match category.number {
        Some(number) => format!(
            "## {number}. {} {}",
            category.title,
            category.status.glyph()
        ),
        None => format!("## {} {}", category.title, category.status.glyph()),
    };
    push_line(out, heading);
    push_line(out, String::new());

    if category.items.is_empty() {
        push_line(out, "*(no items)*".to_string());
        return;
    }
    for item in &category.items {
        render_item(out, item);
    }
}

fn render_item(out: &mut String, item: &ItemResult) {
    let mut line = format!("- {} {}", item.status.glyph(), item.text);
    match item.status {
        ItemStatus::NeedsReview => line.push_str(" *(needs manual review)*"),
        ItemStatus::Skipped => {
            let reason = item.skip_reason.as_deref().unwrap_or("not run");
            line.push_str(&format!(" *(skipped: {reason})*"));
        }
        _ => {}
    }
    push_line(out, line);
    for finding in &item.findings {
        push_line(out, format!("  - {}", render_finding(finding)));
    }
}

fn render_finding(finding: &Finding) -> String {
    let mut text = format!("{}: {}", finding.severity.label(), finding.message);
    let place = match (&finding.location.section, finding.location.line) {
        (Some(section), Some(line)) => Some(format!("{section}, line {line}")),
        (Some(section), None) => Some(section.clone()),
        (None, Some(line)) => Some(format!("line {line}")),
        (None, None) => None,
    };
    if let Some(place) = place {
        text.push_str(&format!(" ({place})"));
    }
    if let Some(remediation) = &finding.remediation {
        text.push_str(&format!("; fix: {remediation}"));
    }
    text
}

fn render_review_queue(out: &mut String, report: &ValidationReport) {
    let pending: Vec<&ItemResult> = report
        .items()
        .filter(|item| item.status == ItemStatus::NeedsReview)
        .collect();
    if pending.is_empty() {
        return;
    }
    push_line(out, "## Requires Human Review".to_string());
    push_line(out, String::new());
    for item in pending {
        push_line(out, format!("- {}", item.text));
    }
    push_line(out, String::new());
}

fn render_summary(out: &mut String, report: &ValidationReport) {
    let total: usize = report.categories.iter().map(|c| c.items.len()).sum();
    push_line(out, "## Summary".to_string());
    push_line(out, String::new());
    push_line(
        out,
        format!(
            "{total} items: {} passed, {} partial, {} failed, {} need review, {} skipped.",
            report.count(ItemStatus::Pass),
            report.count(ItemStatus::Partial),
            report.count(ItemStatus::Fail),
            report.count(ItemStatus::NeedsReview),
            report.count(ItemStatus::Skipped),
        ),
    );
}

fn escape_pipes(text: &str) -> String {
    text.replace('|', "\\|")
}

fn push_line(out: &mut String, line: String) {
    out.push_str(&line);
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::{build_report, ReportInputs};
    use chrono::TimeZone;
    use chrono::Utc;
    use indexmap::IndexMap;
    use storylint_checks::{CheckId, CheckOutcome, Finding, Severity};
    use storylint_checklist::{Category, Checklist, ChecklistItem, ItemKind};
    use storylint_document::StoryDocument;

    fn sample_report() -> ValidationReport {
        let story = StoryDocument::parse(
            "# Story 2.3: Report export\n\n## Status\n\nDraft\n",
        );
        let checklist = Checklist {
            title: "Story Draft Checklist".to_string(),
            source_name: "story-draft".to_string(),
            categories: vec![Category {
                number: Some(1),
                title: "GOAL | CONTEXT".to_string(),
                line: 1,
                items: vec![
                    ChecklistItem {
                        text: "Metadata is present".to_string(),
                        kind: ItemKind::Auto(CheckId::from_static("metadata-presence")),
                        severity: Severity::Critical,
                        line: 3,
                    },
                    ChecklistItem {
                        text: "Business value is stated".to_string(),
                        kind: ItemKind::Manual,
                        severity: Severity::Warning,
                        line: 4,
                    },
                    ChecklistItem {
                        text: "Citations resolve".to_string(),
                        kind: ItemKind::Auto(CheckId::from_static("citations-resolve")),
                        severity: Severity::Critical,
                        line: 5,
                    },
                ],
            }],
        };
        let mut outcomes: IndexMap<CheckId, CheckOutcome> = IndexMap::new();
        outcomes.insert(
            CheckId::from_static("metadata-presence"),
            CheckOutcome::completed(vec![Finding::new(
                CheckId::from_static("metadata-presence"),
                Severity::Critical,
                "story has no status",
            )
            .in_section("Status")
            .at_line(3)
            .with_remediation("add a `## Status` section")]),
        );
        outcomes.insert(
            CheckId::from_static("citations-resolve"),
            CheckOutcome::skipped("no docs root configured"),
        );

        build_report(ReportInputs {
            story: &story,
            checklist: &checklist,
            outcomes: &outcomes,
            strict: false,
            generated_at: Utc.with_ymd_and_hms(2026, 8, 23, 9, 30, 0).unwrap(),
        })
    }

    #[test]
    fn renders_title_header_and_verdict() {
        let markdown = render_markdown(&sample_report());
        assert!(markdown.starts_with("# Validation Report: Story 2.3: Report export\n"));
        assert!(markdown.contains("- **Checklist:** Story Draft Checklist (`story-draft`)"));
        assert!(markdown.contains("- **Generated:** 2026-08-23 09:30:00 UTC"));
        assert!(markdown.contains("- **Tool:** storylint "));
        assert!(markdown.contains("## Verdict: ❌ NO-GO (readiness"));
    }

    #[test]
    fn findings_render_with_location_and_fix() {
        let markdown = render_markdown(&sample_report());
        assert!(markdown.contains(
            "  - CRIT: story has no status (Status, line 3); fix: add a `## Status` section"
        ));
    }

    #[test]
    fn manual_and_skipped_items_are_annotated() {
        let markdown = render_markdown(&sample_report());
        assert!(markdown.contains("- ❓ Business value is stated *(needs manual review)*"));
        assert!(markdown
            .contains("- ⏭️ Citations resolve *(skipped: no docs root configured)*"));
        assert!(markdown.contains("## Requires Human Review\n\n- Business value is stated\n"));
    }

    #[test]
    fn table_escapes_pipes_in_category_titles() {
        let markdown = render_markdown(&sample_report());
        assert!(markdown.contains("| 1 | GOAL \\| CONTEXT | ❌ FAIL | 1 |"));
    }

    #[test]
    fn summary_counts_statuses() {
        let markdown = render_markdown(&sample_report());
        assert!(markdown.contains("3 items: 0 passed, 0 partial, 1 failed, 1 need review, 1 skipped."));
    }
}
