//! Acceptance criteria must exist and be testable.

use crate::check::{Check, CheckError, CheckOutcome};
use crate::context::CheckContext;
use crate::finding::Finding;
use crate::id::CheckId;
use crate::severity::Severity;
use async_trait::async_trait;
use std::collections::HashSet;
use storylint_document::{plain_text, sections};

/// Identifier of this check.
pub const ID: &str = "criteria-quality";

/// Below this many words a criterion cannot state an observable
/// behavior.
const MIN_TESTABLE_WORDS: usize = 3;

/// Wording that asserts nothing measurable.
const VAGUE_TERMS: [&str; 6] = [
    "should work",
    "works correctly",
    "properly",
    "as expected",
    "appropriately",
    "user-friendly",
];

/// Judges the acceptance criteria list: presence, numbering, and
/// testability of each criterion.
pub struct CriteriaQuality;

#[async_trait]
impl Check for CriteriaQuality {
    fn id(&self) -> CheckId {
        CheckId::from_static(ID)
    }

    fn title(&self) -> &'static str {
        "Acceptance criteria are testable"
    }

    async fn run(&self, cx: &CheckContext<'_>) -> Result<CheckOutcome, CheckError> {
        let criteria = &cx.story.criteria;
        let mut findings = Vec::new();

        if criteria.len() < cx.settings.min_criteria {
            let message = if criteria.is_empty() {
                "story has no numbered acceptance criteria".to_string()
            } else {
                format!(
                    "story has {} acceptance criteria, required at least {}",
                    criteria.len(),
                    cx.settings.min_criteria
                )
            };
            findings.push(
                Finding::new(self.id(), Severity::Critical, message)
                    .in_section(sections::ACCEPTANCE_CRITERIA)
                    .with_remediation("list the conditions of acceptance as a numbered list"),
            );
        }

        let mut seen: HashSet<u32> = HashSet::new();
        for criterion in criteria {
            if !seen.insert(criterion.number) {
                findings.push(
                    Finding::new(
                        self.id(),
                        Severity::Warning,
                        format!("criterion number {} appears more than once", criterion.number),
                    )
                    .at_line(criterion.line),
                );
            }
        }

        if !criteria.is_empty() && seen.len() == criteria.len() {
            let mut numbers: Vec<u32> = criteria.iter().map(|c| c.number).collect();
            numbers.sort_unstable();
            let sequential = numbers
                .iter()
                .enumerate()
                .all(|(i, n)| *n as usize == i + 1);
            if !sequential {
                findings.push(
                    Finding::new(
                        self.id(),
                        Severity::Info,
                        format!("criteria numbering is not sequential 1..{}", criteria.len()),
                    )
                    .in_section(sections::ACCEPTANCE_CRITERIA),
                );
            }
        }

        for criterion in criteria {
            let prose = plain_text(&criterion.text);
            if prose.split_whitespace().count() < MIN_TESTABLE_WORDS {
                findings.push(
                    Finding::new(
                        self.id(),
                        Severity::Warning,
                        format!("criterion {} is too short to be testable", criterion.number),
                    )
                    .at_line(criterion.line)
                    .with_remediation("state an observable behavior and its trigger"),
                );
                continue;
            }
            let lowered = prose.to_lowercase();
            if let Some(term) = VAGUE_TERMS.iter().find(|t| lowered.contains(*t)) {
                findings.push(
                    Finding::new(
                        self.id(),
                        Severity::Info,
                        format!("criterion {} leans on vague wording (`{term}`)", criterion.number),
                    )
                    .at_line(criterion.line)
                    .with_remediation("replace the vague phrase with a measurable outcome"),
                );
            }
        }

        Ok(CheckOutcome::completed(findings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::CheckSettings;
    use storylint_document::StoryDocument;

    async fn run_on(ac_block: &str) -> Vec<Finding> {
        let source = format!("# Story 1.1: T\n\n## Acceptance Criteria\n\n{ac_block}");
        let story = StoryDocument::parse(&source);
        let settings = CheckSettings::default();
        let cx = CheckContext::new(&story, &settings);
        CriteriaQuality.run(&cx).await.unwrap().findings().to_vec()
    }

    #[tokio::test]
    async fn solid_criteria_are_clean() {
        let findings = run_on(
            "1. Exported report renders as valid Markdown.\n2. Exit code is 1 when the verdict is NO-GO.\n",
        )
        .await;
        assert!(findings.is_empty(), "{findings:?}");
    }

    #[tokio::test]
    async fn empty_list_is_critical() {
        let findings = run_on("").await;
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Critical);
    }

    #[tokio::test]
    async fn duplicate_numbers_warn() {
        let findings = run_on("1. First condition holds here.\n1. Second condition holds here.\n").await;
        assert!(findings
            .iter()
            .any(|f| f.severity == Severity::Warning && f.message.contains("more than once")));
    }

    #[tokio::test]
    async fn gap_in_numbering_is_info() {
        let findings = run_on("1. First condition holds here.\n3. Third condition holds here.\n").await;
        assert!(findings
            .iter()
            .any(|f| f.severity == Severity::Info && f.message.contains("not sequential")));
    }

    #[tokio::test]
    async fn short_criterion_warns() {
        let findings = run_on("1. Works fine.\n").await;
        assert!(findings
            .iter()
            .any(|f| f.severity == Severity::Warning && f.message.contains("too short")));
    }

    #[tokio::test]
    async fn vague_wording_is_info() {
        let findings = run_on("1. The export feature should work properly for users.\n").await;
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Info);
        assert!(findings[0].message.contains("should work"));
    }
}
