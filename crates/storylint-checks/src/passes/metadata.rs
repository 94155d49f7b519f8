//! Story metadata must identify the story and its workflow state.

use crate::check::{Check, CheckError, CheckOutcome};
use crate::context::CheckContext;
use crate::finding::Finding;
use crate::id::CheckId;
use crate::severity::Severity;
use async_trait::async_trait;
use storylint_document::sections;

/// Identifier of this check.
pub const ID: &str = "metadata-presence";

/// Verifies the story carries a key, a title, and a recognized status.
pub struct MetadataPresence;

#[async_trait]
impl Check for MetadataPresence {
    fn id(&self) -> CheckId {
        CheckId::from_static(ID)
    }

    fn title(&self) -> &'static str {
        "Story metadata is present"
    }

    async fn run(&self, cx: &CheckContext<'_>) -> Result<CheckOutcome, CheckError> {
        let story = cx.story;
        let mut findings = Vec::new();

        if story.key.is_none() {
            findings.push(
                Finding::new(self.id(), Severity::Critical, "story has no epic.story key")
                    .with_remediation(
                        "add `epic` and `story` frontmatter, or a `# Story E.N: Title` heading",
                    ),
            );
        }
        if story.title.is_none() {
            findings.push(
                Finding::new(self.id(), Severity::Critical, "story has no title")
                    .with_remediation("give the story a level-1 heading or `title` frontmatter"),
            );
        }

        let status_line = story
            .sections
            .find(sections::STATUS)
            .map(|section| section.lines.start);
        match &story.status {
            None => {
                let mut finding =
                    Finding::new(self.id(), Severity::Critical, "story has no status")
                        .with_remediation(
                            "add a `## Status` section or `status` frontmatter",
                        )
                        .in_section(sections::STATUS);
                if let Some(line) = status_line {
                    finding = finding.at_line(line);
                }
                findings.push(finding);
            }
            Some(status) if !status.is_recognized() => {
                let mut finding = Finding::new(
                    self.id(),
                    Severity::Warning,
                    format!("status `{status}` is not in the workflow vocabulary"),
                )
                .with_remediation("use one of Draft, Approved, In Progress, Review, Done")
                .in_section(sections::STATUS);
                if let Some(line) = status_line {
                    finding = finding.at_line(line);
                }
                findings.push(finding);
            }
            Some(_) => {}
        }

        if let Some(error) = &story.frontmatter_error {
            findings.push(
                Finding::new(
                    self.id(),
                    Severity::Warning,
                    format!("frontmatter did not parse: {error}"),
                )
                .at_line(1),
            );
        }

        Ok(CheckOutcome::completed(findings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::CheckSettings;
    use storylint_document::StoryDocument;

    async fn run_on(source: &str) -> Vec<Finding> {
        let story = StoryDocument::parse(source);
        let settings = CheckSettings::default();
        let cx = CheckContext::new(&story, &settings);
        let outcome = MetadataPresence.run(&cx).await.unwrap();
        outcome.findings().to_vec()
    }

    #[tokio::test]
    async fn complete_metadata_is_clean() {
        let findings = run_on("# Story 1.2: Clean\n\n## Status\n\nDraft\n").await;
        assert!(findings.is_empty(), "{findings:?}");
    }

    #[tokio::test]
    async fn bare_document_fails_all_three() {
        let findings = run_on("some prose without structure\n").await;
        let critical = findings
            .iter()
            .filter(|f| f.severity == Severity::Critical)
            .count();
        assert_eq!(critical, 3);
    }

    #[tokio::test]
    async fn unrecognized_status_is_a_warning() {
        let findings = run_on("# Story 1.2: Odd\n\n## Status\n\nBlocked\n").await;
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Warning);
        assert!(findings[0].message.contains("Blocked"));
        assert_eq!(findings[0].location.line, Some(3));
    }

    #[tokio::test]
    async fn broken_frontmatter_is_reported() {
        let findings = run_on("---\ntitle: [oops\n---\n# Story 3.1: Has heading\n\n## Status\n\nDraft\n").await;
        assert!(findings
            .iter()
            .any(|f| f.message.contains("frontmatter") && f.severity == Severity::Warning));
    }
}
