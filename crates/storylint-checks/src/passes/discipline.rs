//! Dev notes must carry well-formed citations.

use crate::check::{Check, CheckError, CheckOutcome};
use crate::context::CheckContext;
use crate::finding::Finding;
use crate::id::CheckId;
use crate::severity::Severity;
use async_trait::async_trait;
use storylint_document::sections;

/// Identifier of this check.
pub const ID: &str = "citation-discipline";

/// Enforces the citation convention itself, independent of whether the
/// cited documents exist: citation-shaped text must parse, and a
/// non-empty Dev Notes section must cite at least one source.
pub struct CitationDiscipline;

#[async_trait]
impl Check for CitationDiscipline {
    fn id(&self) -> CheckId {
        CheckId::from_static(ID)
    }

    fn title(&self) -> &'static str {
        "Citations follow the convention"
    }

    async fn run(&self, cx: &CheckContext<'_>) -> Result<CheckOutcome, CheckError> {
        let story = cx.story;
        let mut findings = Vec::new();

        for malformed in &story.malformed_citations {
            findings.push(
                Finding::new(
                    self.id(),
                    Severity::Warning,
                    format!("text looks like a citation but does not parse: `{}`", malformed.raw),
                )
                .at_line(malformed.line)
                .with_remediation("write citations as `[Source: path#anchor]` with an unbroken path"),
            );
        }

        if let Some(dev_notes) = story.sections.find(sections::DEV_NOTES) {
            if !dev_notes.is_blank() {
                // A malformed citation is still an attempt; the finding
                // above already covers it.
                let cites_inside = story
                    .citations
                    .iter()
                    .map(|citation| citation.line)
                    .chain(story.malformed_citations.iter().map(|m| m.line))
                    .any(|line| dev_notes.lines.contains(&line));
                if !cites_inside {
                    findings.push(
                        Finding::new(
                            self.id(),
                            Severity::Warning,
                            "dev notes cite no sources",
                        )
                        .in_section(sections::DEV_NOTES)
                        .at_line(dev_notes.lines.start)
                        .with_remediation(
                            "cite the architecture documents the notes were drawn from",
                        ),
                    );
                }
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

    async fn run_on(source: &str) -> Vec<Finding> {
        let story = StoryDocument::parse(source);
        let settings = CheckSettings::default();
        let cx = CheckContext::new(&story, &settings);
        CitationDiscipline.run(&cx).await.unwrap().findings().to_vec()
    }

    #[tokio::test]
    async fn cited_dev_notes_are_clean() {
        let findings =
            run_on("## Dev Notes\n\nRepository pattern applies. [Source: architecture/data.md]\n")
                .await;
        assert!(findings.is_empty(), "{findings:?}");
    }

    #[tokio::test]
    async fn malformed_citation_warns_with_line() {
        let findings = run_on("## Dev Notes\n\nSee [Source: my docs/data.md] for details.\n").await;
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Warning);
        assert_eq!(findings[0].location.line, Some(3));
    }

    #[tokio::test]
    async fn uncited_dev_notes_warn() {
        let findings = run_on("## Dev Notes\n\nFacts asserted from memory alone.\n").await;
        assert_eq!(findings.len(), 1);
        assert!(findings[0].message.contains("cite no sources"));
    }

    #[tokio::test]
    async fn citation_outside_dev_notes_does_not_satisfy_the_section() {
        let source = "## Story\n\n[Source: real.md]\n\n## Dev Notes\n\nUncited prose.\n";
        let findings = run_on(source).await;
        assert_eq!(findings.len(), 1);
        assert!(findings[0].message.contains("cite no sources"));
    }

    #[tokio::test]
    async fn blank_dev_notes_are_left_to_the_template_check() {
        let findings = run_on("## Dev Notes\n\n## Testing\n\nNotes.\n").await;
        assert!(findings.is_empty());
    }

    #[tokio::test]
    async fn missing_dev_notes_section_is_clean_here() {
        let findings = run_on("## Story\n\nJust a story.\n").await;
        assert!(findings.is_empty());
    }
}
