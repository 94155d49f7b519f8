//! The story template's required sections must exist and have content.

use crate::check::{Check, CheckError, CheckOutcome};
use crate::context::CheckContext;
use crate::finding::Finding;
use crate::id::CheckId;
use crate::severity::Severity;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

/// Identifier of this check.
pub const ID: &str = "template-sections";

/// Unfilled template markers: `{{placeholder}}`, `_TBD_`, `TODO:`.
static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{[^{}]*\}\}|_TBD_|TODO:").expect("placeholder pattern"));

/// Verifies every required template section is present, non-empty, and
/// actually filled in.
///
/// Matching is tolerant of punctuation and casing, and a required title
/// matches by prefix, so `Tasks` accepts a `Tasks / Subtasks` heading.
/// Template placeholders left in a section body are findings too.
pub struct TemplateSections;

#[async_trait]
impl Check for TemplateSections {
    fn id(&self) -> CheckId {
        CheckId::from_static(ID)
    }

    fn title(&self) -> &'static str {
        "Template sections are present"
    }

    async fn run(&self, cx: &CheckContext<'_>) -> Result<CheckOutcome, CheckError> {
        let mut findings = Vec::new();

        for required in &cx.settings.required_sections {
            match cx.story.sections.find_prefix(required) {
                None => findings.push(
                    Finding::new(
                        self.id(),
                        Severity::Critical,
                        format!("required section `{required}` is missing"),
                    )
                    .with_remediation(format!("add a `## {required}` section")),
                ),
                Some(section) if section.is_blank() => findings.push(
                    Finding::new(
                        self.id(),
                        Severity::Warning,
                        format!("section `{}` is empty", section.title),
                    )
                    .in_section(section.title.clone())
                    .at_line(section.lines.start),
                ),
                Some(section) => {
                    for (line, text) in section.body_lines() {
                        for marker in PLACEHOLDER.find_iter(text) {
                            findings.push(
                                Finding::new(
                                    self.id(),
                                    Severity::Warning,
                                    format!(
                                        "section `{}` holds an unfilled placeholder (`{}`)",
                                        section.title,
                                        marker.as_str()
                                    ),
                                )
                                .in_section(section.title.clone())
                                .at_line(line)
                                .with_remediation("replace the placeholder with real content"),
                            );
                        }
                    }
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

    const COMPLETE: &str = "\
# Story 1.1: Complete

## Status

Draft

## Story

As a user, I want things.

## Acceptance Criteria

1. It works in a demonstrable, observable way.

## Tasks / Subtasks

- [ ] Do it (AC: 1)

## Dev Notes

Notes. [Source: architecture/x.md]

## Testing

Unit tests beside the code.

## Change Log

| Date | Version | Description |
";

    async fn run_with(source: &str, settings: &CheckSettings) -> Vec<Finding> {
        let story = StoryDocument::parse(source);
        let cx = CheckContext::new(&story, settings);
        TemplateSections.run(&cx).await.unwrap().findings().to_vec()
    }

    #[tokio::test]
    async fn complete_template_is_clean() {
        let findings = run_with(COMPLETE, &CheckSettings::default()).await;
        assert!(findings.is_empty(), "{findings:?}");
    }

    #[tokio::test]
    async fn missing_sections_are_critical() {
        let findings = run_with("# Story 1.1: Sparse\n\n## Status\n\nDraft\n", &CheckSettings::default()).await;
        let missing: Vec<&str> = findings
            .iter()
            .filter(|f| f.severity == Severity::Critical)
            .map(|f| f.message.as_str())
            .collect();
        assert_eq!(missing.len(), 6, "{missing:?}");
        assert!(missing.iter().any(|m| m.contains("`Dev Notes`")));
    }

    #[tokio::test]
    async fn blank_section_is_a_warning() {
        let source = "# Story 1.1: Hollow\n\n## Status\n\n## Story\n\ncontent\n";
        let settings = CheckSettings {
            required_sections: vec!["Status".into(), "Story".into()],
            ..CheckSettings::default()
        };
        let findings = run_with(source, &settings).await;
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Warning);
        assert!(findings[0].message.contains("`Status`"));
        assert_eq!(findings[0].location.line, Some(3));
    }

    #[tokio::test]
    async fn prefix_matches_tasks_subtasks_heading() {
        let settings = CheckSettings {
            required_sections: vec!["Tasks".into()],
            ..CheckSettings::default()
        };
        let findings = run_with(COMPLETE, &settings).await;
        assert!(findings.is_empty());
    }

    #[tokio::test]
    async fn leftover_placeholders_warn() {
        let source = "# Story 1.1: Unfilled\n\n## Dev Notes\n\n\
                      {{agent_notes}} go here.\nRisk level: _TBD_\nTODO: confirm the schema\n";
        let settings = CheckSettings {
            required_sections: vec!["Dev Notes".into()],
            ..CheckSettings::default()
        };
        let findings = run_with(source, &settings).await;
        assert_eq!(findings.len(), 3, "{findings:?}");
        assert!(findings.iter().all(|f| f.severity == Severity::Warning));
        assert!(findings[0].message.contains("{{agent_notes}}"));
        assert_eq!(findings[0].location.line, Some(5));
        assert_eq!(findings[1].location.line, Some(6));
    }
}
