//! Citations must point at documents and anchors that exist.

use crate::check::{Check, CheckError, CheckOutcome};
use crate::context::CheckContext;
use crate::docs::DocsError;
use crate::finding::Finding;
use crate::id::CheckId;
use crate::severity::Severity;
use async_trait::async_trait;
use storylint_document::slugify;

/// Identifier of this check.
pub const ID: &str = "citations-resolve";

/// Resolves every `[Source: path#anchor]` citation against the docs
/// tree.
///
/// Without a configured docs tree the check skips rather than failing:
/// absence of the tree says nothing about the story. With one, a dead
/// path or a dead anchor blocks the story, and a citation that tries to
/// climb out of the docs root is treated the same as a dead path.
pub struct CitationsResolve;

#[async_trait]
impl Check for CitationsResolve {
    fn id(&self) -> CheckId {
        CheckId::from_static(ID)
    }

    fn title(&self) -> &'static str {
        "Citations resolve"
    }

    async fn run(&self, cx: &CheckContext<'_>) -> Result<CheckOutcome, CheckError> {
        let Some(docs) = cx.docs else {
            return Ok(CheckOutcome::skipped("no docs root configured"));
        };

        let mut findings = Vec::new();
        for citation in &cx.story.citations {
            match docs.resolve(&citation.path).await {
                Ok(Some(doc)) => {
                    if let Some(anchor) = &citation.anchor {
                        let slug = slugify(anchor);
                        if !doc.has_anchor(&slug) {
                            findings.push(
                                Finding::new(
                                    self.id(),
                                    Severity::Critical,
                                    format!(
                                        "citation anchor `#{anchor}` not found in `{}`",
                                        citation.path
                                    ),
                                )
                                .at_line(citation.line)
                                .with_remediation(format!(
                                    "match the anchor to a heading of `{}`",
                                    citation.path
                                )),
                            );
                        }
                    }
                }
                Ok(None) => findings.push(
                    Finding::new(
                        self.id(),
                        Severity::Critical,
                        format!("cited file `{}` does not exist", citation.path),
                    )
                    .at_line(citation.line)
                    .with_remediation("fix the path or restore the document"),
                ),
                Err(DocsError::OutsideRoot { path }) => findings.push(
                    Finding::new(
                        self.id(),
                        Severity::Critical,
                        format!("citation path `{path}` escapes the docs root"),
                    )
                    .at_line(citation.line)
                    .with_remediation("cite documents inside the docs tree"),
                ),
                Err(err) => return Err(err.into()),
            }
        }

        Ok(CheckOutcome::completed(findings))
    }
}
