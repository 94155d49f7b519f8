//! The validation engine.

use crate::config::{ChecklistSource, ValidatorConfig};
use crate::error::ValidateError;
use chrono::Utc;
use futures::future::try_join_all;
use indexmap::IndexMap;
use std::path::Path;
use std::sync::Arc;
use storylint_checks::docs::FsDocsRepository;
use storylint_checks::{find_builtin, CheckContext, CheckId, CheckOutcome};
use storylint_checklist::{load_checklist, Checklist};
use storylint_document::{load_story, StoryDocument};
use storylint_report::{build_report, ReportInputs, ValidationReport};

/// Validates stories against a checklist.
///
/// A validator is built once from a [`ValidatorConfig`] and can judge
/// any number of stories; the docs repository and its parse cache are
/// shared across runs.
#[derive(Debug)]
pub struct StoryValidator {
    config: ValidatorConfig,
    docs: Option<Arc<FsDocsRepository>>,
}

impl StoryValidator {
    /// Builds a validator, verifying the docs root up front.
    ///
    /// # Errors
    ///
    /// Returns [`ValidateError::DocsRootMissing`] when a docs root is
    /// configured but is not a directory.
    pub fn new(config: ValidatorConfig) -> Result<Self, ValidateError> {
        let docs = match &config.docs_root {
            Some(root) => {
                if !root.is_dir() {
                    return Err(ValidateError::DocsRootMissing { path: root.clone() });
                }
                tracing::info!(root = %root.display(), "citation resolution enabled");
                Some(Arc::new(FsDocsRepository::with_limits(
                    root,
                    config.max_doc_bytes,
                    config.doc_cache_capacity,
                )))
            }
            None => {
                tracing::info!("no docs root configured; citation resolution will skip");
                None
            }
        };
        Ok(Self { config, docs })
    }

    /// The configuration this validator runs with.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Resolves the configured checklist.
    ///
    /// # Errors
    ///
    /// Returns [`ValidateError`] when a checklist file cannot be loaded
    /// or parsed.
    pub async fn checklist(&self) -> Result<Checklist, ValidateError> {
        match &self.config.checklist {
            ChecklistSource::Builtin => Ok(Checklist::builtin()),
            ChecklistSource::Path(path) => {
                Ok(load_checklist(path, self.config.max_checklist_bytes).await?)
            }
        }
    }

    /// Loads a story file and validates it.
    ///
    /// # Errors
    ///
    /// Returns [`ValidateError`] for loading trouble on either the story
    /// or the checklist, and for operational check failures.
    pub async fn validate_file(&self, path: &Path) -> Result<ValidationReport, ValidateError> {
        let story = load_story(path, self.config.max_story_bytes).await?;
        self.validate(&story).await
    }

    /// Validates an already-parsed story against the configured
    /// checklist.
    ///
    /// # Errors
    ///
    /// Returns [`ValidateError`] for checklist loading trouble and for
    /// operational check failures.
    pub async fn validate(&self, story: &StoryDocument) -> Result<ValidationReport, ValidateError> {
        let checklist = self.checklist().await?;
        self.validate_against(story, &checklist).await
    }

    /// Validates a story against an explicit checklist.
    ///
    /// All checks the checklist references run concurrently; each runs
    /// once even when several items bind to it.
    ///
    /// # Errors
    ///
    /// Returns [`ValidateError`] when a referenced check is not
    /// registered or a check hits operational trouble.
    pub async fn validate_against(
        &self,
        story: &StoryDocument,
        checklist: &Checklist,
    ) -> Result<ValidationReport, ValidateError> {
        let cx = match self.docs.as_deref() {
            Some(docs) => CheckContext::with_docs(story, docs, &self.config.settings),
            None => CheckContext::new(story, &self.config.settings),
        };

        let ids = checklist.auto_check_ids();
        let checks = ids
            .iter()
            .map(|id| {
                find_builtin(id.as_str()).ok_or_else(|| ValidateError::UnknownCheck {
                    id: id.as_str().to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let outcomes = try_join_all(checks.iter().map(|check| check.run(&cx))).await?;

        let mut by_id: IndexMap<CheckId, CheckOutcome> = IndexMap::with_capacity(ids.len());
        for (id, outcome) in ids.into_iter().zip(outcomes) {
            match &outcome {
                CheckOutcome::Completed { findings } => {
                    tracing::debug!(check = %id, findings = findings.len(), "check completed");
                }
                CheckOutcome::Skipped { reason } => {
                    tracing::debug!(check = %id, reason = %reason, "check skipped");
                }
            }
            by_id.insert(id, outcome);
        }

        let report = build_report(ReportInputs {
            story,
            checklist,
            outcomes: &by_id,
            strict: self.config.strict,
            generated_at: Utc::now(),
        });
        tracing::info!(
            report = %report.id,
            story = %story.display_name(),
            verdict = report.verdict.label(),
            readiness = report.readiness,
            "validation finished"
        );
        Ok(report)
    }
}
