//! The check trait and its outcome type.

use crate::context::CheckContext;
use crate::docs::DocsError;
use crate::finding::Finding;
use crate::id::CheckId;
use async_trait::async_trait;
use thiserror::Error;

/// Result of running one check over a story.
#[derive(Debug, Clone)]
pub enum CheckOutcome {
    /// The check ran; zero findings means it passed.
    Completed {
        /// Problems found, possibly empty.
        findings: Vec<Finding>,
    },
    /// The check could not run in this configuration and judged nothing.
    Skipped {
        /// Human-readable reason, shown in the report.
        reason: String,
    },
}

impl CheckOutcome {
    /// A completed run with the given findings.
    #[must_use]
    pub fn completed(findings: Vec<Finding>) -> Self {
        Self::Completed { findings }
    }

    /// A completed run with nothing to report.
    #[must_use]
    pub fn clean() -> Self {
        Self::Completed {
            findings: Vec::new(),
        }
    }

    /// A skipped run.
    #[must_use]
    pub fn skipped(reason: impl Into<String>) -> Self {
        Self::Skipped {
            reason: reason.into(),
        }
    }

    /// The findings of a completed run, empty for skips.
    #[must_use]
    pub fn findings(&self) -> &[Finding] {
        match self {
            Self::Completed { findings } => findings,
            Self::Skipped { .. } => &[],
        }
    }
}

/// A single validation pass over a story document.
///
/// Checks are pure judges: they read the story and, through the context,
/// the docs tree it cites, and report findings. They never mutate
/// anything and never decide the verdict; scoring happens downstream.
#[async_trait]
pub trait Check: Send + Sync {
    /// Stable identifier used by `(auto: ...)` checklist markers.
    fn id(&self) -> CheckId;

    /// Short human-readable name for logs and reports.
    fn title(&self) -> &'static str;

    /// Runs the check against the story in `cx`.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError`] only for operational trouble (docs I/O).
    /// Problems in the story itself are findings, not errors.
    async fn run(&self, cx: &CheckContext<'_>) -> Result<CheckOutcome, CheckError>;
}

/// Operational failure while running a check.
#[derive(Debug, Error)]
pub enum CheckError {
    /// The docs provider failed in a way the check cannot attribute to
    /// the story.
    #[error(transparent)]
    Docs(#[from] DocsError),
}
