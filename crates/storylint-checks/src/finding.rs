//! Findings reported by validation passes.

use crate::id::CheckId;
use crate::severity::Severity;
use serde::Serialize;

/// Where in the story a finding points.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Location {
    /// Section title the problem sits in, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    /// One-based line number, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
}

impl Location {
    /// Whether neither section nor line is known.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.section.is_none() && self.line.is_none()
    }
}

/// One concrete problem a check found in a story.
#[derive(Debug, Clone, Serialize)]
pub struct Finding {
    /// Check that produced the finding.
    pub check: CheckId,
    /// How badly this counts against the story.
    pub severity: Severity,
    /// What is wrong, in one sentence.
    pub message: String,
    /// How to fix it, when the check can say.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remediation: Option<String>,
    /// Where the problem sits.
    #[serde(skip_serializing_if = "Location::is_empty")]
    pub location: Location,
}

impl Finding {
    /// Creates a finding with no remediation or location.
    pub fn new(check: CheckId, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            check,
            severity,
            message: message.into(),
            remediation: None,
            location: Location::default(),
        }
    }

    /// Attaches a remediation hint.
    #[must_use]
    pub fn with_remediation(mut self, remediation: impl Into<String>) -> Self {
        self.remediation = Some(remediation.into());
        self
    }

    /// Points the finding at a section.
    #[must_use]
    pub fn in_section(mut self, section: impl Into<String>) -> Self {
        self.location.section = Some(section.into());
        self
    }

    /// Points the finding at a line.
    #[must_use]
    pub fn at_line(mut self, line: usize) -> Self {
        self.location.line = Some(line);
        self
    }
}

/// The worst severity among findings, if any.
#[must_use]
pub fn worst_severity(findings: &[Finding]) -> Option<Severity> {
    findings.iter().map(|f| f.severity).max()
}
