//! Finding and checklist-item severity.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// How seriously a finding or checklist item counts against a story.
///
/// Ordered so that `Info < Warning < Critical`, which lets callers take
/// a `max()` over findings to get the dominating severity.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Advisory. Never affects the verdict.
    Info,
    /// Should be fixed before approval; blocks only in strict mode.
    Warning,
    /// Blocks the story outright.
    Critical,
}

impl Severity {
    /// Weight used by the readiness score.
    #[inline]
    #[must_use]
    pub const fn weight(self) -> u32 {
        match self {
            Self::Info => 1,
            Self::Warning => 2,
            Self::Critical => 3,
        }
    }

    /// Short uppercase label for report tables.
    #[inline]
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARN",
            Self::Critical => "CRIT",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => f.write_str("info"),
            Self::Warning => f.write_str("warning"),
            Self::Critical => f.write_str("critical"),
        }
    }
}

/// Error parsing a [`Severity`] from text.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown severity `{0}`, expected critical, warning, or info")]
pub struct ParseSeverityError(pub String);

impl FromStr for Severity {
    type Err = ParseSeverityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "critical" | "blocker" => Ok(Self::Critical),
            "warning" | "warn" => Ok(Self::Warning),
            "info" | "note" => Ok(Self::Info),
            _ => Err(ParseSeverityError(s.trim().to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn ordering_puts_critical_on_top() {
        assert!(Severity::Critical > Severity::Warning);
        assert!(Severity::Warning > Severity::Info);
        let worst = [Severity::Info, Severity::Critical, Severity::Warning]
            .into_iter()
            .max();
        assert_eq!(worst, Some(Severity::Critical));
    }

    #[test]
    fn parses_aliases() {
        assert_eq!("critical".parse::<Severity>().unwrap(), Severity::Critical);
        assert_eq!("WARN".parse::<Severity>().unwrap(), Severity::Warning);
        assert_eq!(" note ".parse::<Severity>().unwrap(), Severity::Info);
        assert!("fatal".parse::<Severity>().is_err());
    }

    #[test]
    fn weights_match_severity_order() {
        assert!(Severity::Critical.weight() > Severity::Warning.weight());
        assert!(Severity::Warning.weight() > Severity::Info.weight());
    }

    #[test]
    fn serde_round_trip_is_lowercase() {
        assert_eq!(serde_json::to_string(&Severity::Warning).unwrap(), "\"warning\"");
        let back: Severity = serde_json::from_str("\"critical\"").unwrap();
        assert_eq!(back, Severity::Critical);
    }
}
