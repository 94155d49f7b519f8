//! Checklist loading and parsing errors.

use std::path::PathBuf;
use storylint_checks::{CheckIdError, ParseSeverityError};
use thiserror::Error;

/// Errors produced while loading or parsing a checklist.
///
/// Unlike story parsing, checklist parsing is strict: a checklist is
/// configuration, and a typo in an `(auto:)` marker must stop the run
/// instead of silently skipping a check.
#[derive(Debug, Error)]
pub enum ChecklistError {
    /// Reading the checklist file failed.
    #[error("failed to read checklist {path}: {source}")]
    Io {
        /// Path that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The checklist file exceeds the size limit.
    #[error("checklist {path} is too large: {actual} bytes (limit {limit})")]
    TooLarge {
        /// Path of the oversized file.
        path: PathBuf,
        /// Actual size in bytes.
        actual: u64,
        /// Configured limit in bytes.
        limit: u64,
    },

    /// The checklist file is not valid UTF-8.
    #[error("checklist {path} is not valid UTF-8")]
    InvalidUtf8 {
        /// Path of the offending file.
        path: PathBuf,
    },

    /// The checklist contains no items.
    #[error("checklist `{name}` contains no items")]
    Empty {
        /// Checklist name.
        name: String,
    },

    /// An `(auto: ...)` marker does not hold a well-formed identifier.
    #[error("bad (auto:) marker at line {line}: {source}")]
    InvalidCheckId {
        /// One-based line of the marker.
        line: usize,
        /// Underlying identifier error.
        #[source]
        source: CheckIdError,
    },

    /// An `(auto: ...)` marker names a check that does not exist.
    #[error("unknown check `{id}` in (auto:) marker at line {line}; known checks: {known}")]
    UnknownCheck {
        /// The unknown identifier.
        id: String,
        /// One-based line of the marker.
        line: usize,
        /// Comma-separated known identifiers.
        known: String,
    },

    /// A `(severity: ...)` marker does not hold a known severity.
    #[error("bad (severity:) marker at line {line}: {source}")]
    InvalidSeverity {
        /// One-based line of the marker.
        line: usize,
        /// Underlying severity error.
        #[source]
        source: ParseSeverityError,
    },
}
