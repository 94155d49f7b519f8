//! Error types for story document loading and parsing.

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while loading a story document from disk.
///
/// Parse-level problems (missing metadata, malformed citations, unknown
/// status values) are deliberately *not* errors: they surface as data on
/// [`crate::StoryDocument`] so validation passes can report them as
/// findings instead of aborting the run.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// Reading the story file from disk failed.
    #[error("failed to read story file {path}: {source}")]
    Io {
        /// Path that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The story file exceeds the configured size limit.
    #[error("story file {path} is too large: {actual} bytes (limit {limit})")]
    TooLarge {
        /// Path of the oversized file.
        path: PathBuf,
        /// Actual size in bytes.
        actual: u64,
        /// Configured limit in bytes.
        limit: u64,
    },

    /// The story file was read but contains no content.
    #[error("story file {path} is empty")]
    Empty {
        /// Path of the empty file.
        path: PathBuf,
    },

    /// The story file is not valid UTF-8.
    #[error("story file {path} is not valid UTF-8")]
    InvalidUtf8 {
        /// Path of the offending file.
        path: PathBuf,
    },
}
