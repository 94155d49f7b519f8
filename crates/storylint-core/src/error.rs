//! Engine errors.

use std::path::PathBuf;
use storylint_checklist::ChecklistError;
use storylint_checks::CheckError;
use storylint_document::DocumentError;
use thiserror::Error;

/// Operational failures of a validation run.
///
/// Everything here aborts the run; problems *in* the story never land
/// here, they become findings in the report.
#[derive(Debug, Error)]
pub enum ValidateError {
    /// The story file could not be loaded.
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// The checklist could not be loaded or parsed.
    #[error(transparent)]
    Checklist(#[from] ChecklistError),

    /// A check hit operational trouble.
    #[error(transparent)]
    Check(#[from] CheckError),

    /// A docs root was configured but is not a directory.
    #[error("docs root {path} does not exist or is not a directory")]
    DocsRootMissing {
        /// The configured root.
        path: PathBuf,
    },

    /// A checklist referenced a check the registry does not know.
    ///
    /// Checklist parsing validates `(auto:)` markers, so reaching this
    /// means the registry and the parser disagree about what exists.
    #[error("check `{id}` is not registered")]
    UnknownCheck {
        /// The unresolvable identifier.
        id: String,
    },

    /// The configuration file could not be read or parsed.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors loading a `storylint.toml` configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading the file failed.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// Path that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML or holds unknown keys.
    #[error("invalid config {path}: {source}")]
    Parse {
        /// Path of the offending file.
        path: PathBuf,
        /// Underlying TOML error.
        #[source]
        source: toml::de::Error,
    },
}
