//! Orchestration for storylint: configuration, checklist resolution,
//! concurrent check execution, and report assembly.
//!
//! The crate ties the rest of the workspace together. A
//! [`StoryValidator`] is built once from a [`ValidatorConfig`], loads
//! the configured checklist, runs every check the checklist references
//! against a story, and folds the outcomes into a
//! [`ValidationReport`].
//!
//! ```no_run
//! use storylint_core::{StoryValidator, ValidatorConfig};
//!
//! # async fn demo() -> Result<(), storylint_core::ValidateError> {
//! let validator = StoryValidator::new(ValidatorConfig::default())?;
//! let report = validator.validate_file("stories/1.2.story.md".as_ref()).await?;
//! println!("{}", report.verdict.label());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod engine;
pub mod error;

pub use config::{ChecklistSource, ConfigFile, ValidatorConfig};
pub use engine::StoryValidator;
pub use error::{ConfigError, ValidateError};

pub use storylint_report::{render_markdown, ValidationReport, Verdict};
