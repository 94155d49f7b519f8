//! Validation passes for storylint.
//!
//! A [`Check`] is one async pass over a parsed story. Passes are pure:
//! they read the [`storylint_document::StoryDocument`] and, through
//! [`docs::DocsProvider`], the documentation tree its citations point
//! into, and they emit [`Finding`]s. Scoring and verdicts live
//! downstream; a pass never decides whether the story goes or not.
//!
//! Six passes are built in, addressable from checklist `(auto: ...)`
//! markers by the identifiers in [`BUILTIN_IDS`]:
//!
//! | id | judges |
//! |----|--------|
//! | `metadata-presence` | story key, title, status |
//! | `template-sections` | required template sections exist, non-empty |
//! | `criteria-quality`  | acceptance criteria exist and are testable |
//! | `task-coverage`     | every criterion is implemented by a task |
//! | `citations-resolve` | cited paths and anchors exist in the docs tree |
//! | `citation-discipline` | citation syntax and dev-notes sourcing |

pub mod check;
pub mod context;
pub mod docs;
pub mod finding;
pub mod id;
pub mod passes;
pub mod severity;

pub use check::{Check, CheckError, CheckOutcome};
pub use context::{CheckContext, CheckSettings};
pub use finding::{worst_severity, Finding, Location};
pub use id::{CheckId, CheckIdError};
pub use passes::{builtin_checks, find_builtin, is_builtin, BUILTIN_IDS};
pub use severity::{ParseSeverityError, Severity};
