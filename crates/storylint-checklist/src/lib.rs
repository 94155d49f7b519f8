//! Checklist definitions for storylint.
//!
//! A checklist is the rubric a story is judged against: categories of
//! items, each either bound to a built-in check through an
//! `(auto: check-id)` marker or left for a human reviewer. The built-in
//! story-draft checklist ships embedded; teams point the validator at
//! their own Markdown checklist to replace it.
//!
//! Checklist parsing is strict where story parsing is lenient: an
//! `(auto:)` marker naming an unknown check is a configuration error
//! and fails the load.

pub mod builtin;
pub mod error;
pub mod model;
pub mod parse;

pub use builtin::{BUILTIN_NAME, STORY_DRAFT_SOURCE};
pub use error::ChecklistError;
pub use model::{Category, Checklist, ChecklistItem, ItemKind};
pub use parse::{load_checklist, parse_checklist, DEFAULT_MAX_CHECKLIST_BYTES};
