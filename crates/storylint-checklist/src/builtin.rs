//! The built-in story-draft checklist.

use crate::model::Checklist;
use crate::parse::parse_checklist;
use once_cell::sync::Lazy;

/// Name the built-in checklist is addressed by.
pub const BUILTIN_NAME: &str = "story-draft";

/// Source text of the built-in checklist, embedded at compile time.
pub const STORY_DRAFT_SOURCE: &str = include_str!("../assets/story-draft-checklist.md");

static BUILTIN: Lazy<Checklist> = Lazy::new(|| {
    parse_checklist(STORY_DRAFT_SOURCE, BUILTIN_NAME).expect("builtin checklist is well-formed")
});

impl Checklist {
    /// The built-in story-draft checklist.
    #[must_use]
    pub fn builtin() -> Self {
        BUILTIN.clone()
    }
}
