//! Context handed to every check.

use crate::docs::DocsProvider;
use storylint_document::{sections, StoryDocument};

/// Tunable knobs shared by the built-in checks.
#[derive(Debug, Clone)]
pub struct CheckSettings {
    /// Section titles the story template requires, matched by
    /// normalized prefix.
    pub required_sections: Vec<String>,
    /// Minimum number of acceptance criteria a story must carry.
    pub min_criteria: usize,
}

impl Default for CheckSettings {
    fn default() -> Self {
        Self {
            required_sections: vec![
                sections::STATUS.to_string(),
                sections::STORY.to_string(),
                sections::ACCEPTANCE_CRITERIA.to_string(),
                sections::TASKS.to_string(),
                sections::DEV_NOTES.to_string(),
                sections::TESTING.to_string(),
                sections::CHANGE_LOG.to_string(),
            ],
            min_criteria: 1,
        }
    }
}

/// Everything a check may look at while judging one story.
pub struct CheckContext<'a> {
    /// The story under validation.
    pub story: &'a StoryDocument,
    /// Docs tree the story's citations point into, when configured.
    pub docs: Option<&'a dyn DocsProvider>,
    /// Shared check settings.
    pub settings: &'a CheckSettings,
}

impl<'a> CheckContext<'a> {
    /// Context with no docs tree; citation resolution will skip.
    #[must_use]
    pub fn new(story: &'a StoryDocument, settings: &'a CheckSettings) -> Self {
        Self {
            story,
            docs: None,
            settings,
        }
    }

    /// Context with a docs tree for citation resolution.
    #[must_use]
    pub fn with_docs(
        story: &'a StoryDocument,
        docs: &'a dyn DocsProvider,
        settings: &'a CheckSettings,
    ) -> Self {
        Self {
            story,
            docs: Some(docs),
            settings,
        }
    }
}
