//! Engine configuration.
//!
//! Configuration layers the usual way: built-in defaults, then an
//! optional `storylint.toml`, then whatever the caller (the CLI) sets
//! on top.

use crate::error::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use storylint_checks::docs::{DEFAULT_DOC_CACHE_CAPACITY, DEFAULT_MAX_DOC_BYTES};
use storylint_checks::CheckSettings;
use storylint_checklist::DEFAULT_MAX_CHECKLIST_BYTES;
use storylint_document::DEFAULT_MAX_STORY_BYTES;

/// Where the checklist comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChecklistSource {
    /// The embedded story-draft checklist.
    Builtin,
    /// A checklist file on disk.
    Path(PathBuf),
}

/// Full engine configuration.
#[derive(Debug, Clone)]
pub struct ValidatorConfig {
    /// Root of the documentation tree citations resolve against.
    /// `None` skips citation resolution.
    pub docs_root: Option<PathBuf>,
    /// Checklist to judge stories against.
    pub checklist: ChecklistSource,
    /// Promote warnings to blockers.
    pub strict: bool,
    /// Size limit for story files.
    pub max_story_bytes: u64,
    /// Size limit for checklist files.
    pub max_checklist_bytes: u64,
    /// Size limit for cited documents.
    pub max_doc_bytes: u64,
    /// Parsed-document cache capacity, in entries.
    pub doc_cache_capacity: u64,
    /// Knobs shared by the built-in checks.
    pub settings: CheckSettings,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            docs_root: None,
            checklist: ChecklistSource::Builtin,
            strict: false,
            max_story_bytes: DEFAULT_MAX_STORY_BYTES,
            max_checklist_bytes: DEFAULT_MAX_CHECKLIST_BYTES,
            max_doc_bytes: DEFAULT_MAX_DOC_BYTES,
            doc_cache_capacity: DEFAULT_DOC_CACHE_CAPACITY,
            settings: CheckSettings::default(),
        }
    }
}

/// On-disk configuration, `storylint.toml`. Every field is optional;
/// present fields overlay the defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct ConfigFile {
    /// Docs tree root, relative paths resolved against the config file.
    pub docs_root: Option<PathBuf>,
    /// Checklist file, relative paths resolved against the config file.
    pub checklist: Option<PathBuf>,
    /// Promote warnings to blockers.
    pub strict: Option<bool>,
    /// Override the required template sections.
    pub required_sections: Option<Vec<String>>,
    /// Minimum number of acceptance criteria.
    pub min_criteria: Option<usize>,
    /// Size limit for story files.
    pub max_story_bytes: Option<u64>,
    /// Size limit for cited documents.
    pub max_doc_bytes: Option<u64>,
}

impl ConfigFile {
    /// Parses configuration text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for invalid TOML or unknown keys.
    pub fn parse(text: &str, origin: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Reads and parses a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read or parsed.
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        let mut file = Self::parse(&text, path)?;
        // Paths in the file are relative to the file, not to the cwd.
        if let Some(base) = path.parent() {
            file.docs_root = file.docs_root.map(|p| resolve_relative(base, p));
            file.checklist = file.checklist.map(|p| resolve_relative(base, p));
        }
        tracing::debug!(path = %path.display(), "loaded config file");
        Ok(file)
    }

    /// Overlays this file's fields onto a configuration.
    #[must_use]
    pub fn apply(self, mut config: ValidatorConfig) -> ValidatorConfig {
        if let Some(root) = self.docs_root {
            config.docs_root = Some(root);
        }
        if let Some(path) = self.checklist {
            config.checklist = ChecklistSource::Path(path);
        }
        if let Some(strict) = self.strict {
            config.strict = strict;
        }
        if let Some(sections) = self.required_sections {
            config.settings.required_sections = sections;
        }
        if let Some(min) = self.min_criteria {
            config.settings.min_criteria = min;
        }
        if let Some(max) = self.max_story_bytes {
            config.max_story_bytes = max;
        }
        if let Some(max) = self.max_doc_bytes {
            config.max_doc_bytes = max;
        }
        config
    }
}

fn resolve_relative(base: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_file_changes_nothing() {
        let file = ConfigFile::parse("", Path::new("storylint.toml")).unwrap();
        let config = file.apply(ValidatorConfig::default());
        assert_eq!(config.docs_root, None);
        assert_eq!(config.checklist, ChecklistSource::Builtin);
        assert!(!config.strict);
    }

    #[test]
    fn fields_overlay_defaults() {
        let text = "\
docs-root = \"docs\"
checklist = \"checklists/draft.md\"
strict = true
min-criteria = 2
required-sections = [\"Status\", \"Story\"]
";
        let file = ConfigFile::parse(text, Path::new("storylint.toml")).unwrap();
        let config = file.apply(ValidatorConfig::default());
        assert_eq!(config.docs_root.as_deref(), Some(Path::new("docs")));
        assert_eq!(
            config.checklist,
            ChecklistSource::Path(PathBuf::from("checklists/draft.md"))
        );
        assert!(config.strict);
        assert_eq!(config.settings.min_criteria, 2);
        assert_eq!(config.settings.required_sections.len(), 2);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = ConfigFile::parse("does-not-exist = 1\n", Path::new("x.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[tokio::test]
    async fn load_resolves_paths_against_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storylint.toml");
        tokio::fs::write(&path, "docs-root = \"docs\"\n").await.unwrap();

        let file = ConfigFile::load(&path).await.unwrap();
        assert_eq!(file.docs_root, Some(dir.path().join("docs")));
    }
}
