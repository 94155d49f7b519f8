//! The story document model.
//!
//! Parsing is total: any UTF-8 input yields a [`StoryDocument`]. Missing
//! metadata, empty sections, and malformed citations are recorded as
//! absent or degraded data for the validation passes to judge, never as
//! parse errors.

use crate::citation::{scan_citations, Citation, MalformedCitation};
use crate::digest::SourceDigest;
use crate::error::DocumentError;
use crate::frontmatter::split_frontmatter;
use crate::section::SectionTree;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_yaml::Value;
use std::fmt;
use std::path::{Path, PathBuf};

/// Canonical section titles of the story template.
pub mod sections {
    /// Workflow status of the story.
    pub const STATUS: &str = "Status";
    /// The user-story statement.
    pub const STORY: &str = "Story";
    /// Numbered acceptance criteria.
    pub const ACCEPTANCE_CRITERIA: &str = "Acceptance Criteria";
    /// Task checklist. Matches `Tasks / Subtasks` headings by prefix.
    pub const TASKS: &str = "Tasks";
    /// Implementation context gathered from architecture docs.
    pub const DEV_NOTES: &str = "Dev Notes";
    /// Testing guidance for the implementer.
    pub const TESTING: &str = "Testing";
    /// Revision history table.
    pub const CHANGE_LOG: &str = "Change Log";
}

/// Default size limit for story files.
pub const DEFAULT_MAX_STORY_BYTES: u64 = 1024 * 1024;

/// `Story 2.3: Title` heading form.
static H1_KEY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^story\s+(\d+)\.(\d+)\s*:?\s*(.*)$").expect("story heading pattern")
});

/// A numbered acceptance criterion, `1. Behavior holds`.
static AC_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(\d+)[.)]\s+(.*)$").expect("criterion pattern"));

/// A checkbox task line, `- [ ] Do the thing`.
static TASK_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([ \t]*)[-*]\s+\[([ xX])\]\s*(.*)$").expect("task pattern"));

/// An `(AC: 1, 2)` reference inside a task.
static AC_REF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\(\s*AC\s*:?\s*([#\d\s,.]*\d[#\d\s,.]*)\)").expect("ac ref pattern"));

static NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("number pattern"));

/// Epic and story number identifying a story, rendered as `2.3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct StoryKey {
    /// Epic number.
    pub epic: u32,
    /// Story number within the epic.
    pub story: u32,
}

impl fmt::Display for StoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.epic, self.story)
    }
}

/// Workflow status of a story.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StoryStatus {
    /// Drafted, not yet approved for implementation.
    Draft,
    /// Approved and ready to implement.
    Approved,
    /// Implementation underway.
    InProgress,
    /// Implementation finished, awaiting review.
    Review,
    /// Accepted and closed.
    Done,
    /// A status value outside the known workflow vocabulary.
    Other(String),
}

impl StoryStatus {
    /// Parses a status value, case- and separator-insensitive.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let folded: String = raw
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .flat_map(char::to_lowercase)
            .collect();
        match folded.as_str() {
            "draft" => Self::Draft,
            "approved" => Self::Approved,
            "inprogress" => Self::InProgress,
            "review" | "inreview" => Self::Review,
            "done" | "complete" | "completed" => Self::Done,
            _ => Self::Other(raw.trim().to_string()),
        }
    }

    /// Whether the value belongs to the known workflow vocabulary.
    #[inline]
    #[must_use]
    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl fmt::Display for StoryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Draft => f.write_str("Draft"),
            Self::Approved => f.write_str("Approved"),
            Self::InProgress => f.write_str("In Progress"),
            Self::Review => f.write_str("Review"),
            Self::Done => f.write_str("Done"),
            Self::Other(raw) => f.write_str(raw),
        }
    }
}

/// One numbered acceptance criterion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AcceptanceCriterion {
    /// Number as written in the list.
    pub number: u32,
    /// Criterion text, continuation lines folded in.
    pub text: String,
    /// One-based line of the list item.
    pub line: usize,
}

/// Checkbox state of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskState {
    /// Unchecked, `[ ]`.
    Open,
    /// Checked off, `[x]`.
    Done,
}

/// A task from the `Tasks / Subtasks` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    /// Task text after the checkbox.
    pub text: String,
    /// Checkbox state.
    pub state: TaskState,
    /// Acceptance criteria numbers cited via `(AC: ...)`.
    pub ac_refs: Vec<u32>,
    /// One-based line of the checkbox.
    pub line: usize,
    /// Indented child tasks.
    pub subtasks: Vec<Task>,
}

/// A parsed story document.
#[derive(Debug, Clone, Serialize)]
pub struct StoryDocument {
    /// Epic/story key, from frontmatter or the `Story E.N:` heading.
    pub key: Option<StoryKey>,
    /// Story title, from frontmatter or the level-1 heading.
    pub title: Option<String>,
    /// Workflow status, from frontmatter or the `Status` section.
    pub status: Option<StoryStatus>,
    /// Numbered acceptance criteria in list order.
    pub criteria: Vec<AcceptanceCriterion>,
    /// Top-level tasks with nested subtasks.
    pub tasks: Vec<Task>,
    /// Well-formed source citations, document order.
    pub citations: Vec<Citation>,
    /// Citation-shaped text that failed to parse.
    pub malformed_citations: Vec<MalformedCitation>,
    /// Heading-delimited section tree of the body.
    pub sections: SectionTree,
    /// Raw frontmatter value, when present and well formed.
    pub frontmatter: Option<Value>,
    /// Frontmatter YAML error, when a block was present but malformed.
    pub frontmatter_error: Option<String>,
    /// BLAKE3 digest of the raw source.
    pub digest: SourceDigest,
    /// Path the story was loaded from, when it came from disk.
    pub source_path: Option<PathBuf>,
    /// Full original source text.
    #[serde(skip)]
    pub source: String,
}

impl StoryDocument {
    /// Parses a story from source text. Never fails; gaps in the
    /// document surface as `None` fields and empty collections.
    #[must_use]
    pub fn parse(source: &str) -> Self {
        let digest = SourceDigest::compute(source.as_bytes());
        let split = split_frontmatter(source);
        let tree = SectionTree::parse_at(split.body, split.body_start_line);

        let mut key = None;
        let mut title = None;
        let mut status = None;

        if let Some(value) = &split.value {
            key = match (frontmatter_u32(value, "epic"), frontmatter_u32(value, "story")) {
                (Some(epic), Some(story)) => Some(StoryKey { epic, story }),
                _ => None,
            };
            title = frontmatter_str(value, "title");
            status = frontmatter_str(value, "status")
                .map(|raw| StoryStatus::parse(&raw));
        }

        if let Some(heading) = tree.document_title() {
            if let Some(caps) = H1_KEY.captures(&heading.title) {
                if key.is_none() {
                    key = Some(StoryKey {
                        epic: caps[1].parse().unwrap_or(0),
                        story: caps[2].parse().unwrap_or(0),
                    });
                }
                if title.is_none() {
                    let rest = caps[3].trim();
                    if !rest.is_empty() {
                        title = Some(rest.to_string());
                    }
                }
            } else if title.is_none() && !heading.title.trim().is_empty() {
                title = Some(heading.title.trim().to_string());
            }
        }

        if status.is_none() {
            status = tree.find(sections::STATUS).and_then(|section| {
                section
                    .body
                    .lines()
                    .map(str::trim)
                    .find(|line| !line.is_empty())
                    .map(StoryStatus::parse)
            });
        }

        let criteria = tree
            .find(sections::ACCEPTANCE_CRITERIA)
            .map(parse_criteria)
            .unwrap_or_default();
        let tasks = tree
            .find_prefix(sections::TASKS)
            .map(parse_tasks)
            .unwrap_or_default();
        let (citations, malformed_citations) = scan_citations(source);

        Self {
            key,
            title,
            status,
            criteria,
            tasks,
            citations,
            malformed_citations,
            sections: tree,
            frontmatter: split.value,
            frontmatter_error: split.error,
            digest,
            source_path: None,
            source: source.to_string(),
        }
    }

    /// Flattens tasks and subtasks into document order.
    #[must_use]
    pub fn all_tasks(&self) -> Vec<&Task> {
        fn walk<'a>(tasks: &'a [Task], out: &mut Vec<&'a Task>) {
            for task in tasks {
                out.push(task);
                walk(&task.subtasks, out);
            }
        }
        let mut out = Vec::new();
        walk(&self.tasks, &mut out);
        out
    }

    /// Display name for logs and reports: key, title, path, or a
    /// placeholder, in that order of preference.
    #[must_use]
    pub fn display_name(&self) -> String {
        match (&self.key, &self.title) {
            (Some(key), Some(title)) => format!("{key}: {title}"),
            (Some(key), None) => key.to_string(),
            (None, Some(title)) => title.clone(),
            (None, None) => self
                .source_path
                .as_deref()
                .map_or_else(|| "<unnamed story>".to_string(), |p| p.display().to_string()),
        }
    }
}

/// Loads and parses a story file.
///
/// # Errors
///
/// Returns [`DocumentError`] when the file cannot be read, exceeds
/// `max_bytes`, is empty, or is not UTF-8. Content-level problems never
/// error; they are reported by the validation passes.
pub async fn load_story(path: &Path, max_bytes: u64) -> Result<StoryDocument, DocumentError> {
    let metadata = tokio::fs::metadata(path).await.map_err(|source| DocumentError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if metadata.len() > max_bytes {
        return Err(DocumentError::TooLarge {
            path: path.to_path_buf(),
            actual: metadata.len(),
            limit: max_bytes,
        });
    }

    let bytes = tokio::fs::read(path).await.map_err(|source| DocumentError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let source = String::from_utf8(bytes).map_err(|_| DocumentError::InvalidUtf8 {
        path: path.to_path_buf(),
    })?;
    if source.trim().is_empty() {
        return Err(DocumentError::Empty {
            path: path.to_path_buf(),
        });
    }

    let mut story = StoryDocument::parse(&source);
    story.source_path = Some(path.to_path_buf());
    tracing::debug!(
        path = %path.display(),
        digest = %story.digest.short(),
        criteria = story.criteria.len(),
        tasks = story.tasks.len(),
        "loaded story"
    );
    Ok(story)
}

fn frontmatter_u32(value: &Value, field: &str) -> Option<u32> {
    let entry = value.get(field)?;
    if let Some(n) = entry.as_u64() {
        return u32::try_from(n).ok();
    }
    entry.as_str()?.trim().parse().ok()
}

fn frontmatter_str(value: &Value, field: &str) -> Option<String> {
    let entry = value.get(field)?;
    if let Some(text) = entry.as_str() {
        let trimmed = text.trim();
        return (!trimmed.is_empty()).then(|| trimmed.to_string());
    }
    // Tolerate bare integer scalars by rendering them.
    entry.as_u64().map(|n| n.to_string())
}

fn parse_criteria(section: &crate::section::Section) -> Vec<AcceptanceCriterion> {
    let mut criteria: Vec<AcceptanceCriterion> = Vec::new();
    for (line_no, line) in section.body_lines() {
        if let Some(caps) = AC_ITEM.captures(line) {
            let number = caps[1].parse().unwrap_or(0);
            criteria.push(AcceptanceCriterion {
                number,
                text: caps[2].trim().to_string(),
                line: line_no,
            });
        } else if let Some(current) = criteria.last_mut() {
            let continuation = line.trim();
            if !continuation.is_empty() {
                current.text.push(' ');
                current.text.push_str(continuation);
            }
        }
    }
    criteria
}

fn parse_tasks(section: &crate::section::Section) -> Vec<Task> {
    let mut tasks: Vec<Task> = Vec::new();
    let mut top_indent: Option<usize> = None;

    for (line_no, line) in section.body_lines() {
        let Some(caps) = TASK_LINE.captures(line) else {
            continue;
        };
        let indent: usize = caps[1]
            .chars()
            .map(|c| if c == '\t' { 4 } else { 1 })
            .sum();
        let text = caps[3].trim().to_string();
        let state = if &caps[2] == " " {
            TaskState::Open
        } else {
            TaskState::Done
        };
        let task = Task {
            ac_refs: ac_refs(&text),
            text,
            state,
            line: line_no,
            subtasks: Vec::new(),
        };

        match top_indent {
            None => {
                top_indent = Some(indent);
                tasks.push(task);
            }
            Some(top) if indent <= top => tasks.push(task),
            Some(_) => match tasks.last_mut() {
                Some(parent) => parent.subtasks.push(task),
                None => tasks.push(task),
            },
        }
    }
    tasks
}

/// Extracts `(AC: 1, 2)` references, deduplicated in citation order.
fn ac_refs(text: &str) -> Vec<u32> {
    let mut refs: Vec<u32> = Vec::new();
    for caps in AC_REF.captures_iter(text) {
        for number in NUMBER.find_iter(&caps[1]) {
            if let Ok(n) = number.as_str().parse() {
                if !refs.contains(&n) {
                    refs.push(n);
                }
            }
        }
    }
    refs
}
