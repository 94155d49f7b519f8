//! Testing utilities for the storylint workspace
//!
//! Shared fixtures: a story markdown builder and on-disk docs trees.

#![allow(missing_docs)]

use std::fs;
use std::path::{Path, PathBuf};
use storylint_document::StoryDocument;
use tempfile::TempDir;

/// Architecture doc used by [`DocsFixture::standard`]; carries the
/// `naming-conventions` and `error-handling` anchors.
pub const CODING_STANDARDS: &str = "# Coding Standards\n\n\
## Naming Conventions\n\nUse kebab-case for file names.\n\n\
## Error Handling\n\nPropagate errors with context.\n";

/// Architecture doc used by [`DocsFixture::standard`]; carries the
/// `libraries` anchor.
pub const TECH_STACK: &str = "# Tech Stack\n\n## Libraries\n\nTokio for async IO.\n";

pub fn write_file(root: &Path, rel: &str, content: &str) -> PathBuf {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

/// A temporary docs tree for citation resolution tests.
pub struct DocsFixture {
    dir: TempDir,
}

impl DocsFixture {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    /// A tree with the two architecture docs [`StoryBuilder::standard`]
    /// cites.
    pub fn standard() -> Self {
        let fixture = Self::new();
        fixture.write("architecture/coding-standards.md", CODING_STANDARDS);
        fixture.write("architecture/tech-stack.md", TECH_STACK);
        fixture
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn write(&self, rel: &str, content: &str) -> PathBuf {
        write_file(self.dir.path(), rel, content)
    }
}

impl Default for DocsFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds story markdown for tests.
///
/// [`StoryBuilder::new`] starts from a bare `# Story E.N: title`
/// heading; sections appear only once content is added, which keeps
/// broken-story tests explicit about what is missing.
#[derive(Debug, Clone)]
pub struct StoryBuilder {
    epic: u32,
    story: u32,
    title: String,
    status: Option<String>,
    narrative: Option<String>,
    criteria: Vec<String>,
    task_lines: Vec<String>,
    dev_notes: Vec<String>,
    testing: Vec<String>,
    changes: Vec<String>,
    extras: Vec<(String, String)>,
    frontmatter: bool,
}

impl StoryBuilder {
    pub fn new(epic: u32, story: u32) -> Self {
        Self {
            epic,
            story,
            title: "Story Under Test".to_string(),
            status: None,
            narrative: None,
            criteria: Vec::new(),
            task_lines: Vec::new(),
            dev_notes: Vec::new(),
            testing: Vec::new(),
            changes: Vec::new(),
            extras: Vec::new(),
            frontmatter: false,
        }
    }

    /// A complete story that passes every built-in check when paired
    /// with [`DocsFixture::standard`].
    pub fn standard() -> Self {
        Self::new(1, 2)
            .title("Checklist Validation")
            .status("Approved")
            .narrative(
                "As a developer, I want stories validated against a checklist, \
                 so that review feedback arrives before implementation starts.",
            )
            .criterion("Config file values override built-in defaults")
            .criterion("Relative docs paths resolve against the configured root")
            .task(true, "Implement config overlay (AC: 1)")
            .subtask(true, "Unit-test the default fallback")
            .task(true, "Resolve docs paths against the root (AC: 2)")
            .citation("architecture/coding-standards.md", Some("naming-conventions"))
            .citation("architecture/tech-stack.md", None)
            .testing_note("Unit tests cover overlay precedence and path resolution.")
            .change("| 2026-08-20 | 0.1 | Initial draft | Sam |")
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    pub fn status(mut self, status: &str) -> Self {
        self.status = Some(status.to_string());
        self
    }

    pub fn narrative(mut self, text: &str) -> Self {
        self.narrative = Some(text.to_string());
        self
    }

    pub fn criterion(mut self, text: &str) -> Self {
        self.criteria.push(text.to_string());
        self
    }

    /// Appends a top-level task; write AC references inline, e.g.
    /// `"Wire the parser (AC: 1, 2)"`.
    pub fn task(mut self, done: bool, text: &str) -> Self {
        let mark = if done { 'x' } else { ' ' };
        self.task_lines.push(format!("- [{mark}] {text}"));
        self
    }

    /// Appends a subtask under the most recent task.
    pub fn subtask(mut self, done: bool, text: &str) -> Self {
        let mark = if done { 'x' } else { ' ' };
        self.task_lines.push(format!("  - [{mark}] {text}"));
        self
    }

    pub fn dev_note(mut self, line: &str) -> Self {
        self.dev_notes.push(line.to_string());
        self
    }

    pub fn citation(mut self, path: &str, anchor: Option<&str>) -> Self {
        let line = match anchor {
            Some(anchor) => format!("[Source: {path}#{anchor}]"),
            None => format!("[Source: {path}]"),
        };
        self.dev_notes.push(line);
        self
    }

    pub fn testing_note(mut self, line: &str) -> Self {
        self.testing.push(line.to_string());
        self
    }

    pub fn change(mut self, line: &str) -> Self {
        self.changes.push(line.to_string());
        self
    }

    /// Appends a custom section after the templated ones.
    pub fn section(mut self, title: &str, body: &str) -> Self {
        self.extras.push((title.to_string(), body.to_string()));
        self
    }

    /// Emit epic, story, title, and status as YAML frontmatter as well.
    pub fn with_frontmatter(mut self) -> Self {
        self.frontmatter = true;
        self
    }

    pub fn build(&self) -> String {
        let mut out = String::new();
        if self.frontmatter {
            out.push_str("---\n");
            out.push_str(&format!("epic: {}\n", self.epic));
            out.push_str(&format!("story: {}\n", self.story));
            out.push_str(&format!("title: {}\n", self.title));
            if let Some(status) = &self.status {
                out.push_str(&format!("status: {status}\n"));
            }
            out.push_str("---\n");
        }
        out.push_str(&format!(
            "# Story {}.{}: {}\n",
            self.epic, self.story, self.title
        ));
        if let Some(status) = &self.status {
            out.push_str(&format!("\n## Status\n\n{status}\n"));
        }
        if let Some(narrative) = &self.narrative {
            out.push_str(&format!("\n## Story\n\n{narrative}\n"));
        }
        if !self.criteria.is_empty() {
            out.push_str("\n## Acceptance Criteria\n\n");
            for (index, text) in self.criteria.iter().enumerate() {
                out.push_str(&format!("{}. {text}\n", index + 1));
            }
        }
        if !self.task_lines.is_empty() {
            out.push_str("\n## Tasks / Subtasks\n\n");
            for line in &self.task_lines {
                out.push_str(line);
                out.push('\n');
            }
        }
        if !self.dev_notes.is_empty() {
            out.push_str("\n## Dev Notes\n\n");
            for line in &self.dev_notes {
                out.push_str(line);
                out.push('\n');
            }
        }
        if !self.testing.is_empty() {
            out.push_str("\n## Testing\n\n");
            for line in &self.testing {
                out.push_str(line);
                out.push('\n');
            }
        }
        if !self.changes.is_empty() {
            out.push_str("\n## Change Log\n\n");
            out.push_str("| Date | Version | Description | Author |\n");
            out.push_str("| ---- | ------- | ----------- | ------ |\n");
            for line in &self.changes {
                out.push_str(line);
                out.push('\n');
            }
        }
        for (title, body) in &self.extras {
            out.push_str(&format!("\n## {title}\n"));
            if !body.is_empty() {
                out.push_str(&format!("\n{body}\n"));
            }
        }
        out
    }

    /// Builds and parses in one step.
    pub fn parse(&self) -> StoryDocument {
        StoryDocument::parse(&self.build())
    }
}
