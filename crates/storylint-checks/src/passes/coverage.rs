//! Every acceptance criterion must be implemented by some task.

use crate::check::{Check, CheckError, CheckOutcome};
use crate::context::CheckContext;
use crate::finding::Finding;
use crate::id::CheckId;
use crate::severity::Severity;
use async_trait::async_trait;
use std::collections::HashSet;
use storylint_document::{sections, StoryStatus, TaskState};

/// Identifier of this check.
pub const ID: &str = "task-coverage";

/// Cross-references tasks against acceptance criteria.
///
/// Tasks declare what they implement with `(AC: n)` annotations. A
/// criterion nothing implements, and an annotation naming a criterion
/// that does not exist, both block the story. When no task carries any
/// annotation at all, the check assumes the convention is simply not in
/// use and downgrades to a single warning. Checked-off tasks in a story
/// still marked Draft earn a consistency warning.
pub struct TaskCoverage;

#[async_trait]
impl Check for TaskCoverage {
    fn id(&self) -> CheckId {
        CheckId::from_static(ID)
    }

    fn title(&self) -> &'static str {
        "Tasks cover the acceptance criteria"
    }

    async fn run(&self, cx: &CheckContext<'_>) -> Result<CheckOutcome, CheckError> {
        let story = cx.story;
        let tasks = story.all_tasks();
        let mut findings = Vec::new();

        let known: HashSet<u32> = story.criteria.iter().map(|c| c.number).collect();
        for task in &tasks {
            for reference in &task.ac_refs {
                if !known.contains(reference) {
                    findings.push(
                        Finding::new(
                            self.id(),
                            Severity::Critical,
                            format!("task references AC {reference}, which does not exist"),
                        )
                        .at_line(task.line)
                        .with_remediation("fix the `(AC: n)` annotation or add the criterion"),
                    );
                }
            }
        }

        if story.criteria.is_empty() {
            // The criteria check already fails the empty list; coverage
            // has nothing to judge beyond dangling annotations.
            if findings.is_empty() {
                return Ok(CheckOutcome::skipped(
                    "story has no acceptance criteria to cover",
                ));
            }
            return Ok(CheckOutcome::completed(findings));
        }

        if tasks.is_empty() {
            findings.push(
                Finding::new(self.id(), Severity::Critical, "story has no tasks")
                    .in_section(sections::TASKS)
                    .with_remediation(
                        "break the work into `- [ ]` tasks referencing their criteria",
                    ),
            );
            return Ok(CheckOutcome::completed(findings));
        }

        if story.status == Some(StoryStatus::Draft) {
            let done = tasks
                .iter()
                .filter(|task| task.state == TaskState::Done)
                .count();
            if done > 0 {
                let message = if done == 1 {
                    "a task is checked off while the story is still Draft".to_string()
                } else {
                    format!("{done} tasks are checked off while the story is still Draft")
                };
                findings.push(
                    Finding::new(self.id(), Severity::Warning, message)
                        .in_section(sections::TASKS)
                        .with_remediation("update the story status or uncheck unstarted work"),
                );
            }
        }

        if tasks.iter().all(|task| task.ac_refs.is_empty()) {
            findings.push(
                Finding::new(
                    self.id(),
                    Severity::Warning,
                    "no task is annotated with `(AC: n)` references",
                )
                .in_section(sections::TASKS)
                .with_remediation("annotate each task with the criteria it implements"),
            );
            return Ok(CheckOutcome::completed(findings));
        }

        for criterion in &story.criteria {
            let covered = tasks
                .iter()
                .any(|task| task.ac_refs.contains(&criterion.number));
            if !covered {
                findings.push(
                    Finding::new(
                        self.id(),
                        Severity::Critical,
                        format!("AC {} is not covered by any task", criterion.number),
                    )
                    .at_line(criterion.line)
                    .with_remediation("add a task annotated with this criterion"),
                );
            }
        }

        Ok(CheckOutcome::completed(findings))
    }
}
