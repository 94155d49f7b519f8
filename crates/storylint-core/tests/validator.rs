//! End-to-end validation through the engine: real files on disk, the
//! built-in and custom checklists, docs resolution, and strict mode.

use std::path::PathBuf;
use storylint_checks::{CheckId, Severity};
use storylint_checklist::{Category, Checklist, ChecklistItem, ItemKind};
use storylint_core::{ChecklistSource, StoryValidator, ValidateError, ValidatorConfig, Verdict};
use storylint_report::ItemStatus;
use storylint_test_utils::{write_file, DocsFixture, StoryBuilder};
use tempfile::TempDir;

fn with_docs(fixture: &DocsFixture) -> ValidatorConfig {
    ValidatorConfig {
        docs_root: Some(fixture.root().to_path_buf()),
        ..ValidatorConfig::default()
    }
}

#[tokio::test]
async fn standard_story_goes_with_docs() {
    let docs = DocsFixture::standard();
    let stories = TempDir::new().unwrap();
    let path = write_file(stories.path(), "1.2.story.md", &StoryBuilder::standard().build());

    let validator = StoryValidator::new(with_docs(&docs)).unwrap();
    let report = validator.validate_file(&path).await.unwrap();

    assert_eq!(report.verdict, Verdict::Go);
    // All six auto items pass; the eight manual items await review.
    assert_eq!(report.count(ItemStatus::Pass), 6);
    assert_eq!(report.count(ItemStatus::NeedsReview), 8);
    assert_eq!(report.count(ItemStatus::Fail), 0);
    assert_eq!(report.readiness, 5);
    assert_eq!(report.story.path.as_deref(), Some(path.as_path()));
    assert_eq!(report.checklist.source_name, "story-draft");
}

#[tokio::test]
async fn uncovered_criterion_blocks() {
    let docs = DocsFixture::standard();
    let story = StoryBuilder::standard()
        .criterion("Reports render deterministically for identical inputs")
        .parse();

    let validator = StoryValidator::new(with_docs(&docs)).unwrap();
    let report = validator.validate(&story).await.unwrap();

    assert_eq!(report.verdict, Verdict::NoGo);
    let failing: Vec<_> = report
        .items()
        .filter(|item| item.status == ItemStatus::Fail)
        .collect();
    assert_eq!(failing.len(), 1);
    assert_eq!(
        failing[0].check.as_ref().map(CheckId::as_str),
        Some("task-coverage")
    );
    assert!(failing[0].findings[0].message.contains("AC 3"));
}

#[tokio::test]
async fn citations_skip_without_docs_root() {
    let validator = StoryValidator::new(ValidatorConfig::default()).unwrap();
    let report = validator.validate(&StoryBuilder::standard().parse()).await.unwrap();

    assert_eq!(report.verdict, Verdict::Go);
    let citations = report
        .items()
        .find(|item| item.check.as_ref().map(CheckId::as_str) == Some("citations-resolve"))
        .unwrap();
    assert_eq!(citations.status, ItemStatus::Skipped);
    assert_eq!(citations.skip_reason.as_deref(), Some("no docs root configured"));
}

#[tokio::test]
async fn strict_mode_promotes_warnings() {
    // Dev notes without a single citation: a warning, not a blocker.
    let story = StoryBuilder::new(1, 3)
        .title("Strict Mode")
        .status("Approved")
        .narrative(
            "As a reviewer, I want warnings promoted in strict mode, \
             so that marginal stories get a second pass.",
        )
        .criterion("Strict mode turns warnings into blockers")
        .task(true, "Flip verdict handling under strict (AC: 1)")
        .dev_note("The promotion happens at verdict time.")
        .testing_note("Covered by verdict unit tests.")
        .change("| 2026-08-21 | 0.1 | Draft | Sam |")
        .parse();

    let lenient = StoryValidator::new(ValidatorConfig::default()).unwrap();
    let report = lenient.validate(&story).await.unwrap();
    assert_eq!(report.verdict, Verdict::Go);
    assert_eq!(report.count(ItemStatus::Partial), 1);

    let strict = StoryValidator::new(ValidatorConfig {
        strict: true,
        ..ValidatorConfig::default()
    })
    .unwrap();
    let report = strict.validate(&story).await.unwrap();
    assert_eq!(report.verdict, Verdict::NoGo);
    // Strict changes the verdict, not the item statuses.
    assert_eq!(report.count(ItemStatus::Fail), 0);
    assert_eq!(report.count(ItemStatus::Partial), 1);
}

#[tokio::test]
async fn traversal_citation_blocks() {
    let docs = DocsFixture::standard();
    let story = StoryBuilder::standard().citation("../outside.md", None).parse();

    let validator = StoryValidator::new(with_docs(&docs)).unwrap();
    let report = validator.validate(&story).await.unwrap();

    assert_eq!(report.verdict, Verdict::NoGo);
    let citations = report
        .items()
        .find(|item| item.check.as_ref().map(CheckId::as_str) == Some("citations-resolve"))
        .unwrap();
    assert_eq!(citations.status, ItemStatus::Fail);
    assert!(citations.findings[0].message.contains("escapes the docs root"));
}

#[tokio::test]
async fn custom_checklist_replaces_builtin() {
    let dir = TempDir::new().unwrap();
    let checklist = write_file(
        dir.path(),
        "minimal-checklist.md",
        "# Minimal Gate\n\n## 1. METADATA\n\n\
         - [ ] Identity is machine-checkable (auto: metadata-presence)\n",
    );

    let validator = StoryValidator::new(ValidatorConfig {
        checklist: ChecklistSource::Path(checklist),
        ..ValidatorConfig::default()
    })
    .unwrap();
    let report = validator.validate(&StoryBuilder::standard().parse()).await.unwrap();

    assert_eq!(report.checklist.title, "Minimal Gate");
    assert_eq!(report.categories.len(), 1);
    assert_eq!(report.verdict, Verdict::Go);
    // A single passing critical item scores a perfect ten.
    assert_eq!(report.readiness, 10);
}

#[tokio::test]
async fn unknown_auto_marker_fails_the_load() {
    let dir = TempDir::new().unwrap();
    let checklist = write_file(
        dir.path(),
        "bad-checklist.md",
        "# Bad Gate\n\n- [ ] Judged by nothing (auto: not-a-check)\n",
    );

    let validator = StoryValidator::new(ValidatorConfig {
        checklist: ChecklistSource::Path(checklist),
        ..ValidatorConfig::default()
    })
    .unwrap();
    let err = validator
        .validate(&StoryBuilder::standard().parse())
        .await
        .unwrap_err();

    assert!(matches!(err, ValidateError::Checklist(_)), "{err}");
    // The error names the checks that do exist.
    assert!(err.to_string().contains("metadata-presence"), "{err}");
}

#[tokio::test]
async fn unregistered_check_id_is_an_engine_error() {
    // Reachable only with a hand-built checklist; parsing validates ids.
    let checklist = Checklist {
        title: "Handmade".to_string(),
        source_name: "handmade".to_string(),
        categories: vec![Category {
            number: Some(1),
            title: "ONLY".to_string(),
            line: 1,
            items: vec![ChecklistItem {
                text: "ghost item".to_string(),
                kind: ItemKind::Auto(CheckId::parse("ghost-check").unwrap()),
                severity: Severity::Critical,
                line: 2,
            }],
        }],
    };

    let validator = StoryValidator::new(ValidatorConfig::default()).unwrap();
    let story = StoryBuilder::standard().parse();
    let err = validator.validate_against(&story, &checklist).await.unwrap_err();
    assert!(matches!(err, ValidateError::UnknownCheck { .. }), "{err}");
}

#[test]
fn docs_root_must_exist() {
    let config = ValidatorConfig {
        docs_root: Some(PathBuf::from("/nonexistent/storylint-docs")),
        ..ValidatorConfig::default()
    };
    let err = StoryValidator::new(config).unwrap_err();
    assert!(matches!(err, ValidateError::DocsRootMissing { .. }), "{err}");
}
