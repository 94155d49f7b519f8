//! The `storylint` binary: validate story files, audit checklists, and
//! inspect what the parser extracted.

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;
use storylint_checklist::{Checklist, ItemKind};
use storylint_core::{
    render_markdown, ChecklistSource, ConfigFile, StoryValidator, ValidatorConfig, Verdict,
};
use storylint_document::{load_story, StoryDocument, Task, TaskState, DEFAULT_MAX_STORY_BYTES};
use tracing_subscriber::EnvFilter;

const EXIT_GO: i32 = 0;
const EXIT_NO_GO: i32 = 1;
const EXIT_ERROR: i32 = 2;

fn cli() -> Command {
    Command::new("storylint")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Checklist validation for agile story documents")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("validate")
                .about("Validate a story against a checklist")
                .arg(
                    Arg::new("story")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Story markdown file"),
                )
                .arg(
                    Arg::new("checklist")
                        .long("checklist")
                        .value_parser(value_parser!(PathBuf))
                        .help("Checklist file replacing the built-in story-draft checklist"),
                )
                .arg(
                    Arg::new("docs-root")
                        .long("docs-root")
                        .value_parser(value_parser!(PathBuf))
                        .help("Documentation tree citations resolve against"),
                )
                .arg(
                    Arg::new("config")
                        .long("config")
                        .value_parser(value_parser!(PathBuf))
                        .help("storylint.toml configuration file"),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .default_value("md")
                        .value_parser(["md", "json"])
                        .help("Report format"),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .value_parser(value_parser!(PathBuf))
                        .help("Write the report to a file instead of stdout"),
                )
                .arg(
                    Arg::new("strict")
                        .long("strict")
                        .action(ArgAction::SetTrue)
                        .help("Treat warnings as blockers"),
                ),
        )
        .subcommand(
            Command::new("checklist")
                .about("Show the effective checklist and its check bindings")
                .arg(
                    Arg::new("checklist")
                        .long("checklist")
                        .value_parser(value_parser!(PathBuf))
                        .help("Checklist file to show instead of the built-in one"),
                ),
        )
        .subcommand(
            Command::new("inspect")
                .about("Dump what the parser extracted from a story")
                .arg(
                    Arg::new("story")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Story markdown file"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        )
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into());
    // Logs go to stderr; stdout carries the report.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    init_tracing();
    let matches = cli().get_matches();

    let result = match matches.subcommand() {
        Some(("validate", args)) => run_validate(args).await,
        Some(("checklist", args)) => run_checklist(args).await,
        Some(("inspect", args)) => run_inspect(args).await,
        _ => unreachable!("subcommand_required"),
    };

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err:#}");
            std::process::exit(EXIT_ERROR);
        }
    }
}

/// Layers configuration: defaults, then `--config`, then flags.
async fn build_config(args: &ArgMatches) -> Result<ValidatorConfig> {
    let mut config = ValidatorConfig::default();
    if let Some(path) = args.get_one::<PathBuf>("config") {
        config = ConfigFile::load(path)
            .await
            .with_context(|| format!("loading config {}", path.display()))?
            .apply(config);
    }
    if let Some(root) = args.get_one::<PathBuf>("docs-root") {
        config.docs_root = Some(root.clone());
    }
    if let Some(list) = args.get_one::<PathBuf>("checklist") {
        config.checklist = ChecklistSource::Path(list.clone());
    }
    if args.get_flag("strict") {
        config.strict = true;
    }
    Ok(config)
}

async fn run_validate(args: &ArgMatches) -> Result<i32> {
    let story = args.get_one::<PathBuf>("story").unwrap();
    let config = build_config(args).await?;
    let validator = StoryValidator::new(config)?;
    let report = validator.validate_file(story).await?;

    let rendered = match args.get_one::<String>("format").unwrap().as_str() {
        "json" => report.to_json().context("serializing report")?,
        _ => render_markdown(&report),
    };

    match args.get_one::<PathBuf>("output") {
        Some(path) => tokio::fs::write(path, &rendered)
            .await
            .with_context(|| format!("writing report to {}", path.display()))?,
        None => println!("{rendered}"),
    }

    Ok(match report.verdict {
        Verdict::Go => EXIT_GO,
        Verdict::NoGo => EXIT_NO_GO,
    })
}

async fn run_checklist(args: &ArgMatches) -> Result<i32> {
    let config = ValidatorConfig {
        checklist: match args.get_one::<PathBuf>("checklist") {
            Some(path) => ChecklistSource::Path(path.clone()),
            None => ChecklistSource::Builtin,
        },
        ..ValidatorConfig::default()
    };
    let validator = StoryValidator::new(config)?;
    let checklist = validator.checklist().await?;
    print!("{}", render_checklist_text(&checklist));
    Ok(EXIT_GO)
}

async fn run_inspect(args: &ArgMatches) -> Result<i32> {
    let path = args.get_one::<PathBuf>("story").unwrap();
    let story = load_story(path, DEFAULT_MAX_STORY_BYTES).await?;
    if args.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&story)?);
    } else {
        print!("{}", render_story_text(&story));
    }
    Ok(EXIT_GO)
}

fn render_checklist_text(checklist: &Checklist) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{} (source: {})\n",
        checklist.title, checklist.source_name
    ));
    for category in &checklist.categories {
        out.push('\n');
        match category.number {
            Some(number) => out.push_str(&format!("{number}. {}\n", category.title)),
            None => out.push_str(&format!("{}\n", category.title)),
        }
        for item in &category.items {
            let binding = match &item.kind {
                ItemKind::Auto(id) => format!("auto: {id}"),
                ItemKind::Manual => "manual".to_string(),
            };
            out.push_str(&format!(
                "  [{}] ({binding}) {}\n",
                item.severity.label(),
                item.text
            ));
        }
    }
    out
}

fn render_story_text(story: &StoryDocument) -> String {
    let mut out = String::new();
    out.push_str(&format!("story:   {}\n", story.display_name()));
    match &story.status {
        Some(status) => out.push_str(&format!("status:  {status}\n")),
        None => out.push_str("status:  (none)\n"),
    }
    out.push_str(&format!("digest:  {}\n", story.digest.short()));
    if let Some(error) = &story.frontmatter_error {
        out.push_str(&format!("frontmatter error: {error}\n"));
    }

    out.push_str("\nsections:\n");
    for section in story.sections.sections() {
        out.push_str(&format!(
            "  {} {} (lines {}..{})\n",
            "#".repeat(usize::from(section.level)),
            section.title,
            section.lines.start,
            section.lines.end
        ));
    }

    if !story.criteria.is_empty() {
        out.push_str("\nacceptance criteria:\n");
        for criterion in &story.criteria {
            out.push_str(&format!(
                "  {}. {} (line {})\n",
                criterion.number, criterion.text, criterion.line
            ));
        }
    }

    if !story.tasks.is_empty() {
        out.push_str("\ntasks:\n");
        push_tasks(&mut out, &story.tasks, 0);
    }

    if !story.citations.is_empty() {
        out.push_str("\ncitations:\n");
        for citation in &story.citations {
            match &citation.anchor {
                Some(anchor) => out.push_str(&format!(
                    "  line {}: {}#{anchor}\n",
                    citation.line, citation.path
                )),
                None => out.push_str(&format!("  line {}: {}\n", citation.line, citation.path)),
            }
        }
    }
    for malformed in &story.malformed_citations {
        out.push_str(&format!(
            "  line {}: malformed citation {}\n",
            malformed.line, malformed.raw
        ));
    }

    out
}

fn push_tasks(out: &mut String, tasks: &[Task], depth: usize) {
    for task in tasks {
        let mark = match task.state {
            TaskState::Done => 'x',
            TaskState::Open => ' ',
        };
        let refs = if task.ac_refs.is_empty() {
            String::new()
        } else {
            let numbers: Vec<String> = task.ac_refs.iter().map(ToString::to_string).collect();
            format!(" [AC {}]", numbers.join(", "))
        };
        out.push_str(&format!(
            "{}- [{mark}] {}{refs} (line {})\n",
            "  ".repeat(depth + 1),
            task.text,
            task.line
        ));
        push_tasks(out, &task.subtasks, depth + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storylint_test_utils::{write_file, StoryBuilder};
    use tempfile::TempDir;

    fn matches_for(argv: &[&str]) -> ArgMatches {
        let matches = cli().try_get_matches_from(argv).unwrap();
        let (_, sub) = matches.subcommand().unwrap();
        sub.clone()
    }

    #[tokio::test]
    async fn flags_override_config_file() {
        let dir = TempDir::new().unwrap();
        write_file(
            dir.path(),
            "docs/architecture.md",
            "# Architecture\n",
        );
        let config_path = write_file(
            dir.path(),
            "storylint.toml",
            "docs-root = \"docs\"\nstrict = false\nmin-criteria = 2\n",
        );
        let config_arg = config_path.to_string_lossy().to_string();

        let args = matches_for(&[
            "storylint",
            "validate",
            "story.md",
            "--config",
            &config_arg,
            "--strict",
        ]);
        let config = build_config(&args).await.unwrap();

        // File sets the docs root, relative to itself; the flag wins on strict.
        assert_eq!(config.docs_root.as_deref(), Some(dir.path().join("docs").as_path()));
        assert!(config.strict);
        assert_eq!(config.settings.min_criteria, 2);
        assert_eq!(config.checklist, ChecklistSource::Builtin);
    }

    #[tokio::test]
    async fn checklist_flag_replaces_builtin() {
        let args = matches_for(&["storylint", "validate", "story.md", "--checklist", "my.md"]);
        let config = build_config(&args).await.unwrap();
        assert_eq!(
            config.checklist,
            ChecklistSource::Path(PathBuf::from("my.md"))
        );
    }

    #[test]
    fn format_rejects_unknown_values() {
        let result = cli().try_get_matches_from([
            "storylint", "validate", "story.md", "--format", "xml",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn checklist_rendering_shows_bindings() {
        let text = render_checklist_text(&Checklist::builtin());
        assert!(text.starts_with("Story Draft Checklist (source: story-draft)\n"));
        assert!(text.contains("1. GOAL & CONTEXT CLARITY"));
        assert!(text.contains("(auto: metadata-presence)"));
        assert!(text.contains("[WARN] (manual)"));
    }

    #[test]
    fn story_rendering_lists_structure() {
        let story = StoryBuilder::standard().parse();
        let text = render_story_text(&story);
        assert!(text.starts_with("story:   1.2: Checklist Validation\n"));
        assert!(text.contains("status:  Approved\n"));
        assert!(text.contains("## Acceptance Criteria"));
        assert!(text.contains("1. Config file values override built-in defaults"));
        assert!(text.contains("- [x] Implement config overlay (AC: 1) [AC 1]"));
        assert!(text.contains("architecture/coding-standards.md#naming-conventions"));
    }
}
