//! Report assembly and rendering for storylint.
//!
//! This crate turns check outcomes into a [`ValidationReport`]: each
//! checklist item judged, categories aggregated, a weighted readiness
//! score, and a go/no-go verdict. The report renders as Markdown for
//! humans ([`render_markdown`]) and serializes as JSON for tooling.

pub mod markdown;
pub mod model;
pub mod score;

pub use markdown::render_markdown;
pub use model::{
    CategoryResult, ChecklistInfo, ItemResult, ItemStatus, ReportId, StoryInfo, ValidationReport,
    Verdict,
};
pub use score::{build_report, ReportInputs};
