//! Story document model for storylint.
//!
//! This crate turns a Markdown story file into structured data the
//! validation passes can judge: a heading-delimited [`SectionTree`],
//! optional YAML frontmatter, numbered acceptance criteria, checkbox
//! tasks with `(AC: n)` references, and `[Source: path#anchor]`
//! citations. Parsing is total; anything missing or malformed in the
//! document becomes data, not an error, so a single run can report every
//! problem at once.
//!
//! Loading from disk is async and enforces a size limit, and every
//! loaded document carries a BLAKE3 [`SourceDigest`] identifying the
//! exact bytes that were validated.

pub mod citation;
pub mod digest;
pub mod error;
pub mod frontmatter;
pub mod markdown;
pub mod section;
pub mod story;

pub use citation::{scan_citations, Citation, MalformedCitation};
pub use digest::{DigestParseError, SourceDigest};
pub use error::DocumentError;
pub use frontmatter::{split_frontmatter, FrontmatterSplit};
pub use markdown::{heading_refs, plain_text, slugify, HeadingRef};
pub use section::{normalize_title, Section, SectionTree};
pub use story::{
    load_story, sections, AcceptanceCriterion, StoryDocument, StoryKey, StoryStatus, Task,
    TaskState, DEFAULT_MAX_STORY_BYTES,
};
