//! Access to the documentation tree that citations point into.
//!
//! Checks never touch the filesystem directly. They go through a
//! [`DocsProvider`], which resolves a cited path to the document's
//! heading anchors. The filesystem implementation lives in
//! [`fs::FsDocsRepository`]; [`memory::StaticDocs`] backs tests and
//! embedded use.

mod fs;
mod memory;

pub use fs::{FsDocsRepository, DEFAULT_DOC_CACHE_CAPACITY, DEFAULT_MAX_DOC_BYTES};
pub use memory::StaticDocs;

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use storylint_document::SourceDigest;
use thiserror::Error;

/// A cited document, reduced to what anchor resolution needs.
#[derive(Debug, Clone)]
pub struct ResolvedDoc {
    /// Digest of the document's raw bytes.
    pub digest: SourceDigest,
    /// GitHub-style anchor slugs of every heading, in order.
    pub heading_slugs: Vec<String>,
}

impl ResolvedDoc {
    /// Whether the document has a heading with the given anchor slug.
    #[must_use]
    pub fn has_anchor(&self, slug: &str) -> bool {
        self.heading_slugs.iter().any(|s| s == slug)
    }
}

/// Resolves citation paths to documents.
#[async_trait]
pub trait DocsProvider: Send + Sync {
    /// Looks up a cited path, relative to the provider's root.
    ///
    /// Returns `Ok(None)` when no document exists at the path. Traversal
    /// outside the root and I/O trouble are errors; the caller decides
    /// which of those indict the story and which abort the run.
    ///
    /// # Errors
    ///
    /// Returns [`DocsError`] on traversal, oversized files, or I/O
    /// failure.
    async fn resolve(&self, path: &str) -> Result<Option<Arc<ResolvedDoc>>, DocsError>;
}

/// Errors from resolving cited documents.
#[derive(Debug, Error)]
pub enum DocsError {
    /// The cited path is absolute or climbs out of the docs root.
    #[error("cited path `{path}` escapes the docs root")]
    OutsideRoot {
        /// The offending path as cited.
        path: String,
    },

    /// The cited file exceeds the per-document size limit.
    #[error("cited file {path} is too large: {actual} bytes (limit {limit})")]
    TooLarge {
        /// Resolved path of the oversized file.
        path: PathBuf,
        /// Actual size in bytes.
        actual: u64,
        /// Configured limit in bytes.
        limit: u64,
    },

    /// Reading the cited file failed for a reason other than absence.
    #[error("failed to read cited file {path}: {source}")]
    Io {
        /// Resolved path that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}
