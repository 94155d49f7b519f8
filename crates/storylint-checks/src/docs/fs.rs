//! Filesystem-backed docs repository with a content-addressed parse
//! cache.

use super::{DocsError, DocsProvider, ResolvedDoc};
use async_trait::async_trait;
use moka::future::Cache;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use storylint_document::{heading_refs, split_frontmatter, SourceDigest};

/// Default per-document size limit.
pub const DEFAULT_MAX_DOC_BYTES: u64 = 4 * 1024 * 1024;

/// Default number of parsed documents kept in the cache.
pub const DEFAULT_DOC_CACHE_CAPACITY: u64 = 256;

/// Resolves citations against a documentation tree on disk.
///
/// Parsed documents are cached by content digest, so re-reading an
/// unchanged file costs one hash, and two paths with identical bytes
/// share a single parse. Validating many stories against the same
/// architecture tree hits the cache almost every time.
#[derive(Debug)]
pub struct FsDocsRepository {
    root: PathBuf,
    max_bytes: u64,
    cache: Cache<SourceDigest, Arc<ResolvedDoc>>,
}

impl FsDocsRepository {
    /// Creates a repository rooted at `root` with default limits.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_limits(root, DEFAULT_MAX_DOC_BYTES, DEFAULT_DOC_CACHE_CAPACITY)
    }

    /// Creates a repository with explicit size and cache limits.
    #[must_use]
    pub fn with_limits(root: impl Into<PathBuf>, max_bytes: u64, cache_capacity: u64) -> Self {
        Self {
            root: root.into(),
            max_bytes,
            cache: Cache::builder().max_capacity(cache_capacity).build(),
        }
    }

    /// The docs root this repository reads under.
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Rejects absolute paths and any path containing `..`.
    fn sanitize(&self, cited: &str) -> Result<PathBuf, DocsError> {
        let relative = Path::new(cited);
        let escapes = relative.is_absolute()
            || relative
                .components()
                .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_)));
        if escapes {
            return Err(DocsError::OutsideRoot {
                path: cited.to_string(),
            });
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl DocsProvider for FsDocsRepository {
    async fn resolve(&self, path: &str) -> Result<Option<Arc<ResolvedDoc>>, DocsError> {
        let full = self.sanitize(path)?;

        let bytes = match tokio::fs::read(&full).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(DocsError::Io { path: full, source }),
        };
        let actual = bytes.len() as u64;
        if actual > self.max_bytes {
            return Err(DocsError::TooLarge {
                path: full,
                actual,
                limit: self.max_bytes,
            });
        }

        let digest = SourceDigest::compute(&bytes);
        let doc = self
            .cache
            .get_with(digest, async move {
                let text = String::from_utf8_lossy(&bytes);
                let body = split_frontmatter(&text).body;
                let heading_slugs = heading_refs(body)
                    .into_iter()
                    .map(|h| h.slug)
                    .collect();
                tracing::debug!(path = %full.display(), digest = %digest.short(), "parsed cited document");
                Arc::new(ResolvedDoc {
                    digest,
                    heading_slugs,
                })
            })
            .await;
        Ok(Some(doc))
    }
}
