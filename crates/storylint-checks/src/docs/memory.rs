//! In-memory docs provider.

use super::{DocsError, DocsProvider, ResolvedDoc};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use storylint_document::{heading_refs, split_frontmatter, SourceDigest};

/// A fixed set of documents held in memory.
///
/// Backs tests and any caller that already has its docs tree in hand.
#[derive(Debug, Clone, Default)]
pub struct StaticDocs {
    docs: HashMap<String, Arc<ResolvedDoc>>,
}

impl StaticDocs {
    /// An empty provider: every citation resolves to nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a Markdown document under the given citation path.
    pub fn insert(&mut self, path: impl Into<String>, markdown: &str) {
        let digest = SourceDigest::compute(markdown.as_bytes());
        let body = split_frontmatter(markdown).body;
        let heading_slugs = heading_refs(body).into_iter().map(|h| h.slug).collect();
        self.docs.insert(
            path.into(),
            Arc::new(ResolvedDoc {
                digest,
                heading_slugs,
            }),
        );
    }

    /// Builder form of [`StaticDocs::insert`].
    #[must_use]
    pub fn with_doc(mut self, path: impl Into<String>, markdown: &str) -> Self {
        self.insert(path, markdown);
        self
    }

    /// Number of documents held.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    /// Whether the provider holds no documents.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}

#[async_trait]
impl DocsProvider for StaticDocs {
    async fn resolve(&self, path: &str) -> Result<Option<Arc<ResolvedDoc>>, DocsError> {
        Ok(self.docs.get(path).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn resolves_inserted_docs() {
        let docs = StaticDocs::new().with_doc("guide.md", "# Guide\n\n## Setup\n");
        let doc = docs.resolve("guide.md").await.unwrap().unwrap();
        assert!(doc.has_anchor("setup"));
        assert!(docs.resolve("other.md").await.unwrap().is_none());
    }
}
