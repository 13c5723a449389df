//! In-memory vector index using cosine similarity.
//!
//! This module provides [`InMemoryVectorIndex`], the single-process index
//! backing the engine. Entries live in an insertion-ordered snapshot behind
//! an `Arc`; a rebuild constructs the replacement snapshot off to the side
//! and publishes it in one pointer swap, so concurrent queries observe
//! either the fully-old or the fully-new contents, never a mix.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::info;

use crate::document::{IndexEntry, SearchResult};
use crate::error::{RagError, Result};
use crate::index::VectorIndex;

/// An in-memory vector index using cosine similarity for search.
///
/// Entries are stored in insertion order, which doubles as the
/// deterministic tie-break for equal similarity scores. The read path
/// clones the current snapshot `Arc` and scans without holding any lock,
/// so queries never block on a rebuild.
///
/// # Example
///
/// ```rust,ignore
/// use echo_rag::{InMemoryVectorIndex, VectorIndex};
///
/// let index = InMemoryVectorIndex::new();
/// index.rebuild(entries).await?;
/// let results = index.query(&query_embedding, 5).await?;
/// ```
#[derive(Debug, Default)]
pub struct InMemoryVectorIndex {
    snapshot: RwLock<Arc<Vec<IndexEntry>>>,
}

impl InMemoryVectorIndex {
    /// Create a new empty index.
    pub fn new() -> Self {
        Self::default()
    }

    async fn current(&self) -> Arc<Vec<IndexEntry>> {
        Arc::clone(&*self.snapshot.read().await)
    }
}

/// Compute cosine similarity between two vectors.
///
/// Equivalent to the dot product of the unit-normalized inputs, clamped to
/// `[0, 1]` for relevance filtering. Returns 0.0 if either vector has zero
/// magnitude.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot / (norm_a * norm_b)).clamp(0.0, 1.0)
}

#[async_trait]
impl VectorIndex for InMemoryVectorIndex {
    async fn rebuild(&self, entries: Vec<IndexEntry>) -> Result<()> {
        // Validate before touching the published snapshot: all vectors must
        // share one dimension, and none may be empty.
        if let Some(first) = entries.first() {
            let dimensions = first.vector.len();
            if dimensions == 0 {
                return Err(RagError::RebuildError(format!(
                    "entry '{}' has an empty embedding vector",
                    first.chunk.chunk_id
                )));
            }
            for entry in &entries {
                if entry.vector.len() != dimensions {
                    return Err(RagError::RebuildError(format!(
                        "entry '{}' has dimension {} but the index expects {}",
                        entry.chunk.chunk_id,
                        entry.vector.len(),
                        dimensions
                    )));
                }
            }
        }

        let entry_count = entries.len();
        let next = Arc::new(entries);

        // Publish: one pointer swap under a briefly-held write lock.
        *self.snapshot.write().await = next;

        info!(entry_count, "vector index rebuilt");
        Ok(())
    }

    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<SearchResult>> {
        let snapshot = self.current().await;

        let mut scored: Vec<SearchResult> = snapshot
            .iter()
            .map(|entry| SearchResult {
                chunk: entry.chunk.clone(),
                similarity: cosine_similarity(&entry.vector, vector),
            })
            .collect();

        // Stable sort: entries with equal similarity keep insertion order.
        scored.sort_by(|a, b| {
            b.similarity.partial_cmp(&a.similarity).unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(top_k);
        Ok(scored)
    }

    async fn size(&self) -> usize {
        self.current().await.len()
    }
}
