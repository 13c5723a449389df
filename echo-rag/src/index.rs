//! Vector index trait for storing embeddings and answering similarity queries.

use async_trait::async_trait;

use crate::document::{IndexEntry, SearchResult};
use crate::error::Result;

/// A store of [`IndexEntry`] values supporting nearest-neighbor queries.
///
/// The index holds a single collection of entries that is only ever
/// replaced wholesale; there are no incremental updates. Implementations
/// must keep the previous contents fully queryable until a rebuild has
/// completed, so readers never observe a partially-rebuilt index.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Atomically replace the entire index contents with `entries`.
    ///
    /// On failure the previous contents remain intact and serving.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::RebuildError`](crate::error::RagError::RebuildError)
    /// if the entries are not mutually consistent (e.g. mixed vector
    /// dimensions).
    async fn rebuild(&self, entries: Vec<IndexEntry>) -> Result<()>;

    /// Return at most `top_k` entries ranked by descending cosine
    /// similarity to `vector`.
    ///
    /// Ties are broken by insertion order (earliest entry wins) for
    /// determinism. Querying an empty index returns an empty sequence,
    /// never an error.
    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<SearchResult>>;

    /// Number of stored entries; used for health and status reporting.
    async fn size(&self) -> usize;
}
