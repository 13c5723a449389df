//! Embedding provider trait for mapping text to fixed-length vectors.

use async_trait::async_trait;

use crate::error::Result;

/// A provider that generates vector embeddings from text input.
///
/// Implementations wrap a specific embedding backend behind a unified async
/// interface; the engine is agnostic to whether the backend is local or
/// remote. For a fixed model, identical text must yield a bit-identical
/// vector. A backend that cannot be loaded or reached fails with
/// [`RagError::EmbeddingUnavailable`](crate::error::RagError::EmbeddingUnavailable);
/// it never degrades to a silent fallback vector.
///
/// The default [`embed_batch`](EmbeddingProvider::embed_batch) calls
/// [`embed`](EmbeddingProvider::embed) sequentially; backends with native
/// batching should override it.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate an embedding vector for a single text input.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embedding vectors for a batch of text inputs.
    ///
    /// Order-preserving: the output has the same length and order as the
    /// input slice.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.embed(text).await?);
        }
        Ok(results)
    }

    /// Return the dimensionality of embeddings produced by this provider.
    ///
    /// Constant for the lifetime of an index built with this provider.
    fn dimensions(&self) -> usize;
}
