//! Retrieval pipeline orchestrator.
//!
//! The [`RagPipeline`] coordinates the full rebuild-and-retrieve workflow by
//! composing a [`Chunker`], an [`EmbeddingProvider`], and a [`VectorIndex`].
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use echo_rag::{RagPipeline, RagConfig, InMemoryVectorIndex, FixedSizeChunker};
//!
//! let config = RagConfig::default();
//! let pipeline = RagPipeline::builder()
//!     .chunker(Arc::new(FixedSizeChunker::new(config.chunk_size, config.chunk_overlap)?))
//!     .config(config)
//!     .embedding_provider(Arc::new(my_embedder))
//!     .index(Arc::new(InMemoryVectorIndex::new()))
//!     .build()?;
//!
//! let report = pipeline.rebuild_index(&documents).await?;
//! let results = pipeline.retrieve("who is the captain?").await?;
//! ```

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{error, info};

use crate::chunking::Chunker;
use crate::config::RagConfig;
use crate::document::{IndexEntry, KnowledgeDocument, RebuildReport, SearchResult};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::index::VectorIndex;
use crate::source::DocumentSource;

/// The retrieval engine orchestrator.
///
/// Owns the rebuild workflow (chunk → embed → publish) and the retrieval
/// workflow (embed → search → threshold filter). Construct one via
/// [`RagPipeline::builder()`].
///
/// Only one rebuild may run at a time; a concurrent rebuild request fails
/// fast with [`RagError::RebuildInProgress`] instead of queuing. Queries
/// are never blocked by a rebuild; they read whichever index snapshot is
/// currently published.
pub struct RagPipeline {
    config: RagConfig,
    chunker: Arc<dyn Chunker>,
    embedding_provider: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn VectorIndex>,
    rebuild_guard: Mutex<()>,
}

impl RagPipeline {
    /// Create a new [`RagPipelineBuilder`].
    pub fn builder() -> RagPipelineBuilder {
        RagPipelineBuilder::default()
    }

    /// Return a reference to the pipeline configuration.
    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// Number of entries in the published index, for status reporting.
    pub async fn index_size(&self) -> usize {
        self.index.size().await
    }

    /// Rebuild the index from the given documents: chunk → embed → publish.
    ///
    /// The replacement index is built fully off to the side; the previous
    /// contents keep serving queries until the new snapshot is published in
    /// one atomic step.
    ///
    /// # Errors
    ///
    /// - [`RagError::RebuildInProgress`] if another rebuild is running.
    /// - [`RagError::RebuildError`] if chunk embedding or publication fails;
    ///   the previous index remains authoritative.
    pub async fn rebuild_index(&self, documents: &[KnowledgeDocument]) -> Result<RebuildReport> {
        let _guard = self.rebuild_guard.try_lock().map_err(|_| RagError::RebuildInProgress)?;

        // 1. Chunk every document
        let mut chunks = Vec::new();
        for document in documents {
            chunks.extend(self.chunker.chunk(document));
        }

        // 2. Embed all chunk texts in one batch
        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        let vectors = self.embedding_provider.embed_batch(&texts).await.map_err(|e| {
            error!(error = %e, "embedding failed during rebuild");
            RagError::RebuildError(format!("embedding failed: {e}"))
        })?;

        // 3. Pair chunks with vectors and publish
        let entries: Vec<IndexEntry> = chunks
            .into_iter()
            .zip(vectors)
            .map(|(chunk, vector)| IndexEntry { chunk, vector })
            .collect();
        let total_chunks = entries.len();

        self.index.rebuild(entries).await?;

        let report = RebuildReport {
            documents_indexed: documents.len(),
            total_chunks,
            sources: documents.iter().map(|d| d.source_id.clone()).collect(),
        };
        info!(
            documents_indexed = report.documents_indexed,
            total_chunks = report.total_chunks,
            "index rebuilt"
        );
        Ok(report)
    }

    /// Rebuild the index from everything the document source lists.
    ///
    /// # Errors
    ///
    /// Listing failures are reported as [`RagError::RebuildError`]; the
    /// previous index remains authoritative. See
    /// [`rebuild_index`](Self::rebuild_index) for the other failure modes.
    pub async fn rebuild_from_source(&self, source: &dyn DocumentSource) -> Result<RebuildReport> {
        let documents = source.list_knowledge_documents().await.map_err(|e| {
            error!(error = %e, "document source listing failed during rebuild");
            RagError::RebuildError(format!("document source failed: {e}"))
        })?;
        self.rebuild_index(&documents).await
    }

    /// Retrieve relevant chunks using the configured `top_k` and
    /// `min_similarity`.
    pub async fn retrieve(&self, query: &str) -> Result<Vec<SearchResult>> {
        self.retrieve_with(query, self.config.top_k, self.config.min_similarity).await
    }

    /// Retrieve relevant chunks with caller-supplied `top_k` and
    /// `min_similarity`: embed → search → threshold filter.
    ///
    /// Returns results in descending similarity order. An empty result is
    /// the normal "no relevant knowledge" case, never an error.
    ///
    /// # Errors
    ///
    /// - [`RagError::ConfigError`] if `min_similarity` lies outside `[0, 1]`.
    /// - [`RagError::EmbeddingUnavailable`] if the query cannot be embedded.
    pub async fn retrieve_with(
        &self,
        query: &str,
        top_k: usize,
        min_similarity: f32,
    ) -> Result<Vec<SearchResult>> {
        if !(0.0..=1.0).contains(&min_similarity) {
            return Err(RagError::ConfigError(format!(
                "min_similarity ({min_similarity}) must lie in [0, 1]"
            )));
        }

        let query_embedding = self.embedding_provider.embed(query).await?;

        let candidates = self.index.query(&query_embedding, top_k).await?;

        let results: Vec<SearchResult> =
            candidates.into_iter().filter(|r| r.similarity >= min_similarity).collect();

        info!(result_count = results.len(), top_k, min_similarity, "retrieval completed");
        Ok(results)
    }
}

/// Builder for constructing a [`RagPipeline`].
///
/// All fields are required. Call [`build()`](RagPipelineBuilder::build) to
/// validate and produce the pipeline.
#[derive(Default)]
pub struct RagPipelineBuilder {
    config: Option<RagConfig>,
    chunker: Option<Arc<dyn Chunker>>,
    embedding_provider: Option<Arc<dyn EmbeddingProvider>>,
    index: Option<Arc<dyn VectorIndex>>,
}

impl RagPipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: RagConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the document chunker.
    pub fn chunker(mut self, chunker: Arc<dyn Chunker>) -> Self {
        self.chunker = Some(chunker);
        self
    }

    /// Set the embedding provider.
    pub fn embedding_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedding_provider = Some(provider);
        self
    }

    /// Set the vector index backend.
    pub fn index(mut self, index: Arc<dyn VectorIndex>) -> Self {
        self.index = Some(index);
        self
    }

    /// Build the [`RagPipeline`], validating that all required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if any required field is missing.
    pub fn build(self) -> Result<RagPipeline> {
        let config =
            self.config.ok_or_else(|| RagError::ConfigError("config is required".to_string()))?;
        let chunker =
            self.chunker.ok_or_else(|| RagError::ConfigError("chunker is required".to_string()))?;
        let embedding_provider = self
            .embedding_provider
            .ok_or_else(|| RagError::ConfigError("embedding_provider is required".to_string()))?;
        let index =
            self.index.ok_or_else(|| RagError::ConfigError("index is required".to_string()))?;

        Ok(RagPipeline {
            config,
            chunker,
            embedding_provider,
            index,
            rebuild_guard: Mutex::new(()),
        })
    }
}
