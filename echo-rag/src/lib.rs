//! # echo-rag
//!
//! Knowledge retrieval engine for the Echo character chat: turns raw
//! knowledge-base text into searchable semantic chunks and retrieves the
//! most relevant chunks for a query.
//!
//! ## Overview
//!
//! - [`FixedSizeChunker`] — deterministic sliding-window document chunking
//! - [`EmbeddingProvider`] — pluggable text-to-vector backend
//! - [`InMemoryVectorIndex`] — cosine-similarity index with atomic
//!   build-then-publish rebuilds
//! - [`RagPipeline`] — orchestrates rebuild (chunk → embed → publish) and
//!   retrieval (embed → search → threshold filter)
//!
//! Build time: knowledge documents flow through the chunker and embedder
//! into the index. Query time: the pipeline embeds the query, ranks index
//! entries by cosine similarity, and drops results below the configured
//! threshold. An empty result is the normal "no relevant knowledge" case.
//!
//! The engine performs no I/O of its own; knowledge loading sits behind
//! the [`DocumentSource`] trait.

pub mod chunking;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod index;
pub mod inmemory;
#[cfg(feature = "openai")]
pub mod openai;
pub mod pipeline;
pub mod source;

pub use chunking::{Chunker, FixedSizeChunker};
pub use config::{RagConfig, RagConfigBuilder};
pub use document::{Chunk, IndexEntry, KnowledgeDocument, RebuildReport, SearchResult};
pub use embedding::EmbeddingProvider;
pub use error::{RagError, Result};
pub use index::VectorIndex;
pub use inmemory::InMemoryVectorIndex;
pub use pipeline::{RagPipeline, RagPipelineBuilder};
pub use source::DocumentSource;
