//! Data types for knowledge documents, chunks, and search results.

use serde::{Deserialize, Serialize};

/// A raw knowledge-base document, one per knowledge file.
///
/// Immutable once loaded; owned by the indexing process for the duration
/// of a rebuild.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KnowledgeDocument {
    /// Identifier of the originating source (typically the file name).
    pub source_id: String,
    /// The full text content of the document.
    pub raw_text: String,
}

impl KnowledgeDocument {
    /// Create a document from a source identifier and its text content.
    pub fn new(source_id: impl Into<String>, raw_text: impl Into<String>) -> Self {
        Self { source_id: source_id.into(), raw_text: raw_text.into() }
    }
}

/// A bounded contiguous slice of a [`KnowledgeDocument`], the unit of retrieval.
///
/// Chunk IDs are derived as `{source_id}_{offset}` so that rebuilding from
/// the same input produces the same IDs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    /// Unique identifier, derived from the source and character offset.
    pub chunk_id: String,
    /// Identifier of the parent document's source.
    pub source_id: String,
    /// The text content of the chunk.
    pub text: String,
    /// Starting character offset of this chunk within the parent document.
    pub offset: usize,
}

/// A [`Chunk`] paired with its embedding vector: the atomic unit stored
/// in the vector index.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndexEntry {
    /// The stored chunk.
    pub chunk: Chunk,
    /// The embedding vector for the chunk's text.
    pub vector: Vec<f32>,
}

/// A retrieved [`Chunk`] paired with its relevance to the query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// The retrieved chunk.
    pub chunk: Chunk,
    /// Cosine similarity to the query, clamped to `[0, 1]`.
    pub similarity: f32,
}

/// Statistics reported by a successful index rebuild.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RebuildReport {
    /// Number of documents that were chunked and indexed.
    pub documents_indexed: usize,
    /// Total number of chunks stored in the new index.
    pub total_chunks: usize,
    /// Source identifiers of the indexed documents, in input order.
    pub sources: Vec<String>,
}
