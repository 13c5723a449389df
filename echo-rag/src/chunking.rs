//! Knowledge document chunking.
//!
//! This module provides the [`Chunker`] trait and [`FixedSizeChunker`], a
//! deterministic sliding-window splitter. Chunking operates on raw
//! characters with no semantic awareness, which keeps rebuilds reproducible.

use crate::document::{Chunk, KnowledgeDocument};
use crate::error::{RagError, Result};

/// A strategy for splitting documents into chunks.
///
/// Implementations produce [`Chunk`]s with text and source metadata but no
/// embeddings. Embeddings are attached later by the pipeline.
pub trait Chunker: Send + Sync {
    /// Split a document into ordered chunks.
    ///
    /// Returns an empty `Vec` if the document has empty text. Pure function
    /// of its inputs: identical documents yield identical chunk sequences.
    fn chunk(&self, document: &KnowledgeDocument) -> Vec<Chunk>;
}

/// Splits text into fixed-size character windows with configurable overlap.
///
/// The window advances by `chunk_size - chunk_overlap` characters per step;
/// the final window is clipped to the remaining text and may be shorter.
/// A document shorter than `chunk_size` yields exactly one chunk. Chunk IDs
/// are `{source_id}_{offset}`, where `offset` is the window's starting
/// character position, so the same input always produces the same IDs.
///
/// # Example
///
/// ```rust,ignore
/// use echo_rag::FixedSizeChunker;
///
/// let chunker = FixedSizeChunker::new(500, 50)?;
/// let chunks = chunker.chunk(&document);
/// ```
#[derive(Debug, Clone)]
pub struct FixedSizeChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl FixedSizeChunker {
    /// Create a new `FixedSizeChunker`.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if `chunk_size` is zero or
    /// `chunk_overlap >= chunk_size`.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(RagError::ConfigError("chunk_size must be greater than zero".to_string()));
        }
        if chunk_overlap >= chunk_size {
            return Err(RagError::ConfigError(format!(
                "chunk_overlap ({chunk_overlap}) must be less than chunk_size ({chunk_size})"
            )));
        }
        Ok(Self { chunk_size, chunk_overlap })
    }
}

impl Chunker for FixedSizeChunker {
    fn chunk(&self, document: &KnowledgeDocument) -> Vec<Chunk> {
        if document.raw_text.is_empty() {
            return Vec::new();
        }

        let text = &document.raw_text;
        // Byte positions of every char boundary; windows are taken in
        // characters so multibyte text never splits mid-codepoint.
        let mut boundaries: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
        boundaries.push(text.len());
        let total_chars = boundaries.len() - 1;

        let step = self.chunk_size - self.chunk_overlap;
        let mut chunks = Vec::new();
        let mut start = 0;

        loop {
            let end = (start + self.chunk_size).min(total_chars);
            chunks.push(Chunk {
                chunk_id: format!("{}_{start}", document.source_id),
                source_id: document.source_id.clone(),
                text: text[boundaries[start]..boundaries[end]].to_string(),
                offset: start,
            });
            // The window that reaches the end of the document is the last one.
            if start + self.chunk_size >= total_chars {
                break;
            }
            start += step;
        }

        chunks
    }
}
