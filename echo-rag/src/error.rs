//! Error types for the `echo-rag` crate.

use thiserror::Error;

/// Errors that can occur in retrieval engine operations.
#[derive(Debug, Error)]
pub enum RagError {
    /// Invalid chunking or retrieval configuration. Fatal at startup, not retried.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The embedding backend could not be loaded or reached.
    ///
    /// Surfaced to the caller per-request; the caller may retry with backoff.
    /// Never silently degraded to a placeholder vector.
    #[error("Embedding backend unavailable ({provider}): {message}")]
    EmbeddingUnavailable {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// An index rebuild failed. The previous index remains authoritative
    /// and continues serving queries.
    #[error("Index rebuild failed: {0}")]
    RebuildError(String),

    /// A rebuild was requested while another rebuild was already running.
    /// The caller may retry later; rebuild requests are never queued.
    #[error("an index rebuild is already in progress")]
    RebuildInProgress,

    /// The document source failed to list knowledge documents.
    #[error("Document source error: {0}")]
    SourceError(String),
}

/// A convenience result type for retrieval engine operations.
pub type Result<T> = std::result::Result<T, RagError>;
