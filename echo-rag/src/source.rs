//! Document source trait for the external knowledge-loading collaborator.

use async_trait::async_trait;

use crate::document::KnowledgeDocument;
use crate::error::Result;

/// A read-only source of knowledge documents.
///
/// File-system walking, decoding, and any other I/O live behind this seam;
/// the engine itself never touches the disk, which keeps it trivially
/// testable with in-memory fakes.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// List every knowledge document currently available for indexing.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::SourceError`](crate::error::RagError::SourceError)
    /// if the underlying source cannot be enumerated.
    async fn list_knowledge_documents(&self) -> Result<Vec<KnowledgeDocument>>;
}
