//! Vector store provider trait

use async_trait::async_trait;

use crate::error::Result;

/// A chunk paired with its embedding, ready for storage
#[derive(Debug, Clone)]
pub struct EmbeddedChunk {
    /// Chunk text
    pub text: String,
    /// Embedding vector
    pub vector: Vec<f32>,
}

/// A search hit: stored text with its similarity score
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredText {
    /// Stored chunk text
    pub text: String,
    /// Similarity score, higher is more similar
    pub score: f32,
}

/// Trait for named-collection vector storage with nearest-neighbor search
///
/// Implementations:
/// - `QdrantStore`: remote Qdrant instance over its REST API
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Create `collection` with the given vector dimensions, dropping any
    /// existing collection of the same name first. Used by index builds so a
    /// reprocess fully supersedes the previous contents.
    async fn recreate_collection(&self, collection: &str, dimensions: usize) -> Result<()>;

    /// Store embedded chunks in `collection`
    async fn upsert(&self, collection: &str, chunks: &[EmbeddedChunk]) -> Result<()>;

    /// Return up to `limit` nearest neighbors of `vector`, ordered by
    /// decreasing similarity. Asking for more entries than the collection
    /// holds returns everything available.
    async fn search(&self, collection: &str, vector: &[f32], limit: usize)
        -> Result<Vec<ScoredText>>;

    /// Check if the backend is reachable
    async fn health_check(&self) -> Result<bool>;

    /// Provider name for logging
    fn name(&self) -> &str;
}
