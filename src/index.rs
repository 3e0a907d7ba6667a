//! Embedding index: all-or-nothing builds and top-k retrieval

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::providers::{EmbeddedChunk, EmbeddingProvider, ScoredText, VectorStore};

/// Handle to a built chunk index
///
/// A value of this type exists only after a successful build: the embedding
/// call succeeded for every chunk and the collection holds every point.
/// Query embedding reuses the provider the index was built with.
#[derive(Clone)]
pub struct EmbeddingIndex {
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
    collection: String,
    chunk_count: usize,
}

impl std::fmt::Debug for EmbeddingIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingIndex")
            .field("collection", &self.collection)
            .field("chunk_count", &self.chunk_count)
            .finish_non_exhaustive()
    }
}

impl EmbeddingIndex {
    /// Embed `chunks` and store them in `collection`, replacing any prior
    /// contents of that collection.
    ///
    /// The build is all-or-nothing from the caller's perspective: any
    /// embedding or storage failure yields [`Error::IndexBuild`] and no
    /// index handle.
    pub async fn build(
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStore>,
        collection: &str,
        chunks: Vec<String>,
    ) -> Result<Self> {
        if chunks.is_empty() {
            return Err(Error::IndexBuild(
                "documents contained no extractable text to index".to_string(),
            ));
        }

        let vectors = embedder
            .embed_batch(&chunks)
            .await
            .map_err(|e| Error::IndexBuild(e.to_string()))?;

        let points: Vec<EmbeddedChunk> = chunks
            .into_iter()
            .zip(vectors)
            .map(|(text, vector)| EmbeddedChunk { text, vector })
            .collect();

        store
            .recreate_collection(collection, embedder.dimensions())
            .await
            .map_err(|e| Error::IndexBuild(e.to_string()))?;
        store
            .upsert(collection, &points)
            .await
            .map_err(|e| Error::IndexBuild(e.to_string()))?;

        tracing::info!(
            collection,
            chunks = points.len(),
            backend = store.name(),
            "built embedding index"
        );

        Ok(Self {
            embedder,
            store,
            collection: collection.to_string(),
            chunk_count: points.len(),
        })
    }

    /// Retrieve up to `k` chunks most similar to `query`, ordered by
    /// decreasing similarity. A `k` larger than the collection returns
    /// everything available.
    pub async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<ScoredText>> {
        if k == 0 {
            return Err(Error::InvalidInput("k must be positive".to_string()));
        }

        let query_vector = self
            .embedder
            .embed(query)
            .await
            .map_err(|e| Error::Retrieval(e.to_string()))?;

        let mut results = self
            .store
            .search(&self.collection, &query_vector, k)
            .await
            .map_err(|e| Error::Retrieval(e.to_string()))?;

        // Backends return results ordered; normalize anyway so the contract
        // holds regardless of the store implementation.
        results.sort_by(|a, b| b.score.total_cmp(&a.score));
        results.truncate(k);

        Ok(results)
    }

    /// Number of chunks stored at build time
    pub fn chunk_count(&self) -> usize {
        self.chunk_count
    }

    /// Collection the index was built into
    pub fn collection(&self) -> &str {
        &self.collection
    }
}
