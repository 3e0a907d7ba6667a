//! Provider abstractions for embeddings, chat completion, and vector storage
//!
//! Each external capability sits behind a narrow trait so the pipeline can
//! be exercised with deterministic in-process fakes, while production
//! wiring selects the hosted backends from configuration.

pub mod embedding;
pub mod llm;
pub mod openai;
pub mod qdrant;
pub mod vector_store;

#[cfg(test)]
pub mod fakes;

pub use embedding::EmbeddingProvider;
pub use llm::LlmProvider;
pub use openai::{OpenAiChat, OpenAiEmbedder, OpenAiProvider};
pub use qdrant::QdrantStore;
pub use vector_store::{EmbeddedChunk, ScoredText, VectorStore};
