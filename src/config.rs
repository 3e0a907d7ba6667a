//! Configuration for the document chat assistant

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};

/// Main configuration
///
/// Loaded from an optional TOML file, then overridden by environment
/// variables so credentials never have to live on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatConfig {
    /// OpenAI configuration (embeddings + chat completions)
    #[serde(default)]
    pub openai: OpenAiConfig,
    /// Qdrant configuration (vector storage + search)
    #[serde(default)]
    pub qdrant: QdrantConfig,
    /// Chunking configuration
    #[serde(default)]
    pub chunking: ChunkingConfig,
    /// Retrieval configuration
    #[serde(default)]
    pub retrieval: RetrievalConfig,
}

/// OpenAI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiConfig {
    /// API base URL
    pub base_url: String,
    /// API key (prefer the OPENAI_API_KEY environment variable)
    pub api_key: String,
    /// Embedding model name
    pub embed_model: String,
    /// Embedding dimensions (1536 for text-embedding-3-small)
    pub dimensions: usize,
    /// Chat completion model name
    pub chat_model: String,
    /// Sampling temperature for generation
    pub temperature: f32,
    /// Number of texts per embedding request
    pub batch_size: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".to_string(),
            api_key: String::new(),
            embed_model: "text-embedding-3-small".to_string(),
            dimensions: 1536,
            chat_model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
            batch_size: 32,
            timeout_secs: 60,
        }
    }
}

/// Qdrant configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QdrantConfig {
    /// Qdrant endpoint URL
    pub url: String,
    /// API key for Qdrant Cloud (prefer the QDRANT_API_KEY environment variable)
    pub api_key: Option<String>,
    /// Collection name holding the document chunks
    pub collection: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for QdrantConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:6333".to_string(),
            api_key: None,
            collection: "medical_docs".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Text chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Target chunk size in characters
    pub chunk_size: usize,
    /// Overlap between consecutive chunks in characters
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
        }
    }
}

/// Retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Number of chunks to retrieve per question
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { top_k: 3 }
    }
}

impl ChatConfig {
    /// Load configuration from an optional TOML file, then apply environment
    /// overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                let content = std::fs::read_to_string(path)?;
                toml::from_str(&content)
                    .map_err(|e| Error::Config(format!("failed to parse {}: {}", path.display(), e)))?
            }
            None => Self::default(),
        };
        config.apply_env();
        Ok(config)
    }

    /// Apply environment variable overrides
    ///
    /// Recognized variables: OPENAI_API_KEY, QDRANT_URL, QDRANT_API_KEY,
    /// COLLECTION_NAME.
    pub fn apply_env(&mut self) {
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            self.openai.api_key = key;
        }
        if let Ok(url) = std::env::var("QDRANT_URL") {
            self.qdrant.url = url;
        }
        if let Ok(key) = std::env::var("QDRANT_API_KEY") {
            self.qdrant.api_key = Some(key);
        }
        if let Ok(name) = std::env::var("COLLECTION_NAME") {
            self.qdrant.collection = name;
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.chunking.chunk_size == 0 {
            return Err(Error::Config("chunk_size must be positive".to_string()));
        }
        if self.chunking.chunk_overlap >= self.chunking.chunk_size {
            return Err(Error::Config(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunking.chunk_overlap, self.chunking.chunk_size
            )));
        }
        if self.retrieval.top_k == 0 {
            return Err(Error::Config("top_k must be positive".to_string()));
        }
        if self.openai.dimensions == 0 {
            return Err(Error::Config("embedding dimensions must be positive".to_string()));
        }
        if self.openai.batch_size == 0 {
            return Err(Error::Config("batch_size must be positive".to_string()));
        }
        if self.openai.api_key.is_empty() {
            return Err(Error::Config(
                "OpenAI API key is not set (set OPENAI_API_KEY or openai.api_key)".to_string(),
            ));
        }
        if self.qdrant.url.is_empty() {
            return Err(Error::Config(
                "Qdrant URL is not set (set QDRANT_URL or qdrant.url)".to_string(),
            ));
        }
        if self.qdrant.collection.is_empty() {
            return Err(Error::Config("collection name must not be empty".to_string()));
        }
        Ok(())
    }
}
