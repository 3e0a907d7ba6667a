//! Deterministic in-process providers for tests

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::{Error, Result};

use super::embedding::EmbeddingProvider;
use super::llm::LlmProvider;
use super::vector_store::{EmbeddedChunk, ScoredText, VectorStore};

const FAKE_DIMENSIONS: usize = 8;

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

/// Embedder that hashes bytes into a small fixed-dimension vector. Identical
/// texts always embed identically, similar texts land close together.
pub struct FakeEmbedder;

#[async_trait]
impl EmbeddingProvider for FakeEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vector = vec![0.0f32; FAKE_DIMENSIONS];
        for byte in text.bytes() {
            vector[byte as usize % FAKE_DIMENSIONS] += 1.0;
        }
        Ok(vector)
    }

    fn dimensions(&self) -> usize {
        FAKE_DIMENSIONS
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "fake-embedder"
    }
}

/// Embedder that always fails, for exercising build/retrieve error paths
pub struct FailingEmbedder;

#[async_trait]
impl EmbeddingProvider for FailingEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Err(Error::Embedding("embedding backend unreachable".to_string()))
    }

    fn dimensions(&self) -> usize {
        FAKE_DIMENSIONS
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(false)
    }

    fn name(&self) -> &str {
        "failing-embedder"
    }
}

/// In-memory vector store with brute-force cosine search
#[derive(Default)]
pub struct MemoryVectorStore {
    collections: Mutex<HashMap<String, Vec<(String, Vec<f32>)>>>,
}

impl MemoryVectorStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of points stored in a collection
    pub fn len(&self, collection: &str) -> usize {
        self.collections
            .lock()
            .unwrap()
            .get(collection)
            .map(|points| points.len())
            .unwrap_or(0)
    }
}

#[async_trait]
impl VectorStore for MemoryVectorStore {
    async fn recreate_collection(&self, collection: &str, _dimensions: usize) -> Result<()> {
        self.collections
            .lock()
            .unwrap()
            .insert(collection.to_string(), Vec::new());
        Ok(())
    }

    async fn upsert(&self, collection: &str, chunks: &[EmbeddedChunk]) -> Result<()> {
        let mut collections = self.collections.lock().unwrap();
        let points = collections
            .get_mut(collection)
            .ok_or_else(|| Error::VectorBackend(format!("no collection '{}'", collection)))?;
        for chunk in chunks {
            points.push((chunk.text.clone(), chunk.vector.clone()));
        }
        Ok(())
    }

    async fn search(
        &self,
        collection: &str,
        vector: &[f32],
        limit: usize,
    ) -> Result<Vec<ScoredText>> {
        let collections = self.collections.lock().unwrap();
        let points = collections
            .get(collection)
            .ok_or_else(|| Error::VectorBackend(format!("no collection '{}'", collection)))?;

        let mut results: Vec<ScoredText> = points
            .iter()
            .map(|(text, stored)| ScoredText {
                text: text.clone(),
                score: cosine_similarity(vector, stored),
            })
            .collect();

        results.sort_by(|a, b| b.score.total_cmp(&a.score));
        results.truncate(limit);
        Ok(results)
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "memory"
    }
}

/// Vector store that always fails, simulating an unreachable backend
pub struct FailingVectorStore;

#[async_trait]
impl VectorStore for FailingVectorStore {
    async fn recreate_collection(&self, _collection: &str, _dimensions: usize) -> Result<()> {
        Err(Error::VectorBackend("vector backend unreachable".to_string()))
    }

    async fn upsert(&self, _collection: &str, _chunks: &[EmbeddedChunk]) -> Result<()> {
        Err(Error::VectorBackend("vector backend unreachable".to_string()))
    }

    async fn search(
        &self,
        _collection: &str,
        _vector: &[f32],
        _limit: usize,
    ) -> Result<Vec<ScoredText>> {
        Err(Error::VectorBackend("vector backend unreachable".to_string()))
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(false)
    }

    fn name(&self) -> &str {
        "failing-store"
    }
}

/// Chat provider returning a canned answer
pub struct FakeLlm {
    pub reply: String,
}

impl FakeLlm {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
        }
    }
}

#[async_trait]
impl LlmProvider for FakeLlm {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        Ok(self.reply.clone())
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "fake-llm"
    }

    fn model(&self) -> &str {
        "fake-model"
    }
}

/// Chat provider that always fails
pub struct FailingLlm;

#[async_trait]
impl LlmProvider for FailingLlm {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        Err(Error::Llm("chat backend unreachable".to_string()))
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(false)
    }

    fn name(&self) -> &str {
        "failing-llm"
    }

    fn model(&self) -> &str {
        "failing-model"
    }
}
