//! Qdrant-backed vector store over the REST API

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

use crate::config::QdrantConfig;
use crate::error::{Error, Result};

use super::vector_store::{EmbeddedChunk, ScoredText, VectorStore};

/// Vector store backed by a remote Qdrant instance
pub struct QdrantStore {
    http: Client,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Serialize)]
struct CreateCollectionRequest {
    vectors: VectorParams,
}

#[derive(Serialize)]
struct VectorParams {
    size: usize,
    distance: &'static str,
}

#[derive(Serialize)]
struct UpsertRequest {
    points: Vec<Point>,
}

#[derive(Serialize)]
struct Point {
    id: Uuid,
    vector: Vec<f32>,
    payload: PointPayload,
}

#[derive(Serialize, Deserialize)]
struct PointPayload {
    text: String,
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    vector: &'a [f32],
    limit: usize,
    with_payload: bool,
}

#[derive(Deserialize)]
struct SearchResponse {
    result: Vec<ScoredPoint>,
}

#[derive(Deserialize)]
struct ScoredPoint {
    score: f32,
    payload: Option<PointPayload>,
}

impl QdrantStore {
    /// Create a new store client from configuration
    pub fn new(config: &QdrantConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    /// Attach the Qdrant Cloud API key header when configured
    fn with_auth(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.header("api-key", key),
            None => request,
        }
    }

    async fn expect_success(response: Response, action: &str) -> Result<Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(Error::VectorBackend(format!(
            "{} failed with {}: {}",
            action, status, body
        )))
    }
}

#[async_trait]
impl VectorStore for QdrantStore {
    async fn recreate_collection(&self, collection: &str, dimensions: usize) -> Result<()> {
        // Drop any previous collection so a reprocess never merges with old
        // chunks. A 404 here just means there was nothing to drop.
        let delete = self
            .with_auth(
                self.http
                    .delete(format!("{}/collections/{}", self.base_url, collection)),
            )
            .send()
            .await
            .map_err(|e| Error::VectorBackend(e.to_string()))?;
        if !delete.status().is_success() && delete.status() != reqwest::StatusCode::NOT_FOUND {
            let status = delete.status();
            let body = delete.text().await.unwrap_or_default();
            return Err(Error::VectorBackend(format!(
                "collection delete failed with {}: {}",
                status, body
            )));
        }

        let request = CreateCollectionRequest {
            vectors: VectorParams {
                size: dimensions,
                distance: "Cosine",
            },
        };

        let response = self
            .with_auth(
                self.http
                    .put(format!("{}/collections/{}", self.base_url, collection)),
            )
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::VectorBackend(e.to_string()))?;
        Self::expect_success(response, "collection create").await?;

        tracing::debug!(collection, dimensions, "recreated Qdrant collection");
        Ok(())
    }

    async fn upsert(&self, collection: &str, chunks: &[EmbeddedChunk]) -> Result<()> {
        let request = UpsertRequest {
            points: chunks
                .iter()
                .map(|chunk| Point {
                    id: Uuid::new_v4(),
                    vector: chunk.vector.clone(),
                    payload: PointPayload {
                        text: chunk.text.clone(),
                    },
                })
                .collect(),
        };

        let response = self
            .with_auth(self.http.put(format!(
                "{}/collections/{}/points?wait=true",
                self.base_url, collection
            )))
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::VectorBackend(e.to_string()))?;
        Self::expect_success(response, "points upsert").await?;

        tracing::debug!(collection, points = chunks.len(), "upserted points");
        Ok(())
    }

    async fn search(
        &self,
        collection: &str,
        vector: &[f32],
        limit: usize,
    ) -> Result<Vec<ScoredText>> {
        let request = SearchRequest {
            vector,
            limit,
            with_payload: true,
        };

        let response = self
            .with_auth(self.http.post(format!(
                "{}/collections/{}/points/search",
                self.base_url, collection
            )))
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::VectorBackend(e.to_string()))?;
        let response = Self::expect_success(response, "search").await?;

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| Error::VectorBackend(format!("malformed search response: {}", e)))?;

        Ok(parsed
            .result
            .into_iter()
            .filter_map(|point| {
                point.payload.map(|payload| ScoredText {
                    text: payload.text,
                    score: point.score,
                })
            })
            .collect())
    }

    async fn health_check(&self) -> Result<bool> {
        let response = self
            .with_auth(self.http.get(format!("{}/collections", self.base_url)))
            .send()
            .await
            .map_err(|e| Error::VectorBackend(e.to_string()))?;
        Ok(response.status().is_success())
    }

    fn name(&self) -> &str {
        "qdrant"
    }
}
