//! Query embedding via the Cohere embed API.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::error::{Result, RetrievalError};

/// Default Cohere API base URL.
pub const DEFAULT_ENDPOINT: &str = "https://api.cohere.com";

/// Turns query text into an embedding vector.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>>;
}

#[derive(Debug, Serialize)]
struct EmbedRequest {
    model: String,
    texts: Vec<String>,
    input_type: String,
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

/// Embedder backed by the Cohere HTTP API.
#[derive(Debug, Clone)]
pub struct CohereEmbedder {
    api_key: String,
    model: String,
    endpoint: String,
    client: Client,
}

impl CohereEmbedder {
    pub fn new(api_key: String, model: String, endpoint: Option<String>) -> Result<Self> {
        if api_key.is_empty() {
            return Err(RetrievalError::EmptyApiKey);
        }

        Ok(Self {
            api_key,
            model,
            endpoint: endpoint.unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            client: Client::new(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl Embedder for CohereEmbedder {
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        let request = EmbedRequest {
            model: self.model.clone(),
            texts: vec![text.to_string()],
            input_type: "search_query".to_string(),
        };

        debug!("Embedding query ({} chars, model {})", text.len(), self.model);

        let response = self
            .client
            .post(format!("{}/v1/embed", self.endpoint))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            error!("Embedding API error {}: {}", status, body);
            return Err(RetrievalError::EmbeddingApi { status, body });
        }

        let parsed: EmbedResponse = response
            .json()
            .await
            .map_err(|e| RetrievalError::EmbeddingMalformed(e.to_string()))?;

        parsed
            .embeddings
            .into_iter()
            .next()
            .ok_or_else(|| RetrievalError::EmbeddingMalformed("no embeddings returned".to_string()))
    }
}
