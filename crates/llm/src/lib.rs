//! Chat-completion API client.
//!
//! Talks to an OpenAI-compatible `/chat/completions` endpoint with Bearer
//! authentication. The endpoint is overridable so tests can point the client
//! at a mock server.

use std::time::{Duration, Instant};

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, info};

/// Default completion API base URL.
pub const DEFAULT_ENDPOINT: &str = "https://ai.hackclub.com/proxy/v1";

/// Default model identifier sent with every request.
pub const DEFAULT_MODEL: &str = "qwen/qwen3-32b";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Errors from the completion API client.
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("completion API key cannot be empty")]
    EmptyApiKey,

    #[error("completion request timed out after {0}s")]
    Timeout(u64),

    #[error("completion API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("completion response contained no choices")]
    EmptyResponse,

    #[error("malformed completion response: {0}")]
    Malformed(String),

    #[error("completion request failed: {0}")]
    Request(reqwest::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: &str) -> Self {
        Self {
            role: "user".to_string(),
            content: content.to_string(),
        }
    }

    pub fn system(content: &str) -> Self {
        Self {
            role: "system".to_string(),
            content: content.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatCompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionChoice {
    message: ChatCompletionMessage,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionMessage {
    content: String,
}

/// Client for a single completion endpoint and model.
#[derive(Debug, Clone)]
pub struct CompletionClient {
    api_key: String,
    model: String,
    endpoint: String,
    client: Client,
    timeout: Duration,
}

impl CompletionClient {
    /// Create a client with the default 60-second request timeout.
    pub fn new(api_key: String, model: String, endpoint: Option<String>) -> Result<Self, LlmError> {
        if api_key.is_empty() {
            return Err(LlmError::EmptyApiKey);
        }

        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(LlmError::Request)?;

        Ok(Self {
            api_key,
            model,
            endpoint: endpoint.unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            client,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Rebuild the client with a different request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, LlmError> {
        self.client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(LlmError::Request)?;
        self.timeout = timeout;
        Ok(self)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send one user-role message and return the first choice's content.
    pub async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage::user(prompt)],
        };

        info!(
            "🚀 Sending completion request: {} chars (model: {})",
            prompt.len(),
            self.model
        );
        debug!("Prompt: {}", prompt);
        let started = Instant::now();

        let response = self
            .client
            .post(format!("{}/chat/completions", self.endpoint))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout(self.timeout.as_secs())
                } else {
                    LlmError::Request(e)
                }
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            error!("Completion API error {}: {}", status, body);
            return Err(LlmError::Api { status, body });
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Malformed(e.to_string()))?;

        let choice = parsed.choices.first().ok_or(LlmError::EmptyResponse)?;

        info!("✅ Completion received in {:?}", started.elapsed());
        Ok(choice.message.content.clone())
    }
}
