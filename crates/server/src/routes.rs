//! HTTP surface: liveness probe and the chat endpoint.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info};

use llm::LlmError;
use retrieval::RetrievalError;

use crate::state::AppState;

/// Number of passages retrieved for every query.
pub const TOP_K: usize = 5;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
}

/// Request failures, each mapped to a distinct status code.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("retrieval failed: {0}")]
    Retrieval(#[from] RetrievalError),

    #[error("completion API timed out")]
    UpstreamTimeout,

    #[error("completion API failed: {0}")]
    Upstream(String),
}

impl From<LlmError> for ApiError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Timeout(_) => ApiError::UpstreamTimeout,
            other => ApiError::Upstream(other.to_string()),
        }
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::Retrieval(_) => StatusCode::BAD_GATEWAY,
            ApiError::UpstreamTimeout => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("request failed: {}", self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(liveness))
        .route("/chat", post(chat))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

async fn liveness() -> Json<serde_json::Value> {
    Json(json!({ "message": "Running" }))
}

async fn chat(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let started = Instant::now();
    let query = body.message.trim();
    if query.is_empty() {
        return Err(ApiError::InvalidInput("message must not be empty".to_string()));
    }

    let retrieval_started = Instant::now();
    let passages = state.retriever.retrieve(query, TOP_K).await?;
    debug!(
        "Retrieved {} passages in {:?}",
        passages.len(),
        retrieval_started.elapsed()
    );

    let context = passages
        .iter()
        .map(|p| p.passage.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");
    let prompt = build_prompt(&context, query);

    let completion_started = Instant::now();
    let answer = state.completion.complete(&prompt).await?;
    debug!("Completion took {:?}", completion_started.elapsed());

    info!("Answered query in {:?}", started.elapsed());
    Ok(Json(ChatResponse { response: answer }))
}

/// Fixed prompt template: rules context block first, then the question.
fn build_prompt(context: &str, query: &str) -> String {
    format!(
        "You are an FTC game rules expert. Use the following game rules to provide \
a comprehensive and detailed answer to the question.\n\n\
Game Rules:\n{context}\n\n\
Question: {query}\n\n\
Provide a thorough one-paragraph max answer based on the rules provided. Include:\n\
- Main answer with specific details\n\
- Relevant rule numbers/sections when applicable\n\
- Any important exceptions or edge cases\n\
- Examples if helpful\n\
- Use bullet points where applicable and keep it easily readable\n\
Answer:"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_context_and_query() {
        let prompt = build_prompt("RULE G401: samples score 2 points.", "How many points?");

        assert!(prompt.contains("Game Rules:\nRULE G401: samples score 2 points."));
        assert!(prompt.contains("Question: How many points?"));
        assert!(prompt.ends_with("Answer:"));
    }

    #[test]
    fn prompt_keeps_passage_order() {
        let context = "first passage\n\nsecond passage\n\nthird passage";
        let prompt = build_prompt(context, "q");

        let first = prompt.find("first passage").unwrap();
        let second = prompt.find("second passage").unwrap();
        let third = prompt.find("third passage").unwrap();
        assert!(first < second && second < third);
    }

    #[test]
    fn llm_timeout_maps_to_gateway_timeout() {
        let err = ApiError::from(LlmError::Timeout(60));
        assert_eq!(err.status(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[test]
    fn llm_failures_map_to_bad_gateway() {
        let err = ApiError::from(LlmError::Malformed("bad json".to_string()));
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);

        let err = ApiError::from(LlmError::Api {
            status: 500,
            body: "oops".to_string(),
        });
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn retrieval_failures_map_to_bad_gateway() {
        let err = ApiError::from(RetrievalError::EmbeddingApi {
            status: 500,
            body: "oops".to_string(),
        });
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn invalid_input_maps_to_bad_request() {
        let err = ApiError::InvalidInput("empty".to_string());
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
