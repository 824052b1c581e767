use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use llm::CompletionClient;
use retrieval::{CohereEmbedder, Retriever, VectorIndex};
use server::{routes, AppState, Config};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;

    let index = VectorIndex::load(&config.index_dir)
        .with_context(|| format!("failed to load index from {}", config.index_dir.display()))?;

    let embedder = CohereEmbedder::new(
        config.cohere_api_key.clone(),
        index.embedding_model().to_string(),
        Some(config.cohere_api_url.clone()),
    )?;
    let retriever = Retriever::new(Arc::new(embedder), Arc::new(index));

    let completion = CompletionClient::new(
        config.completion_api_key.clone(),
        config.completion_model.clone(),
        Some(config.completion_api_url.clone()),
    )?;

    let state = Arc::new(AppState {
        retriever,
        completion,
    });

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    info!("Listening on {}", config.bind_addr);

    axum::serve(listener, routes::router(state)).await?;
    Ok(())
}
