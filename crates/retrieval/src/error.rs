use thiserror::Error;

/// Result type alias for retrieval operations.
pub type Result<T> = std::result::Result<T, RetrievalError>;

/// Errors from loading or querying the vector index.
#[derive(Error, Debug)]
pub enum RetrievalError {
    #[error("failed to read index: {0}")]
    Io(#[from] std::io::Error),

    #[error("index corrupted: {0}")]
    Corrupted(String),

    #[error("dimension mismatch: index has {index_dim}, query has {query_dim}")]
    DimensionMismatch { index_dim: usize, query_dim: usize },

    #[error("embedding API key cannot be empty")]
    EmptyApiKey,

    #[error("embedding API error {status}: {body}")]
    EmbeddingApi { status: u16, body: String },

    #[error("embedding request failed: {0}")]
    EmbeddingRequest(#[from] reqwest::Error),

    #[error("malformed embedding response: {0}")]
    EmbeddingMalformed(String),
}
