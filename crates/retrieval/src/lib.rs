//! Similarity retrieval over a persisted vector index.
//!
//! ```text
//! Query -> Embedder -> VectorIndex::search -> ScoredPassages
//! ```
//!
//! The index is built offline and loaded once at startup; this crate only
//! reads it. Query embeddings come from the same external model the index
//! was built with.

use std::sync::Arc;

pub mod embed;
pub mod error;
pub mod index;

pub use embed::{CohereEmbedder, Embedder};
pub use error::{Result, RetrievalError};
pub use index::{Passage, ScoredPassage, VectorIndex};

/// Combines an embedder and a loaded index into a single retrieval call.
#[derive(Clone)]
pub struct Retriever {
    embedder: Arc<dyn Embedder>,
    index: Arc<VectorIndex>,
}

impl Retriever {
    pub fn new(embedder: Arc<dyn Embedder>, index: Arc<VectorIndex>) -> Self {
        Self { embedder, index }
    }

    /// Embed the query and return the top-k passages, most similar first.
    pub async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<ScoredPassage>> {
        let embedding = self.embedder.embed_query(query).await?;
        self.index.search(&embedding, k)
    }

    pub fn index(&self) -> &VectorIndex {
        &self.index
    }
}
