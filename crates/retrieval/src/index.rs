//! Persisted vector index.
//!
//! The index is a JSON document (`index.json` inside the index directory)
//! holding passage texts alongside their precomputed embeddings. It is loaded
//! once at startup and searched with brute-force cosine similarity, which is
//! plenty for rulebook-sized corpora.

use std::collections::BinaryHeap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::error::{Result, RetrievalError};

/// File name expected inside the index directory.
pub const INDEX_FILE: &str = "index.json";

/// A rule passage stored in the index.
#[derive(Debug, Clone)]
pub struct Passage {
    pub id: String,
    pub text: String,
}

/// A passage ranked by similarity to a query.
#[derive(Debug, Clone)]
pub struct ScoredPassage {
    pub passage: Passage,
    /// Cosine similarity, in [-1, 1], higher is more similar.
    pub score: f32,
}

impl PartialOrd for ScoredPassage {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScoredPassage {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.score.total_cmp(&other.score)
    }
}

impl PartialEq for ScoredPassage {
    fn eq(&self, other: &Self) -> bool {
        self.score.total_cmp(&other.score).is_eq()
    }
}

impl Eq for ScoredPassage {}

#[derive(Debug, Deserialize)]
struct IndexFile {
    embedding_model: String,
    passages: Vec<PassageRecord>,
}

#[derive(Debug, Deserialize)]
struct PassageRecord {
    id: String,
    text: String,
    embedding: Vec<f32>,
}

/// Read-only vector index shared across requests.
#[derive(Debug)]
pub struct VectorIndex {
    embedding_model: String,
    records: Vec<PassageRecord>,
    dim: usize,
}

impl VectorIndex {
    /// Load the index from `dir/index.json`.
    ///
    /// Fails if the file is missing, is not valid JSON, or holds embeddings
    /// of mixed dimensions.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(INDEX_FILE);
        let raw = fs::read_to_string(&path)?;
        let file: IndexFile = serde_json::from_str(&raw)
            .map_err(|e| RetrievalError::Corrupted(format!("{}: {}", path.display(), e)))?;

        let dim = file.passages.first().map_or(0, |p| p.embedding.len());
        for record in &file.passages {
            if record.embedding.len() != dim {
                return Err(RetrievalError::Corrupted(format!(
                    "passage {} has embedding dimension {}, expected {}",
                    record.id,
                    record.embedding.len(),
                    dim
                )));
            }
        }

        info!(
            "Loaded {} passages ({}d, model {}) from {}",
            file.passages.len(),
            dim,
            file.embedding_model,
            path.display()
        );

        Ok(Self {
            embedding_model: file.embedding_model,
            records: file.passages,
            dim,
        })
    }

    /// Embedding model the index was built with. Queries must be embedded
    /// with the same model.
    pub fn embedding_model(&self) -> &str {
        &self.embedding_model
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Top-k passages by cosine similarity, most similar first.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<ScoredPassage>> {
        if !self.records.is_empty() && query.len() != self.dim {
            return Err(RetrievalError::DimensionMismatch {
                index_dim: self.dim,
                query_dim: query.len(),
            });
        }

        let mut heap = BinaryHeap::with_capacity(self.records.len());
        for record in &self.records {
            heap.push(ScoredPassage {
                passage: Passage {
                    id: record.id.clone(),
                    text: record.text.clone(),
                },
                score: cosine_similarity(query, &record.embedding),
            });
        }

        Ok(heap
            .into_sorted_vec()
            .into_iter()
            .rev()
            .take(k)
            .collect())
    }
}

/// Cosine similarity between two vectors of equal length.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "vectors must have same length");

    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}
