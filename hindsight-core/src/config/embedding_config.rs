//! Embedding client and cross-encoder reranker configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Output dimensionality; fixed at 384.
    pub dimensions: usize,
    pub model_path: Option<String>,
    pub embed_timeout_ms: u64,
    pub rerank_timeout_ms: u64,
    /// Max (query, candidate) pairs per cross-encoder batch.
    pub rerank_batch_size: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            dimensions: 384,
            model_path: None,
            embed_timeout_ms: 2_000,
            rerank_timeout_ms: 800,
            rerank_batch_size: 50,
        }
    }
}
