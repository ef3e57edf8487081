use thiserror::Error;

/// Errors from the embedding client and the cross-encoder reranker.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("model load failed: {0}")]
    ModelLoad(String),

    #[error("inference failed: {0}")]
    Inference(String),

    #[error("batch timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("empty text cannot be embedded")]
    EmptyInput,
}
