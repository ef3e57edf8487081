//! Top-level error enum. Every sub-crate error composes into this one via
//! `#[from]`.

use thiserror::Error;

use super::{EmbeddingError, ExecutorError, GraphError, IngestError, StorageError, TemporalError};

/// The error taxonomy a caller of `recall`/`retain` observes. Variant names
/// are internal; callers should match on kind, not format the Display impl
/// for programmatic decisions.
#[derive(Debug, Error)]
pub enum HindsightError {
    /// Bank or document absent.
    #[error("not found: {0}")]
    NotFound(String),

    /// Malformed input: empty query, unknown fact_type, max_tokens=0, etc.
    #[error("invalid input: {0}")]
    Invalid(String),

    /// Embedding model unavailable after retry.
    #[error("embedding unavailable: {0}")]
    EmbedUnavailable(String),

    /// LLM unavailable after retry (extraction, disambiguation, observation
    /// synthesis).
    #[error("llm unavailable: {0}")]
    LlmUnavailable(String),

    /// Fact or graph store unavailable.
    #[error("core store unavailable: {0}")]
    CoreUnavailable(String),

    /// Full recall budget consumed before any usable result existed.
    #[error("deadline exceeded before a usable result was available")]
    DeadlineExceeded,

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Temporal(#[from] TemporalError),

    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Executor(#[from] ExecutorError),

    #[error("concurrency error: {0}")]
    Concurrency(String),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(String),
}

pub type HindsightResult<T> = Result<T, HindsightError>;
