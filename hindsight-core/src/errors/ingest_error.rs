use thiserror::Error;

/// Errors from the extraction/entity-resolution/edge-construction pipeline.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("llm extraction returned malformed output: {0}")]
    MalformedExtraction(String),

    #[error("causal hint references out-of-range fact index {index} (batch size {batch_size})")]
    CausalHintOutOfRange { index: usize, batch_size: usize },

    #[error("entity disambiguation failed: {0}")]
    DisambiguationFailed(String),
}
