use thiserror::Error;

/// Errors from the in-memory typed multigraph.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("concurrency error: {0}")]
    Concurrency(String),

    #[error("node not found: {0}")]
    NodeNotFound(String),

    #[error("invalid edge {src} -> {dst}: {reason}")]
    InvalidEdge {
        src: String,
        dst: String,
        reason: String,
    },
}
