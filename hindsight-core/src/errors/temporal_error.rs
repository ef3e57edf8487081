use thiserror::Error;

/// Errors from the time-expression parser.
#[derive(Debug, Error)]
pub enum TemporalError {
    #[error("unparseable time expression: {0}")]
    Unparseable(String),

    #[error("invalid interval: start {start} is after end {end}")]
    InvalidInterval { start: String, end: String },
}
