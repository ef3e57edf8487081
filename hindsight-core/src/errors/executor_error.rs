use thiserror::Error;

/// Errors from the bounded async worker pool.
#[derive(Debug, Error)]
pub enum ExecutorError {
    #[error("task queue disconnected")]
    QueueDisconnected,

    #[error("worker pool is shutting down")]
    ShuttingDown,

    #[error("task panicked: {0}")]
    TaskPanicked(String),
}
