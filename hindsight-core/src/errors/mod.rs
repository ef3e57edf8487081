//! Error taxonomy for the Hindsight retrieval core.

pub mod embedding_error;
pub mod executor_error;
pub mod graph_error;
pub mod hindsight_error;
pub mod ingest_error;
pub mod storage_error;
pub mod temporal_error;

pub use embedding_error::EmbeddingError;
pub use executor_error::ExecutorError;
pub use graph_error::GraphError;
pub use hindsight_error::{HindsightError, HindsightResult};
pub use ingest_error::IngestError;
pub use storage_error::StorageError;
pub use temporal_error::TemporalError;
