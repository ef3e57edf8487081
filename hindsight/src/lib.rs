//! Facade crate: the embeddable `HindsightEngine` surface wiring storage,
//! the in-process graph, embeddings, reranking, the four retrieval
//! strategies, and the ingest pipeline into `recall`/`retain`. A thin
//! top-level wiring layer over independently-testable crates, exposing a
//! plain embeddable Rust API.

pub mod engine;
pub mod wire;

pub use engine::{HindsightEngine, RecallQuery, RetainQuery};
pub use wire::{EntityObservation, OperationStatus, RecallResponse, ResultItem, RetainResponse, TraceInfo};

pub use hindsight_core::config::{BudgetConfig, EmbeddingConfig, ExecutorConfig, GraphConfig, RecallBudget, TemporalConfig};
pub use hindsight_core::errors::HindsightError;
pub use hindsight_core::{BankId, Entity, EntityType, FactType, HindsightConfig, MemoryUnit};
pub use hindsight_embeddings::{CrossEncoderReranker, DeterministicStubEmbeddingClient, EmbeddingClient, LexicalOverlapReranker};
pub use hindsight_ingest::{DisambiguationOracle, LlmExtractor, NoopReinforcer, OpinionReinforcer};
pub use hindsight_executor::ObservationSynthesizer;
pub use hindsight_storage::StorageEngine;
pub use hindsight_tokens::{TiktokenTokenizer, Tokenizer};

/// Initializes a `tracing` subscriber reading `RUST_LOG`, for binaries
/// that want a one-line default. Only available with the `tracing-init`
/// feature; library callers embedding Hindsight into a larger process
/// usually install their own subscriber instead.
#[cfg(feature = "tracing-init")]
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .try_init();
}
