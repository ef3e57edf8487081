//! Four parallel retrieval strategies, RRF fusion, cross-encoder
//! reranking, and token-budget filtering.

pub mod budget;
pub mod orchestrator;
pub mod rerank;
pub mod rrf;
pub mod strategies;

pub use orchestrator::{recall, RecallOutcome, RecallRequest};
