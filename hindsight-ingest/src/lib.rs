//! Fact extraction, entity resolution, and edge construction behind
//! `retain()`.

pub mod edges;
pub mod entities;
pub mod extraction;
pub mod pipeline;

pub use entities::{resolve, DisambiguationOracle};
pub use extraction::{CausalHint, EntityMention, ExtractedFact, ExtractionBatch, LlmExtractor};
pub use pipeline::{IngestPipeline, NoopReinforcer, OpinionReinforcer, RetainOutcome, RetainRequest};
