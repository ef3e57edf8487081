//! The typed extraction contract. LLM output is
//! validated into this closed sum of variants at the boundary; nothing
//! downstream ever handles a raw JSON blob.

use chrono::{DateTime, Utc};

use hindsight_core::errors::IngestError;
use hindsight_core::{CausalKind, EntityType, FactType};

/// A mention of an entity within one extracted fact's text.
#[derive(Debug, Clone)]
pub struct EntityMention {
    pub name: String,
    pub entity_type: EntityType,
}

/// One fact as extracted from ingested content, before embedding or
/// persistence.
#[derive(Debug, Clone)]
pub struct ExtractedFact {
    pub text: String,
    pub fact_type: FactType,
    pub confidence_score: Option<f64>,
    pub occurred_start: Option<DateTime<Utc>>,
    pub occurred_end: Option<DateTime<Utc>>,
    pub entity_mentions: Vec<EntityMention>,
}

/// An in-batch causal hint between two facts in the same extraction call,
/// indexed positionally into `ExtractionBatch::facts`.
#[derive(Debug, Clone, Copy)]
pub struct CausalHint {
    pub src_index: usize,
    pub dst_index: usize,
    pub kind: CausalKind,
}

/// One `LlmExtractor::extract` call's full output.
#[derive(Debug, Clone, Default)]
pub struct ExtractionBatch {
    pub facts: Vec<ExtractedFact>,
    pub causal_hints: Vec<CausalHint>,
}

impl ExtractionBatch {
    /// Every causal hint must index into `facts`.
    pub fn validate(&self) -> Result<(), IngestError> {
        let batch_size = self.facts.len();
        for hint in &self.causal_hints {
            if hint.src_index >= batch_size || hint.dst_index >= batch_size {
                return Err(IngestError::CausalHintOutOfRange {
                    index: hint.src_index.max(hint.dst_index),
                    batch_size,
                });
            }
        }
        Ok(())
    }
}

/// Production implementation (the extraction prompt itself) is out of
/// scope; this trait is the boundary it must honour.
#[allow(async_fn_in_trait)]
pub trait LlmExtractor: Send + Sync {
    async fn extract(&self, content: &str, context: Option<&str>) -> Result<ExtractionBatch, IngestError>;
}
