use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::BankId;
use crate::errors::HindsightError;

/// The four kinds of memory unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactType {
    World,
    Bank,
    Opinion,
    Observation,
}

impl FactType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FactType::World => "world",
            FactType::Bank => "bank",
            FactType::Opinion => "opinion",
            FactType::Observation => "observation",
        }
    }

    /// The default `types` filter for `recall`: observations
    /// are never searched, so they are excluded from the default set.
    pub fn default_search_types() -> Vec<FactType> {
        vec![FactType::World, FactType::Bank, FactType::Opinion]
    }
}

/// An atomic fact node.
///
/// Invariants enforced by `MemoryUnit::new`, never left to callers:
/// non-empty `text`, a normalised `embedding`, `occurred_start <=
/// occurred_end` when both present, `confidence_score` present iff
/// `fact_type == Opinion`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryUnit {
    pub id: String,
    pub bank_id: BankId,
    pub text: String,
    /// 384-dim, L2-normalised.
    pub embedding: Vec<f32>,
    pub occurred_start: Option<DateTime<Utc>>,
    pub occurred_end: Option<DateTime<Utc>>,
    pub mentioned_at: DateTime<Utc>,
    pub context: Option<String>,
    pub fact_type: FactType,
    pub confidence_score: Option<f64>,
    pub access_count: u64,
    /// Tokenised full-text representation used by the keyword strategy.
    pub search_vector: String,
    /// blake3 hash of `text`, used for idempotent re-ingestion.
    pub content_hash: String,
}

pub const EMBEDDING_DIM: usize = 384;

impl MemoryUnit {
    /// Construct a new unit, validating its invariants.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: String,
        bank_id: BankId,
        text: String,
        embedding: Vec<f32>,
        occurred_start: Option<DateTime<Utc>>,
        occurred_end: Option<DateTime<Utc>>,
        mentioned_at: DateTime<Utc>,
        context: Option<String>,
        fact_type: FactType,
        confidence_score: Option<f64>,
    ) -> Result<Self, HindsightError> {
        if text.trim().is_empty() {
            return Err(HindsightError::Invalid("unit text must not be empty".into()));
        }
        if embedding.len() != EMBEDDING_DIM {
            return Err(HindsightError::Invalid(format!(
                "embedding must have {EMBEDDING_DIM} dimensions, got {}",
                embedding.len()
            )));
        }
        if let (Some(start), Some(end)) = (occurred_start, occurred_end) {
            if start > end {
                return Err(HindsightError::Invalid(
                    "occurred_start must be <= occurred_end".into(),
                ));
            }
        }
        match (fact_type, confidence_score) {
            (FactType::Opinion, None) => {
                return Err(HindsightError::Invalid(
                    "confidence_score is required for opinion facts".into(),
                ))
            }
            (FactType::Opinion, Some(c)) if !(0.0..=1.0).contains(&c) => {
                return Err(HindsightError::Invalid(
                    "confidence_score must be in [0,1]".into(),
                ))
            }
            (other, Some(_)) if other != FactType::Opinion => {
                return Err(HindsightError::Invalid(
                    "confidence_score is forbidden for non-opinion facts".into(),
                ))
            }
            _ => {}
        }

        let search_vector = tokenize_for_search(&text);
        let content_hash = blake3::hash(text.as_bytes()).to_hex().to_string();

        Ok(Self {
            id,
            bank_id,
            text,
            embedding,
            occurred_start,
            occurred_end,
            mentioned_at,
            context,
            fact_type,
            confidence_score,
            access_count: 0,
            search_vector,
            content_hash,
        })
    }

    /// Read-only alias of `occurred_start`; there is no separate stored
    /// field, so there is nothing for a writer to desync from.
    pub fn event_date(&self) -> Option<DateTime<Utc>> {
        self.occurred_start
    }

    /// Whether this unit's `[occurred_start, occurred_end)` overlaps
    /// `interval` using half-open overlap semantics:
    /// `a.start < b.end && b.start < a.end`.
    pub fn overlaps(&self, interval_start: DateTime<Utc>, interval_end: DateTime<Utc>) -> bool {
        let (Some(a_start), Some(a_end)) = (self.occurred_start, self.occurred_end) else {
            return false;
        };
        a_start < interval_end && interval_start < a_end
    }
}

/// Lower-case, whitespace-collapsed tokenisation used for the FTS5 index.
/// Kept intentionally simple; BM25 ranking does the heavy lifting.
fn tokenize_for_search(text: &str) -> String {
    text.split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
