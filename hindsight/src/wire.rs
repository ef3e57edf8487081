//! The language-neutral wire shapes: what `recall`/`retain` return,
//! independent of the internal `MemoryUnit`/`Entity` representation.

use chrono::{DateTime, Utc};
use hindsight_core::{Entity, EntityType, FactType, MemoryUnit};
use serde::{Deserialize, Serialize};

/// One result from `recall`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultItem {
    pub id: String,
    pub text: String,
    pub context: Option<String>,
    /// Read-only alias of `occurred_start`.
    pub event_date: Option<DateTime<Utc>>,
    /// Post-rerank score in [0,1], min-max normalised against the batch.
    pub weight: f64,
    pub fact_type: FactType,
}

impl ResultItem {
    pub fn from_unit(unit: MemoryUnit, weight: f64) -> Self {
        let event_date = unit.event_date();
        Self {
            id: unit.id,
            text: unit.text,
            context: unit.context,
            event_date,
            weight,
            fact_type: unit.fact_type,
        }
    }
}

/// An entity and its current observations, attached when
/// `include_entities` is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityObservation {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    pub observations: Vec<String>,
}

impl EntityObservation {
    pub fn from_entity(entity: Entity, observations: Vec<MemoryUnit>) -> Self {
        Self {
            id: entity.id,
            name: entity.canonical_name,
            entity_type: entity.entity_type,
            observations: observations.into_iter().map(|u| u.text).collect(),
        }
    }
}

/// Optional diagnostic detail returned when `trace=true`.
/// Out of scope to specify in full (the CLI/control-plane UI owns
/// presentation); this is the minimal shape the core can honestly fill in.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TraceInfo {
    pub strategy_result_counts: std::collections::BTreeMap<String, usize>,
    pub fused_before_rerank: usize,
    pub elapsed_ms: u64,
}

/// `recall`'s full response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecallResponse {
    pub results: Vec<ResultItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entities: Option<Vec<EntityObservation>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<TraceInfo>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub warnings: Vec<String>,
}

/// `retain`'s response. `operation_id` is set only when the caller
/// asked for `async=true`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetainResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    pub unit_ids: Vec<String>,
}

/// Status of an asynchronous `retain` call, queryable via
/// `operation_status(operation_id)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OperationStatus {
    Pending,
    Running,
    Completed { unit_ids: Vec<String> },
    Failed { error: String },
}
