//! Entity resolution: normalized-name/alias
//! lookup first, then Levenshtein-ratio same-type fuzzy matching, then
//! an LLM disambiguation hook when more than one candidate survives.

use async_trait::async_trait;
use hindsight_core::errors::{HindsightError, IngestError};
use hindsight_core::{BankId, Entity, EntityType};
use hindsight_storage::StorageEngine;

/// Minimum normalised-Levenshtein similarity for a same-type fuzzy match.
pub const SIMILARITY_THRESHOLD: f64 = 0.85;

/// Asked once per ambiguity, using the fact text as context. Production implementation is out of scope.
/// Object-safe so `resolve` takes `&dyn DisambiguationOracle` rather than
/// a generic parameter.
#[async_trait]
pub trait DisambiguationOracle: Send + Sync {
    /// Index into `candidates` the mention refers to, or `None` if none
    /// of them match (a new entity is created instead).
    async fn disambiguate(
        &self,
        mention: &str,
        fact_text: &str,
        candidates: &[Entity],
    ) -> Result<Option<usize>, IngestError>;
}

/// Resolve `mention` within `bank_id` to an existing entity, creating one
/// if nothing passes the similarity threshold.
pub async fn resolve(
    storage: &StorageEngine,
    oracle: &dyn DisambiguationOracle,
    bank_id: &BankId,
    mention: &str,
    entity_type: EntityType,
    fact_text: &str,
) -> Result<Entity, HindsightError> {
    if let Some(entity) = storage.find_entity_by_name(bank_id, mention)? {
        if entity.entity_type == entity_type {
            return Ok(entity);
        }
    }

    let folded_mention = mention.to_lowercase();
    let candidates: Vec<Entity> = storage
        .entity_candidates_by_type(bank_id, entity_type)?
        .into_iter()
        .filter(|e| strsim::normalized_levenshtein(&e.folded_name(), &folded_mention) >= SIMILARITY_THRESHOLD)
        .collect();

    match candidates.len() {
        0 => create_entity(storage, bank_id, mention, entity_type),
        1 => Ok(candidates.into_iter().next().expect("len checked")),
        _ => match oracle.disambiguate(mention, fact_text, &candidates).await? {
            Some(idx) if idx < candidates.len() => Ok(candidates[idx].clone()),
            Some(idx) => Err(IngestError::DisambiguationFailed(format!(
                "oracle returned out-of-range candidate index {idx} for {} candidates",
                candidates.len()
            ))
            .into()),
            None => create_entity(storage, bank_id, mention, entity_type),
        },
    }
}

fn create_entity(
    storage: &StorageEngine,
    bank_id: &BankId,
    canonical_name: &str,
    entity_type: EntityType,
) -> Result<Entity, HindsightError> {
    let entity = Entity::new(uuid::Uuid::new_v4().to_string(), bank_id.clone(), canonical_name.to_string(), entity_type);
    storage.insert_entity(&entity)?;
    Ok(entity)
}
