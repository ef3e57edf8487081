//! Observation-synthesis worker: collects an entity's
//! linked non-observation units, asks an (out-of-scope) LLM for 3-5
//! concise objective statements, and replaces its prior observation
//! units with the new ones.

use std::sync::Arc;

use hindsight_core::errors::HindsightError;
use hindsight_core::{BankId, Entity, FactType, MemoryUnit, EMBEDDING_DIM};
use hindsight_embeddings::EmbeddingClient;
use hindsight_storage::StorageEngine;

/// Contract for the LLM call itself. Personality/"reflect" reasoning is never consulted.
#[allow(async_fn_in_trait)]
pub trait ObservationSynthesizer: Send + Sync {
    /// Returns 3-5 concise, objective statements about `entity` given its
    /// linked source units. An empty result is valid (nothing new to say)
    /// and simply clears prior observations.
    async fn synthesize(&self, entity: &Entity, source_units: &[MemoryUnit]) -> Result<Vec<String>, HindsightError>;
}

pub struct ObservationWorker<S: ObservationSynthesizer> {
    storage: Arc<StorageEngine>,
    embeddings: Arc<dyn EmbeddingClient>,
    synthesizer: S,
}

impl<S: ObservationSynthesizer> ObservationWorker<S> {
    pub fn new(storage: Arc<StorageEngine>, embeddings: Arc<dyn EmbeddingClient>, synthesizer: S) -> Self {
        Self { storage, embeddings, synthesizer }
    }

    /// One pass of `ObservationRegenerate(entity_id)`. A no-op if the entity no longer exists.
    pub async fn run(&self, bank_id: &BankId, entity_id: &str) -> Result<(), HindsightError> {
        let Some(entity) = self.storage.get_entity(entity_id)? else {
            return Ok(());
        };

        let mentioning_ids = self.storage.units_mentioning(entity_id)?;
        let mentioning_units = self.storage.get_many(&mentioning_ids)?;
        let (prior_observations, source_units): (Vec<MemoryUnit>, Vec<MemoryUnit>) =
            mentioning_units.into_iter().partition(|u| u.fact_type == FactType::Observation);

        let statements = self.synthesizer.synthesize(&entity, &source_units).await?;

        for obs in &prior_observations {
            self.storage.delete_unit(&obs.id)?;
        }

        if statements.is_empty() {
            return Ok(());
        }

        let embeddings = self
            .embeddings
            .embed(&statements)
            .await
            .map_err(|e| HindsightError::EmbedUnavailable(e.to_string()))?;

        for (statement, embedding) in statements.into_iter().zip(embeddings) {
            debug_assert_eq!(embedding.len(), EMBEDDING_DIM);
            let unit = MemoryUnit::new(
                uuid::Uuid::new_v4().to_string(),
                bank_id.clone(),
                statement,
                embedding.to_vec(),
                None,
                None,
                chrono::Utc::now(),
                None,
                FactType::Observation,
                None,
            )?;
            self.storage.insert_unit(&unit)?;
            self.storage.link_unit_to_entity(&unit.id, entity_id)?;
        }

        Ok(())
    }
}
