//! `retain()`: extract, embed, persist, resolve entities,
//! build edges, and enqueue observation regeneration — deduplicated per
//! call, coalesced across calls via `hindsight-executor`.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use hindsight_core::errors::HindsightError;
use hindsight_core::{BankId, MemoryUnit};
use hindsight_embeddings::EmbeddingClient;
use hindsight_executor::{CoalescingQueue, Task, WorkerPool};
use hindsight_graph::GraphManager;
use hindsight_storage::StorageEngine;

use crate::entities::{self, DisambiguationOracle};
use crate::extraction::LlmExtractor;
use crate::edges;

/// Contract-only hook: retain may update
/// `confidence_score` and `text` of existing opinions mentioning the
/// newly affected entities. Never part of the retrieval core; failures
/// are logged and never block fact insertion.
#[allow(async_fn_in_trait)]
pub trait OpinionReinforcer: Send + Sync {
    async fn reinforce(&self, bank_id: &BankId, entity_ids: &[String]) -> Result<(), HindsightError>;
}

/// Default no-op reinforcer for callers that do not wire one in.
pub struct NoopReinforcer;

impl OpinionReinforcer for NoopReinforcer {
    async fn reinforce(&self, _bank_id: &BankId, _entity_ids: &[String]) -> Result<(), HindsightError> {
        Ok(())
    }
}

pub struct RetainRequest<'a> {
    pub bank_id: &'a BankId,
    pub content: &'a str,
    pub context: Option<&'a str>,
    pub document_id: Option<&'a str>,
    pub timestamp: Option<DateTime<Utc>>,
}

pub struct RetainOutcome {
    pub unit_ids: Vec<String>,
}

pub struct IngestPipeline<Ex, Or, Re> {
    storage: Arc<StorageEngine>,
    graph: GraphManager,
    embeddings: Arc<dyn EmbeddingClient>,
    executor: Arc<WorkerPool>,
    coalescing: Arc<CoalescingQueue>,
    extractor: Ex,
    oracle: Or,
    reinforcer: Re,
}

impl<Ex, Or, Re> IngestPipeline<Ex, Or, Re>
where
    Ex: LlmExtractor,
    Or: DisambiguationOracle,
    Re: OpinionReinforcer,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        storage: Arc<StorageEngine>,
        graph: GraphManager,
        embeddings: Arc<dyn EmbeddingClient>,
        executor: Arc<WorkerPool>,
        coalescing: Arc<CoalescingQueue>,
        extractor: Ex,
        oracle: Or,
        reinforcer: Re,
    ) -> Self {
        Self { storage, graph, embeddings, executor, coalescing, extractor, oracle, reinforcer }
    }

    pub async fn retain(&self, req: RetainRequest<'_>) -> Result<RetainOutcome, HindsightError> {
        if req.content.trim().is_empty() {
            return Err(HindsightError::Invalid("content must not be empty".into()));
        }

        let batch = self.extractor.extract(req.content, req.context).await?;
        batch.validate()?;
        if batch.facts.is_empty() {
            return Ok(RetainOutcome { unit_ids: Vec::new() });
        }

        let texts: Vec<String> = batch.facts.iter().map(|f| f.text.clone()).collect();
        let embeddings = self
            .embeddings
            .embed(&texts)
            .await
            .map_err(|e| HindsightError::EmbedUnavailable(e.to_string()))?;
        let mentioned_at = req.timestamp.unwrap_or_else(Utc::now);

        let mut units = Vec::with_capacity(batch.facts.len());
        for (fact, embedding) in batch.facts.iter().zip(embeddings) {
            let unit = MemoryUnit::new(
                uuid::Uuid::new_v4().to_string(),
                req.bank_id.clone(),
                fact.text.clone(),
                embedding.to_vec(),
                fact.occurred_start,
                fact.occurred_end,
                mentioned_at,
                req.context.map(|c| c.to_string()),
                fact.fact_type,
                fact.confidence_score,
            )?;
            units.push(unit);
        }

        if let Some(document_id) = req.document_id {
            self.storage.upsert_document(document_id, req.bank_id, None, &units)?;
        } else {
            for unit in &units {
                self.storage.insert_unit(unit)?;
            }
        }

        let mut entities_of_unit: HashMap<String, Vec<String>> = HashMap::new();
        for (fact, unit) in batch.facts.iter().zip(&units) {
            for mention in &fact.entity_mentions {
                let entity = entities::resolve(
                    &self.storage,
                    &self.oracle,
                    req.bank_id,
                    &mention.name,
                    mention.entity_type,
                    &fact.text,
                )
                .await?;
                self.storage.link_unit_to_entity(&unit.id, &entity.id)?;
                entities_of_unit.entry(unit.id.clone()).or_default().push(entity.id.clone());
            }
        }

        edges::build_entity_edges(&self.storage, &self.graph, &units, &entities_of_unit)?;
        for unit in &units {
            edges::build_semantic_edges(&self.storage, &self.graph, req.bank_id, unit)?;
            edges::build_temporal_edges(&self.storage, &self.graph, req.bank_id, unit)?;
        }
        let unit_ids_by_index: Vec<String> = units.iter().map(|u| u.id.clone()).collect();
        edges::build_causal_edges(&self.storage, &self.graph, &unit_ids_by_index, &batch.causal_hints)?;

        let mut distinct_entities: Vec<String> = entities_of_unit.values().flatten().cloned().collect();
        distinct_entities.sort();
        distinct_entities.dedup();

        for entity_id in &distinct_entities {
            if self.coalescing.mark_requested(req.bank_id, entity_id) {
                let task = Task::ObservationRegenerate { bank_id: req.bank_id.clone(), entity_id: entity_id.clone() };
                if let Err(e) = self.executor.submit(task).await {
                    tracing::warn!(%entity_id, error = %e, "failed to enqueue observation regeneration");
                }
            }
        }

        if let Err(e) = self.reinforcer.reinforce(req.bank_id, &distinct_entities).await {
            tracing::warn!(error = %e, "opinion reinforcement failed; fact insertion already committed");
        }

        Ok(RetainOutcome { unit_ids: unit_ids_by_index })
    }
}
