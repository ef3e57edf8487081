//! `recall()`: run the four strategies under a shared
//! deadline, RRF-fuse, truncate to `4·budget`, rerank, budget-filter, and
//! optionally attach entity observations. Each strategy awaits
//! concurrently via `tokio::join!` and a failed strategy degrades to an
//! empty contribution plus a warning rather than failing the whole call.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};

use hindsight_core::config::{BudgetConfig, GraphConfig, RecallBudget};
use hindsight_core::errors::HindsightError;
use hindsight_core::{BankId, Entity, FactType, MemoryUnit};
use hindsight_embeddings::{CrossEncoderReranker, EmbeddingClient};
use hindsight_graph::GraphManager;
use hindsight_storage::StorageEngine;
use hindsight_tokens::Tokenizer;

use crate::strategies::{graph as graph_strategy, keyword, semantic, temporal};
use crate::{budget, rerank, rrf};

const RERANK_BATCH_DEADLINE: Duration = Duration::from_millis(800);

/// One `recall()` call's parameters.
pub struct RecallRequest<'a> {
    pub bank_id: &'a BankId,
    pub query: &'a str,
    pub fact_types: &'a [FactType],
    pub budget: RecallBudget,
    pub max_tokens: usize,
    pub include_entities: bool,
    pub max_entity_tokens: usize,
    pub now: DateTime<Utc>,
    /// Wall-clock budget for the strategy phase.
    pub deadline: Duration,
}

/// Result of one `recall()` call, pre-conversion to the public wire shape.
pub struct RecallOutcome {
    /// Final units in rank order, paired with their weight (post-rerank
    /// score, or RRF score if reranking was unavailable).
    pub units: Vec<(MemoryUnit, f64)>,
    /// Entities mentioned by the final units, each with its current
    /// observation units; empty unless
    /// `include_entities` was set.
    pub entities: Vec<(Entity, Vec<MemoryUnit>)>,
    pub warnings: Vec<String>,
}

#[allow(clippy::too_many_arguments)]
pub async fn recall(
    storage: &StorageEngine,
    graph: &GraphManager,
    embeddings: &dyn EmbeddingClient,
    reranker: &dyn CrossEncoderReranker,
    tokenizer: &dyn Tokenizer,
    graph_config: &GraphConfig,
    budget_config: &BudgetConfig,
    req: RecallRequest<'_>,
) -> Result<RecallOutcome, HindsightError> {
    if req.query.trim().is_empty() {
        return Err(HindsightError::Invalid("query must not be empty".into()));
    }
    if req.max_tokens == 0 {
        return Err(HindsightError::Invalid("max_tokens must be greater than zero".into()));
    }

    let visited_nodes = budget_config.visited_nodes(req.budget);
    let start = Instant::now();

    // Seed phase: the store/embedding client must be reachable before any
    // strategy can run at all.
    let query_embedding = embeddings
        .embed_one(req.query)
        .await
        .map_err(|e| HindsightError::CoreUnavailable(e.to_string()))?;
    let query_embedding = query_embedding.to_vec();

    let mut warnings = Vec::new();

    let semantic_fut = async { semantic::run(storage, req.bank_id, req.fact_types, &query_embedding, visited_nodes) };
    let keyword_fut = async { keyword::run(storage, req.bank_id, req.fact_types, req.query, visited_nodes) };
    let graph_fut = async {
        graph_strategy::run(storage, graph, req.bank_id, req.fact_types, &query_embedding, visited_nodes, graph_config)
    };
    let temporal_fut = async {
        temporal::run(storage, graph, req.bank_id, req.fact_types, req.query, req.now, visited_nodes, graph_config)
    };
    let (semantic_result, keyword_result, graph_result, temporal_result) =
        tokio::join!(semantic_fut, keyword_fut, graph_fut, temporal_fut);

    let semantic_ids = semantic_result.unwrap_or_else(|e| {
        warnings.push(format!("semantic strategy failed: {e}"));
        Vec::new()
    });
    let keyword_ids = keyword_result.unwrap_or_else(|e| {
        warnings.push(format!("keyword strategy failed: {e}"));
        Vec::new()
    });
    let graph_ids = graph_result.unwrap_or_else(|e| {
        warnings.push(format!("graph strategy failed: {e}"));
        Vec::new()
    });
    let temporal_ids = match temporal_result {
        Ok(Some(ids)) => Some(ids),
        Ok(None) => None,
        Err(e) => {
            warnings.push(format!("temporal strategy failed: {e}"));
            Some(Vec::new())
        }
    };

    if start.elapsed() > req.deadline && semantic_ids.is_empty() && keyword_ids.is_empty() {
        return Err(HindsightError::DeadlineExceeded);
    }

    let mut lists = vec![semantic_ids, keyword_ids, graph_ids];
    if let Some(ids) = temporal_ids {
        lists.push(ids);
    }
    let fused = rrf::fuse(&lists, budget_config.rrf_k);

    let truncate_to = visited_nodes.saturating_mul(4);
    let truncated_ids: Vec<String> = fused.iter().take(truncate_to).map(|(id, _)| id.clone()).collect();
    let fused_scores: std::collections::HashMap<String, f64> = fused.into_iter().collect();

    let hydrated = storage.get_many(&truncated_ids)?;
    let rrf_ranked: Vec<(MemoryUnit, f64)> = hydrated
        .into_iter()
        .map(|unit| {
            let score = *fused_scores.get(&unit.id).unwrap_or(&0.0);
            (unit, score)
        })
        .collect();

    let rerank_outcome = rerank::rerank(reranker, req.query, rrf_ranked, RERANK_BATCH_DEADLINE).await;
    if rerank_outcome.unavailable {
        warnings.push("rerank_unavailable".to_string());
    }

    let weighted = normalize_weights(rerank_outcome.ranked);
    let final_units = budget::filter_to_budget(weighted, req.max_tokens, tokenizer, |(unit, _): &(MemoryUnit, f64)| {
        unit.text.as_str()
    });

    let entities = if req.include_entities {
        collect_entity_observations(storage, &final_units, req.max_entity_tokens, tokenizer)?
    } else {
        Vec::new()
    };

    Ok(RecallOutcome { units: final_units, entities, warnings })
}

/// `weight` is the post-rerank score in [0,1] via min-max normalisation
/// against the returned batch. A single-item or zero-spread
/// batch normalises to 1.0.
fn normalize_weights(ranked: Vec<(MemoryUnit, f64)>) -> Vec<(MemoryUnit, f64)> {
    if ranked.is_empty() {
        return ranked;
    }
    let min = ranked.iter().map(|(_, s)| *s).fold(f64::INFINITY, f64::min);
    let max = ranked.iter().map(|(_, s)| *s).fold(f64::NEG_INFINITY, f64::max);
    let spread = max - min;
    ranked
        .into_iter()
        .map(|(unit, score)| {
            let weight = if spread > 0.0 { (score - min) / spread } else { 1.0 };
            (unit, weight)
        })
        .collect()
}

fn collect_entity_observations(
    storage: &StorageEngine,
    units: &[(MemoryUnit, f64)],
    max_entity_tokens: usize,
    tokenizer: &dyn Tokenizer,
) -> Result<Vec<(Entity, Vec<MemoryUnit>)>, HindsightError> {
    let mut entity_ids = std::collections::HashSet::new();
    for (unit, _) in units {
        for id in storage.entities_for_unit(&unit.id)? {
            entity_ids.insert(id);
        }
    }

    let mut out = Vec::new();
    for entity_id in entity_ids {
        let Some(entity) = storage.get_entity(&entity_id)? else { continue };
        let mentioning_ids = storage.units_mentioning(&entity_id)?;
        let mentioning_units = storage.get_many(&mentioning_ids)?;
        let observations: Vec<MemoryUnit> =
            mentioning_units.into_iter().filter(|u| u.fact_type == FactType::Observation).collect();
        let observations =
            budget::filter_to_budget(observations, max_entity_tokens, tokenizer, |u: &MemoryUnit| u.text.as_str());
        out.push((entity, observations));
    }
    Ok(out)
}
