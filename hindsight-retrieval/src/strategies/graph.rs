//! Graph strategy: seed from semantic similarity, then
//! spread activation through the typed multigraph.

use hindsight_core::errors::StorageError;
use hindsight_core::{BankId, FactType};
use hindsight_core::config::GraphConfig;
use hindsight_graph::{activation, GraphManager};
use hindsight_storage::StorageEngine;

/// `budget` is the visited-node cap B; seed count is `min(20, B / 5)`.
pub fn run(
    storage: &StorageEngine,
    graph: &GraphManager,
    bank_id: &BankId,
    fact_types: &[FactType],
    query_embedding: &[f32],
    budget: usize,
    config: &GraphConfig,
) -> Result<Vec<String>, StorageError> {
    let seed_count = (budget / 5).min(20).max(1);
    let seed_hits = storage.vector_knn(
        bank_id,
        fact_types,
        query_embedding,
        seed_count,
        config.seed_min_similarity as f32,
    )?;
    let seeds: Vec<(String, f64)> = seed_hits.into_iter().map(|(u, s)| (u.id, s as f64)).collect();

    let params = activation::ActivationParams {
        max_hops: config.max_hops,
        decay: config.decay,
        budget,
        min_activation: config.min_activation,
    };
    let activated = activation::spread(graph, &seeds, params, |_| true);
    Ok(activated.into_iter().map(|n| n.id).collect())
}
