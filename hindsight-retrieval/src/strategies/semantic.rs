//! Semantic strategy: `vector_knn` ranked by cosine
//! similarity, `k = 4 * budget`.

use hindsight_core::errors::StorageError;
use hindsight_core::{BankId, FactType};
use hindsight_storage::StorageEngine;

/// `query_embedding` is computed once by the orchestrator and shared with
/// the graph strategy's seed phase.
pub fn run(
    storage: &StorageEngine,
    bank_id: &BankId,
    fact_types: &[FactType],
    query_embedding: &[f32],
    budget: usize,
) -> Result<Vec<String>, StorageError> {
    let k = budget.saturating_mul(4).max(1);
    let hits = storage.vector_knn(bank_id, fact_types, query_embedding, k, 0.3)?;
    Ok(hits.into_iter().map(|(unit, _)| unit.id).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hindsight_core::{MemoryUnit, EMBEDDING_DIM};

    fn unit(id: &str, embedding: Vec<f32>) -> MemoryUnit {
        MemoryUnit::new(
            id.into(),
            BankId::new("b1"),
            format!("fact {id}"),
            embedding,
            None,
            None,
            chrono::Utc::now(),
            None,
            FactType::World,
            None,
        )
        .unwrap()
    }

    #[test]
    fn returns_ids_ranked_by_similarity() {
        let storage = StorageEngine::open_in_memory().unwrap();
        let mut near = vec![0.0; EMBEDDING_DIM];
        near[0] = 1.0;
        let mut far = vec![0.0; EMBEDDING_DIM];
        far[1] = 1.0;
        storage.insert_unit(&unit("near", near.clone())).unwrap();
        storage.insert_unit(&unit("far", far)).unwrap();

        let ids = run(&storage, &BankId::new("b1"), &FactType::default_search_types(), &near, 10).unwrap();
        assert_eq!(ids[0], "near");
    }
}
