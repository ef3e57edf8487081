//! Keyword strategy: FTS5 `keyword_search` ranked by
//! BM25 score, `k = 4 * budget`.

use hindsight_core::errors::StorageError;
use hindsight_core::{BankId, FactType};
use hindsight_storage::StorageEngine;

pub fn run(
    storage: &StorageEngine,
    bank_id: &BankId,
    fact_types: &[FactType],
    query: &str,
    budget: usize,
) -> Result<Vec<String>, StorageError> {
    let k = budget.saturating_mul(4).max(1);
    let hits = storage.keyword_search(bank_id, fact_types, query, k)?;
    Ok(hits.into_iter().map(|(unit, _)| unit.id).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hindsight_core::{MemoryUnit, EMBEDDING_DIM};

    fn unit(id: &str, text: &str) -> MemoryUnit {
        MemoryUnit::new(
            id.into(),
            BankId::new("b1"),
            text.into(),
            vec![0.1; EMBEDDING_DIM],
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
    fn returns_ids_ranked_by_bm25() {
        let storage = StorageEngine::open_in_memory().unwrap();
        storage.insert_unit(&unit("u1", "Alice went hiking in Yosemite")).unwrap();
        storage.insert_unit(&unit("u2", "Bob enjoys reading novels")).unwrap();

        let ids = run(&storage, &BankId::new("b1"), &FactType::default_search_types(), "Yosemite hiking", 10).unwrap();
        assert_eq!(ids.first(), Some(&"u1".to_string()));
    }
}
