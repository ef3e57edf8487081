//! Temporal strategy: active only when the query parses
//! to an interval; seeds via `range_lookup`, then a restricted spreading
//! pass gated on broadened-interval overlap.

use chrono::{DateTime, Utc};

use hindsight_core::errors::StorageError;
use hindsight_core::config::GraphConfig;
use hindsight_core::{BankId, FactType};
use hindsight_graph::{activation, GraphManager};
use hindsight_storage::StorageEngine;

/// `Ok(None)` means the query carries no parseable temporal expression —
/// the strategy does not participate in this recall.
pub fn run(
    storage: &StorageEngine,
    graph: &GraphManager,
    bank_id: &BankId,
    fact_types: &[FactType],
    query: &str,
    now: DateTime<Utc>,
    budget: usize,
    config: &GraphConfig,
) -> Result<Option<Vec<String>>, StorageError> {
    let Some(interval) = hindsight_temporal::parse(query, now) else {
        return Ok(None);
    };

    let candidates = storage.range_lookup(bank_id, fact_types, &interval)?;
    let seeds: Vec<(String, f64)> = candidates.into_iter().map(|u| (u.id, 1.0)).collect();

    let broadened = interval.broaden(config.temporal_broaden_days);
    let retain = |id: &str| -> bool {
        match storage.get_unit(id) {
            Ok(Some(unit)) => unit.overlaps(broadened.start, broadened.end),
            _ => false,
        }
    };

    let params = activation::ActivationParams {
        max_hops: config.temporal_max_hops,
        decay: config.decay,
        budget,
        min_activation: config.min_activation,
    };
    let activated = activation::spread(graph, &seeds, params, retain);
    Ok(Some(activated.into_iter().map(|n| n.id).collect()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hindsight_core::MemoryUnit;
    use hindsight_core::EMBEDDING_DIM;

    fn dated_unit(id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> MemoryUnit {
        MemoryUnit::new(
            id.into(),
            BankId::new("b1"),
            format!("fact {id}"),
            vec![0.1; EMBEDDING_DIM],
            Some(start),
            Some(end),
            Utc::now(),
            None,
            FactType::World,
            None,
        )
        .unwrap()
    }

    #[test]
    fn inactive_without_a_parseable_expression() {
        let storage = StorageEngine::open_in_memory().unwrap();
        let graph = GraphManager::new();
        let result = run(
            &storage,
            &graph,
            &BankId::new("b1"),
            &FactType::default_search_types(),
            "tell me about Alice",
            Utc::now(),
            100,
            &GraphConfig::default(),
        )
        .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn active_seeds_from_range_lookup() {
        let storage = StorageEngine::open_in_memory().unwrap();
        let graph = GraphManager::new();
        let now = DateTime::parse_from_rfc3339("2024-02-01T00:00:00Z").unwrap().with_timezone(&Utc);
        let jan_start = DateTime::parse_from_rfc3339("2024-01-15T00:00:00Z").unwrap().with_timezone(&Utc);
        let jan_end = DateTime::parse_from_rfc3339("2024-01-16T00:00:00Z").unwrap().with_timezone(&Utc);
        storage.insert_unit(&dated_unit("jan_event", jan_start, jan_end)).unwrap();

        let result = run(
            &storage,
            &graph,
            &BankId::new("b1"),
            &FactType::default_search_types(),
            "last January",
            now,
            100,
            &GraphConfig::default(),
        )
        .unwrap();
        assert_eq!(result, Some(vec!["jan_event".to_string()]));
    }
}
