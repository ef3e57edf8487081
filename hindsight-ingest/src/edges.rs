//! Edge construction: entity/semantic/temporal/
//! causal edges with the exact caps and weight formulas, written to both
//! the durable store and the live in-process graph.

use std::collections::HashMap;

use chrono::Duration as ChronoDuration;
use rayon::prelude::*;

use hindsight_core::errors::HindsightError;
use hindsight_core::{BankId, CausalKind, Edge, FactType, LinkType, MemoryUnit};
use hindsight_graph::GraphManager;
use hindsight_storage::StorageEngine;

use crate::extraction::CausalHint;

const SEMANTIC_MIN_SIMILARITY: f32 = 0.7;
const SEMANTIC_CAP: usize = 5;
const TEMPORAL_WINDOW_HOURS: i64 = 24;
const TEMPORAL_CAP: usize = 10;

fn persist(storage: &StorageEngine, graph: &GraphManager, edge: Edge) -> Result<(), HindsightError> {
    storage.insert_edge(&edge)?;
    graph.add_edge(edge)?;
    Ok(())
}

/// Entity edges: weight 1.0, bidirectional, for every pair of units
/// (new-new or new-existing) sharing a resolved entity.
///
/// Each unit's fan-out is independent of every other unit's (writes land on
/// disjoint edge rows/graph entries keyed by that unit's own id), so the
/// per-unit work runs across `rayon`'s global pool rather than sequentially;
/// `storage`'s single writer connection and `graph`'s `RwLock` already
/// serialize the actual mutations.
pub fn build_entity_edges(
    storage: &StorageEngine,
    graph: &GraphManager,
    new_units: &[MemoryUnit],
    entities_of_unit: &HashMap<String, Vec<String>>,
) -> Result<(), HindsightError> {
    new_units.par_iter().try_for_each(|unit| -> Result<(), HindsightError> {
        let Some(entity_ids) = entities_of_unit.get(&unit.id) else { return Ok(()) };
        for entity_id in entity_ids {
            for other_id in storage.units_mentioning(entity_id)? {
                if other_id == unit.id {
                    continue;
                }
                persist(storage, graph, Edge::new(unit.id.clone(), other_id, LinkType::Entity, 1.0, None)?)?;
            }
        }
        Ok(())
    })
}

/// Semantic edges: cosine-similarity >= 0.7 neighbours via `vector_knn`,
/// capped at 5 new edges per unit.
pub fn build_semantic_edges(
    storage: &StorageEngine,
    graph: &GraphManager,
    bank_id: &BankId,
    unit: &MemoryUnit,
) -> Result<(), HindsightError> {
    let neighbours = storage.vector_knn(
        bank_id,
        &FactType::default_search_types(),
        &unit.embedding,
        SEMANTIC_CAP + 1,
        SEMANTIC_MIN_SIMILARITY,
    )?;

    let mut added = 0usize;
    for (neighbour, similarity) in neighbours {
        if added >= SEMANTIC_CAP || neighbour.id == unit.id {
            continue;
        }
        persist(
            storage,
            graph,
            Edge::new(unit.id.clone(), neighbour.id, LinkType::Semantic, similarity as f64, None)?,
        )?;
        added += 1;
    }
    Ok(())
}

/// Temporal edges: connect to units whose `mentioned_at` falls within 24
/// hours, weight `max(0.3, 1 - delta/24h)`, capped at 10 per unit.
pub fn build_temporal_edges(
    storage: &StorageEngine,
    graph: &GraphManager,
    bank_id: &BankId,
    unit: &MemoryUnit,
) -> Result<(), HindsightError> {
    let window = hindsight_temporal::Interval::new(
        unit.mentioned_at - ChronoDuration::hours(TEMPORAL_WINDOW_HOURS),
        unit.mentioned_at + ChronoDuration::hours(TEMPORAL_WINDOW_HOURS),
    )?;
    let mut candidates = storage.range_lookup(bank_id, &FactType::default_search_types(), &window)?;
    candidates.sort_by_key(|u| (u.mentioned_at - unit.mentioned_at).num_milliseconds().abs());

    let mut added = 0usize;
    for candidate in candidates {
        if added >= TEMPORAL_CAP || candidate.id == unit.id {
            continue;
        }
        let delta_hours = (candidate.mentioned_at - unit.mentioned_at).num_milliseconds().abs() as f64
            / (TEMPORAL_WINDOW_HOURS as f64 * 3_600_000.0);
        let weight = (1.0 - delta_hours).max(LinkType::Temporal.min_weight());
        persist(storage, graph, Edge::new(unit.id.clone(), candidate.id, LinkType::Temporal, weight, None)?)?;
        added += 1;
    }
    Ok(())
}

/// Causal edges: directed, weight 1.0, built from the batch's in-batch
/// hints, mapped through the fact-index -> persisted-unit-id table built
/// during persistence.
pub fn build_causal_edges(
    storage: &StorageEngine,
    graph: &GraphManager,
    unit_ids_by_index: &[String],
    hints: &[CausalHint],
) -> Result<(), HindsightError> {
    for hint in hints {
        let src = unit_ids_by_index[hint.src_index].clone();
        let dst = unit_ids_by_index[hint.dst_index].clone();
        persist(storage, graph, Edge::new(src, dst, LinkType::Causal, 1.0, Some(hint.kind))?)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hindsight_core::EMBEDDING_DIM;

    fn unit_with_embedding(id: &str, bank: &str, embedding: Vec<f32>) -> MemoryUnit {
        MemoryUnit::new(
            id.into(),
            BankId::new(bank),
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
    fn entity_edges_connect_units_sharing_an_entity() {
        let storage = StorageEngine::open_in_memory().unwrap();
        let graph = GraphManager::new();
        let bank = "b1";
        let u1 = unit_with_embedding("u1", bank, vec![0.1; EMBEDDING_DIM]);
        let u2 = unit_with_embedding("u2", bank, vec![0.2; EMBEDDING_DIM]);
        storage.insert_unit(&u1).unwrap();
        storage.insert_unit(&u2).unwrap();
        storage.insert_entity(&hindsight_core::Entity::new(
            "ent1".into(),
            BankId::new(bank),
            "Alice".into(),
            hindsight_core::EntityType::Person,
        ))
        .unwrap();
        storage.link_unit_to_entity("u1", "ent1").unwrap();
        storage.link_unit_to_entity("u2", "ent1").unwrap();

        let mut entities_of_unit = HashMap::new();
        entities_of_unit.insert("u1".to_string(), vec!["ent1".to_string()]);
        entities_of_unit.insert("u2".to_string(), vec!["ent1".to_string()]);

        build_entity_edges(&storage, &graph, &[u1.clone(), u2.clone()], &entities_of_unit).unwrap();

        let edges = storage.edges_for_unit("u1").unwrap();
        assert!(edges.iter().any(|e| e.dst == "u2" && e.link_type == LinkType::Entity));
    }

    #[test]
    fn semantic_edges_respect_the_cap() {
        let storage = StorageEngine::open_in_memory().unwrap();
        let graph = GraphManager::new();
        let bank_id = BankId::new("b1");
        let base = vec![1.0f32; EMBEDDING_DIM];
        for i in 0..8 {
            let mut embedding = base.clone();
            embedding[0] = 1.0 - (i as f32) * 0.001; // all near-identical, high cosine similarity
            storage.insert_unit(&unit_with_embedding(&format!("n{i}"), "b1", embedding)).unwrap();
        }
        let target = unit_with_embedding("target", "b1", base.clone());
        storage.insert_unit(&target).unwrap();

        build_semantic_edges(&storage, &graph, &bank_id, &target).unwrap();
        let edges = storage.edges_for_unit("target").unwrap();
        let semantic_count = edges.iter().filter(|e| e.link_type == LinkType::Semantic && e.src == "target").count();
        assert!(semantic_count <= SEMANTIC_CAP);
        assert!(semantic_count > 0);
    }

    #[test]
    fn causal_edges_are_directed_with_recorded_kind() {
        let storage = StorageEngine::open_in_memory().unwrap();
        let graph = GraphManager::new();
        let u1 = unit_with_embedding("u1", "b1", vec![0.1; EMBEDDING_DIM]);
        let u2 = unit_with_embedding("u2", "b1", vec![0.2; EMBEDDING_DIM]);
        storage.insert_unit(&u1).unwrap();
        storage.insert_unit(&u2).unwrap();

        let unit_ids = vec!["u1".to_string(), "u2".to_string()];
        let hints = vec![CausalHint { src_index: 0, dst_index: 1, kind: CausalKind::Causes }];
        build_causal_edges(&storage, &graph, &unit_ids, &hints).unwrap();

        let edges = storage.edges_for_unit("u1").unwrap();
        assert!(edges.iter().any(|e| e.src == "u1" && e.dst == "u2" && e.causal_kind == Some(CausalKind::Causes)));
        // causal edges are directed: no mirrored u2 -> u1 edge.
        assert!(!edges.iter().any(|e| e.src == "u2" && e.dst == "u1"));
    }
}
