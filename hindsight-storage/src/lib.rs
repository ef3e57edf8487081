//! SQLite-backed fact store.
//!
//! A single write `rusqlite::Connection` plus a small pool of read
//! connections, both in WAL mode (`pool.rs`). Forward-only transactional
//! migrations build the schema (`migrations/`). Query modules
//! (`queries/`) implement the contract retrieval needs: vector KNN,
//! FTS5 keyword search, temporal range lookup, plus entity/document/edge
//! CRUD and document cascade-delete semantics.

pub mod codec;
pub mod migrations;
pub mod pool;
pub mod queries;

use std::path::Path;

use hindsight_core::errors::StorageError;
use hindsight_core::{BankId, Document, Edge, Entity, EntityType, FactType, MemoryUnit};
use pool::ConnectionPool;

/// The fact store. Observations (`fact_type == Observation`) are excluded
/// from the three search operations unconditionally.
pub struct StorageEngine {
    pool: ConnectionPool,
}

impl StorageEngine {
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        let pool = ConnectionPool::open(path)?;
        pool.with_writer(|conn| migrations::run_migrations(conn).map(|_| ()))?;
        Ok(Self { pool })
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        let pool = ConnectionPool::open_in_memory()?;
        pool.with_writer(|conn| migrations::run_migrations(conn).map(|_| ()))?;
        Ok(Self { pool })
    }

    fn excluding_observations(fact_types: &[FactType]) -> Vec<FactType> {
        fact_types
            .iter()
            .copied()
            .filter(|t| *t != FactType::Observation)
            .collect()
    }

    // -- search operations --------------------------------

    pub fn vector_knn(
        &self,
        bank_id: &BankId,
        fact_types: &[FactType],
        query_embedding: &[f32],
        k: usize,
        min_sim: f32,
    ) -> Result<Vec<(MemoryUnit, f32)>, StorageError> {
        let types = Self::excluding_observations(fact_types);
        self.pool.with_reader(|conn| {
            let hits = queries::vector_search::vector_knn(
                conn,
                bank_id.as_str(),
                query_embedding,
                &types,
                k,
                min_sim,
            )?;
            hydrate_scored(conn, hits)
        })
    }

    pub fn keyword_search(
        &self,
        bank_id: &BankId,
        fact_types: &[FactType],
        query: &str,
        k: usize,
    ) -> Result<Vec<(MemoryUnit, f32)>, StorageError> {
        let types = Self::excluding_observations(fact_types);
        self.pool.with_reader(|conn| {
            let hits = queries::keyword_search::keyword_search(conn, bank_id.as_str(), query, &types, k)?;
            hydrate_scored(conn, hits)
        })
    }

    pub fn range_lookup(
        &self,
        bank_id: &BankId,
        fact_types: &[FactType],
        interval: &hindsight_temporal::Interval,
    ) -> Result<Vec<MemoryUnit>, StorageError> {
        let types = Self::excluding_observations(fact_types);
        self.pool.with_reader(|conn| {
            let ids = queries::temporal_ops::range_lookup(
                conn,
                bank_id.as_str(),
                &types,
                interval.start,
                interval.end,
            )?;
            queries::memory_crud::get_many_units(conn, &ids)
        })
    }

    /// Preserves the order of `ids`.
    pub fn get_many(&self, ids: &[String]) -> Result<Vec<MemoryUnit>, StorageError> {
        self.pool.with_reader(|conn| queries::memory_crud::get_many_units(conn, ids))
    }

    pub fn get_unit(&self, id: &str) -> Result<Option<MemoryUnit>, StorageError> {
        self.pool.with_reader(|conn| queries::memory_crud::get_unit(conn, id))
    }

    /// Best-effort access-count bump. Callers may ignore the error.
    pub fn touch_unit(&self, id: &str) -> Result<(), StorageError> {
        self.pool.with_writer(|conn| queries::memory_crud::touch_unit(conn, id))
    }

    // -- writes -----------------------------------------------------------

    pub fn insert_unit(&self, unit: &MemoryUnit) -> Result<(), StorageError> {
        self.pool.with_writer(|conn| queries::memory_crud::insert_unit(conn, unit))
    }

    pub fn update_unit(&self, unit: &MemoryUnit) -> Result<(), StorageError> {
        self.pool.with_writer(|conn| queries::memory_crud::update_unit(conn, unit))
    }

    /// Delete a unit and every durable edge touching it.
    pub fn delete_unit(&self, id: &str) -> Result<(), StorageError> {
        self.pool.with_writer(|conn| {
            queries::edge_ops::remove_edges_for(conn, id)?;
            queries::memory_crud::delete_unit(conn, id)
        })
    }

    // -- entities -----------------------------------------------------------

    pub fn insert_entity(&self, entity: &Entity) -> Result<(), StorageError> {
        self.pool.with_writer(|conn| queries::entity_ops::insert_entity(conn, entity))
    }

    pub fn get_entity(&self, id: &str) -> Result<Option<Entity>, StorageError> {
        self.pool.with_reader(|conn| queries::entity_ops::get_entity(conn, id))
    }

    pub fn find_entity_by_name(&self, bank_id: &BankId, name: &str) -> Result<Option<Entity>, StorageError> {
        self.pool
            .with_reader(|conn| queries::entity_ops::find_by_name(conn, bank_id.as_str(), name))
    }

    pub fn entity_candidates_by_type(
        &self,
        bank_id: &BankId,
        entity_type: EntityType,
    ) -> Result<Vec<Entity>, StorageError> {
        self.pool
            .with_reader(|conn| queries::entity_ops::candidates_by_type(conn, bank_id.as_str(), entity_type))
    }

    pub fn add_entity_alias(&self, entity_id: &str, alias: &str) -> Result<(), StorageError> {
        self.pool.with_writer(|conn| queries::entity_ops::add_alias(conn, entity_id, alias))
    }

    pub fn link_unit_to_entity(&self, unit_id: &str, entity_id: &str) -> Result<(), StorageError> {
        self.pool
            .with_writer(|conn| queries::entity_ops::link_unit_to_entity(conn, unit_id, entity_id))
    }

    pub fn units_mentioning(&self, entity_id: &str) -> Result<Vec<String>, StorageError> {
        self.pool.with_reader(|conn| queries::entity_ops::units_mentioning(conn, entity_id))
    }

    pub fn entities_for_unit(&self, unit_id: &str) -> Result<Vec<String>, StorageError> {
        self.pool.with_reader(|conn| queries::entity_ops::entities_for_unit(conn, unit_id))
    }

    // -- edges -----------------------------------------------------------

    pub fn insert_edge(&self, edge: &Edge) -> Result<(), StorageError> {
        self.pool.with_writer(|conn| queries::edge_ops::insert_edge_with_mirror(conn, edge))
    }

    pub fn edges_for_unit(&self, unit_id: &str) -> Result<Vec<Edge>, StorageError> {
        self.pool.with_reader(|conn| queries::edge_ops::edges_for_unit(conn, unit_id))
    }

    /// Used to hydrate `hindsight_graph::GraphManager` at process startup.
    pub fn all_edges(&self) -> Result<Vec<Edge>, StorageError> {
        self.pool.with_reader(queries::edge_ops::all_edges)
    }

    // -- documents --------------------------------------------

    /// Replace a document's prior units (cascade-deleting their edges and
    /// entity links) and insert `new_units` under the same `document_id`,
    /// preserving idempotence: re-upserting the same units is a no-op on
    /// the resulting multiset of `unit_ids`.
    pub fn upsert_document(
        &self,
        document_id: &str,
        bank_id: &BankId,
        source: Option<&str>,
        new_units: &[MemoryUnit],
    ) -> Result<(), StorageError> {
        self.pool.with_writer(|conn| {
            let prior_units = queries::document_ops::unit_ids_for_document(conn, document_id)?;
            for unit_id in &prior_units {
                queries::edge_ops::remove_edges_for(conn, unit_id)?;
                queries::memory_crud::delete_unit(conn, unit_id)?;
            }
            queries::document_ops::upsert_document_header(conn, document_id, bank_id.as_str(), source)?;
            for unit in new_units {
                queries::memory_crud::insert_unit(conn, unit)?;
                queries::document_ops::link_unit_to_document(conn, document_id, &unit.id)?;
            }
            Ok(())
        })
    }

    pub fn get_document(&self, id: &str) -> Result<Option<Document>, StorageError> {
        self.pool.with_reader(|conn| queries::document_ops::get_document(conn, id))
    }

    /// Cascade-delete a document and every unit it owns.
    pub fn delete_document(&self, id: &str) -> Result<(), StorageError> {
        self.pool.with_writer(|conn| {
            let unit_ids = queries::document_ops::unit_ids_for_document(conn, id)?;
            for unit_id in &unit_ids {
                queries::edge_ops::remove_edges_for(conn, unit_id)?;
                queries::memory_crud::delete_unit(conn, unit_id)?;
            }
            queries::document_ops::delete_document(conn, id)
        })
    }
}

fn hydrate_scored(
    conn: &rusqlite::Connection,
    hits: Vec<(String, f32)>,
) -> Result<Vec<(MemoryUnit, f32)>, StorageError> {
    let ids: Vec<String> = hits.iter().map(|(id, _)| id.clone()).collect();
    let units = queries::memory_crud::get_many_units(conn, &ids)?;
    let by_id: std::collections::HashMap<_, _> = units.into_iter().map(|u| (u.id.clone(), u)).collect();
    Ok(hits
        .into_iter()
        .filter_map(|(id, score)| by_id.get(&id).cloned().map(|u| (u, score)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hindsight_core::EMBEDDING_DIM;

    fn unit(id: &str, bank: &str, text: &str) -> MemoryUnit {
        MemoryUnit::new(
            id.into(),
            BankId::new(bank),
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
    fn observations_are_excluded_from_vector_knn() {
        let engine = StorageEngine::open_in_memory().unwrap();
        let mut obs = unit("o1", "b1", "synthesised observation");
        obs.fact_type = FactType::Observation;
        engine.insert_unit(&obs).unwrap();

        let results = engine
            .vector_knn(&BankId::new("b1"), &FactType::default_search_types(), &vec![0.1; EMBEDDING_DIM], 10, 0.0)
            .unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn upsert_document_replaces_prior_generation() {
        let engine = StorageEngine::open_in_memory().unwrap();
        let bank = BankId::new("b1");
        engine
            .upsert_document("d1", &bank, None, &[unit("u1", "b1", "first")])
            .unwrap();
        assert!(engine.get_unit("u1").unwrap().is_some());

        engine
            .upsert_document("d1", &bank, None, &[unit("u2", "b1", "second")])
            .unwrap();
        assert!(engine.get_unit("u1").unwrap().is_none());
        assert!(engine.get_unit("u2").unwrap().is_some());
        let doc = engine.get_document("d1").unwrap().unwrap();
        assert_eq!(doc.unit_ids, vec!["u2".to_string()]);
    }

    #[test]
    fn delete_document_cascades_units_and_edges() {
        let engine = StorageEngine::open_in_memory().unwrap();
        let bank = BankId::new("b1");
        engine
            .upsert_document("d1", &bank, None, &[unit("u1", "b1", "first")])
            .unwrap();
        engine
            .insert_edge(&Edge::new("u1".into(), "u1-other".into(), hindsight_core::LinkType::Semantic, 0.8, None).unwrap())
            .unwrap();
        engine.delete_document("d1").unwrap();
        assert!(engine.get_unit("u1").unwrap().is_none());
        assert!(engine.edges_for_unit("u1").unwrap().is_empty());
    }
}
