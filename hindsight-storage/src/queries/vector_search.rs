//! Brute-force vector KNN: no ANN index is in the
//! dependency set, so this scans every matching unit's embedding and
//! ranks by dot product. Embeddings are L2-normalised at write time
//!, so dot product equals cosine similarity.

use rusqlite::types::ToSql;
use rusqlite::Connection;

use hindsight_core::errors::StorageError;
use hindsight_core::FactType;

use crate::codec::blob_to_embedding;
use crate::queries::{serialize_enum, to_storage_err};

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Top-`limit` units in `bank_id` by similarity to `query_embedding`,
/// restricted to `fact_types` and a minimum cosine similarity, descending
/// by score.
pub fn vector_knn(
    conn: &Connection,
    bank_id: &str,
    query_embedding: &[f32],
    fact_types: &[FactType],
    limit: usize,
    min_sim: f32,
) -> Result<Vec<(String, f32)>, StorageError> {
    if fact_types.is_empty() {
        return Ok(Vec::new());
    }

    let type_strs = fact_types
        .iter()
        .map(serialize_enum)
        .collect::<Result<Vec<_>, _>>()?;
    let placeholders = type_strs.iter().map(|_| "?").collect::<Vec<_>>().join(", ");
    let sql = format!(
        "SELECT id, embedding FROM memory_units WHERE bank_id = ? AND fact_type IN ({placeholders})"
    );

    let mut stmt = conn.prepare(&sql).map_err(to_storage_err)?;
    let mut params: Vec<&dyn ToSql> = Vec::with_capacity(1 + type_strs.len());
    params.push(&bank_id);
    for t in &type_strs {
        params.push(t);
    }

    let mut scored: Vec<(String, f32)> = stmt
        .query_map(params.as_slice(), |row| {
            let id: String = row.get(0)?;
            let blob: Vec<u8> = row.get(1)?;
            Ok((id, blob))
        })
        .map_err(to_storage_err)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(to_storage_err)?
        .into_iter()
        .map(|(id, blob)| {
            let embedding = blob_to_embedding(&blob);
            let score = dot(query_embedding, &embedding);
            (id, score)
        })
        .filter(|(_, score)| *score >= min_sim)
        .collect();

    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored.truncate(limit);
    Ok(scored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrations::run_migrations;
    use crate::queries::memory_crud::insert_unit;
    use hindsight_core::{BankId, MemoryUnit, EMBEDDING_DIM};

    fn unit_with_embedding(id: &str, embedding: Vec<f32>) -> MemoryUnit {
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
    fn min_sim_filters_weak_matches() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        let mut close = vec![0.0; EMBEDDING_DIM];
        close[0] = 1.0;
        let mut far = vec![0.0; EMBEDDING_DIM];
        far[1] = 1.0;

        insert_unit(&conn, &unit_with_embedding("u_close", close)).unwrap();
        insert_unit(&conn, &unit_with_embedding("u_far", far)).unwrap();

        let query = {
            let mut v = vec![0.0; EMBEDDING_DIM];
            v[0] = 1.0;
            v
        };

        let results = vector_knn(&conn, "b1", &query, &[FactType::World], 10, 0.3).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].0, "u_close");
    }
}
