//! FTS5 BM25 keyword search over `search_vector`.

use rusqlite::types::ToSql;
use rusqlite::Connection;

use hindsight_core::errors::StorageError;
use hindsight_core::FactType;

use crate::queries::{serialize_enum, to_storage_err};

/// Builds an FTS5 `MATCH` expression that finds documents containing
/// *any* of the query's terms (rather than FTS5's default implicit AND
/// across bareword terms), so a naturally-phrased question still surfaces
/// a document that only shares a few of its words — BM25 then ranks
/// heavier-overlap documents first. Each term is double-quoted so
/// punctuation inside it (hyphens, digits) is treated as a phrase rather
/// than FTS5 query syntax.
fn or_query(query: &str) -> Option<String> {
    let terms: Vec<String> = query
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|w| !w.is_empty())
        .map(|w| format!("\"{}\"", w.replace('"', "\"\"")))
        .collect();
    if terms.is_empty() {
        None
    } else {
        Some(terms.join(" OR "))
    }
}

/// Top-`limit` units in `bank_id` matching `query`, restricted to
/// `fact_types`. Score is `-bm25(...)` so higher is always better, in
/// the same direction as the vector strategy's cosine score.
pub fn keyword_search(
    conn: &Connection,
    bank_id: &str,
    query: &str,
    fact_types: &[FactType],
    limit: usize,
) -> Result<Vec<(String, f32)>, StorageError> {
    if fact_types.is_empty() {
        return Ok(Vec::new());
    }
    let Some(match_expr) = or_query(query) else {
        return Ok(Vec::new());
    };

    let type_strs = fact_types
        .iter()
        .map(serialize_enum)
        .collect::<Result<Vec<_>, _>>()?;
    let placeholders = type_strs.iter().map(|_| "?").collect::<Vec<_>>().join(", ");
    let sql = format!(
        "SELECT mu.id, bm25(memory_units_fts) AS rank
         FROM memory_units_fts
         JOIN memory_units mu ON mu.id = memory_units_fts.unit_id
         WHERE memory_units_fts MATCH ?
           AND mu.bank_id = ?
           AND mu.fact_type IN ({placeholders})
         ORDER BY rank
         LIMIT ?"
    );

    let mut stmt = conn.prepare(&sql).map_err(to_storage_err)?;
    let limit_i64 = limit as i64;
    let mut params: Vec<&dyn ToSql> = Vec::with_capacity(3 + type_strs.len());
    params.push(&match_expr);
    params.push(&bank_id);
    for t in &type_strs {
        params.push(t);
    }
    params.push(&limit_i64);

    stmt.query_map(params.as_slice(), |row| {
        let id: String = row.get(0)?;
        let rank: f64 = row.get(1)?;
        Ok((id, -rank as f32))
    })
    .map_err(to_storage_err)?
    .collect::<Result<Vec<_>, _>>()
    .map_err(to_storage_err)
}
