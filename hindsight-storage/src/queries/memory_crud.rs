//! Insert, get, update, delete, and bulk ops for `MemoryUnit`.

use rusqlite::{params, Connection, Row};

use hindsight_core::errors::StorageError;
use hindsight_core::{BankId, FactType, MemoryUnit};

use crate::codec::{blob_to_embedding, embedding_to_blob};
use crate::queries::{parse_enum, serialize_enum, to_storage_err, OptionalRow};

pub fn insert_unit(conn: &Connection, unit: &MemoryUnit) -> Result<(), StorageError> {
    let fact_type_str = serialize_enum(&unit.fact_type)?;
    conn.execute(
        "INSERT INTO memory_units (
            id, bank_id, text, embedding, occurred_start, occurred_end,
            mentioned_at, context, fact_type, confidence_score, access_count,
            search_vector, content_hash
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        params![
            unit.id,
            unit.bank_id.as_str(),
            unit.text,
            embedding_to_blob(&unit.embedding),
            unit.occurred_start.map(|t| t.to_rfc3339()),
            unit.occurred_end.map(|t| t.to_rfc3339()),
            unit.mentioned_at.to_rfc3339(),
            unit.context,
            fact_type_str,
            unit.confidence_score,
            unit.access_count as i64,
            unit.search_vector,
            unit.content_hash,
        ],
    )
    .map_err(to_storage_err)?;
    Ok(())
}

pub fn bulk_insert_units(conn: &Connection, units: &[MemoryUnit]) -> Result<usize, StorageError> {
    let mut count = 0;
    for unit in units {
        insert_unit(conn, unit)?;
        count += 1;
    }
    Ok(count)
}

pub fn get_unit(conn: &Connection, id: &str) -> Result<Option<MemoryUnit>, StorageError> {
    let mut stmt = conn
        .prepare(
            "SELECT id, bank_id, text, embedding, occurred_start, occurred_end,
                    mentioned_at, context, fact_type, confidence_score, access_count,
                    search_vector, content_hash
             FROM memory_units WHERE id = ?1",
        )
        .map_err(to_storage_err)?;

    stmt.query_row(params![id], row_to_unit)
        .optional()
        .map_err(to_storage_err)?
        .transpose()
}

/// Fetch several units, preserving the order of `ids`.
pub fn get_many_units(conn: &Connection, ids: &[String]) -> Result<Vec<MemoryUnit>, StorageError> {
    let mut results = Vec::with_capacity(ids.len());
    for id in ids {
        if let Some(unit) = get_unit(conn, id)? {
            results.push(unit);
        }
    }
    Ok(results)
}

pub fn update_unit(conn: &Connection, unit: &MemoryUnit) -> Result<(), StorageError> {
    let fact_type_str = serialize_enum(&unit.fact_type)?;
    let rows = conn
        .execute(
            "UPDATE memory_units SET
                bank_id = ?2, text = ?3, embedding = ?4, occurred_start = ?5,
                occurred_end = ?6, mentioned_at = ?7, context = ?8, fact_type = ?9,
                confidence_score = ?10, access_count = ?11, search_vector = ?12,
                content_hash = ?13
             WHERE id = ?1",
            params![
                unit.id,
                unit.bank_id.as_str(),
                unit.text,
                embedding_to_blob(&unit.embedding),
                unit.occurred_start.map(|t| t.to_rfc3339()),
                unit.occurred_end.map(|t| t.to_rfc3339()),
                unit.mentioned_at.to_rfc3339(),
                unit.context,
                fact_type_str,
                unit.confidence_score,
                unit.access_count as i64,
                unit.search_vector,
                unit.content_hash,
            ],
        )
        .map_err(to_storage_err)?;

    if rows == 0 {
        return Err(StorageError::UnitNotFound { id: unit.id.clone() });
    }
    Ok(())
}

/// Bump `access_count` by one, used when a unit is surfaced by `recall`.
pub fn touch_unit(conn: &Connection, id: &str) -> Result<(), StorageError> {
    conn.execute(
        "UPDATE memory_units SET access_count = access_count + 1 WHERE id = ?1",
        params![id],
    )
    .map_err(to_storage_err)?;
    Ok(())
}

/// Delete a unit. Cascades to `entity_links`, `edges`, and
/// `document_units` via `ON DELETE CASCADE`.
pub fn delete_unit(conn: &Connection, id: &str) -> Result<(), StorageError> {
    conn.execute("DELETE FROM memory_units WHERE id = ?1", params![id])
        .map_err(to_storage_err)?;
    Ok(())
}

fn row_to_unit(row: &Row<'_>) -> rusqlite::Result<Result<MemoryUnit, StorageError>> {
    Ok(try_row_to_unit(row))
}

fn try_row_to_unit(row: &Row<'_>) -> Result<MemoryUnit, StorageError> {
    let embedding_blob: Vec<u8> = row.get(3).map_err(to_storage_err)?;
    let occurred_start: Option<String> = row.get(4).map_err(to_storage_err)?;
    let occurred_end: Option<String> = row.get(5).map_err(to_storage_err)?;
    let mentioned_at: String = row.get(6).map_err(to_storage_err)?;
    let fact_type_str: String = row.get(8).map_err(to_storage_err)?;

    let parse_dt = |s: &str| -> Result<chrono::DateTime<chrono::Utc>, StorageError> {
        chrono::DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&chrono::Utc))
            .map_err(|e| StorageError::SqliteError {
                message: format!("parse datetime '{s}': {e}"),
            })
    };

    Ok(MemoryUnit {
        id: row.get(0).map_err(to_storage_err)?,
        bank_id: BankId::new(row.get::<_, String>(1).map_err(to_storage_err)?),
        text: row.get(2).map_err(to_storage_err)?,
        embedding: blob_to_embedding(&embedding_blob),
        occurred_start: occurred_start.as_deref().map(parse_dt).transpose()?,
        occurred_end: occurred_end.as_deref().map(parse_dt).transpose()?,
        mentioned_at: parse_dt(&mentioned_at)?,
        context: row.get(7).map_err(to_storage_err)?,
        fact_type: parse_enum::<FactType>(&fact_type_str)?,
        confidence_score: row.get(9).map_err(to_storage_err)?,
        access_count: row.get::<_, i64>(10).map_err(to_storage_err)? as u64,
        search_vector: row.get(11).map_err(to_storage_err)?,
        content_hash: row.get(12).map_err(to_storage_err)?,
    })
}
