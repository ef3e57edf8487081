//! Document CRUD and cascade delete.

use rusqlite::{params, Connection};

use hindsight_core::errors::StorageError;
use hindsight_core::{BankId, Document};

use crate::queries::{to_storage_err, OptionalRow};

pub fn upsert_document_header(
    conn: &Connection,
    id: &str,
    bank_id: &str,
    source: Option<&str>,
) -> Result<(), StorageError> {
    conn.execute(
        "INSERT INTO documents (id, bank_id, source) VALUES (?1, ?2, ?3)
         ON CONFLICT(id) DO UPDATE SET bank_id = excluded.bank_id, source = excluded.source",
        params![id, bank_id, source],
    )
    .map_err(to_storage_err)?;
    Ok(())
}

pub fn link_unit_to_document(conn: &Connection, document_id: &str, unit_id: &str) -> Result<(), StorageError> {
    conn.execute(
        "INSERT OR IGNORE INTO document_units (document_id, unit_id) VALUES (?1, ?2)",
        params![document_id, unit_id],
    )
    .map_err(to_storage_err)?;
    Ok(())
}

/// Unit ids previously associated with `document_id`, used to cascade the
/// prior generation's units/edges/links away before a re-ingest under the
/// same id.
pub fn unit_ids_for_document(conn: &Connection, document_id: &str) -> Result<Vec<String>, StorageError> {
    let mut stmt = conn
        .prepare("SELECT unit_id FROM document_units WHERE document_id = ?1")
        .map_err(to_storage_err)?;
    let rows = stmt
        .query_map(params![document_id], |row| row.get::<_, String>(0))
        .map_err(to_storage_err)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(to_storage_err)
}

pub fn get_document(conn: &Connection, id: &str) -> Result<Option<Document>, StorageError> {
    let header = conn
        .query_row(
            "SELECT id, bank_id, source FROM documents WHERE id = ?1",
            params![id],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, Option<String>>(2)?,
                ))
            },
        )
        .optional()
        .map_err(to_storage_err)?;

    let Some((id, bank_id, source)) = header else {
        return Ok(None);
    };
    let unit_ids = unit_ids_for_document(conn, &id)?;
    Ok(Some(Document {
        id,
        bank_id: BankId::new(bank_id),
        source,
        unit_ids,
    }))
}

/// Delete the document header; `memory_units`/`edges`/`entity_links` rows
/// for its prior units must be deleted by the caller (via
/// `memory_crud::delete_unit`) before calling this, since those deletes
/// drive the graph-store cascade too.
pub fn delete_document(conn: &Connection, id: &str) -> Result<(), StorageError> {
    conn.execute("DELETE FROM documents WHERE id = ?1", params![id])
        .map_err(to_storage_err)?;
    Ok(())
}
