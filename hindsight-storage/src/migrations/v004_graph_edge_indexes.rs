//! v004: indexes supporting graph-store hydration at startup (loading
//! every edge/mention for a bank into `GraphManager`) and reverse document
//! lookups.

use rusqlite::Connection;

use hindsight_core::errors::StorageError;

fn to_storage_err(e: rusqlite::Error) -> StorageError {
    StorageError::SqliteError {
        message: e.to_string(),
    }
}

pub fn migrate(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch(
        "
        CREATE INDEX idx_edges_dst ON edges(dst);
        CREATE INDEX idx_edges_link_type ON edges(link_type);
        CREATE INDEX idx_document_units_unit ON document_units(unit_id);
        ",
    )
    .map_err(to_storage_err)
}
