//! v003: FTS5 virtual table over `memory_units.search_vector`, kept in
//! sync by triggers.

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
        CREATE VIRTUAL TABLE memory_units_fts USING fts5(
            unit_id UNINDEXED,
            search_vector,
            tokenize = 'unicode61'
        );

        CREATE TRIGGER trg_units_fts_insert AFTER INSERT ON memory_units BEGIN
            INSERT INTO memory_units_fts(unit_id, search_vector)
            VALUES (new.id, new.search_vector);
        END;

        CREATE TRIGGER trg_units_fts_update AFTER UPDATE OF search_vector ON memory_units BEGIN
            UPDATE memory_units_fts SET search_vector = new.search_vector WHERE unit_id = new.id;
        END;

        CREATE TRIGGER trg_units_fts_delete AFTER DELETE ON memory_units BEGIN
            DELETE FROM memory_units_fts WHERE unit_id = old.id;
        END;
        ",
    )
    .map_err(to_storage_err)
}
