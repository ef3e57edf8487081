//! v002: vector-index support. There is no native ANN index available in
//! the dependency set, so `vector_search.rs` does a brute-force cosine
//! scan over `memory_units.embedding`; this migration just records the
//! embedding dimension per bank so a dimension mismatch is a clean error
//! instead of a silent bad-cosine result.

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
        CREATE TABLE vector_index_meta (
            bank_id TEXT PRIMARY KEY,
            dim     INTEGER NOT NULL
        );
        ",
    )
    .map_err(to_storage_err)
}
