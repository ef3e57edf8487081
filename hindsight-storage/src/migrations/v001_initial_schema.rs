//! v001: schema version tracking plus the five base data-model tables
//! (`memory_units`, `entities`, `entity_links`, `edges`, `documents`).

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
        CREATE TABLE IF NOT EXISTS schema_version (
            version    INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );

        CREATE TABLE memory_units (
            id               TEXT PRIMARY KEY,
            bank_id          TEXT NOT NULL,
            text             TEXT NOT NULL,
            embedding        BLOB NOT NULL,
            occurred_start   TEXT,
            occurred_end     TEXT,
            mentioned_at     TEXT NOT NULL,
            context          TEXT,
            fact_type        TEXT NOT NULL,
            confidence_score REAL,
            access_count     INTEGER NOT NULL DEFAULT 0,
            search_vector    TEXT NOT NULL,
            content_hash     TEXT NOT NULL
        );

        CREATE INDEX idx_units_bank ON memory_units(bank_id);
        CREATE INDEX idx_units_bank_type ON memory_units(bank_id, fact_type);
        CREATE INDEX idx_units_bank_hash ON memory_units(bank_id, content_hash);
        CREATE INDEX idx_units_bank_occurred ON memory_units(bank_id, occurred_start, occurred_end);

        CREATE TABLE entities (
            id             TEXT PRIMARY KEY,
            bank_id        TEXT NOT NULL,
            canonical_name TEXT NOT NULL,
            entity_type    TEXT NOT NULL,
            aliases        TEXT NOT NULL DEFAULT '[]'
        );

        CREATE UNIQUE INDEX idx_entities_bank_folded_name
            ON entities(bank_id, canonical_name COLLATE NOCASE);

        CREATE TABLE entity_links (
            unit_id   TEXT NOT NULL REFERENCES memory_units(id) ON DELETE CASCADE,
            entity_id TEXT NOT NULL REFERENCES entities(id) ON DELETE CASCADE,
            PRIMARY KEY (unit_id, entity_id)
        );

        CREATE INDEX idx_entity_links_entity ON entity_links(entity_id);

        CREATE TABLE edges (
            src         TEXT NOT NULL REFERENCES memory_units(id) ON DELETE CASCADE,
            dst         TEXT NOT NULL REFERENCES memory_units(id) ON DELETE CASCADE,
            link_type   TEXT NOT NULL,
            weight      REAL NOT NULL,
            causal_kind TEXT,
            PRIMARY KEY (src, dst, link_type)
        );

        CREATE TABLE documents (
            id      TEXT PRIMARY KEY,
            bank_id TEXT NOT NULL,
            source  TEXT
        );

        CREATE TABLE document_units (
            document_id TEXT NOT NULL REFERENCES documents(id) ON DELETE CASCADE,
            unit_id     TEXT NOT NULL REFERENCES memory_units(id) ON DELETE CASCADE,
            PRIMARY KEY (document_id, unit_id)
        );
        ",
    )
    .map_err(to_storage_err)
}
