use thiserror::Error;

/// Errors from the SQLite-backed fact store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("sqlite error: {message}")]
    SqliteError { message: String },

    #[error("migration failed at version {version}: {message}")]
    MigrationFailed { version: u32, message: String },

    #[error("memory unit not found: {id}")]
    UnitNotFound { id: String },

    #[error("document not found: {id}")]
    DocumentNotFound { id: String },

    #[error("bank not found: {bank_id}")]
    BankNotFound { bank_id: String },

    #[error("pool exhausted: {0}")]
    PoolExhausted(String),
}
