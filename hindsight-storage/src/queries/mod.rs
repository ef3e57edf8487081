//! Query modules, one per concern.

pub mod document_ops;
pub mod edge_ops;
pub mod entity_ops;
pub mod keyword_search;
pub mod memory_crud;
pub mod temporal_ops;
pub mod vector_search;

use hindsight_core::errors::StorageError;

pub(crate) fn to_storage_err(e: rusqlite::Error) -> StorageError {
    StorageError::SqliteError {
        message: e.to_string(),
    }
}

/// Helper trait making `query_row` return `Option` on not-found.
pub(crate) trait OptionalRow<T> {
    fn optional(self) -> Result<Option<T>, rusqlite::Error>;
}

impl<T> OptionalRow<T> for Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>, rusqlite::Error> {
        match self {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

fn enum_to_json_str<T: serde::Serialize>(value: &T) -> Result<String, StorageError> {
    let json = serde_json::to_string(value).map_err(|e| StorageError::SqliteError {
        message: e.to_string(),
    })?;
    Ok(json.trim_matches('"').to_string())
}

fn enum_from_json_str<T: serde::de::DeserializeOwned>(s: &str) -> Result<T, StorageError> {
    serde_json::from_str(&format!("\"{s}\"")).map_err(|e| StorageError::SqliteError {
        message: format!("parse '{s}': {e}"),
    })
}

pub(crate) use enum_from_json_str as parse_enum;
pub(crate) use enum_to_json_str as serialize_enum;
