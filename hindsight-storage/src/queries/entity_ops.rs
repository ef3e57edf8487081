//! Entity CRUD and the M:N `entity_links` table.

use std::collections::BTreeSet;

use rusqlite::{params, Connection, Row};

use hindsight_core::errors::StorageError;
use hindsight_core::{BankId, Entity, EntityType};

use crate::queries::{parse_enum, serialize_enum, to_storage_err, OptionalRow};

pub fn insert_entity(conn: &Connection, entity: &Entity) -> Result<(), StorageError> {
    let type_str = serialize_enum(&entity.entity_type)?;
    let aliases_json = serde_json::to_string(&entity.aliases).map_err(|e| StorageError::SqliteError {
        message: e.to_string(),
    })?;
    conn.execute(
        "INSERT INTO entities (id, bank_id, canonical_name, entity_type, aliases)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![entity.id, entity.bank_id.as_str(), entity.canonical_name, type_str, aliases_json],
    )
    .map_err(to_storage_err)?;
    Ok(())
}

pub fn get_entity(conn: &Connection, id: &str) -> Result<Option<Entity>, StorageError> {
    let mut stmt = conn
        .prepare(
            "SELECT id, bank_id, canonical_name, entity_type, aliases FROM entities WHERE id = ?1",
        )
        .map_err(to_storage_err)?;
    stmt.query_row(params![id], row_to_entity)
        .optional()
        .map_err(to_storage_err)?
        .transpose()
}

/// Candidates for entity resolution within a bank: every entity whose
/// canonical name or alias case-insensitively matches `name`, or whose
/// type matches (for Levenshtein-ratio comparison by the caller).
pub fn candidates_by_type(
    conn: &Connection,
    bank_id: &str,
    entity_type: EntityType,
) -> Result<Vec<Entity>, StorageError> {
    let type_str = serialize_enum(&entity_type)?;
    let mut stmt = conn
        .prepare(
            "SELECT id, bank_id, canonical_name, entity_type, aliases
             FROM entities WHERE bank_id = ?1 AND entity_type = ?2",
        )
        .map_err(to_storage_err)?;
    let rows = stmt
        .query_map(params![bank_id, type_str], row_to_entity)
        .map_err(to_storage_err)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row.map_err(to_storage_err)??);
    }
    Ok(out)
}

/// Exact case-folded canonical-name or alias match within a bank.
pub fn find_by_name(
    conn: &Connection,
    bank_id: &str,
    name: &str,
) -> Result<Option<Entity>, StorageError> {
    let mut stmt = conn
        .prepare(
            "SELECT id, bank_id, canonical_name, entity_type, aliases
             FROM entities WHERE bank_id = ?1 AND canonical_name = ?2 COLLATE NOCASE",
        )
        .map_err(to_storage_err)?;
    if let Some(found) = stmt
        .query_row(params![bank_id, name], row_to_entity)
        .optional()
        .map_err(to_storage_err)?
        .transpose()?
    {
        return Ok(Some(found));
    }

    // Alias match: aliases are stored as a JSON array, so fall back to an
    // in-memory scan restricted by bank.
    let mut stmt = conn
        .prepare("SELECT id, bank_id, canonical_name, entity_type, aliases FROM entities WHERE bank_id = ?1")
        .map_err(to_storage_err)?;
    let rows = stmt.query_map(params![bank_id], row_to_entity).map_err(to_storage_err)?;
    for row in rows {
        let entity = row.map_err(to_storage_err)??;
        if entity.matches_name(name) {
            return Ok(Some(entity));
        }
    }
    Ok(None)
}

pub fn add_alias(conn: &Connection, entity_id: &str, alias: &str) -> Result<(), StorageError> {
    let Some(mut entity) = get_entity(conn, entity_id)? else {
        return Err(StorageError::UnitNotFound {
            id: entity_id.to_string(),
        });
    };
    entity.aliases.insert(alias.to_string());
    let aliases_json = serde_json::to_string(&entity.aliases).map_err(|e| StorageError::SqliteError {
        message: e.to_string(),
    })?;
    conn.execute(
        "UPDATE entities SET aliases = ?2 WHERE id = ?1",
        params![entity_id, aliases_json],
    )
    .map_err(to_storage_err)?;
    Ok(())
}

pub fn link_unit_to_entity(conn: &Connection, unit_id: &str, entity_id: &str) -> Result<(), StorageError> {
    conn.execute(
        "INSERT OR IGNORE INTO entity_links (unit_id, entity_id) VALUES (?1, ?2)",
        params![unit_id, entity_id],
    )
    .map_err(to_storage_err)?;
    Ok(())
}

/// Units (by id) mentioning `entity_id`, used both by the observation
/// worker and by ingest when wiring new entity
/// edges against existing units.
pub fn units_mentioning(conn: &Connection, entity_id: &str) -> Result<Vec<String>, StorageError> {
    let mut stmt = conn
        .prepare("SELECT unit_id FROM entity_links WHERE entity_id = ?1")
        .map_err(to_storage_err)?;
    let rows = stmt
        .query_map(params![entity_id], |row| row.get::<_, String>(0))
        .map_err(to_storage_err)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(to_storage_err)
}

/// Every entity id linked from `unit_id`, used to attach observations
/// when `include_entities` is set.
pub fn entities_for_unit(conn: &Connection, unit_id: &str) -> Result<Vec<String>, StorageError> {
    let mut stmt = conn
        .prepare("SELECT entity_id FROM entity_links WHERE unit_id = ?1")
        .map_err(to_storage_err)?;
    let rows = stmt
        .query_map(params![unit_id], |row| row.get::<_, String>(0))
        .map_err(to_storage_err)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(to_storage_err)
}

fn row_to_entity(row: &Row<'_>) -> rusqlite::Result<Result<Entity, StorageError>> {
    Ok(try_row_to_entity(row))
}

fn try_row_to_entity(row: &Row<'_>) -> Result<Entity, StorageError> {
    let aliases_json: String = row.get(4).map_err(to_storage_err)?;
    let aliases: BTreeSet<String> = serde_json::from_str(&aliases_json).map_err(|e| StorageError::SqliteError {
        message: e.to_string(),
    })?;
    let type_str: String = row.get(3).map_err(to_storage_err)?;
    Ok(Entity {
        id: row.get(0).map_err(to_storage_err)?,
        bank_id: BankId::new(row.get::<_, String>(1).map_err(to_storage_err)?),
        canonical_name: row.get(2).map_err(to_storage_err)?,
        entity_type: parse_enum::<EntityType>(&type_str)?,
        aliases,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrations::run_migrations;

    fn entity(id: &str, name: &str) -> Entity {
        Entity::new(id.into(), BankId::new("b1"), name.into(), EntityType::Org)
    }

    #[test]
    fn find_by_name_is_case_insensitive() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        insert_entity(&conn, &entity("e1", "Google")).unwrap();
        let found = find_by_name(&conn, "b1", "google").unwrap().unwrap();
        assert_eq!(found.id, "e1");
    }

    #[test]
    fn find_by_name_matches_aliases() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        insert_entity(&conn, &entity("e1", "Google")).unwrap();
        add_alias(&conn, "e1", "Alphabet").unwrap();
        let found = find_by_name(&conn, "b1", "alphabet").unwrap().unwrap();
        assert_eq!(found.id, "e1");
    }

    #[test]
    fn units_mentioning_round_trips_links() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        insert_entity(&conn, &entity("e1", "Google")).unwrap();
        conn.execute(
            "INSERT INTO memory_units (id, bank_id, text, embedding, mentioned_at, context, fact_type, access_count, search_vector, content_hash)
             VALUES ('u1','b1','t','','2024-01-01T00:00:00Z',NULL,'world',0,'t','h')",
            [],
        )
        .unwrap();
        link_unit_to_entity(&conn, "u1", "e1").unwrap();
        assert_eq!(units_mentioning(&conn, "e1").unwrap(), vec!["u1".to_string()]);
        assert_eq!(entities_for_unit(&conn, "u1").unwrap(), vec!["e1".to_string()]);
    }
}
