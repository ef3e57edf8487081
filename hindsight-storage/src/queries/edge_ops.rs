//! Durable edge CRUD. The `hindsight-graph` crate holds the
//! in-process copy used by spreading activation; this table is the
//! durable source of truth it is hydrated from at startup and kept in
//! sync with by ingest.

use rusqlite::{params, Connection, Row};

use hindsight_core::errors::StorageError;
use hindsight_core::{CausalKind, Edge, LinkType};

use crate::queries::{parse_enum, serialize_enum, to_storage_err};

pub fn insert_edge(conn: &Connection, edge: &Edge) -> Result<(), StorageError> {
    let link_type_str = serialize_enum(&edge.link_type)?;
    let causal_kind_str = edge
        .causal_kind
        .map(|k| serialize_enum(&k))
        .transpose()?;
    conn.execute(
        "INSERT OR IGNORE INTO edges (src, dst, link_type, weight, causal_kind)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![edge.src, edge.dst, link_type_str, edge.weight, causal_kind_str],
    )
    .map_err(to_storage_err)?;
    Ok(())
}

/// Insert an edge and, if it is bidirectional (entity/semantic), its
/// mirror in the opposite direction.
pub fn insert_edge_with_mirror(conn: &Connection, edge: &Edge) -> Result<(), StorageError> {
    insert_edge(conn, edge)?;
    if edge.is_bidirectional() {
        let mirrored = Edge {
            src: edge.dst.clone(),
            dst: edge.src.clone(),
            link_type: edge.link_type,
            weight: edge.weight,
            causal_kind: edge.causal_kind,
        };
        insert_edge(conn, &mirrored)?;
    }
    Ok(())
}

pub fn edges_for_unit(conn: &Connection, unit_id: &str) -> Result<Vec<Edge>, StorageError> {
    let mut stmt = conn
        .prepare(
            "SELECT src, dst, link_type, weight, causal_kind FROM edges
             WHERE src = ?1 OR dst = ?1",
        )
        .map_err(to_storage_err)?;
    let rows = stmt.query_map(params![unit_id], row_to_edge).map_err(to_storage_err)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row.map_err(to_storage_err)??);
    }
    Ok(out)
}

/// Remove every edge touching `unit_id`, mirroring `GraphManager::remove_edges_for`.
pub fn remove_edges_for(conn: &Connection, unit_id: &str) -> Result<usize, StorageError> {
    let count = conn
        .execute(
            "DELETE FROM edges WHERE src = ?1 OR dst = ?1",
            params![unit_id],
        )
        .map_err(to_storage_err)?;
    Ok(count)
}

/// All edges in the store, used to hydrate `GraphManager` at startup.
pub fn all_edges(conn: &Connection) -> Result<Vec<Edge>, StorageError> {
    let mut stmt = conn
        .prepare("SELECT src, dst, link_type, weight, causal_kind FROM edges")
        .map_err(to_storage_err)?;
    let rows = stmt.query_map([], row_to_edge).map_err(to_storage_err)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row.map_err(to_storage_err)??);
    }
    Ok(out)
}

fn row_to_edge(row: &Row<'_>) -> rusqlite::Result<Result<Edge, StorageError>> {
    Ok(try_row_to_edge(row))
}

fn try_row_to_edge(row: &Row<'_>) -> Result<Edge, StorageError> {
    let link_type_str: String = row.get(2).map_err(to_storage_err)?;
    let causal_kind_str: Option<String> = row.get(4).map_err(to_storage_err)?;
    Ok(Edge {
        src: row.get(0).map_err(to_storage_err)?,
        dst: row.get(1).map_err(to_storage_err)?,
        link_type: parse_enum::<LinkType>(&link_type_str)?,
        weight: row.get(3).map_err(to_storage_err)?,
        causal_kind: causal_kind_str
            .as_deref()
            .map(parse_enum::<CausalKind>)
            .transpose()?,
    })
}
