//! Temporal range lookup: facts whose `[occurred_start,
//! occurred_end]` overlaps a query interval, using half-open overlap
//! semantics (`a.start < b.end && b.start < a.end`). Units that carry no
//! `occurred_*` metadata never match a range lookup.

use chrono::{DateTime, Utc};
use rusqlite::types::ToSql;
use rusqlite::Connection;

use hindsight_core::errors::StorageError;
use hindsight_core::FactType;

use crate::queries::{serialize_enum, to_storage_err};

/// Units in `bank_id`, restricted to `fact_types`, whose occurred interval
/// overlaps `[interval_start, interval_end)`.
pub fn range_lookup(
    conn: &Connection,
    bank_id: &str,
    fact_types: &[FactType],
    interval_start: DateTime<Utc>,
    interval_end: DateTime<Utc>,
) -> Result<Vec<String>, StorageError> {
    if fact_types.is_empty() {
        return Ok(Vec::new());
    }

    let type_strs = fact_types
        .iter()
        .map(serialize_enum)
        .collect::<Result<Vec<_>, _>>()?;
    let placeholders = type_strs.iter().map(|_| "?").collect::<Vec<_>>().join(", ");
    let sql = format!(
        "SELECT id FROM memory_units
         WHERE bank_id = ?
           AND fact_type IN ({placeholders})
           AND occurred_start IS NOT NULL
           AND occurred_end IS NOT NULL
           AND occurred_start < ?
           AND ? < occurred_end"
    );

    let start_str = interval_start.to_rfc3339();
    let end_str = interval_end.to_rfc3339();

    let mut stmt = conn.prepare(&sql).map_err(to_storage_err)?;
    let mut params: Vec<&dyn ToSql> = Vec::with_capacity(3 + type_strs.len());
    params.push(&bank_id);
    for t in &type_strs {
        params.push(t);
    }
    params.push(&end_str);
    params.push(&start_str);

    stmt.query_map(params.as_slice(), |row| row.get::<_, String>(0))
        .map_err(to_storage_err)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(to_storage_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrations::run_migrations;
    use crate::queries::memory_crud::insert_unit;
    use chrono::{Duration, TimeZone};
    use hindsight_core::{BankId, MemoryUnit};

    fn unit(id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> MemoryUnit {
        MemoryUnit::new(
            id.into(),
            BankId::new("b1"),
            format!("fact {id}"),
            vec![0.0; hindsight_core::EMBEDDING_DIM],
            Some(start),
            Some(end),
            Utc::now(),
            None,
            FactType::World,
            None,
        )
        .unwrap()
    }

    #[test]
    fn half_open_overlap_excludes_touching_interval() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        let start = Utc.with_ymd_and_hms(2023, 6, 1, 0, 0, 0).unwrap();
        let end = start + Duration::days(1);
        insert_unit(&conn, &unit("u1", start, end)).unwrap();

        // Querying [end, end+1day) must not match u1 (half-open touch).
        let touching = range_lookup(
            &conn,
            "b1",
            &[FactType::World],
            end,
            end + Duration::days(1),
        )
        .unwrap();
        assert!(touching.is_empty());

        let overlapping = range_lookup(
            &conn,
            "b1",
            &[FactType::World],
            start - Duration::hours(1),
            start + Duration::hours(1),
        )
        .unwrap();
        assert_eq!(overlapping, vec!["u1".to_string()]);
    }
}
