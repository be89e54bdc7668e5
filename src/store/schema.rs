//! Store schema
//!
//! The two tables are declared here rather than discovered at runtime.
//! [`verify_schema`] checks an opened database against the declaration so a
//! wrong or truncated file fails at startup instead of on the first request.

use super::error::{StoreError, StoreResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashSet;

/// Observation table name
pub const MEASUREMENT_TABLE: &str = "measurement";

/// Station metadata table name
pub const STATION_TABLE: &str = "station";

/// A table and the columns the query layer reads from it
#[derive(Debug, Clone, Copy)]
pub struct TableSpec {
    pub name: &'static str,
    pub columns: &'static [&'static str],
}

/// Every table the store must contain
pub const TABLES: [TableSpec; 2] = [
    TableSpec {
        name: MEASUREMENT_TABLE,
        columns: &["station", "date", "prcp", "tobs"],
    },
    TableSpec {
        name: STATION_TABLE,
        columns: &["station", "name", "latitude", "longitude", "elevation"],
    },
];

/// Returns the DDL used when the CLI builds a store from CSV files.
///
/// Matches the layout of the published dataset: a surrogate `id` key on
/// both tables and ISO `YYYY-MM-DD` text dates.
pub fn create_schema() -> &'static str {
    r#"
    CREATE TABLE IF NOT EXISTS measurement (
        id INTEGER PRIMARY KEY,
        station TEXT,
        date TEXT,
        prcp FLOAT,
        tobs FLOAT
    );
    CREATE INDEX IF NOT EXISTS idx_measurement_date ON measurement(date);
    CREATE INDEX IF NOT EXISTS idx_measurement_station ON measurement(station);

    CREATE TABLE IF NOT EXISTS station (
        id INTEGER PRIMARY KEY,
        station TEXT,
        name TEXT,
        latitude FLOAT,
        longitude FLOAT,
        elevation FLOAT
    );
    "#
}

/// Check that every declared table and column is present
pub fn verify_schema(conn: &Connection) -> StoreResult<()> {
    for table in TABLES.iter() {
        let exists: Option<String> = conn
            .query_row(
                "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1",
                params![table.name],
                |row| row.get(0),
            )
            .optional()?;

        if exists.is_none() {
            return Err(StoreError::MissingTable(table.name.to_string()));
        }

        let present = table_columns(conn, table.name)?;
        if let Some(missing) = table.columns.iter().find(|c| !present.contains(**c)) {
            return Err(StoreError::MissingColumn {
                table: table.name.to_string(),
                column: missing.to_string(),
            });
        }

        tracing::debug!(table = table.name, columns = present.len(), "Verified table");
    }

    Ok(())
}

fn table_columns(conn: &Connection, table: &str) -> StoreResult<HashSet<String>> {
    // PRAGMA arguments cannot be bound; table names come from TABLES only.
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", table))?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<Result<HashSet<_>, _>>()?;
    Ok(columns)
}
