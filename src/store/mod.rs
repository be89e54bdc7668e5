//! Climate data store
//!
//! A single SQLite file with two tables: `measurement` (daily readings per
//! station) and `station` (station metadata). The HTTP layer only sees the
//! [`ClimateStore`] trait; [`SqliteStore`] is the production implementation.
//!
//! ## Architecture
//!
//! ```text
//! Route handler → Arc<dyn ClimateStore> → SqliteStore → Mutex<Connection> → hawaii.sqlite
//! ```
//!
//! The server opens the file read-only and verifies the declared schema
//! before serving. Only the CLI opens it for writing.

pub mod error;
pub mod import;
mod queries;
pub mod schema;
pub mod types;

pub use error::{StoreError, StoreResult};
pub use import::{build_store, ImportReport, Importer};
pub use types::{Observation, Station, StationReading, StoreSummary, TemperatureStats};

use rusqlite::{Connection, OpenFlags};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// Date → value, one entry per date
pub type DateSeries = BTreeMap<String, Option<f64>>;

/// Date → every station's value on that date
pub type DateReadings = BTreeMap<String, Vec<StationReading>>;

/// Read-only query surface over the observation dataset
///
/// Dates are ISO `YYYY-MM-DD` strings and every comparison is lexicographic,
/// which matches calendar order only for that exact format.
pub trait ClimateStore: Send + Sync {
    /// Maximum observation date, `None` when the table is empty
    fn latest_date(&self) -> StoreResult<Option<String>>;

    /// Precipitation for every observation dated on or after `since`.
    ///
    /// When several stations report on the same date the row stored last
    /// wins; use [`ClimateStore::precipitation_readings_since`] to keep them all.
    fn precipitation_since(&self, since: &str) -> StoreResult<DateSeries>;

    /// Stations with at least one observation, each listed once
    fn distinct_stations(&self) -> StoreResult<Vec<String>>;

    /// Temperature for every observation dated on or after `since`.
    ///
    /// Same last-write-wins collapse as [`ClimateStore::precipitation_since`].
    fn temperatures_since(&self, since: &str) -> StoreResult<DateSeries>;

    /// Min/avg/max temperature for `start <= date` and, if given, `date <= end`
    fn temperature_stats(&self, start: &str, end: Option<&str>) -> StoreResult<TemperatureStats>;

    /// Per-station precipitation readings grouped by date
    fn precipitation_readings_since(&self, since: &str) -> StoreResult<DateReadings>;

    /// Per-station temperature readings grouped by date
    fn temperature_readings_since(&self, since: &str) -> StoreResult<DateReadings>;

    /// Full station metadata, ordered by station id
    fn stations(&self) -> StoreResult<Vec<Station>>;

    /// Row counts and date span
    fn summary(&self) -> StoreResult<StoreSummary>;
}

/// SQLite-backed [`ClimateStore`]
///
/// One connection shared by every request. The workload is read-only so a
/// mutex around the connection is all the coordination needed.
pub struct SqliteStore {
    conn: Mutex<Connection>,
    path: Option<PathBuf>,
}

impl SqliteStore {
    /// Open an existing store read-only and verify its schema
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(StoreError::Open {
                path: path.to_path_buf(),
                error: "file does not exist".to_string(),
            });
        }

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| StoreError::Open {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        schema::verify_schema(&conn)?;
        tracing::info!(path = %path.display(), "Opened climate store");

        Ok(Self {
            conn: Mutex::new(conn),
            path: Some(path.to_path_buf()),
        })
    }

    /// Open (or create) a store for writing, applying the declared schema
    pub fn create(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| StoreError::Open {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        conn.execute_batch(schema::create_schema())?;
        schema::verify_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
            path: Some(path.to_path_buf()),
        })
    }

    /// Wrap an already-open connection, verifying its schema
    pub fn from_connection(conn: Connection) -> StoreResult<Self> {
        schema::verify_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            path: None,
        })
    }

    /// In-memory store with the declared schema and no rows
    pub fn in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(schema::create_schema())?;
        Self::from_connection(conn)
    }

    /// Path of the backing file, `None` for in-memory stores
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| StoreError::Lock(e.to_string()))
    }
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_open_missing_file() {
        let dir = tempdir().unwrap();
        let err = SqliteStore::open(dir.path().join("absent.sqlite")).unwrap_err();
        assert!(matches!(err, StoreError::Open { .. }));
    }

    #[test]
    fn test_open_rejects_foreign_database() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("other.sqlite");
        {
            let conn = Connection::open(&path).unwrap();
            conn.execute_batch("CREATE TABLE readings (ts INTEGER, value REAL);")
                .unwrap();
        }

        let err = SqliteStore::open(&path).unwrap_err();
        assert!(matches!(err, StoreError::MissingTable(_)));
    }

    #[test]
    fn test_create_then_open_read_only() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("hawaii.sqlite");

        {
            let store = SqliteStore::create(&path).unwrap();
            let mut importer = Importer::new(&store);
            importer
                .insert_observations(&[Observation::new("A", "2017-08-23", Some(0.1), 80.0)])
                .unwrap();
        }

        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(store.path(), Some(path.as_path()));
        assert_eq!(store.latest_date().unwrap().as_deref(), Some("2017-08-23"));
    }

    #[test]
    fn test_read_only_store_rejects_writes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("hawaii.sqlite");
        drop(SqliteStore::create(&path).unwrap());

        let store = SqliteStore::open(&path).unwrap();
        let mut importer = Importer::new(&store);
        let result = importer.insert_observations(&[Observation::new("A", "2017-08-23", None, 80.0)]);
        assert!(result.is_err());
    }

    #[test]
    fn test_store_is_object_safe() {
        let store: std::sync::Arc<dyn ClimateStore> = std::sync::Arc::new(testing::sample_store());
        assert_eq!(store.distinct_stations().unwrap().len(), 2);
    }
}
