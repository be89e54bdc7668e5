//! CSV Import
//!
//! Loads the dataset's two CSV files into a writable store.
//!
//! # CSV Formats
//!
//! - **Measurements** (has headers): `station,date,prcp,tobs`, `prcp` may be empty
//! - **Stations** (has headers): `station,name,latitude,longitude,elevation`

use super::error::{StoreError, StoreResult};
use super::types::{Observation, Station};
use super::SqliteStore;
use rusqlite::{params, Connection};
use serde::de::DeserializeOwned;
use std::io::Read;
use std::path::Path;

/// Result of an import run
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ImportReport {
    pub observations: usize,
    pub stations: usize,
    pub rows_failed: usize,
    pub errors: Vec<String>,
}

/// Create a new store at `path` and load both CSV files into it.
///
/// Either both files land or the file at `path` is removed again, so a
/// failed build never leaves a store that opens cleanly but holds partial data.
pub fn build_store(path: &Path, stations: &Path, measurements: &Path) -> StoreResult<ImportReport> {
    if path.exists() {
        return Err(StoreError::AlreadyExists(path.to_path_buf()));
    }

    let result = SqliteStore::create(path).and_then(|store| {
        let mut importer = Importer::new(&store);
        importer.load_all_files(stations, measurements)?;
        Ok(importer.finish())
    });

    if result.is_err() && path.exists() {
        if let Err(e) = std::fs::remove_file(path) {
            tracing::warn!("Failed to remove partial store {:?}: {}", path, e);
        }
    }

    result
}

/// Writes observations and stations into a [`SqliteStore`]
pub struct Importer<'a> {
    store: &'a SqliteStore,
    report: ImportReport,
}

impl<'a> Importer<'a> {
    pub fn new(store: &'a SqliteStore) -> Self {
        Self {
            store,
            report: ImportReport::default(),
        }
    }

    /// Insert observations in a single transaction
    pub fn insert_observations(&mut self, rows: &[Observation]) -> StoreResult<usize> {
        let mut conn = self.store.lock()?;
        let tx = conn.transaction()?;
        insert_observation_rows(&tx, rows)?;
        tx.commit()?;

        self.report.observations += rows.len();
        Ok(rows.len())
    }

    /// Insert stations in a single transaction
    pub fn insert_stations(&mut self, rows: &[Station]) -> StoreResult<usize> {
        let mut conn = self.store.lock()?;
        let tx = conn.transaction()?;
        insert_station_rows(&tx, rows)?;
        tx.commit()?;

        self.report.stations += rows.len();
        Ok(rows.len())
    }

    /// Load a measurements CSV file
    pub fn load_observations_file(&mut self, path: &Path) -> StoreResult<usize> {
        let file = std::fs::File::open(path)?;
        self.load_observations(file)
    }

    /// Load a stations CSV file
    pub fn load_stations_file(&mut self, path: &Path) -> StoreResult<usize> {
        let file = std::fs::File::open(path)?;
        self.load_stations(file)
    }

    /// Load measurements from any CSV reader
    pub fn load_observations<R: Read>(&mut self, reader: R) -> StoreResult<usize> {
        let rows = self.parse_observations(reader)?;
        let count = self.insert_observations(&rows)?;
        tracing::info!(rows = count, "Loaded measurements");
        Ok(count)
    }

    /// Load stations from any CSV reader
    pub fn load_stations<R: Read>(&mut self, reader: R) -> StoreResult<usize> {
        let rows = self.parse_stations(reader)?;
        let count = self.insert_stations(&rows)?;
        tracing::info!(rows = count, "Loaded stations");
        Ok(count)
    }

    /// Load both CSV files; nothing is written unless both parse.
    pub fn load_all_files(&mut self, stations: &Path, measurements: &Path) -> StoreResult<()> {
        let stations = std::fs::File::open(stations)?;
        let measurements = std::fs::File::open(measurements)?;
        self.load_all(stations, measurements)
    }

    /// Parse both readers, then insert every row in one transaction
    pub fn load_all<S: Read, M: Read>(&mut self, stations: S, measurements: M) -> StoreResult<()> {
        let stations = self.parse_stations(stations)?;
        let observations = self.parse_observations(measurements)?;

        let mut conn = self.store.lock()?;
        let tx = conn.transaction()?;
        insert_station_rows(&tx, &stations)?;
        insert_observation_rows(&tx, &observations)?;
        tx.commit()?;

        self.report.stations += stations.len();
        self.report.observations += observations.len();
        tracing::info!(
            stations = stations.len(),
            observations = observations.len(),
            "Loaded dataset"
        );
        Ok(())
    }

    /// Finish and return the accumulated report
    pub fn finish(self) -> ImportReport {
        self.report
    }

    fn parse_observations<R: Read>(&mut self, reader: R) -> StoreResult<Vec<Observation>> {
        let failed_before = self.report.rows_failed;
        let mut rows = Vec::new();
        for (line, row) in self.parse::<Observation, _>(reader)? {
            if self.accept_date(line, &row.date) {
                rows.push(row);
            }
        }
        self.ensure_usable(rows.len(), failed_before)?;
        Ok(rows)
    }

    fn parse_stations<R: Read>(&mut self, reader: R) -> StoreResult<Vec<Station>> {
        let failed_before = self.report.rows_failed;
        let rows: Vec<Station> = self
            .parse::<Station, _>(reader)?
            .into_iter()
            .map(|(_, row)| row)
            .collect();
        self.ensure_usable(rows.len(), failed_before)?;
        Ok(rows)
    }

    /// Deserialize every record, paired with its 1-based line number
    fn parse<T: DeserializeOwned, R: Read>(&mut self, reader: R) -> StoreResult<Vec<(usize, T)>> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        // A header mismatch fails every row; surface it once instead.
        rdr.headers()?;

        let mut rows = Vec::new();
        for (idx, result) in rdr.deserialize::<T>().enumerate() {
            let line = idx + 2;
            match result {
                Ok(row) => rows.push((line, row)),
                Err(e) => self.reject(line, e.to_string()),
            }
        }

        Ok(rows)
    }

    fn ensure_usable(&self, usable: usize, failed_before: usize) -> StoreResult<()> {
        let failed = self.report.rows_failed - failed_before;
        if usable == 0 && failed > 0 {
            return Err(StoreError::Import(format!(
                "no usable rows ({} failed)",
                failed
            )));
        }
        Ok(())
    }

    // Lexicographic date filtering is only sound for zero-padded ISO dates.
    fn accept_date(&mut self, line: usize, date: &str) -> bool {
        if chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok() && date.len() == 10 {
            true
        } else {
            self.reject(line, format!("date {:?} is not YYYY-MM-DD", date));
            false
        }
    }

    fn reject(&mut self, line: usize, error: String) {
        tracing::warn!(line, error = %error, "Skipping CSV row");
        self.report.rows_failed += 1;
        self.report.errors.push(format!("line {}: {}", line, error));
    }
}

fn insert_observation_rows(conn: &Connection, rows: &[Observation]) -> rusqlite::Result<()> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO measurement (station, date, prcp, tobs) VALUES (?1, ?2, ?3, ?4)",
    )?;
    for row in rows {
        stmt.execute(params![row.station, row.date, row.prcp, row.tobs])?;
    }
    Ok(())
}

fn insert_station_rows(conn: &Connection, rows: &[Station]) -> rusqlite::Result<()> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO station (station, name, latitude, longitude, elevation)
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )?;
    for row in rows {
        stmt.execute(params![
            row.station,
            row.name,
            row.latitude,
            row.longitude,
            row.elevation
        ])?;
    }
    Ok(())
}
