//! SQL behind [`ClimateStore`] for [`SqliteStore`].
//!
//! Date filters compare the text `date` column against ISO strings, so
//! SQLite's ordinary text ordering does the calendar work.

use super::error::StoreResult;
use super::types::{Station, StationReading, StoreSummary, TemperatureStats};
use super::{ClimateStore, DateReadings, DateSeries, SqliteStore};
use rusqlite::{params, OptionalExtension};

/// Column holding the value for a per-date query
#[derive(Debug, Clone, Copy)]
enum Reading {
    Precipitation,
    Temperature,
}

impl Reading {
    fn column(self) -> &'static str {
        match self {
            Reading::Precipitation => "prcp",
            Reading::Temperature => "tobs",
        }
    }
}

impl SqliteStore {
    fn series_since(&self, reading: Reading, since: &str) -> StoreResult<DateSeries> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare_cached(&format!(
            "SELECT date, {} FROM measurement WHERE date >= ?1 ORDER BY date, rowid",
            reading.column()
        ))?;

        let mut series = DateSeries::new();
        let rows = stmt.query_map(params![since], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, Option<f64>>(1)?))
        })?;
        let mut scanned = 0usize;
        for row in rows {
            let (date, value) = row?;
            // Later stations on the same date replace earlier ones.
            series.insert(date, value);
            scanned += 1;
        }

        tracing::debug!(
            column = reading.column(),
            since,
            scanned,
            dates = series.len(),
            "series query"
        );
        Ok(series)
    }

    fn readings_since(&self, reading: Reading, since: &str) -> StoreResult<DateReadings> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare_cached(&format!(
            "SELECT date, station, {} FROM measurement WHERE date >= ?1 ORDER BY date, station",
            reading.column()
        ))?;

        let mut readings = DateReadings::new();
        let rows = stmt.query_map(params![since], |row| {
            Ok((
                row.get::<_, String>(0)?,
                StationReading {
                    station: row.get(1)?,
                    value: row.get(2)?,
                },
            ))
        })?;
        for row in rows {
            let (date, entry) = row?;
            readings.entry(date).or_insert_with(Vec::new).push(entry);
        }

        tracing::debug!(column = reading.column(), since, dates = readings.len(), "readings query");
        Ok(readings)
    }
}

impl ClimateStore for SqliteStore {
    fn latest_date(&self) -> StoreResult<Option<String>> {
        let conn = self.lock()?;
        // MAX over an empty table yields one NULL row.
        let latest: Option<String> = conn
            .query_row("SELECT MAX(date) FROM measurement", [], |row| {
                row.get::<_, Option<String>>(0)
            })
            .optional()?
            .flatten();
        tracing::debug!(latest = ?latest, "latest_date");
        Ok(latest)
    }

    fn precipitation_since(&self, since: &str) -> StoreResult<DateSeries> {
        self.series_since(Reading::Precipitation, since)
    }

    fn distinct_stations(&self) -> StoreResult<Vec<String>> {
        let conn = self.lock()?;
        let mut stmt =
            conn.prepare_cached("SELECT station FROM measurement GROUP BY station ORDER BY station")?;
        let stations = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        tracing::debug!(count = stations.len(), "distinct_stations");
        Ok(stations)
    }

    fn temperatures_since(&self, since: &str) -> StoreResult<DateSeries> {
        self.series_since(Reading::Temperature, since)
    }

    fn temperature_stats(&self, start: &str, end: Option<&str>) -> StoreResult<TemperatureStats> {
        let conn = self.lock()?;
        let map_row = |row: &rusqlite::Row<'_>| -> rusqlite::Result<TemperatureStats> {
            Ok(TemperatureStats {
                min: row.get(0)?,
                avg: row.get(1)?,
                max: row.get(2)?,
            })
        };

        let stats = match end {
            Some(end) => conn.query_row(
                "SELECT MIN(tobs), AVG(tobs), MAX(tobs) FROM measurement
                 WHERE date >= ?1 AND date <= ?2",
                params![start, end],
                map_row,
            )?,
            None => conn.query_row(
                "SELECT MIN(tobs), AVG(tobs), MAX(tobs) FROM measurement WHERE date >= ?1",
                params![start],
                map_row,
            )?,
        };

        tracing::debug!(start, end = ?end, stats = ?stats, "temperature_stats");
        Ok(stats)
    }

    fn precipitation_readings_since(&self, since: &str) -> StoreResult<DateReadings> {
        self.readings_since(Reading::Precipitation, since)
    }

    fn temperature_readings_since(&self, since: &str) -> StoreResult<DateReadings> {
        self.readings_since(Reading::Temperature, since)
    }

    fn stations(&self) -> StoreResult<Vec<Station>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare_cached(
            "SELECT station, name, latitude, longitude, elevation FROM station ORDER BY station",
        )?;
        let stations = stmt
            .query_map([], |row| {
                Ok(Station {
                    station: row.get(0)?,
                    name: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                    latitude: row.get(2)?,
                    longitude: row.get(3)?,
                    elevation: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(stations)
    }

    fn summary(&self) -> StoreResult<StoreSummary> {
        let conn = self.lock()?;
        let (observations, first_date, last_date) = conn.query_row(
            "SELECT COUNT(*), MIN(date), MAX(date) FROM measurement",
            [],
            |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, Option<String>>(1)?,
                    row.get::<_, Option<String>>(2)?,
                ))
            },
        )?;
        let stations: i64 = conn.query_row("SELECT COUNT(*) FROM station", [], |row| row.get(0))?;

        Ok(StoreSummary {
            observations: observations as u64,
            stations: stations as u64,
            first_date,
            last_date,
        })
    }
}
