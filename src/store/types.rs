//! Core record types for the climate store
//!
//! Mirrors the two tables declared in [`super::schema`] plus the shapes the
//! query layer hands back.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One daily reading from a station
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Station identifier, e.g. `USC00519397`
    pub station: String,
    /// ISO `YYYY-MM-DD` date
    pub date: String,
    /// Precipitation, absent on days the station did not report it
    pub prcp: Option<f64>,
    /// Observed temperature
    pub tobs: f64,
}

impl Observation {
    pub fn new(station: impl Into<String>, date: impl Into<String>, prcp: Option<f64>, tobs: f64) -> Self {
        Self {
            station: station.into(),
            date: date.into(),
            prcp,
            tobs,
        }
    }
}

/// A fixed weather-reporting location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub station: String,
    pub name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub elevation: Option<f64>,
}

/// A single station's value on a given date
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationReading {
    pub station: String,
    pub value: Option<f64>,
}

/// Min/avg/max temperature over a date window
///
/// All three are `None` when no observation falls inside the window.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TemperatureStats {
    pub min: Option<f64>,
    pub avg: Option<f64>,
    pub max: Option<f64>,
}

impl TemperatureStats {
    pub fn is_empty(&self) -> bool {
        self.min.is_none() && self.avg.is_none() && self.max.is_none()
    }
}

/// Overall shape of the stored dataset
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StoreSummary {
    pub observations: u64,
    pub stations: u64,
    pub first_date: Option<String>,
    pub last_date: Option<String>,
}

impl fmt::Display for StoreSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "observations={}, stations={}, span={}..{}",
            self.observations,
            self.stations,
            self.first_date.as_deref().unwrap_or("-"),
            self.last_date.as_deref().unwrap_or("-"),
        )
    }
}
