//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.
//! These types are serialized/deserialized to/from JSON.

use serde::{Deserialize, Serialize};

use crate::store::TemperatureStats;

/// Query parameters accepted by `/precipitation` and `/tobs`
#[derive(Debug, Default, Deserialize)]
pub struct SeriesParams {
    /// Return every station's reading per date instead of one value per date
    #[serde(default)]
    pub by_station: bool,
}

/// Body of `/api/v1.0/<start>` and `/api/v1.0/<start>/<end>`
///
/// Fields are `null` when no observation matched.
#[derive(Debug, Serialize, PartialEq)]
pub struct TemperatureStatsResponse {
    #[serde(rename = "Min temperature")]
    pub min: Option<f64>,
    #[serde(rename = "Max temperature")]
    pub max: Option<f64>,
    #[serde(rename = "Avg temperature")]
    pub avg: Option<f64>,
}

impl From<TemperatureStats> for TemperatureStatsResponse {
    fn from(stats: TemperatureStats) -> Self {
        Self {
            min: stats.min,
            max: stats.max,
            avg: stats.avg,
        }
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// "healthy" or "unhealthy"
    pub status: String,
    /// "ok" or "error"
    pub store: String,
    pub observations: Option<u64>,
    pub stations: Option<u64>,
    pub latest_date: Option<String>,
    pub uptime_seconds: u64,
    pub version: String,
}
