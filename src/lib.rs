//! # Climate
//!
//! Read-only JSON API over a weather station dataset: daily precipitation and
//! temperature readings plus station metadata, kept in one SQLite file.
//!
//! ## Modules
//!
//! - [`store`]: Declared schema, CSV import and the query layer
//! - [`api`]: REST API server with Axum
//! - [`config`]: TOML configuration with environment overrides
//! - [`logging`]: Tracing subscriber setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use climate::store::{ClimateStore, SqliteStore};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = SqliteStore::open("Resources/hawaii.sqlite")?;
//!
//!     if let Some(latest) = store.latest_date()? {
//!         let stats = store.temperature_stats("2017-01-01", Some(&latest))?;
//!         println!("2017 so far: {:?}", stats);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod logging;
pub mod store;

// Re-export top-level types for convenience
pub use store::{
    ClimateStore, Observation, SqliteStore, Station, StationReading, StoreError, StoreResult,
    StoreSummary, TemperatureStats,
};

pub use api::{build_router, serve, ApiError, AppState};

pub use config::{ApiConfig, Config, ConfigError, ConfigLoad, LoggingConfig, StoreConfig};
