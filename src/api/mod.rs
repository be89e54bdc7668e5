//! Climate REST API
//!
//! HTTP API layer, built with Axum. Every route is a read-only GET.
//!
//! # Endpoints
//!
//! ## Home
//! - `GET /` - HTML listing of the routes below
//!
//! ## Observations
//! - `GET /api/v1.0/precipitation` - Precipitation by date, last year of data
//! - `GET /api/v1.0/stations` - Station ids with observations
//! - `GET /api/v1.0/tobs` - Temperature by date, last year of data
//!
//! ## Temperature statistics
//! - `GET /api/v1.0/:start` - Min/max/avg temperature from `start` on
//! - `GET /api/v1.0/:start/:end` - Min/max/avg temperature from `start` to `end`
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//! - `GET /health` - Full health status
//!
//! # Example
//!
//! ```rust,ignore
//! use climate::api::{serve, AppState};
//! use climate::config::ApiConfig;
//! use climate::store::SqliteStore;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(SqliteStore::open("Resources/hawaii.sqlite")?);
//!     let config = ApiConfig::default();
//!
//!     let state = AppState::new(store, config.clone());
//!     serve(state, &config).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod dates;
pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

use axum::{http::HeaderValue, routing::get, Router};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::ApiConfig;

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/precipitation", get(routes::series::precipitation))
        .route("/stations", get(routes::stations::list_stations))
        .route("/tobs", get(routes::series::tobs))
        // Static segments above take priority over these captures
        .route("/:start", get(routes::temperature::stats_from))
        .route("/:start/:end", get(routes::temperature::stats_between));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    let cors = cors_layer(&state.config);
    let shared_state = Arc::new(state);

    Router::new()
        .route("/", get(routes::home::index))
        .nest("/api/v1.0", api_routes)
        .nest("/health", health_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(shared_state)
}

fn cors_layer(config: &ApiConfig) -> CorsLayer {
    if config.cors_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new().allow_origin(origins)
}

/// Start the API server
pub async fn serve(state: AppState, config: &ApiConfig) -> Result<(), ApiError> {
    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Climate API listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Climate API shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::testing::{obs, sample_store, station, store_with};
    use crate::store::{SqliteStore, StoreError, StoreResult, StoreSummary};
    use crate::store::{ClimateStore, DateReadings, DateSeries, Station, TemperatureStats};
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::util::ServiceExt;

    fn create_test_app(store: SqliteStore) -> Router {
        create_app_with_config(store, ApiConfig::default())
    }

    fn create_app_with_config(store: SqliteStore, config: ApiConfig) -> Router {
        build_router(AppState::new(Arc::new(store), config))
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    #[tokio::test]
    async fn test_index_is_html() {
        let app = create_test_app(sample_store());

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
        assert!(content_type.starts_with("text/html"));
    }

    #[tokio::test]
    async fn test_precipitation_last_year_only() {
        let app = create_test_app(sample_store());
        let (status, body) = get_json(app, "/api/v1.0/precipitation").await;

        assert_eq!(status, StatusCode::OK);
        let series = body.as_object().unwrap();
        assert!(series.keys().all(|d| d.as_str() >= "2016-08-23"));
        assert!(!series.contains_key("2016-08-22"));
        assert!(series.contains_key("2016-08-23"));
        assert_eq!(series["2017-08-23"], json!(0.08));
        assert_eq!(series["2017-01-01"], Value::Null);
    }

    #[tokio::test]
    async fn test_precipitation_by_station() {
        let app = create_test_app(sample_store());
        let (status, body) = get_json(app, "/api/v1.0/precipitation?by_station=true").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["2016-08-23"],
            json!([
                {"station": "USC00513117", "value": 0.15},
                {"station": "USC00519397", "value": 0.0},
            ])
        );
    }

    #[tokio::test]
    async fn test_precipitation_empty_store() {
        let app = create_test_app(SqliteStore::in_memory().unwrap());
        let (status, body) = get_json(app, "/api/v1.0/precipitation").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({}));
    }

    #[tokio::test]
    async fn test_tobs_last_year_only() {
        let app = create_test_app(sample_store());
        let (status, body) = get_json(app, "/api/v1.0/tobs").await;

        assert_eq!(status, StatusCode::OK);
        let series = body.as_object().unwrap();
        assert!(series.keys().all(|d| d.as_str() >= "2016-08-23"));
        assert_eq!(series["2017-01-07"], json!(80.0));
    }

    #[tokio::test]
    async fn test_tobs_by_station() {
        let app = create_test_app(sample_store());
        let (_, body) = get_json(app, "/api/v1.0/tobs?by_station=true").await;

        let day = body["2016-08-23"].as_array().unwrap();
        assert_eq!(day.len(), 2);
    }

    #[tokio::test]
    async fn test_stations_set_semantics() {
        let store = store_with(
            &[
                obs("A", "2017-01-01", None, 70.0),
                obs("A", "2017-01-02", None, 71.0),
                obs("B", "2017-01-01", None, 72.0),
            ],
            &[station("A", "Alpha"), station("B", "Beta"), station("C", "Gamma")],
        );
        let app = create_test_app(store);
        let (status, body) = get_json(app, "/api/v1.0/stations").await;

        assert_eq!(status, StatusCode::OK);
        let mut ids: Vec<String> = serde_json::from_value(body).unwrap();
        ids.sort();
        assert_eq!(ids, vec!["A", "B"]);
    }

    #[tokio::test]
    async fn test_stats_between() {
        let store = store_with(
            &[
                obs("A", "2016-12-31", None, 50.0),
                obs("A", "2017-01-01", None, 70.0),
                obs("B", "2017-01-03", None, 75.0),
                obs("A", "2017-01-07", None, 80.0),
                obs("A", "2017-01-08", None, 99.0),
            ],
            &[],
        );
        let app = create_test_app(store);
        let (status, body) = get_json(app, "/api/v1.0/2017-01-01/2017-01-07").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "Min temperature": 70.0,
                "Max temperature": 80.0,
                "Avg temperature": 75.0,
            })
        );
    }

    #[tokio::test]
    async fn test_stats_from() {
        let app = create_test_app(sample_store());
        let (status, body) = get_json(app, "/api/v1.0/2017-01-04").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["Min temperature"], json!(75.0));
        assert_eq!(body["Max temperature"], json!(82.0));
    }

    #[tokio::test]
    async fn test_stats_inverted_range_is_null() {
        let app = create_test_app(sample_store());
        let (status, body) = get_json(app, "/api/v1.0/2017-01-07/2017-01-01").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["Min temperature"].is_null());
        assert!(body["Max temperature"].is_null());
        assert!(body["Avg temperature"].is_null());
    }

    #[tokio::test]
    async fn test_stats_rejects_malformed_date() {
        let app = create_test_app(sample_store());
        let (status, body) = get_json(app, "/api/v1.0/2017-1-1").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert!(body["request_id"].is_string());

        let app = create_test_app(sample_store());
        let (status, _) = get_json(app, "/api/v1.0/2017-01-01/tomorrow").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_stats_malformed_date_without_validation() {
        let config = ApiConfig {
            validate_dates: false,
            ..ApiConfig::default()
        };
        let app = create_app_with_config(sample_store(), config);
        let (status, body) = get_json(app, "/api/v1.0/yesterday").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["Min temperature"].is_null());
        assert!(body["Avg temperature"].is_null());
        // Text comparison: a bare year still selects that year's rows
        let config = ApiConfig {
            validate_dates: false,
            ..ApiConfig::default()
        };
        let app = create_app_with_config(sample_store(), config);
        let (status, body) = get_json(app, "/api/v1.0/2017").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["Min temperature"].is_number());
    }

    #[tokio::test]
    async fn test_health_live() {
        let app = create_test_app(sample_store());
        let (status, _) = get_json(app, "/health/live").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_ready() {
        let app = create_test_app(sample_store());
        let (status, _) = get_json(app, "/health/ready").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_full() {
        let app = create_test_app(sample_store());
        let (status, body) = get_json(app, "/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["observations"], 8);
        assert_eq!(body["latest_date"], "2017-08-23");
    }

    /// Store double whose every query fails
    struct BrokenStore;

    impl BrokenStore {
        fn fail<T>() -> StoreResult<T> {
            Err(StoreError::Lock("poisoned".to_string()))
        }
    }

    impl ClimateStore for BrokenStore {
        fn latest_date(&self) -> StoreResult<Option<String>> {
            Self::fail()
        }
        fn precipitation_since(&self, _: &str) -> StoreResult<DateSeries> {
            Self::fail()
        }
        fn distinct_stations(&self) -> StoreResult<Vec<String>> {
            Self::fail()
        }
        fn temperatures_since(&self, _: &str) -> StoreResult<DateSeries> {
            Self::fail()
        }
        fn temperature_stats(&self, _: &str, _: Option<&str>) -> StoreResult<TemperatureStats> {
            Self::fail()
        }
        fn precipitation_readings_since(&self, _: &str) -> StoreResult<DateReadings> {
            Self::fail()
        }
        fn temperature_readings_since(&self, _: &str) -> StoreResult<DateReadings> {
            Self::fail()
        }
        fn stations(&self) -> StoreResult<Vec<Station>> {
            Self::fail()
        }
        fn summary(&self) -> StoreResult<StoreSummary> {
            Self::fail()
        }
    }

    fn broken_app() -> Router {
        build_router(AppState::new(Arc::new(BrokenStore), ApiConfig::default()))
    }

    #[tokio::test]
    async fn test_store_failure_is_500() {
        let (status, body) = get_json(broken_app(), "/api/v1.0/stations").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], "STORE_ERROR");

        let (status, _) = get_json(broken_app(), "/api/v1.0/precipitation").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_health_reports_broken_store() {
        let (status, _) = get_json(broken_app(), "/health/ready").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

        let (status, body) = get_json(broken_app(), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "unhealthy");
    }
}
