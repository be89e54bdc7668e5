//! Health Routes
//!
//! Health check endpoints for monitoring and Kubernetes probes.
//!
//! - GET /health/live - Liveness probe (process is alive)
//! - GET /health/ready - Readiness probe (store answers queries)
//! - GET /health - Full health status

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::api::dto::HealthResponse;
use crate::api::state::AppState;

/// GET /health/live
///
/// Returns 200 if the process is alive, no dependency checks.
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// GET /health/ready
///
/// Returns 200 if the store can be queried, 503 otherwise.
pub async fn readiness(State(state): State<Arc<AppState>>) -> StatusCode {
    match state.store.summary() {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

/// GET /health
///
/// Full health status with dataset counts.
pub async fn full_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let version = env!("CARGO_PKG_VERSION").to_string();
    let uptime_seconds = state.uptime_seconds();

    let response = match state.store.summary() {
        Ok(summary) => HealthResponse {
            status: "healthy".to_string(),
            store: "ok".to_string(),
            observations: Some(summary.observations),
            stations: Some(summary.stations),
            latest_date: summary.last_date,
            uptime_seconds,
            version,
        },
        Err(e) => {
            tracing::warn!(error = %e, "Health check could not query store");
            HealthResponse {
                status: "unhealthy".to_string(),
                store: "error".to_string(),
                observations: None,
                stations: None,
                latest_date: None,
                uptime_seconds,
                version,
            }
        }
    };

    Json(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_liveness() {
        let status = liveness().await;
        assert_eq!(status, StatusCode::OK);
    }
}
