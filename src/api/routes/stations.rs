//! Station Routes
//!
//! - GET /api/v1.0/stations - Station ids that have at least one observation

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::error::ApiResult;
use crate::api::state::AppState;

/// GET /api/v1.0/stations
pub async fn list_stations(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<String>>> {
    let stations = state.store.distinct_stations()?;
    Ok(Json(stations))
}
