//! Temperature Statistics Routes
//!
//! - GET /api/v1.0/:start - Min/max/avg temperature from `start` on
//! - GET /api/v1.0/:start/:end - Min/max/avg temperature between `start` and `end`, inclusive
//!
//! With `api.validate_dates` on, dates other than `YYYY-MM-DD` are rejected
//! with 400. With it off they reach the store unchanged and are compared as
//! text, so a non-ISO string gives a silently wrong window: `2017` covers all
//! of 2017 and `2017-1-1` covers October through December.

use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::api::dates::validate_date;
use crate::api::dto::TemperatureStatsResponse;
use crate::api::error::ApiResult;
use crate::api::state::AppState;

/// GET /api/v1.0/:start
pub async fn stats_from(
    State(state): State<Arc<AppState>>,
    Path(start): Path<String>,
) -> ApiResult<Json<TemperatureStatsResponse>> {
    if state.config.validate_dates {
        validate_date(&start)?;
    }

    let stats = state.store.temperature_stats(&start, None)?;
    Ok(Json(stats.into()))
}

/// GET /api/v1.0/:start/:end
pub async fn stats_between(
    State(state): State<Arc<AppState>>,
    Path((start, end)): Path<(String, String)>,
) -> ApiResult<Json<TemperatureStatsResponse>> {
    if state.config.validate_dates {
        validate_date(&start)?;
        validate_date(&end)?;
    }

    let stats = state.store.temperature_stats(&start, Some(&end))?;
    Ok(Json(stats.into()))
}
