//! Last-year Series Routes
//!
//! - GET /api/v1.0/precipitation - Precipitation by date for the last year of data
//! - GET /api/v1.0/tobs - Temperature by date for the last year of data
//!
//! "Last year" ends at the latest observation date in the store, not today.
//! By default each date carries a single value and, when several stations
//! reported that day, the one stored last wins. `?by_station=true` returns
//! every station's reading instead.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use crate::api::dates::year_window_start;
use crate::api::dto::SeriesParams;
use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::store::{ClimateStore, DateSeries};

/// GET /api/v1.0/precipitation
pub async fn precipitation(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SeriesParams>,
) -> ApiResult<Response> {
    let Some(since) = last_year_start(state.store.as_ref())? else {
        return Ok(Json(DateSeries::new()).into_response());
    };

    if params.by_station {
        Ok(Json(state.store.precipitation_readings_since(&since)?).into_response())
    } else {
        Ok(Json(state.store.precipitation_since(&since)?).into_response())
    }
}

/// GET /api/v1.0/tobs
pub async fn tobs(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SeriesParams>,
) -> ApiResult<Response> {
    let Some(since) = last_year_start(state.store.as_ref())? else {
        return Ok(Json(DateSeries::new()).into_response());
    };

    if params.by_station {
        Ok(Json(state.store.temperature_readings_since(&since)?).into_response())
    } else {
        Ok(Json(state.store.temperatures_since(&since)?).into_response())
    }
}

/// Start of the one-year window, `None` when the store has no observations
fn last_year_start(store: &dyn ClimateStore) -> ApiResult<Option<String>> {
    let Some(anchor) = store.latest_date()? else {
        tracing::debug!("No observations, returning empty series");
        return Ok(None);
    };

    let since = year_window_start(&anchor)?;
    tracing::debug!(anchor = %anchor, since = %since, "Resolved last-year window");
    Ok(Some(since))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::testing::sample_store;
    use crate::store::SqliteStore;

    #[test]
    fn test_last_year_start_anchored_on_data() {
        let store = sample_store();
        assert_eq!(
            last_year_start(&store).unwrap().as_deref(),
            Some("2016-08-23")
        );
    }

    #[test]
    fn test_last_year_start_empty_store() {
        let store = SqliteStore::in_memory().unwrap();
        assert_eq!(last_year_start(&store).unwrap(), None);
    }
}
