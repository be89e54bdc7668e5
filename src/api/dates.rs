//! Date handling for the API layer
//!
//! Stored dates are ISO `YYYY-MM-DD` text and the store compares them as
//! strings, so anything else a client sends yields a silently wrong window.

use chrono::{Duration, NaiveDate};
use regex::Regex;
use std::sync::OnceLock;

use crate::api::error::{ApiError, ApiResult};

/// Days subtracted from the anchor date for the "last year" routes.
///
/// 366 rather than 365 so the anchor's calendar day in the prior year is
/// still covered across a leap day.
pub const LOOKBACK_DAYS: i64 = 366;

const ISO_FORMAT: &str = "%Y-%m-%d";

fn iso_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("static pattern"))
}

/// Parse a zero-padded `YYYY-MM-DD` calendar date
pub fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    if !iso_pattern().is_match(s) {
        return None;
    }
    NaiveDate::parse_from_str(s, ISO_FORMAT).ok()
}

/// Reject a path date that would not compare correctly against stored dates
pub fn validate_date(s: &str) -> ApiResult<()> {
    match parse_iso_date(s) {
        Some(_) => Ok(()),
        None => Err(ApiError::Validation(format!(
            "Invalid date {:?}: expected YYYY-MM-DD",
            s
        ))),
    }
}

/// First date included in the year ending at `anchor`.
///
/// The cutoff is `anchor - LOOKBACK_DAYS`; the cutoff day itself is
/// excluded, so for an anchor of 2017-08-23 the window starts on 2016-08-23.
pub fn year_window_start(anchor: &str) -> ApiResult<String> {
    let anchor_date = parse_iso_date(anchor).ok_or_else(|| {
        ApiError::Internal(format!("Stored date {:?} is not YYYY-MM-DD", anchor))
    })?;

    let start = (anchor_date - Duration::days(LOOKBACK_DAYS))
        .succ_opt()
        .ok_or_else(|| ApiError::Internal(format!("Date out of range: {}", anchor)))?;

    Ok(start.format(ISO_FORMAT).to_string())
}
