//! HTTP handlers for the plot lifecycle API

mod health;
mod plot;
mod reporting;

pub use health::*;
pub use plot::*;
pub use reporting::*;

use chrono::{NaiveDate, Utc};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::AppState;

/// Optional reference date shared by every metrics endpoint
#[derive(Debug, Default, Deserialize)]
pub struct AsOfQuery {
    pub as_of: Option<String>,
}

/// Resolve `as_of`, defaulting to today in the configured offset
pub(crate) fn reference_date(state: &AppState, as_of: Option<&str>) -> AppResult<NaiveDate> {
    match as_of.map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => parse_date("as_of", raw),
        None => Ok(state.config.metrics.local_date(Utc::now())),
    }
}

pub(crate) fn parse_date(field: &str, raw: &str) -> AppResult<NaiveDate> {
    raw.parse::<NaiveDate>()
        .map_err(|_| AppError::validation(field, format!("Expected a YYYY-MM-DD date, got '{}'", raw)))
}
