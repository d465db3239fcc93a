//! WebAssembly module for plot lifecycle tracking
//!
//! Provides client-side computation for:
//! - Plot card metrics and alerts
//! - Portfolio totals for the dashboard
//! - Offline data-quality checks

use chrono::NaiveDate;
use serde::Serialize;
use shared::lifecycle::calculator::harvest_progress;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::lifecycle::*;
pub use shared::models::*;
pub use shared::validation::*;

/// Compute the metrics shown on a plot card.
///
/// `reference_date` is `YYYY-MM-DD`; pass an empty string for today.
#[wasm_bindgen]
pub fn compute_plot_metrics(plot_json: &str, reference_date: &str) -> Result<String, JsValue> {
    let plot = parse_plot(plot_json)?;
    let reference = resolve_reference(reference_date)?;

    report_issues(&plot);
    let metrics = compute_metrics(&plot, reference);
    to_json(&metrics)
}

/// Fold a JSON array of plots into dashboard totals
#[wasm_bindgen]
pub fn summarize_plots(plots_json: &str, reference_date: &str) -> Result<String, JsValue> {
    let plots: Vec<Plot> = serde_json::from_str(plots_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid plots JSON: {}", e)))?;
    let reference = resolve_reference(reference_date)?;

    let summary = summarize_portfolio(&MetricsCalculator::default(), &plots, reference);
    to_json(&summary)
}

/// List data-quality issues for a plot as JSON
#[wasm_bindgen]
pub fn inspect_plot_data(plot_json: &str) -> Result<String, JsValue> {
    let plot = parse_plot(plot_json)?;
    to_json(&inspect_plot(&plot))
}

/// Harvest progress for a form preview, before the plot is saved
#[wasm_bindgen]
pub fn preview_harvest_progress(days_since_planting: i32, days_to_maturity: i32) -> f64 {
    harvest_progress(i64::from(days_since_planting), days_to_maturity)
        .to_string()
        .parse()
        .unwrap_or(0.0)
}

/// Weeks After Planting, floored toward negative infinity
#[wasm_bindgen]
pub fn weeks_after_planting(days_since_planting: i32) -> i32 {
    days_since_planting.div_euclid(7)
}

fn parse_plot(plot_json: &str) -> Result<Plot, JsValue> {
    serde_json::from_str(plot_json).map_err(|e| JsValue::from_str(&format!("Invalid plot JSON: {}", e)))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| JsValue::from_str(&format!("Serialization failed: {}", e)))
}

fn resolve_reference(reference_date: &str) -> Result<NaiveDate, JsValue> {
    let trimmed = reference_date.trim();
    if trimmed.is_empty() {
        return Ok(today());
    }
    trimmed
        .parse()
        .map_err(|e| JsValue::from_str(&format!("Invalid reference date '{}': {}", trimmed, e)))
}

/// The browser's local calendar date
#[cfg(target_arch = "wasm32")]
fn today() -> NaiveDate {
    let now = js_sys::Date::new_0();
    NaiveDate::from_ymd_opt(
        now.get_full_year() as i32,
        now.get_month() + 1,
        now.get_date(),
    )
    .unwrap_or_default()
}

#[cfg(not(target_arch = "wasm32"))]
fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

#[cfg(target_arch = "wasm32")]
fn report_issues(plot: &Plot) {
    for issue in inspect_plot(plot) {
        web_sys::console::warn_1(&JsValue::from_str(&format!("plot {}: {}", plot.id, issue)));
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn report_issues(_plot: &Plot) {}
