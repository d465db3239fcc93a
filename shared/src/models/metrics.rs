//! Derived plot metrics

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Time-based metrics for one plot at one reference date.
///
/// Always computed fresh and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlotMetrics {
    /// Signed; negative while the planting date is still ahead
    pub days_since_planting: i64,
    /// Days After Planting, labelled separately in the UI
    pub dap_days: i64,
    /// Weeks After Planting, floored toward negative infinity
    pub wap_weeks: i64,
    /// Share of the maturity period elapsed, within [0, 100]
    pub harvest_progress_percent: Decimal,
    pub calculated_harvest_date: NaiveDate,
    pub calculated_netting_date: NaiveDate,
    /// Never negative
    pub days_to_harvest: i64,
    /// Never negative
    pub days_to_open_shade: i64,
    #[serde(flatten)]
    pub alerts: PlotAlerts,
    pub current_cycle_harvest_kg: Decimal,
    pub total_harvest_kg: Decimal,
    pub completed_cycles: u32,
}

/// Independent alert flags; more than one may be raised at once
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlotAlerts {
    pub is_shade_opening_soon: bool,
    pub should_open_netting: bool,
    pub is_ready_for_harvest: bool,
}

impl PlotAlerts {
    pub fn any(&self) -> bool {
        self.is_shade_opening_soon || self.should_open_netting || self.is_ready_for_harvest
    }
}
