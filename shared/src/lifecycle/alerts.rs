//! Alert flags derived from computed countdowns

use chrono::NaiveDate;

use crate::models::{Plot, PlotAlerts};

/// Derive the three alert flags for a plot.
///
/// Countdown-based flags use the derived schedule. The netting flag honours
/// the plot's stored `netting_open_date` override instead.
pub fn derive_alerts(
    plot: &Plot,
    reference: NaiveDate,
    days_since_planting: i64,
    days_to_harvest: i64,
    days_to_open_shade: i64,
    shade_opening_soon_days: i64,
) -> PlotAlerts {
    let harvest_pending = !plot.is_harvest_recorded();

    let should_open_netting = harvest_pending
        && plot
            .netting_open_date
            .is_some_and(|open_date| reference >= open_date);

    PlotAlerts {
        is_shade_opening_soon: days_to_open_shade > 0
            && days_to_open_shade <= shade_opening_soon_days,
        should_open_netting,
        is_ready_for_harvest: harvest_pending && days_since_planting >= 0 && days_to_harvest == 0,
    }
}
