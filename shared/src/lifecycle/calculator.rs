//! Per-plot metrics calculation
//!
//! Single source of truth for every surface that shows plot timing: the
//! plot card, the dashboard fold and the harvest report all go through
//! [`MetricsCalculator::compute`].

use chrono::{DateTime, NaiveDate, TimeZone};
use rust_decimal::Decimal;

use super::alerts::derive_alerts;
use super::dates::{day_difference, shift_days};
use super::policy::MetricsPolicy;
use crate::models::{Plot, PlotMetrics, PlotStatus};

/// Computes [`PlotMetrics`] under a fixed [`MetricsPolicy`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsCalculator {
    policy: MetricsPolicy,
}

/// Compute metrics with the default policy
pub fn compute_metrics(plot: &Plot, reference: NaiveDate) -> PlotMetrics {
    MetricsCalculator::default().compute(plot, reference)
}

impl MetricsCalculator {
    pub fn new(policy: MetricsPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &MetricsPolicy {
        &self.policy
    }

    /// Compute metrics for the calendar date of `instant` in its own timezone
    pub fn compute_at<Tz: TimeZone>(&self, plot: &Plot, instant: &DateTime<Tz>) -> PlotMetrics {
        self.compute(plot, instant.date_naive())
    }

    /// Compute metrics for `plot` as seen on `reference`.
    ///
    /// Total over its input: degenerate durations and missing dates still
    /// produce a value.
    pub fn compute(&self, plot: &Plot, reference: NaiveDate) -> PlotMetrics {
        let days_since_planting = self
            .policy
            .planting_offset
            .apply(day_difference(reference, plot.planting_date));

        let calculated_harvest_date =
            shift_days(plot.planting_date, i64::from(plot.days_to_maturity));
        let calculated_netting_date =
            shift_days(plot.planting_date, i64::from(plot.days_to_open_netting));

        let days_to_harvest = day_difference(calculated_harvest_date, reference).max(0);
        let days_to_open_shade = day_difference(calculated_netting_date, reference).max(0);

        let alerts = derive_alerts(
            plot,
            reference,
            days_since_planting,
            days_to_harvest,
            days_to_open_shade,
            self.policy.shade_opening_soon_days,
        );

        PlotMetrics {
            days_since_planting,
            dap_days: days_since_planting,
            wap_weeks: days_since_planting.div_euclid(7),
            harvest_progress_percent: harvest_progress(days_since_planting, plot.days_to_maturity),
            calculated_harvest_date,
            calculated_netting_date,
            days_to_harvest,
            days_to_open_shade,
            alerts,
            current_cycle_harvest_kg: plot.harvest_amount_kg,
            total_harvest_kg: plot.total_harvested_kg,
            completed_cycles: completed_cycles(plot.status, plot.current_cycle),
        }
    }
}

/// Elapsed share of the maturity period, clamped to [0, 100]
pub fn harvest_progress(days_since_planting: i64, days_to_maturity: i32) -> Decimal {
    let hundred = Decimal::ONE_HUNDRED;
    if days_since_planting < 0 {
        return Decimal::ZERO;
    }
    // Harvest falls due on the planting day itself
    if days_to_maturity <= 0 {
        return hundred;
    }

    let percent = Decimal::from(days_since_planting) * hundred / Decimal::from(days_to_maturity);
    percent.min(hundred).round_dp(2)
}

/// Cycles counted as finished for a plot in `status` on cycle `current_cycle`
pub fn completed_cycles(status: PlotStatus, current_cycle: u32) -> u32 {
    match status {
        PlotStatus::Harvesting => current_cycle,
        PlotStatus::PlotPreparation
        | PlotStatus::Planted
        | PlotStatus::Growing
        | PlotStatus::ReadyForHarvest
        | PlotStatus::Dormant => current_cycle.saturating_sub(1),
    }
}
