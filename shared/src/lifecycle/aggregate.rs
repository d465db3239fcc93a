//! Portfolio folds over many plots

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::calculator::MetricsCalculator;
use crate::models::{Plot, PlotStatus};

/// Cycle and harvest totals across a plot collection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleTotals {
    pub total_completed_cycles: u64,
    pub total_harvest_kg: Decimal,
    pub plot_count: usize,
}

/// Dashboard view of a portfolio: totals plus alert and status counts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    #[serde(flatten)]
    pub totals: CycleTotals,
    pub ready_for_harvest: usize,
    pub shade_opening_soon: usize,
    pub netting_due: usize,
    pub not_yet_planted: usize,
    pub by_status: BTreeMap<PlotStatus, usize>,
}

/// Sum completed cycles and cumulative harvest over `plots`.
///
/// Duplicates are summed as given; an empty input yields zero totals.
/// Harvest sums saturate, so one corrupt total cannot abort the fold.
pub fn aggregate_cycles<'a, I>(
    calculator: &MetricsCalculator,
    plots: I,
    reference: NaiveDate,
) -> CycleTotals
where
    I: IntoIterator<Item = &'a Plot>,
{
    plots
        .into_iter()
        .fold(CycleTotals::default(), |mut totals, plot| {
            let metrics = calculator.compute(plot, reference);
            totals.total_completed_cycles += u64::from(metrics.completed_cycles);
            totals.total_harvest_kg = totals
                .total_harvest_kg
                .saturating_add(metrics.total_harvest_kg);
            totals.plot_count += 1;
            totals
        })
}

/// Fold `plots` into totals together with alert and status counts
pub fn summarize_portfolio<'a, I>(
    calculator: &MetricsCalculator,
    plots: I,
    reference: NaiveDate,
) -> PortfolioSummary
where
    I: IntoIterator<Item = &'a Plot>,
{
    let mut summary = PortfolioSummary::default();

    for plot in plots {
        let metrics = calculator.compute(plot, reference);

        summary.totals.total_completed_cycles += u64::from(metrics.completed_cycles);
        summary.totals.total_harvest_kg = summary
            .totals
            .total_harvest_kg
            .saturating_add(metrics.total_harvest_kg);
        summary.totals.plot_count += 1;

        if metrics.alerts.is_ready_for_harvest {
            summary.ready_for_harvest += 1;
        }
        if metrics.alerts.is_shade_opening_soon {
            summary.shade_opening_soon += 1;
        }
        if metrics.alerts.should_open_netting {
            summary.netting_due += 1;
        }
        if metrics.days_since_planting < 0 {
            summary.not_yet_planted += 1;
        }
        *summary.by_status.entry(plot.status).or_insert(0) += 1;
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::dates::shift_days;

    fn day(offset: i64) -> NaiveDate {
        shift_days(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), offset)
    }

    fn plot_with(total_kg: Decimal, status: PlotStatus, cycle: u32) -> Plot {
        let mut plot = Plot::new("Block", day(0), 135, 75);
        plot.total_harvested_kg = total_kg;
        plot.status = status;
        plot.current_cycle = cycle;
        plot
    }

    #[test]
    fn test_aggregate_sums_harvest() {
        let plots = vec![
            plot_with(Decimal::from(10), PlotStatus::Growing, 1),
            plot_with(Decimal::ZERO, PlotStatus::Growing, 1),
            plot_with(Decimal::new(255, 1), PlotStatus::Growing, 1),
        ];
        let totals = aggregate_cycles(&MetricsCalculator::default(), &plots, day(20));
        assert_eq!(totals.total_harvest_kg, Decimal::new(355, 1));
        assert_eq!(totals.plot_count, 3);
    }

    #[test]
    fn test_aggregate_sums_cycles() {
        let plots = vec![
            plot_with(Decimal::ZERO, PlotStatus::Harvesting, 3),
            plot_with(Decimal::ZERO, PlotStatus::Growing, 3),
            plot_with(Decimal::ZERO, PlotStatus::Planted, 1),
        ];
        let totals = aggregate_cycles(&MetricsCalculator::default(), &plots, day(20));
        assert_eq!(totals.total_completed_cycles, 5);
    }

    #[test]
    fn test_aggregate_empty() {
        let totals = aggregate_cycles(&MetricsCalculator::default(), &Vec::<Plot>::new(), day(0));
        assert_eq!(totals, CycleTotals::default());
    }

    #[test]
    fn test_aggregate_counts_duplicates() {
        let plot = plot_with(Decimal::from(4), PlotStatus::Harvesting, 2);
        let totals = aggregate_cycles(&MetricsCalculator::default(), [&plot, &plot], day(0));
        assert_eq!(totals.total_harvest_kg, Decimal::from(8));
        assert_eq!(totals.total_completed_cycles, 4);
    }

    #[test]
    fn test_aggregate_saturates_on_corrupt_total() {
        let plots = vec![
            plot_with(Decimal::MAX, PlotStatus::Harvesting, 1),
            plot_with(Decimal::ONE, PlotStatus::Harvesting, 1),
        ];
        let calculator = MetricsCalculator::default();

        let totals = aggregate_cycles(&calculator, &plots, day(140));
        assert_eq!(totals.total_harvest_kg, Decimal::MAX);
        assert_eq!(totals.total_completed_cycles, 2);
        assert_eq!(totals.plot_count, 2);

        let summary = summarize_portfolio(&calculator, &plots, day(140));
        assert_eq!(summary.totals, totals);
    }

    #[test]
    fn test_summary_counts_alerts_and_statuses() {
        let ready = plot_with(Decimal::from(2), PlotStatus::ReadyForHarvest, 1);
        let mut future = plot_with(Decimal::ZERO, PlotStatus::PlotPreparation, 1);
        future.planting_date = day(200);
        let mut shading = plot_with(Decimal::ZERO, PlotStatus::Growing, 2);
        shading.planting_date = day(70);
        shading.days_to_open_netting = 72;
        shading.netting_open_date = Some(day(130));

        let plots = [ready, future, shading];
        let summary = summarize_portfolio(&MetricsCalculator::default(), &plots, day(135));

        assert_eq!(summary.totals.plot_count, 3);
        assert_eq!(summary.totals.total_completed_cycles, 1);
        assert_eq!(summary.totals.total_harvest_kg, Decimal::from(2));
        assert_eq!(summary.ready_for_harvest, 1);
        assert_eq!(summary.shade_opening_soon, 1);
        assert_eq!(summary.netting_due, 1);
        assert_eq!(summary.not_yet_planted, 1);
        assert_eq!(summary.by_status.get(&PlotStatus::Growing), Some(&1));
        assert_eq!(summary.by_status.get(&PlotStatus::Harvesting), None);
    }
}
