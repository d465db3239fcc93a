//! Plot metrics property-based and scenario tests
//!
//! Covers:
//! - Progress and countdown bounds for arbitrary schedules
//! - Future plantings
//! - Determinism and independence from non-schedule fields
//! - Dashboard aggregation

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::lifecycle::dates::shift_days;
use shared::{
    aggregate_cycles, compute_metrics, MetricsCalculator, MetricsPolicy, PlantingOffset, Plot,
    PlotStatus,
};

fn epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

fn day(offset: i64) -> NaiveDate {
    shift_days(epoch(), offset)
}

// ============================================================================
// Property Test Strategies
// ============================================================================

fn status_strategy() -> impl Strategy<Value = PlotStatus> {
    prop::sample::select(PlotStatus::ALL.to_vec())
}

/// Harvest quantity in kg with one decimal place
fn kg_strategy() -> impl Strategy<Value = Decimal> {
    (0..=50_000i64).prop_map(|n| Decimal::new(n, 1))
}

/// Plots with arbitrary, including degenerate, schedules
fn plot_strategy() -> impl Strategy<Value = Plot> {
    (
        -2_000..=2_000i64,
        -400..=400i32,
        -400..=400i32,
        prop::option::of(-2_000..=2_000i64),
        prop::option::of(-2_000..=2_000i64),
        status_strategy(),
        0..=12u32,
        kg_strategy(),
        kg_strategy(),
    )
        .prop_map(
            |(planting, maturity, netting, harvested, netting_open, status, cycle, amount, total)| {
                let mut plot = Plot::new("Generated", day(planting), maturity, netting);
                plot.actual_harvest_date = harvested.map(day);
                plot.netting_open_date = netting_open.map(day);
                plot.status = status;
                plot.current_cycle = cycle;
                plot.harvest_amount_kg = amount;
                plot.total_harvested_kg = total;
                plot
            },
        )
}

fn reference_strategy() -> impl Strategy<Value = NaiveDate> {
    (-2_000..=4_000i64).prop_map(day)
}

// ============================================================================
// Property-Based Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn test_progress_within_bounds(plot in plot_strategy(), reference in reference_strategy()) {
        let metrics = compute_metrics(&plot, reference);
        prop_assert!(metrics.harvest_progress_percent >= Decimal::ZERO);
        prop_assert!(metrics.harvest_progress_percent <= Decimal::ONE_HUNDRED);
    }

    #[test]
    fn test_countdowns_never_negative(plot in plot_strategy(), reference in reference_strategy()) {
        let metrics = compute_metrics(&plot, reference);
        prop_assert!(metrics.days_to_harvest >= 0);
        prop_assert!(metrics.days_to_open_shade >= 0);
    }

    #[test]
    fn test_future_planting_not_ready(
        plot in plot_strategy(),
        lead in 1..=500i64
    ) {
        let reference = shift_days(plot.planting_date, -lead);
        let metrics = compute_metrics(&plot, reference);
        prop_assert!(metrics.days_since_planting < 0);
        prop_assert_eq!(metrics.harvest_progress_percent, Decimal::ZERO);
        prop_assert!(!metrics.alerts.is_ready_for_harvest);
    }

    #[test]
    fn test_wap_is_floored(plot in plot_strategy(), reference in reference_strategy()) {
        let metrics = compute_metrics(&plot, reference);
        prop_assert_eq!(metrics.dap_days, metrics.days_since_planting);
        prop_assert!(metrics.wap_weeks * 7 <= metrics.days_since_planting);
        prop_assert!(metrics.days_since_planting < (metrics.wap_weeks + 1) * 7);
    }

    #[test]
    fn test_computation_is_deterministic(plot in plot_strategy(), reference in reference_strategy()) {
        let first = compute_metrics(&plot, reference);
        let second = compute_metrics(&plot, reference);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn test_calculated_dates_depend_only_on_schedule(
        plot in plot_strategy(),
        other in plot_strategy(),
        reference in reference_strategy()
    ) {
        let mut altered = other;
        altered.planting_date = plot.planting_date;
        altered.days_to_maturity = plot.days_to_maturity;
        altered.days_to_open_netting = plot.days_to_open_netting;

        let original = compute_metrics(&plot, reference);
        let changed = compute_metrics(&altered, reference);
        prop_assert_eq!(original.calculated_harvest_date, changed.calculated_harvest_date);
        prop_assert_eq!(original.calculated_netting_date, changed.calculated_netting_date);
    }

    #[test]
    fn test_clamped_policy_matches_signed_floor(plot in plot_strategy(), reference in reference_strategy()) {
        let clamped = MetricsCalculator::new(MetricsPolicy {
            planting_offset: PlantingOffset::ClampToPlantingDay,
            ..MetricsPolicy::default()
        });
        let signed = compute_metrics(&plot, reference);
        let floored = clamped.compute(&plot, reference);
        prop_assert_eq!(floored.days_since_planting, signed.days_since_planting.max(0));
        prop_assert_eq!(floored.calculated_harvest_date, signed.calculated_harvest_date);
    }

    #[test]
    fn test_aggregate_matches_per_plot_sum(
        plots in prop::collection::vec(plot_strategy(), 0..20),
        reference in reference_strategy()
    ) {
        let totals = aggregate_cycles(&MetricsCalculator::default(), &plots, reference);
        let expected_kg: Decimal = plots.iter().map(|p| p.total_harvested_kg).sum();
        let expected_cycles: u64 = plots
            .iter()
            .map(|p| u64::from(compute_metrics(p, reference).completed_cycles))
            .sum();

        prop_assert_eq!(totals.total_harvest_kg, expected_kg);
        prop_assert_eq!(totals.total_completed_cycles, expected_cycles);
        prop_assert_eq!(totals.plot_count, plots.len());
    }
}

// ============================================================================
// Scenario Tests
// ============================================================================

#[cfg(test)]
mod scenario_tests {
    use super::*;

    fn standard_plot() -> Plot {
        Plot::new("Standard", day(0), 135, 75)
    }

    #[test]
    fn test_harvest_due_on_maturity_day() {
        let metrics = compute_metrics(&standard_plot(), day(135));
        assert_eq!(metrics.days_since_planting, 135);
        assert_eq!(metrics.harvest_progress_percent, Decimal::ONE_HUNDRED);
        assert_eq!(metrics.days_to_harvest, 0);
        assert!(metrics.alerts.is_ready_for_harvest);
    }

    #[test]
    fn test_shade_opening_within_week() {
        let metrics = compute_metrics(&standard_plot(), day(70));
        assert_eq!(metrics.days_to_open_shade, 5);
        assert!(metrics.alerts.is_shade_opening_soon);
    }

    #[test]
    fn test_planting_ten_days_ahead() {
        let future = Plot::new("Future", day(10), 135, 75);
        let metrics = compute_metrics(&future, day(0));
        assert_eq!(metrics.days_since_planting, -10);
        assert_eq!(metrics.wap_weeks, -2);
        assert_eq!(metrics.harvest_progress_percent, Decimal::ZERO);
    }

    #[test]
    fn test_completed_cycles_by_status() {
        let mut plot = standard_plot();
        plot.current_cycle = 3;

        plot.status = PlotStatus::Harvesting;
        assert_eq!(compute_metrics(&plot, day(10)).completed_cycles, 3);

        plot.status = PlotStatus::Growing;
        assert_eq!(compute_metrics(&plot, day(10)).completed_cycles, 2);

        plot.current_cycle = 1;
        for status in PlotStatus::ALL {
            if status != PlotStatus::Harvesting {
                plot.status = status;
                assert_eq!(compute_metrics(&plot, day(10)).completed_cycles, 0);
            }
        }
    }

    #[test]
    fn test_dashboard_harvest_total() {
        let plots: Vec<Plot> = [Decimal::from(10), Decimal::ZERO, Decimal::new(255, 1)]
            .into_iter()
            .map(|kg| {
                let mut plot = standard_plot();
                plot.total_harvested_kg = kg;
                plot
            })
            .collect();

        let totals = aggregate_cycles(&MetricsCalculator::default(), &plots, day(30));
        assert_eq!(totals.total_harvest_kg, Decimal::new(355, 1));
    }

    #[test]
    fn test_numeric_text_from_storage() {
        let json = r#"{
            "id": "0b7c5d1e-8f2a-4a11-9e57-3c2b1a0f9d88",
            "name": "Legacy",
            "plantingDate": "2024-01-01",
            "daysToMaturity": 135,
            "daysToOpenNetting": 75,
            "status": "growing",
            "currentCycle": 2,
            "harvestAmountKg": "",
            "totalHarvestedKg": "18.5",
            "polybagCount": 240
        }"#;
        let plot: Plot = serde_json::from_str(json).unwrap();
        let metrics = compute_metrics(&plot, day(100));

        assert_eq!(metrics.current_cycle_harvest_kg, Decimal::ZERO);
        assert_eq!(metrics.total_harvest_kg, Decimal::new(185, 1));
        assert_eq!(metrics.completed_cycles, 1);
    }
}
