//! Data-quality inspection for plot snapshots
//!
//! The engine accepts any snapshot. These checks only report what looks
//! degenerate so callers can log it; they never block a calculation.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::lifecycle::dates::shift_days;
use crate::models::Plot;

/// Something implausible found in a plot record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum PlotDataIssue {
    NonPositiveMaturity { days: i32 },
    NonPositiveNetting { days: i32 },
    NettingAfterMaturity { netting_days: i32, maturity_days: i32 },
    ZeroCycle,
    NegativeHarvest { field: &'static str },
    CycleHarvestExceedsTotal,
    StaleExpectedHarvestDate,
}

impl PlotDataIssue {
    pub fn message(&self) -> String {
        match self {
            PlotDataIssue::NonPositiveMaturity { days } => {
                format!("days to maturity must be positive, got {}", days)
            }
            PlotDataIssue::NonPositiveNetting { days } => {
                format!("days to open netting must be positive, got {}", days)
            }
            PlotDataIssue::NettingAfterMaturity {
                netting_days,
                maturity_days,
            } => format!(
                "netting opens on day {} but harvest is due on day {}",
                netting_days, maturity_days
            ),
            PlotDataIssue::ZeroCycle => "current cycle must start at 1".to_string(),
            PlotDataIssue::NegativeHarvest { field } => {
                format!("{} cannot be negative", field)
            }
            PlotDataIssue::CycleHarvestExceedsTotal => {
                "current cycle harvest exceeds cumulative total".to_string()
            }
            PlotDataIssue::StaleExpectedHarvestDate => {
                "stored expected harvest date differs from planting date + maturity".to_string()
            }
        }
    }
}

impl std::fmt::Display for PlotDataIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message())
    }
}

/// List every data-quality issue in `plot`
pub fn inspect_plot(plot: &Plot) -> Vec<PlotDataIssue> {
    let mut issues = Vec::new();

    if plot.days_to_maturity <= 0 {
        issues.push(PlotDataIssue::NonPositiveMaturity {
            days: plot.days_to_maturity,
        });
    }
    if plot.days_to_open_netting <= 0 {
        issues.push(PlotDataIssue::NonPositiveNetting {
            days: plot.days_to_open_netting,
        });
    }
    if plot.days_to_open_netting > plot.days_to_maturity {
        issues.push(PlotDataIssue::NettingAfterMaturity {
            netting_days: plot.days_to_open_netting,
            maturity_days: plot.days_to_maturity,
        });
    }
    if plot.current_cycle == 0 {
        issues.push(PlotDataIssue::ZeroCycle);
    }
    if plot.harvest_amount_kg < Decimal::ZERO {
        issues.push(PlotDataIssue::NegativeHarvest {
            field: "harvest_amount_kg",
        });
    }
    if plot.total_harvested_kg < Decimal::ZERO {
        issues.push(PlotDataIssue::NegativeHarvest {
            field: "total_harvested_kg",
        });
    }
    if plot.harvest_amount_kg > plot.total_harvested_kg {
        issues.push(PlotDataIssue::CycleHarvestExceedsTotal);
    }
    if let Some(expected) = plot.expected_harvest_date {
        let derived = shift_days(plot.planting_date, i64::from(plot.days_to_maturity));
        if expected != derived {
            issues.push(PlotDataIssue::StaleExpectedHarvestDate);
        }
    }

    issues
}
