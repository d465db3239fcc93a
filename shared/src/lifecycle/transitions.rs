//! Lifecycle transitions
//!
//! Each transition takes a snapshot and returns the updated plot, leaving
//! the input untouched. Persisting the result is the caller's job.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::{Plot, PlotStatus};

/// Reasons a lifecycle transition is refused
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("Invalid state transition: {from} -> {to}")]
    InvalidStateTransition { from: PlotStatus, to: PlotStatus },

    #[error("Harvest amount cannot be negative: {0}")]
    NegativeHarvestAmount(Decimal),

    #[error("Harvest date {harvest_date} is before planting date {planting_date}")]
    HarvestBeforePlanting {
        harvest_date: NaiveDate,
        planting_date: NaiveDate,
    },

    #[error("Cycle {0} has no recorded harvest yet")]
    CycleNotHarvested(u32),

    #[error("Harvest amount {amount_kg} kg would overflow the recorded total {total_kg} kg")]
    HarvestTotalOverflow {
        amount_kg: Decimal,
        total_kg: Decimal,
    },
}

/// Move a plot forward in its lifecycle.
///
/// Skipping ahead is allowed; going back is not. Restarting a cycle goes
/// through [`replant`] instead.
pub fn advance_status(plot: &Plot, next: PlotStatus) -> Result<Plot, LifecycleError> {
    if next < plot.status {
        return Err(LifecycleError::InvalidStateTransition {
            from: plot.status,
            to: next,
        });
    }

    let mut updated = plot.clone();
    updated.status = next;
    Ok(updated)
}

/// Record a harvest pick for the current cycle.
///
/// Repeated picks accumulate; the latest date becomes the cycle's
/// harvest date.
pub fn record_harvest(
    plot: &Plot,
    harvest_date: NaiveDate,
    amount_kg: Decimal,
) -> Result<Plot, LifecycleError> {
    match plot.status {
        PlotStatus::PlotPreparation | PlotStatus::Dormant => {
            return Err(LifecycleError::InvalidStateTransition {
                from: plot.status,
                to: PlotStatus::Harvesting,
            });
        }
        PlotStatus::Planted
        | PlotStatus::Growing
        | PlotStatus::ReadyForHarvest
        | PlotStatus::Harvesting => {}
    }

    if amount_kg < Decimal::ZERO {
        return Err(LifecycleError::NegativeHarvestAmount(amount_kg));
    }
    if harvest_date < plot.planting_date {
        return Err(LifecycleError::HarvestBeforePlanting {
            harvest_date,
            planting_date: plot.planting_date,
        });
    }

    let overflow = || LifecycleError::HarvestTotalOverflow {
        amount_kg,
        total_kg: plot.total_harvested_kg,
    };
    let harvest_amount_kg = plot
        .harvest_amount_kg
        .checked_add(amount_kg)
        .ok_or_else(overflow)?;
    let total_harvested_kg = plot
        .total_harvested_kg
        .checked_add(amount_kg)
        .ok_or_else(overflow)?;

    let mut updated = plot.clone();
    updated.status = PlotStatus::Harvesting;
    updated.actual_harvest_date = Some(
        plot.actual_harvest_date
            .map_or(harvest_date, |previous| previous.max(harvest_date)),
    );
    updated.harvest_amount_kg = harvest_amount_kg;
    updated.total_harvested_kg = total_harvested_kg;
    Ok(updated)
}

/// Start the next cycle on a harvested plot.
///
/// The cumulative total carries over; per-cycle fields reset.
pub fn replant(plot: &Plot, planting_date: NaiveDate) -> Result<Plot, LifecycleError> {
    let harvested = match plot.status {
        PlotStatus::Harvesting | PlotStatus::Dormant => true,
        PlotStatus::PlotPreparation
        | PlotStatus::Planted
        | PlotStatus::Growing
        | PlotStatus::ReadyForHarvest => plot.is_harvest_recorded(),
    };
    if !harvested {
        return Err(LifecycleError::CycleNotHarvested(plot.current_cycle));
    }

    let mut updated = plot.clone();
    updated.current_cycle = plot.current_cycle.saturating_add(1).max(1);
    updated.planting_date = planting_date;
    updated.status = PlotStatus::Planted;
    updated.actual_harvest_date = None;
    updated.netting_open_date = None;
    updated.expected_harvest_date = None;
    updated.harvest_amount_kg = Decimal::ZERO;
    Ok(updated)
}

/// Store an explicit netting-open date, overriding the derived schedule
pub fn open_netting(plot: &Plot, open_date: NaiveDate) -> Plot {
    let mut updated = plot.clone();
    updated.netting_open_date = Some(open_date);
    updated
}
