//! Plot lifecycle engine
//!
//! Pure calculations over plot snapshots:
//! - Per-plot metrics, countdowns and alert flags
//! - Portfolio folds for dashboard totals
//! - Lifecycle transitions (harvest, replant, status changes)
//!
//! Nothing here reads the clock. Callers pass the reference date.

pub mod aggregate;
pub mod alerts;
pub mod calculator;
pub mod dates;
pub mod policy;
pub mod transitions;

pub use aggregate::{aggregate_cycles, summarize_portfolio, CycleTotals, PortfolioSummary};
pub use alerts::derive_alerts;
pub use calculator::{compute_metrics, MetricsCalculator};
pub use policy::{MetricsPolicy, PlantingOffset};
pub use transitions::{
    advance_status, open_netting, record_harvest, replant, LifecycleError,
};
