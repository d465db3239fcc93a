//! Domain models for plot lifecycle tracking

mod harvest;
mod metrics;
mod plot;

pub use harvest::*;
pub use metrics::*;
pub use plot::*;
