//! Business logic services for plot lifecycle tracking

pub mod harvest;
pub mod plot;
pub mod reporting;

pub use harvest::HarvestLogService;
pub use plot::PlotService;
pub use reporting::ReportingService;
