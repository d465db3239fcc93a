//! Tunable policy for metric calculation

use serde::{Deserialize, Serialize};

/// Default window, in days, for the "shade opening soon" alert
pub const DEFAULT_SHADE_OPENING_SOON_DAYS: i64 = 7;

/// How days-since-planting is reported for plantings still in the future
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlantingOffset {
    /// Negative values signal "not yet planted"
    #[default]
    Signed,
    /// Future plantings read as day 0
    ClampToPlantingDay,
}

impl PlantingOffset {
    pub fn apply(&self, days_since_planting: i64) -> i64 {
        match self {
            PlantingOffset::Signed => days_since_planting,
            PlantingOffset::ClampToPlantingDay => days_since_planting.max(0),
        }
    }
}

/// Settings shared by every metrics call site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsPolicy {
    pub planting_offset: PlantingOffset,
    pub shade_opening_soon_days: i64,
}

impl Default for MetricsPolicy {
    fn default() -> Self {
        Self {
            planting_offset: PlantingOffset::Signed,
            shade_opening_soon_days: DEFAULT_SHADE_OPENING_SOON_DAYS,
        }
    }
}
