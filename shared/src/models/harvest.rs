//! Harvest log models

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One logged harvest pick, graded at weighing time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HarvestEvent {
    pub id: Uuid,
    pub plot_id: Uuid,
    /// Cycle the pick belongs to
    pub cycle: u32,
    pub harvest_date: NaiveDate,
    pub grade: HarvestGrade,
    pub quantity_kg: Decimal,
}

/// Quality grade assigned to a harvested quantity
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum HarvestGrade {
    GradeA,
    GradeB,
    GradeC,
    Reject,
}

impl HarvestGrade {
    pub const ALL: [HarvestGrade; 4] = [
        HarvestGrade::GradeA,
        HarvestGrade::GradeB,
        HarvestGrade::GradeC,
        HarvestGrade::Reject,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HarvestGrade::GradeA => "grade_a",
            HarvestGrade::GradeB => "grade_b",
            HarvestGrade::GradeC => "grade_c",
            HarvestGrade::Reject => "reject",
        }
    }

    /// Decode a stored grade; unrecognised values are treated as rejects
    pub fn parse_lenient(value: &str) -> Self {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "grade_a" | "a" => HarvestGrade::GradeA,
            "grade_b" | "b" => HarvestGrade::GradeB,
            "grade_c" | "c" => HarvestGrade::GradeC,
            _ => HarvestGrade::Reject,
        }
    }
}

impl std::fmt::Display for HarvestGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HarvestGrade::GradeA => write!(f, "Grade A"),
            HarvestGrade::GradeB => write!(f, "Grade B"),
            HarvestGrade::GradeC => write!(f, "Grade C"),
            HarvestGrade::Reject => write!(f, "Reject"),
        }
    }
}
