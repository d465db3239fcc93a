//! Plot models

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// A cultivated plot, reused across planting cycles.
///
/// This is the snapshot handed to the lifecycle engine. The storage layer
/// owns the record; the engine only ever reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plot {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub crop_type: String,
    /// Start of the current cycle
    pub planting_date: NaiveDate,
    /// Days from planting to expected harvest
    pub days_to_maturity: i32,
    /// Days from planting to shade-netting removal
    pub days_to_open_netting: i32,
    /// Set once the current cycle's harvest is recorded
    #[serde(default)]
    pub actual_harvest_date: Option<NaiveDate>,
    /// Explicit netting override; takes precedence for the netting alert
    #[serde(default)]
    pub netting_open_date: Option<NaiveDate>,
    /// Stored expectation, kept for display only. Metrics never read it.
    #[serde(default)]
    pub expected_harvest_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_status")]
    pub status: PlotStatus,
    /// 1-based count of planting cycles
    #[serde(default = "first_cycle")]
    pub current_cycle: u32,
    #[serde(default, deserialize_with = "deserialize_kg")]
    pub harvest_amount_kg: Decimal,
    #[serde(default, deserialize_with = "deserialize_kg")]
    pub total_harvested_kg: Decimal,
    #[serde(default)]
    pub polybag_count: u32,
}

fn first_cycle() -> u32 {
    1
}

impl Plot {
    /// Create a freshly planted plot in its first cycle
    pub fn new(
        name: impl Into<String>,
        planting_date: NaiveDate,
        days_to_maturity: i32,
        days_to_open_netting: i32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            location: String::new(),
            crop_type: String::new(),
            planting_date,
            days_to_maturity,
            days_to_open_netting,
            actual_harvest_date: None,
            netting_open_date: None,
            expected_harvest_date: None,
            status: PlotStatus::Planted,
            current_cycle: 1,
            harvest_amount_kg: Decimal::ZERO,
            total_harvested_kg: Decimal::ZERO,
            polybag_count: 0,
        }
    }

    /// Whether the current cycle already has a recorded harvest
    pub fn is_harvest_recorded(&self) -> bool {
        self.actual_harvest_date.is_some()
    }
}

/// Lifecycle state of a plot
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum PlotStatus {
    PlotPreparation,
    Planted,
    #[default]
    Growing,
    ReadyForHarvest,
    Harvesting,
    Dormant,
}

impl PlotStatus {
    pub const ALL: [PlotStatus; 6] = [
        PlotStatus::PlotPreparation,
        PlotStatus::Planted,
        PlotStatus::Growing,
        PlotStatus::ReadyForHarvest,
        PlotStatus::Harvesting,
        PlotStatus::Dormant,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PlotStatus::PlotPreparation => "plot_preparation",
            PlotStatus::Planted => "planted",
            PlotStatus::Growing => "growing",
            PlotStatus::ReadyForHarvest => "ready_for_harvest",
            PlotStatus::Harvesting => "harvesting",
            PlotStatus::Dormant => "dormant",
        }
    }

    /// Decode a stored status, falling back to `Growing` for unknown values
    pub fn parse_lenient(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }
}

impl std::fmt::Display for PlotStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a stored status string is not one of the known states
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown plot status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for PlotStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        PlotStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// Parse a stored harvest quantity. Empty or unparseable text reads as zero.
pub fn parse_kg(raw: &str) -> Decimal {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Decimal::ZERO;
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .unwrap_or(Decimal::ZERO)
}

/// Accepts a number, numeric text, an empty string or null
fn deserialize_kg<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawKg {
        Text(String),
        Int(i64),
        Float(f64),
    }

    let value = Option::<RawKg>::deserialize(deserializer)?;
    Ok(match value {
        Some(RawKg::Text(text)) => parse_kg(&text),
        Some(RawKg::Int(n)) => Decimal::from(n),
        Some(RawKg::Float(n)) => Decimal::try_from(n).unwrap_or(Decimal::ZERO),
        None => Decimal::ZERO,
    })
}

fn deserialize_status<'de, D>(deserializer: D) -> Result<PlotStatus, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value
        .map(|s| PlotStatus::parse_lenient(&s))
        .unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_kg() {
        assert_eq!(parse_kg("12.5"), Decimal::new(125, 1));
        assert_eq!(parse_kg(" 7 "), Decimal::from(7));
        assert_eq!(parse_kg(""), Decimal::ZERO);
        assert_eq!(parse_kg("n/a"), Decimal::ZERO);
    }

    #[test]
    fn test_status_round_trip_strings() {
        for status in PlotStatus::ALL {
            assert_eq!(status.as_str().parse::<PlotStatus>(), Ok(status));
        }
        assert_eq!("HARVESTING".parse::<PlotStatus>(), Ok(PlotStatus::Harvesting));
        assert!("fallow".parse::<PlotStatus>().is_err());
        assert_eq!(PlotStatus::parse_lenient("fallow"), PlotStatus::Growing);
    }

    #[test]
    fn test_deserialize_lenient_fields() {
        let json = r#"{
            "id": "6f1f5a4c-2b55-4c53-9a55-6b1d0d3c1e11",
            "name": "Block A",
            "plantingDate": "2024-01-01",
            "daysToMaturity": 135,
            "daysToOpenNetting": 75,
            "status": "harvesting",
            "currentCycle": 2,
            "harvestAmountKg": "",
            "totalHarvestedKg": "41.25"
        }"#;
        let plot: Plot = serde_json::from_str(json).unwrap();
        assert_eq!(plot.status, PlotStatus::Harvesting);
        assert_eq!(plot.harvest_amount_kg, Decimal::ZERO);
        assert_eq!(plot.total_harvested_kg, Decimal::new(4125, 2));
        assert_eq!(plot.actual_harvest_date, None);
        assert_eq!(plot.polybag_count, 0);
    }

    #[test]
    fn test_deserialize_numeric_and_missing_fields() {
        let json = r#"{
            "id": "6f1f5a4c-2b55-4c53-9a55-6b1d0d3c1e11",
            "name": "Block B",
            "plantingDate": "2024-01-01",
            "daysToMaturity": 135,
            "daysToOpenNetting": 75,
            "status": "unknown_state",
            "harvestAmountKg": 3,
            "totalHarvestedKg": null
        }"#;
        let plot: Plot = serde_json::from_str(json).unwrap();
        assert_eq!(plot.status, PlotStatus::Growing);
        assert_eq!(plot.current_cycle, 1);
        assert_eq!(plot.harvest_amount_kg, Decimal::from(3));
        assert_eq!(plot.total_harvested_kg, Decimal::ZERO);
    }
}
