//! Plot service: loads plot snapshots and applies lifecycle transitions

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::{
    advance_status, inspect_plot, open_netting, parse_kg, record_harvest, replant, HarvestGrade,
    MetricsCalculator, Plot, PlotDataIssue, PlotMetrics, PlotStatus,
};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Plot service for reading plots and persisting lifecycle changes
#[derive(Clone)]
pub struct PlotService {
    db: PgPool,
    calculator: MetricsCalculator,
}

/// Plot row as stored. Harvest quantities are kept as text.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PlotRow {
    pub id: Uuid,
    pub business_id: Uuid,
    pub name: String,
    pub location: Option<String>,
    pub crop_type: Option<String>,
    pub planting_date: NaiveDate,
    pub days_to_maturity: i32,
    pub days_to_open_netting: i32,
    pub actual_harvest_date: Option<NaiveDate>,
    pub netting_open_date: Option<NaiveDate>,
    pub expected_harvest_date: Option<NaiveDate>,
    pub status: Option<String>,
    pub current_cycle: i32,
    pub harvest_amount_kg: Option<String>,
    pub total_harvested_kg: Option<String>,
    pub polybag_count: i32,
}

impl From<PlotRow> for Plot {
    fn from(row: PlotRow) -> Self {
        let status = match row.status.as_deref().map(str::parse::<PlotStatus>) {
            Some(Ok(status)) => status,
            Some(Err(err)) => {
                tracing::warn!(plot_id = %row.id, "{}, treating as growing", err);
                PlotStatus::default()
            }
            None => PlotStatus::default(),
        };

        Plot {
            id: row.id,
            name: row.name,
            location: row.location.unwrap_or_default(),
            crop_type: row.crop_type.unwrap_or_default(),
            planting_date: row.planting_date,
            days_to_maturity: row.days_to_maturity,
            days_to_open_netting: row.days_to_open_netting,
            actual_harvest_date: row.actual_harvest_date,
            netting_open_date: row.netting_open_date,
            expected_harvest_date: row.expected_harvest_date,
            status,
            current_cycle: u32::try_from(row.current_cycle).unwrap_or(0),
            harvest_amount_kg: row.harvest_amount_kg.as_deref().map(parse_kg).unwrap_or_default(),
            total_harvested_kg: row.total_harvested_kg.as_deref().map(parse_kg).unwrap_or_default(),
            polybag_count: u32::try_from(row.polybag_count).unwrap_or(0),
        }
    }
}

/// Everything the plot card renders
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlotCard {
    pub plot: Plot,
    pub metrics: PlotMetrics,
    pub issues: Vec<PlotDataIssue>,
}

/// Input for recording a harvest pick
#[derive(Debug, Deserialize)]
pub struct RecordHarvestInput {
    pub harvest_date: NaiveDate,
    pub amount_kg: Decimal,
    pub grade: Option<HarvestGrade>,
}

/// Input for starting the next cycle
#[derive(Debug, Deserialize)]
pub struct ReplantInput {
    pub planting_date: NaiveDate,
}

/// Input for a forward status change
#[derive(Debug, Deserialize)]
pub struct UpdateStatusInput {
    pub status: PlotStatus,
}

/// Input for overriding the netting date
#[derive(Debug, Deserialize)]
pub struct OpenNettingInput {
    pub open_date: NaiveDate,
}

const PLOT_COLUMNS: &str = r#"
    id, business_id, name, location, crop_type, planting_date,
    days_to_maturity, days_to_open_netting, actual_harvest_date,
    netting_open_date, expected_harvest_date, status, current_cycle,
    harvest_amount_kg, total_harvested_kg, polybag_count
"#;

impl PlotService {
    /// Create a new PlotService instance
    pub fn new(db: PgPool, calculator: MetricsCalculator) -> Self {
        Self { db, calculator }
    }

    /// Get all plots for a business
    #[tracing::instrument(skip(self))]
    pub async fn get_plots(&self, business_id: Uuid) -> AppResult<Vec<Plot>> {
        let rows = sqlx::query_as::<_, PlotRow>(&format!(
            "SELECT {} FROM plots WHERE business_id = $1 ORDER BY name ASC",
            PLOT_COLUMNS
        ))
        .bind(business_id)
        .fetch_all(&self.db)
        .await?;

        tracing::debug!(count = rows.len(), "Loaded plots");
        Ok(rows.into_iter().map(Plot::from).collect())
    }

    /// Get a single plot
    #[tracing::instrument(skip(self))]
    pub async fn get_plot(&self, business_id: Uuid, plot_id: Uuid) -> AppResult<Plot> {
        let row = sqlx::query_as::<_, PlotRow>(&format!(
            "SELECT {} FROM plots WHERE id = $1 AND business_id = $2",
            PLOT_COLUMNS
        ))
        .bind(plot_id)
        .bind(business_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Plot".to_string()))?;

        Ok(row.into())
    }

    /// Build the card for one plot
    pub fn build_card(&self, plot: Plot, reference: NaiveDate) -> PlotCard {
        let issues = inspect_plot(&plot);
        for issue in &issues {
            tracing::warn!(plot_id = %plot.id, "Plot data issue: {}", issue);
        }

        PlotCard {
            metrics: self.calculator.compute(&plot, reference),
            plot,
            issues,
        }
    }

    /// Get the card for one plot
    pub async fn get_plot_card(
        &self,
        business_id: Uuid,
        plot_id: Uuid,
        reference: NaiveDate,
    ) -> AppResult<PlotCard> {
        let plot = self.get_plot(business_id, plot_id).await?;
        Ok(self.build_card(plot, reference))
    }

    /// Get cards for every plot of a business
    pub async fn get_plot_cards(
        &self,
        business_id: Uuid,
        reference: NaiveDate,
    ) -> AppResult<Vec<PlotCard>> {
        let plots = self.get_plots(business_id).await?;
        Ok(plots
            .into_iter()
            .map(|plot| self.build_card(plot, reference))
            .collect())
    }

    /// Record a harvest pick and log it in the harvest event log
    #[tracing::instrument(skip(self, input), fields(amount_kg = %input.amount_kg))]
    pub async fn record_harvest(
        &self,
        business_id: Uuid,
        plot_id: Uuid,
        input: RecordHarvestInput,
        reference: NaiveDate,
    ) -> AppResult<PlotCard> {
        let mut tx = self.db.begin().await?;
        let plot = Self::lock_plot(&mut tx, business_id, plot_id).await?;
        let updated = record_harvest(&plot, input.harvest_date, input.amount_kg)?;
        Self::save_plot(&mut tx, business_id, &updated).await?;

        sqlx::query(
            r#"
            INSERT INTO harvest_events (plot_id, cycle, harvest_date, grade, quantity_kg)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(plot_id)
        .bind(cycle_to_db(updated.current_cycle))
        .bind(input.harvest_date)
        .bind(input.grade.unwrap_or(HarvestGrade::GradeA).as_str())
        .bind(input.amount_kg)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            plot_id = %plot_id,
            cycle = updated.current_cycle,
            total_kg = %updated.total_harvested_kg,
            "Harvest recorded"
        );
        Ok(self.build_card(updated, reference))
    }

    /// Start the next planting cycle
    #[tracing::instrument(skip(self))]
    pub async fn replant(
        &self,
        business_id: Uuid,
        plot_id: Uuid,
        planting_date: NaiveDate,
        reference: NaiveDate,
    ) -> AppResult<PlotCard> {
        let updated = self
            .transition(business_id, plot_id, |plot| {
                replant(plot, planting_date).map_err(AppError::from)
            })
            .await?;

        tracing::info!(plot_id = %plot_id, cycle = updated.current_cycle, "Plot replanted");
        Ok(self.build_card(updated, reference))
    }

    /// Move a plot forward in its lifecycle
    #[tracing::instrument(skip(self))]
    pub async fn update_status(
        &self,
        business_id: Uuid,
        plot_id: Uuid,
        status: PlotStatus,
        reference: NaiveDate,
    ) -> AppResult<PlotCard> {
        let updated = self
            .transition(business_id, plot_id, |plot| {
                advance_status(plot, status).map_err(AppError::from)
            })
            .await?;

        Ok(self.build_card(updated, reference))
    }

    /// Store an explicit netting-open date
    #[tracing::instrument(skip(self))]
    pub async fn open_netting(
        &self,
        business_id: Uuid,
        plot_id: Uuid,
        open_date: NaiveDate,
        reference: NaiveDate,
    ) -> AppResult<PlotCard> {
        let updated = self
            .transition(business_id, plot_id, |plot| {
                if open_date < plot.planting_date {
                    return Err(AppError::validation(
                        "open_date",
                        "Netting cannot open before the planting date",
                    ));
                }
                Ok(open_netting(plot, open_date))
            })
            .await?;

        Ok(self.build_card(updated, reference))
    }

    /// Apply `apply` to the locked row and save the result in one transaction
    async fn transition<F>(&self, business_id: Uuid, plot_id: Uuid, apply: F) -> AppResult<Plot>
    where
        F: FnOnce(&Plot) -> AppResult<Plot>,
    {
        let mut tx = self.db.begin().await?;
        let plot = Self::lock_plot(&mut tx, business_id, plot_id).await?;
        let updated = apply(&plot)?;
        Self::save_plot(&mut tx, business_id, &updated).await?;
        tx.commit().await?;
        Ok(updated)
    }

    /// Load a plot and hold its row lock until the transaction ends
    async fn lock_plot(
        tx: &mut Transaction<'_, Postgres>,
        business_id: Uuid,
        plot_id: Uuid,
    ) -> AppResult<Plot> {
        let row = sqlx::query_as::<_, PlotRow>(&locked_plot_query())
            .bind(plot_id)
            .bind(business_id)
            .fetch_optional(&mut **tx)
            .await?
            .ok_or_else(|| AppError::NotFound("Plot".to_string()))?;

        Ok(row.into())
    }

    async fn save_plot(
        tx: &mut Transaction<'_, Postgres>,
        business_id: Uuid,
        plot: &Plot,
    ) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE plots
            SET planting_date = $1, actual_harvest_date = $2, netting_open_date = $3,
                expected_harvest_date = $4, status = $5, current_cycle = $6,
                harvest_amount_kg = $7, total_harvested_kg = $8, updated_at = NOW()
            WHERE id = $9 AND business_id = $10
            "#,
        )
        .bind(plot.planting_date)
        .bind(plot.actual_harvest_date)
        .bind(plot.netting_open_date)
        .bind(plot.expected_harvest_date)
        .bind(plot.status.as_str())
        .bind(cycle_to_db(plot.current_cycle))
        .bind(plot.harvest_amount_kg.to_string())
        .bind(plot.total_harvested_kg.to_string())
        .bind(plot.id)
        .bind(business_id)
        .execute(&mut **tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Plot".to_string()));
        }
        Ok(())
    }
}

fn locked_plot_query() -> String {
    format!(
        "SELECT {} FROM plots WHERE id = $1 AND business_id = $2 FOR UPDATE",
        PLOT_COLUMNS
    )
}

fn cycle_to_db(cycle: u32) -> i32 {
    i32::try_from(cycle).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> PlotRow {
        PlotRow {
            id: Uuid::new_v4(),
            business_id: Uuid::new_v4(),
            name: "Block A".to_string(),
            location: None,
            crop_type: Some("melon".to_string()),
            planting_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            days_to_maturity: 135,
            days_to_open_netting: 75,
            actual_harvest_date: None,
            netting_open_date: None,
            expected_harvest_date: None,
            status: Some("harvesting".to_string()),
            current_cycle: 2,
            harvest_amount_kg: Some("".to_string()),
            total_harvested_kg: Some("32.5".to_string()),
            polybag_count: 400,
        }
    }

    #[test]
    fn test_row_conversion() {
        let plot = Plot::from(row());
        assert_eq!(plot.status, PlotStatus::Harvesting);
        assert_eq!(plot.location, "");
        assert_eq!(plot.crop_type, "melon");
        assert_eq!(plot.current_cycle, 2);
        assert_eq!(plot.harvest_amount_kg, Decimal::ZERO);
        assert_eq!(plot.total_harvested_kg, Decimal::new(325, 1));
        assert_eq!(plot.polybag_count, 400);
    }

    #[test]
    fn test_row_conversion_degrades_bad_values() {
        let mut bad = row();
        bad.status = Some("fallow".to_string());
        bad.current_cycle = -1;
        bad.total_harvested_kg = None;

        let plot = Plot::from(bad);
        assert_eq!(plot.status, PlotStatus::Growing);
        assert_eq!(plot.current_cycle, 0);
        assert_eq!(plot.total_harvested_kg, Decimal::ZERO);
    }

    #[test]
    fn test_locked_plot_query_takes_row_lock() {
        let query = locked_plot_query();
        assert!(query.contains("total_harvested_kg"));
        assert!(query.contains("WHERE id = $1 AND business_id = $2"));
        assert!(query.trim_end().ends_with("FOR UPDATE"));
    }

    #[test]
    fn test_cycle_to_db() {
        assert_eq!(cycle_to_db(3), 3);
        assert_eq!(cycle_to_db(u32::MAX), i32::MAX);
    }
}
