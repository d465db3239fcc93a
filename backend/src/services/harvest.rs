//! Harvest log service: reads graded harvest events

use chrono::NaiveDate;
use rust_decimal::Decimal;
use shared::{DateRange, HarvestEvent, HarvestGrade};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppResult;

/// Read access to the harvest event log
#[derive(Clone)]
pub struct HarvestLogService {
    db: PgPool,
}

/// Harvest event row as stored
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct HarvestEventRow {
    pub id: Uuid,
    pub plot_id: Uuid,
    pub cycle: i32,
    pub harvest_date: NaiveDate,
    pub grade: String,
    pub quantity_kg: Decimal,
}

impl From<HarvestEventRow> for HarvestEvent {
    fn from(row: HarvestEventRow) -> Self {
        HarvestEvent {
            id: row.id,
            plot_id: row.plot_id,
            cycle: u32::try_from(row.cycle).unwrap_or(0),
            harvest_date: row.harvest_date,
            grade: HarvestGrade::parse_lenient(&row.grade),
            quantity_kg: row.quantity_kg,
        }
    }
}

impl HarvestLogService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Get harvest events for every plot of a business within `range`
    #[tracing::instrument(skip(self))]
    pub async fn get_events(&self, business_id: Uuid, range: DateRange) -> AppResult<Vec<HarvestEvent>> {
        let rows = sqlx::query_as::<_, HarvestEventRow>(
            r#"
            SELECT h.id, h.plot_id, h.cycle, h.harvest_date, h.grade, h.quantity_kg
            FROM harvest_events h
            JOIN plots p ON p.id = h.plot_id
            WHERE p.business_id = $1
              AND ($2::date IS NULL OR h.harvest_date >= $2)
              AND ($3::date IS NULL OR h.harvest_date <= $3)
            ORDER BY h.harvest_date ASC
            "#,
        )
        .bind(business_id)
        .bind(range.start)
        .bind(range.end)
        .fetch_all(&self.db)
        .await?;

        tracing::debug!(count = rows.len(), "Loaded harvest events");
        Ok(rows.into_iter().map(HarvestEvent::from).collect())
    }
}
