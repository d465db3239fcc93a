//! Reporting handlers for the dashboard and harvest reconciliation

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use shared::DateRange;
use uuid::Uuid;

use super::{parse_date, reference_date, AsOfQuery};
use crate::error::{AppError, AppResult};
use crate::services::reporting::{DashboardMetrics, ReportingService};
use crate::AppState;

#[derive(Deserialize)]
pub struct HarvestReportQuery {
    pub as_of: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub format: Option<String>, // "json" or "csv"
}

/// Get dashboard metrics
pub async fn get_dashboard(
    State(state): State<AppState>,
    Path(business_id): Path<Uuid>,
    Query(query): Query<AsOfQuery>,
) -> AppResult<Json<DashboardMetrics>> {
    let reference = reference_date(&state, query.as_of.as_deref())?;
    let service = ReportingService::new(state.db.clone(), state.calculator);
    let metrics = service.get_dashboard_metrics(business_id, reference).await?;
    Ok(Json(metrics))
}

/// Get harvest reconciliation report
pub async fn get_harvest_report(
    State(state): State<AppState>,
    Path(business_id): Path<Uuid>,
    Query(query): Query<HarvestReportQuery>,
) -> AppResult<impl IntoResponse> {
    let reference = reference_date(&state, query.as_of.as_deref())?;
    let range = DateRange::new(
        query.start_date.as_deref().map(|s| parse_date("start_date", s)).transpose()?,
        query.end_date.as_deref().map(|s| parse_date("end_date", s)).transpose()?,
    );
    if range.is_inverted() {
        return Err(AppError::validation(
            "start_date",
            "start_date must not be after end_date",
        ));
    }

    let service = ReportingService::new(state.db.clone(), state.calculator);
    let data = service.get_harvest_report(business_id, reference, range).await?;

    if query.format.as_deref() == Some("csv") {
        let csv = ReportingService::export_to_csv(&data)?;
        Ok((
            [(header::CONTENT_TYPE, "text/csv"), (header::CONTENT_DISPOSITION, "attachment; filename=\"harvest_report.csv\"")],
            csv,
        ).into_response())
    } else {
        Ok(Json(data).into_response())
    }
}
