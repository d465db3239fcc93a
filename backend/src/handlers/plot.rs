//! Plot card and lifecycle HTTP handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use super::{reference_date, AsOfQuery};
use crate::error::AppResult;
use crate::services::plot::{
    OpenNettingInput, PlotCard, PlotService, RecordHarvestInput, ReplantInput, UpdateStatusInput,
};
use crate::AppState;

fn plot_service(state: &AppState) -> PlotService {
    PlotService::new(state.db.clone(), state.calculator)
}

/// List plot cards for a business
pub async fn list_plot_cards(
    State(state): State<AppState>,
    Path(business_id): Path<Uuid>,
    Query(query): Query<AsOfQuery>,
) -> AppResult<Json<Vec<PlotCard>>> {
    let reference = reference_date(&state, query.as_of.as_deref())?;
    let cards = plot_service(&state).get_plot_cards(business_id, reference).await?;
    Ok(Json(cards))
}

/// Get the card for a single plot
pub async fn get_plot_card(
    State(state): State<AppState>,
    Path((business_id, plot_id)): Path<(Uuid, Uuid)>,
    Query(query): Query<AsOfQuery>,
) -> AppResult<Json<PlotCard>> {
    let reference = reference_date(&state, query.as_of.as_deref())?;
    let card = plot_service(&state)
        .get_plot_card(business_id, plot_id, reference)
        .await?;
    Ok(Json(card))
}

/// Record a harvest pick
pub async fn record_harvest(
    State(state): State<AppState>,
    Path((business_id, plot_id)): Path<(Uuid, Uuid)>,
    Json(input): Json<RecordHarvestInput>,
) -> AppResult<Json<PlotCard>> {
    let reference = reference_date(&state, None)?;
    let card = plot_service(&state)
        .record_harvest(business_id, plot_id, input, reference)
        .await?;
    Ok(Json(card))
}

/// Start the next planting cycle
pub async fn replant_plot(
    State(state): State<AppState>,
    Path((business_id, plot_id)): Path<(Uuid, Uuid)>,
    Json(input): Json<ReplantInput>,
) -> AppResult<Json<PlotCard>> {
    let reference = reference_date(&state, None)?;
    let card = plot_service(&state)
        .replant(business_id, plot_id, input.planting_date, reference)
        .await?;
    Ok(Json(card))
}

/// Move a plot forward in its lifecycle
pub async fn update_plot_status(
    State(state): State<AppState>,
    Path((business_id, plot_id)): Path<(Uuid, Uuid)>,
    Json(input): Json<UpdateStatusInput>,
) -> AppResult<Json<PlotCard>> {
    let reference = reference_date(&state, None)?;
    let card = plot_service(&state)
        .update_status(business_id, plot_id, input.status, reference)
        .await?;
    Ok(Json(card))
}

/// Override the netting-open date
pub async fn open_plot_netting(
    State(state): State<AppState>,
    Path((business_id, plot_id)): Path<(Uuid, Uuid)>,
    Json(input): Json<OpenNettingInput>,
) -> AppResult<Json<PlotCard>> {
    let reference = reference_date(&state, None)?;
    let card = plot_service(&state)
        .open_netting(business_id, plot_id, input.open_date, reference)
        .await?;
    Ok(Json(card))
}
