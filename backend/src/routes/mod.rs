//! Route definitions for the plot lifecycle API

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/businesses/:business_id", business_routes())
}

/// Routes scoped to one business
fn business_routes() -> Router<AppState> {
    Router::new()
        .nest("/plots", plot_routes())
        .route("/dashboard", get(handlers::get_dashboard))
        .route("/reports/harvest", get(handlers::get_harvest_report))
}

/// Plot card and lifecycle routes
fn plot_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_plot_cards))
        .route("/:plot_id/card", get(handlers::get_plot_card))
        .route("/:plot_id/harvest", post(handlers::record_harvest))
        .route("/:plot_id/replant", post(handlers::replant_plot))
        .route("/:plot_id/status", post(handlers::update_plot_status))
        .route("/:plot_id/netting", post(handlers::open_plot_netting))
}
