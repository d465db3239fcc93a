//! Liveness endpoint

use axum::{extract::State, Json};
use serde::Serialize;
use shared::MetricsPolicy;

use crate::AppState;

/// Liveness report with database pool and metrics policy details
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub database: DatabaseHealth,
    pub metrics_policy: MetricsPolicy,
    pub utc_offset_hours: i32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseHealth {
    pub connected: bool,
    pub pool_size: u32,
    pub idle_connections: usize,
}

impl HealthResponse {
    fn new(database: DatabaseHealth, metrics_policy: MetricsPolicy, utc_offset_hours: i32) -> Self {
        Self {
            status: if database.connected { "healthy" } else { "degraded" },
            version: env!("CARGO_PKG_VERSION"),
            database,
            metrics_policy,
            utc_offset_hours,
        }
    }
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let connected = match sqlx::query("SELECT 1").execute(&state.db).await {
        Ok(_) => true,
        Err(err) => {
            tracing::warn!("Database health check failed: {}", err);
            false
        }
    };

    let database = DatabaseHealth {
        connected,
        pool_size: state.db.size(),
        idle_connections: state.db.num_idle(),
    };

    Json(HealthResponse::new(
        database,
        *state.calculator.policy(),
        state.config.metrics.utc_offset_hours,
    ))
}
