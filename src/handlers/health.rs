use axum::{extract::State, http::StatusCode, response::Json};
use chrono::Utc;
use tracing::info;

use crate::models::HealthResponse;
use crate::services::prompter::MODEL;
use crate::state::AppState;

/// Health check endpoint
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let now = Utc::now();
    let concurrency = state.limiter.metrics();

    let response = HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        service: env!("CARGO_PKG_NAME").to_string(),
        timestamp: now,
        uptime_seconds: (now - state.started_at).num_seconds(),
        model: MODEL.to_string(),
        concurrency,
    };

    info!(
        available_permits = concurrency.available_permits,
        "Health check completed"
    );

    Json(response)
}

/// Readiness check endpoint
pub async fn ready_handler() -> StatusCode {
    StatusCode::OK
}
