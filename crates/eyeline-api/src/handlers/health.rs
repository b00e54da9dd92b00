//! Health check handler.

use axum::Json;
use axum::extract::State;

use crate::dto::response::HealthResponse;
use crate::state::AppState;

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let storage_ok = state.coordinator.storage_healthy().await;

    Json(HealthResponse {
        status: if storage_ok { "ok" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        live_jobs: state.coordinator.live_jobs(),
        storage: if storage_ok { "available" } else { "unavailable" }.to_string(),
    })
}
