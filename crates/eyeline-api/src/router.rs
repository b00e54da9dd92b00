//! Route definitions for the Eyeline HTTP API.
//!
//! Job routes are mounted under `/api`; the legacy frontend routes sit at
//! the root. The router receives `AppState` and passes it to all handlers
//! via Axum's `State` extractor.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let max_upload = usize::try_from(state.config.storage.max_upload_size_bytes)
        .unwrap_or(usize::MAX);
    let cors = middleware::cors::build_cors_layer(&state.config.server.cors);

    let api_routes = Router::new().merge(job_routes()).merge(health_routes());

    Router::new()
        .nest("/api", api_routes)
        .merge(legacy_routes())
        .layer(DefaultBodyLimit::max(max_upload))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Submission, status, progress, and result
fn job_routes() -> Router<AppState> {
    Router::new()
        .route("/jobs", post(handlers::jobs::create_job))
        .route("/jobs/{id}", get(handlers::jobs::get_job))
        .route("/jobs/{id}/progress", get(handlers::jobs::get_progress))
        .route("/jobs/{id}/result", get(handlers::jobs::get_result))
}

/// Health check
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

/// Routes used by the original web frontend
fn legacy_routes() -> Router<AppState> {
    Router::new()
        .route("/upload_images", post(handlers::legacy::upload_images))
        .route("/get_progress/{id}", get(handlers::legacy::get_progress))
        .route("/get_info/{id}", get(handlers::legacy::get_info))
}
