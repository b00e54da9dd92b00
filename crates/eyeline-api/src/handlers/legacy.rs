//! Routes with the response shapes the original web frontend expects.

use axum::Json;
use axum::extract::{Multipart, Path, State};

use eyeline_worker::JobStatus;

use crate::dto::response::{ApiResponse, JobCreatedResponse, LegacyEyeInfo, LegacyProgress};
use crate::error::ApiError;
use crate::extractors::parse_job_id;
use crate::handlers::jobs::accept_batch;
use crate::state::AppState;

/// POST /upload_images
pub async fn upload_images(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<JobCreatedResponse>, ApiError> {
    let job_id = accept_batch(&state, multipart).await?;
    Ok(Json(JobCreatedResponse { job_id }))
}

/// GET /get_progress/{id}
///
/// The frontend polls until progress reaches 100 or the request fails, and
/// only then asks `/get_info`. A failed job is therefore reported, and
/// consumed, here.
pub async fn get_progress(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<LegacyProgress>, ApiError> {
    let job_id = parse_job_id(&id)?;
    let snapshot = state.coordinator.status(job_id)?;
    if snapshot.status == JobStatus::Failed {
        state.coordinator.fetch_result(job_id).await?;
    }
    Ok(Json(LegacyProgress {
        progress: snapshot.progress,
    }))
}

/// GET /get_info/{id}
pub async fn get_info(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<LegacyEyeInfo>>, ApiError> {
    let job_id = parse_job_id(&id)?;
    let eye_position = state.coordinator.fetch_result(job_id).await?;
    Ok(Json(ApiResponse::ok(LegacyEyeInfo { eye_position })))
}
