//! Batch job handlers.

use axum::Json;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;

use eyeline_core::error::AppError;
use eyeline_core::types::id::JobId;
use eyeline_service::{UploadedImage, validate_batch};
use eyeline_worker::JobSnapshot;

use crate::dto::response::{ApiResponse, JobCreatedResponse, JobProgressResponse, JobResultResponse};
use crate::error::ApiError;
use crate::extractors::parse_job_id;
use crate::state::AppState;

/// Multipart field carrying the images; repeated once per file.
pub const IMAGES_FIELD: &str = "images";

/// POST /api/jobs
pub async fn create_job(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<JobCreatedResponse>>), ApiError> {
    let job_id = accept_batch(&state, multipart).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(JobCreatedResponse { job_id })),
    ))
}

/// GET /api/jobs/{id}
pub async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<JobSnapshot>>, ApiError> {
    let job_id = parse_job_id(&id)?;
    let snapshot = state.coordinator.status(job_id)?;
    Ok(Json(ApiResponse::ok(snapshot)))
}

/// GET /api/jobs/{id}/progress
pub async fn get_progress(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<JobProgressResponse>>, ApiError> {
    let job_id = parse_job_id(&id)?;
    let progress = state.coordinator.progress(job_id)?;
    Ok(Json(ApiResponse::ok(JobProgressResponse { job_id, progress })))
}

/// GET /api/jobs/{id}/result
pub async fn get_result(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<JobResultResponse>>, ApiError> {
    let job_id = parse_job_id(&id)?;
    let eye_positions = state.coordinator.fetch_result(job_id).await?;
    Ok(Json(ApiResponse::ok(JobResultResponse {
        job_id,
        eye_positions,
    })))
}

/// Read, validate, and submit an upload batch.
pub(crate) async fn accept_batch(
    state: &AppState,
    multipart: Multipart,
) -> Result<JobId, ApiError> {
    let images = read_images(multipart).await?;
    validate_batch(&state.config.storage, &images)?;
    Ok(state.coordinator.submit(images).await?)
}

/// Collect every file sent under [`IMAGES_FIELD`], in request order.
async fn read_images(mut multipart: Multipart) -> Result<Vec<UploadedImage>, AppError> {
    let mut images = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Multipart error: {e}")))?
    {
        if field.name() != Some(IMAGES_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::validation(format!("Read error: {e}")))?;

        // Browsers send an empty part when no file was picked.
        if filename.is_empty() && data.is_empty() {
            continue;
        }
        images.push(UploadedImage { filename, data });
    }

    Ok(images)
}
