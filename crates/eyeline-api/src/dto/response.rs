//! Response DTOs.

use serde::{Deserialize, Serialize};

use eyeline_core::types::coordinates::EyeCoordinates;
use eyeline_core::types::id::JobId;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Returned when a batch is accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobCreatedResponse {
    /// Id to poll with.
    pub job_id: JobId,
}

/// Progress of a running or finished job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobProgressResponse {
    /// Job id.
    pub job_id: JobId,
    /// Whole-number percentage.
    pub progress: u8,
}

/// Coordinates for every image of a completed job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobResultResponse {
    /// Job id.
    pub job_id: JobId,
    /// One entry per image, in upload order.
    pub eye_positions: Vec<EyeCoordinates>,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status.
    pub status: String,
    /// Version.
    pub version: String,
    /// Uptime.
    pub uptime_seconds: u64,
    /// Jobs currently tracked.
    pub live_jobs: usize,
    /// Artifact store status.
    pub storage: String,
}

/// Legacy `/get_progress` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyProgress {
    pub progress: u8,
}

/// Legacy `/get_info` payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyEyeInfo {
    pub eye_position: Vec<EyeCoordinates>,
}
