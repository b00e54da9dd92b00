//! Typed path parameter helpers.

use eyeline_core::error::AppError;
use eyeline_core::types::id::JobId;

/// Parses a job id from a path segment.
///
/// A segment that is not a job id names no tracked job, so it is reported
/// the same way as an unknown id.
pub fn parse_job_id(s: &str) -> Result<JobId, AppError> {
    s.parse::<JobId>()
        .map_err(|_| AppError::not_found(format!("Job {s} not found")))
}
