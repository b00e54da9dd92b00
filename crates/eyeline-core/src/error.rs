//! Unified application error types for Eyeline.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator. The job lifecycle has its own
//! [`JobError`] so callers can tell "unknown" apart from "not finished yet".

use std::fmt;
use thiserror::Error;

use crate::types::id::JobId;

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// The requested resource was not found.
    NotFound,
    /// Input validation failed.
    Validation,
    /// The resource exists but is not in a state that allows the operation.
    Conflict,
    /// A background processing job finished in a failed state.
    Processing,
    /// An internal server error occurred.
    Internal,
    /// A storage I/O error occurred.
    Storage,
    /// A configuration error occurred.
    Configuration,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::Conflict => write!(f, "CONFLICT"),
            Self::Processing => write!(f, "PROCESSING"),
            Self::Internal => write!(f, "INTERNAL"),
            Self::Storage => write!(f, "STORAGE"),
            Self::Configuration => write!(f, "CONFIGURATION"),
        }
    }
}

/// The unified application error used throughout Eyeline.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Create a storage error.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Storage, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorKind::Storage, format!("I/O error: {err}"), err)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}

/// Errors returned by the job coordinator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JobError {
    /// A batch was submitted without any images.
    #[error("No images were submitted")]
    EmptyBatch,

    /// Uploaded images could not be persisted; no job was created.
    #[error("Failed to store uploaded images: {0}")]
    StorageFailure(String),

    /// The job id was never issued, or its result was already fetched.
    #[error("Job {0} not found")]
    UnknownJob(JobId),

    /// The job is still running.
    #[error("Job {0} has not finished yet")]
    JobNotFinished(JobId),

    /// The job terminated because detection failed for one of its images.
    #[error("Job {job_id} failed: {message}")]
    JobFailed {
        /// The failed job.
        job_id: JobId,
        /// The recorded failure.
        message: String,
    },
}

impl From<JobError> for AppError {
    fn from(err: JobError) -> Self {
        let kind = match &err {
            JobError::EmptyBatch => ErrorKind::Validation,
            JobError::StorageFailure(_) => ErrorKind::Storage,
            JobError::UnknownJob(_) => ErrorKind::NotFound,
            JobError::JobNotFinished(_) => ErrorKind::Conflict,
            JobError::JobFailed { .. } => ErrorKind::Processing,
        };
        Self::new(kind, err.to_string())
    }
}
