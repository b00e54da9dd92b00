//! Convenience result type alias for Eyeline.

use crate::error::AppError;

/// A specialized `Result` type for Eyeline operations.
pub type AppResult<T> = Result<T, AppError>;
