//! # eyeline-api
//!
//! HTTP API layer for Eyeline built on Axum.
//!
//! Provides the job endpoints under `/api`, the legacy frontend routes,
//! middleware (CORS, request logging), DTOs, and error mapping.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use error::ApiErrorResponse;
pub use router::build_router;
pub use state::AppState;
