//! # eyeline-service
//!
//! Job coordination for Eyeline. The coordinator is the public contract:
//! submit a batch, poll its progress, fetch its result exactly once.
//! Upload validation runs in front of it.
//!
//! Dependencies are provided at construction time via `Arc` references.

pub mod coordinator;
pub mod validation;

pub use coordinator::{JobCoordinator, UploadedImage};
pub use validation::validate_batch;
