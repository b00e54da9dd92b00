//! Core traits defined in `eyeline-core` and implemented by other crates.

pub mod artifact;
pub mod detector;

pub use artifact::{ArtifactRef, ArtifactStore};
pub use detector::{DetectionError, EyeDetector};
