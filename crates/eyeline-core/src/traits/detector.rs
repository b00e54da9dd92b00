//! Detector adapter trait.

use async_trait::async_trait;
use thiserror::Error;

use crate::traits::artifact::ArtifactRef;
use crate::types::coordinates::EyeCoordinates;

/// Failure to locate eyes in one image.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DetectionError {
    /// The detector ran but found no usable face.
    #[error("No face detected in {0}")]
    NoFace(String),

    /// The detector did not answer within the configured bound.
    #[error("Detection timed out after {0} seconds")]
    Timeout(u64),

    /// The detector process could not be started or exited abnormally.
    #[error("Detector failed: {0}")]
    Failed(String),

    /// The detector answered with output that could not be parsed.
    #[error("Invalid detector output: {0}")]
    InvalidOutput(String),
}

/// Black-box eye localisation for one stored image.
#[async_trait]
pub trait EyeDetector: Send + Sync + std::fmt::Debug + 'static {
    /// Return the detector name used in logs.
    fn name(&self) -> &str;

    /// Locate both eye centres in the image.
    async fn detect(&self, image: &ArtifactRef) -> Result<EyeCoordinates, DetectionError>;
}
