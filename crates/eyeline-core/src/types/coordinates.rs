//! Eye-centre coordinates produced by the detector.

use serde::{Deserialize, Serialize};

/// An integer pixel position `(x, y)` in the original image space.
///
/// Serialized as a two-element array, e.g. `[412, 288]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelPoint(pub i32, pub i32);

impl PixelPoint {
    /// Horizontal position.
    pub fn x(&self) -> i32 {
        self.0
    }

    /// Vertical position.
    pub fn y(&self) -> i32 {
        self.1
    }
}

/// Detection result for a single image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EyeCoordinates {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Centre of the subject's left eye.
    pub left_eye: PixelPoint,
    /// Centre of the subject's right eye.
    pub right_eye: PixelPoint,
}
