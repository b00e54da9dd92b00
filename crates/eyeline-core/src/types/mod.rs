//! Shared domain types.

pub mod coordinates;
pub mod id;

pub use coordinates::{EyeCoordinates, PixelPoint};
pub use id::JobId;
