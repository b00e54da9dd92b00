//! # eyeline-storage
//!
//! Artifact store implementations for Eyeline. Uploads for one job live
//! together in a namespace so they can be reclaimed in a single call.

pub mod naming;
pub mod providers;

pub use providers::LocalArtifactStore;
