//! Artifact store implementations.

pub mod local;

pub use local::LocalArtifactStore;
