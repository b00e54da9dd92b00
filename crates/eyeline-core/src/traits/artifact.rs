//! Artifact store trait for per-job upload storage.

use std::path::PathBuf;

use async_trait::async_trait;
use bytes::Bytes;

use crate::result::AppResult;
use crate::types::id::JobId;

/// Reference to one stored upload.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ArtifactRef {
    /// Job namespace the file belongs to.
    pub job_id: JobId,
    /// Stored file name within the namespace.
    pub name: String,
    /// Absolute location of the stored bytes.
    pub path: PathBuf,
}

/// Holding area for uploaded images, scoped per job.
///
/// The store is the sole owner of the bytes; jobs only keep [`ArtifactRef`]s.
#[async_trait]
pub trait ArtifactStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the store type name (e.g., "local").
    fn store_type(&self) -> &str;

    /// Check whether the store is healthy and writable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Persist `data` under the job's namespace.
    ///
    /// `index` is the position of the file within its batch and keeps equal
    /// file names from overwriting each other.
    async fn store(
        &self,
        job_id: JobId,
        index: usize,
        filename: &str,
        data: Bytes,
    ) -> AppResult<ArtifactRef>;

    /// Delete a single stored file. Missing files are not an error.
    async fn delete(&self, artifact: &ArtifactRef) -> AppResult<()>;

    /// Delete every file stored for a job. A missing namespace is not an error.
    async fn delete_namespace(&self, job_id: JobId) -> AppResult<()>;
}
