//! Local filesystem artifact store.

use std::path::PathBuf;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;
use tracing::debug;

use eyeline_core::error::{AppError, ErrorKind};
use eyeline_core::result::AppResult;
use eyeline_core::traits::artifact::{ArtifactRef, ArtifactStore};
use eyeline_core::types::id::JobId;

use crate::naming::stored_name;

/// Stores each job's uploads under `<root>/<job_id>/`.
#[derive(Debug, Clone)]
pub struct LocalArtifactStore {
    /// Root directory for all job namespaces.
    root: PathBuf,
}

impl LocalArtifactStore {
    /// Create a new local store rooted at the given path.
    pub async fn new(root_path: &str) -> AppResult<Self> {
        let root = PathBuf::from(root_path);
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create upload root: {}", root.display()),
                e,
            )
        })?;
        let root = fs::canonicalize(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to resolve upload root: {}", root.display()),
                e,
            )
        })?;
        Ok(Self { root })
    }

    /// Directory holding one job's files.
    pub fn namespace_dir(&self, job_id: JobId) -> PathBuf {
        self.root.join(job_id.to_string())
    }

    /// Root directory of the store.
    pub fn root(&self) -> &PathBuf {
        &self.root
    }
}

#[async_trait]
impl ArtifactStore for LocalArtifactStore {
    fn store_type(&self) -> &str {
        "local"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(self.root.exists() && self.root.is_dir())
    }

    async fn store(
        &self,
        job_id: JobId,
        index: usize,
        filename: &str,
        data: Bytes,
    ) -> AppResult<ArtifactRef> {
        let dir = self.namespace_dir(job_id);
        fs::create_dir_all(&dir).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create job directory: {}", dir.display()),
                e,
            )
        })?;

        let name = stored_name(index, filename);
        let path = dir.join(&name);
        fs::write(&path, &data).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to write upload: {}", path.display()),
                e,
            )
        })?;

        debug!(job_id = %job_id, file = %name, bytes = data.len(), "Stored upload");
        Ok(ArtifactRef { job_id, name, path })
    }

    async fn delete(&self, artifact: &ArtifactRef) -> AppResult<()> {
        match fs::remove_file(&artifact.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to delete upload: {}", artifact.path.display()),
                e,
            )),
        }
    }

    async fn delete_namespace(&self, job_id: JobId) -> AppResult<()> {
        let dir = self.namespace_dir(job_id);
        match fs::remove_dir_all(&dir).await {
            Ok(()) => {
                debug!(job_id = %job_id, "Deleted job uploads");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to delete job directory: {}", dir.display()),
                e,
            )),
        }
    }
}
