//! Job coordinator: submission, progress, and exactly-once result retrieval.

use std::sync::Arc;

use bytes::Bytes;
use tracing::{info, warn};

use eyeline_core::error::JobError;
use eyeline_core::traits::artifact::ArtifactStore;
use eyeline_core::types::coordinates::EyeCoordinates;
use eyeline_core::types::id::JobId;
use eyeline_worker::{JobOutcome, JobRecord, JobRunner, JobSnapshot, JobStore, Take};

/// One uploaded image as received from the client.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    /// Client-supplied file name.
    pub filename: String,
    /// Raw image bytes.
    pub data: Bytes,
}

impl UploadedImage {
    /// Create an uploaded image.
    pub fn new(filename: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            data: data.into(),
        }
    }
}

/// Front door for batch jobs.
#[derive(Clone)]
pub struct JobCoordinator {
    /// Tracked jobs.
    store: Arc<JobStore>,
    /// Uploaded image storage.
    artifacts: Arc<dyn ArtifactStore>,
    /// Background runner.
    runner: Arc<JobRunner>,
}

impl std::fmt::Debug for JobCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobCoordinator")
            .field("live_jobs", &self.store.len())
            .field("artifacts", &self.artifacts.store_type())
            .finish()
    }
}

impl JobCoordinator {
    /// Creates a new job coordinator.
    pub fn new(
        store: Arc<JobStore>,
        artifacts: Arc<dyn ArtifactStore>,
        runner: Arc<JobRunner>,
    ) -> Self {
        Self {
            store,
            artifacts,
            runner,
        }
    }

    /// Store the batch, start its job, and return the job id.
    ///
    /// Returns as soon as the job is tracked; detection runs in the
    /// background. If any image cannot be stored, or the call is dropped
    /// before the job is tracked, everything written for the batch is
    /// deleted and no job is created.
    pub async fn submit(&self, images: Vec<UploadedImage>) -> Result<JobId, JobError> {
        if images.is_empty() {
            return Err(JobError::EmptyBatch);
        }

        let job_id = self.store.allocate_id();
        let guard = PartialUpload::new(job_id, Arc::clone(&self.artifacts));
        let mut stored = Vec::with_capacity(images.len());

        for (index, image) in images.into_iter().enumerate() {
            match self
                .artifacts
                .store(job_id, index, &image.filename, image.data)
                .await
            {
                Ok(artifact) => stored.push(artifact),
                Err(e) => {
                    warn!(job_id = %job_id, file = %image.filename, error = %e, "Failed to store upload");
                    guard.disarm();
                    if let Err(cleanup) = self.artifacts.delete_namespace(job_id).await {
                        warn!(job_id = %job_id, error = %cleanup, "Failed to roll back partial upload");
                    }
                    return Err(JobError::StorageFailure(e.message));
                }
            }
        }

        guard.disarm();
        let record = Arc::new(JobRecord::new(job_id, stored));
        if !self.store.insert(Arc::clone(&record)) {
            // The namespace belongs to the job already holding this id.
            return Err(JobError::StorageFailure(format!(
                "job id {job_id} is already in use"
            )));
        }

        info!(job_id = %job_id, images = record.total(), "Job submitted");
        self.runner.spawn(record);
        Ok(job_id)
    }

    /// Current progress of a job as a whole-number percentage.
    pub fn progress(&self, job_id: JobId) -> Result<u8, JobError> {
        self.store
            .get(job_id)
            .map(|record| record.progress())
            .ok_or(JobError::UnknownJob(job_id))
    }

    /// Non-destructive view of a job.
    pub fn status(&self, job_id: JobId) -> Result<JobSnapshot, JobError> {
        self.store
            .get(job_id)
            .map(|record| record.snapshot())
            .ok_or(JobError::UnknownJob(job_id))
    }

    /// Fetch a finished job's coordinates, in submission order.
    ///
    /// Succeeds at most once per job: the job is forgotten and its uploads
    /// deleted. A failed job is consumed the same way and reports its
    /// failure. A running job is left untouched.
    pub async fn fetch_result(&self, job_id: JobId) -> Result<Vec<EyeCoordinates>, JobError> {
        let record = match self.store.take_finished(job_id) {
            Take::Finished(record) => record,
            Take::Running => return Err(JobError::JobNotFinished(job_id)),
            Take::Missing => return Err(JobError::UnknownJob(job_id)),
        };

        self.release_artifacts(&record).await;

        match record.outcome() {
            Some(JobOutcome::Completed(results)) => {
                info!(job_id = %job_id, images = results.len(), "Job result fetched");
                Ok(results.clone())
            }
            Some(JobOutcome::Failed(message)) => {
                info!(job_id = %job_id, "Failed job fetched");
                Err(JobError::JobFailed {
                    job_id,
                    message: message.clone(),
                })
            }
            None => Err(JobError::JobNotFinished(job_id)),
        }
    }

    /// Number of tracked jobs.
    pub fn live_jobs(&self) -> usize {
        self.store.len()
    }

    /// Number of jobs whose worker has not finished.
    pub fn running_jobs(&self) -> usize {
        self.store.running_count()
    }

    /// Whether the artifact store can accept uploads.
    pub async fn storage_healthy(&self) -> bool {
        match self.artifacts.health_check().await {
            Ok(healthy) => healthy,
            Err(e) => {
                warn!(error = %e, "Artifact store health check failed");
                false
            }
        }
    }

    /// Delete a removed job's uploads; failures are logged, not returned.
    async fn release_artifacts(&self, record: &JobRecord) {
        for artifact in record.images() {
            if let Err(e) = self.artifacts.delete(artifact).await {
                warn!(job_id = %record.id(), file = %artifact.name, error = %e, "Failed to delete upload");
            }
        }
        if let Err(e) = self.artifacts.delete_namespace(record.id()).await {
            warn!(job_id = %record.id(), error = %e, "Failed to delete job directory");
        }
    }
}

/// Deletes a job's namespace when dropped while still armed.
///
/// Held across the upload loop of [`JobCoordinator::submit`]: if the
/// submitting future is dropped mid-upload, the files already written
/// would otherwise have no job record pointing at them.
struct PartialUpload {
    job_id: JobId,
    artifacts: Option<Arc<dyn ArtifactStore>>,
}

impl PartialUpload {
    fn new(job_id: JobId, artifacts: Arc<dyn ArtifactStore>) -> Self {
        Self {
            job_id,
            artifacts: Some(artifacts),
        }
    }

    fn disarm(mut self) {
        self.artifacts = None;
    }
}

impl Drop for PartialUpload {
    fn drop(&mut self) {
        let Some(artifacts) = self.artifacts.take() else {
            return;
        };
        let job_id = self.job_id;

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                warn!(job_id = %job_id, "Submission abandoned, removing partial upload");
                handle.spawn(async move {
                    if let Err(e) = artifacts.delete_namespace(job_id).await {
                        warn!(job_id = %job_id, error = %e, "Failed to remove partial upload");
                    }
                });
            }
            Err(_) => {
                warn!(job_id = %job_id, "No runtime to remove partial upload");
            }
        }
    }
}
