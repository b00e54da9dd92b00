//! Periodic reclamation of finished jobs whose results were never fetched.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio_cron_scheduler::{Job as CronJob, JobScheduler};
use tracing;

use eyeline_core::config::JobsConfig;
use eyeline_core::error::AppError;
use eyeline_core::traits::artifact::ArtifactStore;

use crate::store::JobStore;

/// Cron-driven sweeper for expired jobs.
pub struct ExpiryReaper {
    /// The underlying job scheduler
    scheduler: JobScheduler,
    /// Cron expression (with seconds) for the sweep
    schedule: String,
    /// Age after completion at which a job is reclaimed
    ttl: Duration,
    store: Arc<JobStore>,
    artifacts: Arc<dyn ArtifactStore>,
}

impl std::fmt::Debug for ExpiryReaper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExpiryReaper")
            .field("schedule", &self.schedule)
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl ExpiryReaper {
    /// Create a reaper from configuration.
    ///
    /// Returns `Ok(None)` when `result_ttl_seconds` is zero.
    pub async fn new(
        store: Arc<JobStore>,
        artifacts: Arc<dyn ArtifactStore>,
        config: &JobsConfig,
    ) -> Result<Option<Self>, AppError> {
        if config.result_ttl_seconds == 0 {
            tracing::info!("Result expiry disabled");
            return Ok(None);
        }

        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {}", e)))?;

        Ok(Some(Self {
            scheduler,
            schedule: config.reaper_schedule.clone(),
            ttl: Duration::from_secs(config.result_ttl_seconds),
            store,
            artifacts,
        }))
    }

    /// Register the sweep and start the scheduler.
    pub async fn start(&self) -> Result<(), AppError> {
        let store = Arc::clone(&self.store);
        let artifacts = Arc::clone(&self.artifacts);
        let ttl = self.ttl;

        let job = CronJob::new_async(self.schedule.as_str(), move |_uuid, _lock| {
            let store = Arc::clone(&store);
            let artifacts = Arc::clone(&artifacts);
            Box::pin(async move {
                reap_expired(&store, artifacts.as_ref(), ttl, Utc::now()).await;
            })
        })
        .map_err(|e| {
            AppError::configuration(format!(
                "Invalid reaper schedule '{}': {}",
                self.schedule, e
            ))
        })?;

        self.scheduler
            .add(job)
            .await
            .map_err(|e| AppError::internal(format!("Failed to add reaper schedule: {}", e)))?;

        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {}", e)))?;

        tracing::info!(
            schedule = %self.schedule,
            ttl_seconds = self.ttl.as_secs(),
            "Expiry reaper started"
        );
        Ok(())
    }

    /// Stop the scheduler.
    pub async fn shutdown(&mut self) -> Result<(), AppError> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {}", e)))?;

        tracing::info!("Expiry reaper shut down");
        Ok(())
    }
}

/// Remove finished jobs older than `ttl` and delete their uploads.
///
/// Returns the number of jobs reclaimed. Running jobs are never touched.
pub async fn reap_expired(
    store: &JobStore,
    artifacts: &dyn ArtifactStore,
    ttl: Duration,
    now: DateTime<Utc>,
) -> usize {
    let expired = store.remove_expired(now, ttl);
    for record in &expired {
        if let Err(e) = artifacts.delete_namespace(record.id()).await {
            tracing::warn!(job_id = %record.id(), error = %e, "Failed to delete expired uploads");
        }
    }

    if !expired.is_empty() {
        tracing::info!(count = expired.len(), "Reclaimed expired jobs");
    }
    expired.len()
}
