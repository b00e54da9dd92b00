//! Job runner: walks a job's images through the detector in order.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use tokio::task::JoinHandle;
use tracing::{self, Instrument};

use eyeline_core::traits::artifact::ArtifactRef;
use eyeline_core::traits::detector::{DetectionError, EyeDetector};
use eyeline_core::types::coordinates::EyeCoordinates;

use crate::record::{JobOutcome, JobRecord};

/// Runs jobs on background tasks, one task per job.
#[derive(Debug, Clone)]
pub struct JobRunner {
    /// Detector used for every image.
    detector: Arc<dyn EyeDetector>,
    /// Upper bound for a single detection; `None` waits forever.
    detection_timeout: Option<Duration>,
}

impl JobRunner {
    /// Create a runner. A zero timeout disables the bound.
    pub fn new(detector: Arc<dyn EyeDetector>, detection_timeout: Duration) -> Self {
        Self {
            detector,
            detection_timeout: (!detection_timeout.is_zero()).then_some(detection_timeout),
        }
    }

    /// Start processing the job on its own task.
    ///
    /// A panic inside the detector is caught and recorded as a failure, so
    /// every spawned job reaches a terminal state.
    pub fn spawn(&self, record: Arc<JobRecord>) -> JoinHandle<()> {
        let runner = self.clone();
        let span = tracing::info_span!("job", job_id = %record.id());

        tokio::spawn(
            async move {
                let outcome = AssertUnwindSafe(runner.execute(&record))
                    .catch_unwind()
                    .await;

                if let Err(panic) = outcome {
                    let message = format!("worker panicked: {}", panic_message(&*panic));
                    tracing::error!(error = %message, "Job worker panicked");
                    record.finish(JobOutcome::Failed(message));
                }
            }
            .instrument(span),
        )
    }

    /// Process every image of the job and record the outcome.
    ///
    /// Stops at the first image that fails; images after it are never
    /// sent to the detector.
    pub async fn execute(&self, record: &JobRecord) {
        let total = record.total();
        tracing::info!(images = total, detector = %self.detector.name(), "Job started");

        let mut results = Vec::with_capacity(total);
        for (i, image) in record.images().iter().enumerate() {
            match self.detect_one(image).await {
                Ok(coords) => {
                    results.push(coords);
                    let done = record.advance();
                    tracing::debug!(image = %image.name, done, total, "Image processed");
                }
                Err(e) => {
                    let message = format!("image {} of {total} ({}): {e}", i + 1, image.name);
                    tracing::warn!(error = %message, "Job failed");
                    record.finish(JobOutcome::Failed(message));
                    return;
                }
            }
        }

        record.finish(JobOutcome::Completed(results));
        tracing::info!(images = total, "Job completed");
    }

    async fn detect_one(&self, image: &ArtifactRef) -> Result<EyeCoordinates, DetectionError> {
        match self.detection_timeout {
            Some(limit) => tokio::time::timeout(limit, self.detector.detect(image))
                .await
                .map_err(|_| DetectionError::Timeout(limit.as_secs()))?,
            None => self.detector.detect(image).await,
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(s) = panic.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic"
    }
}
