//! Job record: the shared state of one submitted batch.
//!
//! Progress is a single atomic counter and the terminal outcome is a
//! write-once cell, so readers never observe a partial update and the
//! worker never needs a lock to publish.

use std::fmt;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use eyeline_core::traits::artifact::ArtifactRef;
use eyeline_core::types::coordinates::EyeCoordinates;
use eyeline_core::types::id::JobId;

/// Status of a job, derived from whether an outcome has been recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// The worker is still processing images.
    Running,
    /// Every image was processed.
    Completed,
    /// Detection failed for one of the images.
    Failed,
}

impl JobStatus {
    /// Check if the job is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Terminal result of a job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    /// Coordinates for every image, in submission order.
    Completed(Vec<EyeCoordinates>),
    /// Why the job stopped.
    Failed(String),
}

#[derive(Debug)]
struct Terminal {
    outcome: JobOutcome,
    finished_at: DateTime<Utc>,
}

/// One tracked job.
#[derive(Debug)]
pub struct JobRecord {
    id: JobId,
    images: Vec<ArtifactRef>,
    completed: AtomicUsize,
    terminal: OnceLock<Terminal>,
    created_at: DateTime<Utc>,
}

impl JobRecord {
    /// Create a running job over the stored images.
    pub fn new(id: JobId, images: Vec<ArtifactRef>) -> Self {
        debug_assert!(!images.is_empty(), "a job needs at least one image");
        Self {
            id,
            images,
            completed: AtomicUsize::new(0),
            terminal: OnceLock::new(),
            created_at: Utc::now(),
        }
    }

    /// The job id.
    pub fn id(&self) -> JobId {
        self.id
    }

    /// Stored images, in submission order.
    pub fn images(&self) -> &[ArtifactRef] {
        &self.images
    }

    /// Number of images in the batch.
    pub fn total(&self) -> usize {
        self.images.len()
    }

    /// Number of images processed so far.
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Acquire)
    }

    /// Whole-number percentage of processed images (0–100).
    ///
    /// Reads 100 only once the job has completed, so a client that fetches
    /// the result on seeing 100 never races the final transition.
    pub fn progress(&self) -> u8 {
        if self.status() == JobStatus::Completed {
            return 100;
        }
        let total = self.total().max(1);
        (self.completed().min(total) * 100 / total).min(99) as u8
    }

    /// Current status.
    pub fn status(&self) -> JobStatus {
        match self.terminal.get().map(|t| &t.outcome) {
            None => JobStatus::Running,
            Some(JobOutcome::Completed(_)) => JobStatus::Completed,
            Some(JobOutcome::Failed(_)) => JobStatus::Failed,
        }
    }

    /// Whether an outcome has been recorded.
    pub fn is_terminal(&self) -> bool {
        self.terminal.get().is_some()
    }

    /// The recorded outcome, once the job has finished.
    pub fn outcome(&self) -> Option<&JobOutcome> {
        self.terminal.get().map(|t| &t.outcome)
    }

    /// When the job was submitted.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// When the job reached its terminal state.
    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.terminal.get().map(|t| t.finished_at)
    }

    /// Whether the job finished more than `ttl` before `now`.
    ///
    /// Running jobs never expire.
    pub fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        self.finished_at()
            .and_then(|finished| now.signed_duration_since(finished).to_std().ok())
            .is_some_and(|age| age >= ttl)
    }

    /// Record one more processed image and return the new count.
    pub(crate) fn advance(&self) -> usize {
        let next = self.completed.fetch_add(1, Ordering::AcqRel) + 1;
        debug_assert!(next <= self.total());
        next
    }

    /// Record the terminal outcome. Returns `false` if one was already set.
    pub(crate) fn finish(&self, outcome: JobOutcome) -> bool {
        self.terminal
            .set(Terminal {
                outcome,
                finished_at: Utc::now(),
            })
            .is_ok()
    }

    /// Point-in-time view for status queries.
    pub fn snapshot(&self) -> JobSnapshot {
        let terminal = self.terminal.get();
        JobSnapshot {
            job_id: self.id,
            status: self.status(),
            progress: self.progress(),
            total: self.total(),
            completed: self.completed(),
            error: match terminal.map(|t| &t.outcome) {
                Some(JobOutcome::Failed(message)) => Some(message.clone()),
                _ => None,
            },
            created_at: self.created_at,
            finished_at: terminal.map(|t| t.finished_at),
        }
    }
}

/// Serializable view of a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSnapshot {
    /// Job id.
    pub job_id: JobId,
    /// Current status.
    pub status: JobStatus,
    /// Percentage of processed images.
    pub progress: u8,
    /// Images in the batch.
    pub total: usize,
    /// Images processed so far.
    pub completed: usize,
    /// Failure message, for failed jobs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Submission time.
    pub created_at: DateTime<Utc>,
    /// Completion time, for finished jobs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
}
