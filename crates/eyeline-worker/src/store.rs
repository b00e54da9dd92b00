//! Process-wide job store.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use eyeline_core::types::id::JobId;

use crate::record::JobRecord;

/// Result of trying to take a finished job out of the store.
#[derive(Debug)]
pub enum Take {
    /// The job was finished and has been removed; the caller owns cleanup.
    Finished(Arc<JobRecord>),
    /// The job exists but is still running; it stays tracked.
    Running,
    /// No such job.
    Missing,
}

/// Owner of every tracked job record.
///
/// Records sit behind `Arc` so readers and the worker touch the map only
/// for the lookup; removal goes through `remove_if`, which makes
/// fetch-and-delete a single step per key.
#[derive(Debug, Default)]
pub struct JobStore {
    jobs: DashMap<JobId, Arc<JobRecord>>,
}

impl JobStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            jobs: DashMap::new(),
        }
    }

    /// Generate an id that no tracked job uses.
    pub fn allocate_id(&self) -> JobId {
        loop {
            let id = JobId::new();
            if !self.jobs.contains_key(&id) {
                return id;
            }
        }
    }

    /// Start tracking a record. Returns `false` if its id is already taken.
    pub fn insert(&self, record: Arc<JobRecord>) -> bool {
        match self.jobs.entry(record.id()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(record);
                true
            }
        }
    }

    /// Look up a job.
    pub fn get(&self, id: JobId) -> Option<Arc<JobRecord>> {
        self.jobs.get(&id).map(|r| Arc::clone(r.value()))
    }

    /// Number of tracked jobs.
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// Whether no jobs are tracked.
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Number of tracked jobs still being processed.
    pub fn running_count(&self) -> usize {
        self.jobs.iter().filter(|r| !r.value().is_terminal()).count()
    }

    /// Remove the job if, and only if, it has finished.
    ///
    /// Of several concurrent callers for the same id at most one receives
    /// [`Take::Finished`]; the others see [`Take::Missing`].
    pub fn take_finished(&self, id: JobId) -> Take {
        if let Some((_, record)) = self.jobs.remove_if(&id, |_, r| r.is_terminal()) {
            return Take::Finished(record);
        }
        if self.jobs.contains_key(&id) {
            Take::Running
        } else {
            Take::Missing
        }
    }

    /// Remove every finished job older than `ttl` and return them.
    pub fn remove_expired(&self, now: DateTime<Utc>, ttl: Duration) -> Vec<Arc<JobRecord>> {
        let candidates: Vec<JobId> = self
            .jobs
            .iter()
            .filter(|entry| entry.value().is_expired(now, ttl))
            .map(|entry| *entry.key())
            .collect();

        candidates
            .into_iter()
            .filter_map(|id| {
                self.jobs
                    .remove_if(&id, |_, r| r.is_expired(now, ttl))
                    .map(|(_, record)| record)
            })
            .collect()
    }
}
