//! Job tracking and background execution for Eyeline.
//!
//! This crate provides:
//! - The job store: the sole owner of job records, keyed by job id
//! - A job runner that processes one job per tokio task
//! - An expiry reaper that reclaims finished jobs nobody fetched

pub mod reaper;
pub mod record;
pub mod runner;
pub mod store;

pub use reaper::ExpiryReaper;
pub use record::{JobOutcome, JobRecord, JobSnapshot, JobStatus};
pub use runner::JobRunner;
pub use store::{JobStore, Take};
