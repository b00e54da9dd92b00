//! Job execution and expiry configuration.

use serde::{Deserialize, Serialize};

/// Background job settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobsConfig {
    /// Upper bound for a single detector call; expiry fails the job.
    #[serde(default = "default_detection_timeout")]
    pub detection_timeout_seconds: u64,
    /// How long a finished job waits to be fetched before it is reaped.
    /// `0` keeps unfetched jobs forever.
    #[serde(default = "default_result_ttl")]
    pub result_ttl_seconds: u64,
    /// Cron expression (with seconds) for the expiry sweep.
    #[serde(default = "default_reaper_schedule")]
    pub reaper_schedule: String,
}

impl Default for JobsConfig {
    fn default() -> Self {
        Self {
            detection_timeout_seconds: default_detection_timeout(),
            result_ttl_seconds: default_result_ttl(),
            reaper_schedule: default_reaper_schedule(),
        }
    }
}

fn default_detection_timeout() -> u64 {
    60
}

fn default_result_ttl() -> u64 {
    3600
}

fn default_reaper_schedule() -> String {
    "0 */5 * * * *".to_string()
}
