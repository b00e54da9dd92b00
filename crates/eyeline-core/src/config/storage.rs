//! Upload storage configuration.

use serde::{Deserialize, Serialize};

/// Where and what uploads may be stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory; each job gets a `<upload_root>/<job_id>/` namespace.
    #[serde(default = "default_upload_root")]
    pub upload_root: String,
    /// Maximum request body size in bytes for one batch (default 256 MB).
    #[serde(default = "default_max_upload")]
    pub max_upload_size_bytes: u64,
    /// Accepted file extensions, compared case-insensitively.
    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: Vec<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_root: default_upload_root(),
            max_upload_size_bytes: default_max_upload(),
            allowed_extensions: default_allowed_extensions(),
        }
    }
}

fn default_upload_root() -> String {
    "./data/uploads".to_string()
}

fn default_max_upload() -> u64 {
    268_435_456 // 256 MB
}

fn default_allowed_extensions() -> Vec<String> {
    ["png", "jpg", "jpeg", "gif"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}
