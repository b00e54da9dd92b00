//! External detector command configuration.

use serde::{Deserialize, Serialize};

/// How to invoke the eye detector for one image.
///
/// Every argument has `{input}` replaced with the absolute image path. The
/// command must print one JSON object with `width`, `height`, `left_eye`
/// and `right_eye` to stdout. Exit code 2 means no face was found; any
/// other non-zero exit is reported as a detector failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Executable to run.
    #[serde(default = "default_command")]
    pub command: String,
    /// Argument template.
    #[serde(default = "default_args")]
    pub args: Vec<String>,
    /// Working directory for the process (model files are usually relative).
    #[serde(default)]
    pub working_dir: Option<String>,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            command: default_command(),
            args: default_args(),
            working_dir: None,
        }
    }
}

fn default_command() -> String {
    "python3".to_string()
}

fn default_args() -> Vec<String> {
    vec!["detection/eye_coords.py".to_string(), "{input}".to_string()]
}
