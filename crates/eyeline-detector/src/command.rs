//! Runs an external detector program per image.
//!
//! The program receives the stored image path through its argument template,
//! prints the coordinates as JSON on stdout, and signals "no face" with exit
//! code 2.

use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use eyeline_core::config::DetectorConfig;
use eyeline_core::traits::artifact::ArtifactRef;
use eyeline_core::traits::detector::{DetectionError, EyeDetector};
use eyeline_core::types::coordinates::EyeCoordinates;

/// Exit code the detector program uses for "no face in image".
const EXIT_NO_FACE: i32 = 2;

/// Detector adapter backed by a child process.
#[derive(Debug, Clone)]
pub struct CommandDetector {
    /// Executable to run.
    command: String,
    /// Argument template containing `{input}` placeholders.
    args: Vec<String>,
    /// Working directory for the child process.
    working_dir: Option<PathBuf>,
}

impl CommandDetector {
    /// Create a detector from configuration.
    pub fn new(config: &DetectorConfig) -> Self {
        Self {
            command: config.command.clone(),
            args: config.args.clone(),
            working_dir: config.working_dir.as_ref().map(PathBuf::from),
        }
    }

    /// Substitute the `{input}` placeholder in the argument template.
    pub fn substitute_args(&self, image: &ArtifactRef) -> Vec<String> {
        let input = image.path.to_string_lossy();
        self.args
            .iter()
            .map(|arg| arg.replace("{input}", &input))
            .collect()
    }
}

#[async_trait]
impl EyeDetector for CommandDetector {
    fn name(&self) -> &str {
        &self.command
    }

    async fn detect(&self, image: &ArtifactRef) -> Result<EyeCoordinates, DetectionError> {
        let args = self.substitute_args(image);

        let mut cmd = Command::new(&self.command);
        cmd.args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        if let Some(ref dir) = self.working_dir {
            cmd.current_dir(dir);
        }

        let start = std::time::Instant::now();
        let output = cmd.output().await.map_err(|e| {
            tracing::error!(command = %self.command, error = %e, "Failed to start detector");
            DetectionError::Failed(format!("could not run '{}': {e}", self.command))
        })?;
        let duration_ms = start.elapsed().as_millis() as u64;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stderr: String = stderr.trim().chars().take(500).collect();
            return match output.status.code() {
                Some(EXIT_NO_FACE) => Err(DetectionError::NoFace(image.name.clone())),
                code => {
                    tracing::warn!(
                        image = %image.name,
                        exit_code = ?code,
                        stderr = %stderr,
                        "Detector exited with failure"
                    );
                    Err(DetectionError::Failed(format!(
                        "exit code {}: {stderr}",
                        code.map_or_else(|| "none".to_string(), |c| c.to_string())
                    )))
                }
            };
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let coords = parse_output(&stdout)?;

        tracing::debug!(image = %image.name, duration_ms, "Detector finished");
        Ok(coords)
    }
}

/// Parse the detector's stdout.
///
/// The whole output is tried first; otherwise the last non-empty line, so
/// programs that log progress before the answer still work.
fn parse_output(stdout: &str) -> Result<EyeCoordinates, DetectionError> {
    let trimmed = stdout.trim();
    if let Ok(coords) = serde_json::from_str(trimmed) {
        return Ok(coords);
    }

    let last = trimmed
        .lines()
        .rev()
        .find(|l| !l.trim().is_empty())
        .unwrap_or_default();

    serde_json::from_str(last).map_err(|e| {
        let shown: String = last.chars().take(200).collect();
        DetectionError::InvalidOutput(format!("{e} in '{shown}'"))
    })
}
