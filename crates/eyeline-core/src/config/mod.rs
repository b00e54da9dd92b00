//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section, and every field has a default so an empty file is valid.

pub mod app;
pub mod detector;
pub mod jobs;
pub mod logging;
pub mod storage;

use serde::{Deserialize, Serialize};

pub use self::app::{CorsConfig, ServerConfig};
pub use self::detector::DetectorConfig;
pub use self::jobs::JobsConfig;
pub use self::logging::LoggingConfig;
pub use self::storage::StorageConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Upload storage settings.
    #[serde(default)]
    pub storage: StorageConfig,
    /// External detector settings.
    #[serde(default)]
    pub detector: DetectorConfig,
    /// Job execution and expiry settings.
    #[serde(default)]
    pub jobs: JobsConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges `config/default.toml` with the `config/{env}.toml` overlay and
    /// environment variables prefixed with `EYELINE__`
    /// (e.g. `EYELINE__SERVER__PORT=9000`).
    pub fn load(env: &str) -> Result<Self, AppError> {
        Self::load_from("config", env)
    }

    /// Load configuration from an explicit directory.
    pub fn load_from(dir: &str, env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(&format!("{dir}/default")).required(false))
            .add_source(config::File::with_name(&format!("{dir}/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("EYELINE")
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("storage.allowed_extensions")
                    .with_list_parse_key("detector.args")
                    .with_list_parse_key("server.cors.allowed_origins")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}
