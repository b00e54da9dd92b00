//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Instant;

use eyeline_core::config::AppConfig;
use eyeline_service::JobCoordinator;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Job coordinator
    pub coordinator: Arc<JobCoordinator>,
    /// Process start time, for uptime reporting
    pub started_at: Instant,
}

impl AppState {
    /// Create the state.
    pub fn new(config: Arc<AppConfig>, coordinator: Arc<JobCoordinator>) -> Self {
        Self {
            config,
            coordinator,
            started_at: Instant::now(),
        }
    }
}
