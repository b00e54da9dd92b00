//! Eyeline Server: batch eye detection over HTTP.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{EnvFilter, fmt};

use eyeline_api::{AppState, build_router};
use eyeline_core::config::AppConfig;
use eyeline_core::error::AppError;
use eyeline_core::traits::artifact::ArtifactStore;
use eyeline_detector::CommandDetector;
use eyeline_service::JobCoordinator;
use eyeline_storage::LocalArtifactStore;
use eyeline_worker::{ExpiryReaper, JobRunner, JobStore};

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from files and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("EYELINE_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Eyeline v{}", env!("CARGO_PKG_VERSION"));
    let config = Arc::new(config);

    // ── Step 1: Artifact store ───────────────────────────────────
    let artifacts: Arc<dyn ArtifactStore> =
        Arc::new(LocalArtifactStore::new(&config.storage.upload_root).await?);
    tracing::info!(root = %config.storage.upload_root, "Artifact store ready");

    // ── Step 2: Detector and runner ──────────────────────────────
    let detector = Arc::new(CommandDetector::new(&config.detector));
    tracing::info!(command = %config.detector.command, args = ?config.detector.args, "Detector configured");
    let runner = Arc::new(JobRunner::new(
        detector,
        Duration::from_secs(config.jobs.detection_timeout_seconds),
    ));

    // ── Step 3: Job store and coordinator ────────────────────────
    let store = Arc::new(JobStore::new());
    let coordinator = Arc::new(JobCoordinator::new(
        Arc::clone(&store),
        Arc::clone(&artifacts),
        runner,
    ));

    // ── Step 4: Expiry reaper ────────────────────────────────────
    let mut reaper = ExpiryReaper::new(Arc::clone(&store), artifacts, &config.jobs).await?;
    if let Some(ref reaper) = reaper {
        reaper.start().await?;
    }

    // ── Step 5: HTTP server ──────────────────────────────────────
    let state = AppState::new(Arc::clone(&config), Arc::clone(&coordinator));
    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!("Eyeline server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            shutdown_signal().await;
            tracing::info!("Shutdown signal received, starting graceful shutdown...");
        })
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    // ── Step 6: Wait for running jobs ────────────────────────────
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    let drained = tokio::time::timeout(grace, async {
        while coordinator.running_jobs() > 0 {
            tokio::time::sleep(Duration::from_millis(200)).await;
        }
    })
    .await;
    if drained.is_err() {
        tracing::warn!(
            running = coordinator.running_jobs(),
            "Grace period elapsed with jobs still running"
        );
    }

    if let Some(ref mut reaper) = reaper {
        reaper.shutdown().await?;
    }

    tracing::info!("Eyeline server stopped");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
