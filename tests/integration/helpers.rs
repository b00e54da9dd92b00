//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use eyeline_api::{AppState, build_router};
use eyeline_core::config::AppConfig;
use eyeline_core::traits::artifact::ArtifactRef;
use eyeline_core::traits::detector::{DetectionError, EyeDetector};
use eyeline_core::types::coordinates::{EyeCoordinates, PixelPoint};
use eyeline_core::types::id::JobId;
use eyeline_service::JobCoordinator;
use eyeline_storage::LocalArtifactStore;
use eyeline_worker::{JobRunner, JobSnapshot, JobStore};

const BOUNDARY: &str = "eyeline-test-boundary";

/// Coordinates the scripted detector reports for the image at `index`.
pub fn coords_for(index: usize) -> EyeCoordinates {
    let n = index as i32;
    EyeCoordinates {
        width: 640,
        height: 480,
        left_eye: PixelPoint(200 + n, 240),
        right_eye: PixelPoint(400 + n, 240),
    }
}

/// In-process detector driven by the stored file name.
///
/// Names containing `noface` fail. Every call first takes a permit from
/// the gate, so a gated detector holds jobs at a known progress.
#[derive(Debug)]
pub struct ScriptedDetector {
    gate: tokio::sync::Semaphore,
    calls: AtomicUsize,
    seen: Mutex<Vec<String>>,
}

impl ScriptedDetector {
    /// A detector that answers immediately.
    pub fn open() -> Arc<Self> {
        Self::with_permits(tokio::sync::Semaphore::MAX_PERMITS)
    }

    /// A detector that answers only after [`ScriptedDetector::release`].
    pub fn gated() -> Arc<Self> {
        Self::with_permits(0)
    }

    fn with_permits(permits: usize) -> Arc<Self> {
        Arc::new(Self {
            gate: tokio::sync::Semaphore::new(permits),
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        })
    }

    /// Let `n` more detections through.
    pub fn release(&self, n: usize) {
        self.gate.add_permits(n);
    }

    /// Number of detections started.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Stored names of the images seen, in call order.
    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl EyeDetector for ScriptedDetector {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn detect(&self, image: &ArtifactRef) -> Result<EyeCoordinates, DetectionError> {
        self.gate
            .acquire()
            .await
            .map_err(|e| DetectionError::Failed(e.to_string()))?
            .forget();
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(image.name.clone());

        if !image.path.exists() {
            return Err(DetectionError::Failed(format!("missing {}", image.name)));
        }
        if image.name.contains("noface") {
            return Err(DetectionError::NoFace(image.name.clone()));
        }
        let index: usize = image.name[..4]
            .parse()
            .map_err(|_| DetectionError::InvalidOutput(image.name.clone()))?;
        Ok(coords_for(index))
    }
}

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Coordinator behind the router
    pub coordinator: Arc<JobCoordinator>,
    /// Artifact store rooted in a temp directory
    pub artifacts: Arc<LocalArtifactStore>,
    /// Detector used by the runner
    pub detector: Arc<ScriptedDetector>,
    /// Application config
    pub config: AppConfig,
    _upload_dir: tempfile::TempDir,
}

impl TestApp {
    /// Create a new test application around the given detector
    pub async fn new(detector: Arc<ScriptedDetector>) -> Self {
        let upload_dir = tempfile::tempdir().expect("Failed to create upload dir");

        let mut config = AppConfig::default();
        config.storage.upload_root = upload_dir.path().to_string_lossy().into_owned();
        config.storage.max_upload_size_bytes = 4 * 1024 * 1024;

        let artifacts = Arc::new(
            LocalArtifactStore::new(&config.storage.upload_root)
                .await
                .expect("Failed to init artifact store"),
        );
        let runner = Arc::new(JobRunner::new(detector.clone(), Duration::from_secs(5)));
        let coordinator = Arc::new(JobCoordinator::new(
            Arc::new(JobStore::new()),
            artifacts.clone(),
            runner,
        ));

        let state = AppState::new(Arc::new(config.clone()), Arc::clone(&coordinator));
        let router = build_router(state);

        Self {
            router,
            coordinator,
            artifacts,
            detector,
            config,
            _upload_dir: upload_dir,
        }
    }

    /// Poll until the job reaches a terminal state
    pub async fn wait_until_finished(&self, job_id: JobId) -> JobSnapshot {
        for _ in 0..1000 {
            let snapshot = self
                .coordinator
                .status(job_id)
                .expect("Job vanished while waiting");
            if snapshot.status.is_terminal() {
                return snapshot;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("Job {job_id} did not finish");
    }

    /// Poll until at least `completed` images have been processed
    pub async fn wait_until_completed(&self, job_id: JobId, completed: usize) {
        for _ in 0..1000 {
            let snapshot = self
                .coordinator
                .status(job_id)
                .expect("Job vanished while waiting");
            if snapshot.completed >= completed {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("Job {job_id} did not reach {completed} images");
    }

    /// Make a GET request to the test app
    pub async fn get(&self, path: &str) -> TestResponse {
        let req = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .expect("Failed to build request");
        self.send(req).await
    }

    /// POST a multipart body with one `images` part per file
    pub async fn upload(&self, path: &str, files: &[(&str, Vec<u8>)]) -> TestResponse {
        let req = Request::builder()
            .method("POST")
            .uri(path)
            .header(
                "Content-Type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body("images", files)))
            .expect("Failed to build request");
        self.send(req).await
    }

    async fn send(&self, req: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read body")
            .to_bytes();

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

/// Build a `multipart/form-data` body with every file under `field`.
pub fn multipart_body(field: &str, files: &[(&str, Vec<u8>)]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, data) in files {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{field}\"; filename=\"{name}\"\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// A small valid PNG.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::DynamicImage::new_rgb8(width, height);
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .expect("Failed to encode PNG");
    buf
}
