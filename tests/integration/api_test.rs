//! Integration tests for the HTTP routes.

mod helpers;

use http::StatusCode;

use eyeline_core::types::id::JobId;

use helpers::{ScriptedDetector, TestApp, png_bytes};

fn job_id_from(body: &serde_json::Value, pointer: &str) -> JobId {
    body.pointer(pointer)
        .and_then(|v| v.as_str())
        .expect("No job_id in response")
        .parse()
        .expect("job_id is not a valid id")
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new(ScriptedDetector::open()).await;

    let response = app.get("/api/health").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
    assert_eq!(response.body["live_jobs"], 0);
    assert_eq!(response.body["storage"], "available");
    assert!(response.body.get("uptime_seconds").is_some());
}

#[tokio::test]
async fn test_submit_poll_and_fetch() {
    let app = TestApp::new(ScriptedDetector::open()).await;

    let response = app
        .upload(
            "/api/jobs",
            &[("one.png", png_bytes(4, 4)), ("two.png", png_bytes(8, 6))],
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["success"], true);
    let id = job_id_from(&response.body, "/data/job_id");

    app.wait_until_finished(id).await;

    let response = app.get(&format!("/api/jobs/{id}/progress")).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["progress"], 100);

    let response = app.get(&format!("/api/jobs/{id}")).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "completed");
    assert_eq!(response.body["data"]["total"], 2);

    let response = app.get(&format!("/api/jobs/{id}/result")).await;
    assert_eq!(response.status, StatusCode::OK);
    let positions = response.body["data"]["eye_positions"]
        .as_array()
        .expect("eye_positions is not an array");
    assert_eq!(positions.len(), 2);
    assert_eq!(positions[0]["left_eye"], serde_json::json!([200, 240]));
    assert_eq!(positions[1]["left_eye"], serde_json::json!([201, 240]));
    assert_eq!(positions[1]["width"], 640);

    let response = app.get(&format!("/api/jobs/{id}/result")).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"], "NOT_FOUND");

    let response = app.get(&format!("/api/jobs/{id}/progress")).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_result_while_running_is_conflict() {
    let app = TestApp::new(ScriptedDetector::gated()).await;

    let response = app
        .upload("/api/jobs", &[("face.jpg", png_bytes(4, 4))])
        .await;
    let id = job_id_from(&response.body, "/data/job_id");

    let response = app.get(&format!("/api/jobs/{id}/result")).await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.body["error"], "JOB_NOT_FINISHED");

    let response = app.get(&format!("/api/jobs/{id}/progress")).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["progress"], 0);

    app.detector.release(1);
    app.wait_until_finished(id).await;
    let response = app.get(&format!("/api/jobs/{id}/result")).await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_failed_job_result() {
    let app = TestApp::new(ScriptedDetector::open()).await;

    let response = app
        .upload(
            "/api/jobs",
            &[("ok.png", png_bytes(4, 4)), ("noface.png", png_bytes(4, 4))],
        )
        .await;
    let id = job_id_from(&response.body, "/data/job_id");
    app.wait_until_finished(id).await;

    let response = app.get(&format!("/api/jobs/{id}")).await;
    assert_eq!(response.body["data"]["status"], "failed");
    assert_eq!(response.body["data"]["completed"], 1);

    let response = app.get(&format!("/api/jobs/{id}/result")).await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.body["error"], "JOB_FAILED");
    assert!(
        response.body["message"]
            .as_str()
            .unwrap()
            .contains("No face detected")
    );

    let response = app.get(&format!("/api/jobs/{id}/result")).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert!(!app.artifacts.namespace_dir(id).exists());
}

#[tokio::test]
async fn test_upload_validation() {
    let app = TestApp::new(ScriptedDetector::open()).await;

    let response = app.upload("/api/jobs", &[]).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");

    let response = app
        .upload("/api/jobs", &[("notes.txt", png_bytes(4, 4))])
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(
        response.body["message"]
            .as_str()
            .unwrap()
            .starts_with("Invalid file type")
    );

    let response = app
        .upload(
            "/api/jobs",
            &[("good.png", png_bytes(4, 4)), ("bad.png", b"not an image".to_vec())],
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(
        response.body["message"]
            .as_str()
            .unwrap()
            .starts_with("Invalid image file")
    );

    assert_eq!(app.coordinator.live_jobs(), 0);
    assert_eq!(app.detector.calls(), 0);
}

#[tokio::test]
async fn test_unknown_and_malformed_ids() {
    let app = TestApp::new(ScriptedDetector::open()).await;

    let response = app.get(&format!("/api/jobs/{}", JobId::new())).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = app.get("/api/jobs/not-a-job/progress").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = app.get("/get_progress/not-a-job").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_legacy_frontend_flow() {
    let app = TestApp::new(ScriptedDetector::open()).await;

    let response = app
        .upload(
            "/upload_images",
            &[("selfie.JPG", png_bytes(4, 4)), ("selfie.JPG", png_bytes(4, 4))],
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let id = job_id_from(&response.body, "/job_id");

    app.wait_until_finished(id).await;

    let response = app.get(&format!("/get_progress/{id}")).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["progress"], 100);

    let response = app.get(&format!("/get_info/{id}")).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    let positions = response.body["data"]["eye_position"].as_array().unwrap();
    assert_eq!(positions.len(), 2);
    assert_eq!(positions[0]["right_eye"], serde_json::json!([400, 240]));

    let response = app.get(&format!("/get_info/{id}")).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_legacy_progress_reports_failed_job() {
    let app = TestApp::new(ScriptedDetector::open()).await;

    let response = app
        .upload(
            "/upload_images",
            &[("one.png", png_bytes(4, 4)), ("noface.png", png_bytes(4, 4))],
        )
        .await;
    let id = job_id_from(&response.body, "/job_id");
    app.wait_until_finished(id).await;

    let response = app.get(&format!("/get_progress/{id}")).await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.body["error"], "JOB_FAILED");
    assert!(
        response.body["message"]
            .as_str()
            .unwrap()
            .contains("No face detected")
    );

    let response = app.get(&format!("/get_progress/{id}")).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert!(!app.artifacts.namespace_dir(id).exists());
    assert_eq!(app.coordinator.live_jobs(), 0);
}
