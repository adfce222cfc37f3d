//! End-to-end API tests: submit a job over HTTP, poll it to its terminal
//! state, and exercise the validation and not-found paths.
//!
//! The simulator cadence is shrunk to milliseconds so a full lifecycle —
//! ten ticks at most — finishes quickly in real time.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use pretty_assertions::assert_eq;
use serde_json::Value;
use visora_server::{create_app, AppState, Config};

/// Build a server over fresh state with a fast simulator and an isolated
/// upload directory. The tempdir guard must outlive the test.
fn test_server(upload_dir: &tempfile::TempDir) -> (TestServer, Arc<AppState>) {
    let config = Config {
        upload_dir: upload_dir.path().to_path_buf(),
        result_base_url: "https://cdn.test.visora.ai/out".to_string(),
        tick: Duration::from_millis(10),
        ..Config::default()
    };
    let state = AppState::new(config);
    let server = TestServer::new(create_app(state.clone())).expect("test server");
    (server, state)
}

fn minimal_form() -> MultipartForm {
    MultipartForm::new()
        .add_text("script", "hello")
        .add_text("language", "en")
}

/// Poll the status endpoint until the job completes, asserting monotonic
/// progress along the way. Returns the final response body.
async fn poll_until_complete(server: &TestServer, job_id: &str) -> Value {
    let deadline = Instant::now() + Duration::from_secs(5);
    let mut last_progress = 0u64;

    loop {
        let response = server.get(&format!("/api/status/{job_id}")).await;
        assert_eq!(response.status_code(), 200);
        let json: Value = response.json();

        let progress = json["progress"].as_u64().unwrap();
        assert!(
            progress >= last_progress,
            "progress went backwards: {last_progress} -> {progress}"
        );
        last_progress = progress;

        if json["status"] == "completed" {
            return json;
        }
        assert_eq!(json["status"], "processing");
        assert!(json["result"].is_null());

        assert!(
            Instant::now() < deadline,
            "job {job_id} did not complete in time"
        );
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}

#[tokio::test]
async fn test_job_lifecycle_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let (server, _state) = test_server(&dir);

    let response = server.post("/api/generate").multipart(minimal_form()).await;
    assert_eq!(response.status_code(), 201);
    let created: Value = response.json();
    let job_id = created["jobId"].as_str().unwrap().to_string();
    assert_eq!(created["message"], "Job queued successfully");

    // Immediately after creation: processing, zero progress, null result.
    let response = server.get(&format!("/api/status/{job_id}")).await;
    assert_eq!(response.status_code(), 200);
    let json: Value = response.json();
    assert_eq!(json["jobId"], job_id.as_str());
    assert_eq!(json["status"], "processing");
    assert_eq!(json["progress"], 0);
    assert!(json["result"].is_null());

    let done = poll_until_complete(&server, &job_id).await;
    assert_eq!(done["progress"], 100);
    let result = done["result"].as_str().unwrap();
    assert!(result.contains(&job_id));
    assert!(result.starts_with("https://cdn.test.visora.ai/out/"));
    assert!(result.ends_with(".mp4"));

    // The terminal state is idempotent: polling again returns the same body.
    let again: Value = server.get(&format!("/api/status/{job_id}")).await.json();
    assert_eq!(again, done);
}

#[tokio::test]
async fn test_two_jobs_progress_independently() {
    let dir = tempfile::tempdir().unwrap();
    let (server, state) = test_server(&dir);

    let a: Value = server
        .post("/api/generate")
        .multipart(minimal_form())
        .await
        .json();
    let b: Value = server
        .post("/api/generate")
        .multipart(
            MultipartForm::new()
                .add_text("script", "otra cosa")
                .add_text("language", "es"),
        )
        .await
        .json();

    let id_a = a["jobId"].as_str().unwrap().to_string();
    let id_b = b["jobId"].as_str().unwrap().to_string();
    assert_ne!(id_a, id_b);
    assert_eq!(state.jobs.len(), 2);

    let done_a = poll_until_complete(&server, &id_a).await;
    let done_b = poll_until_complete(&server, &id_b).await;

    // Each result locator belongs to its own job.
    assert!(done_a["result"].as_str().unwrap().contains(&id_a));
    assert!(done_b["result"].as_str().unwrap().contains(&id_b));
}

#[tokio::test]
async fn test_unknown_job_returns_404() {
    let dir = tempfile::tempdir().unwrap();
    let (server, _state) = test_server(&dir);

    let response = server.get("/api/status/does-not-exist").await;
    assert_eq!(response.status_code(), 404);
    let json: Value = response.json();
    assert_eq!(json, serde_json::json!({ "error": "Job not found" }));

    let response = server
        .get(&format!("/api/status/{}", uuid::Uuid::new_v4()))
        .await;
    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn test_invalid_submission_creates_no_job() {
    let dir = tempfile::tempdir().unwrap();
    let (server, state) = test_server(&dir);

    // Missing script.
    let response = server
        .post("/api/generate")
        .multipart(MultipartForm::new().add_text("language", "en"))
        .await;
    assert_eq!(response.status_code(), 400);

    // Unsupported language.
    let response = server
        .post("/api/generate")
        .multipart(
            MultipartForm::new()
                .add_text("script", "hello")
                .add_text("language", "xx"),
        )
        .await;
    assert_eq!(response.status_code(), 400);

    // Out-of-range length.
    let response = server
        .post("/api/generate")
        .multipart(
            MultipartForm::new()
                .add_text("script", "hello")
                .add_text("language", "en")
                .add_text("length", "9999"),
        )
        .await;
    assert_eq!(response.status_code(), 400);
    let json: Value = response.json();
    assert_eq!(json["error"], "Invalid request");

    assert!(state.jobs.is_empty());
    assert_eq!(state.simulators.active(), 0);
}

#[tokio::test]
async fn test_voice_sample_is_persisted() {
    let dir = tempfile::tempdir().unwrap();
    let (server, state) = test_server(&dir);

    let sample = Part::bytes(b"RIFF....WAVEfmt ".to_vec())
        .file_name("my-voice.wav")
        .mime_type("audio/wav");
    let form = minimal_form()
        .add_text("voice_type", "female")
        .add_part("voice_file", sample);

    let response = server.post("/api/generate").multipart(form).await;
    assert_eq!(response.status_code(), 201);
    let job_id = response.json::<Value>()["jobId"]
        .as_str()
        .unwrap()
        .to_string();

    // The sample landed in the scratch dir under a generated name with the
    // original extension.
    let entries: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].extension().unwrap(), "wav");
    assert_ne!(entries[0].file_name().unwrap(), "my-voice.wav");
    assert_eq!(
        std::fs::read(&entries[0]).unwrap(),
        b"RIFF....WAVEfmt ".to_vec()
    );

    // And the job record points at it.
    let id = uuid::Uuid::parse_str(&job_id).unwrap();
    let job = state.jobs.get(&id).unwrap();
    assert_eq!(job.params.voice_sample.as_deref(), Some(entries[0].as_path()));
}

#[tokio::test]
async fn test_health_reports_active_jobs() {
    let dir = tempfile::tempdir().unwrap();
    let (server, _state) = test_server(&dir);

    let before: Value = server.get("/api/health").await.json();
    assert_eq!(before["active_jobs"], 0);

    let created: Value = server
        .post("/api/generate")
        .multipart(minimal_form())
        .await
        .json();
    let job_id = created["jobId"].as_str().unwrap().to_string();

    poll_until_complete(&server, &job_id).await;

    let after: Value = server.get("/api/health").await.json();
    assert_eq!(after["status"], "ok");
    assert_eq!(after["active_jobs"], 0);
}
