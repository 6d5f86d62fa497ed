//! Shared test harness: builds the production router with all middleware
//! layers, wired to mock pipeline collaborators instead of the real
//! yt-dlp/Whisper/Ollama backends.
//!
//! Mock behaviour is keyed on the submitted URL:
//! - TikTok/Instagram URLs resolve to a media file (video pipeline);
//! - URLs containing `broken` fail the download stage;
//! - anything else resolves to a scraped website recipe.
//!
//! The gated variant makes every pipeline wait on a semaphore permit
//! before resolving, so tests can hold jobs in `Processing` and release
//! them one at a time.

// Each test binary compiles this module separately and uses a subset.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tokio::sync::Semaphore;
use tower::ServiceExt;

use forkcast_api::config::ServiceConfig;
use forkcast_api::router::build_router;
use forkcast_api::state::AppState;
use forkcast_core::recipe::{Recipe, RECIPE_SOURCE_VIDEO, RECIPE_SOURCE_WEBSITE};
use forkcast_core::sources::{detect_source_kind, SourceKind};
use forkcast_pipeline::{
    PipelineExecutor, RecipeExtractor, SourcePayload, SourceResolver, StageError, Transcriber,
};
use forkcast_store::{AdmissionController, JobStore};

/// A video URL the mock resolver treats as a downloadable TikTok clip.
pub const VIDEO_URL: &str = "https://www.tiktok.com/@chef/video/7123456789";
/// A video URL whose download stage always fails.
pub const BROKEN_VIDEO_URL: &str = "https://www.tiktok.com/@chef/video/broken";
/// A URL the mock resolver treats as a scrapable recipe website.
pub const WEBSITE_URL: &str = "https://blog.example.com/best-carbonara";

// ---------------------------------------------------------------------------
// Mock collaborators
// ---------------------------------------------------------------------------

fn mock_recipe(source: &str) -> Recipe {
    Recipe {
        title: "Garlic Chicken".into(),
        category: Some("Main".into()),
        prep_time: None,
        cook_time: None,
        servings: Some("2".into()),
        difficulty: None,
        ingredients: vec!["1 chicken breast".into(), "3 cloves garlic".into()],
        steps: vec!["Chop the garlic.".into(), "Fry the chicken.".into()],
        tips: vec![],
        source: source.into(),
    }
}

struct MockResolver {
    /// When present, each resolve consumes one permit before proceeding.
    gate: Option<Arc<Semaphore>>,
}

#[async_trait]
impl SourceResolver for MockResolver {
    async fn resolve(&self, url: &str) -> Result<SourcePayload, StageError> {
        if let Some(gate) = &self.gate {
            let permit = gate
                .acquire()
                .await
                .map_err(|_| StageError::DownloadFailed("gate closed".into()))?;
            permit.forget();
        }

        if url.contains("broken") {
            return Err(StageError::DownloadFailed(
                "simulated download failure".into(),
            ));
        }

        match detect_source_kind(url) {
            SourceKind::TikTok | SourceKind::Instagram => Ok(SourcePayload::MediaFile {
                path: PathBuf::from("/nonexistent/test-clip.mp4"),
                metadata: Some("test video description".into()),
            }),
            SourceKind::Website => Ok(SourcePayload::ScrapedRecipe(mock_recipe(
                RECIPE_SOURCE_WEBSITE,
            ))),
        }
    }
}

struct MockTranscriber;

#[async_trait]
impl Transcriber for MockTranscriber {
    async fn transcribe(&self, _media: &Path) -> Result<String, StageError> {
        Ok("chop the garlic, fry the chicken".to_string())
    }
}

struct MockExtractor;

#[async_trait]
impl RecipeExtractor for MockExtractor {
    async fn extract(
        &self,
        _transcript: &str,
        _metadata: Option<&str>,
    ) -> Result<Recipe, StageError> {
        Ok(mock_recipe(RECIPE_SOURCE_VIDEO))
    }
}

// ---------------------------------------------------------------------------
// App builders
// ---------------------------------------------------------------------------

/// Build a test `ServiceConfig` with safe defaults.
pub fn test_config(max_concurrent_jobs: usize) -> ServiceConfig {
    ServiceConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        max_concurrent_jobs,
        whisper_base_url: "http://localhost:9000".to_string(),
        ollama_base_url: "http://localhost:11434".to_string(),
        ollama_model: "llama3.2".to_string(),
        ytdlp_bin: "yt-dlp".to_string(),
        download_dir: "/tmp/forkcast-test".to_string(),
    }
}

fn build_app(max_concurrent_jobs: usize, gate: Option<Arc<Semaphore>>) -> Router {
    let store = Arc::new(JobStore::new());
    let admission = Arc::new(AdmissionController::new(max_concurrent_jobs));
    let executor = Arc::new(PipelineExecutor::new(
        Arc::clone(&store),
        Arc::new(MockResolver { gate }),
        Arc::new(MockTranscriber),
        Arc::new(MockExtractor),
    ));

    let state = AppState {
        store,
        admission,
        executor,
        config: Arc::new(test_config(max_concurrent_jobs)),
    };

    build_router(state)
}

/// Full app with instant mock collaborators.
pub fn build_test_app(max_concurrent_jobs: usize) -> Router {
    build_app(max_concurrent_jobs, None)
}

/// Full app whose pipelines block until a permit is added to the
/// returned semaphore (one permit releases one job).
pub fn build_gated_test_app(max_concurrent_jobs: usize) -> (Router, Arc<Semaphore>) {
    let gate = Arc::new(Semaphore::new(0));
    let app = build_app(max_concurrent_jobs, Some(Arc::clone(&gate)));
    (app, gate)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response {
    app.oneshot(
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn delete(app: Router, uri: &str) -> Response {
    app.oneshot(
        Request::builder()
            .method("DELETE")
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Submit a URL and return `(owner_id, job_id)`, asserting 201.
pub async fn submit(app: &Router, url: &str) -> (String, String) {
    let response = post_json(
        app.clone(),
        "/api/v1/submit",
        serde_json::json!({ "url": url }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    (
        json["owner_id"].as_str().unwrap().to_string(),
        json["job_id"].as_str().unwrap().to_string(),
    )
}

/// Poll a job until it reports `status`, or panic after ~2 seconds.
pub async fn wait_for_status(
    app: &Router,
    owner_id: &str,
    job_id: &str,
    status: &str,
) -> serde_json::Value {
    for _ in 0..200 {
        let response = get(app.clone(), &format!("/api/v1/job/{owner_id}/{job_id}")).await;
        let json = body_json(response).await;
        if json["status"] == status {
            return json;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    panic!("job {job_id} never reached status {status}");
}

/// Poll a job until it reaches a terminal state.
pub async fn wait_for_terminal(app: &Router, owner_id: &str, job_id: &str) -> serde_json::Value {
    for _ in 0..200 {
        let response = get(app.clone(), &format!("/api/v1/job/{owner_id}/{job_id}")).await;
        let json = body_json(response).await;
        if json["status"] == "completed" || json["status"] == "failed" {
            return json;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    panic!("job {job_id} never reached a terminal state");
}

/// Poll `/stats` until every admission slot has been released.
///
/// A job's terminal status becomes visible a beat before its slot is
/// given back, so tests that assert on slot counts wait here first.
pub async fn wait_for_idle(app: &Router) {
    for _ in 0..200 {
        let stats = body_json(get(app.clone(), "/api/v1/stats").await).await;
        if stats["active_jobs"] == 0 {
            return;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    panic!("admission slots were never released");
}
