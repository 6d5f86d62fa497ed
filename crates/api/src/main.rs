use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use forkcast_api::config::ServiceConfig;
use forkcast_api::router::build_router;
use forkcast_api::state::AppState;
use forkcast_pipeline::download::VideoDownloader;
use forkcast_pipeline::extract::OllamaClient;
use forkcast_pipeline::resolver::UrlResolver;
use forkcast_pipeline::scrape::WebsiteScraper;
use forkcast_pipeline::transcribe::WhisperClient;
use forkcast_pipeline::PipelineExecutor;
use forkcast_store::{AdmissionController, JobStore};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "forkcast_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServiceConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        max_concurrent_jobs = config.max_concurrent_jobs,
        "Loaded service configuration",
    );

    // --- Job store and admission gate ---
    let store = Arc::new(JobStore::new());
    let admission = Arc::new(AdmissionController::new(config.max_concurrent_jobs));

    // --- Pipeline collaborators ---
    let downloader = VideoDownloader::new(config.ytdlp_bin.clone(), config.download_dir.clone());
    let resolver = Arc::new(UrlResolver::new(downloader, WebsiteScraper::new()));
    let transcriber = Arc::new(WhisperClient::new(config.whisper_base_url.clone()));
    let extractor = Arc::new(OllamaClient::new(
        config.ollama_base_url.clone(),
        config.ollama_model.clone(),
    ));

    let executor = Arc::new(PipelineExecutor::new(
        Arc::clone(&store),
        resolver,
        transcriber,
        extractor,
    ));
    tracing::info!("Pipeline executor ready");

    // --- App state ---
    let state = AppState {
        store,
        admission,
        executor,
        config: Arc::new(config.clone()),
    };

    // --- Router ---
    let app = build_router(state);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager (e.g. systemd, Docker, Kubernetes).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
