/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Maximum number of pipelines running at once (default: `3`).
    pub max_concurrent_jobs: usize,
    /// Base URL of the Whisper transcription service.
    pub whisper_base_url: String,
    /// Base URL of the Ollama instance used for recipe extraction.
    pub ollama_base_url: String,
    /// Ollama model name used for recipe extraction.
    pub ollama_model: String,
    /// Name or path of the yt-dlp binary.
    pub ytdlp_bin: String,
    /// Directory downloaded videos are written to.
    pub download_dir: String,
}

impl ServiceConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `8000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `MAX_CONCURRENT_JOBS`  | `3`                        |
    /// | `WHISPER_BASE_URL`     | `http://localhost:9000`    |
    /// | `OLLAMA_BASE_URL`      | `http://localhost:11434`   |
    /// | `OLLAMA_MODEL`         | `llama3.2`                 |
    /// | `YTDLP_BIN`            | `yt-dlp`                   |
    /// | `DOWNLOAD_DIR`         | `/tmp/forkcast`            |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let max_concurrent_jobs: usize = std::env::var("MAX_CONCURRENT_JOBS")
            .unwrap_or_else(|_| "3".into())
            .parse()
            .expect("MAX_CONCURRENT_JOBS must be a valid usize");

        let whisper_base_url =
            std::env::var("WHISPER_BASE_URL").unwrap_or_else(|_| "http://localhost:9000".into());

        let ollama_base_url =
            std::env::var("OLLAMA_BASE_URL").unwrap_or_else(|_| "http://localhost:11434".into());

        let ollama_model = std::env::var("OLLAMA_MODEL").unwrap_or_else(|_| "llama3.2".into());

        let ytdlp_bin = std::env::var("YTDLP_BIN").unwrap_or_else(|_| "yt-dlp".into());

        let download_dir =
            std::env::var("DOWNLOAD_DIR").unwrap_or_else(|_| "/tmp/forkcast".into());

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            max_concurrent_jobs,
            whisper_base_url,
            ollama_base_url,
            ollama_model,
            ytdlp_bin,
            download_dir,
        }
    }
}
