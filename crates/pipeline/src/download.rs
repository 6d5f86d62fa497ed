//! Video download via a `yt-dlp` subprocess.
//!
//! Downloads TikTok/Instagram videos into a working directory and
//! captures the post description for the extractor. The binary name and
//! target directory come from configuration so deployments can pin a
//! specific yt-dlp build.

use std::path::PathBuf;

use crate::stage::StageError;

/// Downloads a platform video and returns the local file path plus the
/// post description, when the platform provides one.
pub struct VideoDownloader {
    bin: String,
    download_dir: PathBuf,
}

impl VideoDownloader {
    pub fn new(bin: impl Into<String>, download_dir: impl Into<PathBuf>) -> Self {
        Self {
            bin: bin.into(),
            download_dir: download_dir.into(),
        }
    }

    /// Download the video at `url`.
    ///
    /// Returns `(media_path, description)`. The output file is named by
    /// a fresh UUID so concurrent downloads never collide.
    pub async fn download(&self, url: &str) -> Result<(PathBuf, Option<String>), StageError> {
        tokio::fs::create_dir_all(&self.download_dir)
            .await
            .map_err(|e| StageError::DownloadFailed(format!("cannot create download dir: {e}")))?;

        let output_path = self
            .download_dir
            .join(format!("{}.mp4", uuid::Uuid::new_v4()));

        let output = tokio::process::Command::new(&self.bin)
            .args(["--no-playlist", "--quiet", "-f", "mp4", "-o"])
            .arg(&output_path)
            .arg(url)
            .output()
            .await
            .map_err(|e| StageError::DownloadFailed(format!("{} not found: {e}", self.bin)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(StageError::DownloadFailed(
                stderr.trim().lines().last().unwrap_or("unknown error").to_string(),
            ));
        }

        if !output_path.exists() {
            return Err(StageError::DownloadFailed(
                "downloader reported success but produced no file".to_string(),
            ));
        }

        let description = self.fetch_description(url).await;

        tracing::info!(path = %output_path.display(), "Video downloaded");
        Ok((output_path, description))
    }

    /// Fetch the post description in a separate metadata-only run.
    ///
    /// Best-effort: a failure here only loses extractor context, so it
    /// is logged and swallowed rather than failing the job.
    async fn fetch_description(&self, url: &str) -> Option<String> {
        let output = tokio::process::Command::new(&self.bin)
            .args(["--no-playlist", "--skip-download", "--print", "description"])
            .arg(url)
            .output()
            .await;

        match output {
            Ok(out) if out.status.success() => {
                let text = String::from_utf8_lossy(&out.stdout).trim().to_string();
                (!text.is_empty()).then_some(text)
            }
            Ok(out) => {
                tracing::debug!(
                    status = ?out.status.code(),
                    "Description fetch failed, continuing without metadata",
                );
                None
            }
            Err(e) => {
                tracing::debug!(error = %e, "Description fetch failed, continuing without metadata");
                None
            }
        }
    }
}
