//! Client for the external Whisper transcription service.
//!
//! The service accepts a WAV upload on `POST /transcribe` and returns
//! `{ "text": ... }`. The audio track is pulled out of the video with an
//! `ffmpeg` subprocess first; the temporary WAV is removed on all paths.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::stage::{StageError, Transcriber};

/// Transcription can take minutes for long clips.
const TRANSCRIBE_TIMEOUT: Duration = Duration::from_secs(300);
/// Probe timeout for the health check.
const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Deserialize)]
struct TranscribeResponse {
    #[serde(default)]
    text: String,
}

/// HTTP client for a Whisper transcription service instance.
pub struct WhisperClient {
    client: reqwest::Client,
    base_url: String,
}

impl WhisperClient {
    /// * `base_url` - e.g. `http://localhost:9000`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Whether the service answers its health endpoint.
    pub async fn check_connection(&self) -> bool {
        self.client
            .get(format!("{}/health", self.base_url))
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }

    /// Extract the audio track of `media` to a WAV file next to it.
    async fn extract_audio(&self, media: &Path) -> Result<PathBuf, StageError> {
        let audio_path = media.with_extension("wav");

        let output = tokio::process::Command::new("ffmpeg")
            .args(["-y", "-i"])
            .arg(media)
            .args(["-vn", "-acodec", "pcm_s16le", "-ar", "16000", "-ac", "1"])
            .arg(&audio_path)
            .output()
            .await
            .map_err(|e| StageError::TranscriptionFailed(format!("ffmpeg not found: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(StageError::TranscriptionFailed(format!(
                "audio extraction failed: {}",
                stderr.trim().lines().last().unwrap_or("unknown error")
            )));
        }

        Ok(audio_path)
    }

    async fn upload(&self, audio_path: &Path) -> Result<String, StageError> {
        let bytes = tokio::fs::read(audio_path)
            .await
            .map_err(|e| StageError::TranscriptionFailed(format!("cannot read audio: {e}")))?;

        let file_name = audio_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "audio.wav".to_string());

        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("audio/wav")
            .map_err(|e| StageError::TranscriptionFailed(e.to_string()))?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(format!("{}/transcribe", self.base_url))
            .multipart(form)
            .timeout(TRANSCRIBE_TIMEOUT)
            .send()
            .await
            .map_err(|e| StageError::TranscriptionFailed(format!("whisper unreachable: {e}")))?;

        if !response.status().is_success() {
            return Err(StageError::TranscriptionFailed(format!(
                "whisper returned status {}",
                response.status().as_u16()
            )));
        }

        let body: TranscribeResponse = response
            .json()
            .await
            .map_err(|e| StageError::TranscriptionFailed(format!("bad whisper response: {e}")))?;

        Ok(body.text.trim().to_string())
    }
}

#[async_trait]
impl Transcriber for WhisperClient {
    async fn transcribe(&self, media: &Path) -> Result<String, StageError> {
        if !self.check_connection().await {
            return Err(StageError::TranscriptionFailed(format!(
                "cannot connect to whisper at {}",
                self.base_url
            )));
        }

        let audio_path = self.extract_audio(media).await?;
        let result = self.upload(&audio_path).await;

        if let Err(e) = tokio::fs::remove_file(&audio_path).await {
            tracing::warn!(path = %audio_path.display(), error = %e, "Could not remove temp audio");
        }

        let text = result?;
        if text.is_empty() {
            return Err(StageError::TranscriptionEmpty);
        }

        tracing::debug!(chars = text.len(), "Transcription complete");
        Ok(text)
    }
}
