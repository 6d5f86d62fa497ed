//! Stage contracts between the executor and its external collaborators.
//!
//! Each collaborator is one async operation that either returns a typed
//! payload or fails with a distinguishable [`StageError`]. The executor
//! invokes stages strictly sequentially within a job and never retries a
//! failed stage; the error message lands verbatim on the job record.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use forkcast_core::recipe::Recipe;

/// Failure of one pipeline stage. Terminal for the job it occurred in.
#[derive(Debug, thiserror::Error)]
pub enum StageError {
    /// The URL is neither a supported video platform nor an http(s) site.
    #[error("Unsupported URL: {0}. Only TikTok, Instagram, and recipe websites are supported")]
    UnsupportedUrl(String),

    /// The video download failed (network, platform block, bad URL).
    #[error("Video download failed: {0}")]
    DownloadFailed(String),

    /// The website fetch or recipe extraction from its markup failed.
    #[error("Website scrape failed: {0}")]
    ScrapeFailed(String),

    /// The transcription backend failed outright.
    #[error("Audio transcription failed: {0}")]
    TranscriptionFailed(String),

    /// Transcription succeeded but produced no usable text.
    #[error("Audio transcription produced no text")]
    TranscriptionEmpty,

    /// The LLM extraction backend failed or returned unusable output.
    #[error("Recipe extraction failed: {0}")]
    ExtractionFailed(String),
}

/// Outcome of resolving a source URL.
///
/// The resolve stage has two shapes of success: a downloaded media file
/// (the video pipeline continues with transcription), or a recipe
/// scraped straight off a website (transcription and LLM extraction are
/// skipped).
#[derive(Debug, Clone)]
pub enum SourcePayload {
    MediaFile {
        path: PathBuf,
        /// Platform-provided description, fed to the extractor as context.
        metadata: Option<String>,
    },
    ScrapedRecipe(Recipe),
}

/// Resolves a submitted URL into a media file or a scraped recipe.
#[async_trait]
pub trait SourceResolver: Send + Sync {
    async fn resolve(&self, url: &str) -> Result<SourcePayload, StageError>;
}

/// Transcribes the audio track of a media file to text.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, media: &Path) -> Result<String, StageError>;
}

/// Extracts a structured recipe from a transcription.
#[async_trait]
pub trait RecipeExtractor: Send + Sync {
    async fn extract(
        &self,
        transcript: &str,
        metadata: Option<&str>,
    ) -> Result<Recipe, StageError>;
}
