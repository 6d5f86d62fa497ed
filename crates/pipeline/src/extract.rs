//! LLM recipe extraction via an Ollama instance.
//!
//! One `POST /api/generate` call with `format: "json"` and a strict
//! JSON-only prompt. The model's answer is parsed straight into the
//! domain [`Recipe`]; anything else is an extraction failure.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use forkcast_core::recipe::{Recipe, RECIPE_SOURCE_VIDEO};

use crate::stage::{RecipeExtractor, StageError};

/// Generation timeout; local models can be slow on long transcripts.
const GENERATE_TIMEOUT: Duration = Duration::from_secs(180);
/// Probe timeout for the connection check.
const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

/// Low temperature keeps the model from inventing ingredients.
const EXTRACTION_TEMPERATURE: f64 = 0.2;

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

/// HTTP client for an Ollama instance.
pub struct OllamaClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaClient {
    /// * `base_url` - e.g. `http://localhost:11434`.
    /// * `model`    - model name, e.g. `llama3.2`.
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            model: model.into(),
        }
    }

    /// Whether the instance answers `/api/tags`.
    pub async fn check_connection(&self) -> bool {
        self.client
            .get(format!("{}/api/tags", self.base_url))
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }

    /// One non-streaming generation call, JSON output enforced.
    async fn generate(&self, prompt: &str) -> Result<String, StageError> {
        let payload = serde_json::json!({
            "model": self.model,
            "prompt": prompt,
            "stream": false,
            "format": "json",
            "options": {
                "temperature": EXTRACTION_TEMPERATURE,
            },
        });

        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&payload)
            .timeout(GENERATE_TIMEOUT)
            .send()
            .await
            .map_err(|e| StageError::ExtractionFailed(format!("ollama unreachable: {e}")))?;

        if !response.status().is_success() {
            return Err(StageError::ExtractionFailed(format!(
                "ollama returned status {}",
                response.status().as_u16()
            )));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| StageError::ExtractionFailed(format!("bad ollama response: {e}")))?;

        Ok(body.response.trim().to_string())
    }

    fn build_prompt(transcript: &str, metadata: Option<&str>) -> String {
        let mut prompt = format!(
            "You are an expert at extracting cooking recipes from short-video transcriptions.\n\
             \n\
             TASK: Extract one structured recipe from the transcription below.\n\
             \n\
             OUTPUT FORMAT (JSON ONLY):\n\
             {{\n\
             \x20   \"title\": \"Recipe title\",\n\
             \x20   \"category\": \"Category (e.g. Starter, Main, Dessert, Drink, Snack)\",\n\
             \x20   \"ingredients\": [\"quantity ingredient 1\", \"quantity ingredient 2\"],\n\
             \x20   \"steps\": [\"step 1\", \"step 2\"]\n\
             }}\n\
             \n\
             STRICT RULES:\n\
             - Be VERY concise.\n\
             - Extract ONLY information present in the transcription.\n\
             - If a quantity is not mentioned, write just the ingredient.\n\
             - Rephrase the steps clearly and briefly.\n\
             - Answer ONLY with valid JSON.\n\
             \n\
             TRANSCRIPTION:\n\
             {transcript}\n"
        );

        if let Some(description) = metadata {
            prompt.push_str(&format!(
                "\nVIDEO DESCRIPTION (additional context):\n{description}\n"
            ));
        }

        prompt
    }
}

#[async_trait]
impl RecipeExtractor for OllamaClient {
    async fn extract(
        &self,
        transcript: &str,
        metadata: Option<&str>,
    ) -> Result<Recipe, StageError> {
        if !self.check_connection().await {
            return Err(StageError::ExtractionFailed(format!(
                "cannot connect to ollama at {}",
                self.base_url
            )));
        }

        let prompt = Self::build_prompt(transcript, metadata);
        let raw = self.generate(&prompt).await?;

        let mut recipe: Recipe = serde_json::from_str(&raw).map_err(|e| {
            StageError::ExtractionFailed(format!("model did not return valid recipe JSON: {e}"))
        })?;
        recipe.source = RECIPE_SOURCE_VIDEO.to_string();

        tracing::debug!(title = %recipe.title, "Recipe extracted");
        Ok(recipe)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_contains_transcript_and_rules() {
        let prompt = OllamaClient::build_prompt("melt the butter", None);
        assert!(prompt.contains("melt the butter"));
        assert!(prompt.contains("Answer ONLY with valid JSON."));
        assert!(!prompt.contains("VIDEO DESCRIPTION"));
    }

    #[test]
    fn prompt_appends_metadata_when_present() {
        let prompt = OllamaClient::build_prompt("melt the butter", Some("Best pasta ever #fyp"));
        assert!(prompt.contains("VIDEO DESCRIPTION"));
        assert!(prompt.contains("Best pasta ever #fyp"));
    }
}
