//! Recipe-website scraper.
//!
//! Fetches the page and pulls the recipe out of its schema.org
//! `application/ld+json` block -- the markup virtually every recipe site
//! emits for search engines. Both instruction shapes are accepted: a
//! single text block, or a list of HowToStep objects.

use std::sync::OnceLock;
use std::time::Duration;

use regex::Regex;
use serde_json::Value;

use forkcast_core::recipe::{Recipe, ScrapedInstructions};

use crate::stage::StageError;

/// Page fetch timeout.
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Scrapes a structured recipe from a website URL.
pub struct WebsiteScraper {
    client: reqwest::Client,
}

fn ld_json_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?is)<script[^>]*type\s*=\s*["']application/ld\+json["'][^>]*>(.*?)</script>"#)
            .unwrap()
    })
}

impl WebsiteScraper {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Fetch `url` and extract the first schema.org Recipe object.
    pub async fn scrape(&self, url: &str) -> Result<Recipe, StageError> {
        let response = self
            .client
            .get(url)
            .header("User-Agent", "Mozilla/5.0 (compatible; forkcast)")
            .timeout(FETCH_TIMEOUT)
            .send()
            .await
            .map_err(|e| StageError::ScrapeFailed(format!("fetch failed: {e}")))?;

        if !response.status().is_success() {
            return Err(StageError::ScrapeFailed(format!(
                "site returned status {}",
                response.status().as_u16()
            )));
        }

        let html = response
            .text()
            .await
            .map_err(|e| StageError::ScrapeFailed(format!("body read failed: {e}")))?;

        extract_recipe_from_html(&html).ok_or_else(|| {
            StageError::ScrapeFailed("no schema.org recipe found on the page".to_string())
        })
    }
}

impl Default for WebsiteScraper {
    fn default() -> Self {
        Self::new()
    }
}

/// Scan every ld+json block on the page for a Recipe object.
fn extract_recipe_from_html(html: &str) -> Option<Recipe> {
    for capture in ld_json_re().captures_iter(html) {
        let raw = capture.get(1)?.as_str();
        let Ok(value) = serde_json::from_str::<Value>(raw) else {
            continue;
        };
        if let Some(recipe) = find_recipe_object(&value).and_then(recipe_from_ld) {
            return Some(recipe);
        }
    }
    None
}

/// Walk an ld+json document looking for an object with `@type: Recipe`.
///
/// Handles the three common layouts: a bare object, a top-level array,
/// and an `@graph` container.
fn find_recipe_object(value: &Value) -> Option<&Value> {
    match value {
        Value::Object(map) => {
            if is_recipe_type(map.get("@type")) {
                return Some(value);
            }
            map.get("@graph").and_then(find_recipe_object)
        }
        Value::Array(items) => items.iter().find_map(find_recipe_object),
        _ => None,
    }
}

/// `@type` may be a string or a list of strings.
fn is_recipe_type(type_field: Option<&Value>) -> bool {
    match type_field {
        Some(Value::String(s)) => s == "Recipe",
        Some(Value::Array(items)) => items.iter().any(|v| v.as_str() == Some("Recipe")),
        _ => false,
    }
}

/// Convert a schema.org Recipe object into the domain model.
fn recipe_from_ld(object: &Value) -> Option<Recipe> {
    let title = object
        .get("name")
        .and_then(Value::as_str)
        .map(str::to_string);

    let ingredients: Vec<String> = object
        .get("recipeIngredient")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let instructions = match object.get("recipeInstructions") {
        Some(Value::String(text)) => ScrapedInstructions::Joined(text.clone()),
        Some(Value::Array(items)) => ScrapedInstructions::Steps(
            items
                .iter()
                .filter_map(|item| match item {
                    // HowToStep objects carry the step in "text".
                    Value::Object(step) => step.get("text").and_then(Value::as_str),
                    Value::String(s) => Some(s.as_str()),
                    _ => None,
                })
                .map(str::to_string)
                .collect(),
        ),
        _ => return None,
    };

    Some(Recipe::from_scraped(title, instructions, ingredients))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_recipe_with_howtostep_instructions() {
        let html = r#"<html><head>
            <script type="application/ld+json">
            {"@type": "Recipe", "name": "Shakshuka",
             "recipeIngredient": ["6 eggs", "1 can tomatoes"],
             "recipeInstructions": [
                {"@type": "HowToStep", "text": "Simmer the tomatoes."},
                {"@type": "HowToStep", "text": "Crack in the eggs."}
             ]}
            </script></head></html>"#;

        let recipe = extract_recipe_from_html(html).unwrap();
        assert_eq!(recipe.title, "Shakshuka");
        assert_eq!(recipe.ingredients, vec!["6 eggs", "1 can tomatoes"]);
        assert_eq!(
            recipe.steps,
            vec!["Simmer the tomatoes.", "Crack in the eggs."]
        );
        assert_eq!(recipe.source, "website");
    }

    #[test]
    fn extracts_recipe_with_string_instructions() {
        let html = r#"<script type="application/ld+json">
            {"@type": "Recipe", "name": "Salad",
             "recipeIngredient": ["lettuce"],
             "recipeInstructions": "Chop the lettuce.\nDress it."}
            </script>"#;

        let recipe = extract_recipe_from_html(html).unwrap();
        assert_eq!(recipe.steps, vec!["Chop the lettuce.", "Dress it."]);
    }

    #[test]
    fn finds_recipe_inside_graph_container() {
        let html = r#"<script type="application/ld+json">
            {"@graph": [
                {"@type": "WebSite", "name": "Some Blog"},
                {"@type": ["Recipe", "Thing"], "name": "Stew",
                 "recipeIngredient": ["beef"],
                 "recipeInstructions": "Braise the beef."}
            ]}
            </script>"#;

        let recipe = extract_recipe_from_html(html).unwrap();
        assert_eq!(recipe.title, "Stew");
    }

    #[test]
    fn page_without_recipe_yields_none() {
        let html = r#"<script type="application/ld+json">
            {"@type": "NewsArticle", "headline": "Nothing to cook here"}
            </script>"#;
        assert!(extract_recipe_from_html(html).is_none());
    }

    #[test]
    fn malformed_json_block_is_skipped() {
        let html = r#"
            <script type="application/ld+json">{not json}</script>
            <script type="application/ld+json">
            {"@type": "Recipe", "name": "Backup",
             "recipeInstructions": "Cook it."}
            </script>"#;
        let recipe = extract_recipe_from_html(html).unwrap();
        assert_eq!(recipe.title, "Backup");
    }
}
