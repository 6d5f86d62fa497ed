//! Structured recipe model shared by the extraction and scraping stages.

use serde::{Deserialize, Serialize};

/// Recipe obtained from a video transcription.
pub const RECIPE_SOURCE_VIDEO: &str = "video";
/// Recipe scraped directly from a website.
pub const RECIPE_SOURCE_WEBSITE: &str = "website";

/// Fallback title when a source provides none.
pub const UNTITLED_RECIPE: &str = "Untitled recipe";

/// A structured cooking recipe.
///
/// The LLM extraction contract guarantees `title`, `ingredients`, and
/// `steps`; everything else is best-effort and often absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prep_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cook_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub servings: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub steps: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tips: Vec<String>,
    /// Where the recipe came from: [`RECIPE_SOURCE_VIDEO`] or
    /// [`RECIPE_SOURCE_WEBSITE`].
    #[serde(default)]
    pub source: String,
}

impl Recipe {
    /// Build a recipe from a scraped website payload.
    ///
    /// Scrapers frequently return the instructions as one newline-joined
    /// string rather than a list; split those into trimmed, non-empty
    /// steps. A missing title falls back to [`UNTITLED_RECIPE`].
    pub fn from_scraped(
        title: Option<String>,
        instructions: ScrapedInstructions,
        ingredients: Vec<String>,
    ) -> Self {
        let steps = match instructions {
            ScrapedInstructions::Joined(text) => text
                .split('\n')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            ScrapedInstructions::Steps(list) => list,
        };

        Self {
            title: title.unwrap_or_else(|| UNTITLED_RECIPE.to_string()),
            category: None,
            prep_time: None,
            cook_time: None,
            servings: None,
            difficulty: None,
            ingredients,
            steps,
            tips: Vec::new(),
            source: RECIPE_SOURCE_WEBSITE.to_string(),
        }
    }
}

/// Instructions as returned by a website scraper: either a single
/// newline-joined block or an already-split step list.
#[derive(Debug, Clone)]
pub enum ScrapedInstructions {
    Joined(String),
    Steps(Vec<String>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joined_instructions_split_into_steps() {
        let recipe = Recipe::from_scraped(
            Some("Carbonara".into()),
            ScrapedInstructions::Joined("Boil pasta.\n\n  Fry guanciale. \nMix eggs.".into()),
            vec!["pasta".into(), "eggs".into()],
        );
        assert_eq!(
            recipe.steps,
            vec!["Boil pasta.", "Fry guanciale.", "Mix eggs."]
        );
        assert_eq!(recipe.source, RECIPE_SOURCE_WEBSITE);
    }

    #[test]
    fn step_list_passes_through() {
        let recipe = Recipe::from_scraped(
            Some("Soup".into()),
            ScrapedInstructions::Steps(vec!["Chop.".into(), "Simmer.".into()]),
            vec![],
        );
        assert_eq!(recipe.steps, vec!["Chop.", "Simmer."]);
    }

    #[test]
    fn missing_title_falls_back() {
        let recipe = Recipe::from_scraped(None, ScrapedInstructions::Steps(vec![]), vec![]);
        assert_eq!(recipe.title, UNTITLED_RECIPE);
    }

    #[test]
    fn optional_fields_omitted_from_json() {
        let recipe = Recipe::from_scraped(
            Some("Toast".into()),
            ScrapedInstructions::Steps(vec!["Toast bread.".into()]),
            vec!["bread".into()],
        );
        let json = serde_json::to_value(&recipe).unwrap();
        assert!(json.get("category").is_none());
        assert!(json.get("tips").is_none());
        assert_eq!(json["source"], "website");
    }

    #[test]
    fn deserializes_llm_output_with_missing_optionals() {
        let recipe: Recipe = serde_json::from_str(
            r#"{"title": "Pancakes", "ingredients": ["flour", "milk"], "steps": ["Mix.", "Fry."]}"#,
        )
        .unwrap();
        assert_eq!(recipe.title, "Pancakes");
        assert_eq!(recipe.ingredients.len(), 2);
        assert!(recipe.category.is_none());
        assert!(recipe.tips.is_empty());
    }
}
