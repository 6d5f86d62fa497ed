//! Plain-text recipe formatting for the shortcut/notes client.

use crate::recipe::Recipe;

/// Format a recipe as display text.
///
/// Produces an emoji-led block with title, category tag, timing metadata,
/// ingredient bullets, numbered steps, tips, and the source link.
pub fn format_recipe_for_display(recipe: &Recipe, source_url: Option<&str>) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push(format!("📝 {}", recipe.title));
    lines.push(String::new());

    if let Some(category) = &recipe.category {
        lines.push(format!("#{category}"));
        lines.push(String::new());
    }

    let mut metadata = Vec::new();
    if let Some(prep) = &recipe.prep_time {
        metadata.push(format!("⏱ Prep: {prep}"));
    }
    if let Some(cook) = &recipe.cook_time {
        metadata.push(format!("🔥 Cook: {cook}"));
    }
    if let Some(servings) = &recipe.servings {
        metadata.push(format!("👥 Serves: {servings}"));
    }
    if let Some(difficulty) = &recipe.difficulty {
        metadata.push(format!("📊 Difficulty: {difficulty}"));
    }
    if !metadata.is_empty() {
        lines.extend(metadata);
        lines.push(String::new());
    }

    if !recipe.ingredients.is_empty() {
        lines.push("📋 Ingredients:".to_string());
        if let Some(servings) = &recipe.servings {
            lines.push(format!("(For {servings})"));
        }
        for ingredient in &recipe.ingredients {
            lines.push(format!("  • {ingredient}"));
        }
        lines.push(String::new());
    }

    if !recipe.steps.is_empty() {
        lines.push("👨‍🍳 Steps:".to_string());
        for (i, step) in recipe.steps.iter().enumerate() {
            lines.push(format!("  {}. {step}", i + 1));
        }
        lines.push(String::new());
    }

    if !recipe.tips.is_empty() {
        lines.push("💡 Tips:".to_string());
        for tip in &recipe.tips {
            lines.push(format!("  • {tip}"));
        }
        lines.push(String::new());
    }

    if let Some(url) = source_url {
        lines.push(format!("🔗 Link: {url}"));
    }

    lines.join("\n")
}
