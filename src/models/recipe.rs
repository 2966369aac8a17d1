//! Recipe models
//!
//! A recipe as normalized from a provider, plus the slimmer records kept in
//! the user's saved recipes and meal plan.

use serde::{Deserialize, Serialize};

use super::Ingredient;

/// Where a recipe came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecipeSource {
    Spoonacular,
    Mealdb,
    /// Entered by hand
    Custom,
}

impl RecipeSource {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "spoonacular" => Some(RecipeSource::Spoonacular),
            "mealdb" | "themealdb" => Some(RecipeSource::Mealdb),
            "custom" => Some(RecipeSource::Custom),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RecipeSource::Spoonacular => "spoonacular",
            RecipeSource::Mealdb => "mealdb",
            RecipeSource::Custom => "custom",
        }
    }
}

/// A recipe in the common shape shared by all providers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: String,
    pub title: String,
    pub image: Option<String>,
    pub summary: Option<String>,
    pub instructions: Option<String>,
    pub ready_in_minutes: Option<u32>,
    pub servings: Option<u32>,
    pub source: RecipeSource,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
}

/// A recipe in the user's collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedRecipe {
    pub id: String,
    pub source: RecipeSource,
    pub title: String,
    pub image: Option<String>,
    pub description: Option<String>,
    pub saved_at: String,
}

impl SavedRecipe {
    pub fn from_recipe(recipe: &Recipe) -> Self {
        Self {
            id: recipe.id.clone(),
            source: recipe.source,
            title: recipe.title.clone(),
            image: recipe.image.clone(),
            description: recipe.summary.clone(),
            saved_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// A recipe assigned to a day of the meal plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedRecipe {
    pub id: String,
    pub source: RecipeSource,
    pub title: String,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    pub added_at: String,
}

impl PlannedRecipe {
    pub fn from_recipe(recipe: &Recipe) -> Self {
        Self {
            id: recipe.id.clone(),
            source: recipe.source,
            title: recipe.title.clone(),
            ingredients: recipe.ingredients.clone(),
            added_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Human-readable cooking time: "45 min", "1 hr", "1 hr 30 min"
pub fn format_cooking_time(minutes: Option<u32>) -> String {
    let minutes = match minutes {
        Some(m) if m > 0 => m,
        _ => return "Time not specified".to_string(),
    };

    if minutes < 60 {
        return format!("{} min", minutes);
    }

    let hours = minutes / 60;
    let remaining = minutes % 60;
    if remaining == 0 {
        format!("{} hr", hours)
    } else {
        format!("{} hr {} min", hours, remaining)
    }
}
