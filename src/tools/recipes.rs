//! Recipe MCP Tools
//!
//! Import provider payloads and manage the saved recipe collection.

use serde::Serialize;
use serde_json::Value;

use super::{load_user, update_user};
use crate::db::KeyValueStore;
use crate::models::{format_cooking_time, import_recipe as convert_payload, Recipe, RecipeSource, SavedRecipe};

/// A recipe in the common shape, with display helpers
#[derive(Debug, Serialize)]
pub struct ImportedRecipe {
    #[serde(flatten)]
    pub recipe: Recipe,
    pub cooking_time: String,
    pub ingredient_count: usize,
}

/// Response for save_recipe
#[derive(Debug, Serialize)]
pub struct SaveRecipeResponse {
    pub saved: bool,
    pub already_saved: bool,
    pub recipe: SavedRecipe,
    pub total_saved: usize,
}

/// Response for list_saved_recipes
#[derive(Debug, Serialize)]
pub struct ListSavedRecipesResponse {
    pub recipes: Vec<SavedRecipe>,
    pub total: usize,
}

/// Response for remove_saved_recipe
#[derive(Debug, Serialize)]
pub struct RemoveSavedRecipeResponse {
    pub removed: bool,
    pub id: String,
    pub source: RecipeSource,
}

pub(crate) fn parse_source(source: &str) -> Result<RecipeSource, String> {
    RecipeSource::from_str(source).ok_or_else(|| {
        format!(
            "Invalid source: {}. Valid: spoonacular, mealdb, custom",
            source
        )
    })
}

/// Convert a provider payload into a recipe without storing anything
pub fn import_recipe(source: &str, payload: Value) -> Result<ImportedRecipe, String> {
    let source = parse_source(source)?;
    let recipe = convert_payload(source, payload)
        .map_err(|e| format!("Failed to read {} recipe: {}", source.as_str(), e))?;

    if recipe.title.trim().is_empty() {
        tracing::warn!("Imported {} recipe {} has no title", source.as_str(), recipe.id);
    }

    Ok(ImportedRecipe {
        cooking_time: format_cooking_time(recipe.ready_in_minutes),
        ingredient_count: recipe.ingredients.len(),
        recipe,
    })
}

/// Add a recipe to the saved collection
///
/// Saving a recipe that is already in the collection is not an error; the
/// stored entry is returned unchanged.
pub fn save_recipe(store: &dyn KeyValueStore, recipe: &Recipe) -> Result<SaveRecipeResponse, String> {
    let response = update_user(store, |data| {
        if let Some(existing) = data
            .saved_recipes
            .iter()
            .find(|r| r.id == recipe.id && r.source == recipe.source)
        {
            return Ok(SaveRecipeResponse {
                saved: false,
                already_saved: true,
                recipe: existing.clone(),
                total_saved: data.saved_recipes.len(),
            });
        }

        let saved = SavedRecipe::from_recipe(recipe);
        data.save_recipe(saved.clone());
        Ok(SaveRecipeResponse {
            saved: true,
            already_saved: false,
            recipe: saved,
            total_saved: data.saved_recipes.len(),
        })
    })?;

    if response.saved {
        tracing::info!(
            "Saved recipe {} ({})",
            response.recipe.title,
            response.recipe.source.as_str()
        );
    }
    Ok(response)
}

/// List saved recipes, most recently saved first
pub fn list_saved_recipes(store: &dyn KeyValueStore) -> Result<ListSavedRecipesResponse, String> {
    let data = load_user(store)?;
    let recipes: Vec<SavedRecipe> = data
        .saved_recipes_newest_first()
        .into_iter()
        .cloned()
        .collect();
    Ok(ListSavedRecipesResponse {
        total: recipes.len(),
        recipes,
    })
}

/// Remove a recipe from the saved collection
pub fn remove_saved_recipe(
    store: &dyn KeyValueStore,
    id: &str,
    source: &str,
) -> Result<RemoveSavedRecipeResponse, String> {
    let source = parse_source(source)?;
    let removed = update_user(store, |data| Ok(data.remove_saved_recipe(id, source)))?;

    Ok(RemoveSavedRecipeResponse {
        removed,
        id: id.to_string(),
        source,
    })
}
