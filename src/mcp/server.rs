//! Meal Cart MCP Server Implementation
//!
//! Implements the MCP server with all Meal Cart tools.

use std::path::PathBuf;
use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::db::Database;
use crate::models::{Ingredient, Profile, Quantity, Recipe};
use crate::tools::account;
use crate::tools::meal_plan;
use crate::tools::recipes;
use crate::tools::shopping_list;
use crate::tools::status::StatusTracker;

/// Meal Cart MCP Service
#[derive(Clone)]
pub struct MealCartService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    database: Database,
    tool_router: ToolRouter<MealCartService>,
}

impl MealCartService {
    pub fn new(database_path: PathBuf, database: Database) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(database_path))),
            database,
            tool_router: Self::tool_router(),
        }
    }
}

// ============================================================================
// Account Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CreateAccountParams {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub username: String,
}

// ============================================================================
// Recipe Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RecipePayloadParams {
    /// Recipe source: spoonacular, mealdb, or custom
    pub source: String,
    /// Recipe JSON as returned by the provider. Custom recipes use the shape
    /// {id, title, image, summary, instructions, readyInMinutes, servings, ingredients: [{name, quantity, unit}]}
    pub recipe: serde_json::Value,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RemoveSavedRecipeParams {
    /// Recipe ID
    pub id: String,
    /// Recipe source: spoonacular, mealdb, or custom
    pub source: String,
}

// ============================================================================
// Meal Plan Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DayParams {
    /// Day of the week (monday..sunday)
    pub day: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PlanRecipeParams {
    /// Day of the week (monday..sunday)
    pub day: String,
    /// Recipe source: spoonacular, mealdb, or custom
    pub source: String,
    /// Recipe JSON as returned by the provider
    pub recipe: serde_json::Value,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GenerateShoppingListParams {
    /// Label items whose units clash with the recipe title instead of "additional" (default false)
    #[serde(default)]
    pub label_by_recipe: bool,
}

// ============================================================================
// Shopping List Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddShoppingItemParams {
    /// Item name
    pub name: String,
    /// Free-text quantity, e.g. "2 lbs" (optional)
    #[serde(default)]
    pub quantity: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ToggleShoppingItemParams {
    /// Shopping item ID
    pub id: String,
    /// Set this checked state instead of flipping it (optional)
    pub checked: Option<bool>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ShoppingItemIdParams {
    /// Shopping item ID
    pub id: String,
}

/// Ingredient amount as a number or free text
#[derive(Debug, Deserialize, schemars::JsonSchema)]
#[serde(untagged)]
pub enum QuantityParam {
    Number(f64),
    Text(String),
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct IngredientParam {
    pub name: String,
    /// Amount, e.g. 2, "1/2", or "1 1/2"
    pub quantity: Option<QuantityParam>,
    #[serde(default)]
    pub unit: String,
    /// Label used when this ingredient's unit clashes with an earlier one (default "additional")
    pub source_label: Option<String>,
}

impl From<IngredientParam> for Ingredient {
    fn from(p: IngredientParam) -> Self {
        let quantity = match p.quantity {
            Some(QuantityParam::Number(n)) => Quantity::Number(n),
            Some(QuantityParam::Text(text)) => Quantity::Text(text),
            None => Quantity::default(),
        };
        Ingredient {
            name: p.name,
            quantity,
            unit: p.unit,
            source_label: p.source_label,
        }
    }
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ConsolidateIngredientsParams {
    pub ingredients: Vec<IngredientParam>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ExportShoppingListParams {
    /// Include items already checked off (default true)
    #[serde(default = "default_include_checked")]
    pub include_checked: bool,
}

fn default_include_checked() -> bool { true }

fn recipe_from_payload(source: &str, payload: serde_json::Value) -> Result<Recipe, McpError> {
    recipes::import_recipe(source, payload)
        .map(|imported| imported.recipe)
        .map_err(|e| McpError::invalid_params(e, None))
}

// ============================================================================
// Tool Router
// ============================================================================

#[tool_router]
impl MealCartService {
    // --- Status ---

    #[tool(description = "Get the current status of the Meal Cart service including build info, database status, and process information")]
    async fn mealcart_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        let status = tracker.get_status();
        let json = serde_json::to_string_pretty(&status)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Get instructions for building shopping lists from the meal plan. Call this when starting a meal planning session or when unsure which list tool to use.")]
    fn shopping_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::SHOPPING_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(SHOPPING_INSTRUCTIONS)]))
    }

    // --- Account ---

    #[tool(description = "Create a local account. Replaces any stored profile, saved recipes, meal plan, and shopping list.")]
    fn create_account(&self, Parameters(p): Parameters<CreateAccountParams>) -> Result<CallToolResult, McpError> {
        let profile = Profile {
            first_name: p.first_name,
            last_name: p.last_name,
            email: p.email,
            username: p.username,
        };
        let result = account::create_account(&self.database, profile).map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Get the stored profile with counts of saved recipes, planned days, and shopping items")]
    fn get_account(&self) -> Result<CallToolResult, McpError> {
        let result = account::get_account(&self.database).map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Log out. Deletes all stored user data.")]
    fn logout(&self) -> Result<CallToolResult, McpError> {
        let result = account::logout(&self.database).map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    // --- Recipes ---

    #[tool(description = "Convert Spoonacular, TheMealDB, or custom recipe JSON into the common recipe shape. Nothing is stored.")]
    fn import_recipe(&self, Parameters(p): Parameters<RecipePayloadParams>) -> Result<CallToolResult, McpError> {
        let result = recipes::import_recipe(&p.source, p.recipe).map_err(|e| McpError::invalid_params(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Save a recipe to the user's collection. Saving an already saved recipe is a no-op.")]
    fn save_recipe(&self, Parameters(p): Parameters<RecipePayloadParams>) -> Result<CallToolResult, McpError> {
        let recipe = recipe_from_payload(&p.source, p.recipe)?;
        let result = recipes::save_recipe(&self.database, &recipe).map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "List saved recipes, most recently saved first")]
    fn list_saved_recipes(&self) -> Result<CallToolResult, McpError> {
        let result = recipes::list_saved_recipes(&self.database).map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Remove a recipe from the saved collection")]
    fn remove_saved_recipe(&self, Parameters(p): Parameters<RemoveSavedRecipeParams>) -> Result<CallToolResult, McpError> {
        let result = recipes::remove_saved_recipe(&self.database, &p.id, &p.source).map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    // --- Meal Plan ---

    #[tool(description = "Get the weekly meal plan, Monday first")]
    fn get_meal_plan(&self) -> Result<CallToolResult, McpError> {
        let result = meal_plan::get_meal_plan(&self.database).map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Plan a recipe for a day without changing the shopping list. Replaces whatever was planned that day.")]
    fn assign_meal(&self, Parameters(p): Parameters<PlanRecipeParams>) -> Result<CallToolResult, McpError> {
        let recipe = recipe_from_payload(&p.source, p.recipe)?;
        let result = meal_plan::assign_meal(&self.database, &p.day, &recipe).map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Remove the recipe planned for a day")]
    fn clear_meal(&self, Parameters(p): Parameters<DayParams>) -> Result<CallToolResult, McpError> {
        let result = meal_plan::clear_meal(&self.database, &p.day).map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Plan a recipe for a day and add its ingredients onto the current shopping list. Existing items keep their checked state; items with a different unit are left unchanged.")]
    fn add_recipe_to_plan(&self, Parameters(p): Parameters<PlanRecipeParams>) -> Result<CallToolResult, McpError> {
        let recipe = recipe_from_payload(&p.source, p.recipe)?;
        let result = meal_plan::add_recipe_to_plan(&self.database, &p.day, &recipe).map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Replace the shopping list with a consolidated list of every planned day's ingredients")]
    fn generate_shopping_list(&self, Parameters(p): Parameters<GenerateShoppingListParams>) -> Result<CallToolResult, McpError> {
        let result = meal_plan::generate_shopping_list(&self.database, p.label_by_recipe).map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    // --- Shopping List ---

    #[tool(description = "Get the shopping list")]
    fn get_shopping_list(&self) -> Result<CallToolResult, McpError> {
        let result = shopping_list::get_shopping_list(&self.database).map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Add an item to the shopping list by hand")]
    fn add_shopping_item(&self, Parameters(p): Parameters<AddShoppingItemParams>) -> Result<CallToolResult, McpError> {
        let quantity = p.quantity.unwrap_or_default();
        let result = shopping_list::add_shopping_item(&self.database, &p.name, &quantity).map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Check or uncheck a shopping item. Flips the current state unless checked is given.")]
    fn toggle_shopping_item(&self, Parameters(p): Parameters<ToggleShoppingItemParams>) -> Result<CallToolResult, McpError> {
        let result = match p.checked {
            Some(checked) => shopping_list::set_shopping_item_checked(&self.database, &p.id, checked),
            None => shopping_list::toggle_shopping_item(&self.database, &p.id),
        }
        .map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Remove one item from the shopping list")]
    fn remove_shopping_item(&self, Parameters(p): Parameters<ShoppingItemIdParams>) -> Result<CallToolResult, McpError> {
        let result = shopping_list::remove_shopping_item(&self.database, &p.id).map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Remove every checked item from the shopping list")]
    fn clear_checked_items(&self) -> Result<CallToolResult, McpError> {
        let result = shopping_list::clear_checked_items(&self.database).map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Remove every item from the shopping list")]
    fn clear_shopping_list(&self) -> Result<CallToolResult, McpError> {
        let result = shopping_list::clear_shopping_list(&self.database).map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Consolidate a list of ingredients into shopping items without storing anything. Useful to preview a list.")]
    fn consolidate_ingredients(&self, Parameters(p): Parameters<ConsolidateIngredientsParams>) -> Result<CallToolResult, McpError> {
        let ingredients: Vec<Ingredient> = p.ingredients.into_iter().map(Ingredient::from).collect();
        let result = shopping_list::consolidate_ingredients(&ingredients);
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Export the shopping list as a markdown checklist with the planned meals")]
    fn export_shopping_list_markdown(&self, Parameters(p): Parameters<ExportShoppingListParams>) -> Result<CallToolResult, McpError> {
        let result = shopping_list::export_shopping_list_markdown(&self.database, p.include_checked).map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }
}

#[tool_handler]
impl ServerHandler for MealCartService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "mealcart".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Meal Cart".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Meal Cart - Saved recipes, weekly meal plans, and shopping lists. \
                 IMPORTANT: Call shopping_instructions before building a shopping list. \
                 Account: create_account/get_account/logout. \
                 Recipes: import_recipe (spoonacular, mealdb, custom JSON), save_recipe/list_saved_recipes/remove_saved_recipe. \
                 Meal plan: get_meal_plan, assign_meal/clear_meal (monday..sunday), \
                 add_recipe_to_plan (plans and merges ingredients into the current list), \
                 generate_shopping_list (rebuilds the list from every planned day). \
                 Shopping list: get_shopping_list, add/toggle/remove_shopping_item, clear_checked_items, clear_shopping_list, \
                 consolidate_ingredients (preview only), export_shopping_list_markdown."
                    .into(),
            ),
        }
    }
}
