//! Data models
//!
//! Rust structs for recipes, the meal plan, and the stored user document.

mod ingredient;
mod meal_plan;
pub mod provider;
mod recipe;
mod shopping_item;
mod user;

pub use ingredient::{Ingredient, Quantity};
pub use meal_plan::{parse_weekday, weekday_name, MealPlan, WEEK};
pub use provider::{from_mealdb, from_spoonacular, import_recipe};
pub use recipe::{format_cooking_time, PlannedRecipe, Recipe, RecipeSource, SavedRecipe};
pub use shopping_item::{new_item_id, ShoppingListItem};
pub use user::{Profile, UserData, USER_DATA_KEY};
