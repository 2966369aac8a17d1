//! Meal Plan MCP Tools
//!
//! Assign recipes to days of the week and turn the plan into a shopping list.

use chrono::Weekday;
use serde::Serialize;

use super::shopping_list::ShoppingListResponse;
use super::{load_user, update_user};
use crate::db::KeyValueStore;
use crate::models::{parse_weekday, weekday_name, Ingredient, PlannedRecipe, Recipe, WEEK};
use crate::shopping::{reconcile, ReconcileMode};

/// One day of the plan
#[derive(Debug, Serialize)]
pub struct PlanDay {
    pub day: &'static str,
    pub recipe: Option<PlannedRecipe>,
}

/// Response for get_meal_plan
#[derive(Debug, Serialize)]
pub struct MealPlanResponse {
    pub days: Vec<PlanDay>,
    pub planned_count: usize,
}

/// Response for assign_meal, clear_meal
#[derive(Debug, Serialize)]
pub struct MealSlotResponse {
    pub day: &'static str,
    pub recipe: Option<PlannedRecipe>,
    /// Title of the recipe that was on this day before
    pub replaced: Option<String>,
}

/// Response for add_recipe_to_plan
#[derive(Debug, Serialize)]
pub struct AddToPlanResponse {
    pub day: &'static str,
    pub recipe_title: String,
    pub replaced: Option<String>,
    pub items_added: usize,
    pub items_updated: usize,
    pub items_unchanged: usize,
    pub shopping_list: ShoppingListResponse,
}

/// Response for generate_shopping_list
#[derive(Debug, Serialize)]
pub struct GenerateShoppingListResponse {
    pub planned_days: usize,
    pub ingredient_count: usize,
    pub replaced_items: usize,
    pub shopping_list: ShoppingListResponse,
}

fn parse_day(day: &str) -> Result<Weekday, String> {
    parse_weekday(day).ok_or_else(|| {
        format!(
            "Invalid day: {}. Valid: monday, tuesday, wednesday, thursday, friday, saturday, sunday",
            day
        )
    })
}

/// Get the full week, Monday first
pub fn get_meal_plan(store: &dyn KeyValueStore) -> Result<MealPlanResponse, String> {
    let data = load_user(store)?;
    let days = WEEK
        .into_iter()
        .map(|day| PlanDay {
            day: weekday_name(day),
            recipe: data.meal_plan.get(day).cloned(),
        })
        .collect();

    Ok(MealPlanResponse {
        days,
        planned_count: data.meal_plan.planned_count(),
    })
}

/// Put a recipe on a day without touching the shopping list
pub fn assign_meal(
    store: &dyn KeyValueStore,
    day: &str,
    recipe: &Recipe,
) -> Result<MealSlotResponse, String> {
    let day = parse_day(day)?;
    let planned = PlannedRecipe::from_recipe(recipe);
    let replaced = update_user(store, |data| Ok(data.assign_meal(day, planned.clone())))?;

    tracing::info!("Planned {} for {}", planned.title, weekday_name(day));
    Ok(MealSlotResponse {
        day: weekday_name(day),
        recipe: Some(planned),
        replaced: replaced.map(|r| r.title),
    })
}

/// Empty a day of the plan
pub fn clear_meal(store: &dyn KeyValueStore, day: &str) -> Result<MealSlotResponse, String> {
    let day = parse_day(day)?;
    let removed = update_user(store, |data| Ok(data.clear_meal(day)))?;

    Ok(MealSlotResponse {
        day: weekday_name(day),
        recipe: None,
        replaced: removed.map(|r| r.title),
    })
}

/// Plan a recipe and fold its ingredients into the existing shopping list
///
/// Items already on the list keep their id and checked state. A matching item
/// whose unit differs is left as is.
pub fn add_recipe_to_plan(
    store: &dyn KeyValueStore,
    day: &str,
    recipe: &Recipe,
) -> Result<AddToPlanResponse, String> {
    let day = parse_day(day)?;
    let response = update_user(store, |data| {
        let planned = PlannedRecipe::from_recipe(recipe);
        let replaced = data.assign_meal(day, planned);

        let existing = std::mem::take(&mut data.shopping_list);
        let result = reconcile(existing, &recipe.ingredients, ReconcileMode::MergeIntoExisting);
        data.shopping_list = result.items;

        Ok(AddToPlanResponse {
            day: weekday_name(day),
            recipe_title: recipe.title.clone(),
            replaced: replaced.map(|r| r.title),
            items_added: result.added,
            items_updated: result.updated,
            items_unchanged: result.unchanged,
            shopping_list: ShoppingListResponse::new(data, result.warnings),
        })
    })?;

    tracing::info!(
        "Added {} to {}: {} new, {} updated, {} unchanged",
        response.recipe_title,
        response.day,
        response.items_added,
        response.items_updated,
        response.items_unchanged
    );
    Ok(response)
}

/// Replace the shopping list with a consolidation of every planned day
///
/// With `label_by_recipe`, ingredients whose units clash are labelled with the
/// title of the recipe they came from instead of "additional".
pub fn generate_shopping_list(
    store: &dyn KeyValueStore,
    label_by_recipe: bool,
) -> Result<GenerateShoppingListResponse, String> {
    let response = update_user(store, |data| {
        let ingredients: Vec<Ingredient> = data
            .meal_plan
            .planned()
            .flat_map(|(_, recipe)| {
                recipe.ingredients.iter().map(move |ingredient| {
                    if label_by_recipe && ingredient.source_label.is_none() {
                        ingredient.clone().with_source_label(recipe.title.clone())
                    } else {
                        ingredient.clone()
                    }
                })
            })
            .collect();
        let planned_days = data.meal_plan.planned_count();

        if planned_days == 0 {
            tracing::warn!("Generating a shopping list from an empty meal plan");
        }

        let existing = std::mem::take(&mut data.shopping_list);
        let replaced_items = existing.len();
        let result = reconcile(existing, &ingredients, ReconcileMode::Rebuild);
        data.shopping_list = result.items;

        Ok(GenerateShoppingListResponse {
            planned_days,
            ingredient_count: ingredients.len(),
            replaced_items,
            shopping_list: ShoppingListResponse::new(data, result.warnings),
        })
    })?;

    tracing::info!(
        "Generated {} shopping item(s) from {} planned day(s)",
        response.shopping_list.total,
        response.planned_days
    );
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::models::RecipeSource;
    use crate::tools::shopping_list::{add_shopping_item, toggle_shopping_item};

    fn recipe(id: &str, title: &str, ingredients: Vec<Ingredient>) -> Recipe {
        Recipe {
            id: id.to_string(),
            title: title.to_string(),
            image: None,
            summary: None,
            instructions: None,
            ready_in_minutes: Some(20),
            servings: Some(2),
            source: RecipeSource::Custom,
            ingredients,
        }
    }

    fn quantities(list: &ShoppingListResponse) -> Vec<(String, String)> {
        list.items
            .iter()
            .map(|i| (i.name.clone(), i.quantity.clone()))
            .collect()
    }

    #[test]
    fn test_assign_and_clear_meal() {
        let db = Database::in_memory().unwrap();
        let pancakes = recipe("1", "Pancakes", vec![Ingredient::new("flour", "1", "cup")]);
        let waffles = recipe("2", "Waffles", vec![]);

        assert!(assign_meal(&db, "monday", &pancakes).unwrap().replaced.is_none());
        let swapped = assign_meal(&db, "Mon", &waffles).unwrap();
        assert_eq!(swapped.replaced.as_deref(), Some("Pancakes"));

        let plan = get_meal_plan(&db).unwrap();
        assert_eq!(plan.days.len(), 7);
        assert_eq!(plan.days[0].day, "monday");
        assert_eq!(plan.planned_count, 1);

        let cleared = clear_meal(&db, "monday").unwrap();
        assert_eq!(cleared.replaced.as_deref(), Some("Waffles"));
        assert_eq!(get_meal_plan(&db).unwrap().planned_count, 0);

        assert!(assign_meal(&db, "funday", &pancakes).is_err());
    }

    #[test]
    fn test_generate_shopping_list_rebuilds() {
        let db = Database::in_memory().unwrap();
        add_shopping_item(&db, "Old item", "1").unwrap();
        assign_meal(
            &db,
            "tuesday",
            &recipe("1", "Bread", vec![
                Ingredient::new("flour", "1", "cup"),
                Ingredient::new("Flour", "2", "cup"),
            ]),
        )
        .unwrap();
        assign_meal(
            &db,
            "monday",
            &recipe("2", "Gravy", vec![Ingredient::new("flour", "1", "tbsp")]),
        )
        .unwrap();

        let generated = generate_shopping_list(&db, false).unwrap();
        assert_eq!(generated.planned_days, 2);
        assert_eq!(generated.replaced_items, 1);
        assert_eq!(
            quantities(&generated.shopping_list),
            vec![
                ("Flour".to_string(), "1 tbsp".to_string()),
                ("Flour (additional)".to_string(), "3 cup".to_string()),
            ]
        );
        assert!(generated.shopping_list.items.iter().all(|i| !i.checked));
    }

    #[test]
    fn test_generate_shopping_list_labels_by_recipe() {
        let db = Database::in_memory().unwrap();
        assign_meal(&db, "monday", &recipe("1", "Soup", vec![Ingredient::new("stock", "1", "l")])).unwrap();
        assign_meal(&db, "friday", &recipe("2", "Risotto", vec![Ingredient::new("stock", "500", "ml")])).unwrap();

        let generated = generate_shopping_list(&db, true).unwrap();
        let names: Vec<&str> = generated
            .shopping_list
            .items
            .iter()
            .map(|i| i.name.as_str())
            .collect();
        assert_eq!(names, vec!["Stock", "Stock (Risotto)"]);
    }

    #[test]
    fn test_generate_from_empty_plan_empties_list() {
        let db = Database::in_memory().unwrap();
        add_shopping_item(&db, "Milk", "1 l").unwrap();

        let generated = generate_shopping_list(&db, false).unwrap();
        assert_eq!(generated.planned_days, 0);
        assert_eq!(generated.shopping_list.total, 0);
    }

    #[test]
    fn test_add_recipe_to_plan_merges_into_existing() {
        let db = Database::in_memory().unwrap();
        let eggs = add_shopping_item(&db, "Eggs", "2").unwrap().item;
        toggle_shopping_item(&db, &eggs.id).unwrap();
        add_shopping_item(&db, "Milk", "1 cup").unwrap();

        let omelette = recipe("1", "Omelette", vec![
            Ingredient::new("eggs", "3", ""),
            Ingredient::new("milk", "2", "tbsp"),
            Ingredient::new("chives", "1", "tbsp"),
        ]);
        let result = add_recipe_to_plan(&db, "sunday", &omelette).unwrap();

        assert_eq!(result.items_added, 1);
        assert_eq!(result.items_updated, 1);
        assert_eq!(result.items_unchanged, 1);
        assert_eq!(
            quantities(&result.shopping_list),
            vec![
                ("Eggs".to_string(), "5".to_string()),
                ("Milk".to_string(), "1 cup".to_string()),
                ("Chives".to_string(), "1 tbsp".to_string()),
            ]
        );
        assert_eq!(result.shopping_list.items[0].id, eggs.id);
        assert!(result.shopping_list.items[0].checked);

        let plan = get_meal_plan(&db).unwrap();
        assert_eq!(plan.days[6].recipe.as_ref().map(|r| r.title.as_str()), Some("Omelette"));
    }
}
