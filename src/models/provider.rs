//! Recipe provider payloads
//!
//! Maps Spoonacular and TheMealDB recipe JSON into the common `Recipe` shape.
//! Fetching is the caller's business; these functions only read JSON.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::{Ingredient, Quantity, Recipe, RecipeSource};
use crate::shopping::quantity::leading_amount;

/// TheMealDB numbers its ingredient slots 1 through 20
const MEALDB_INGREDIENT_SLOTS: usize = 20;
const MEALDB_READY_IN_MINUTES: u32 = 30;
const MEALDB_SERVINGS: u32 = 4;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpoonacularRecipe {
    #[serde(deserialize_with = "id_as_string")]
    id: String,
    #[serde(default)]
    title: String,
    image: Option<String>,
    summary: Option<String>,
    instructions: Option<String>,
    ready_in_minutes: Option<u32>,
    servings: Option<u32>,
    #[serde(default)]
    extended_ingredients: Vec<SpoonacularIngredient>,
}

#[derive(Debug, Deserialize)]
struct SpoonacularIngredient {
    name: Option<String>,
    original: Option<String>,
    amount: Option<f64>,
    unit: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MealDbMeal {
    #[serde(deserialize_with = "id_as_string")]
    id_meal: String,
    #[serde(default)]
    str_meal: String,
    str_meal_thumb: Option<String>,
    str_tags: Option<String>,
    str_instructions: Option<String>,
    /// strIngredientN / strMeasureN and anything else
    #[serde(flatten)]
    rest: HashMap<String, Value>,
}

/// Ids arrive as numbers from Spoonacular and strings from TheMealDB
fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {}",
            other
        ))),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Convert a Spoonacular recipe information payload
pub fn from_spoonacular(payload: Value) -> Result<Recipe, serde_json::Error> {
    let raw: SpoonacularRecipe = serde_json::from_value(payload)?;

    let ingredients = raw
        .extended_ingredients
        .into_iter()
        .filter_map(|ing| {
            let name = non_blank(ing.name).or_else(|| non_blank(ing.original))?;
            let quantity = match ing.amount {
                Some(amount) => Quantity::Number(amount),
                None => Quantity::default(),
            };
            Some(Ingredient::new(name, quantity, ing.unit.unwrap_or_default()))
        })
        .collect();

    let image = non_blank(raw.image).unwrap_or_else(|| {
        format!("https://spoonacular.com/recipeImages/{}-556x370.jpg", raw.id)
    });

    Ok(Recipe {
        id: raw.id,
        title: raw.title,
        image: Some(image),
        summary: non_blank(raw.summary),
        instructions: non_blank(raw.instructions),
        ready_in_minutes: raw.ready_in_minutes,
        servings: raw.servings,
        source: RecipeSource::Spoonacular,
        ingredients,
    })
}

/// Convert a TheMealDB meal, or a `{"meals": [...]}` lookup response
pub fn from_mealdb(payload: Value) -> Result<Recipe, serde_json::Error> {
    let meal_value = match payload {
        Value::Object(mut map) if map.contains_key("meals") => {
            match map.remove("meals") {
                Some(Value::Array(meals)) => meals.into_iter().next().ok_or_else(|| {
                    serde::de::Error::custom("lookup response contains no meals")
                })?,
                _ => return Err(serde::de::Error::custom("lookup response contains no meals")),
            }
        }
        other => other,
    };
    let meal: MealDbMeal = serde_json::from_value(meal_value)?;

    let slot = |prefix: &str, n: usize| -> Option<String> {
        match meal.rest.get(&format!("{}{}", prefix, n)) {
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
            _ => None,
        }
    };

    let mut ingredients = Vec::new();
    for n in 1..=MEALDB_INGREDIENT_SLOTS {
        let Some(name) = slot("strIngredient", n) else {
            continue;
        };
        let measure = slot("strMeasure", n).unwrap_or_default();
        let (quantity, unit) = split_measure(&measure);
        ingredients.push(Ingredient::new(name, quantity, unit));
    }

    Ok(Recipe {
        id: meal.id_meal,
        title: meal.str_meal,
        image: non_blank(meal.str_meal_thumb),
        summary: non_blank(meal.str_tags).map(|tags| format!("Tags: {}", tags)),
        instructions: non_blank(meal.str_instructions),
        ready_in_minutes: Some(MEALDB_READY_IN_MINUTES),
        servings: Some(MEALDB_SERVINGS),
        source: RecipeSource::Mealdb,
        ingredients,
    })
}

/// Split a free-text measure into amount text and unit
///
/// "1 1/2 cups" → ("1 1/2", "cups"). A measure with no leading number stays
/// whole in the amount ("pinch" → ("pinch", "")) so it is still shown.
fn split_measure(measure: &str) -> (String, String) {
    let measure = measure.trim();
    match leading_amount(measure) {
        Some((_, rest)) => {
            let amount_len = measure.len() - rest.len();
            (
                measure[..amount_len].trim().to_string(),
                rest.trim().to_string(),
            )
        }
        None => (measure.to_string(), String::new()),
    }
}

/// Convert a payload from the given source
///
/// Custom recipes are expected in the common `Recipe` shape already.
pub fn import_recipe(source: RecipeSource, payload: Value) -> Result<Recipe, serde_json::Error> {
    match source {
        RecipeSource::Spoonacular => from_spoonacular(payload),
        RecipeSource::Mealdb => from_mealdb(payload),
        RecipeSource::Custom => {
            let mut payload = payload;
            if let Value::Object(map) = &mut payload {
                map.insert("source".to_string(), Value::from(RecipeSource::Custom.as_str()));
            }
            serde_json::from_value(payload)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_spoonacular() {
        let payload = json!({
            "id": 716429,
            "title": "Pasta with Garlic",
            "summary": "Quick weeknight pasta.",
            "readyInMinutes": 45,
            "servings": 2,
            "extendedIngredients": [
                {"name": "garlic", "original": "2 cloves garlic", "amount": 2.0, "unit": "cloves"},
                {"original": "1 cup parmesan", "amount": 1, "unit": "cup"},
                {"name": "", "original": ""}
            ]
        });
        let recipe = from_spoonacular(payload).unwrap();

        assert_eq!(recipe.id, "716429");
        assert_eq!(recipe.source, RecipeSource::Spoonacular);
        assert_eq!(
            recipe.image.as_deref(),
            Some("https://spoonacular.com/recipeImages/716429-556x370.jpg")
        );
        assert_eq!(recipe.ready_in_minutes, Some(45));
        assert_eq!(recipe.ingredients.len(), 2);
        assert_eq!(recipe.ingredients[0], Ingredient::new("garlic", 2.0, "cloves"));
        assert_eq!(recipe.ingredients[1].name, "1 cup parmesan");
        assert!(recipe.instructions.is_none());
    }

    #[test]
    fn test_from_mealdb_lookup_response() {
        let payload = json!({"meals": [{
            "idMeal": "52772",
            "strMeal": "Teriyaki Chicken Casserole",
            "strMealThumb": "https://www.themealdb.com/images/media/meals/wvpsxx1468256321.jpg",
            "strTags": "Meat,Casserole",
            "strInstructions": "Preheat oven to 350 F.",
            "strIngredient1": "soy sauce",
            "strMeasure1": "3/4 cup",
            "strIngredient2": "water",
            "strMeasure2": "1/2 cup",
            "strIngredient3": "ground ginger",
            "strMeasure3": "pinch",
            "strIngredient4": "",
            "strMeasure4": "",
            "strIngredient5": null,
            "strMeasure5": null
        }]});
        let recipe = from_mealdb(payload).unwrap();

        assert_eq!(recipe.id, "52772");
        assert_eq!(recipe.source, RecipeSource::Mealdb);
        assert_eq!(recipe.summary.as_deref(), Some("Tags: Meat,Casserole"));
        assert_eq!(recipe.ready_in_minutes, Some(30));
        assert_eq!(recipe.servings, Some(4));
        assert_eq!(
            recipe.ingredients,
            vec![
                Ingredient::new("soy sauce", "3/4", "cup"),
                Ingredient::new("water", "1/2", "cup"),
                Ingredient::new("ground ginger", "pinch", ""),
            ]
        );
    }

    #[test]
    fn test_from_mealdb_empty_lookup_fails() {
        assert!(from_mealdb(json!({"meals": null})).is_err());
        assert!(from_mealdb(json!({"meals": []})).is_err());
    }

    #[test]
    fn test_split_measure() {
        assert_eq!(split_measure("1 1/2 cups"), ("1 1/2".to_string(), "cups".to_string()));
        assert_eq!(split_measure(" 200g "), ("200".to_string(), "g".to_string()));
        assert_eq!(split_measure(""), (String::new(), String::new()));
    }

    #[test]
    fn test_import_custom_recipe() {
        let payload = json!({
            "id": "mine-1",
            "title": "Toast",
            "source": "spoonacular",
            "ingredients": [{"name": "bread", "quantity": 2, "unit": "slices"}]
        });
        let recipe = import_recipe(RecipeSource::Custom, payload).unwrap();

        assert_eq!(recipe.source, RecipeSource::Custom);
        assert_eq!(recipe.ingredients[0].quantity, Quantity::Number(2.0));
    }
}
