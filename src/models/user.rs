//! User state
//!
//! Profile, saved recipes, shopping list, and meal plan, stored together as one
//! JSON document. Operations take the state explicitly; loading and saving go
//! through an injected `KeyValueStore`.

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use super::{Ingredient, MealPlan, PlannedRecipe, RecipeSource, SavedRecipe, ShoppingListItem};
use crate::db::{DbError, DbResult, KeyValueStore};

/// Storage key for the user document
pub const USER_DATA_KEY: &str = "userData";

/// Account profile
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub username: String,
}

/// Everything persisted for the user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    #[serde(default)]
    pub profile: Profile,
    #[serde(default)]
    pub saved_recipes: Vec<SavedRecipe>,
    #[serde(default)]
    pub shopping_list: Vec<ShoppingListItem>,
    #[serde(default)]
    pub meal_plan: MealPlan,
}

impl UserData {
    /// Fresh state for a new account
    pub fn new(profile: Profile) -> Self {
        Self {
            profile,
            ..Default::default()
        }
    }

    pub fn is_logged_in(&self) -> bool {
        !self.profile.username.trim().is_empty()
    }

    /// Read a stored document
    ///
    /// A missing document yields empty state. An unreadable document is logged
    /// and also yields empty state, so one bad write cannot lock the user out.
    fn from_stored(raw: Option<&str>) -> Self {
        match raw.map(serde_json::from_str::<UserData>) {
            Some(Ok(data)) => data,
            Some(Err(e)) => {
                tracing::error!("Error parsing stored user data: {}", e);
                Self::default()
            }
            None => Self::default(),
        }
    }

    /// Load the stored state
    pub fn load(store: &dyn KeyValueStore) -> DbResult<Self> {
        Ok(Self::from_stored(store.get(USER_DATA_KEY)?.as_deref()))
    }

    /// Load, change, and save the state in one step
    ///
    /// The store keeps other writers out from the read until the write. The
    /// outer result is the store's; the inner one is `change`'s. Nothing is
    /// written when `change` fails.
    pub fn update<T, E, F>(store: &dyn KeyValueStore, change: F) -> DbResult<Result<T, E>>
    where
        F: FnOnce(&mut UserData) -> Result<T, E>,
    {
        let mut change = Some(change);
        let mut outcome = None;
        let mut encode_error = None;

        store.update(USER_DATA_KEY, &mut |raw: Option<&str>| {
            let change = change.take()?;
            let mut data = Self::from_stored(raw);
            let result = change(&mut data);

            let value = match &result {
                Ok(_) => match serde_json::to_string(&data) {
                    Ok(value) => Some(value),
                    Err(e) => {
                        encode_error = Some(e);
                        None
                    }
                },
                Err(_) => None,
            };
            outcome = Some(result);
            value
        })?;

        if let Some(e) = encode_error {
            return Err(DbError::Serialization(e));
        }
        let outcome = outcome.ok_or_else(|| DbError::NotApplied(USER_DATA_KEY.to_string()))?;
        if outcome.is_ok() {
            tracing::debug!("User data saved");
        }
        Ok(outcome)
    }

    /// Remove the stored state entirely
    pub fn clear(store: &dyn KeyValueStore) -> DbResult<bool> {
        store.remove(USER_DATA_KEY)
    }

    // --- Saved recipes ---

    pub fn has_saved_recipe(&self, id: &str, source: RecipeSource) -> bool {
        self.saved_recipes
            .iter()
            .any(|r| r.id == id && r.source == source)
    }

    /// Add a recipe to the collection. Returns false if it is already saved.
    pub fn save_recipe(&mut self, recipe: SavedRecipe) -> bool {
        if self.has_saved_recipe(&recipe.id, recipe.source) {
            return false;
        }
        self.saved_recipes.push(recipe);
        true
    }

    /// Returns true if a recipe was removed
    pub fn remove_saved_recipe(&mut self, id: &str, source: RecipeSource) -> bool {
        let before = self.saved_recipes.len();
        self.saved_recipes
            .retain(|r| !(r.id == id && r.source == source));
        self.saved_recipes.len() < before
    }

    /// Saved recipes, most recently saved first
    pub fn saved_recipes_newest_first(&self) -> Vec<&SavedRecipe> {
        let mut recipes: Vec<&SavedRecipe> = self.saved_recipes.iter().collect();
        recipes.sort_by(|a, b| {
            let a_time = chrono::DateTime::parse_from_rfc3339(&a.saved_at).ok();
            let b_time = chrono::DateTime::parse_from_rfc3339(&b.saved_at).ok();
            b_time.cmp(&a_time)
        });
        recipes
    }

    // --- Meal plan ---

    pub fn assign_meal(&mut self, day: Weekday, recipe: PlannedRecipe) -> Option<PlannedRecipe> {
        self.meal_plan.assign(day, recipe)
    }

    pub fn clear_meal(&mut self, day: Weekday) -> Option<PlannedRecipe> {
        self.meal_plan.clear(day)
    }

    /// Ingredients of every planned day, Monday first
    pub fn planned_ingredients(&self) -> Vec<&Ingredient> {
        self.meal_plan.ingredients().collect()
    }

    // --- Shopping list ---

    /// Add a hand-entered item
    pub fn add_shopping_item(&mut self, name: &str, quantity: &str) -> &ShoppingListItem {
        self.shopping_list
            .push(ShoppingListItem::new(name.trim(), quantity.trim()));
        &self.shopping_list[self.shopping_list.len() - 1]
    }

    pub fn set_item_checked(&mut self, id: &str, checked: bool) -> Option<&ShoppingListItem> {
        let item = self.shopping_list.iter_mut().find(|item| item.id == id)?;
        item.checked = checked;
        Some(item)
    }

    pub fn toggle_item(&mut self, id: &str) -> Option<&ShoppingListItem> {
        let item = self.shopping_list.iter_mut().find(|item| item.id == id)?;
        item.checked = !item.checked;
        Some(item)
    }

    /// Returns true if an item was removed
    pub fn remove_item(&mut self, id: &str) -> bool {
        let before = self.shopping_list.len();
        self.shopping_list.retain(|item| item.id != id);
        self.shopping_list.len() < before
    }

    /// Drop checked items, returning how many were removed
    pub fn clear_checked(&mut self) -> usize {
        let before = self.shopping_list.len();
        self.shopping_list.retain(|item| !item.checked);
        before - self.shopping_list.len()
    }

    /// Empty the list, returning how many items it held
    pub fn clear_shopping_list(&mut self) -> usize {
        let removed = self.shopping_list.len();
        self.shopping_list.clear();
        removed
    }

    pub fn checked_count(&self) -> usize {
        self.shopping_list.iter().filter(|item| item.checked).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;

    fn saved(id: &str, source: RecipeSource, saved_at: &str) -> SavedRecipe {
        SavedRecipe {
            id: id.to_string(),
            source,
            title: format!("Recipe {}", id),
            image: None,
            description: None,
            saved_at: saved_at.to_string(),
        }
    }

    #[test]
    fn test_load_missing_is_empty() {
        let store = MemoryStore::new();
        let data = UserData::load(&store).unwrap();
        assert_eq!(data, UserData::default());
        assert!(!data.is_logged_in());
    }

    #[test]
    fn test_load_corrupt_is_empty() {
        let store = MemoryStore::new();
        store.set(USER_DATA_KEY, "{\"profile\": ").unwrap();
        assert_eq!(UserData::load(&store).unwrap(), UserData::default());
    }

    #[test]
    fn test_update_and_load() {
        let store = MemoryStore::new();
        let data = UserData::update(&store, |data| {
            data.profile.username = "cook".to_string();
            data.add_shopping_item("Lemons", "3");
            Ok::<_, String>(data.clone())
        })
        .unwrap()
        .unwrap();

        let loaded = UserData::load(&store).unwrap();
        assert_eq!(loaded, data);
        assert!(loaded.is_logged_in());

        assert!(UserData::clear(&store).unwrap());
        assert_eq!(UserData::load(&store).unwrap(), UserData::default());
    }

    #[test]
    fn test_failed_update_writes_nothing() {
        let store = MemoryStore::new();
        let result = UserData::update(&store, |data| {
            data.add_shopping_item("Lemons", "3");
            Err::<(), _>("rejected".to_string())
        })
        .unwrap();

        assert_eq!(result, Err("rejected".to_string()));
        assert_eq!(store.get(USER_DATA_KEY).unwrap(), None);
    }

    #[test]
    fn test_update_starts_from_corrupt_document_as_empty() {
        let store = MemoryStore::new();
        store.set(USER_DATA_KEY, "not json").unwrap();

        let count = UserData::update(&store, |data| {
            data.add_shopping_item("Eggs", "12");
            Ok::<_, String>(data.shopping_list.len())
        })
        .unwrap();

        assert_eq!(count, Ok(1));
        assert_eq!(UserData::load(&store).unwrap().shopping_list.len(), 1);
    }

    #[test]
    fn test_stored_document_uses_camel_case() {
        let mut data = UserData::default();
        data.profile.first_name = "Ada".to_string();
        let json = serde_json::to_value(&data).unwrap();

        assert_eq!(json["profile"]["firstName"], "Ada");
        assert!(json.get("savedRecipes").is_some());
        assert!(json.get("shoppingList").is_some());
        assert!(json.get("mealPlan").is_some());
    }

    #[test]
    fn test_saved_recipes_are_unique_per_source() {
        let mut data = UserData::default();
        assert!(data.save_recipe(saved("1", RecipeSource::Spoonacular, "2026-01-01T00:00:00Z")));
        assert!(!data.save_recipe(saved("1", RecipeSource::Spoonacular, "2026-01-02T00:00:00Z")));
        assert!(data.save_recipe(saved("1", RecipeSource::Mealdb, "2026-01-02T00:00:00Z")));
        assert_eq!(data.saved_recipes.len(), 2);

        assert!(data.remove_saved_recipe("1", RecipeSource::Spoonacular));
        assert!(!data.remove_saved_recipe("1", RecipeSource::Spoonacular));
        assert_eq!(data.saved_recipes.len(), 1);
    }

    #[test]
    fn test_saved_recipes_newest_first() {
        let mut data = UserData::default();
        data.save_recipe(saved("old", RecipeSource::Custom, "2026-01-01T08:00:00Z"));
        data.save_recipe(saved("new", RecipeSource::Custom, "2026-03-01T08:00:00+02:00"));
        data.save_recipe(saved("mid", RecipeSource::Custom, "2026-02-01T08:00:00Z"));

        let ids: Vec<&str> = data
            .saved_recipes_newest_first()
            .iter()
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(ids, vec!["new", "mid", "old"]);
    }

    #[test]
    fn test_meal_plan_operations() {
        let mut data = UserData::default();
        let recipe = PlannedRecipe {
            id: "1".to_string(),
            source: RecipeSource::Custom,
            title: "Omelette".to_string(),
            ingredients: vec![Ingredient::new("eggs", "3", "")],
            added_at: "2026-01-01T00:00:00+00:00".to_string(),
        };

        assert!(data.assign_meal(Weekday::Sat, recipe).is_none());
        assert_eq!(data.planned_ingredients().len(), 1);
        assert!(data.clear_meal(Weekday::Sat).is_some());
        assert!(data.planned_ingredients().is_empty());
    }

    #[test]
    fn test_shopping_item_lifecycle() {
        let mut data = UserData::default();
        let id = data.add_shopping_item(" Bread ", " 1 loaf ").id.clone();
        data.add_shopping_item("Butter", "250 g");

        assert_eq!(data.shopping_list[0].name, "Bread");
        assert_eq!(data.shopping_list[0].quantity, "1 loaf");
        assert_eq!(data.toggle_item(&id).map(|i| i.checked), Some(true));
        assert_eq!(data.checked_count(), 1);
        assert_eq!(data.set_item_checked(&id, false).map(|i| i.checked), Some(false));
        assert!(data.toggle_item("missing").is_none());

        data.toggle_item(&id);
        assert_eq!(data.clear_checked(), 1);
        assert_eq!(data.shopping_list.len(), 1);

        let butter = data.shopping_list[0].id.clone();
        assert!(data.remove_item(&butter));
        assert!(!data.remove_item(&butter));
        assert_eq!(data.clear_shopping_list(), 0);
    }
}
