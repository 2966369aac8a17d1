//! Shopping List MCP Tools
//!
//! Manual list editing, pure consolidation, and markdown export.

use serde::Serialize;

use super::{load_user, update_user};
use crate::db::KeyValueStore;
use crate::models::{Ingredient, ShoppingListItem, UserData};
use crate::shopping::{self, QuantityWarning};

/// The stored shopping list, plus warnings from the call that produced it
#[derive(Debug, Serialize)]
pub struct ShoppingListResponse {
    pub items: Vec<ShoppingListItem>,
    pub total: usize,
    pub checked: usize,
    pub warnings: Vec<QuantityWarning>,
}

impl ShoppingListResponse {
    pub fn new(data: &UserData, warnings: Vec<QuantityWarning>) -> Self {
        Self {
            items: data.shopping_list.clone(),
            total: data.shopping_list.len(),
            checked: data.checked_count(),
            warnings,
        }
    }
}

/// Response for add_shopping_item, toggle_shopping_item
#[derive(Debug, Serialize)]
pub struct ShoppingItemResponse {
    pub item: ShoppingListItem,
    pub total: usize,
}

/// Response for remove_shopping_item, clear_checked_items, clear_shopping_list
#[derive(Debug, Serialize)]
pub struct RemoveItemsResponse {
    pub removed: usize,
    pub remaining: usize,
}

/// Response for consolidate_ingredients
#[derive(Debug, Serialize)]
pub struct ConsolidateResponse {
    pub items: Vec<ShoppingListItem>,
    pub input_count: usize,
    pub warnings: Vec<QuantityWarning>,
}

/// Response for export_shopping_list_markdown
#[derive(Debug, Serialize)]
pub struct ExportShoppingListResponse {
    pub markdown: String,
    pub item_count: usize,
    pub generated_at: String,
}

/// Get the stored shopping list
pub fn get_shopping_list(store: &dyn KeyValueStore) -> Result<ShoppingListResponse, String> {
    let data = load_user(store)?;
    Ok(ShoppingListResponse::new(&data, Vec::new()))
}

/// Add a hand-entered item to the list
pub fn add_shopping_item(
    store: &dyn KeyValueStore,
    name: &str,
    quantity: &str,
) -> Result<ShoppingItemResponse, String> {
    if name.trim().is_empty() {
        return Err("Item name is required".to_string());
    }

    let response = update_user(store, |data| {
        let item = data.add_shopping_item(name, quantity).clone();
        Ok(ShoppingItemResponse {
            item,
            total: data.shopping_list.len(),
        })
    })?;

    tracing::debug!("Added shopping item {}", response.item.name);
    Ok(response)
}

/// Flip the checked state of an item
pub fn toggle_shopping_item(
    store: &dyn KeyValueStore,
    id: &str,
) -> Result<ShoppingItemResponse, String> {
    update_user(store, |data| {
        let item = data
            .toggle_item(id)
            .cloned()
            .ok_or_else(|| format!("Shopping item not found: {}", id))?;
        Ok(ShoppingItemResponse {
            item,
            total: data.shopping_list.len(),
        })
    })
}

/// Set the checked state of an item explicitly
pub fn set_shopping_item_checked(
    store: &dyn KeyValueStore,
    id: &str,
    checked: bool,
) -> Result<ShoppingItemResponse, String> {
    update_user(store, |data| {
        let item = data
            .set_item_checked(id, checked)
            .cloned()
            .ok_or_else(|| format!("Shopping item not found: {}", id))?;
        Ok(ShoppingItemResponse {
            item,
            total: data.shopping_list.len(),
        })
    })
}

/// Remove one item
pub fn remove_shopping_item(
    store: &dyn KeyValueStore,
    id: &str,
) -> Result<RemoveItemsResponse, String> {
    update_user(store, |data| {
        if !data.remove_item(id) {
            return Err(format!("Shopping item not found: {}", id));
        }
        Ok(RemoveItemsResponse {
            removed: 1,
            remaining: data.shopping_list.len(),
        })
    })
}

/// Remove every checked item
pub fn clear_checked_items(store: &dyn KeyValueStore) -> Result<RemoveItemsResponse, String> {
    update_user(store, |data| {
        Ok(RemoveItemsResponse {
            removed: data.clear_checked(),
            remaining: data.shopping_list.len(),
        })
    })
}

/// Empty the list
pub fn clear_shopping_list(store: &dyn KeyValueStore) -> Result<RemoveItemsResponse, String> {
    let removed = update_user(store, |data| Ok(data.clear_shopping_list()))?;

    tracing::info!("Cleared {} shopping item(s)", removed);
    Ok(RemoveItemsResponse {
        removed,
        remaining: 0,
    })
}

/// Consolidate ingredients into list items without touching storage
pub fn consolidate_ingredients(ingredients: &[Ingredient]) -> ConsolidateResponse {
    let merged = shopping::merge(ingredients);
    let items = shopping::build(&merged);
    ConsolidateResponse {
        items,
        input_count: ingredients.len(),
        warnings: merged.into_warnings(),
    }
}

/// Render the stored list as a markdown checklist
pub fn export_shopping_list_markdown(
    store: &dyn KeyValueStore,
    include_checked: bool,
) -> Result<ExportShoppingListResponse, String> {
    let data = load_user(store)?;

    let now = chrono::Utc::now();
    let generated_at = now.format("%Y-%m-%d %H:%M:%S UTC").to_string();

    let items: Vec<&ShoppingListItem> = data
        .shopping_list
        .iter()
        .filter(|item| include_checked || !item.checked)
        .collect();

    let mut markdown = String::new();

    markdown.push_str("# Shopping List\n\n");
    if data.is_logged_in() {
        markdown.push_str(&format!("**For:** {}\n\n", display_name(&data)));
    }
    markdown.push_str(&format!("**Date:** {}\n\n", now.format("%Y-%m-%d")));

    let planned: Vec<String> = data
        .meal_plan
        .planned()
        .map(|(day, recipe)| format!("{}: {}", crate::models::weekday_name(day), recipe.title))
        .collect();
    if !planned.is_empty() {
        markdown.push_str("## Meal Plan\n\n");
        for line in &planned {
            markdown.push_str(&format!("- {}\n", line));
        }
        markdown.push('\n');
    }

    markdown.push_str("## Items\n\n");
    for item in &items {
        let mark = if item.checked { "x" } else { " " };
        if item.quantity.trim().is_empty() {
            markdown.push_str(&format!("- [{}] {}\n", mark, item.name));
        } else {
            markdown.push_str(&format!("- [{}] {} ({})\n", mark, item.name, item.quantity));
        }
    }
    if items.is_empty() {
        markdown.push_str("*Nothing to buy.*\n");
    }

    markdown.push_str("\n---\n\n");
    markdown.push_str(&format!("*Generated: {}*\n", generated_at));

    Ok(ExportShoppingListResponse {
        markdown,
        item_count: items.len(),
        generated_at,
    })
}

fn display_name(data: &UserData) -> String {
    let full = format!("{} {}", data.profile.first_name, data.profile.last_name);
    let full = full.trim();
    if full.is_empty() {
        data.profile.username.clone()
    } else {
        full.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;

    #[test]
    fn test_add_toggle_remove() {
        let store = MemoryStore::new();
        let added = add_shopping_item(&store, "Coffee", "1 bag").unwrap();
        assert_eq!(added.total, 1);
        assert!(!added.item.checked);

        let toggled = toggle_shopping_item(&store, &added.item.id).unwrap();
        assert!(toggled.item.checked);
        let unchecked = set_shopping_item_checked(&store, &added.item.id, false).unwrap();
        assert!(!unchecked.item.checked);

        assert!(toggle_shopping_item(&store, "nope").is_err());
        assert_eq!(remove_shopping_item(&store, &added.item.id).unwrap().remaining, 0);
        assert!(remove_shopping_item(&store, &added.item.id).is_err());
    }

    #[test]
    fn test_concurrent_adds_keep_every_item() {
        let dir = std::env::temp_dir().join(format!("mealcart-{}", uuid::Uuid::new_v4()));
        let db = crate::config::open_database(&dir.join("mealcart.db")).unwrap();
        let first = add_shopping_item(&db, "Tea", "1 box").unwrap().item.id;

        std::thread::scope(|scope| {
            for worker in 0..4 {
                let db = db.clone();
                let first = first.clone();
                scope.spawn(move || {
                    for n in 0..50 {
                        add_shopping_item(&db, &format!("Item {}-{}", worker, n), "1").unwrap();
                        toggle_shopping_item(&db, &first).unwrap();
                    }
                });
            }
        });

        let list = get_shopping_list(&db).unwrap();
        assert_eq!(list.total, 201);
        // 200 toggles leave the first item where it started
        assert_eq!(list.checked, 0);

        drop(db);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_add_requires_name() {
        let store = MemoryStore::new();
        assert!(add_shopping_item(&store, "  ", "1").is_err());
        assert_eq!(get_shopping_list(&store).unwrap().total, 0);
    }

    #[test]
    fn test_clear_checked_and_clear_all() {
        let store = MemoryStore::new();
        let a = add_shopping_item(&store, "Apples", "6").unwrap().item;
        add_shopping_item(&store, "Pears", "4").unwrap();
        toggle_shopping_item(&store, &a.id).unwrap();

        let cleared = clear_checked_items(&store).unwrap();
        assert_eq!(cleared.removed, 1);
        assert_eq!(cleared.remaining, 1);

        let list = get_shopping_list(&store).unwrap();
        assert_eq!(list.items[0].name, "Pears");
        assert_eq!(list.checked, 0);

        assert_eq!(clear_shopping_list(&store).unwrap().removed, 1);
        assert_eq!(get_shopping_list(&store).unwrap().total, 0);
    }

    #[test]
    fn test_consolidate_ingredients_worked_example() {
        let ingredients = vec![
            Ingredient::new("flour", "1", "cup"),
            Ingredient::new("Flour", "2", "cup"),
            Ingredient::new("flour", "1", "tbsp"),
            Ingredient::new("Salt", "abc", "tsp"),
        ];
        let result = consolidate_ingredients(&ingredients);

        let summary: Vec<(&str, &str)> = result
            .items
            .iter()
            .map(|i| (i.name.as_str(), i.quantity.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("Flour", "3 cup"),
                ("Flour (additional)", "1 tbsp"),
                ("Salt", "0 tsp"),
            ]
        );
        assert_eq!(result.input_count, 4);
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_export_markdown() {
        let store = MemoryStore::new();
        let eggs = add_shopping_item(&store, "Eggs", "12").unwrap().item;
        add_shopping_item(&store, "Basil", "").unwrap();
        toggle_shopping_item(&store, &eggs.id).unwrap();

        let all = export_shopping_list_markdown(&store, true).unwrap();
        assert!(all.markdown.starts_with("# Shopping List"));
        assert!(all.markdown.contains("- [x] Eggs (12)"));
        assert!(all.markdown.contains("- [ ] Basil\n"));
        assert_eq!(all.item_count, 2);

        let open = export_shopping_list_markdown(&store, false).unwrap();
        assert!(!open.markdown.contains("Eggs"));
        assert_eq!(open.item_count, 1);
    }
}
