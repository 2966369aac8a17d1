//! Shopping list item model
//!
//! The only entity produced by consolidation that is persisted.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A checkable entry on the shopping list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingListItem {
    pub id: String,
    pub name: String,
    /// Display quantity, "<amount> <unit>" for generated items
    pub quantity: String,
    #[serde(default)]
    pub checked: bool,
}

impl ShoppingListItem {
    /// Create an unchecked item with a fresh id
    pub fn new(name: impl Into<String>, quantity: impl Into<String>) -> Self {
        Self {
            id: new_item_id(),
            name: name.into(),
            quantity: quantity.into(),
            checked: false,
        }
    }
}

/// Generate an item id. Random v4 UUIDs; not meant to be secret.
pub fn new_item_id() -> String {
    Uuid::new_v4().to_string()
}
