//! Meal Cart Tools module
//!
//! MCP tool implementations. Read-only tools load the user document; tools that
//! change it go through `update_user`, which holds the store's write lock from
//! load to save.

pub mod account;
pub mod meal_plan;
pub mod recipes;
pub mod shopping_list;
pub mod status;

use crate::db::KeyValueStore;
use crate::models::UserData;

pub(crate) fn load_user(store: &dyn KeyValueStore) -> Result<UserData, String> {
    UserData::load(store).map_err(|e| format!("Failed to load user data: {}", e))
}

/// Apply `change` to the stored user document and save it, unless it fails
pub(crate) fn update_user<T, F>(store: &dyn KeyValueStore, change: F) -> Result<T, String>
where
    F: FnOnce(&mut UserData) -> Result<T, String>,
{
    UserData::update(store, change).map_err(|e| format!("Failed to save user data: {}", e))?
}
