//! Account MCP Tools
//!
//! Profile creation and logout. Accounts are local: creating one replaces
//! whatever user document was stored before.

use serde::Serialize;

use super::{load_user, update_user};
use crate::db::KeyValueStore;
use crate::models::{Profile, UserData};

/// Response for create_account
#[derive(Debug, Serialize)]
pub struct CreateAccountResponse {
    pub profile: Profile,
    pub replaced_existing: bool,
}

/// Response for get_account
#[derive(Debug, Serialize)]
pub struct AccountSummary {
    pub logged_in: bool,
    pub profile: Profile,
    pub saved_recipe_count: usize,
    pub planned_day_count: usize,
    pub shopping_item_count: usize,
    pub checked_item_count: usize,
}

/// Response for logout
#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub logged_out: bool,
}

fn validate_profile(profile: &Profile) -> Result<(), String> {
    let required = [
        ("first_name", &profile.first_name),
        ("last_name", &profile.last_name),
        ("email", &profile.email),
        ("username", &profile.username),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            return Err(format!("{} is required", field));
        }
    }
    if !profile.email.contains('@') {
        return Err(format!("Invalid email address: {}", profile.email));
    }
    Ok(())
}

fn trimmed(profile: Profile) -> Profile {
    Profile {
        first_name: profile.first_name.trim().to_string(),
        last_name: profile.last_name.trim().to_string(),
        email: profile.email.trim().to_string(),
        username: profile.username.trim().to_string(),
    }
}

/// Create a fresh account with empty recipes, list, and plan
pub fn create_account(
    store: &dyn KeyValueStore,
    profile: Profile,
) -> Result<CreateAccountResponse, String> {
    let profile = trimmed(profile);
    validate_profile(&profile)?;

    let response = update_user(store, |data| {
        let replaced_existing = data.is_logged_in();
        *data = UserData::new(profile);
        Ok(CreateAccountResponse {
            profile: data.profile.clone(),
            replaced_existing,
        })
    })?;

    tracing::info!("Created account for {}", response.profile.username);
    Ok(response)
}

/// Replace the stored profile, keeping recipes, plan, and list
pub fn set_profile(store: &dyn KeyValueStore, profile: Profile) -> Result<Profile, String> {
    let profile = trimmed(profile);
    validate_profile(&profile)?;

    let profile = update_user(store, |data| {
        data.profile = profile;
        Ok(data.profile.clone())
    })?;

    tracing::info!("Updated profile for {}", profile.username);
    Ok(profile)
}

/// Summarize the stored account
pub fn get_account(store: &dyn KeyValueStore) -> Result<AccountSummary, String> {
    let data = load_user(store)?;
    Ok(AccountSummary {
        logged_in: data.is_logged_in(),
        saved_recipe_count: data.saved_recipes.len(),
        planned_day_count: data.meal_plan.planned_count(),
        shopping_item_count: data.shopping_list.len(),
        checked_item_count: data.checked_count(),
        profile: data.profile,
    })
}

/// Forget the stored user document
pub fn logout(store: &dyn KeyValueStore) -> Result<LogoutResponse, String> {
    let logged_out = UserData::clear(store)
        .map_err(|e| format!("Failed to clear user data: {}", e))?;
    tracing::info!("Logged out");
    Ok(LogoutResponse { logged_out })
}
