//! Meal Cart Status Tool
//!
//! Provides runtime status information about the Meal Cart service.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;

/// Shopping list instructions for AI assistants
pub const SHOPPING_INSTRUCTIONS: &str = r#"
# Meal Cart Shopping List Instructions

This guide explains how recipes, the weekly meal plan, and the shopping list fit
together in Meal Cart.

## Overview

1. **Recipes** arrive as provider JSON (Spoonacular or TheMealDB) or as custom
   recipes. `import_recipe` converts them into one common shape.
2. **Saved recipes** are the user's collection (`save_recipe`).
3. **Meal plan** holds at most one recipe per day, Monday to Sunday.
4. **Shopping list** is a checklist built from planned ingredients or entered by hand.

## Two Ways to Fill the Shopping List

| Tool | Existing list | Unit clashes |
|------|---------------|--------------|
| `generate_shopping_list` | Replaced | Separate "Name (label)" item |
| `add_recipe_to_plan` | Kept, quantities added on | Existing item left unchanged |

### generate_shopping_list (rebuild)

Consolidates every planned day into a fresh list. Checked state is lost.

- Names are matched case-insensitively ("Flour" and "flour" are one item)
- Same unit: quantities are added ("1 cup" + "2 cup" = "3 cup")
- Different unit: a second item is created, e.g. "Flour (additional)"
- `label_by_recipe: true` uses the recipe title instead of "additional"

### add_recipe_to_plan (merge)

Plans the recipe and adds its ingredients onto the current list. Items keep
their id and checked state.

## Quantities

Quantities may be numbers or text. Text is read from its leading number:

| Input | Read as |
|-------|---------|
| `2` | 2 |
| `2 cups` | 2 |
| `1/2` | 0.5 |
| `1 1/2` | 1.5 |
| `to taste` | 0 (reported in `warnings`) |

**No unit conversion is performed.** "1 cup" and "16 tbsp" stay separate.

## Quick Reference

| Task | Tool |
|------|------|
| Create account | `create_account` |
| Convert provider JSON | `import_recipe` |
| Save / list / remove recipes | `save_recipe`, `list_saved_recipes`, `remove_saved_recipe` |
| View plan | `get_meal_plan` |
| Plan a day (list untouched) | `assign_meal` |
| Plan a day and add to list | `add_recipe_to_plan` |
| Empty a day | `clear_meal` |
| Rebuild list from plan | `generate_shopping_list` |
| Add item by hand | `add_shopping_item` |
| Check / uncheck | `toggle_shopping_item` |
| Tidy up | `clear_checked_items`, `remove_shopping_item`, `clear_shopping_list` |
| Preview a consolidation | `consolidate_ingredients` |
| Printable list | `export_shopping_list_markdown` |

## Notes

- Days are named `monday` .. `sunday` (short forms like `tue` also work)
- Every shopping list response includes `warnings` for quantities that could not be read
- `logout` deletes the stored profile, recipes, plan, and list
"#;

/// Runtime status of the Meal Cart service
#[derive(Debug, Clone, Serialize)]
pub struct MealCartStatus {
    /// Build information
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    /// Database information
    pub database_path: String,
    pub database_size_bytes: Option<u64>,

    /// Process information
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
}

impl StatusTracker {
    pub fn new(database_path: PathBuf) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
        }
    }

    /// Get the current status
    pub fn get_status(&self) -> MealCartStatus {
        let build_info = BuildInfo::current();

        // Missing for in-memory databases
        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        MealCartStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}
