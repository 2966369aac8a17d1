//! Utility to regenerate the stored shopping list from the stored meal plan
//!
//! Usage: rebuild_shopping_list [--label-by-recipe]

use mealcart::tools::meal_plan::generate_shopping_list;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let label_by_recipe = std::env::args().skip(1).any(|arg| arg == "--label-by-recipe");

    let db_path = mealcart::config::database_path();
    println!("Database path: {}", db_path.display());

    let database = mealcart::config::open_database(&db_path)?;

    let result = generate_shopping_list(&database, label_by_recipe)?;

    println!(
        "Rebuilt shopping list from {} planned day(s), {} ingredient(s); replaced {} item(s):",
        result.planned_days, result.ingredient_count, result.replaced_items
    );
    for item in &result.shopping_list.items {
        println!("  {} - {}", item.name, item.quantity);
    }
    for warning in &result.shopping_list.warnings {
        println!("  warning: {}", warning.message);
    }

    Ok(())
}
