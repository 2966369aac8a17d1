//! Shopping list construction from merged ingredients

use super::merger::MergedIngredients;
use super::quantity::format_amount;
use crate::models::ShoppingListItem;

/// Turn merged entries into fresh, unchecked shopping list items
///
/// Items come out in merge insertion order. Each call generates new ids.
pub fn build(merged: &MergedIngredients) -> Vec<ShoppingListItem> {
    merged
        .iter()
        .map(|(key, entry)| {
            ShoppingListItem::new(capitalize_first(key), format_quantity(entry.quantity, &entry.unit))
        })
        .collect()
}

/// Upper-case the first character, leaving the rest untouched
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// "<amount> <unit>" with no stray whitespace when the unit is empty
pub fn format_quantity(amount: f64, unit: &str) -> String {
    format!("{} {}", format_amount(amount), unit).trim().to_string()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::models::Ingredient;
    use crate::shopping::merger::merge;

    #[test]
    fn test_capitalize_first() {
        assert_eq!(capitalize_first("flour"), "Flour");
        assert_eq!(capitalize_first("flour (additional)"), "Flour (additional)");
        assert_eq!(capitalize_first("éclair"), "Éclair");
        assert_eq!(capitalize_first("Already"), "Already");
        assert_eq!(capitalize_first(""), "");
    }

    #[test]
    fn test_format_quantity() {
        assert_eq!(format_quantity(3.0, "cup"), "3 cup");
        assert_eq!(format_quantity(2.0, ""), "2");
        assert_eq!(format_quantity(0.25, "tsp"), "0.25 tsp");
        assert_eq!(format_quantity(0.0, ""), "0");
    }

    #[test]
    fn test_build_worked_example() {
        let ingredients = vec![
            Ingredient::new("flour", "1", "cup"),
            Ingredient::new("Flour", "2", "cup"),
            Ingredient::new("flour", "1", "tbsp"),
        ];
        let items = build(&merge(&ingredients));

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "Flour");
        assert_eq!(items[0].quantity, "3 cup");
        assert!(!items[0].checked);
        assert_eq!(items[1].name, "Flour (additional)");
        assert_eq!(items[1].quantity, "1 tbsp");
        assert!(!items[1].checked);
    }

    #[test]
    fn test_build_unparseable_quantity() {
        let ingredients = vec![Ingredient::new("Salt", "abc", "tsp")];
        let items = build(&merge(&ingredients));

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Salt");
        assert_eq!(items[0].quantity, "0 tsp");
        assert!(!items[0].checked);
    }

    #[test]
    fn test_build_ids_are_unique() {
        let ingredients: Vec<Ingredient> = (0..50)
            .map(|i| Ingredient::new(format!("item {}", i), 1.0, ""))
            .collect();
        let items = build(&merge(&ingredients));

        let ids: HashSet<&str> = items.iter().map(|item| item.id.as_str()).collect();
        assert_eq!(ids.len(), 50);
    }

    #[test]
    fn test_build_is_stable_apart_from_ids() {
        let ingredients = vec![
            Ingredient::new("tomato", "2", ""),
            Ingredient::new("basil", "1", "bunch"),
        ];
        let merged = merge(&ingredients);
        let first = build(&merged);
        let second = build(&merged);

        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.name, b.name);
            assert_eq!(a.quantity, b.quantity);
        }
    }

    #[test]
    fn test_quantities_have_no_outer_whitespace() {
        let ingredients = vec![
            Ingredient::new("eggs", "4", ""),
            Ingredient::new("milk", "1", "cup"),
            Ingredient::new("pepper", "pinch", ""),
        ];
        for item in build(&merge(&ingredients)) {
            assert_eq!(item.quantity, item.quantity.trim());
            assert!(item.name.chars().next().is_some_and(char::is_uppercase));
        }
    }
}
