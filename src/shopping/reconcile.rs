//! Reconciliation of new ingredients with a shopping list
//!
//! Two modes share the merger and builder:
//! - `Rebuild` throws the existing list away and consolidates from scratch.
//!   Unit clashes become separate "(label)" entries.
//! - `MergeIntoExisting` folds ingredients into the items already on the list.
//!   A unit clash or an unreadable quantity leaves the existing item alone.

use serde::Serialize;

use super::builder::{build, capitalize_first, format_quantity};
use super::merger::{default_label, merge_with, QuantityWarning};
use super::normalizer::normalize;
use super::quantity::{add_amounts, leading_amount};
use crate::models::{Ingredient, ShoppingListItem};

/// How new ingredients combine with an existing shopping list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReconcileMode {
    /// Replace the list with a fresh consolidation of the ingredients
    #[default]
    Rebuild,
    /// Add the ingredients onto the items already on the list
    MergeIntoExisting,
}

/// Outcome of a reconciliation
#[derive(Debug, Clone, Default, Serialize)]
pub struct Consolidation {
    pub items: Vec<ShoppingListItem>,
    pub warnings: Vec<QuantityWarning>,
    /// Items created by this call
    pub added: usize,
    /// Existing items whose quantity was increased
    pub updated: usize,
    /// Ingredients that matched an existing item but could not be added to it
    pub unchanged: usize,
}

/// Consolidate ingredients into a new list (merge then build)
pub fn consolidate<'a, I>(ingredients: I) -> Vec<ShoppingListItem>
where
    I: IntoIterator<Item = &'a Ingredient>,
{
    consolidate_with(ingredients, default_label)
}

/// Consolidate with a caller-supplied context label for unit clashes
pub fn consolidate_with<'a, I, F>(ingredients: I, labeler: F) -> Vec<ShoppingListItem>
where
    I: IntoIterator<Item = &'a Ingredient>,
    F: Fn(&Ingredient) -> String,
{
    build(&merge_with(ingredients, labeler))
}

/// Combine ingredients with an existing list using the default context label
pub fn reconcile<'a, I>(
    existing: Vec<ShoppingListItem>,
    ingredients: I,
    mode: ReconcileMode,
) -> Consolidation
where
    I: IntoIterator<Item = &'a Ingredient>,
{
    reconcile_with(existing, ingredients, mode, default_label)
}

/// Combine ingredients with an existing list
///
/// `labeler` is only consulted in `Rebuild` mode.
pub fn reconcile_with<'a, I, F>(
    existing: Vec<ShoppingListItem>,
    ingredients: I,
    mode: ReconcileMode,
    labeler: F,
) -> Consolidation
where
    I: IntoIterator<Item = &'a Ingredient>,
    F: Fn(&Ingredient) -> String,
{
    match mode {
        ReconcileMode::Rebuild => {
            if !existing.is_empty() {
                tracing::debug!("Rebuild replaces {} existing item(s)", existing.len());
            }
            let merged = merge_with(ingredients, labeler);
            let items = build(&merged);
            Consolidation {
                added: items.len(),
                items,
                warnings: merged.into_warnings(),
                ..Default::default()
            }
        }
        ReconcileMode::MergeIntoExisting => merge_into_existing(existing, ingredients),
    }
}

fn merge_into_existing<'a, I>(existing: Vec<ShoppingListItem>, ingredients: I) -> Consolidation
where
    I: IntoIterator<Item = &'a Ingredient>,
{
    let mut result = Consolidation {
        items: existing,
        ..Default::default()
    };

    for ingredient in ingredients {
        let key = normalize(&ingredient.name);
        if key.is_empty() {
            tracing::debug!("Skipping ingredient with empty name");
            continue;
        }

        let incoming = ingredient.quantity.parse();
        if incoming.is_none() {
            let warning = QuantityWarning::for_ingredient(ingredient);
            tracing::warn!("{}", warning.message);
            result.warnings.push(warning);
        }

        let position = result
            .items
            .iter()
            .position(|item| normalize(&item.name) == key);

        match position {
            Some(i) => {
                let item = &mut result.items[i];
                let summed = match (leading_amount(&item.quantity), incoming) {
                    (Some((current, unit)), Some(extra)) if unit.trim() == ingredient.unit => {
                        let total = add_amounts(current, extra);
                        if total.is_none() {
                            let warning = QuantityWarning::for_overflow(ingredient, current);
                            tracing::warn!("{}", warning.message);
                            result.warnings.push(warning);
                        }
                        total.map(|total| format_quantity(total, &ingredient.unit))
                    }
                    _ => None,
                };

                match summed {
                    Some(quantity) => {
                        item.quantity = quantity;
                        result.updated += 1;
                    }
                    None => {
                        tracing::debug!(
                            "Kept '{}' at '{}'; could not add '{} {}'",
                            item.name,
                            item.quantity,
                            ingredient.quantity,
                            ingredient.unit
                        );
                        result.unchanged += 1;
                    }
                }
            }
            None => {
                result.items.push(ShoppingListItem::new(
                    capitalize_first(&key),
                    format_quantity(incoming.unwrap_or(0.0), &ingredient.unit),
                ));
                result.added += 1;
            }
        }
    }

    result
}
