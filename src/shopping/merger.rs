//! Ingredient merging
//!
//! Collapses ingredient references into one entry per normalized name and unit.
//! Quantities with the same name and unit are summed. A repeated name with a
//! different unit is kept apart under "<name> (<label>)".

use std::collections::HashMap;

use serde::Serialize;

use super::normalizer::normalize;
use super::quantity::{add_amounts, format_amount};
use crate::models::Ingredient;

/// Label used for a clashing entry when the caller has nothing better
pub const DEFAULT_CONTEXT_LABEL: &str = "additional";

/// Consolidated quantity for one merge key
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergedEntry {
    pub quantity: f64,
    pub unit: String,
}

/// An ingredient whose quantity could not be read and was counted as zero
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuantityWarning {
    pub ingredient: String,
    pub raw_quantity: String,
    pub message: String,
}

impl QuantityWarning {
    pub fn for_ingredient(ingredient: &Ingredient) -> Self {
        let raw_quantity = ingredient.quantity.to_string();
        Self {
            ingredient: ingredient.name.trim().to_string(),
            message: format!(
                "Could not read quantity '{}' for '{}'; counted as 0",
                raw_quantity,
                ingredient.name.trim()
            ),
            raw_quantity,
        }
    }

    /// Adding this ingredient would push the running total past what f64 holds
    pub fn for_overflow(ingredient: &Ingredient, kept: f64) -> Self {
        let raw_quantity = ingredient.quantity.to_string();
        Self {
            ingredient: ingredient.name.trim().to_string(),
            message: format!(
                "Adding '{}' of '{}' would overflow; total kept at {}",
                raw_quantity,
                ingredient.name.trim(),
                format_amount(kept)
            ),
            raw_quantity,
        }
    }
}

/// Merge result: entries keyed by merge key, in first-insertion order
#[derive(Debug, Clone, Default)]
pub struct MergedIngredients {
    entries: Vec<(String, MergedEntry)>,
    index: HashMap<String, usize>,
    warnings: Vec<QuantityWarning>,
}

impl MergedIngredients {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&MergedEntry> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    /// Entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &MergedEntry)> {
        self.entries.iter().map(|(key, entry)| (key.as_str(), entry))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    /// Quantities that were counted as zero
    pub fn warnings(&self) -> &[QuantityWarning] {
        &self.warnings
    }

    pub fn into_warnings(self) -> Vec<QuantityWarning> {
        self.warnings
    }

    /// Merge one ingredient, calling `labeler` only when its unit clashes
    pub fn add<F>(&mut self, ingredient: &Ingredient, labeler: F)
    where
        F: Fn(&Ingredient) -> String,
    {
        let key = normalize(&ingredient.name);
        if key.is_empty() {
            tracing::debug!("Skipping ingredient with empty name");
            return;
        }

        let quantity = self.parse_or_flag(ingredient);
        let unit = ingredient.unit.as_str();

        match self.index.get(&key) {
            None => self.insert(key, quantity, unit),
            Some(&i) if self.entries[i].1.unit == unit => {
                self.accumulate(i, ingredient, quantity);
            }
            Some(_) => {
                let label = labeler(ingredient);
                self.add_disambiguated(&key, &label, ingredient, quantity);
            }
        }
    }

    /// Place a clashing quantity under "<key> (<label>)".
    ///
    /// The suffixed key follows the same rule as a plain key: same unit sums,
    /// a different unit moves on to "<key> (<label> 2)" and so on, so an
    /// existing entry is never overwritten.
    fn add_disambiguated(&mut self, key: &str, label: &str, ingredient: &Ingredient, quantity: f64) {
        let unit = ingredient.unit.as_str();
        let mut candidate = format!("{} ({})", key, label);
        let mut counter = 2;

        loop {
            match self.index.get(&candidate) {
                None => {
                    self.insert(candidate, quantity, unit);
                    return;
                }
                Some(&i) if self.entries[i].1.unit == unit => {
                    self.accumulate(i, ingredient, quantity);
                    return;
                }
                Some(_) => {
                    candidate = format!("{} ({} {})", key, label, counter);
                    counter += 1;
                }
            }
        }
    }

    fn accumulate(&mut self, index: usize, ingredient: &Ingredient, quantity: f64) {
        let entry = &mut self.entries[index].1;
        match add_amounts(entry.quantity, quantity) {
            Some(total) => entry.quantity = total,
            None => {
                let warning = QuantityWarning::for_overflow(ingredient, entry.quantity);
                tracing::warn!("{}", warning.message);
                self.warnings.push(warning);
            }
        }
    }

    fn insert(&mut self, key: String, quantity: f64, unit: &str) {
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((
            key,
            MergedEntry {
                quantity,
                unit: unit.to_string(),
            },
        ));
    }

    fn parse_or_flag(&mut self, ingredient: &Ingredient) -> f64 {
        match ingredient.quantity.parse() {
            Some(value) => value,
            None => {
                let warning = QuantityWarning::for_ingredient(ingredient);
                tracing::warn!("{}", warning.message);
                self.warnings.push(warning);
                0.0
            }
        }
    }
}

/// Default context label: the ingredient's own source label, else "additional"
pub fn default_label(ingredient: &Ingredient) -> String {
    ingredient
        .source_label
        .as_deref()
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .unwrap_or(DEFAULT_CONTEXT_LABEL)
        .to_string()
}

/// Merge ingredients using the default context label
pub fn merge<'a, I>(ingredients: I) -> MergedIngredients
where
    I: IntoIterator<Item = &'a Ingredient>,
{
    merge_with(ingredients, default_label)
}

/// Merge ingredients with a caller-supplied context label for unit clashes
pub fn merge_with<'a, I, F>(ingredients: I, labeler: F) -> MergedIngredients
where
    I: IntoIterator<Item = &'a Ingredient>,
    F: Fn(&Ingredient) -> String,
{
    let mut merged = MergedIngredients::new();
    for ingredient in ingredients {
        merged.add(ingredient, &labeler);
    }
    merged
}
