//! Shopping list consolidation
//!
//! Normalizes ingredient names, merges quantities, and builds shopping list items.

pub mod builder;
pub mod merger;
pub mod normalizer;
pub mod quantity;
pub mod reconcile;

pub use builder::{build, capitalize_first, format_quantity};
pub use merger::{
    default_label, merge, merge_with, MergedEntry, MergedIngredients, QuantityWarning,
    DEFAULT_CONTEXT_LABEL,
};
pub use normalizer::normalize;
pub use quantity::{add_amounts, format_amount, leading_amount, parse_quantity};
pub use reconcile::{
    consolidate, consolidate_with, reconcile, reconcile_with, Consolidation, ReconcileMode,
};
