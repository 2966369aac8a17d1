//! Ingredient name normalization

/// Canonical merge key for an ingredient name: trimmed and lower-cased.
///
/// Only used for comparison, never for display.
pub fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}
