//! Ingredient model
//!
//! An ingredient reference as it comes out of a recipe: a name, an amount that
//! may be a number or free text, and a unit.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::shopping::quantity::{format_amount, parse_quantity};

/// An ingredient amount as supplied by a recipe source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Quantity {
    Number(f64),
    Text(String),
}

impl Quantity {
    /// Numeric value, or None if the amount cannot be read as a finite number
    pub fn parse(&self) -> Option<f64> {
        match self {
            Quantity::Number(n) => n.is_finite().then_some(*n),
            Quantity::Text(text) => parse_quantity(text),
        }
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Quantity::Text(String::new())
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantity::Number(n) if n.is_finite() => f.write_str(&format_amount(*n)),
            Quantity::Number(n) => write!(f, "{}", n),
            Quantity::Text(text) => f.write_str(text),
        }
    }
}

impl From<f64> for Quantity {
    fn from(value: f64) -> Self {
        Quantity::Number(value)
    }
}

impl From<&str> for Quantity {
    fn from(value: &str) -> Self {
        Quantity::Text(value.to_string())
    }
}

impl From<String> for Quantity {
    fn from(value: String) -> Self {
        Quantity::Text(value)
    }
}

/// An ingredient reference from a recipe
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, alias = "amount", deserialize_with = "null_as_default")]
    pub quantity: Quantity,
    #[serde(default, deserialize_with = "null_as_default")]
    pub unit: String,
    /// Where this quantity came from, used to label entries whose units clash
    #[serde(default, alias = "source", skip_serializing_if = "Option::is_none")]
    pub source_label: Option<String>,
}

impl Ingredient {
    pub fn new(name: impl Into<String>, quantity: impl Into<Quantity>, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity: quantity.into(),
            unit: unit.into(),
            source_label: None,
        }
    }

    pub fn with_source_label(mut self, label: impl Into<String>) -> Self {
        self.source_label = Some(label.into());
        self
    }
}

/// Treat an explicit JSON null like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantity_parse() {
        assert_eq!(Quantity::Number(2.5).parse(), Some(2.5));
        assert_eq!(Quantity::Number(f64::NAN).parse(), None);
        assert_eq!(Quantity::from("1/2").parse(), Some(0.5));
        assert_eq!(Quantity::from("abc").parse(), None);
        assert_eq!(Quantity::default().parse(), None);
    }

    #[test]
    fn test_deserialize_numeric_and_text_quantities() {
        let json = r#"[
            {"name": "flour", "quantity": "1", "unit": "cup"},
            {"name": "sugar", "amount": 2, "unit": "tbsp"},
            {"name": "salt", "quantity": null, "unit": null, "source": "Soup"}
        ]"#;
        let ingredients: Vec<Ingredient> = serde_json::from_str(json).unwrap();

        assert_eq!(ingredients[0].quantity, Quantity::Text("1".to_string()));
        assert_eq!(ingredients[1].quantity, Quantity::Number(2.0));
        assert_eq!(ingredients[2].quantity, Quantity::default());
        assert_eq!(ingredients[2].unit, "");
        assert_eq!(ingredients[2].source_label.as_deref(), Some("Soup"));
    }

    #[test]
    fn test_quantity_display() {
        assert_eq!(Quantity::Number(3.0).to_string(), "3");
        assert_eq!(Quantity::from("a pinch").to_string(), "a pinch");
    }
}
