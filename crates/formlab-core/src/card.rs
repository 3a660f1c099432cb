//! Product cards and the formulations drafted from them.

use serde::{Deserialize, Serialize};

use crate::formulation::{Formulation, IngredientRow, Metadata};

/// A market product that can seed a new formulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductCard {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub emoji: String,
    pub category: String,
    pub description: String,
}

impl ProductCard {
    /// Matches on id (case-insensitive) or exact display name.
    pub fn matches(&self, key: &str) -> bool {
        let key = key.trim();
        self.id.eq_ignore_ascii_case(key) || self.name == key
    }
}

/// One ingredient line of a drafted formulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardIngredient {
    pub name: String,
    /// Free-form amount such as `430ml` or `4.0v/v`.
    #[serde(default)]
    pub amount: String,
    pub pct: f64,
    #[serde(default)]
    pub function: String,
    #[serde(default)]
    pub grade: String,
}

/// A drafted formulation for a product card, in the JSON shape the assistant
/// is asked to produce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardFormulation {
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub concept: String,
    #[serde(default)]
    pub total_volume: String,
    pub brix: f64,
    #[serde(rename = "pH")]
    pub ph: f64,
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub shelf_life: String,
    pub ingredients: Vec<CardIngredient>,
}

impl CardFormulation {
    /// Converts to a [`Formulation`]. Amounts are parsed leniently; values
    /// like `4.0v/v` keep their leading number.
    pub fn to_formulation(&self) -> Formulation {
        let ingredients = self
            .ingredients
            .iter()
            .map(|i| {
                let mut row = IngredientRow::new(&i.name, i.pct)
                    .function(&i.function)
                    .grade(&i.grade);
                row.amount_grams = leading_number(&i.amount);
                row
            })
            .collect();
        Formulation {
            name: self.product_name.clone(),
            ingredients,
            metadata: Metadata {
                brix: Some(self.brix),
                ph: Some(self.ph),
            },
        }
    }
}

fn leading_number(s: &str) -> Option<f64> {
    let s = s.trim();
    let end = s
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(s.len());
    s[..end].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_assistant_json() {
        let json = r#"{
            "productName": "Cola style",
            "brix": 10.5, "pH": 3.2, "calories": 45, "shelfLife": "12 months",
            "ingredients": [
                {"name": "water", "amount": "430ml", "pct": 86, "function": "solvent", "grade": "potable"},
                {"name": "co2", "amount": "4.0v/v", "pct": 0.8}
            ]
        }"#;
        let card: CardFormulation = serde_json::from_str(json).unwrap();
        let f = card.to_formulation();
        assert_eq!(f.name, "Cola style");
        assert_eq!(f.ingredients[0].amount_grams, Some(430.0));
        assert_eq!(f.ingredients[1].amount_grams, Some(4.0));
        assert_eq!(f.metadata.ph, Some(3.2));
    }

    #[test]
    fn missing_ingredients_is_rejected() {
        assert!(serde_json::from_str::<CardFormulation>(r#"{"brix": 1, "pH": 3}"#).is_err());
    }

    #[test]
    fn card_matching() {
        let card = ProductCard {
            id: "cola".into(),
            name: "코카콜라".into(),
            emoji: String::new(),
            category: "탄산음료".into(),
            description: String::new(),
        };
        assert!(card.matches("COLA"));
        assert!(card.matches("코카콜라"));
        assert!(!card.matches("sprite"));
    }
}
