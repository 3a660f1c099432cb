//! Formulation struct -- the central domain model for the formlab system.
//!
//! A formulation is an ordered list of ingredient rows whose ratios are
//! expressed on a 100 % basis. Transforms never edit a formulation in place;
//! they return a new value.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Lower bound of the balanced ratio-sum band (inclusive).
pub const BALANCED_MIN: f64 = 99.0;
/// Upper bound of the balanced ratio-sum band (inclusive).
pub const BALANCED_MAX: f64 = 101.0;

/// Errors from formulation transforms.
#[derive(Debug, thiserror::Error)]
pub enum FormulaError {
    #[error("cannot normalize: ratios sum to {0}")]
    NonPositiveSum(f64),

    #[error("basis volume must be positive (got {0})")]
    InvalidBasisVolume(f64),
}

/// Rounds a value to `places` decimal places.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Rounds a ratio to the 3-decimal display precision.
pub fn round3(value: f64) -> f64 {
    round_to(value, 3)
}

/// Measured or targeted quality attributes of a formulation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// Soluble solids in degrees Brix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brix: Option<f64>,

    #[serde(default, rename = "pH", skip_serializing_if = "Option::is_none")]
    pub ph: Option<f64>,
}

impl Metadata {
    pub fn is_empty(&self) -> bool {
        self.brix.is_none() && self.ph.is_none()
    }
}

/// One ingredient line of a formulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientRow {
    pub name: String,

    /// Share of the formulation in percent. Full precision is kept.
    pub ratio_percent: f64,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub function: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub grade: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_grams: Option<f64>,

    /// Columns the parser did not recognize, keyed by header.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extras: BTreeMap<String, String>,
}

impl IngredientRow {
    pub fn new(name: impl Into<String>, ratio_percent: f64) -> Self {
        Self {
            name: name.into().trim().to_string(),
            ratio_percent,
            function: String::new(),
            grade: String::new(),
            amount_grams: None,
            extras: BTreeMap::new(),
        }
    }

    pub fn function(mut self, function: impl Into<String>) -> Self {
        self.function = function.into();
        self
    }

    pub fn grade(mut self, grade: impl Into<String>) -> Self {
        self.grade = grade.into();
        self
    }

    pub fn amount_grams(mut self, amount: f64) -> Self {
        self.amount_grams = Some(amount);
        self
    }

    /// Ratio rounded for display.
    pub fn display_ratio(&self) -> f64 {
        round3(self.ratio_percent)
    }
}

/// An ordered set of ingredients on a 100 % basis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Formulation {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(default)]
    pub ingredients: Vec<IngredientRow>,

    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    pub metadata: Metadata,
}

impl Formulation {
    pub fn new(ingredients: Vec<IngredientRow>) -> Self {
        Self {
            name: String::new(),
            ingredients,
            metadata: Metadata::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.ingredients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ingredients.is_empty()
    }

    /// Sum of all ratios.
    pub fn total_ratio(&self) -> f64 {
        self.ingredients.iter().map(|r| r.ratio_percent).sum()
    }

    /// Returns `true` when the ratio sum lies within [99, 101].
    pub fn is_balanced(&self) -> bool {
        let total = self.total_ratio();
        (BALANCED_MIN..=BALANCED_MAX).contains(&total)
    }

    /// Looks up a row by exact name.
    pub fn get(&self, name: &str) -> Option<&IngredientRow> {
        self.ingredients.iter().find(|r| r.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.ingredients.iter().map(|r| r.name.as_str())
    }

    /// Passthrough column headers in first-seen order.
    pub fn extra_columns(&self) -> Vec<String> {
        let mut columns: Vec<String> = Vec::new();
        for row in &self.ingredients {
            for key in row.extras.keys() {
                if !columns.iter().any(|c| c == key) {
                    columns.push(key.clone());
                }
            }
        }
        columns
    }

    /// Returns a copy with ratios rescaled to sum to 100, rounded to 3 decimals.
    pub fn normalize(&self) -> Result<Formulation, FormulaError> {
        let total = self.total_ratio();
        if total <= 0.0 || !total.is_finite() {
            return Err(FormulaError::NonPositiveSum(total));
        }
        let mut out = self.clone();
        for row in &mut out.ingredients {
            row.ratio_percent = round3(row.ratio_percent / total * 100.0);
        }
        Ok(out)
    }

    /// Returns a copy with every ratio multiplied by `factor`.
    pub fn scaled(&self, factor: f64) -> Formulation {
        let mut out = self.clone();
        for row in &mut out.ingredients {
            row.ratio_percent *= factor;
        }
        out
    }

    /// Returns a copy where missing `amountGrams` are derived from the basis
    /// volume, assuming a density of 1 g/mL. Existing amounts are kept.
    pub fn with_amounts(&self, basis_volume_ml: f64) -> Result<Formulation, FormulaError> {
        if basis_volume_ml <= 0.0 || !basis_volume_ml.is_finite() {
            return Err(FormulaError::InvalidBasisVolume(basis_volume_ml));
        }
        let mut out = self.clone();
        for row in &mut out.ingredients {
            if row.amount_grams.is_none() {
                row.amount_grams = Some(round_to(row.ratio_percent * basis_volume_ml / 100.0, 2));
            }
        }
        Ok(out)
    }
}

/// Builder for [`Formulation`], mainly for reference data and tests.
#[derive(Debug, Default)]
pub struct FormulationBuilder {
    formulation: Formulation,
}

impl FormulationBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.formulation.name = name.into();
        self
    }

    /// Appends an ingredient with only a name and ratio.
    pub fn ingredient(mut self, name: impl Into<String>, ratio_percent: f64) -> Self {
        self.formulation
            .ingredients
            .push(IngredientRow::new(name, ratio_percent));
        self
    }

    pub fn row(mut self, row: IngredientRow) -> Self {
        self.formulation.ingredients.push(row);
        self
    }

    pub fn brix(mut self, brix: f64) -> Self {
        self.formulation.metadata.brix = Some(brix);
        self
    }

    pub fn ph(mut self, ph: f64) -> Self {
        self.formulation.metadata.ph = Some(ph);
        self
    }

    pub fn build(self) -> Formulation {
        self.formulation
    }
}
