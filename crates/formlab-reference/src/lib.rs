//! Bundled reference data for the formlab system.
//!
//! Everything here is compiled into the binary from the YAML and CSV files
//! under `src/data/` and parsed on request.

use std::collections::HashMap;

use serde::Deserialize;

use formlab_core::card::{CardFormulation, ProductCard};
use formlab_core::cost::{CostEntry, CostTable};
use formlab_core::formulation::{Formulation, IngredientRow, Metadata};
use formlab_core::label::LabelRequirement;
use formlab_core::process::ProcessStep;
use formlab_core::sales::SalesTable;

static COSTS_YAML: &str = include_str!("data/costs.yaml");
static STANDARDS_YAML: &str = include_str!("data/standards.yaml");
static PROCESS_YAML: &str = include_str!("data/process.yaml");
static LABEL_YAML: &str = include_str!("data/label.yaml");
static SALES_YAML: &str = include_str!("data/sales.yaml");
static CARDS_YAML: &str = include_str!("data/cards.yaml");

/// Default volume printed on drafted product formulations.
pub const DEFAULT_TOTAL_VOLUME: &str = "500ml";

#[derive(Debug, thiserror::Error)]
pub enum ReferenceError {
    #[error("bundled {file} is invalid: {source}")]
    Data {
        file: &'static str,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("unknown {kind} '{name}'")]
    NotFound { kind: &'static str, name: String },
}

pub type Result<T> = std::result::Result<T, ReferenceError>;

fn load<T: for<'de> Deserialize<'de>>(file: &'static str, content: &str) -> Result<T> {
    serde_yaml::from_str(content).map_err(|source| ReferenceError::Data { file, source })
}

// ---------------------------------------------------------------------------
// Costs
// ---------------------------------------------------------------------------

/// The 36-entry base ingredient price list.
pub fn cost_entries() -> Result<Vec<CostEntry>> {
    load("costs.yaml", COSTS_YAML)
}

/// Base price list as a [`CostTable`] with an empty overlay.
pub fn cost_table() -> Result<CostTable> {
    Ok(CostTable::new(cost_entries()?))
}

// ---------------------------------------------------------------------------
// Standard formulations
// ---------------------------------------------------------------------------

/// A reference formulation to compare against.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Standard {
    pub id: String,
    pub name: String,
    pub brix: f64,
    #[serde(rename = "pH")]
    pub ph: f64,
    pub ingredients: Vec<IngredientRow>,
}

impl Standard {
    pub fn matches(&self, key: &str) -> bool {
        let key = key.trim();
        self.id.eq_ignore_ascii_case(key) || self.name == key
    }

    pub fn to_formulation(&self) -> Formulation {
        Formulation {
            name: self.name.clone(),
            ingredients: self.ingredients.clone(),
            metadata: Metadata {
                brix: Some(self.brix),
                ph: Some(self.ph),
            },
        }
    }
}

pub fn standards() -> Result<Vec<Standard>> {
    load("standards.yaml", STANDARDS_YAML)
}

/// Looks up a standard by id or name.
pub fn standard(key: &str) -> Result<Standard> {
    standards()?
        .into_iter()
        .find(|s| s.matches(key))
        .ok_or_else(|| ReferenceError::NotFound {
            kind: "standard",
            name: key.to_string(),
        })
}

// ---------------------------------------------------------------------------
// Sample CSVs
// ---------------------------------------------------------------------------

/// A practice formulation shipped as CSV text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    pub id: &'static str,
    pub name: &'static str,
    pub csv: &'static str,
}

pub const SAMPLES: &[Sample] = &[
    Sample {
        id: "lemon-soda",
        name: "레몬 탄산음료",
        csv: include_str!("data/samples/lemon-soda.csv"),
    },
    Sample {
        id: "vitamin-drink",
        name: "비타민 음료 (합계 오류)",
        csv: include_str!("data/samples/vitamin-drink.csv"),
    },
    Sample {
        id: "low-sugar-tea",
        name: "저당 아이스티",
        csv: include_str!("data/samples/low-sugar-tea.csv"),
    },
];

pub fn sample(key: &str) -> Result<&'static Sample> {
    let key = key.trim();
    SAMPLES
        .iter()
        .find(|s| s.id.eq_ignore_ascii_case(key) || s.name == key)
        .ok_or_else(|| ReferenceError::NotFound {
            kind: "sample",
            name: key.to_string(),
        })
}

// ---------------------------------------------------------------------------
// Process, label, sales
// ---------------------------------------------------------------------------

/// The 8-step beverage process.
pub fn process_steps() -> Result<Vec<ProcessStep>> {
    load("process.yaml", PROCESS_YAML)
}

/// Labeling standard items: 10 mandatory plus 4 beverage-specific.
pub fn label_requirements() -> Result<Vec<LabelRequirement>> {
    load("label.yaml", LABEL_YAML)
}

/// Beverage sales by category, 2020 to 2024.
pub fn sales() -> Result<SalesTable> {
    load("sales.yaml", SALES_YAML)
}

// ---------------------------------------------------------------------------
// Product cards
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct CardsFile {
    cards: Vec<ProductCard>,
    fallback: String,
    defaults: HashMap<String, CardFormulation>,
}

fn cards_file() -> Result<CardsFile> {
    load("cards.yaml", CARDS_YAML)
}

pub fn product_cards() -> Result<Vec<ProductCard>> {
    Ok(cards_file()?.cards)
}

pub fn product_card(key: &str) -> Result<ProductCard> {
    product_cards()?
        .into_iter()
        .find(|c| c.matches(key))
        .ok_or_else(|| ReferenceError::NotFound {
            kind: "product card",
            name: key.to_string(),
        })
}

/// The formulation offered for `card` when no assistant answer is available.
///
/// Cards without their own default use the cola formulation.
pub fn default_card_formulation(card: &ProductCard) -> Result<CardFormulation> {
    let mut file = cards_file()?;
    let fallback = file.fallback.clone();
    let mut formulation = match file.defaults.remove(&card.id) {
        Some(f) => f,
        None => file
            .defaults
            .remove(&fallback)
            .ok_or(ReferenceError::NotFound {
                kind: "default formulation",
                name: fallback,
            })?,
    };
    formulation.product_name = format!("{} 스타일", card.name);
    formulation.concept = card.description.clone();
    formulation.total_volume = DEFAULT_TOTAL_VOLUME.to_string();
    Ok(formulation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use formlab_core::enums::RiskLevel;
    use formlab_core::validation::{ValidationWarning, validate_formula};
    use formlab_formula::{ParseOptions, parse_csv_formula};
    use pretty_assertions::assert_eq;

    #[test]
    fn cost_list_has_36_unique_entries() {
        let entries = cost_entries().unwrap();
        assert_eq!(entries.len(), 36);
        let mut names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 36);
        assert!(entries.iter().all(|e| e.unit_price_per_kg > 0.0));
    }

    #[test]
    fn standards_are_balanced_and_valid() {
        let all = standards().unwrap();
        assert_eq!(all.len(), 5);
        for s in &all {
            let f = s.to_formulation();
            let report = validate_formula(&f, &Metadata::default());
            assert!(report.passed, "{}: {:?}", s.id, report.issues);
            // diluted standards may be dominated by water, nothing else
            assert!(
                report
                    .warnings
                    .iter()
                    .all(|w| matches!(w, ValidationWarning::DominantIngredient { .. })),
                "{}: {:?}",
                s.id,
                report.warnings
            );
        }
    }

    #[test]
    fn standard_lookup_by_id_or_name() {
        assert_eq!(standard("COLA").unwrap().id, "cola");
        assert_eq!(standard("녹차음료 표준배합").unwrap().id, "green-tea");
        assert!(matches!(
            standard("kvass"),
            Err(ReferenceError::NotFound { kind: "standard", .. })
        ));
    }

    #[test]
    fn samples_parse() {
        for s in SAMPLES {
            let f = parse_csv_formula(s.csv, &ParseOptions::default()).unwrap();
            assert!(!f.is_empty(), "{}", s.id);
        }
        let broken = parse_csv_formula(sample("vitamin-drink").unwrap().csv, &ParseOptions::default())
            .unwrap();
        assert!(!validate_formula(&broken, &Metadata::default()).passed);
    }

    #[test]
    fn process_has_two_ccps() {
        let steps = process_steps().unwrap();
        assert_eq!(steps.len(), 8);
        let ccps: Vec<&str> = steps
            .iter()
            .filter(|s| s.level == RiskLevel::High)
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(ccps, vec!["살균", "충전·밀봉"]);
    }

    #[test]
    fn label_requirements_shape() {
        let reqs = label_requirements().unwrap();
        assert_eq!(reqs.len(), 14);
        assert_eq!(reqs.iter().filter(|r| r.required).count(), 12);
    }

    #[test]
    fn sales_lead_category() {
        let table = sales().unwrap();
        assert_eq!(table.years.len(), 5);
        assert_eq!(table.sorted_categories()[0].category, "탄산음료");
        assert!(table.series.iter().all(|s| s.values.len() == 5));
    }

    #[test]
    fn cards_and_default_formulations() {
        let cards = product_cards().unwrap();
        assert_eq!(cards.len(), 9);

        let energy = product_card("energy").unwrap();
        let f = default_card_formulation(&energy).unwrap();
        assert_eq!(f.product_name, "레드불 스타일");
        assert_eq!(f.ingredients.len(), 7);

        // no dedicated default: cola is used
        let soy = product_card("베지밀").unwrap();
        let f = default_card_formulation(&soy).unwrap();
        assert_eq!(f.brix, 10.5);
        assert_eq!(f.concept, soy.description);
        assert_eq!(f.total_volume, "500ml");
    }
}
