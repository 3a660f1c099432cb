//! Core types and operations for the formlab system.
//!
//! Formulations, their validation, comparison and costing, plus the process,
//! label, sales and document helpers built on top of them.

pub mod card;
pub mod compare;
pub mod cost;
pub mod document;
pub mod enums;
pub mod formulation;
pub mod label;
pub mod process;
pub mod sales;
pub mod validation;

pub use compare::{ComparisonRow, ComparisonSummary, compare_formulations};
pub use cost::{CostEntry, CostLine, CostSheet, CostTable, PriceLookup, calc_cost_table};
pub use formulation::{FormulaError, Formulation, FormulationBuilder, IngredientRow, Metadata};
pub use validation::{ValidationIssue, ValidationReport, ValidationWarning, validate_formula};
