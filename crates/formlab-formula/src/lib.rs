//! Formulation codec for the formlab system.
//!
//! Formulation tables arrive as CSV exports from spreadsheets (English or
//! Korean headers, often with a BOM) or as JSON/TOML documents. This crate
//! turns them into [`formlab_core::Formulation`] values and writes them back.

pub mod parser;
pub mod types;

pub use parser::{find_formula, load_formula, parse_csv_formula, parse_json, parse_toml, to_csv};
pub use types::{ParseError, ParseOptions};
