//! Parser options and errors.

use formlab_core::enums::{DuplicatePolicy, HeaderStyle, UnknownColumns};

/// Knobs for [`crate::parser::parse_csv_formula`] and
/// [`crate::parser::load_formula`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    pub duplicates: DuplicatePolicy,
    pub unknown_columns: UnknownColumns,
}

impl ParseOptions {
    pub fn strict() -> Self {
        Self {
            duplicates: DuplicatePolicy::Reject,
            unknown_columns: UnknownColumns::Reject,
        }
    }
}

/// Logical column a CSV header maps to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Column {
    Name,
    Ratio,
    Function,
    Grade,
    Amount,
    Extra(String),
}

impl Column {
    /// Recognized header spellings, compared case-insensitively.
    const ALIASES: &'static [(&'static str, Column)] = &[
        ("name", Column::Name),
        ("ingredientname", Column::Name),
        ("ingredient", Column::Name),
        ("원료명", Column::Name),
        ("ratiopercent", Column::Ratio),
        ("ratio", Column::Ratio),
        ("ratio(%)", Column::Ratio),
        ("pct", Column::Ratio),
        ("비율(%)", Column::Ratio),
        ("비율", Column::Ratio),
        ("function", Column::Function),
        ("기능", Column::Function),
        ("grade", Column::Grade),
        ("등급", Column::Grade),
        ("amountgrams", Column::Amount),
        ("amount", Column::Amount),
        ("함량(g)", Column::Amount),
        ("함량", Column::Amount),
    ];

    pub fn from_header(header: &str) -> Column {
        let key = header.trim().to_lowercase();
        Self::ALIASES
            .iter()
            .find(|(alias, _)| *alias == key)
            .map(|(_, col)| col.clone())
            .unwrap_or_else(|| Column::Extra(header.trim().to_string()))
    }

    /// Header written for this column in the given style.
    pub fn header(&self, style: HeaderStyle) -> &str {
        match (self, style) {
            (Column::Name, HeaderStyle::English) => "name",
            (Column::Name, HeaderStyle::Korean) => "원료명",
            (Column::Ratio, HeaderStyle::English) => "ratioPercent",
            (Column::Ratio, HeaderStyle::Korean) => "비율(%)",
            (Column::Function, HeaderStyle::English) => "function",
            (Column::Function, HeaderStyle::Korean) => "기능",
            (Column::Grade, HeaderStyle::English) => "grade",
            (Column::Grade, HeaderStyle::Korean) => "등급",
            (Column::Amount, HeaderStyle::English) => "amountGrams",
            (Column::Amount, HeaderStyle::Korean) => "함량(g)",
            (Column::Extra(h), _) => h,
        }
    }
}

/// Errors that can occur while reading or writing formulations.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("input is empty")]
    Empty,

    #[error("missing required column: {0}")]
    MissingColumn(&'static str),

    #[error("line {line}: ratio for '{name}' is not a number: '{value}'")]
    InvalidRatio {
        line: u64,
        name: String,
        value: String,
    },

    #[error("no ingredient rows found")]
    NoRows,

    #[error("line {line}: duplicate ingredient '{name}'")]
    DuplicateIngredient { line: u64, name: String },

    #[error("unknown column: {0}")]
    UnknownColumn(String),

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("{format} parse error: {message}")]
    Format {
        format: &'static str,
        message: String,
    },

    #[error("formula '{0}' not found (searched cwd, .formlab/formulas/)")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ParseError>;
