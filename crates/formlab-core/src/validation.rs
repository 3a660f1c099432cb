//! Formulation validation rules.
//!
//! Issues block a formulation from passing; warnings are advisory. Neither
//! stops processing -- the report is data for the caller to render.

use serde::{Serialize, Serializer};

use crate::formulation::{BALANCED_MAX, BALANCED_MIN, Formulation, Metadata};

/// Inner band; sums outside it but inside [99, 101] get a warning.
pub const SOFT_MIN: f64 = 99.5;
pub const SOFT_MAX: f64 = 100.5;

/// Slack applied to the hard [99, 101] band.
const SUM_TOLERANCE: f64 = 1e-9;
/// A sum within this distance of 100 counts as exact.
const EXACT_TOLERANCE: f64 = 0.001;
/// A single ingredient above this share is probably a data-entry error.
const DOMINANT_RATIO: f64 = 95.0;
const BRIX_TOLERANCE: f64 = 0.5;
const PH_TOLERANCE: f64 = 0.2;

/// A business-rule violation that blocks `passed`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationIssue {
    #[error("formulation has no ingredients")]
    Empty,

    #[error("ratio of '{name}' is negative ({ratio:.3}%)")]
    NegativeRatio { name: String, ratio: f64 },

    #[error("'{name}' has a 0% ratio but an amount of {amount}g")]
    ZeroRatioWithAmount { name: String, amount: f64 },

    #[error("ratio sum {0:.3}% is outside 99-101%")]
    SumOutOfRange(f64),
}

/// An advisory finding that does not block `passed`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationWarning {
    #[error("ratio sum {0:.3}% is within 99-101% but outside 99.5-100.5%")]
    SumNearLimit(f64),

    #[error("ratio sum {0:.3}% is not exactly 100%")]
    SumNotExact(f64),

    #[error("'{name}' makes up {ratio:.3}% of the formulation; check for a data-entry error")]
    DominantIngredient { name: String, ratio: f64 },

    #[error("target {attribute} {target} given but no measured {attribute} to cross-check")]
    MissingMeasurement { attribute: &'static str, target: f64 },

    #[error("measured {attribute} {measured} deviates from target {target}")]
    TargetDeviation {
        attribute: &'static str,
        target: f64,
        measured: f64,
    },
}

fn serialize_as_strings<S, T>(items: &[T], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: std::fmt::Display,
{
    serializer.collect_seq(items.iter().map(|i| i.to_string()))
}

/// Outcome of [`validate_formula`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    pub passed: bool,
    pub total_ratio: f64,
    #[serde(serialize_with = "serialize_as_strings")]
    pub issues: Vec<ValidationIssue>,
    #[serde(serialize_with = "serialize_as_strings")]
    pub warnings: Vec<ValidationWarning>,
}

/// Checks a formulation against the basis-sum rules and optional targets.
///
/// Deterministic: the same input always yields the same report.
pub fn validate_formula(formulation: &Formulation, targets: &Metadata) -> ValidationReport {
    let mut issues = Vec::new();
    let mut warnings = Vec::new();
    let total = formulation.total_ratio();

    if formulation.is_empty() {
        issues.push(ValidationIssue::Empty);
    } else {
        for row in &formulation.ingredients {
            if row.ratio_percent < 0.0 {
                issues.push(ValidationIssue::NegativeRatio {
                    name: row.name.clone(),
                    ratio: row.ratio_percent,
                });
            }
            if row.ratio_percent == 0.0 {
                if let Some(amount) = row.amount_grams.filter(|a| *a != 0.0) {
                    issues.push(ValidationIssue::ZeroRatioWithAmount {
                        name: row.name.clone(),
                        amount,
                    });
                }
            }
            if row.ratio_percent > DOMINANT_RATIO {
                warnings.push(ValidationWarning::DominantIngredient {
                    name: row.name.clone(),
                    ratio: row.ratio_percent,
                });
            }
        }

        if total < BALANCED_MIN - SUM_TOLERANCE || total > BALANCED_MAX + SUM_TOLERANCE {
            issues.push(ValidationIssue::SumOutOfRange(total));
        } else if !(SOFT_MIN..=SOFT_MAX).contains(&total) {
            warnings.push(ValidationWarning::SumNearLimit(total));
        } else if (total - 100.0).abs() > EXACT_TOLERANCE {
            warnings.push(ValidationWarning::SumNotExact(total));
        }
    }

    cross_check(
        "brix",
        targets.brix,
        formulation.metadata.brix,
        BRIX_TOLERANCE,
        &mut warnings,
    );
    cross_check(
        "pH",
        targets.ph,
        formulation.metadata.ph,
        PH_TOLERANCE,
        &mut warnings,
    );

    ValidationReport {
        passed: issues.is_empty(),
        total_ratio: total,
        issues,
        warnings,
    }
}

fn cross_check(
    attribute: &'static str,
    target: Option<f64>,
    measured: Option<f64>,
    tolerance: f64,
    warnings: &mut Vec<ValidationWarning>,
) {
    let Some(target) = target else {
        return;
    };
    match measured {
        None => warnings.push(ValidationWarning::MissingMeasurement { attribute, target }),
        Some(measured) if (measured - target).abs() > tolerance => {
            warnings.push(ValidationWarning::TargetDeviation {
                attribute,
                target,
                measured,
            });
        }
        Some(_) => {}
    }
}
