//! Label drafting and completeness checks.
//!
//! A [`LabelSheet`] holds the drafted label text per field. [`check_label`]
//! walks a list of [`LabelRequirement`]s and reports which ones the sheet
//! covers. The result is advisory only.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::enums::{LabelStatus, UnknownVariant};

/// Values that count as "not filled in" even though they are non-blank.
pub const PLACEHOLDERS: &[&str] = &["-", "해당없음", "none", "n/a"];

/// Completion rate (percent of required items filled) needed to pass.
pub const COMPLIANCE_THRESHOLD: f64 = 90.0;

/// Drafted values are cut to this many characters in reports.
const VALUE_PREVIEW_CHARS: usize = 50;

// ---------------------------------------------------------------------------
// LabelField
// ---------------------------------------------------------------------------

/// A field of a drafted label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LabelField {
    ProductName,
    FoodType,
    Company,
    Address,
    ShelfLife,
    Volume,
    Ingredients,
    Nutrition,
    Allergens,
    Storage,
    Caution,
    Caffeine,
}

impl LabelField {
    pub const ALL: &'static [LabelField] = &[
        Self::ProductName,
        Self::FoodType,
        Self::Company,
        Self::Address,
        Self::ShelfLife,
        Self::Volume,
        Self::Ingredients,
        Self::Nutrition,
        Self::Allergens,
        Self::Storage,
        Self::Caution,
        Self::Caffeine,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ProductName => "product-name",
            Self::FoodType => "food-type",
            Self::Company => "company",
            Self::Address => "address",
            Self::ShelfLife => "shelf-life",
            Self::Volume => "volume",
            Self::Ingredients => "ingredients",
            Self::Nutrition => "nutrition",
            Self::Allergens => "allergens",
            Self::Storage => "storage",
            Self::Caution => "caution",
            Self::Caffeine => "caffeine",
        }
    }

    /// Korean heading used on printed labels.
    pub fn korean(&self) -> &'static str {
        match self {
            Self::ProductName => "제품명",
            Self::FoodType => "식품유형",
            Self::Company => "업소명",
            Self::Address => "소재지",
            Self::ShelfLife => "소비기한",
            Self::Volume => "내용량",
            Self::Ingredients => "원재료명",
            Self::Nutrition => "영양성분",
            Self::Allergens => "알레르기",
            Self::Storage => "보관방법",
            Self::Caution => "주의사항",
            Self::Caffeine => "카페인",
        }
    }
}

impl fmt::Display for LabelField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LabelField {
    type Err = UnknownVariant;

    /// Accepts the kebab-case key or the Korean heading.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        let lower = key.to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|f| f.as_str() == lower || f.korean() == key)
            .ok_or_else(|| UnknownVariant {
                kind: "label field",
                value: s.to_owned(),
                expected: Self::ALL
                    .iter()
                    .map(|f| f.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

impl Serialize for LabelField {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for LabelField {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// LabelSheet
// ---------------------------------------------------------------------------

/// Returns `true` when `value` carries real content.
pub fn is_filled(value: &str) -> bool {
    let v = value.trim();
    !v.is_empty() && !PLACEHOLDERS.iter().any(|p| v.eq_ignore_ascii_case(p))
}

/// A drafted label: field → text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelSheet {
    fields: BTreeMap<LabelField, String>,
}

impl LabelSheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, field: LabelField, value: impl Into<String>) -> Self {
        self.fields.insert(field, value.into());
        self
    }

    pub fn get(&self, field: LabelField) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }

    pub fn is_filled(&self, field: LabelField) -> bool {
        self.get(field).is_some_and(is_filled)
    }

    /// A sheet with no fields at all has not been drafted yet.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (LabelField, &str)> {
        self.fields.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// A template with every field present and blank.
    pub fn template() -> Self {
        Self {
            fields: LabelField::ALL
                .iter()
                .map(|f| (*f, String::new()))
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Requirements and the check
// ---------------------------------------------------------------------------

/// One item of a labeling standard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelRequirement {
    pub section: String,
    pub item: String,
    pub criterion: String,
    pub article: String,
    pub required: bool,
    /// Sheet field that satisfies the item, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<LabelField>,
}

impl LabelRequirement {
    /// Term searched for in the reference text: the item name without
    /// parentheses, up to the first `/`.
    pub fn evidence_keyword(&self) -> String {
        let stripped: String = self
            .item
            .chars()
            .filter(|c| *c != '(' && *c != ')')
            .collect();
        stripped.split('/').next().unwrap_or_default().trim().to_string()
    }
}

/// Result for one requirement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelCheckRow {
    pub section: String,
    pub item: String,
    pub criterion: String,
    pub article: String,
    pub required: bool,
    pub value: String,
    pub status: LabelStatus,
    /// Whether the reference text mentions the item; `None` without a reference.
    pub evidence: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelReport {
    pub rows: Vec<LabelCheckRow>,
    pub required_filled: usize,
    pub required_total: usize,
    /// Percent of required items filled; 0 when nothing is required.
    pub completion_rate: f64,
    pub compliant: bool,
}

impl LabelReport {
    pub fn missing(&self) -> impl Iterator<Item = &LabelCheckRow> {
        self.rows.iter().filter(|r| r.status == LabelStatus::Missing)
    }
}

fn preview(value: &str) -> String {
    value.trim().chars().take(VALUE_PREVIEW_CHARS).collect()
}

/// Checks `sheet` against `requirements`, optionally looking for each item in
/// the `reference` text.
pub fn check_label(
    requirements: &[LabelRequirement],
    sheet: &LabelSheet,
    reference: Option<&str>,
) -> LabelReport {
    let drafted = !sheet.is_empty();
    let reference = reference.filter(|r| !r.trim().is_empty());

    let rows: Vec<LabelCheckRow> = requirements
        .iter()
        .map(|req| {
            let value = req.field.and_then(|f| sheet.get(f)).unwrap_or_default();
            let filled = is_filled(value);
            let status = if !drafted {
                LabelStatus::NotDrafted
            } else if filled {
                LabelStatus::Filled
            } else if req.required {
                LabelStatus::Missing
            } else {
                LabelStatus::Optional
            };
            LabelCheckRow {
                section: req.section.clone(),
                item: req.item.clone(),
                criterion: req.criterion.clone(),
                article: req.article.clone(),
                required: req.required,
                value: preview(value),
                status,
                evidence: reference.map(|text| text.contains(&req.evidence_keyword())),
            }
        })
        .collect();

    let required_total = rows.iter().filter(|r| r.required).count();
    let required_filled = rows
        .iter()
        .filter(|r| r.required && r.status == LabelStatus::Filled)
        .count();
    let completion_rate = if required_total > 0 {
        required_filled as f64 / required_total as f64 * 100.0
    } else {
        0.0
    };

    LabelReport {
        rows,
        required_filled,
        required_total,
        completion_rate,
        compliant: drafted && completion_rate >= COMPLIANCE_THRESHOLD,
    }
}
