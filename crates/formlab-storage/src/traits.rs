//! The saved-formulation record and the [`FormulaStore`] trait.
//!
//! Consumers depend on the trait rather than on [`FileStore`](crate::FileStore)
//! so that other backends can be substituted in tests.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use formlab_core::formulation::{Formulation, IngredientRow, Metadata};

use crate::error::Result;

// ---------------------------------------------------------------------------
// Record types
// ---------------------------------------------------------------------------

/// Product facts stored next to the ingredient list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brix: Option<f64>,
    #[serde(default, rename = "pH", skip_serializing_if = "Option::is_none")]
    pub ph: Option<f64>,
    /// Declared content, e.g. `500ml`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shelf_life: Option<String>,
}

/// A formulation as written to disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedFormulation {
    pub name: String,
    #[serde(default)]
    pub author: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub metadata: SavedMetadata,
    pub ingredients: Vec<IngredientRow>,
}

impl SavedFormulation {
    /// Captures `formulation` under `name`. Measured brix/pH on the
    /// formulation fill any value missing from `metadata`.
    pub fn new(
        name: impl Into<String>,
        author: impl Into<String>,
        formulation: &Formulation,
        metadata: SavedMetadata,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let metadata = SavedMetadata {
            brix: metadata.brix.or(formulation.metadata.brix),
            ph: metadata.ph.or(formulation.metadata.ph),
            ..metadata
        };
        Self {
            name: name.into().trim().to_string(),
            author: author.into(),
            timestamp,
            metadata,
            ingredients: formulation.ingredients.clone(),
        }
    }

    pub fn to_formulation(&self) -> Formulation {
        Formulation {
            name: self.name.clone(),
            ingredients: self.ingredients.clone(),
            metadata: Metadata {
                brix: self.metadata.brix,
                ph: self.metadata.ph,
            },
        }
    }
}

/// A record together with the file it was read from.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRecord {
    pub path: PathBuf,
    pub record: SavedFormulation,
}

// ---------------------------------------------------------------------------
// FormulaStore trait
// ---------------------------------------------------------------------------

/// Persistence interface for saved formulations.
pub trait FormulaStore {
    /// Writes a new record and returns where it was stored. Earlier records
    /// with the same name are kept.
    fn save(&self, record: &SavedFormulation) -> Result<PathBuf>;

    /// All readable records, newest first.
    fn list(&self) -> Result<Vec<StoredRecord>>;

    /// The newest record whose name equals `name`.
    fn load_latest(&self, name: &str) -> Result<StoredRecord>;
}
