//! Flat-file persistence of saved formulations.
//!
//! Provides the [`FormulaStore`] trait and a JSON-file implementation
//! ([`FileStore`]).

pub mod error;
pub mod file;
pub mod traits;

pub use error::StorageError;
pub use file::FileStore;
pub use traits::{FormulaStore, SavedFormulation, SavedMetadata, StoredRecord};
