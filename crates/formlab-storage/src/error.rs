//! Errors raised by formulation stores.

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// No saved record carries this name.
    #[error("no saved {kind} named '{name}'")]
    NotFound { kind: &'static str, name: String },

    /// The record was rejected before anything was written.
    #[error("cannot save: {0}")]
    Invalid(String),

    #[error("record file: {0}")]
    Io(#[from] std::io::Error),

    #[error("record JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StorageError>;

impl StorageError {
    pub fn not_found(kind: &'static str, name: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            name: name.into(),
        }
    }

    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::Invalid(reason.into())
    }
}
