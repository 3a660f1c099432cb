//! Command handlers, one module per subcommand.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use formlab_core::document::TextDocument;

pub mod analyze;
pub mod card;
pub mod check;
pub mod compare;
pub mod completion;
pub mod cost;
pub mod docs;
pub mod init;
pub mod label;
pub mod normalize;
pub mod price;
pub mod process;
pub mod sales;
pub mod sample;
pub mod save;
pub mod saved;
pub mod show;
pub mod standard;
pub mod version;

/// Reads a text document, naming it after its file.
pub(crate) fn read_document(path: &Path) -> Result<TextDocument> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read document {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());
    Ok(TextDocument::new(name, text))
}

pub(crate) fn read_documents(paths: &[PathBuf]) -> Result<Vec<TextDocument>> {
    paths.iter().map(|p| read_document(p)).collect()
}
