//! Discovery and management of the `.formlab/` directory.
//!
//! The `.formlab/` directory holds a project's configuration, its price
//! overlay and saved formulations. It is found by walking up from the
//! current directory and created by `formlab init`.

use std::path::{Path, PathBuf};

use crate::config::{ConfigError, FormlabConfig};

/// The name of the formlab metadata directory.
pub const FORMLAB_DIR_NAME: &str = ".formlab";

/// Environment variable that overrides discovery.
pub const FORMLAB_DIR_ENV: &str = "FORMLAB_DIR";

/// Default subdirectory for saved formulations.
const FORMULAS_DIR_NAME: &str = "formulas";

/// Walk up the directory tree from `start` looking for a `.formlab/` directory.
///
/// The `FORMLAB_DIR` environment variable is checked first and wins when it
/// names an existing directory.
///
/// # Examples
///
/// ```no_run
/// use formlab_config::formlab_dir::find_formlab_dir;
/// use std::path::Path;
///
/// if let Some(dir) = find_formlab_dir(Path::new(".")) {
///     println!("Found formlab dir at {}", dir.display());
/// }
/// ```
pub fn find_formlab_dir(start: &Path) -> Option<PathBuf> {
    if let Ok(env_dir) = std::env::var(FORMLAB_DIR_ENV) {
        let env_path = PathBuf::from(&env_dir);
        if env_path.is_dir() {
            return Some(env_path);
        }
    }

    let start = start.canonicalize().ok()?;

    start
        .ancestors()
        .map(|dir| dir.join(FORMLAB_DIR_NAME))
        .find(|candidate| candidate.is_dir())
}

/// Like [`find_formlab_dir`], but a missing directory is an error.
///
/// # Errors
///
/// Returns [`ConfigError::FormlabDirNotFound`] if no `.formlab/` directory
/// is found.
pub fn find_formlab_dir_or_error(start: &Path) -> Result<PathBuf, ConfigError> {
    find_formlab_dir(start).ok_or(ConfigError::FormlabDirNotFound)
}

/// Ensure a `.formlab/` directory exists at `path`, creating it if needed.
///
/// A `path` that is not itself named `.formlab` gets the directory created
/// beneath it. Returns the path of the `.formlab/` directory.
pub fn ensure_formlab_dir(path: &Path) -> Result<PathBuf, ConfigError> {
    let formlab_dir = if path.ends_with(FORMLAB_DIR_NAME) {
        path.to_path_buf()
    } else {
        path.join(FORMLAB_DIR_NAME)
    };

    std::fs::create_dir_all(&formlab_dir)?;
    Ok(formlab_dir)
}

/// Directory where saved formulations live.
///
/// `storage.dir` from the config wins; relative values resolve against the
/// project root (the parent of `.formlab/`).
pub fn formulas_dir(formlab_dir: &Path, config: &FormlabConfig) -> PathBuf {
    match config.storage.dir.as_deref() {
        Some(dir) => {
            let dir = Path::new(dir);
            if dir.is_absolute() {
                dir.to_path_buf()
            } else {
                formlab_dir.parent().unwrap_or(formlab_dir).join(dir)
            }
        }
        None => formlab_dir.join(FORMULAS_DIR_NAME),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_formlab_dir_in_child() {
        let dir = tempfile::tempdir().unwrap();
        let formlab = dir.path().join(".formlab");
        std::fs::create_dir(&formlab).unwrap();

        let child = dir.path().join("trials").join("2024");
        std::fs::create_dir_all(&child).unwrap();

        let found = find_formlab_dir(&child).unwrap().canonicalize().unwrap();
        assert_eq!(found, formlab.canonicalize().unwrap());
        assert!(find_formlab_dir_or_error(&child).is_ok());
    }

    #[test]
    fn test_find_formlab_dir_missing_start() {
        assert!(find_formlab_dir(Path::new("/nonexistent/formlab/start")).is_none()
            || std::env::var(FORMLAB_DIR_ENV).is_ok());
    }

    #[test]
    fn test_ensure_formlab_dir() {
        let dir = tempfile::tempdir().unwrap();
        let created = ensure_formlab_dir(dir.path()).unwrap();
        assert!(created.is_dir());
        assert!(created.ends_with(".formlab"));

        // Already named and idempotent.
        let again = ensure_formlab_dir(&created).unwrap();
        assert_eq!(again, created);
    }

    #[test]
    fn test_formulas_dir() {
        let root = PathBuf::from("/work/cola");
        let formlab = root.join(".formlab");
        let mut cfg = FormlabConfig::default();
        assert_eq!(formulas_dir(&formlab, &cfg), formlab.join("formulas"));

        cfg.storage.dir = Some("saved".to_string());
        assert_eq!(formulas_dir(&formlab, &cfg), root.join("saved"));

        cfg.storage.dir = Some("/srv/formulas".to_string());
        assert_eq!(formulas_dir(&formlab, &cfg), PathBuf::from("/srv/formulas"));
    }
}
