//! [`FileStore`] -- one JSON file per saved formulation.
//!
//! Files are named `<sanitized-name>_<YYYYmmdd_HHMMSS>.json`. A second save
//! of the same name within one second gets a numeric suffix instead of
//! overwriting.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{Result, StorageError};
use crate::traits::{FormulaStore, SavedFormulation, StoredRecord};

const EXTENSION: &str = "json";

/// Directory-backed implementation of [`FormulaStore`].
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// A store rooted at `dir`. The directory is created on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file_stem(record: &SavedFormulation) -> String {
        format!(
            "{}_{}",
            sanitize_name(&record.name),
            record.timestamp.format("%Y%m%d_%H%M%S")
        )
    }

    fn unused_path(&self, stem: &str) -> PathBuf {
        let mut path = self.dir.join(format!("{stem}.{EXTENSION}"));
        let mut n = 2;
        while path.exists() {
            path = self.dir.join(format!("{stem}_{n}.{EXTENSION}"));
            n += 1;
        }
        path
    }

    fn read_record(path: &Path) -> Result<SavedFormulation> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

impl FormulaStore for FileStore {
    fn save(&self, record: &SavedFormulation) -> Result<PathBuf> {
        if record.name.trim().is_empty() {
            return Err(StorageError::invalid("formulation name is empty"));
        }
        if record.ingredients.is_empty() {
            return Err(StorageError::invalid(format!(
                "formulation '{}' has no ingredients",
                record.name
            )));
        }

        std::fs::create_dir_all(&self.dir)?;
        let path = self.unused_path(&Self::file_stem(record));
        let json = serde_json::to_string_pretty(record)?;
        std::fs::write(&path, json)?;

        info!(name = %record.name, path = %path.display(), "saved formulation");
        Ok(path)
    }

    fn list(&self) -> Result<Vec<StoredRecord>> {
        if !self.dir.is_dir() {
            debug!(dir = %self.dir.display(), "no saved formulations yet");
            return Ok(Vec::new());
        }

        let mut records = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            match Self::read_record(&path) {
                Ok(record) => records.push(StoredRecord { path, record }),
                Err(e) => warn!(path = %path.display(), error = %e, "skipping unreadable record"),
            }
        }

        records.sort_by(|a, b| {
            b.record
                .timestamp
                .cmp(&a.record.timestamp)
                .then_with(|| b.path.cmp(&a.path))
        });
        Ok(records)
    }

    fn load_latest(&self, name: &str) -> Result<StoredRecord> {
        let name = name.trim();
        self.list()?
            .into_iter()
            .find(|r| r.record.name == name)
            .ok_or_else(|| StorageError::not_found("formulation", name))
    }
}

/// Replaces characters that are unsafe in file names with `_`.
///
/// Letters in any script, digits, `-` and `_` are kept. An empty result
/// becomes `formulation`.
pub fn sanitize_name(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "formulation".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::SavedMetadata;
    use chrono::{TimeZone, Utc};
    use formlab_core::formulation::{Formulation, IngredientRow};
    use pretty_assertions::assert_eq;

    fn formulation() -> Formulation {
        Formulation::new(vec![
            IngredientRow::new("정제수", 88.0),
            IngredientRow::new("설탕", 12.0),
        ])
    }

    fn record(name: &str, secs: i64) -> SavedFormulation {
        let ts = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap() + chrono::Duration::seconds(secs);
        SavedFormulation::new(
            name,
            "kim",
            &formulation(),
            SavedMetadata {
                brix: Some(11.0),
                volume: Some("500ml".to_string()),
                ..Default::default()
            },
            ts,
        )
    }

    #[test]
    fn sanitize_keeps_letters_and_digits() {
        assert_eq!(sanitize_name("레몬 소다 v2"), "레몬_소다_v2");
        assert_eq!(sanitize_name("a/b\\c:d"), "a_b_c_d");
        assert_eq!(sanitize_name("   "), "formulation");
    }

    #[test]
    fn save_writes_timestamped_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("formulas"));

        let path = store.save(&record("레몬 소다", 0)).unwrap();
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "레몬_소다_20240501_093000.json"
        );

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["name"], "레몬 소다");
        assert_eq!(json["author"], "kim");
        assert_eq!(json["metadata"]["brix"], 11.0);
        assert_eq!(json["metadata"]["volume"], "500ml");
        assert_eq!(json["ingredients"][0]["ratioPercent"], 88.0);
    }

    #[test]
    fn same_second_saves_do_not_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        let a = store.save(&record("cola", 0)).unwrap();
        let b = store.save(&record("cola", 0)).unwrap();
        assert_ne!(a, b);
        assert!(b.to_str().unwrap().ends_with("_2.json"));
        assert_eq!(store.list().unwrap().len(), 2);
    }

    #[test]
    fn list_is_newest_first_and_skips_junk() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        store.save(&record("first", 0)).unwrap();
        store.save(&record("second", 60)).unwrap();
        store.save(&record("third", 30)).unwrap();
        std::fs::write(dir.path().join("broken.json"), "{not json").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let names: Vec<String> = store
            .list()
            .unwrap()
            .into_iter()
            .map(|r| r.record.name)
            .collect();
        assert_eq!(names, vec!["second", "third", "first"]);
    }

    #[test]
    fn load_latest_by_name() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        store.save(&record("cola", 0)).unwrap();
        let mut newer = record("cola", 120);
        newer.ingredients[1].ratio_percent = 11.5;
        store.save(&newer).unwrap();

        let latest = store.load_latest("cola").unwrap();
        assert_eq!(latest.record, newer);
        assert_eq!(latest.record.to_formulation().metadata.brix, Some(11.0));

        let err = store.load_latest("sprite").unwrap_err();
        assert!(matches!(err, StorageError::NotFound { .. }));
    }

    #[test]
    fn missing_dir_lists_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("absent"));
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn empty_records_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        let mut r = record("x", 0);
        r.ingredients.clear();
        assert!(matches!(store.save(&r), Err(StorageError::Invalid(_))));
    }
}
