//! Runtime context for command execution.
//!
//! The [`RuntimeContext`] holds all the state a command handler needs:
//! the `.formlab` directory (explicit or discovered), the author name, and
//! the global output flags. Configuration and reference tables are loaded on
//! demand so commands that need neither stay cheap.

use std::env;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result};
use tracing::debug;

use formlab_assistant::{Assistant, AssistantError, HttpAssistant};
use formlab_config::formlab_dir::{FORMLAB_DIR_NAME, formulas_dir};
use formlab_config::{FormlabConfig, find_formlab_dir, load_config, load_prices};
use formlab_core::cost::CostTable;
use formlab_core::enums::MatchMode;
use formlab_core::formulation::Formulation;
use formlab_formula::{ParseError, ParseOptions, find_formula, load_formula};
use formlab_storage::{FileStore, FormulaStore, StorageError};

use crate::cli::GlobalArgs;

/// Runtime context passed to every command handler.
///
/// Constructed once in `main` after CLI parsing, before command dispatch.
#[derive(Debug)]
pub struct RuntimeContext {
    /// Explicit `.formlab` directory from `--dir`.
    pub dir: Option<PathBuf>,

    /// Author from `--author` / `FORMLAB_AUTHOR`.
    pub author: Option<String>,

    /// Whether to produce JSON output.
    pub json: bool,

    /// Verbose output.
    pub verbose: bool,

    /// Quiet mode: suppress non-essential output.
    pub quiet: bool,
}

impl RuntimeContext {
    /// Build a `RuntimeContext` from parsed global arguments.
    ///
    /// `--dir` may name either a project root or its `.formlab` folder.
    pub fn from_global_args(global: &GlobalArgs) -> Self {
        let dir = global.dir.as_ref().map(|d| {
            if d.file_name().is_some_and(|n| n == FORMLAB_DIR_NAME) {
                d.clone()
            } else {
                d.join(FORMLAB_DIR_NAME)
            }
        });

        Self {
            dir,
            author: global.author.clone().filter(|a| !a.trim().is_empty()),
            json: global.json,
            verbose: global.verbose,
            quiet: global.quiet,
        }
    }

    /// Returns the `.formlab` directory, auto-discovering if needed.
    pub fn formlab_dir(&self) -> Option<PathBuf> {
        if let Some(ref d) = self.dir {
            return Some(d.clone());
        }
        let cwd = env::current_dir().ok()?;
        find_formlab_dir(&cwd)
    }

    /// Like [`formlab_dir`](Self::formlab_dir) but the directory must exist.
    pub fn require_formlab_dir(&self) -> Result<PathBuf> {
        match self.formlab_dir() {
            Some(d) if d.is_dir() => Ok(d),
            Some(d) => anyhow::bail!(
                "{} does not exist (run 'formlab init' first)",
                d.display()
            ),
            None => anyhow::bail!("no .formlab directory found (run 'formlab init' first)"),
        }
    }

    /// Loads configuration. Without a project, defaults plus environment
    /// overrides apply.
    pub fn config(&self) -> Result<FormlabConfig> {
        let dir = self
            .formlab_dir()
            .unwrap_or_else(|| PathBuf::from(FORMLAB_DIR_NAME));
        debug!(dir = %dir.display(), "loading config");
        load_config(&dir).with_context(|| format!("failed to load config from {}", dir.display()))
    }

    pub fn parse_options(config: &FormlabConfig) -> ParseOptions {
        ParseOptions {
            duplicates: config.csv.duplicates,
            unknown_columns: config.csv.unknown_columns,
        }
    }

    /// Resolves and parses a formulation given as a path or saved name.
    ///
    /// Lookup order: the path itself, the current directory with standard
    /// extensions, then the project's formulation directory.
    pub fn load_formulation(&self, name: &str, config: &FormlabConfig) -> Result<Formulation> {
        let cwd = env::current_dir().context("failed to determine current directory")?;
        let path = match find_formula(name, &cwd) {
            Ok(p) => p,
            Err(ParseError::NotFound(_)) => self.find_saved(name, config)?,
            Err(e) => return Err(e.into()),
        };
        debug!(path = %path.display(), "loading formulation");
        load_formula(&path, &Self::parse_options(config))
            .with_context(|| format!("failed to read formulation {}", path.display()))
    }

    fn find_saved(&self, name: &str, config: &FormlabConfig) -> Result<PathBuf> {
        if let Some(dir) = self.formlab_dir() {
            let formulas = formulas_dir(&dir, config);
            for candidate in [formulas.join(name), formulas.join(format!("{name}.json"))] {
                if candidate.is_file() {
                    return Ok(candidate);
                }
            }
            if let Some(path) = latest_saved_file(&formulas, name)? {
                return Ok(path);
            }
        }
        anyhow::bail!("formulation '{name}' not found")
    }

    /// Base price list with the project overlay and configured match mode.
    pub fn cost_table(&self, config: &FormlabConfig, mode: Option<MatchMode>) -> Result<CostTable> {
        let mut table = formlab_reference::cost_table()?
            .with_match_mode(mode.unwrap_or(config.cost.match_mode));
        if let Some(dir) = self.formlab_dir() {
            let overlay = load_prices(&dir)
                .with_context(|| format!("failed to load prices from {}", dir.display()))?;
            overlay.apply_to(&mut table);
        }
        Ok(table)
    }

    pub fn formula_store(&self, config: &FormlabConfig) -> Result<FileStore> {
        let dir = self.require_formlab_dir()?;
        Ok(FileStore::new(formulas_dir(&dir, config)))
    }

    /// Author for saved records.
    ///
    /// Priority: `--author` / `FORMLAB_AUTHOR` > config `author` >
    /// `git config user.name` > `$USER` > `"unknown"`.
    pub fn author(&self, config: &FormlabConfig) -> String {
        resolve_author(self.author.as_deref(), config.author.as_deref())
    }

    /// The assistant to use, or one that is always unavailable when offline.
    pub fn assistant(&self, config: &FormlabConfig, offline: bool) -> Box<dyn Assistant> {
        if offline {
            Box::new(OfflineAssistant)
        } else {
            Box::new(HttpAssistant::from_config(&config.assistant))
        }
    }
}

/// Stands in for the hosted model under `--offline`.
struct OfflineAssistant;

impl Assistant for OfflineAssistant {
    fn complete(&self, _prompt: &str) -> formlab_assistant::error::Result<String> {
        Err(AssistantError::Transport("offline mode".to_string()))
    }
}

/// File of the newest saved record named exactly `name` in `dir`.
fn latest_saved_file(dir: &Path, name: &str) -> Result<Option<PathBuf>> {
    match FileStore::new(dir).load_latest(name) {
        Ok(stored) => Ok(Some(stored.path)),
        Err(StorageError::NotFound { .. }) => Ok(None),
        Err(e) => Err(e).with_context(|| {
            format!("failed to read saved formulations in {}", dir.display())
        }),
    }
}

/// Resolves the author name using the priority chain.
fn resolve_author(flag_value: Option<&str>, configured: Option<&str>) -> String {
    for candidate in [flag_value, configured].into_iter().flatten() {
        if !candidate.trim().is_empty() {
            return candidate.trim().to_string();
        }
    }

    if let Ok(output) = Command::new("git").args(["config", "user.name"]).output() {
        if output.status.success() {
            let name = String::from_utf8_lossy(&output.stdout).trim().to_string();
            if !name.is_empty() {
                return name;
            }
        }
    }

    if let Ok(user) = env::var("USER").or_else(|_| env::var("USERNAME")) {
        if !user.is_empty() {
            return user;
        }
    }

    "unknown".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use formlab_core::formulation::FormulationBuilder;
    use formlab_storage::{SavedFormulation, SavedMetadata};
    use pretty_assertions::assert_eq;

    fn global(dir: Option<&str>) -> GlobalArgs {
        GlobalArgs {
            dir: dir.map(PathBuf::from),
            author: None,
            json: false,
            verbose: false,
            quiet: false,
        }
    }

    #[test]
    fn resolve_author_with_flag() {
        assert_eq!(resolve_author(Some("Kim"), Some("Lee")), "Kim");
        assert_eq!(resolve_author(Some("  "), Some("Lee")), "Lee");
    }

    #[test]
    fn resolve_author_none_falls_through() {
        assert!(!resolve_author(None, None).is_empty());
    }

    #[test]
    fn dir_flag_accepts_root_or_formlab_folder() {
        let ctx = RuntimeContext::from_global_args(&global(Some("/work/project")));
        assert_eq!(ctx.dir, Some(PathBuf::from("/work/project/.formlab")));

        let ctx = RuntimeContext::from_global_args(&global(Some("/work/project/.formlab")));
        assert_eq!(ctx.dir, Some(PathBuf::from("/work/project/.formlab")));
    }

    fn save_at(store: &FileStore, name: &str, stamp: &str) -> PathBuf {
        let formulation = FormulationBuilder::new()
            .ingredient("water", 90.0)
            .ingredient("sugar", 10.0)
            .build();
        let timestamp = NaiveDateTime::parse_from_str(stamp, "%Y-%m-%d %H:%M:%S")
            .unwrap()
            .and_utc();
        let record = SavedFormulation::new(
            name,
            "Tester",
            &formulation,
            SavedMetadata::default(),
            timestamp,
        );
        store.save(&record).unwrap()
    }

    #[test]
    fn latest_saved_file_picks_newest_stamp() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        save_at(&store, "lemon", "2024-01-01 12:00:00");
        let newest = save_at(&store, "lemon", "2024-03-01 09:00:00");
        save_at(&store, "lemonade", "2025-01-01 00:00:00");

        let found = latest_saved_file(dir.path(), "lemon").unwrap();
        assert_eq!(found, Some(newest));
        assert_eq!(latest_saved_file(dir.path(), "cola").unwrap(), None);
    }

    #[test]
    fn saved_names_sharing_a_prefix_stay_apart() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        let lemon = save_at(&store, "lemon", "2024-01-01 12:00:00");
        let lemon_tea = save_at(&store, "lemon_tea", "2025-01-01 00:00:00");

        assert_eq!(latest_saved_file(dir.path(), "lemon").unwrap(), Some(lemon));
        assert_eq!(latest_saved_file(dir.path(), "lemon_tea").unwrap(), Some(lemon_tea));
    }

    #[test]
    fn offline_assistant_is_unavailable() {
        assert!(OfflineAssistant.complete("hi").is_err());
    }
}
