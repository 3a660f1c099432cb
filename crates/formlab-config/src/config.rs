//! Configuration types and loading for the formlab system.
//!
//! The main entry point is [`FormlabConfig`], which represents the contents of
//! `.formlab/config.yaml`. Configuration is loaded with [`load_config`] and
//! saved with [`save_config`]. Loading layers built-in defaults, the YAML
//! file and `FORMLAB_*` environment variables, in that order.

use std::path::Path;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use formlab_core::enums::{DuplicatePolicy, HeaderStyle, MatchMode, UnknownColumns};

/// File name of the configuration inside `.formlab/`.
pub const CONFIG_FILE: &str = "config.yaml";

/// Prefix of environment variables that override configuration keys.
/// Nested keys use `__`, e.g. `FORMLAB_CSV__DUPLICATES=reject`.
pub const ENV_PREFIX: &str = "FORMLAB_";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A configuration file could not be read or written.
    #[error("failed to access config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// A configuration file contained invalid YAML.
    #[error("failed to parse config file: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// The layered configuration did not fit the schema.
    #[error("invalid configuration: {0}")]
    Invalid(#[from] figment::Error),

    /// The `.formlab/` directory was not found.
    #[error("no .formlab directory found (run 'formlab init' first)")]
    FormlabDirNotFound,

    /// A configuration value was invalid.
    #[error("invalid configuration value for key '{key}': {reason}")]
    InvalidValue { key: String, reason: String },
}

/// A specialized `Result` type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// How formulation CSV files are read and written.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct CsvConfig {
    #[serde(default)]
    pub duplicates: DuplicatePolicy,

    #[serde(default, rename = "unknown-columns")]
    pub unknown_columns: UnknownColumns,

    /// Header set used when writing CSV.
    #[serde(default)]
    pub headers: HeaderStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct CostConfig {
    #[serde(default, rename = "match-mode")]
    pub match_mode: MatchMode,
}

/// Hosted language model settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistantConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_max_tokens", rename = "max-tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_timeout_secs", rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Name of the environment variable holding the API key.
    #[serde(default = "default_api_key_env", rename = "api-key-env")]
    pub api_key_env: String,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
            api_key_env: default_api_key_env(),
        }
    }
}

fn default_endpoint() -> String {
    "https://api.anthropic.com/v1/messages".to_string()
}

fn default_model() -> String {
    "claude-sonnet-4-20250514".to_string()
}

fn default_max_tokens() -> u32 {
    2000
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_api_key_env() -> String {
    "ANTHROPIC_API_KEY".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    /// Directory for saved formulations. Relative paths resolve against the
    /// project root; unset means `.formlab/formulas`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
}

// ---------------------------------------------------------------------------
// Main config struct
// ---------------------------------------------------------------------------

/// Top-level formlab configuration (`.formlab/config.yaml`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormlabConfig {
    /// Name recorded on saved formulations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    /// Unit volume (mL) for amounts and costing.
    #[serde(default = "default_basis_volume_ml", rename = "basis-volume-ml")]
    pub basis_volume_ml: f64,

    /// Units per production batch.
    #[serde(default = "default_batch_size", rename = "batch-size")]
    pub batch_size: u64,

    #[serde(default)]
    pub csv: CsvConfig,

    #[serde(default)]
    pub cost: CostConfig,

    #[serde(default)]
    pub assistant: AssistantConfig,

    #[serde(default)]
    pub storage: StorageConfig,
}

impl Default for FormlabConfig {
    fn default() -> Self {
        Self {
            author: None,
            basis_volume_ml: default_basis_volume_ml(),
            batch_size: default_batch_size(),
            csv: CsvConfig::default(),
            cost: CostConfig::default(),
            assistant: AssistantConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

fn default_basis_volume_ml() -> f64 {
    500.0
}

fn default_batch_size() -> u64 {
    1000
}

impl FormlabConfig {
    /// Rejects values that would make downstream arithmetic meaningless.
    pub fn validate(&self) -> Result<()> {
        if !(self.basis_volume_ml > 0.0 && self.basis_volume_ml.is_finite()) {
            return Err(ConfigError::InvalidValue {
                key: "basis-volume-ml".to_string(),
                reason: format!("must be a positive number, got {}", self.basis_volume_ml),
            });
        }
        if self.batch_size == 0 {
            return Err(ConfigError::InvalidValue {
                key: "batch-size".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Load configuration from `<formlab_dir>/config.yaml`.
///
/// A missing or empty file yields the defaults; `FORMLAB_*` environment
/// variables are applied on top either way.
pub fn load_config(formlab_dir: &Path) -> Result<FormlabConfig> {
    let config_path = formlab_dir.join(CONFIG_FILE);

    let mut figment = Figment::from(Serialized::defaults(FormlabConfig::default()));

    if config_path.exists() {
        let content = std::fs::read_to_string(&config_path)?;
        if !content.trim().is_empty() {
            figment = figment.merge(Yaml::string(&content));
        }
    }

    let config: FormlabConfig = figment
        .merge(
            Env::prefixed(ENV_PREFIX)
                .split("__")
                .map(|key| key.as_str().replace('_', "-").into()),
        )
        .extract()?;
    config.validate()?;
    Ok(config)
}

/// Save configuration to `<formlab_dir>/config.yaml`, creating the directory.
pub fn save_config(formlab_dir: &Path, config: &FormlabConfig) -> Result<()> {
    std::fs::create_dir_all(formlab_dir)?;

    let config_path = formlab_dir.join(CONFIG_FILE);
    let yaml = serde_yaml::to_string(config)?;
    std::fs::write(config_path, yaml)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
