//! Configuration management for formlab.
//!
//! This crate loads and saves `.formlab/config.yaml`, discovers `.formlab/`
//! directories, and keeps the project's ingredient price overlay
//! (`.formlab/prices.yaml`).

pub mod config;
pub mod formlab_dir;
pub mod prices;

pub use config::{ConfigError, FormlabConfig, load_config, save_config};
pub use formlab_dir::{ensure_formlab_dir, find_formlab_dir, find_formlab_dir_or_error};
pub use prices::{PriceOverlay, load_prices, save_prices};
