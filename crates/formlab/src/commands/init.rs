//! `formlab init` -- create a `.formlab` directory in the current project.

use std::env;
use std::fs;

use anyhow::{Context, Result, bail};

use formlab_config::config::CONFIG_FILE;
use formlab_config::formlab_dir::formulas_dir;
use formlab_config::{FormlabConfig, ensure_formlab_dir, save_config};

use crate::cli::InitArgs;
use crate::context::RuntimeContext;
use crate::output::output_json;

/// Execute the `formlab init` command.
pub fn run(ctx: &RuntimeContext, args: &InitArgs) -> Result<()> {
    let target = match ctx.dir {
        Some(ref d) => d.clone(),
        None => env::current_dir().context("failed to get current directory")?,
    };

    let formlab_dir = ensure_formlab_dir(&target)
        .with_context(|| format!("failed to create directory: {}", target.display()))?;
    let config_path = formlab_dir.join(CONFIG_FILE);

    if config_path.exists() && !args.force {
        bail!(
            "Found existing configuration in {}\n\n\
            This project is already initialized.\n\
            Use --force to overwrite the configuration with defaults.",
            config_path.display()
        );
    }

    let config = FormlabConfig {
        author: ctx.author.clone(),
        ..FormlabConfig::default()
    };
    save_config(&formlab_dir, &config)
        .with_context(|| format!("failed to write {}", config_path.display()))?;

    let formulas = formulas_dir(&formlab_dir, &config);
    fs::create_dir_all(&formulas)
        .with_context(|| format!("failed to create directory: {}", formulas.display()))?;

    if ctx.json {
        output_json(&serde_json::json!({
            "path": formlab_dir.display().to_string(),
            "config": config_path.display().to_string(),
            "formulas": formulas.display().to_string(),
        }));
    } else if !ctx.quiet {
        println!("Initialized formlab in {}", formlab_dir.display());
        println!("  config:   {}", config_path.display());
        println!("  formulas: {}", formulas.display());
    }

    Ok(())
}
