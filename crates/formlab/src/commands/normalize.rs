//! `formlab normalize` -- rescale ratios to 100% and emit CSV.

use std::fs;

use anyhow::{Context, Result};
use tracing::info;

use formlab_core::enums::HeaderStyle;
use formlab_formula::to_csv;

use crate::cli::NormalizeArgs;
use crate::context::RuntimeContext;
use crate::output::{fmt_ratio, output_json};

/// Execute the `formlab normalize` command.
pub fn run(ctx: &RuntimeContext, args: &NormalizeArgs) -> Result<()> {
    let config = ctx.config()?;
    let formulation = ctx.load_formulation(&args.file, &config)?;
    let before = formulation.total_ratio();
    let normalized = formulation
        .normalize()
        .with_context(|| format!("cannot normalize '{}'", formulation.name))?;

    let style = if args.korean {
        HeaderStyle::Korean
    } else {
        config.csv.headers
    };
    let csv = to_csv(&normalized, style)?;

    match args.output {
        Some(ref path) => {
            fs::write(path, &csv).with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), "wrote normalized formulation");
            if ctx.json {
                output_json(&serde_json::json!({
                    "name": normalized.name,
                    "path": path.display().to_string(),
                    "totalBefore": before,
                    "totalAfter": normalized.total_ratio(),
                }));
            } else if !ctx.quiet {
                println!(
                    "Normalized {} ({}% -> {}%) to {}",
                    normalized.name,
                    fmt_ratio(before),
                    fmt_ratio(normalized.total_ratio()),
                    path.display()
                );
            }
        }
        None if ctx.json => output_json(&normalized),
        None => print!("{csv}"),
    }
    Ok(())
}
