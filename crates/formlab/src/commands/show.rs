//! `formlab show` -- display a formulation with amounts for a unit volume.

use anyhow::{Context, Result};

use formlab_ui::styles::render_bold;

use crate::cli::ShowArgs;
use crate::context::RuntimeContext;
use crate::output::{fmt_opt, output_formulation, output_json};

/// Execute the `formlab show` command.
pub fn run(ctx: &RuntimeContext, args: &ShowArgs) -> Result<()> {
    let config = ctx.config()?;
    let volume = args.volume.unwrap_or(config.basis_volume_ml);
    let formulation = ctx
        .load_formulation(&args.file, &config)?
        .with_amounts(volume)
        .with_context(|| format!("cannot compute amounts for {volume} mL"))?;

    if ctx.json {
        output_json(&formulation);
        return Ok(());
    }

    println!(
        "{}  ({} mL, Brix {}, pH {})",
        render_bold(&formulation.name),
        volume,
        fmt_opt(formulation.metadata.brix),
        fmt_opt(formulation.metadata.ph)
    );
    println!();
    output_formulation(&formulation);
    Ok(())
}
