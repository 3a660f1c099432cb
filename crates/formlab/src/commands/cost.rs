//! `formlab cost` -- price a formulation per unit and per batch.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Serialize;
use tracing::info;

use formlab_core::cost::{CostSheet, calc_cost_table};
use formlab_ui::styles::{render_bold, render_muted, render_warn, render_warn_icon};

use crate::cli::CostArgs;
use crate::context::RuntimeContext;
use crate::output::{fmt_grouped, fmt_ratio, fmt_won, output_json, output_table};

const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CostOutput<'a> {
    name: &'a str,
    #[serde(flatten)]
    sheet: &'a CostSheet,
    batch_size: u64,
    batch_cost: f64,
    unmatched: Vec<&'a str>,
}

/// Execute the `formlab cost` command.
pub fn run(ctx: &RuntimeContext, args: &CostArgs) -> Result<()> {
    let config = ctx.config()?;
    let volume = args.volume.unwrap_or(config.basis_volume_ml);
    if !(volume > 0.0 && volume.is_finite()) {
        bail!("volume must be a positive number of mL, got {volume}");
    }
    let batch = args.batch.unwrap_or(config.batch_size);

    let formulation = ctx.load_formulation(&args.file, &config)?;
    let prices = ctx.cost_table(&config, args.match_mode)?;
    let sheet = calc_cost_table(&formulation, &prices, volume);
    let batch_cost = sheet.total_cost * batch as f64;

    if let Some(ref path) = args.export {
        export_csv(&sheet, path)?;
        info!(path = %path.display(), lines = sheet.lines.len(), "exported cost sheet");
    }

    if ctx.json {
        output_json(&CostOutput {
            name: &formulation.name,
            sheet: &sheet,
            batch_size: batch,
            batch_cost,
            unmatched: sheet.unmatched(),
        });
        return Ok(());
    }

    println!("{}  ({} mL per unit)", render_bold(&formulation.name), volume);
    println!();
    let rows: Vec<Vec<String>> = sheet
        .lines
        .iter()
        .map(|l| {
            let matched = if !l.is_matched() {
                render_warn("no price")
            } else if l.matched_ingredient != l.name {
                render_muted(&l.matched_ingredient)
            } else {
                String::new()
            };
            vec![
                l.name.clone(),
                fmt_ratio(l.ratio_percent),
                format!("{:.2}", l.amount_grams),
                fmt_grouped(l.unit_price_per_kg, 0),
                fmt_won(l.cost_for_unit),
                format!("{:.1}%", sheet.share_percent(l)),
                matched,
            ]
        })
        .collect();
    output_table(
        &["ingredient", "ratio(%)", "amount(g)", "won/kg", "cost", "share", "matched"],
        &rows,
    );

    println!();
    println!("Unit cost:  {}", render_bold(&fmt_won(sheet.total_cost)));
    println!("Batch cost: {} ({} units)", fmt_won(batch_cost), fmt_grouped(batch as f64, 0));

    let unmatched = sheet.unmatched();
    if !unmatched.is_empty() && !ctx.quiet {
        println!(
            "{} no price for: {} (add one with 'formlab price set')",
            render_warn_icon(),
            unmatched.join(", ")
        );
    }
    if let Some(ref path) = args.export {
        if !ctx.quiet {
            println!("Exported to {}", path.display());
        }
    }
    Ok(())
}

/// Writes the cost lines as CSV with a header row, behind a UTF-8 BOM so
/// spreadsheets read Korean names correctly.
fn export_csv(sheet: &CostSheet, path: &Path) -> Result<()> {
    let mut file = File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    file.write_all(UTF8_BOM)?;
    let mut writer = csv::Writer::from_writer(file);
    for line in &sheet.lines {
        writer.serialize(line)?;
    }
    writer.flush()?;
    Ok(())
}
