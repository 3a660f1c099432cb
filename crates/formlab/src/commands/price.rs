//! `formlab price` -- list ingredient prices and manage project overrides.

use anyhow::{Context, Result, bail};
use serde::Serialize;

use formlab_config::{load_prices, save_prices};
use formlab_core::cost::CostEntry;
use formlab_ui::styles::render_accent;

use crate::cli::{PriceArgs, PriceCommands, PriceListArgs, PriceRemoveArgs, PriceSetArgs};
use crate::context::RuntimeContext;
use crate::output::{fmt_grouped, output_json, output_table};

/// Execute the `formlab price` command.
pub fn run(ctx: &RuntimeContext, args: &PriceArgs) -> Result<()> {
    match &args.command {
        PriceCommands::List(list_args) => run_list(ctx, list_args),
        PriceCommands::Set(set_args) => run_set(ctx, set_args),
        PriceCommands::Remove(remove_args) => run_remove(ctx, remove_args),
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PriceView<'a> {
    #[serde(flatten)]
    entry: &'a CostEntry,
    overridden: bool,
}

fn run_list(ctx: &RuntimeContext, args: &PriceListArgs) -> Result<()> {
    let config = ctx.config()?;
    let table = ctx.cost_table(&config, None)?;
    let entries = table.search(args.search.as_deref().unwrap_or_default());

    if ctx.json {
        let views: Vec<PriceView<'_>> = entries
            .iter()
            .map(|e| PriceView {
                entry: e,
                overridden: table.is_overridden(&e.name),
            })
            .collect();
        output_json(&views);
        return Ok(());
    }

    if entries.is_empty() {
        if !ctx.quiet {
            println!("No matching ingredients.");
        }
        return Ok(());
    }

    let rows: Vec<Vec<String>> = entries
        .iter()
        .map(|e| {
            let source = if table.is_overridden(&e.name) {
                render_accent("project")
            } else {
                "base".to_string()
            };
            vec![
                e.name.clone(),
                fmt_grouped(e.unit_price_per_kg, 0),
                e.unit.clone(),
                e.supplier.clone(),
                e.moq.clone(),
                source,
            ]
        })
        .collect();
    output_table(&["ingredient", "price", "unit", "supplier", "moq", "source"], &rows);
    Ok(())
}

fn run_set(ctx: &RuntimeContext, args: &PriceSetArgs) -> Result<()> {
    let name = args.name.trim();
    if name.is_empty() {
        bail!("ingredient name must not be empty");
    }
    if !(args.price > 0.0 && args.price.is_finite()) {
        bail!("price must be a positive number, got {}", args.price);
    }

    let dir = ctx.require_formlab_dir()?;
    let config = ctx.config()?;
    let previous = ctx.cost_table(&config, None)?.get(name).cloned();

    let mut overlay = load_prices(&dir)
        .with_context(|| format!("failed to load prices from {}", dir.display()))?;
    let mut entry = CostEntry::new(name, args.price);
    if let Some(ref supplier) = args.supplier {
        entry = entry.supplier(supplier);
    } else if let Some(ref p) = previous {
        entry = entry.supplier(&p.supplier);
    }
    if let Some(ref moq) = args.moq {
        entry = entry.moq(moq);
    } else if let Some(ref p) = previous {
        entry = entry.moq(&p.moq);
    }
    overlay.set(entry.clone());
    save_prices(&dir, &overlay).context("failed to save prices")?;

    if ctx.json {
        output_json(&serde_json::json!({
            "entry": entry,
            "previous": previous,
        }));
    } else if !ctx.quiet {
        match previous {
            Some(p) => println!(
                "{}: {} -> {} won/kg",
                name,
                fmt_grouped(p.unit_price_per_kg, 0),
                fmt_grouped(entry.unit_price_per_kg, 0)
            ),
            None => println!("{}: {} won/kg (new)", name, fmt_grouped(entry.unit_price_per_kg, 0)),
        }
    }
    Ok(())
}

fn run_remove(ctx: &RuntimeContext, args: &PriceRemoveArgs) -> Result<()> {
    let dir = ctx.require_formlab_dir()?;
    let mut overlay = load_prices(&dir)
        .with_context(|| format!("failed to load prices from {}", dir.display()))?;

    let Some(removed) = overlay.remove(&args.name) else {
        bail!("no project price override for '{}'", args.name.trim());
    };
    save_prices(&dir, &overlay).context("failed to save prices")?;

    if ctx.json {
        output_json(&removed);
    } else if !ctx.quiet {
        println!("Removed override for {}", removed.name);
    }
    Ok(())
}
