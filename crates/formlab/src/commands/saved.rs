//! `formlab saved` -- browse saved formulations.

use anyhow::Result;
use chrono::Local;

use formlab_formula::to_csv;
use formlab_storage::{FormulaStore, StoredRecord};
use formlab_ui::styles::{render_bold, render_muted};

use crate::cli::{SavedArgs, SavedCommands, SavedShowArgs};
use crate::context::RuntimeContext;
use crate::output::{fmt_opt, output_formulation, output_json, output_table};

/// Execute the `formlab saved` command.
pub fn run(ctx: &RuntimeContext, args: &SavedArgs) -> Result<()> {
    match &args.command {
        SavedCommands::List => run_list(ctx),
        SavedCommands::Show(show_args) => run_show(ctx, show_args),
    }
}

fn file_name(stored: &StoredRecord) -> String {
    stored
        .path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

fn run_list(ctx: &RuntimeContext) -> Result<()> {
    let config = ctx.config()?;
    let records = ctx.formula_store(&config)?.list()?;

    if ctx.json {
        let list: Vec<_> = records
            .iter()
            .map(|s| {
                serde_json::json!({
                    "path": s.path.display().to_string(),
                    "name": s.record.name,
                    "author": s.record.author,
                    "timestamp": s.record.timestamp,
                    "ingredients": s.record.ingredients.len(),
                })
            })
            .collect();
        output_json(&list);
        return Ok(());
    }

    if records.is_empty() {
        if !ctx.quiet {
            println!("No saved formulations.");
        }
        return Ok(());
    }

    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|s| {
            vec![
                s.record.name.clone(),
                s.record.author.clone(),
                s.record
                    .timestamp
                    .with_timezone(&Local)
                    .format("%Y-%m-%d %H:%M")
                    .to_string(),
                s.record.ingredients.len().to_string(),
                file_name(s),
            ]
        })
        .collect();
    output_table(&["name", "author", "saved", "ingredients", "file"], &rows);
    Ok(())
}

fn run_show(ctx: &RuntimeContext, args: &SavedShowArgs) -> Result<()> {
    let config = ctx.config()?;
    let stored = ctx.formula_store(&config)?.load_latest(&args.name)?;
    let formulation = stored.record.to_formulation();

    if args.csv {
        print!("{}", to_csv(&formulation, config.csv.headers)?);
        return Ok(());
    }
    if ctx.json {
        output_json(&stored.record);
        return Ok(());
    }

    let meta = &stored.record.metadata;
    println!("{}", render_bold(&stored.record.name));
    println!(
        "{}",
        render_muted(&format!(
            "saved {} by {} ({})",
            stored.record.timestamp.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
            stored.record.author,
            file_name(&stored)
        ))
    );
    println!(
        "Brix {}  pH {}  volume {}  shelf life {}",
        fmt_opt(meta.brix),
        fmt_opt(meta.ph),
        meta.volume.as_deref().unwrap_or("-"),
        meta.shelf_life.as_deref().unwrap_or("-")
    );
    println!();
    output_formulation(&formulation);
    Ok(())
}
