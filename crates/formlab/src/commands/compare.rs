//! `formlab compare` -- compare a formulation with a standard or another file.

use anyhow::{Context, Result};
use serde::Serialize;

use formlab_core::compare::{ComparisonRow, ComparisonSummary, compare_formulations};
use formlab_core::formulation::Formulation;
use formlab_ui::styles::{render_bold, render_muted, render_verdict};

use crate::cli::CompareArgs;
use crate::context::RuntimeContext;
use crate::output::{fmt_ratio, output_json, output_table};

#[derive(Serialize)]
struct CompareOutput<'a> {
    mine: &'a str,
    standard: &'a str,
    rows: &'a [ComparisonRow],
    summary: ComparisonSummary,
}

/// Execute the `formlab compare` command.
pub fn run(ctx: &RuntimeContext, args: &CompareArgs) -> Result<()> {
    let config = ctx.config()?;
    let mine = ctx.load_formulation(&args.file, &config)?;
    let standard: Formulation = match (&args.standard, &args.against) {
        (Some(key), _) => formlab_reference::standard(key)?.to_formulation(),
        (None, Some(other)) => ctx
            .load_formulation(other, &config)
            .with_context(|| format!("failed to load comparison formulation '{other}'"))?,
        (None, None) => anyhow::bail!("either --standard or --against is required"),
    };

    let rows = compare_formulations(&mine, &standard);
    let summary = ComparisonSummary::from_rows(&rows);

    if ctx.json {
        output_json(&CompareOutput {
            mine: &mine.name,
            standard: &standard.name,
            rows: &rows,
            summary,
        });
        return Ok(());
    }

    println!("{} vs {}", render_bold(&mine.name), render_bold(&standard.name));
    println!();
    let table: Vec<Vec<String>> = rows
        .iter()
        .map(|r| {
            vec![
                r.name.clone(),
                fmt_ratio(r.mine_percent),
                fmt_ratio(r.standard_percent),
                format!("{:+.3}", r.diff_percent),
                render_verdict(r.verdict),
            ]
        })
        .collect();
    output_table(&["ingredient", "mine(%)", "standard(%)", "diff", "verdict"], &table);

    if !ctx.quiet {
        println!();
        println!(
            "{}",
            render_muted(&format!(
                "identical {}, excess {}, deficient {}, mine-only {}, standard-only {}",
                summary.identical,
                summary.excess,
                summary.deficient,
                summary.mine_only,
                summary.standard_only
            ))
        );
    }
    Ok(())
}
