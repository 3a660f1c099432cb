//! `formlab standard` -- browse the bundled reference formulations.

use anyhow::Result;

use formlab_formula::to_csv;
use formlab_ui::styles::render_bold;

use crate::cli::{StandardArgs, StandardCommands, StandardShowArgs};
use crate::context::RuntimeContext;
use crate::output::{fmt_opt, output_formulation, output_json, output_table};

/// Execute the `formlab standard` command.
pub fn run(ctx: &RuntimeContext, args: &StandardArgs) -> Result<()> {
    match &args.command {
        StandardCommands::List => run_list(ctx),
        StandardCommands::Show(show_args) => run_show(ctx, show_args),
    }
}

fn run_list(ctx: &RuntimeContext) -> Result<()> {
    let standards = formlab_reference::standards()?;

    if ctx.json {
        let list: Vec<_> = standards
            .iter()
            .map(|s| {
                serde_json::json!({
                    "id": s.id,
                    "name": s.name,
                    "brix": s.brix,
                    "pH": s.ph,
                    "ingredients": s.ingredients.len(),
                })
            })
            .collect();
        output_json(&list);
        return Ok(());
    }

    let rows: Vec<Vec<String>> = standards
        .iter()
        .map(|s| {
            vec![
                s.id.clone(),
                s.name.clone(),
                s.brix.to_string(),
                s.ph.to_string(),
                s.ingredients.len().to_string(),
            ]
        })
        .collect();
    output_table(&["id", "name", "brix", "pH", "ingredients"], &rows);
    Ok(())
}

fn run_show(ctx: &RuntimeContext, args: &StandardShowArgs) -> Result<()> {
    let formulation = formlab_reference::standard(&args.name)?.to_formulation();

    if args.csv {
        let config = ctx.config()?;
        print!("{}", to_csv(&formulation, config.csv.headers)?);
        return Ok(());
    }
    if ctx.json {
        output_json(&formulation);
        return Ok(());
    }

    println!(
        "{}  (Brix {}, pH {})",
        render_bold(&formulation.name),
        fmt_opt(formulation.metadata.brix),
        fmt_opt(formulation.metadata.ph)
    );
    println!();
    output_formulation(&formulation);
    Ok(())
}
