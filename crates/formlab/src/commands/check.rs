//! `formlab check` -- validate a formulation.

use anyhow::{Result, bail};
use serde::Serialize;

use formlab_core::formulation::Metadata;
use formlab_core::validation::{ValidationReport, validate_formula};
use formlab_ui::styles::{render_fail_icon, render_outcome, render_warn_icon};

use crate::cli::CheckArgs;
use crate::context::RuntimeContext;
use crate::output::{fmt_opt, fmt_ratio, output_json};

#[derive(Serialize)]
struct CheckOutput<'a> {
    name: &'a str,
    ingredients: usize,
    brix: Option<f64>,
    #[serde(rename = "pH")]
    ph: Option<f64>,
    #[serde(flatten)]
    report: &'a ValidationReport,
}

/// Execute the `formlab check` command.
pub fn run(ctx: &RuntimeContext, args: &CheckArgs) -> Result<()> {
    let config = ctx.config()?;
    let mut formulation = ctx.load_formulation(&args.file, &config)?;
    if args.brix.is_some() {
        formulation.metadata.brix = args.brix;
    }
    if args.ph.is_some() {
        formulation.metadata.ph = args.ph;
    }

    let targets = Metadata {
        brix: args.target_brix,
        ph: args.target_ph,
    };
    let report = validate_formula(&formulation, &targets);

    if ctx.json {
        output_json(&CheckOutput {
            name: &formulation.name,
            ingredients: formulation.len(),
            brix: formulation.metadata.brix,
            ph: formulation.metadata.ph,
            report: &report,
        });
    } else if !ctx.quiet || !report.passed {
        println!(
            "{}  {} ({} ingredients, total {}%)",
            render_outcome(report.passed),
            formulation.name,
            formulation.len(),
            fmt_ratio(report.total_ratio)
        );
        if formulation.metadata.brix.is_some() || formulation.metadata.ph.is_some() {
            println!(
                "  Brix {}  pH {}",
                fmt_opt(formulation.metadata.brix),
                fmt_opt(formulation.metadata.ph)
            );
        }
        for issue in &report.issues {
            println!("  {} {}", render_fail_icon(), issue);
        }
        for warning in &report.warnings {
            println!("  {} {}", render_warn_icon(), warning);
        }
    }

    if args.strict && !report.passed {
        bail!(
            "'{}' failed validation with {} issue(s)",
            formulation.name,
            report.issues.len()
        );
    }
    Ok(())
}
