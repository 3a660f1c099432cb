//! `formlab save` -- store a formulation in the project.

use anyhow::{Result, bail};
use chrono::Utc;
use tracing::warn;

use formlab_core::formulation::Metadata;
use formlab_core::validation::validate_formula;
use formlab_storage::{FormulaStore, SavedFormulation, SavedMetadata};

use crate::cli::SaveArgs;
use crate::context::RuntimeContext;
use crate::output::output_json;

/// Execute the `formlab save` command.
pub fn run(ctx: &RuntimeContext, args: &SaveArgs) -> Result<()> {
    let config = ctx.config()?;
    let formulation = ctx.load_formulation(&args.file, &config)?;

    let name = args
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(formulation.name.as_str())
        .to_string();
    if name.is_empty() {
        bail!("no name for the formulation (use --name)");
    }

    let report = validate_formula(&formulation, &Metadata::default());
    if !report.passed {
        warn!(name = %name, issues = report.issues.len(), "saving a formulation that fails validation");
    }

    let metadata = SavedMetadata {
        brix: args.brix,
        ph: args.ph,
        volume: args.volume.clone(),
        shelf_life: args.shelf_life.clone(),
    };
    let record = SavedFormulation::new(
        &name,
        ctx.author(&config),
        &formulation,
        metadata,
        Utc::now(),
    );

    let store = ctx.formula_store(&config)?;
    let path = store.save(&record)?;

    if ctx.json {
        output_json(&serde_json::json!({
            "path": path.display().to_string(),
            "record": record,
            "passed": report.passed,
        }));
    } else if !ctx.quiet {
        println!("Saved {} to {}", record.name, path.display());
        if !report.passed {
            println!("  note: this formulation does not pass 'formlab check'");
        }
    }
    Ok(())
}
