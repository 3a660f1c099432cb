//! `formlab sample` -- practice CSV files bundled with the tool.

use anyhow::Result;

use crate::cli::{SampleArgs, SampleCommands};
use crate::context::RuntimeContext;
use crate::output::{output_json, output_table};

/// Execute the `formlab sample` command.
pub fn run(ctx: &RuntimeContext, args: &SampleArgs) -> Result<()> {
    match &args.command {
        SampleCommands::List => {
            let samples = formlab_reference::SAMPLES;
            if ctx.json {
                let list: Vec<_> = samples
                    .iter()
                    .map(|s| serde_json::json!({ "id": s.id, "name": s.name }))
                    .collect();
                output_json(&list);
            } else {
                let rows: Vec<Vec<String>> = samples
                    .iter()
                    .map(|s| vec![s.id.to_string(), s.name.to_string()])
                    .collect();
                output_table(&["id", "name"], &rows);
            }
        }
        SampleCommands::Show(show_args) => {
            let sample = formlab_reference::sample(&show_args.name)?;
            if ctx.json {
                output_json(&serde_json::json!({
                    "id": sample.id,
                    "name": sample.name,
                    "csv": sample.csv,
                }));
            } else {
                print!("{}", sample.csv);
            }
        }
    }
    Ok(())
}
