//! `formlab docs` -- keyword search in reference documents.

use anyhow::Result;

use formlab_ui::styles::{render_accent, render_muted};

use crate::cli::{DocsArgs, DocsCommands, DocsSearchArgs};
use crate::commands::read_document;
use crate::context::RuntimeContext;
use crate::output::output_json;

/// Execute the `formlab docs` command.
pub fn run(ctx: &RuntimeContext, args: &DocsArgs) -> Result<()> {
    match &args.command {
        DocsCommands::Search(search_args) => run_search(ctx, search_args),
    }
}

fn run_search(ctx: &RuntimeContext, args: &DocsSearchArgs) -> Result<()> {
    let doc = read_document(&args.file)?;
    let result = doc.search(&args.keyword);

    if ctx.json {
        output_json(&result);
        return Ok(());
    }

    if !ctx.quiet {
        println!(
            "{}: {} matching line(s) for '{}'",
            doc.name,
            result.total,
            result.keyword
        );
    }
    for hit in &result.hits {
        if args.context {
            println!("{}", render_muted("--"));
            let lines = doc.context(hit.line_number);
            let first = hit.line_number.saturating_sub(1).max(1);
            for (offset, line) in lines.iter().enumerate() {
                let number = first + offset;
                if number == hit.line_number {
                    println!("{}: {}", render_accent(&number.to_string()), line);
                } else {
                    println!("{}", render_muted(&format!("{number}: {line}")));
                }
            }
        } else {
            println!("{}: {}", render_accent(&hit.line_number.to_string()), hit.line);
        }
    }
    Ok(())
}
