//! `formlab label` -- label sheet template and labeling checklist.

use std::fs;

use anyhow::{Context, Result};
use serde::Serialize;

use formlab_assistant::{AssistantReply, review_label};
use formlab_core::label::{LabelField, LabelReport, LabelSheet, check_label};
use formlab_ui::styles::{
    render_bold, render_fail_icon, render_label_status, render_muted, render_outcome,
    render_pass_icon, render_skip_icon,
};

use crate::cli::{LabelArgs, LabelCheckArgs, LabelCommands};
use crate::commands::read_document;
use crate::context::RuntimeContext;
use crate::output::{output_json, output_table};

/// Execute the `formlab label` command.
pub fn run(ctx: &RuntimeContext, args: &LabelArgs) -> Result<()> {
    match &args.command {
        LabelCommands::Template => run_template(ctx),
        LabelCommands::Check(check_args) => run_check(ctx, check_args),
    }
}

fn run_template(ctx: &RuntimeContext) -> Result<()> {
    if ctx.json {
        output_json(&LabelSheet::template());
        return Ok(());
    }
    println!("# Label sheet. Fill in each field; '-' or 'n/a' counts as blank.");
    for field in LabelField::ALL {
        println!("{}: \"\"  # {}", field.as_str(), field.korean());
    }
    Ok(())
}

/// Parses a label sheet. An empty file is an undrafted sheet.
fn parse_sheet(content: &str) -> Result<LabelSheet> {
    if content.trim().is_empty() {
        return Ok(LabelSheet::new());
    }
    Ok(serde_yaml::from_str(content)?)
}

#[derive(Serialize)]
struct LabelCheckOutput<'a> {
    #[serde(flatten)]
    report: &'a LabelReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    review: Option<&'a AssistantReply>,
}

fn run_check(ctx: &RuntimeContext, args: &LabelCheckArgs) -> Result<()> {
    let content = fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let sheet = parse_sheet(&content)
        .with_context(|| format!("invalid label sheet {}", args.file.display()))?;
    let reference = args.doc.as_deref().map(read_document).transpose()?;

    let requirements = formlab_reference::label_requirements()?;
    let report = check_label(
        &requirements,
        &sheet,
        reference.as_ref().map(|d| d.text.as_str()),
    );

    let review = if args.review {
        let config = ctx.config()?;
        let assistant = ctx.assistant(&config, args.offline);
        Some(review_label(assistant.as_ref(), &sheet, reference.as_ref()))
    } else {
        None
    };

    if ctx.json {
        output_json(&LabelCheckOutput {
            report: &report,
            review: review.as_ref(),
        });
        return Ok(());
    }

    let with_evidence = reference.is_some();
    let mut headers = vec!["section", "item", "status", "value"];
    if with_evidence {
        headers.push("ref");
    }
    headers.push("article");
    let rows: Vec<Vec<String>> = report
        .rows
        .iter()
        .map(|r| {
            let item = if r.required {
                r.item.clone()
            } else {
                format!("{} (optional)", r.item)
            };
            let mut row = vec![
                r.section.clone(),
                item,
                render_label_status(r.status),
                r.value.clone(),
            ];
            if with_evidence {
                row.push(match r.evidence {
                    Some(true) => render_pass_icon(),
                    Some(false) => render_fail_icon(),
                    None => render_skip_icon(),
                });
            }
            row.push(r.article.clone());
            row
        })
        .collect();
    output_table(&headers, &rows);

    println!();
    println!(
        "{}  {}/{} required items ({:.1}%)",
        render_outcome(report.compliant),
        report.required_filled,
        report.required_total,
        report.completion_rate
    );
    if !ctx.quiet {
        let missing: Vec<&str> = report.missing().map(|r| r.item.as_str()).collect();
        if !missing.is_empty() {
            println!("{}", render_muted(&format!("missing: {}", missing.join(", "))));
        }
    }

    if let Some(review) = review {
        println!();
        println!("{}", render_bold("Review"));
        if !review.is_answered() && !ctx.quiet {
            println!("{}", render_muted("(assistant unavailable; built-in review)"));
        }
        println!("{}", review.value());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn sheet_accepts_english_and_korean_keys() {
        let sheet = parse_sheet("product-name: 레몬 스파클링\n내용량: 500ml\n").unwrap();
        assert_eq!(sheet.get(LabelField::ProductName), Some("레몬 스파클링"));
        assert_eq!(sheet.get(LabelField::Volume), Some("500ml"));
    }

    #[test]
    fn empty_sheet_is_not_drafted() {
        assert!(parse_sheet("  \n").unwrap().is_empty());
        assert!(parse_sheet("colour: red\n").is_err());
    }
}
