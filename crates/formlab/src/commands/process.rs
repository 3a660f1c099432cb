//! `formlab process` -- manufacturing steps, hazards and CCPs.

use anyhow::Result;
use serde::Serialize;

use formlab_core::enums::RiskLevel;
use formlab_core::process::{ProcessStep, ccp_steps, count_mentions, flow_line, risk_profile};
use formlab_ui::styles::{render_ccp, render_muted, render_risk};

use crate::cli::ProcessArgs;
use crate::commands::read_documents;
use crate::context::RuntimeContext;
use crate::output::{output_json, output_table};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StepView<'a> {
    #[serde(flatten)]
    step: &'a ProcessStep,
    ccp: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    mentions: Option<usize>,
}

/// Execute the `formlab process` command.
pub fn run(ctx: &RuntimeContext, args: &ProcessArgs) -> Result<()> {
    let all_steps = formlab_reference::process_steps()?;
    let docs = read_documents(&args.docs)?;

    let steps: Vec<&ProcessStep> = if args.ccp {
        ccp_steps(&all_steps)
    } else {
        all_steps.iter().collect()
    };
    let mentions = |step: &ProcessStep| (!docs.is_empty()).then(|| count_mentions(step, &docs));

    if ctx.json {
        let views: Vec<StepView<'_>> = steps
            .iter()
            .map(|s| StepView {
                step: s,
                ccp: s.is_ccp(),
                mentions: mentions(s),
            })
            .collect();
        let profile: Vec<_> = risk_profile(&all_steps)
            .into_iter()
            .map(|(level, count)| serde_json::json!({ "level": level, "count": count }))
            .collect();
        output_json(&serde_json::json!({
            "steps": views,
            "riskProfile": profile,
        }));
        return Ok(());
    }

    if !args.ccp && !ctx.quiet {
        println!("{}", flow_line(&all_steps));
        println!();
    }

    let mut headers = vec!["#", "step", "level", "CCP", "hazard", "control"];
    if !docs.is_empty() {
        headers.push("docs");
    }
    let rows: Vec<Vec<String>> = steps
        .iter()
        .map(|s| {
            let mut row = vec![
                s.id.to_string(),
                format!("{} {}", s.icon, s.name).trim().to_string(),
                render_risk(s.level),
                render_ccp(s.is_ccp()),
                s.risk.clone(),
                s.control.clone(),
            ];
            if let Some(n) = mentions(s) {
                row.push(format!("{n}/{}", docs.len()));
            }
            row
        })
        .collect();
    output_table(&headers, &rows);

    if !ctx.quiet {
        let summary: Vec<String> = risk_profile(&all_steps)
            .into_iter()
            .map(|(level, count)| format!("{} {}", level.as_str(), count))
            .collect();
        let ccps = all_steps.iter().filter(|s| s.level == RiskLevel::High).count();
        println!();
        println!(
            "{}",
            render_muted(&format!("{} steps ({}), {} CCP", all_steps.len(), summary.join(", "), ccps))
        );
    }
    Ok(())
}
