//! `formlab analyze` -- process analysis through the assistant.

use anyhow::{Result, bail};
use serde::Serialize;

use formlab_assistant::{AnalysisRequest, AssistantReply, analyze_process};
use formlab_core::enums::AnalysisTopic;
use formlab_ui::styles::{render_bold, render_muted};

use crate::cli::AnalyzeArgs;
use crate::commands::read_documents;
use crate::context::RuntimeContext;
use crate::output::output_json;

#[derive(Serialize)]
struct AnalyzeOutput<'a> {
    topic: AnalysisTopic,
    question: &'a str,
    documents: Vec<&'a str>,
    #[serde(flatten)]
    reply: &'a AssistantReply,
}

/// Execute the `formlab analyze` command.
pub fn run(ctx: &RuntimeContext, args: &AnalyzeArgs) -> Result<()> {
    let has_question = args
        .question
        .as_deref()
        .is_some_and(|q| !q.trim().is_empty());
    if args.topic == AnalysisTopic::Custom && !has_question {
        bail!("the custom topic needs a --question");
    }

    let config = ctx.config()?;
    let formulation = match args.formula {
        Some(ref name) => Some(ctx.load_formulation(name, &config)?),
        None => None,
    };
    let steps = formlab_reference::process_steps()?;
    let documents = read_documents(&args.docs)?;

    let request = AnalysisRequest {
        topic: args.topic,
        question: args.question.as_deref(),
        formulation: formulation.as_ref(),
        steps: &steps,
        documents: &documents,
    };
    let assistant = ctx.assistant(&config, args.offline);
    let reply = analyze_process(assistant.as_ref(), &request);

    if ctx.json {
        output_json(&AnalyzeOutput {
            topic: args.topic,
            question: request.question(),
            documents: documents.iter().map(|d| d.name.as_str()).collect(),
            reply: &reply,
        });
        return Ok(());
    }

    if !ctx.quiet {
        println!("{}", render_bold(request.question()));
        if !reply.is_answered() {
            println!("{}", render_muted("(assistant unavailable; built-in review)"));
        }
        println!();
    }
    println!("{}", reply.value());
    Ok(())
}
