//! `formlab card` -- market product cards and drafted formulations.

use anyhow::Result;

use formlab_assistant::generate_card;
use formlab_formula::to_csv;
use formlab_ui::styles::{render_bold, render_category, render_muted};

use crate::cli::{CardArgs, CardCommands, CardGenerateArgs};
use crate::context::RuntimeContext;
use crate::output::{fmt_ratio, output_json, output_table};

/// Execute the `formlab card` command.
pub fn run(ctx: &RuntimeContext, args: &CardArgs) -> Result<()> {
    match &args.command {
        CardCommands::List => run_list(ctx),
        CardCommands::Generate(generate_args) => run_generate(ctx, generate_args),
    }
}

fn run_list(ctx: &RuntimeContext) -> Result<()> {
    let cards = formlab_reference::product_cards()?;
    if ctx.json {
        output_json(&cards);
        return Ok(());
    }

    let rows: Vec<Vec<String>> = cards
        .iter()
        .map(|c| {
            vec![
                c.id.clone(),
                format!("{} {}", c.emoji, c.name),
                render_category(&c.category),
                c.description.clone(),
            ]
        })
        .collect();
    output_table(&["id", "product", "category", "description"], &rows);
    Ok(())
}

fn run_generate(ctx: &RuntimeContext, args: &CardGenerateArgs) -> Result<()> {
    let config = ctx.config()?;
    let card = formlab_reference::product_card(&args.product)?;
    let default = formlab_reference::default_card_formulation(&card)?;

    let assistant = ctx.assistant(&config, args.offline);
    let reply = generate_card(assistant.as_ref(), &card, default);
    let drafted = reply.value();

    if args.csv {
        print!("{}", to_csv(&drafted.to_formulation(), config.csv.headers)?);
        return Ok(());
    }
    if ctx.json {
        output_json(&reply);
        return Ok(());
    }

    println!("{} {}", card.emoji, render_bold(&drafted.product_name));
    if !drafted.concept.is_empty() {
        println!("{}", drafted.concept);
    }
    println!(
        "{} | Brix {} | pH {} | {} kcal/100ml | shelf life {}",
        drafted.total_volume, drafted.brix, drafted.ph, drafted.calories, drafted.shelf_life
    );
    println!();

    let rows: Vec<Vec<String>> = drafted
        .ingredients
        .iter()
        .map(|i| {
            vec![
                i.name.clone(),
                i.amount.clone(),
                fmt_ratio(i.pct),
                i.function.clone(),
                i.grade.clone(),
            ]
        })
        .collect();
    output_table(&["ingredient", "amount", "ratio(%)", "function", "grade"], &rows);

    if !reply.is_answered() && !ctx.quiet {
        println!();
        println!(
            "{}",
            render_muted("(assistant unavailable; showing the bundled reference formulation)")
        );
    }
    Ok(())
}
