//! `formlab sales` -- beverage category sales trends.

use anyhow::Result;

use formlab_ui::styles::{render_growth, render_muted};

use crate::cli::SalesArgs;
use crate::context::RuntimeContext;
use crate::output::{fmt_grouped, output_json, output_table};

/// Execute the `formlab sales` command.
pub fn run(ctx: &RuntimeContext, args: &SalesArgs) -> Result<()> {
    let table = formlab_reference::sales()?;
    let limit = args.top.unwrap_or(table.series.len());
    let ranking = table.ranking(limit);
    let averages = table.yearly_averages();

    if ctx.json {
        let averages: Vec<_> = table
            .years
            .iter()
            .zip(&averages)
            .map(|(year, avg)| serde_json::json!({ "year": year, "average": avg }))
            .collect();
        output_json(&serde_json::json!({
            "latestYear": table.latest_year(),
            "ranking": ranking,
            "averages": averages,
        }));
        return Ok(());
    }

    let latest = table.latest_year().unwrap_or("-");
    let rows: Vec<Vec<String>> = ranking
        .iter()
        .map(|r| {
            let mut row = vec![r.rank.to_string(), r.category.clone()];
            if let Some(series) = table.get(&r.category) {
                row.extend(series.values.iter().map(|v| fmt_grouped(*v, 0)));
            }
            row.push(render_growth(r.growth_percent));
            row
        })
        .collect();

    let mut headers: Vec<&str> = vec!["#", "category"];
    headers.extend(table.years.iter().map(String::as_str));
    headers.push("growth");
    output_table(&headers, &rows);

    if !ctx.quiet {
        let trend: Vec<String> = table
            .years
            .iter()
            .zip(&averages)
            .map(|(year, avg)| format!("{year} {}", fmt_grouped(*avg, 0)))
            .collect();
        println!();
        println!("{}", render_muted(&format!("average per category: {}", trend.join("  "))));
        println!("{}", render_muted(&format!("growth: {latest} vs previous year, millions of KRW")));
    }
    Ok(())
}
