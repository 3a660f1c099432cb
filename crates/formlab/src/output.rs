//! Output formatting helpers for the `formlab` CLI.
//!
//! Provides JSON output, table formatting that measures Hangul as double
//! width, and number formatting shared by the commands.

use std::io::{self, Write};

use serde::Serialize;

use formlab_core::formulation::Formulation;
use formlab_ui::terminal::{display_width, pad_right};

/// Print a value as pretty-printed JSON to stdout.
///
/// Terminates the process with exit code 1 if serialization fails.
pub fn output_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            // Ignore broken pipe errors (e.g., piped to `head`)
            let _ = writeln!(handle, "{}", json);
        }
        Err(e) => {
            eprintln!("Error: failed to serialize JSON: {}", e);
            std::process::exit(1);
        }
    }
}

/// Render a table with headers and rows.
///
/// Column widths are computed from display width so Korean text and colored
/// cells stay aligned. The last column is not padded.
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| display_width(h)).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(display_width(cell));
            }
        }
    }

    let line = |cells: &mut dyn Iterator<Item = String>| -> String {
        let parts: Vec<String> = cells
            .enumerate()
            .map(|(i, cell)| match widths.get(i) {
                Some(w) if i + 1 < widths.len() => pad_right(&cell, *w),
                _ => cell,
            })
            .collect();
        parts.join("  ").trim_end().to_string()
    };

    let mut out = String::new();
    out.push_str(&line(&mut headers.iter().map(|h| h.to_string())));
    out.push('\n');
    out.push_str(&line(&mut widths.iter().map(|w| "-".repeat(*w))));
    out.push('\n');
    for row in rows {
        out.push_str(&line(&mut row.iter().cloned()));
        out.push('\n');
    }
    out
}

/// Print a simple table with headers and rows. Nothing is printed for no rows.
pub fn output_table(headers: &[&str], rows: &[Vec<String>]) {
    if rows.is_empty() {
        return;
    }
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let _ = write!(handle, "{}", render_table(headers, rows));
}

/// Print a formulation as a table with a total line.
///
/// The amount column appears only when at least one row carries an amount.
pub fn output_formulation(formulation: &Formulation) {
    let with_amounts = formulation
        .ingredients
        .iter()
        .any(|r| r.amount_grams.is_some());

    let mut headers = vec!["#", "ingredient", "ratio(%)"];
    if with_amounts {
        headers.push("amount(g)");
    }
    headers.extend(["function", "grade"]);

    let mut rows: Vec<Vec<String>> = formulation
        .ingredients
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let mut cells = vec![
                (i + 1).to_string(),
                row.name.clone(),
                fmt_ratio(row.ratio_percent),
            ];
            if with_amounts {
                cells.push(row.amount_grams.map_or_else(|| "-".to_string(), |a| format!("{a:.2}")));
            }
            cells.push(row.function.clone());
            cells.push(row.grade.clone());
            cells
        })
        .collect();

    let mut total = vec![String::new(), "total".to_string(), fmt_ratio(formulation.total_ratio())];
    if with_amounts {
        let grams: f64 = formulation.ingredients.iter().filter_map(|r| r.amount_grams).sum();
        total.push(format!("{grams:.2}"));
    }
    rows.push(total);

    output_table(&headers, &rows);
}

// ---------------------------------------------------------------------------
// Numbers
// ---------------------------------------------------------------------------

/// Ratio with three decimals, e.g. `86.000`.
pub fn fmt_ratio(value: f64) -> String {
    format!("{value:.3}")
}

/// Number with `,` thousands separators and `decimals` fraction digits.
pub fn fmt_grouped(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if value < 0.0 && formatted.chars().any(|c| c != '0' && c != '.') {
        "-"
    } else {
        ""
    };
    match frac_part {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}

/// Amount in won, e.g. `1,234.56원`.
pub fn fmt_won(value: f64) -> String {
    format!("{}원", fmt_grouped(value, 2))
}

/// Optional measurement, `-` when absent.
pub fn fmt_opt(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}
