//! Read and write formulations as CSV, JSON and TOML, and resolve formula paths.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use formlab_core::enums::{DuplicatePolicy, HeaderStyle, UnknownColumns};
use formlab_core::formulation::{Formulation, IngredientRow};

use crate::types::{Column, ParseError, ParseOptions, Result};

const BOM: char = '\u{feff}';

/// Extensions tried, in order, when resolving a bare formula name.
const SUFFIXES: &[&str] = &[".csv", ".json", ".toml", ".txt"];

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

/// Parses a ratio cell. A trailing `%` is allowed; anything that is not a
/// finite number is rejected.
fn parse_ratio(raw: &str) -> Option<f64> {
    let s = raw.trim();
    let s = s.strip_suffix('%').unwrap_or(s).trim();
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parses an amount cell leniently: the leading number of `430ml` or `2.5g`,
/// or `None` when there is none.
fn parse_amount(raw: &str) -> Option<f64> {
    let s = raw.trim();
    let end = s
        .char_indices()
        .find(|(i, c)| !(c.is_ascii_digit() || *c == '.' || (*i == 0 && (*c == '-' || *c == '+'))))
        .map(|(i, _)| i)
        .unwrap_or(s.len());
    s[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

fn merge_into(existing: &mut IngredientRow, row: IngredientRow) {
    existing.ratio_percent += row.ratio_percent;
    existing.amount_grams = match (existing.amount_grams, row.amount_grams) {
        (Some(a), Some(b)) => Some(a + b),
        (a, b) => a.or(b),
    };
    if existing.function.is_empty() {
        existing.function = row.function;
    }
    if existing.grade.is_empty() {
        existing.grade = row.grade;
    }
    for (k, v) in row.extras {
        existing.extras.entry(k).or_insert(v);
    }
}

/// Ingredient rows keyed by name, folding repeats per [`DuplicatePolicy`].
struct RowSet<'a> {
    options: &'a ParseOptions,
    rows: Vec<IngredientRow>,
    seen: HashMap<String, usize>,
}

impl<'a> RowSet<'a> {
    fn new(options: &'a ParseOptions) -> Self {
        Self {
            options,
            rows: Vec::new(),
            seen: HashMap::new(),
        }
    }

    fn push(&mut self, line: u64, row: IngredientRow) -> Result<()> {
        match self.seen.get(&row.name) {
            Some(&pos) => match self.options.duplicates {
                DuplicatePolicy::Merge => merge_into(&mut self.rows[pos], row),
                DuplicatePolicy::Reject => {
                    return Err(ParseError::DuplicateIngredient {
                        line,
                        name: row.name,
                    });
                }
            },
            None => {
                self.seen.insert(row.name.clone(), self.rows.len());
                self.rows.push(row);
            }
        }
        Ok(())
    }

    fn into_rows(self) -> Vec<IngredientRow> {
        self.rows
    }
}

/// Applies the CSV row rules to a formulation read from JSON or TOML:
/// names are trimmed, blank names dropped and repeats folded. `line` in a
/// duplicate error is the 1-based position in the ingredient list.
fn normalize_rows(mut formulation: Formulation, options: &ParseOptions) -> Result<Formulation> {
    let mut set = RowSet::new(options);
    for (idx, mut row) in std::mem::take(&mut formulation.ingredients)
        .into_iter()
        .enumerate()
    {
        row.name = row.name.trim().to_string();
        if row.name.is_empty() {
            continue;
        }
        set.push(idx as u64 + 1, row)?;
    }
    formulation.ingredients = set.into_rows();
    Ok(formulation)
}

/// Parses a formulation table from CSV text.
///
/// The first non-blank line is the header. `name` and `ratioPercent` (or one
/// of their aliases) are required. Rows with a blank name are skipped.
pub fn parse_csv_formula(text: &str, options: &ParseOptions) -> Result<Formulation> {
    let text = text.strip_prefix(BOM).unwrap_or(text);
    if text.trim().is_empty() {
        return Err(ParseError::Empty);
    }

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut columns: Vec<Option<Column>> = Vec::new();
    for header in reader.headers()?.iter() {
        if header.trim().is_empty() {
            columns.push(None);
            continue;
        }
        let col = Column::from_header(header);
        // a repeated known header is read once; later copies pass through
        let col = match col {
            Column::Extra(_) => col,
            known if columns.iter().flatten().any(|c| *c == known) => {
                Column::Extra(header.trim().to_string())
            }
            known => known,
        };
        if let Column::Extra(name) = &col {
            if options.unknown_columns == UnknownColumns::Reject {
                return Err(ParseError::UnknownColumn(name.clone()));
            }
        }
        columns.push(Some(col));
    }

    let index_of = |wanted: Column| columns.iter().position(|c| c.as_ref() == Some(&wanted));
    let name_idx = index_of(Column::Name).ok_or(ParseError::MissingColumn("name"))?;
    let ratio_idx = index_of(Column::Ratio).ok_or(ParseError::MissingColumn("ratioPercent"))?;

    let mut rows = RowSet::new(options);

    for record in reader.records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let cell = |idx: usize| record.get(idx).unwrap_or("");

        if record.iter().all(|f| f.is_empty()) {
            continue;
        }
        let name = cell(name_idx);
        if name.is_empty() {
            continue;
        }

        let raw_ratio = cell(ratio_idx);
        let ratio = parse_ratio(raw_ratio).ok_or_else(|| ParseError::InvalidRatio {
            line,
            name: name.to_string(),
            value: raw_ratio.to_string(),
        })?;

        let mut row = IngredientRow::new(name, ratio);
        for (idx, col) in columns.iter().enumerate() {
            match col {
                Some(Column::Function) => row.function = cell(idx).to_string(),
                Some(Column::Grade) => row.grade = cell(idx).to_string(),
                Some(Column::Amount) => row.amount_grams = parse_amount(cell(idx)),
                Some(Column::Extra(header)) => {
                    row.extras.insert(header.clone(), cell(idx).to_string());
                }
                _ => {}
            }
        }

        rows.push(line, row)?;
    }

    let rows = rows.into_rows();
    if rows.is_empty() {
        return Err(ParseError::NoRows);
    }
    Ok(Formulation::new(rows))
}

fn fmt3(value: f64) -> String {
    format!("{value:.3}")
}

/// Writes `formulation` as CSV with a leading UTF-8 BOM.
///
/// Ratios and amounts carry 3 decimals; passthrough columns follow the known
/// ones in first-seen order.
pub fn to_csv(formulation: &Formulation, style: HeaderStyle) -> Result<String> {
    let extras = formulation.extra_columns();
    let mut writer = csv::Writer::from_writer(Vec::new());

    let known = [
        Column::Name,
        Column::Ratio,
        Column::Function,
        Column::Grade,
        Column::Amount,
    ];
    let header: Vec<&str> = known
        .iter()
        .map(|c| c.header(style))
        .chain(extras.iter().map(String::as_str))
        .collect();
    writer.write_record(&header)?;

    for row in &formulation.ingredients {
        let mut record = vec![
            row.name.clone(),
            fmt3(row.ratio_percent),
            row.function.clone(),
            row.grade.clone(),
            row.amount_grams.map(fmt3).unwrap_or_default(),
        ];
        record.extend(
            extras
                .iter()
                .map(|h| row.extras.get(h).cloned().unwrap_or_default()),
        );
        writer.write_record(&record)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ParseError::Io(e.into_error()))?;
    let body = String::from_utf8(bytes).map_err(|e| ParseError::Format {
        format: "csv",
        message: e.to_string(),
    })?;
    Ok(format!("{BOM}{body}"))
}

// ---------------------------------------------------------------------------
// JSON / TOML
// ---------------------------------------------------------------------------

/// Parse a formulation from a JSON string.
pub fn parse_json(content: &str) -> Result<Formulation> {
    serde_json::from_str(content).map_err(|e| ParseError::Format {
        format: "json",
        message: e.to_string(),
    })
}

/// Parse a formulation from a TOML string.
pub fn parse_toml(content: &str) -> Result<Formulation> {
    toml::from_str(content).map_err(|e| ParseError::Format {
        format: "toml",
        message: e.to_string(),
    })
}

/// Load a formulation from a file, picking the format by extension.
///
/// Unknown extensions are tried as JSON first, then as CSV. A formulation
/// without a name takes the file stem.
pub fn load_formula(path: &Path, options: &ParseOptions) -> Result<Formulation> {
    let content = std::fs::read_to_string(path)?;
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    let mut formulation = match ext.as_deref() {
        Some("csv") | Some("txt") => parse_csv_formula(&content, options)?,
        Some("json") => normalize_rows(parse_json(&content)?, options)?,
        Some("toml") => normalize_rows(parse_toml(&content)?, options)?,
        _ => match parse_json(&content) {
            Ok(formulation) => normalize_rows(formulation, options)?,
            Err(_) => parse_csv_formula(&content, options)?,
        },
    };
    if formulation.name.is_empty() {
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            formulation.name = stem.to_string();
        }
    }
    Ok(formulation)
}

/// Search for a formula file by name.
///
/// Search order:
/// 1. Exact path (absolute, or relative to `cwd`)
/// 2. `cwd` with standard extensions
/// 3. `.formlab/formulas/` under `cwd`
pub fn find_formula(name: &str, cwd: &Path) -> Result<PathBuf> {
    let exact = Path::new(name);
    if exact.is_absolute() && exact.is_file() {
        return Ok(exact.to_path_buf());
    }
    let relative = cwd.join(name);
    if relative.is_file() {
        return Ok(relative);
    }

    let formulas = cwd.join(".formlab").join("formulas");
    for dir in [cwd, formulas.as_path()] {
        for suffix in SUFFIXES {
            let candidate = dir.join(format!("{name}{suffix}"));
            if candidate.is_file() {
                return Ok(candidate);
            }
        }
    }

    Err(ParseError::NotFound(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(text: &str) -> Result<Formulation> {
        parse_csv_formula(text, &ParseOptions::default())
    }

    #[test]
    fn parses_minimal_table() {
        let f = parse("name,ratioPercent\nwater,86\nsugar,11\nacid,3").unwrap();
        assert_eq!(f.len(), 3);
        assert_eq!(f.total_ratio(), 100.0);
        assert_eq!(f.ingredients[1].name, "sugar");
        assert_eq!(f.ingredients[1].ratio_percent, 11.0);
    }

    #[test]
    fn korean_headers_with_bom() {
        let text = "\u{feff}원료명,함량(g),비율(%),기능,등급\n정제수,430ml,86,용매,식품용수\n탄산가스,4.0v/v,0.8,탄산,식품첨가물\n";
        let f = parse(text).unwrap();
        let row = &f.ingredients[0];
        assert_eq!(row.name, "정제수");
        assert_eq!(row.ratio_percent, 86.0);
        assert_eq!(row.amount_grams, Some(430.0));
        assert_eq!(row.function, "용매");
        assert_eq!(row.grade, "식품용수");
        assert_eq!(f.ingredients[1].amount_grams, Some(4.0));
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(matches!(parse(""), Err(ParseError::Empty)));
        assert!(matches!(parse("  \n\t\n"), Err(ParseError::Empty)));
        assert!(matches!(parse("\u{feff}"), Err(ParseError::Empty)));
    }

    #[test]
    fn missing_required_column() {
        assert!(matches!(
            parse("name,function\nwater,solvent"),
            Err(ParseError::MissingColumn("ratioPercent"))
        ));
        assert!(matches!(
            parse("ratio\n50"),
            Err(ParseError::MissingColumn("name"))
        ));
    }

    #[test]
    fn non_numeric_ratio_is_rejected() {
        for bad in ["abc", "", "NaN", "inf"] {
            let text = format!("name,ratio\nwater,{bad}");
            let err = parse(&text).unwrap_err();
            assert!(
                matches!(&err, ParseError::InvalidRatio { line: 2, name, .. } if name == "water"),
                "{bad}: {err}"
            );
        }
    }

    #[test]
    fn trailing_percent_is_accepted() {
        let f = parse("name,ratio\nwater, 86 %\nsugar,14%").unwrap();
        assert_eq!(f.total_ratio(), 100.0);
    }

    #[test]
    fn header_only_has_no_rows() {
        assert!(matches!(parse("name,ratio\n"), Err(ParseError::NoRows)));
        assert!(matches!(parse("name,ratio\n ,5\n"), Err(ParseError::NoRows)));
    }

    #[test]
    fn blank_lines_and_names_are_skipped() {
        let f = parse("name,ratio\n\nwater,90\n,,\n  ,3\nsugar,10\n").unwrap();
        assert_eq!(f.names().collect::<Vec<_>>(), vec!["water", "sugar"]);
    }

    #[test]
    fn duplicates_merge_by_default() {
        let f = parse("name,ratio,amount\nsugar,5,25\nwater,90,\nsugar,5,25").unwrap();
        assert_eq!(f.len(), 2);
        assert_eq!(f.ingredients[0].name, "sugar");
        assert_eq!(f.ingredients[0].ratio_percent, 10.0);
        assert_eq!(f.ingredients[0].amount_grams, Some(50.0));
    }

    #[test]
    fn duplicates_can_be_rejected() {
        let opts = ParseOptions {
            duplicates: DuplicatePolicy::Reject,
            ..Default::default()
        };
        let err = parse_csv_formula("name,ratio\nsugar,5\nsugar,5", &opts).unwrap_err();
        assert!(matches!(err, ParseError::DuplicateIngredient { line: 3, .. }));
    }

    #[test]
    fn unknown_columns_pass_through_or_reject() {
        let text = "name,ratio,supplier\nwater,100,City";
        let f = parse(text).unwrap();
        assert_eq!(f.ingredients[0].extras["supplier"], "City");
        assert!(matches!(
            parse_csv_formula(text, &ParseOptions::strict()),
            Err(ParseError::UnknownColumn(c)) if c == "supplier"
        ));
    }

    #[test]
    fn lenient_amounts() {
        assert_eq!(parse_amount("430ml"), Some(430.0));
        assert_eq!(parse_amount("2.5g"), Some(2.5));
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("approx"), None);
    }

    #[test]
    fn csv_output_has_bom_and_three_decimals() {
        let f = parse("name,ratio,supplier\nwater,86,City\nsugar,14,").unwrap();
        let csv = to_csv(&f, HeaderStyle::English).unwrap();
        assert!(csv.starts_with(BOM));
        insta::assert_snapshot!(csv.trim_start_matches(BOM), @r"
        name,ratioPercent,function,grade,amountGrams,supplier
        water,86.000,,,,City
        sugar,14.000,,,,
        ");
    }

    #[test]
    fn korean_csv_output() {
        let f = parse("name,ratio,amount\n정제수,86,430").unwrap();
        let csv = to_csv(&f, HeaderStyle::Korean).unwrap();
        insta::assert_snapshot!(csv.trim_start_matches(BOM), @r"
        원료명,비율(%),기능,등급,함량(g)
        정제수,86.000,,,430.000
        ");
    }

    #[test]
    fn csv_round_trips_up_to_rounding() {
        let original = parse(
            "name,ratio,function,grade,amount,lot\nwater,85.1234,solvent,potable,425.6,A1\n\"acid, citric\",14.8766,acidulant,E330,,B2",
        )
        .unwrap();
        let back = parse(&to_csv(&original, HeaderStyle::English).unwrap()).unwrap();
        assert_eq!(back.len(), original.len());
        for (a, b) in original.ingredients.iter().zip(&back.ingredients) {
            assert_eq!(a.name, b.name);
            assert_eq!(a.display_ratio(), b.ratio_percent);
            assert_eq!(a.function, b.function);
            assert_eq!(a.extras, b.extras);
            assert_eq!(a.amount_grams, b.amount_grams);
        }
    }

    #[test]
    fn parse_json_and_toml() {
        let json = r#"{"name": "cola", "ingredients": [{"name": "water", "ratioPercent": 86.0}], "metadata": {"brix": 10.5, "pH": 3.2}}"#;
        let f = parse_json(json).unwrap();
        assert_eq!(f.metadata.ph, Some(3.2));

        let toml_str = r#"
name = "cola"

[metadata]
brix = 10.5

[[ingredients]]
name = "water"
ratioPercent = 86.0
function = "solvent"
"#;
        let t = parse_toml(toml_str).unwrap();
        assert_eq!(t.ingredients[0].function, "solvent");
        assert_eq!(t.metadata.brix, Some(10.5));
        assert!(matches!(
            parse_json("{"),
            Err(ParseError::Format { format: "json", .. })
        ));
    }

    #[test]
    fn structured_files_follow_duplicate_policy() {
        let dir = tempfile::tempdir().unwrap();
        let json = dir.path().join("soda.json");
        std::fs::write(
            &json,
            r#"{"ingredients": [
                {"name": " sugar ", "ratioPercent": 5},
                {"name": "water", "ratioPercent": 90},
                {"name": "sugar", "ratioPercent": 5}
            ]}"#,
        )
        .unwrap();

        let f = load_formula(&json, &ParseOptions::default()).unwrap();
        let names: Vec<&str> = f.ingredients.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["sugar", "water"]);
        assert_eq!(f.ingredients[0].ratio_percent, 10.0);

        let err = load_formula(&json, &ParseOptions::strict()).unwrap_err();
        assert!(matches!(
            err,
            ParseError::DuplicateIngredient { line: 3, ref name } if name == "sugar"
        ));

        let toml_path = dir.path().join("soda.toml");
        std::fs::write(
            &toml_path,
            "[[ingredients]]\nname = \"water\"\nratioPercent = 95.0\n\n\
             [[ingredients]]\nname = \"  \"\nratioPercent = 1.0\n\n\
             [[ingredients]]\nname = \"water \"\nratioPercent = 5.0\n",
        )
        .unwrap();
        let t = load_formula(&toml_path, &ParseOptions::default()).unwrap();
        assert_eq!(t.len(), 1);
        assert_eq!(t.ingredients[0].ratio_percent, 100.0);
        assert!(load_formula(&toml_path, &ParseOptions::strict()).is_err());
    }

    #[test]
    fn load_and_find_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let formulas = dir.path().join(".formlab").join("formulas");
        std::fs::create_dir_all(&formulas).unwrap();
        std::fs::write(formulas.join("cola.csv"), "name,ratio\nwater,100\n").unwrap();

        let path = find_formula("cola", dir.path()).unwrap();
        assert_eq!(path, formulas.join("cola.csv"));
        let f = load_formula(&path, &ParseOptions::default()).unwrap();
        assert_eq!(f.name, "cola");
        assert_eq!(f.len(), 1);

        assert!(matches!(
            find_formula("fanta", dir.path()),
            Err(ParseError::NotFound(_))
        ));
    }
}
