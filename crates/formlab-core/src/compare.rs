//! Side-by-side comparison of two formulations.

use std::collections::HashMap;

use serde::Serialize;

use crate::enums::Verdict;
use crate::formulation::{Formulation, round3};

/// Differences at or below this magnitude count as identical.
const IDENTICAL_TOLERANCE: f64 = 0.001;

/// One joined ingredient of a comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonRow {
    pub name: String,
    pub mine_percent: f64,
    pub standard_percent: f64,
    pub diff_percent: f64,
    pub verdict: Verdict,
}

/// Row counts per verdict.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ComparisonSummary {
    pub identical: usize,
    pub excess: usize,
    pub deficient: usize,
    pub mine_only: usize,
    pub standard_only: usize,
}

impl ComparisonSummary {
    pub fn from_rows(rows: &[ComparisonRow]) -> Self {
        let mut summary = Self::default();
        for row in rows {
            match row.verdict {
                Verdict::Identical => summary.identical += 1,
                Verdict::Excess => summary.excess += 1,
                Verdict::Deficient => summary.deficient += 1,
                Verdict::MineOnly => summary.mine_only += 1,
                Verdict::StandardOnly => summary.standard_only += 1,
            }
        }
        summary
    }
}

/// Sums ratios by name, keeping first-seen order.
fn ratio_index(formulation: &Formulation) -> (Vec<&str>, HashMap<&str, f64>) {
    let mut order = Vec::new();
    let mut ratios: HashMap<&str, f64> = HashMap::new();
    for row in &formulation.ingredients {
        let name = row.name.as_str();
        match ratios.get_mut(name) {
            Some(total) => *total += row.ratio_percent,
            None => {
                order.push(name);
                ratios.insert(name, row.ratio_percent);
            }
        }
    }
    (order, ratios)
}

fn classify(mine: Option<f64>, standard: Option<f64>, diff: f64) -> Verdict {
    match (mine, standard) {
        (Some(_), Some(_)) if diff.abs() <= IDENTICAL_TOLERANCE => Verdict::Identical,
        (None, Some(_)) => Verdict::StandardOnly,
        (Some(_), None) => Verdict::MineOnly,
        _ if diff > IDENTICAL_TOLERANCE => Verdict::Excess,
        _ => Verdict::Deficient,
    }
}

/// Full outer join of `mine` and `standard` on exact ingredient name.
///
/// Rows follow `mine`'s order, then names found only in `standard`. An empty
/// input on either side yields an empty result: there is nothing to compare.
pub fn compare_formulations(mine: &Formulation, standard: &Formulation) -> Vec<ComparisonRow> {
    if mine.is_empty() || standard.is_empty() {
        return Vec::new();
    }

    let (mine_order, mine_ratios) = ratio_index(mine);
    let (standard_order, standard_ratios) = ratio_index(standard);

    let names = mine_order.iter().chain(
        standard_order
            .iter()
            .filter(|name| !mine_ratios.contains_key(*name)),
    );

    names
        .map(|name| {
            let m = mine_ratios.get(name).copied();
            let s = standard_ratios.get(name).copied();
            let diff = round3(m.unwrap_or(0.0) - s.unwrap_or(0.0));
            ComparisonRow {
                name: (*name).to_string(),
                mine_percent: m.unwrap_or(0.0),
                standard_percent: s.unwrap_or(0.0),
                diff_percent: diff,
                verdict: classify(m, s, diff),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formulation::FormulationBuilder;
    use pretty_assertions::assert_eq;

    fn mine() -> Formulation {
        FormulationBuilder::new()
            .ingredient("water", 86.0)
            .ingredient("sugar", 11.0)
            .build()
    }

    fn standard() -> Formulation {
        FormulationBuilder::new()
            .ingredient("water", 80.0)
            .ingredient("sugar", 11.0)
            .ingredient("flavor", 9.0)
            .build()
    }

    #[test]
    fn water_excess_sugar_identical_flavor_standard_only() {
        let rows = compare_formulations(&mine(), &standard());
        let got: Vec<(&str, f64, Verdict)> = rows
            .iter()
            .map(|r| (r.name.as_str(), r.diff_percent, r.verdict))
            .collect();
        assert_eq!(
            got,
            vec![
                ("water", 6.0, Verdict::Excess),
                ("sugar", 0.0, Verdict::Identical),
                ("flavor", -9.0, Verdict::StandardOnly),
            ]
        );
    }

    #[test]
    fn swapping_sides_swaps_verdicts() {
        let forward = compare_formulations(&mine(), &standard());
        let backward = compare_formulations(&standard(), &mine());
        for row in &forward {
            let other = backward.iter().find(|r| r.name == row.name).unwrap();
            assert_eq!(other.verdict, row.verdict.swapped(), "row {}", row.name);
            assert_eq!(other.diff_percent, -row.diff_percent);
        }
        assert_eq!(forward.len(), backward.len());
    }

    #[test]
    fn mine_only_and_deficient() {
        let a = FormulationBuilder::new()
            .ingredient("water", 70.0)
            .ingredient("taurine", 0.2)
            .build();
        let b = FormulationBuilder::new().ingredient("water", 80.0).build();
        let rows = compare_formulations(&a, &b);
        assert_eq!(rows[0].verdict, Verdict::Deficient);
        assert_eq!(rows[1].verdict, Verdict::MineOnly);
        assert_eq!(rows[1].standard_percent, 0.0);
    }

    #[test]
    fn tiny_differences_are_identical() {
        let a = FormulationBuilder::new().ingredient("acid", 0.5004).build();
        let b = FormulationBuilder::new().ingredient("acid", 0.5).build();
        let rows = compare_formulations(&a, &b);
        assert_eq!(rows[0].verdict, Verdict::Identical);
        assert_eq!(rows[0].diff_percent, 0.0);
    }

    #[test]
    fn names_match_case_sensitively() {
        let a = FormulationBuilder::new().ingredient("Water", 100.0).build();
        let b = FormulationBuilder::new().ingredient("water", 100.0).build();
        let verdicts: Vec<Verdict> = compare_formulations(&a, &b)
            .into_iter()
            .map(|r| r.verdict)
            .collect();
        assert_eq!(verdicts, vec![Verdict::MineOnly, Verdict::StandardOnly]);
    }

    #[test]
    fn empty_side_yields_nothing() {
        assert!(compare_formulations(&Formulation::default(), &standard()).is_empty());
        assert!(compare_formulations(&mine(), &Formulation::default()).is_empty());
    }

    #[test]
    fn summary_counts_verdicts() {
        let rows = compare_formulations(&mine(), &standard());
        let summary = ComparisonSummary::from_rows(&rows);
        assert_eq!(summary.excess, 1);
        assert_eq!(summary.identical, 1);
        assert_eq!(summary.standard_only, 1);
        assert_eq!(summary.mine_only, 0);
    }
}
