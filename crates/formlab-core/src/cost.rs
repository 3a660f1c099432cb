//! Ingredient cost reference and the per-unit cost roll-up.
//!
//! The reference table is a fixed base list plus an additive overlay keyed by
//! ingredient name. Lookups consult the overlay first; the last write to a
//! name wins.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::enums::MatchMode;
use crate::formulation::Formulation;

fn default_unit() -> String {
    "KRW/kg".to_string()
}

fn default_dash() -> String {
    "-".to_string()
}

/// Unit price record for one ingredient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostEntry {
    pub name: String,
    pub unit_price_per_kg: f64,
    #[serde(default = "default_unit")]
    pub unit: String,
    #[serde(default = "default_dash")]
    pub supplier: String,
    #[serde(default = "default_dash")]
    pub moq: String,
}

impl CostEntry {
    pub fn new(name: impl Into<String>, unit_price_per_kg: f64) -> Self {
        Self {
            name: name.into(),
            unit_price_per_kg,
            unit: default_unit(),
            supplier: default_dash(),
            moq: default_dash(),
        }
    }

    pub fn supplier(mut self, supplier: impl Into<String>) -> Self {
        self.supplier = supplier.into();
        self
    }

    pub fn moq(mut self, moq: impl Into<String>) -> Self {
        self.moq = moq.into();
        self
    }
}

/// Resolves an ingredient name to a unit price.
pub trait PriceLookup {
    /// Returns the reference name that matched and its price per kg.
    fn lookup(&self, ingredient: &str) -> Option<(String, f64)>;
}

impl PriceLookup for HashMap<String, f64> {
    fn lookup(&self, ingredient: &str) -> Option<(String, f64)> {
        self.get(ingredient).map(|p| (ingredient.to_string(), *p))
    }
}

/// Base cost table with a runtime overlay.
#[derive(Debug, Clone, Default)]
pub struct CostTable {
    base: Vec<CostEntry>,
    overlay: BTreeMap<String, CostEntry>,
    match_mode: MatchMode,
}

impl CostTable {
    pub fn new(base: Vec<CostEntry>) -> Self {
        Self {
            base,
            overlay: BTreeMap::new(),
            match_mode: MatchMode::default(),
        }
    }

    pub fn with_match_mode(mut self, mode: MatchMode) -> Self {
        self.match_mode = mode;
        self
    }

    pub fn match_mode(&self) -> MatchMode {
        self.match_mode
    }

    /// Adds or replaces an overlay entry. Returns the entry it shadowed, if any.
    pub fn set(&mut self, entry: CostEntry) -> Option<CostEntry> {
        let previous = self.get(&entry.name).cloned();
        self.overlay.insert(entry.name.clone(), entry);
        previous
    }

    /// Applies many overlay entries in order.
    pub fn extend_overlay<I: IntoIterator<Item = CostEntry>>(&mut self, entries: I) {
        for entry in entries {
            self.overlay.insert(entry.name.clone(), entry);
        }
    }

    pub fn overlay(&self) -> impl Iterator<Item = &CostEntry> {
        self.overlay.values()
    }

    pub fn is_overridden(&self, name: &str) -> bool {
        self.overlay.contains_key(name)
    }

    /// Exact lookup, overlay first.
    pub fn get(&self, name: &str) -> Option<&CostEntry> {
        self.overlay
            .get(name)
            .or_else(|| self.base.iter().find(|e| e.name == name))
    }

    /// Effective entries: base order with overrides applied, then overlay-only
    /// names.
    pub fn entries(&self) -> Vec<&CostEntry> {
        let mut out: Vec<&CostEntry> = self
            .base
            .iter()
            .map(|e| self.overlay.get(&e.name).unwrap_or(e))
            .collect();
        out.extend(
            self.overlay
                .values()
                .filter(|e| !self.base.iter().any(|b| b.name == e.name)),
        );
        out
    }

    /// Case-insensitive substring search over effective entries.
    pub fn search(&self, query: &str) -> Vec<&CostEntry> {
        let needle = query.trim().to_lowercase();
        self.entries()
            .into_iter()
            .filter(|e| needle.is_empty() || e.name.to_lowercase().contains(&needle))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn find_containing(&self, ingredient: &str) -> Option<&CostEntry> {
        self.entries()
            .into_iter()
            .filter(|e| {
                !e.name.is_empty() && (ingredient.contains(&e.name) || e.name.contains(ingredient))
            })
            .fold(None, |best: Option<&CostEntry>, e| match best {
                Some(b) if b.name.chars().count() >= e.name.chars().count() => Some(b),
                _ => Some(e),
            })
    }
}

impl PriceLookup for CostTable {
    fn lookup(&self, ingredient: &str) -> Option<(String, f64)> {
        let ingredient = ingredient.trim();
        if ingredient.is_empty() {
            return None;
        }
        let entry = match self.get(ingredient) {
            Some(e) => Some(e),
            None if self.match_mode == MatchMode::Contains => self.find_containing(ingredient),
            None => None,
        };
        entry.map(|e| (e.name.clone(), e.unit_price_per_kg))
    }
}

/// One priced ingredient line.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostLine {
    pub name: String,
    pub ratio_percent: f64,
    pub amount_grams: f64,
    pub unit_price_per_kg: f64,
    pub cost_for_unit: f64,
    /// Reference entry used for the price; empty when nothing matched.
    pub matched_ingredient: String,
}

impl CostLine {
    pub fn is_matched(&self) -> bool {
        !self.matched_ingredient.is_empty()
    }
}

/// Result of [`calc_cost_table`]. Values are unrounded.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostSheet {
    pub basis_volume_ml: f64,
    pub lines: Vec<CostLine>,
    pub total_cost: f64,
}

impl CostSheet {
    /// Names of ingredients that had no reference price.
    pub fn unmatched(&self) -> Vec<&str> {
        self.lines
            .iter()
            .filter(|l| !l.is_matched())
            .map(|l| l.name.as_str())
            .collect()
    }

    /// Share of the total contributed by `line`, in percent.
    pub fn share_percent(&self, line: &CostLine) -> f64 {
        if self.total_cost > 0.0 {
            line.cost_for_unit / self.total_cost * 100.0
        } else {
            0.0
        }
    }

    pub fn total_ratio(&self) -> f64 {
        self.lines.iter().map(|l| l.ratio_percent).sum()
    }
}

/// Prices every ingredient of `formulation` for one unit of `basis_volume_ml`.
///
/// Assumes 1 mL weighs 1 g. Ingredients without a reference price cost 0 and
/// carry an empty `matched_ingredient`.
pub fn calc_cost_table<P>(formulation: &Formulation, prices: &P, basis_volume_ml: f64) -> CostSheet
where
    P: PriceLookup + ?Sized,
{
    let lines: Vec<CostLine> = formulation
        .ingredients
        .iter()
        .map(|row| {
            let amount_grams = row.ratio_percent * basis_volume_ml / 100.0;
            let (matched_ingredient, unit_price_per_kg) =
                prices.lookup(&row.name).unwrap_or_default();
            CostLine {
                name: row.name.clone(),
                ratio_percent: row.ratio_percent,
                amount_grams,
                unit_price_per_kg,
                cost_for_unit: amount_grams / 1000.0 * unit_price_per_kg,
                matched_ingredient,
            }
        })
        .collect();
    let total_cost = lines.iter().map(|l| l.cost_for_unit).sum();
    CostSheet {
        basis_volume_ml,
        lines,
        total_cost,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formulation::FormulationBuilder;

    fn table() -> CostTable {
        CostTable::new(vec![
            CostEntry::new("water", 10.0),
            CostEntry::new("sugar", 1200.0),
            CostEntry::new("flavor", 50_000.0),
        ])
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn water_at_five_hundred_ml() {
        let f = FormulationBuilder::new().ingredient("water", 86.0).build();
        let sheet = calc_cost_table(&f, &table(), 500.0);
        let line = &sheet.lines[0];
        assert!(approx(line.amount_grams, 430.0));
        assert!(approx(line.cost_for_unit, 4.3));
        assert_eq!(line.matched_ingredient, "water");
        assert!(approx(sheet.total_cost, 4.3));
    }

    #[test]
    fn unknown_ingredient_costs_nothing() {
        let f = FormulationBuilder::new()
            .ingredient("water", 90.0)
            .ingredient("unobtainium", 10.0)
            .build();
        let sheet = calc_cost_table(&f, &table(), 500.0);
        assert_eq!(sheet.lines[1].cost_for_unit, 0.0);
        assert_eq!(sheet.lines[1].unit_price_per_kg, 0.0);
        assert_eq!(sheet.lines[1].matched_ingredient, "");
        assert_eq!(sheet.unmatched(), vec!["unobtainium"]);
    }

    #[test]
    fn total_is_homogeneous_in_ratios() {
        let f = FormulationBuilder::new()
            .ingredient("water", 86.0)
            .ingredient("sugar", 11.0)
            .ingredient("flavor", 0.3)
            .build();
        let base = calc_cost_table(&f, &table(), 500.0).total_cost;
        for k in [0.5, 2.0, 3.7] {
            let scaled = calc_cost_table(&f.scaled(k), &table(), 500.0).total_cost;
            assert!(approx(scaled, base * k), "k = {k}");
        }
    }

    #[test]
    fn overlay_wins_over_base() {
        let mut t = table();
        let previous = t.set(CostEntry::new("water", 20.0));
        assert_eq!(previous.unwrap().unit_price_per_kg, 10.0);
        assert_eq!(t.get("water").unwrap().unit_price_per_kg, 20.0);
        // later write wins
        t.set(CostEntry::new("water", 30.0));
        assert_eq!(t.lookup("water"), Some(("water".to_string(), 30.0)));
        assert_eq!(t.len(), 3);
    }

    #[test]
    fn overlay_can_add_new_names() {
        let mut t = table();
        t.set(CostEntry::new("taurine", 18_000.0).supplier("Acme"));
        let names: Vec<&str> = t.entries().into_iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["water", "sugar", "flavor", "taurine"]);
        assert!(t.is_overridden("taurine"));
    }

    #[test]
    fn contains_mode_picks_longest_reference() {
        let t = CostTable::new(vec![
            CostEntry::new("flavor", 50_000.0),
            CostEntry::new("lemon flavor", 60_000.0),
        ])
        .with_match_mode(MatchMode::Contains);
        assert_eq!(
            t.lookup("natural lemon flavor"),
            Some(("lemon flavor".to_string(), 60_000.0))
        );
        assert_eq!(t.lookup("salt"), None);

        let exact = CostTable::new(vec![CostEntry::new("flavor", 50_000.0)]);
        assert_eq!(exact.lookup("natural flavor"), None);
    }

    #[test]
    fn plain_map_is_a_price_lookup() {
        let prices = HashMap::from([("water".to_string(), 10.0)]);
        let f = FormulationBuilder::new().ingredient("water", 86.0).build();
        let sheet = calc_cost_table(&f, &prices, 500.0);
        assert!(approx(sheet.total_cost, 4.3));
    }

    #[test]
    fn share_percent_of_zero_total() {
        let f = FormulationBuilder::new().ingredient("air", 100.0).build();
        let sheet = calc_cost_table(&f, &table(), 500.0);
        assert_eq!(sheet.share_percent(&sheet.lines[0]), 0.0);
    }

    #[test]
    fn search_is_case_insensitive() {
        let t = table();
        let hits: Vec<&str> = t.search("SUG").into_iter().map(|e| e.name.as_str()).collect();
        assert_eq!(hits, vec!["sugar"]);
        assert_eq!(t.search("").len(), 3);
    }
}
