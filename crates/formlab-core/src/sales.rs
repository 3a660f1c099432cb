//! Market sales figures by product category and year.

use serde::{Deserialize, Serialize};

/// Yearly sales of one category, aligned with [`SalesTable::years`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesSeries {
    pub category: String,
    pub values: Vec<f64>,
}

/// Sales per category over a run of years. Units are the caller's (the
/// bundled data is in millions of KRW).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalesTable {
    pub years: Vec<String>,
    pub series: Vec<SalesSeries>,
}

/// Ranking entry for the latest year.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesRank {
    pub rank: usize,
    pub category: String,
    pub latest: f64,
    /// Growth against the previous year in percent.
    pub growth_percent: Option<f64>,
}

impl SalesTable {
    pub fn latest_year(&self) -> Option<&str> {
        self.years.last().map(String::as_str)
    }

    fn year_index(&self, year: &str) -> Option<usize> {
        self.years.iter().position(|y| y == year)
    }

    pub fn get(&self, category: &str) -> Option<&SalesSeries> {
        self.series.iter().find(|s| s.category == category)
    }

    pub fn value(&self, category: &str, year: &str) -> Option<f64> {
        let idx = self.year_index(year)?;
        self.get(category)?.values.get(idx).copied()
    }

    /// Categories sorted by latest-year value, largest first. Ties keep
    /// table order.
    pub fn sorted_categories(&self) -> Vec<&SalesSeries> {
        let mut out: Vec<&SalesSeries> = self.series.iter().collect();
        out.sort_by(|a, b| {
            let va = a.values.last().copied().unwrap_or(0.0);
            let vb = b.values.last().copied().unwrap_or(0.0);
            vb.total_cmp(&va)
        });
        out
    }

    /// Mean across categories for each year.
    pub fn yearly_averages(&self) -> Vec<f64> {
        (0..self.years.len())
            .map(|i| {
                let vals: Vec<f64> = self
                    .series
                    .iter()
                    .filter_map(|s| s.values.get(i).copied())
                    .collect();
                if vals.is_empty() {
                    0.0
                } else {
                    vals.iter().sum::<f64>() / vals.len() as f64
                }
            })
            .collect()
    }

    /// Percent change of `category` in `year` against the year before.
    /// `None` for the first year or when the previous value is 0.
    pub fn growth_percent(&self, category: &str, year: &str) -> Option<f64> {
        let idx = self.year_index(year)?;
        let prev_idx = idx.checked_sub(1)?;
        let values = &self.get(category)?.values;
        let current = *values.get(idx)?;
        let previous = *values.get(prev_idx)?;
        if previous == 0.0 {
            return None;
        }
        Some((current - previous) / previous * 100.0)
    }

    /// Top `limit` categories in the latest year with their growth.
    pub fn ranking(&self, limit: usize) -> Vec<SalesRank> {
        let Some(latest_year) = self.latest_year() else {
            return Vec::new();
        };
        self.sorted_categories()
            .into_iter()
            .take(limit)
            .enumerate()
            .map(|(i, s)| SalesRank {
                rank: i + 1,
                category: s.category.clone(),
                latest: s.values.last().copied().unwrap_or(0.0),
                growth_percent: self.growth_percent(&s.category, latest_year),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn table() -> SalesTable {
        SalesTable {
            years: vec!["2022".into(), "2023".into(), "2024".into()],
            series: vec![
                SalesSeries {
                    category: "juice".into(),
                    values: vec![100.0, 120.0, 90.0],
                },
                SalesSeries {
                    category: "cola".into(),
                    values: vec![200.0, 200.0, 250.0],
                },
                SalesSeries {
                    category: "kombucha".into(),
                    values: vec![0.0, 0.0, 30.0],
                },
            ],
        }
    }

    #[test]
    fn sorted_by_latest_year_descending() {
        let t = table();
        let names: Vec<&str> = t
            .sorted_categories()
            .into_iter()
            .map(|s| s.category.as_str())
            .collect();
        assert_eq!(names, vec!["cola", "juice", "kombucha"]);
    }

    #[test]
    fn growth_against_previous_year() {
        let t = table();
        assert_eq!(t.growth_percent("cola", "2024"), Some(25.0));
        assert_eq!(t.growth_percent("juice", "2024"), Some(-25.0));
        assert_eq!(t.growth_percent("kombucha", "2024"), None);
        assert_eq!(t.growth_percent("cola", "2022"), None);
        assert_eq!(t.growth_percent("tea", "2024"), None);
    }

    #[test]
    fn averages_per_year() {
        assert_eq!(table().yearly_averages(), vec![100.0, 320.0 / 3.0, 370.0 / 3.0]);
    }

    #[test]
    fn ranking_is_limited() {
        let ranks = table().ranking(2);
        assert_eq!(ranks.len(), 2);
        assert_eq!(ranks[0].rank, 1);
        assert_eq!(ranks[0].category, "cola");
        assert_eq!(ranks[1].growth_percent, Some(-25.0));
        assert_eq!(table().value("juice", "2023"), Some(120.0));
    }
}
