//! Manufacturing process steps and their hazard assessment.

use serde::{Deserialize, Serialize};

use crate::document::TextDocument;
use crate::enums::RiskLevel;

/// One step of a manufacturing process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessStep {
    pub id: u32,
    #[serde(default)]
    pub icon: String,
    pub name: String,
    /// Hazard introduced or controlled at this step.
    pub risk: String,
    /// Control measure and its critical limit.
    pub control: String,
    pub level: RiskLevel,
}

impl ProcessStep {
    /// A step is a critical control point when its risk level is high.
    pub fn is_ccp(&self) -> bool {
        self.level.is_ccp()
    }

    /// Search terms for this step: the full name and its `·`-separated parts.
    pub fn keywords(&self) -> Vec<&str> {
        let mut out = vec![self.name.trim()];
        if self.name.contains('·') {
            out.extend(
                self.name
                    .split('·')
                    .map(str::trim)
                    .filter(|part| !part.is_empty()),
            );
        }
        out
    }

    /// Returns `true` when `text` mentions this step.
    pub fn is_mentioned_in(&self, text: &str) -> bool {
        self.keywords().iter().any(|k| text.contains(k))
    }
}

/// Steps designated as critical control points, in process order.
pub fn ccp_steps(steps: &[ProcessStep]) -> Vec<&ProcessStep> {
    steps.iter().filter(|s| s.is_ccp()).collect()
}

/// Number of documents that mention `step`.
pub fn count_mentions(step: &ProcessStep, docs: &[TextDocument]) -> usize {
    docs.iter().filter(|d| step.is_mentioned_in(&d.text)).count()
}

/// Per-level step counts, highest level first.
pub fn risk_profile(steps: &[ProcessStep]) -> Vec<(RiskLevel, usize)> {
    RiskLevel::ALL
        .iter()
        .map(|level| (*level, steps.iter().filter(|s| s.level == *level).count()))
        .collect()
}

/// Renders the steps as a one-line flow, e.g. `intake → dissolve → fill`.
pub fn flow_line(steps: &[ProcessStep]) -> String {
    steps
        .iter()
        .map(|s| s.name.as_str())
        .collect::<Vec<_>>()
        .join(" → ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn step(id: u32, name: &str, level: RiskLevel) -> ProcessStep {
        ProcessStep {
            id,
            icon: String::new(),
            name: name.to_string(),
            risk: "r".to_string(),
            control: "c".to_string(),
            level,
        }
    }

    fn steps() -> Vec<ProcessStep> {
        vec![
            step(1, "원료 입고", RiskLevel::Mid),
            step(2, "살균", RiskLevel::High),
            step(3, "냉각·충전", RiskLevel::High),
            step(4, "출하", RiskLevel::Low),
        ]
    }

    #[test]
    fn only_high_steps_are_ccp() {
        let ids: Vec<u32> = ccp_steps(&steps()).iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn compound_names_split_into_keywords() {
        let s = step(3, "냉각·충전", RiskLevel::High);
        assert_eq!(s.keywords(), vec!["냉각·충전", "냉각", "충전"]);
        assert_eq!(step(1, "살균", RiskLevel::High).keywords(), vec!["살균"]);
    }

    #[test]
    fn mentions_count_documents_not_occurrences() {
        let docs = vec![
            TextDocument::new("a", "충전 공정 후 충전량을 확인한다"),
            TextDocument::new("b", "살균 온도 기록"),
            TextDocument::new("c", "냉각수 관리"),
        ];
        let all = steps();
        assert_eq!(count_mentions(&all[2], &docs), 2);
        assert_eq!(count_mentions(&all[1], &docs), 1);
        assert_eq!(count_mentions(&all[3], &docs), 0);
    }

    #[test]
    fn profile_and_flow() {
        let all = steps();
        assert_eq!(
            risk_profile(&all),
            vec![(RiskLevel::High, 2), (RiskLevel::Mid, 1), (RiskLevel::Low, 1)]
        );
        assert_eq!(flow_line(&all[..2]), "원료 입고 → 살균");
    }
}
