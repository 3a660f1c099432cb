//! Enum types for the formlab system.
//!
//! Each enum has:
//! - Custom Serialize (as kebab-case string)
//! - Custom Deserialize (known variants only, anything else is rejected)
//! - `as_str()`, `is_default()`, `FromStr` and `Display` impls

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Error returned when a string does not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}' (expected one of: {expected})")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
    pub expected: String,
}

// ---------------------------------------------------------------------------
// Macro: defines a closed enum with string forms.
// ---------------------------------------------------------------------------
macro_rules! define_enum {
    (
        $(#[$meta:meta])*
        $name:ident, kind = $kind:literal, default = $default:ident,
        variants: [
            $( ($variant:ident, $str:literal) ),+ $(,)?
        ]
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $variant, )+
        }

        impl $name {
            /// All variants in declaration order.
            pub const ALL: &'static [$name] = &[ $( Self::$variant, )+ ];

            /// Returns the string representation.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( Self::$variant => $str, )+
                }
            }

            /// Returns `true` if this is the default variant.
            pub fn is_default(&self) -> bool {
                *self == Self::$default
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::$default
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $( $str => Ok(Self::$variant), )+
                    _ => Err(UnknownVariant {
                        kind: $kind,
                        value: s.to_owned(),
                        expected: [$( $str ),+].join(", "),
                    }),
                }
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

// ===========================================================================
// Verdict
// ===========================================================================

define_enum! {
    /// Classification of one ingredient when comparing two formulations.
    Verdict, kind = "verdict", default = Identical,
    variants: [
        (Identical, "identical"),
        (Excess, "excess"),
        (Deficient, "deficient"),
        (MineOnly, "mine-only"),
        (StandardOnly, "standard-only"),
    ]
}

impl Verdict {
    /// The verdict the same row gets when the two sides are swapped.
    pub fn swapped(self) -> Self {
        match self {
            Self::Identical => Self::Identical,
            Self::Excess => Self::Deficient,
            Self::Deficient => Self::Excess,
            Self::MineOnly => Self::StandardOnly,
            Self::StandardOnly => Self::MineOnly,
        }
    }
}

// ===========================================================================
// RiskLevel
// ===========================================================================

define_enum! {
    /// Hazard level of a process step.
    RiskLevel, kind = "risk level", default = Low,
    variants: [
        (High, "high"),
        (Mid, "mid"),
        (Low, "low"),
    ]
}

impl RiskLevel {
    /// Numeric score used for ranking (high = 3, mid = 2, low = 1).
    pub fn score(self) -> u8 {
        match self {
            Self::High => 3,
            Self::Mid => 2,
            Self::Low => 1,
        }
    }

    /// Only high-risk steps are designated critical control points.
    pub fn is_ccp(self) -> bool {
        self == Self::High
    }
}

// ===========================================================================
// Parser policies
// ===========================================================================

define_enum! {
    /// What the CSV parser does when an ingredient name appears twice.
    DuplicatePolicy, kind = "duplicate policy", default = Merge,
    variants: [
        (Merge, "merge"),
        (Reject, "reject"),
    ]
}

define_enum! {
    /// What the CSV parser does with columns it does not recognize.
    UnknownColumns, kind = "unknown-column policy", default = Passthrough,
    variants: [
        (Passthrough, "passthrough"),
        (Reject, "reject"),
    ]
}

define_enum! {
    /// Header set written by the CSV serializer.
    HeaderStyle, kind = "header style", default = English,
    variants: [
        (English, "english"),
        (Korean, "korean"),
    ]
}

// ===========================================================================
// MatchMode
// ===========================================================================

define_enum! {
    /// How ingredient names are matched against the cost reference.
    MatchMode, kind = "match mode", default = Exact,
    variants: [
        (Exact, "exact"),
        (Contains, "contains"),
    ]
}

// ===========================================================================
// LabelStatus
// ===========================================================================

define_enum! {
    /// Completeness state of one label requirement.
    LabelStatus, kind = "label status", default = NotDrafted,
    variants: [
        (Filled, "filled"),
        (Missing, "missing"),
        (Optional, "optional"),
        (NotDrafted, "not-drafted"),
    ]
}

// ===========================================================================
// AnalysisTopic
// ===========================================================================

define_enum! {
    /// What a process analysis request asks about.
    AnalysisTopic, kind = "analysis topic", default = Overall,
    variants: [
        (Overall, "overall"),
        (Ccp, "ccp"),
        (Sterilization, "sterilization"),
        (RawMaterials, "raw-materials"),
        (Hygiene, "hygiene"),
        (Custom, "custom"),
    ]
}

impl AnalysisTopic {
    /// Heading used in prompts and reports.
    pub fn title(self) -> &'static str {
        match self {
            Self::Overall => "전체 공정 리스크 분석",
            Self::Ccp => "HACCP CCP 검토",
            Self::Sterilization => "살균 공정 적정성",
            Self::RawMaterials => "원료 안전성 검토",
            Self::Hygiene => "제조환경 위생관리",
            Self::Custom => "사용자 정의 질문",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analysis_topic_titles() {
        assert_eq!("raw-materials".parse::<AnalysisTopic>().unwrap(), AnalysisTopic::RawMaterials);
        assert_eq!(AnalysisTopic::Ccp.title(), "HACCP CCP 검토");
    }

    #[test]
    fn verdict_roundtrips_through_str() {
        for v in Verdict::ALL {
            assert_eq!(v.as_str().parse::<Verdict>().unwrap(), *v);
        }
    }

    #[test]
    fn verdict_swap_is_an_involution() {
        for v in Verdict::ALL {
            assert_eq!(v.swapped().swapped(), *v);
        }
        assert_eq!(Verdict::Excess.swapped(), Verdict::Deficient);
        assert_eq!(Verdict::MineOnly.swapped(), Verdict::StandardOnly);
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("MERGE".parse::<DuplicatePolicy>().unwrap(), DuplicatePolicy::Merge);
        assert_eq!(" Korean ".parse::<HeaderStyle>().unwrap(), HeaderStyle::Korean);
    }

    #[test]
    fn unknown_variant_lists_expected_values() {
        let err = "maybe".parse::<MatchMode>().unwrap_err();
        assert_eq!(err.value, "maybe");
        assert!(err.to_string().contains("exact, contains"));
    }

    #[test]
    fn serde_uses_kebab_strings() {
        let json = serde_json::to_string(&Verdict::StandardOnly).unwrap();
        assert_eq!(json, "\"standard-only\"");
        let back: Verdict = serde_json::from_str("\"mine-only\"").unwrap();
        assert_eq!(back, Verdict::MineOnly);
        assert!(serde_json::from_str::<Verdict>("\"better\"").is_err());
    }

    #[test]
    fn risk_scores_and_ccp() {
        assert_eq!(RiskLevel::High.score(), 3);
        assert_eq!(RiskLevel::Low.score(), 1);
        assert!(RiskLevel::High.is_ccp());
        assert!(!RiskLevel::Mid.is_ccp());
    }

    #[test]
    fn defaults() {
        assert!(DuplicatePolicy::default().is_default());
        assert_eq!(UnknownColumns::default(), UnknownColumns::Passthrough);
        assert_eq!(MatchMode::default(), MatchMode::Exact);
    }
}
