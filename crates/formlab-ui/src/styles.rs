//! Ayu color theme and styling functions for formlab output.
//!
//! Uses the Ayu Dark color palette.
//! Color source: <https://github.com/ayu-theme/ayu-colors>
//!
//! Only states that need attention get color: failing checks, missing label
//! items, high-risk steps and out-of-tolerance comparisons. Everything else
//! is standard text.

use formlab_core::enums::{LabelStatus, RiskLevel, Verdict};
use owo_colors::OwoColorize;

use crate::terminal::supports_color;

// ---------------------------------------------------------------------------
// Ayu Dark color palette (RGB values)
// ---------------------------------------------------------------------------

const PASS: (u8, u8, u8) = (0xc2, 0xd9, 0x4c); // #c2d94c - bright green
const WARN: (u8, u8, u8) = (0xff, 0xb4, 0x54); // #ffb454 - bright yellow
const FAIL: (u8, u8, u8) = (0xf0, 0x71, 0x78); // #f07178 - bright red
const MUTED: (u8, u8, u8) = (0x6c, 0x76, 0x80); // #6c7680 - muted gray
const ACCENT: (u8, u8, u8) = (0x59, 0xc2, 0xff); // #59c2ff - bright blue
const ORANGE: (u8, u8, u8) = (0xff, 0x8f, 0x40); // #ff8f40
const PURPLE: (u8, u8, u8) = (0xd2, 0xa6, 0xff); // #d2a6ff

// ---------------------------------------------------------------------------
// Icons
// ---------------------------------------------------------------------------

pub const ICON_PASS: &str = "\u{2713}"; // ✓
pub const ICON_WARN: &str = "\u{26A0}"; // ⚠
pub const ICON_FAIL: &str = "\u{2716}"; // ✖
pub const ICON_SKIP: &str = "-";

/// Risk level marker (filled circle, colored by level).
pub const RISK_ICON: &str = "\u{25CF}"; // ●

fn color_str(s: &str, rgb: (u8, u8, u8)) -> String {
    if supports_color() {
        s.truecolor(rgb.0, rgb.1, rgb.2).to_string()
    } else {
        s.to_string()
    }
}

fn color_bold_str(s: &str, rgb: (u8, u8, u8)) -> String {
    if supports_color() {
        s.truecolor(rgb.0, rgb.1, rgb.2).bold().to_string()
    } else {
        s.to_string()
    }
}

// ---------------------------------------------------------------------------
// Core semantic render helpers
// ---------------------------------------------------------------------------

pub fn render_warn(s: &str) -> String {
    color_str(s, WARN)
}

pub fn render_muted(s: &str) -> String {
    color_str(s, MUTED)
}

pub fn render_accent(s: &str) -> String {
    color_str(s, ACCENT)
}

pub fn render_bold(s: &str) -> String {
    if supports_color() {
        s.bold().to_string()
    } else {
        s.to_string()
    }
}

/// Renders a section header in accent color and bold.
pub fn render_category(s: &str) -> String {
    color_bold_str(s, ACCENT)
}

pub fn render_pass_icon() -> String {
    color_str(ICON_PASS, PASS)
}

pub fn render_warn_icon() -> String {
    color_str(ICON_WARN, WARN)
}

pub fn render_fail_icon() -> String {
    color_str(ICON_FAIL, FAIL)
}

pub fn render_skip_icon() -> String {
    color_str(ICON_SKIP, MUTED)
}

// ---------------------------------------------------------------------------
// Domain renderers
// ---------------------------------------------------------------------------

/// Comparison verdicts: identical is plain, differences are colored by
/// direction, one-sided rows are purple/muted.
pub fn render_verdict(verdict: Verdict) -> String {
    let s = verdict.as_str();
    match verdict {
        Verdict::Identical => s.to_string(),
        Verdict::Excess => color_str(s, ORANGE),
        Verdict::Deficient => color_str(s, ACCENT),
        Verdict::MineOnly => color_str(s, PURPLE),
        Verdict::StandardOnly => color_str(s, MUTED),
    }
}

/// Risk level with icon, e.g. `● high`. High is bold red.
pub fn render_risk(level: RiskLevel) -> String {
    let label = format!("{} {}", RISK_ICON, level.as_str());
    match level {
        RiskLevel::High => color_bold_str(&label, FAIL),
        RiskLevel::Mid => color_str(&label, WARN),
        RiskLevel::Low => color_str(&label, PASS),
    }
}

/// CCP marker column: a check for control points, a dash otherwise.
pub fn render_ccp(is_ccp: bool) -> String {
    if is_ccp {
        color_bold_str(ICON_PASS, FAIL)
    } else {
        render_skip_icon()
    }
}

pub fn render_label_status(status: LabelStatus) -> String {
    let s = status.as_str();
    match status {
        LabelStatus::Filled => color_str(s, PASS),
        LabelStatus::Missing => color_bold_str(s, FAIL),
        LabelStatus::Optional | LabelStatus::NotDrafted => color_str(s, MUTED),
    }
}

/// Signed percentage, green when positive and red when negative.
pub fn render_growth(growth: Option<f64>) -> String {
    match growth {
        None => render_muted("-"),
        Some(g) if g > 0.0 => color_str(&format!("+{g:.1}%"), PASS),
        Some(g) if g < 0.0 => color_str(&format!("{g:.1}%"), FAIL),
        Some(g) => format!("{g:.1}%"),
    }
}

/// Overall outcome line for a check: `✓ PASS`, or `✖ FAIL`.
pub fn render_outcome(passed: bool) -> String {
    if passed {
        format!("{} {}", render_pass_icon(), color_bold_str("PASS", PASS))
    } else {
        format!("{} {}", render_fail_icon(), color_bold_str("FAIL", FAIL))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // NO_COLOR may or may not be set in the test environment; assertions only
    // look for the visible text.

    #[test]
    fn verdict_contains_name() {
        for v in Verdict::ALL {
            assert!(render_verdict(*v).contains(v.as_str()));
        }
    }

    #[test]
    fn risk_contains_icon_and_level() {
        let high = render_risk(RiskLevel::High);
        assert!(high.contains(RISK_ICON));
        assert!(high.contains("high"));
    }

    #[test]
    fn growth_formats_sign() {
        assert!(render_growth(Some(12.345)).contains("+12.3%"));
        assert!(render_growth(Some(-4.0)).contains("-4.0%"));
        assert!(render_growth(None).contains('-'));
    }

    #[test]
    fn outcome_text() {
        assert!(render_outcome(true).contains("PASS"));
        assert!(render_outcome(false).contains("FAIL"));
        assert!(render_label_status(LabelStatus::Missing).contains("missing"));
        assert!(render_ccp(false).contains('-'));
    }
}
