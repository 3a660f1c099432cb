//! Terminal detection and text measurement.

use std::env;

/// Returns `true` if stdout is connected to a terminal (TTY).
pub fn is_tty() -> bool {
    crossterm::tty::IsTty::is_tty(&std::io::stdout())
}

/// Determines if ANSI color codes should be used.
///
/// Respects standard conventions:
/// - `NO_COLOR` (any value): disables color (<https://no-color.org/>)
/// - `CLICOLOR=0`: disables color
/// - `TERM=dumb`: disables color
/// - `CLICOLOR_FORCE` (any value): forces color even in non-TTY
/// - Falls back to TTY detection
pub fn supports_color() -> bool {
    if env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if env::var("CLICOLOR").as_deref() == Ok("0") {
        return false;
    }
    if env::var("TERM").as_deref() == Ok("dumb") {
        return false;
    }
    if env::var_os("CLICOLOR_FORCE").is_some() {
        return true;
    }
    is_tty()
}

/// Returns `true` for characters that occupy two terminal columns
/// (Hangul, CJK ideographs, fullwidth forms, most emoji).
fn is_wide(c: char) -> bool {
    matches!(c as u32,
        0x1100..=0x115F
        | 0x2E80..=0x303E
        | 0x3041..=0x33FF
        | 0x3400..=0x4DBF
        | 0x4E00..=0x9FFF
        | 0xA960..=0xA97F
        | 0xAC00..=0xD7A3
        | 0xF900..=0xFAFF
        | 0xFE30..=0xFE4F
        | 0xFF00..=0xFF60
        | 0xFFE0..=0xFFE6
        | 0x1F300..=0x1F64F
        | 0x1F900..=0x1F9FF
        | 0x20000..=0x3FFFD)
}

/// Number of terminal columns `s` occupies. ANSI color sequences count as zero.
pub fn display_width(s: &str) -> usize {
    let mut width = 0;
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\u{1b}' {
            // skip to the end of the CSI sequence
            for c in chars.by_ref() {
                if c.is_ascii_alphabetic() {
                    break;
                }
            }
            continue;
        }
        if c.is_control() || matches!(c, '\u{200B}'..='\u{200F}' | '\u{FE0F}') {
            continue;
        }
        width += if is_wide(c) { 2 } else { 1 };
    }
    width
}

/// Pads `s` on the right to `width` display columns.
pub fn pad_right(s: &str, width: usize) -> String {
    let current = display_width(s);
    if current >= width {
        s.to_string()
    } else {
        format!("{s}{}", " ".repeat(width - current))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hangul_is_double_width() {
        assert_eq!(display_width("abc"), 3);
        assert_eq!(display_width("정제수"), 6);
        assert_eq!(display_width("구연산 2.5g"), 11);
    }

    #[test]
    fn ansi_sequences_are_invisible() {
        assert_eq!(display_width("\u{1b}[38;2;194;217;76m설탕\u{1b}[39m"), 4);
    }

    #[test]
    fn pad_right_uses_display_width() {
        assert_eq!(pad_right("설탕", 6), "설탕  ");
        assert_eq!(pad_right("toolong", 3), "toolong");
    }
}
