//! Display depth of a rule label from its numbering shape.
//!
//! - `"1. "`      → 1
//! - `"1.1 "`     → 2
//! - `"1.1.1 "`   → 3
//! - `"(1)"`      → 4
//! - anything else, headings included → 2

use std::sync::LazyLock;

use regex::Regex;

/// Depth used for labels with no recognised numbering.
pub const DEFAULT_LEVEL: u8 = 2;

static LEVEL_PATTERNS: LazyLock<[(Regex, u8); 4]> = LazyLock::new(|| {
    let re = |p: &str| Regex::new(p).expect("invalid level regex");
    [
        (re(r"^\d+\.\s"), 1),
        (re(r"^\d+\.\d+\s"), 2),
        (re(r"^\d+\.\d+\.\d+\s"), 3),
        (re(r"^\(\d+\)"), 4),
    ]
});

/// Classify a label into a depth between 1 and 4.
pub fn classify_level(label: &str) -> u8 {
    LEVEL_PATTERNS
        .iter()
        .find(|(re, _)| re.is_match(label))
        .map_or(DEFAULT_LEVEL, |(_, level)| *level)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_table() {
        let cases = [
            ("1. Foo", 1),
            ("1.1 Foo", 2),
            ("1.1.1 Foo", 3),
            ("(1) Foo", 4),
            ("Foo", 2),
        ];
        for (label, expected) in cases {
            assert_eq!(classify_level(label), expected, "label {label:?}");
        }
    }

    #[test]
    fn deeper_numbers_are_not_level_one() {
        assert_eq!(classify_level("12.3.45 계약 체결"), 3);
        assert_eq!(classify_level("10. 총칙"), 1);
    }

    #[test]
    fn unanchored_numbers_fall_back() {
        assert_eq!(classify_level("제1절 구매계획"), DEFAULT_LEVEL);
        assert_eq!(classify_level("[1-1 이사회]"), DEFAULT_LEVEL);
        assert_eq!(classify_level(" 1.1 leading space"), DEFAULT_LEVEL);
        assert_eq!(classify_level("1.6.1(2) 목"), DEFAULT_LEVEL);
        assert_eq!(classify_level(""), DEFAULT_LEVEL);
    }

    #[test]
    fn parenthesized_index_needs_no_space() {
        assert_eq!(classify_level("(12)계약"), 4);
    }
}
