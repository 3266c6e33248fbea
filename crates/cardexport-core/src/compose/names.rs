//! Display-name assembly and phonetic string normalization.

use crate::profile::NameOrder;

/// Half-width forms of U+30A1 (small A) through U+30F6 (small KE).
const HALF_WIDTH_KATAKANA: [&str; 86] = [
    "ｧ", "ｱ", "ｨ", "ｲ", "ｩ", "ｳ", "ｪ", "ｴ", "ｫ", "ｵ",
    "ｶ", "ｶﾞ", "ｷ", "ｷﾞ", "ｸ", "ｸﾞ", "ｹ", "ｹﾞ", "ｺ", "ｺﾞ",
    "ｻ", "ｻﾞ", "ｼ", "ｼﾞ", "ｽ", "ｽﾞ", "ｾ", "ｾﾞ", "ｿ", "ｿﾞ",
    "ﾀ", "ﾀﾞ", "ﾁ", "ﾁﾞ", "ｯ", "ﾂ", "ﾂﾞ", "ﾃ", "ﾃﾞ", "ﾄ",
    "ﾄﾞ", "ﾅ", "ﾆ", "ﾇ", "ﾈ", "ﾉ", "ﾊ", "ﾊﾞ", "ﾊﾟ", "ﾋ",
    "ﾋﾞ", "ﾋﾟ", "ﾌ", "ﾌﾞ", "ﾌﾟ", "ﾍ", "ﾍﾞ", "ﾍﾟ", "ﾎ", "ﾎﾞ",
    "ﾎﾟ", "ﾏ", "ﾐ", "ﾑ", "ﾒ", "ﾓ", "ｬ", "ﾔ", "ｭ", "ﾕ",
    "ｮ", "ﾖ", "ﾗ", "ﾘ", "ﾙ", "ﾚ", "ﾛ", "ﾜ", "ﾜ", "ｲ",
    "ｴ", "ｦ", "ﾝ", "ｳﾞ", "ｶ", "ｹ",
];

/// Joins non-empty name pieces with a space in the order of `order`.
#[must_use]
pub fn construct_name_from_elements(
    order: NameOrder,
    family: &str,
    middle: &str,
    given: &str,
    prefix: &str,
    suffix: &str,
) -> String {
    let pieces = match order {
        NameOrder::Default => [prefix, given, middle, family, suffix],
        NameOrder::Europe => [prefix, middle, given, family, suffix],
        NameOrder::Japanese => [prefix, family, middle, given, suffix],
    };
    pieces
        .iter()
        .filter(|p| !p.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Converts full-width characters to their half-width forms.
///
/// Covers full-width ASCII, the ideographic space, katakana (voiced marks
/// become separate half-width marks) and common Japanese punctuation.
/// Anything else passes through.
#[must_use]
pub fn to_half_width(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\u{FF01}'..='\u{FF5E}' => {
                result.push(char::from_u32(u32::from(c) - 0xFEE0).unwrap_or(c));
            }
            '\u{3000}' => result.push(' '),
            '\u{30A1}'..='\u{30F6}' => {
                let index = (u32::from(c) - 0x30A1) as usize;
                result.push_str(HALF_WIDTH_KATAKANA[index]);
            }
            '\u{3001}' => result.push('\u{FF64}'),
            '\u{3002}' => result.push('\u{FF61}'),
            '\u{300C}' => result.push('\u{FF62}'),
            '\u{300D}' => result.push('\u{FF63}'),
            '\u{30FB}' => result.push('\u{FF65}'),
            '\u{30FC}' => result.push('\u{FF70}'),
            '\u{309B}' => result.push('\u{FF9E}'),
            '\u{309C}' => result.push('\u{FF9F}'),
            _ => result.push(c),
        }
    }
    result
}

/// Returns true if a custom label can be written as an `X-<label>` token.
#[must_use]
pub fn is_valid_label(label: &str) -> bool {
    !label.is_empty() && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::redundant_clone, clippy::manual_string_new, clippy::needless_collect, clippy::unreadable_literal, clippy::used_underscore_items, clippy::similar_names)]
mod tests {
    use super::*;

    #[test]
    fn test_name_orders() {
        let parts = ("Doe", "Q", "John", "Dr.", "Jr.");
        let build = |order| construct_name_from_elements(order, parts.0, parts.1, parts.2, parts.3, parts.4);
        assert_eq!(build(NameOrder::Default), "Dr. John Q Doe Jr.");
        assert_eq!(build(NameOrder::Europe), "Dr. Q John Doe Jr.");
        assert_eq!(build(NameOrder::Japanese), "Dr. Doe Q John Jr.");
    }

    #[test]
    fn test_empty_pieces_skipped() {
        assert_eq!(
            construct_name_from_elements(NameOrder::Default, "Doe", "", "John", "", ""),
            "John Doe"
        );
        assert_eq!(
            construct_name_from_elements(NameOrder::Japanese, "", "", "", "", ""),
            ""
        );
    }

    #[test]
    fn test_half_width_katakana() {
        assert_eq!(to_half_width("ヤマダ"), "ﾔﾏﾀﾞ");
        assert_eq!(to_half_width("パン"), "ﾊﾟﾝ");
        assert_eq!(to_half_width("ヴァ"), "ｳﾞｧ");
        assert_eq!(to_half_width("ー・。"), "ｰ･｡");
    }

    #[test]
    fn test_half_width_ascii() {
        assert_eq!(to_half_width("ＡＢＣ１２３"), "ABC123");
        assert_eq!(to_half_width("Ａ\u{3000}Ｂ"), "A B");
        assert_eq!(to_half_width("abc"), "abc");
        assert_eq!(to_half_width("山田"), "山田");
    }

    #[test]
    fn test_label_validity() {
        assert!(is_valid_label("school"));
        assert!(is_valid_label("Home-2"));
        assert!(!is_valid_label(""));
        assert!(!is_valid_label("my label"));
        assert!(!is_valid_label("学校"));
    }
}
