//! vCard text escaping.
//!
//! The set of escaped characters depends on the dialect: vCard 2.1 only
//! escapes semicolons and line breaks, vCard 3.0 adds backslash and comma,
//! and the DoCoMo profile additionally escapes angle brackets.
//!
//! Never apply this to a value that is going to be Quoted-Printable encoded.

use crate::version::Version;

/// Escaping rules for free-text values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Escaper {
    backslash_and_comma: bool,
    angle_brackets: bool,
}

impl Escaper {
    /// Creates the escaper for a version, optionally with DoCoMo rules.
    #[must_use]
    pub const fn new(version: Version, docomo: bool) -> Self {
        Self {
            backslash_and_comma: version.is_v30(),
            angle_brackets: docomo,
        }
    }

    /// Escapes a text value.
    #[must_use]
    pub fn escape(&self, unescaped: &str) -> String {
        let mut result = String::with_capacity(unescaped.len());
        let mut chars = unescaped.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                ';' => result.push_str("\\;"),
                '\r' => {
                    if chars.peek() == Some(&'\n') {
                        chars.next();
                    }
                    result.push_str("\\n");
                }
                '\n' => result.push_str("\\n"),
                '\\' if self.backslash_and_comma => result.push_str("\\\\"),
                ',' if self.backslash_and_comma => result.push_str("\\,"),
                '<' | '>' if self.angle_brackets => {
                    result.push('\\');
                    result.push(c);
                }
                _ => result.push(c),
            }
        }

        result
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::redundant_clone, clippy::manual_string_new, clippy::needless_collect, clippy::unreadable_literal, clippy::used_underscore_items, clippy::similar_names)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const V21: Escaper = Escaper::new(Version::V21, false);
    const V30: Escaper = Escaper::new(Version::V30, false);
    const DOCOMO: Escaper = Escaper::new(Version::V21, true);

    #[test]
    fn test_semicolon_always_escaped() {
        assert_eq!(V21.escape("a;b"), "a\\;b");
        assert_eq!(V30.escape("a;b"), "a\\;b");
        assert_eq!(DOCOMO.escape("a;b"), "a\\;b");
    }

    #[test]
    fn test_line_breaks_collapse() {
        assert_eq!(V21.escape("a\r\nb"), "a\\nb");
        assert_eq!(V21.escape("a\rb"), "a\\nb");
        assert_eq!(V21.escape("a\nb"), "a\\nb");
        assert_eq!(V30.escape("a\r\n\r\nb"), "a\\n\\nb");
        assert_eq!(V30.escape("a\n\rb"), "a\\n\\nb");
        assert_eq!(V30.escape("end\r"), "end\\n");
    }

    #[test]
    fn test_backslash_and_comma_only_in_v30() {
        assert_eq!(V21.escape("a\\b,c"), "a\\b,c");
        assert_eq!(V30.escape("a\\b,c"), "a\\\\b\\,c");
    }

    #[test]
    fn test_angle_brackets_only_in_docomo() {
        assert_eq!(V21.escape("<x>"), "<x>");
        assert_eq!(V30.escape("<x>"), "<x>");
        assert_eq!(DOCOMO.escape("<x>"), "\\<x\\>");
    }

    #[test]
    fn test_empty() {
        assert_eq!(V30.escape(""), "");
    }

    proptest! {
        #[test]
        fn prop_plain_ascii_is_unchanged(s in "[A-Za-z0-9 .@_-]{0,64}") {
            prop_assert_eq!(V21.escape(&s), s.clone());
            prop_assert_eq!(V30.escape(&s), s.clone());
            prop_assert_eq!(DOCOMO.escape(&s), s);
        }

        #[test]
        fn prop_escaped_has_no_raw_line_breaks(s in any::<String>()) {
            let escaped = V30.escape(&s);
            prop_assert!(!escaped.contains('\r'));
            prop_assert!(!escaped.contains('\n'));
        }
    }
}
