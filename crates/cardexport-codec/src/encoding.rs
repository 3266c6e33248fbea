//! Value transfer encodings.
//!
//! Supports the vCard flavour of Quoted-Printable (every byte escaped, soft
//! breaks well before the 76 column limit) and Base64 with continuation-line
//! folding for inline photos.

use std::borrow::Cow;
use std::fmt::Write as _;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::charset::Charset;
use crate::error::{Error, Result};

/// Hard limit for a Quoted-Printable physical line.
pub const QP_MAX_LINE_LENGTH: usize = 76;

/// Column at which a soft line break is inserted.
///
/// One more multi-byte character (`=HH=HH=HH`) plus the trailing `=` must
/// still fit under [`QP_MAX_LINE_LENGTH`].
pub const QP_SOFT_BREAK_COLUMN: usize = QP_MAX_LINE_LENGTH - 6 - 3;

/// Maximum width of a folded Base64 line, continuation space included.
pub const BASE64_LINE_WIDTH: usize = 73;

/// Encodes data as Base64.
#[must_use]
pub fn encode_base64(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Decodes Base64 data.
///
/// # Errors
///
/// Returns an error if the input is not valid Base64.
pub fn decode_base64(data: &str) -> Result<Vec<u8>> {
    STANDARD.decode(data).map_err(Into::into)
}

/// Folds a complete property line carrying Base64 data.
///
/// A `CRLF` plus a single space is inserted so that no physical line,
/// including the leading space of a continuation, exceeds
/// [`BASE64_LINE_WIDTH`] columns. The input must be ASCII.
#[must_use]
pub fn fold_base64_line(line: &str) -> String {
    let mut result = String::with_capacity(line.len() + line.len() / 24 + 3);
    let mut column = 0;

    for c in line.chars() {
        if column >= BASE64_LINE_WIDTH {
            result.push_str("\r\n ");
            column = 1;
        }
        result.push(c);
        column += 1;
    }

    result
}

/// Rewrites every `\r`, `\n` and `\r\n` as `\r\n`.
#[must_use]
pub fn normalize_crlf(text: &str) -> Cow<'_, str> {
    if !text.contains(['\r', '\n']) {
        return Cow::Borrowed(text);
    }

    let mut result = String::with_capacity(text.len() + 8);
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                result.push_str("\r\n");
            }
            '\n' => result.push_str("\r\n"),
            _ => result.push(c),
        }
    }
    Cow::Owned(result)
}

/// Encodes text as vCard Quoted-Printable in the given charset.
///
/// Every byte is written as `=HH`. Equivalent to
/// [`encode_quoted_printable_at`] starting at column 0.
#[must_use]
pub fn encode_quoted_printable(text: &str, charset: Charset) -> String {
    encode_quoted_printable_at(text, charset, 0).0
}

/// Encodes text as vCard Quoted-Printable, continuing a physical line that
/// already holds `start_column` characters.
///
/// Line endings are normalized to `CRLF` first. Before each byte, a soft
/// break `=\r\n` is emitted once the column has reached
/// [`QP_SOFT_BREAK_COLUMN`], so no physical line grows past 70 characters.
/// Returns the encoded text and the column where it ends.
///
/// Characters the charset cannot represent cause a logged fallback to UTF-8
/// for the whole value.
#[must_use]
pub fn encode_quoted_printable_at(text: &str, charset: Charset, start_column: usize) -> (String, usize) {
    if text.is_empty() {
        return (String::new(), start_column);
    }

    let normalized = normalize_crlf(text);
    let (bytes, _) = charset.encode_lossy(&normalized);

    let mut result = String::with_capacity(bytes.len() * 3 + bytes.len() / 20 * 3);
    let mut column = start_column;

    for byte in bytes {
        if column >= QP_SOFT_BREAK_COLUMN {
            result.push_str("=\r\n");
            column = 0;
        }
        let _ = write!(result, "={byte:02X}");
        column += 3;
    }

    (result, column)
}

/// Decodes Quoted-Printable text to raw bytes.
///
/// Soft line breaks (`=\r\n`, `=\n`) are removed.
///
/// # Errors
///
/// Returns an error if the input contains invalid escape sequences.
pub fn decode_quoted_printable(text: &str) -> Result<Vec<u8>> {
    let mut result = Vec::with_capacity(text.len() / 3);
    let mut bytes = text.bytes().peekable();

    while let Some(b) = bytes.next() {
        if b != b'=' {
            result.push(b);
            continue;
        }

        match bytes.peek() {
            Some(b'\r') => {
                bytes.next();
                if bytes.peek() == Some(&b'\n') {
                    bytes.next();
                }
                continue;
            }
            Some(b'\n') => {
                bytes.next();
                continue;
            }
            _ => {}
        }

        let hex: Vec<u8> = bytes.by_ref().take(2).collect();
        if hex.len() != 2 {
            return Err(Error::InvalidEncoding(
                "Incomplete escape sequence".to_string(),
            ));
        }
        let hex = std::str::from_utf8(&hex)
            .map_err(|e| Error::InvalidEncoding(format!("Invalid hex: {e}")))?;
        let byte = u8::from_str_radix(hex, 16)
            .map_err(|e| Error::InvalidEncoding(format!("Invalid hex: {e}")))?;
        result.push(byte);
    }

    Ok(result)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::redundant_clone, clippy::manual_string_new, clippy::needless_collect, clippy::unreadable_literal, clippy::used_underscore_items, clippy::similar_names)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_base64_encode_decode() {
        let data = b"Hello, World!";
        let encoded = encode_base64(data);
        assert_eq!(encoded, "SGVsbG8sIFdvcmxkIQ==");

        let decoded = decode_base64(&encoded).unwrap();
        assert_eq!(decoded, data);
    }

    #[test]
    fn test_fold_short_line_unchanged() {
        assert_eq!(fold_base64_line("PHOTO;ENCODING=b;TYPE=GIF:R0lG"), "PHOTO;ENCODING=b;TYPE=GIF:R0lG");
    }

    #[test]
    fn test_fold_long_line() {
        let line = "A".repeat(200);
        let folded = fold_base64_line(&line);
        let physical: Vec<&str> = folded.split("\r\n").collect();

        assert_eq!(physical[0].len(), 73);
        for continuation in &physical[1..] {
            assert!(continuation.starts_with(' '));
            assert!(!continuation[1..].starts_with(' '));
            assert!(continuation.len() <= BASE64_LINE_WIDTH);
        }
        assert_eq!(folded.replace("\r\n ", ""), line);
    }

    #[test]
    fn test_fold_exact_width_has_no_trailing_break() {
        let line = "B".repeat(BASE64_LINE_WIDTH);
        assert_eq!(fold_base64_line(&line), line);
    }

    #[test]
    fn test_normalize_crlf() {
        assert_eq!(normalize_crlf("a\rb\nc\r\nd"), "a\r\nb\r\nc\r\nd");
        assert!(matches!(normalize_crlf("plain"), Cow::Borrowed("plain")));
    }

    #[test]
    fn test_quoted_printable_encodes_every_byte() {
        assert_eq!(encode_quoted_printable("Ab", Charset::Utf8), "=41=62");
        assert_eq!(encode_quoted_printable("é", Charset::Utf8), "=C3=A9");
        assert_eq!(encode_quoted_printable("", Charset::Utf8), "");
    }

    #[test]
    fn test_quoted_printable_line_endings() {
        assert_eq!(encode_quoted_printable("a\nb", Charset::Utf8), "=61=0D=0A=62");
        assert_eq!(encode_quoted_printable("a\rb", Charset::Utf8), "=61=0D=0A=62");
    }

    #[test]
    fn test_quoted_printable_shift_jis() {
        assert_eq!(encode_quoted_printable("日", Charset::ShiftJis), "=93=FA");
    }

    #[test]
    fn test_quoted_printable_soft_break_position() {
        let encoded = encode_quoted_printable(&"x".repeat(30), Charset::Utf8);
        let physical: Vec<&str> = encoded.split("\r\n").collect();

        // 23 escaped bytes reach column 69, the next byte breaks first.
        assert_eq!(physical[0].len(), 23 * 3 + 1);
        assert!(physical[0].ends_with('='));
        assert_eq!(physical[1].len(), 7 * 3);
    }

    #[test]
    fn test_quoted_printable_respects_start_column() {
        let (encoded, end) = encode_quoted_printable_at("xy", Charset::Utf8, 66);
        assert_eq!(encoded, "=78=\r\n=79");
        assert_eq!(end, 3);

        let (encoded, _) = encode_quoted_printable_at("x", Charset::Utf8, 80);
        assert_eq!(encoded, "=\r\n=78");
    }

    #[test]
    fn test_quoted_printable_decode() {
        assert_eq!(decode_quoted_printable("=48=C3=A9").unwrap(), "Hé".as_bytes());
        assert_eq!(decode_quoted_printable("Hello=\r\nWorld").unwrap(), b"HelloWorld");
        assert!(decode_quoted_printable("=4").is_err());
        assert!(decode_quoted_printable("=ZZ").is_err());
    }

    proptest! {
        #[test]
        fn prop_quoted_printable_round_trip(s in any::<String>()) {
            let encoded = encode_quoted_printable(&s, Charset::Utf8);
            let decoded = decode_quoted_printable(&encoded).unwrap();
            prop_assert_eq!(decoded, normalize_crlf(&s).as_bytes().to_vec());
        }

        #[test]
        fn prop_quoted_printable_lines_fit(s in any::<String>(), start in 0usize..90) {
            let (encoded, _) = encode_quoted_printable_at(&s, Charset::Utf8, start);
            for (i, line) in encoded.split("\r\n").enumerate() {
                let width = if i == 0 { line.len() + start.min(QP_SOFT_BREAK_COLUMN) } else { line.len() };
                prop_assert!(width <= QP_MAX_LINE_LENGTH);
            }
            prop_assert!(!encoded.contains('\n') || encoded.contains("=\r\n"));
        }

        #[test]
        fn prop_fold_round_trip(s in "[A-Za-z0-9+/=]{0,400}") {
            let folded = fold_base64_line(&s);
            prop_assert_eq!(folded.replace("\r\n ", ""), s);
            for line in folded.split("\r\n") {
                prop_assert!(line.len() <= BASE64_LINE_WIDTH);
            }
        }
    }
}
