//! Output character sets.
//!
//! vCards are written either as UTF-8 or as Shift_JIS. The Shift_JIS family
//! is encoded through the Windows-31J tables, which is what Japanese handsets
//! (including the DoCoMo vendor variant) actually expect; the advertised
//! `CHARSET=` parameter stays `SHIFT_JIS` either way.

use std::fmt;

use encoding::label::encoding_from_whatwg_label;
use encoding::types::EncodingRef;
use encoding::{DecoderTrap, EncoderTrap, Encoding};

use crate::error::{Error, Result};

/// Byte encoding of the emitted vCard text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Charset {
    /// UTF-8, no byte order mark.
    #[default]
    Utf8,
    /// Shift_JIS (Windows-31J tables).
    ShiftJis,
}

impl Charset {
    /// Resolves a charset label such as `UTF-8`, `shift_jis` or `sjis`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedCharset`] for labels that are unknown or
    /// that name an encoding other than UTF-8 and Shift_JIS.
    pub fn from_label(label: &str) -> Result<Self> {
        let normalized = label.trim().to_ascii_lowercase();
        let resolved = encoding_from_whatwg_label(&normalized)
            .ok_or_else(|| Error::UnsupportedCharset(label.to_string()))?;

        match resolved.whatwg_name() {
            Some("utf-8") => Ok(Self::Utf8),
            Some("shift_jis") => Ok(Self::ShiftJis),
            _ => Err(Error::UnsupportedCharset(label.to_string())),
        }
    }

    /// Canonical charset name, as advertised in `CHARSET=` parameters.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Utf8 => "UTF-8",
            Self::ShiftJis => "SHIFT_JIS",
        }
    }

    /// The literal `CHARSET=<name>` parameter.
    #[must_use]
    pub const fn attribute(self) -> &'static str {
        match self {
            Self::Utf8 => "CHARSET=UTF-8",
            Self::ShiftJis => "CHARSET=SHIFT_JIS",
        }
    }

    fn engine(self) -> EncodingRef {
        match self {
            Self::Utf8 => encoding::all::UTF_8,
            Self::ShiftJis => encoding::all::WINDOWS_31J,
        }
    }

    /// Encodes text strictly in this charset.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEncoding`] when the text contains characters
    /// the charset cannot represent.
    pub fn encode_strict(self, text: &str) -> Result<Vec<u8>> {
        self.engine()
            .encode(text, EncoderTrap::Strict)
            .map_err(|e| Error::InvalidEncoding(format!("{}: {e}", self.name())))
    }

    /// Encodes text, falling back to UTF-8 when the charset cannot represent it.
    ///
    /// The fallback is non-fatal and logged; the returned flag reports whether
    /// it happened.
    #[must_use]
    pub fn encode_lossy(self, text: &str) -> (Vec<u8>, bool) {
        match self.encode_strict(text) {
            Ok(bytes) => (bytes, false),
            Err(e) => {
                tracing::warn!(charset = self.name(), error = %e, "charset fallback to UTF-8");
                (text.as_bytes().to_vec(), true)
            }
        }
    }

    /// Decodes bytes written in this charset.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEncoding`] on malformed input.
    pub fn decode(self, bytes: &[u8]) -> Result<String> {
        self.engine()
            .decode(bytes, DecoderTrap::Strict)
            .map_err(|e| Error::InvalidEncoding(format!("{}: {e}", self.name())))
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
