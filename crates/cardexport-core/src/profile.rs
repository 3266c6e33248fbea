//! vCard dialects and their immutable profiles.
//!
//! Importers disagree on version, charset and a long list of small details.
//! A dialect tag picks one [`Profile`], which the composers consult at every
//! decision point instead of scattering per-vendor checks.

use std::fmt;
use std::str::FromStr;

use cardexport_codec::{Charset, Escaper, Version};

use crate::error::{Error, Result};

/// Known vCard dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum DialectKind {
    /// Same as [`DialectKind::V21Generic`].
    #[default]
    Default,
    /// vCard 2.1, UTF-8, Quoted-Printable, vendor extensions.
    V21Generic,
    /// vCard 3.0, UTF-8, vendor extensions.
    V30Generic,
    /// vCard 2.1 with European name order.
    V21Europe,
    /// vCard 3.0 with European name order.
    V30Europe,
    /// vCard 2.1, UTF-8, Japanese name order.
    V21JapaneseUtf8,
    /// vCard 2.1, `Shift_JIS`, Japanese name order.
    V21JapaneseSjis,
    /// vCard 3.0, UTF-8, Japanese name order.
    V30JapaneseUtf8,
    /// vCard 3.0, `Shift_JIS`, Japanese name order.
    V30JapaneseSjis,
    /// vCard 2.1 for Japanese handsets, half-width phonetics.
    V21JapaneseMobile,
    /// The DoCoMo carrier variant of the Japanese mobile dialect.
    Docomo,
}

impl DialectKind {
    /// All dialects, in tag order.
    pub const ALL: [Self; 11] = [
        Self::Default,
        Self::V21Generic,
        Self::V30Generic,
        Self::V21Europe,
        Self::V30Europe,
        Self::V21JapaneseUtf8,
        Self::V21JapaneseSjis,
        Self::V30JapaneseUtf8,
        Self::V30JapaneseSjis,
        Self::V21JapaneseMobile,
        Self::Docomo,
    ];

    /// Returns the canonical tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::V21Generic => "v21_generic",
            Self::V30Generic => "v30_generic",
            Self::V21Europe => "v21_europe",
            Self::V30Europe => "v30_europe",
            Self::V21JapaneseUtf8 => "v21_japanese_utf8",
            Self::V21JapaneseSjis => "v21_japanese_sjis",
            Self::V30JapaneseUtf8 => "v30_japanese_utf8",
            Self::V30JapaneseSjis => "v30_japanese_sjis",
            Self::V21JapaneseMobile => "v21_japanese_mobile",
            Self::Docomo => "docomo",
        }
    }
}

impl FromStr for DialectKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let tag = s.trim().to_ascii_lowercase();
        match tag.as_str() {
            "default" => Ok(Self::Default),
            "v21_generic" | "v21_generic_utf8" => Ok(Self::V21Generic),
            "v30_generic" | "v30_generic_utf8" => Ok(Self::V30Generic),
            "v21_europe" => Ok(Self::V21Europe),
            "v30_europe" => Ok(Self::V30Europe),
            "v21_japanese_utf8" => Ok(Self::V21JapaneseUtf8),
            "v21_japanese_sjis" => Ok(Self::V21JapaneseSjis),
            "v30_japanese_utf8" => Ok(Self::V30JapaneseUtf8),
            "v30_japanese_sjis" => Ok(Self::V30JapaneseSjis),
            "v21_japanese_mobile" => Ok(Self::V21JapaneseMobile),
            "docomo" => Ok(Self::Docomo),
            _ => Err(Error::UnknownDialect(s.to_string())),
        }
    }
}

impl fmt::Display for DialectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order in which structured name pieces form a display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum NameOrder {
    /// prefix, given, middle, family, suffix.
    #[default]
    Default,
    /// prefix, middle, given, family, suffix.
    Europe,
    /// prefix, family, middle, given, suffix.
    Japanese,
}

/// Immutable description of one output dialect.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct Profile {
    /// The dialect this profile was built for.
    pub kind: DialectKind,
    /// vCard version.
    pub version: Version,
    /// Output byte charset.
    pub charset: Charset,
    /// Free-text values are Quoted-Printable encoded.
    pub uses_qp: bool,
    /// DoCoMo quirks: placeholders, tail lines, primer entry.
    pub is_docomo: bool,
    /// Phonetic strings are converted to half-width forms.
    pub is_japanese_mobile: bool,
    /// All notes are merged into one `NOTE`.
    pub only_one_note: bool,
    /// Custom `X-<label>` types and Android extension properties.
    pub uses_android_property: bool,
    /// `X-PHONETIC-FIRST/MIDDLE/LAST-NAME` lines.
    pub uses_defact_property: bool,
    /// Display-name order.
    pub name_order: NameOrder,
}

impl Default for Profile {
    fn default() -> Self {
        Self::for_dialect(DialectKind::Default)
    }
}

impl Profile {
    /// Creates the profile of a dialect.
    #[must_use]
    pub fn for_dialect(kind: DialectKind) -> Self {
        let generic_v21 = Self {
            kind,
            version: Version::V21,
            charset: Charset::Utf8,
            uses_qp: true,
            is_docomo: false,
            is_japanese_mobile: false,
            only_one_note: false,
            uses_android_property: true,
            uses_defact_property: true,
            name_order: NameOrder::Default,
        };
        let generic_v30 = Self {
            version: Version::V30,
            uses_qp: false,
            ..generic_v21.clone()
        };

        match kind {
            DialectKind::Default | DialectKind::V21Generic => generic_v21,
            DialectKind::V30Generic => generic_v30,
            DialectKind::V21Europe => Self {
                name_order: NameOrder::Europe,
                ..generic_v21
            },
            DialectKind::V30Europe => Self {
                name_order: NameOrder::Europe,
                ..generic_v30
            },
            DialectKind::V21JapaneseUtf8 => Self {
                name_order: NameOrder::Japanese,
                ..generic_v21
            },
            DialectKind::V21JapaneseSjis => Self {
                charset: Charset::ShiftJis,
                name_order: NameOrder::Japanese,
                ..generic_v21
            },
            DialectKind::V30JapaneseUtf8 => Self {
                name_order: NameOrder::Japanese,
                ..generic_v30
            },
            DialectKind::V30JapaneseSjis => Self {
                charset: Charset::ShiftJis,
                name_order: NameOrder::Japanese,
                ..generic_v30
            },
            DialectKind::V21JapaneseMobile => Self::japanese_mobile(kind),
            DialectKind::Docomo => Self {
                is_docomo: true,
                only_one_note: true,
                ..Self::japanese_mobile(kind)
            },
        }
    }

    const fn japanese_mobile(kind: DialectKind) -> Self {
        Self {
            kind,
            version: Version::V21,
            charset: Charset::ShiftJis,
            uses_qp: true,
            is_docomo: false,
            is_japanese_mobile: true,
            only_one_note: false,
            uses_android_property: false,
            uses_defact_property: false,
            name_order: NameOrder::Japanese,
        }
    }

    /// Parses a dialect tag and builds its profile.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownDialect`] for unrecognized tags.
    pub fn from_tag(tag: &str) -> Result<Self> {
        Ok(Self::for_dialect(tag.parse()?))
    }

    /// Overrides the output charset.
    ///
    /// # Errors
    ///
    /// Returns a codec error for labels other than UTF-8 and `Shift_JIS`.
    pub fn with_charset(mut self, label: &str) -> Result<Self> {
        self.charset = Charset::from_label(label)?;
        Ok(self)
    }

    /// The literal `CHARSET=` parameter of this profile.
    #[must_use]
    pub const fn charset_attr(&self) -> &'static str {
        self.charset.attribute()
    }

    /// The escaper matching this profile.
    #[must_use]
    pub const fn escaper(&self) -> Escaper {
        Escaper::new(self.version, self.is_docomo)
    }

    /// Returns true for vCard 3.0 output.
    #[must_use]
    pub const fn is_v30(&self) -> bool {
        self.version.is_v30()
    }
}
