//! vCard format versions.

use std::fmt;

/// vCard version written in the `VERSION` property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Version {
    /// vCard 2.1 (pre-standard, versit consortium).
    #[default]
    V21,
    /// vCard 3.0 (RFC 2426).
    V30,
}

impl Version {
    /// Returns the version string, e.g. `2.1`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::V21 => "2.1",
            Self::V30 => "3.0",
        }
    }

    /// Returns true for vCard 3.0.
    #[must_use]
    pub const fn is_v30(self) -> bool {
        matches!(self, Self::V30)
    }

    /// The `ENCODING=` parameter used for inline binary data.
    #[must_use]
    pub const fn base64_attribute(self) -> &'static str {
        match self {
            Self::V21 => "ENCODING=BASE64",
            Self::V30 => "ENCODING=b",
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
