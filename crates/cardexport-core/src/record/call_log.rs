//! Call history record model.

use serde::{Deserialize, Serialize};

use super::PhoneKind;

/// Direction of a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallType {
    /// Answered incoming call.
    Incoming,
    /// Outgoing call.
    Outgoing,
    /// Missed call.
    Missed,
}

impl CallType {
    /// Maps a call-log type code. Unknown codes yield `None`.
    #[must_use]
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(Self::Incoming),
            2 => Some(Self::Outgoing),
            3 => Some(Self::Missed),
            _ => None,
        }
    }

    /// The call-log type code.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Incoming => 1,
            Self::Outgoing => 2,
            Self::Missed => 3,
        }
    }

    /// Type token used by `X-IRMC-CALL-DATETIME`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Incoming => "INCOMING",
            Self::Outgoing => "OUTGOING",
            Self::Missed => "MISSED",
        }
    }
}

/// One call-history row.
///
/// The numeric columns are kept as stored so that invalid values can be
/// reported by the composer instead of failing the whole read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CallLogRecord {
    /// Row id in the source.
    pub id: i64,
    /// Remote number.
    pub number: String,
    /// Call start, milliseconds since the Unix epoch.
    pub date_millis: i64,
    /// Call type code, see [`CallType::from_code`].
    pub call_type: i32,
    /// Contact name cached at call time.
    pub cached_name: Option<String>,
    /// Phone type code of the cached number, home when absent.
    pub cached_number_type: i32,
    /// Label of the cached number.
    pub cached_number_label: Option<String>,
}

impl Default for CallLogRecord {
    fn default() -> Self {
        Self {
            id: 0,
            number: String::new(),
            date_millis: 0,
            call_type: 0,
            cached_name: None,
            cached_number_type: PhoneKind::Home.code(),
            cached_number_label: None,
        }
    }
}

impl CallLogRecord {
    /// Creates a row for a number without cached contact data.
    #[must_use]
    pub fn new(number: impl Into<String>, date_millis: i64, call_type: CallType) -> Self {
        Self {
            number: number.into(),
            date_millis,
            call_type: call_type.code(),
            ..Self::default()
        }
    }

    /// The parsed call type.
    #[must_use]
    pub const fn kind(&self) -> Option<CallType> {
        CallType::from_code(self.call_type)
    }
}
