//! Call-history and own-number entries.

use chrono::DateTime;

use super::types::phone_type_params;
use super::{EntryBuilder, strip_line_breaks};
use crate::profile::Profile;
use crate::record::{CallLogRecord, PhoneKind};

/// Property carrying the call type and time.
pub const CALL_DATETIME_PROPERTY: &str = "X-IRMC-CALL-DATETIME";

/// Formats epoch milliseconds as an RFC 2445 UTC date-time
/// (`YYYYMMDDTHHMMSSZ`).
///
/// Returns `None` when the instant is out of range.
#[must_use]
pub fn format_call_timestamp(millis: i64) -> Option<String> {
    DateTime::from_timestamp_millis(millis).map(|dt| dt.format("%Y%m%dT%H%M%SZ").to_string())
}

fn append_tel(builder: &mut EntryBuilder<'_>, code: i32, label: &str, number: &str) {
    let params = match PhoneKind::from_code(code) {
        Some(kind) => phone_type_params(builder.profile(), kind, Some(label)),
        None => {
            tracing::error!(code, "unknown phone type code");
            Vec::new()
        }
    };
    let line = builder
        .line("TEL")
        .type_params(params)
        .charset_if(!number.is_ascii(), builder.profile().charset)
        .text(&strip_line_breaks(number));
    builder.push(&line);
}

/// Composes the vCard entry for one call-history row.
#[must_use]
pub fn compose_call_log(profile: &Profile, call: &CallLogRecord) -> String {
    let mut builder = EntryBuilder::new(profile);

    let name = call
        .cached_name
        .as_deref()
        .filter(|n| !n.is_empty())
        .unwrap_or(&call.number);
    builder.append_escaped("N", name).append_escaped("FN", name);

    let label = call
        .cached_number_label
        .clone()
        .filter(|l| !l.is_empty())
        .unwrap_or_else(|| call.cached_number_type.to_string());
    append_tel(&mut builder, call.cached_number_type, &label, &call.number);

    match (call.kind(), format_call_timestamp(call.date_millis)) {
        (Some(kind), Some(timestamp)) => {
            let line = builder
                .line(CALL_DATETIME_PROPERTY)
                .type_param(cardexport_codec::TypeParam::typed(kind.as_str()))
                .text(&timestamp);
            builder.push(&line);
        }
        (None, _) => tracing::warn!(call_type = call.call_type, "invalid call type, no timestamp"),
        (_, None) => tracing::warn!(date = call.date_millis, "call date out of range, no timestamp"),
    }

    builder.build()
}

/// Composes a minimal entry describing the handset's own number.
#[must_use]
pub fn compose_own_number_entry(profile: &Profile, kind: PhoneKind, name: &str, number: &str) -> String {
    let mut builder = EntryBuilder::new(profile);
    builder.append_escaped("FN", name).append_escaped("N", name);
    append_tel(&mut builder, kind.code(), &kind.code().to_string(), number);
    builder.build()
}
