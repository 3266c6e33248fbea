//! Input records.
//!
//! Plain data as it comes out of an address book: contacts grouped into
//! typed rows, and call-history rows. Type enums keep the numeric codes of
//! the handset contact store so SQLite rows map onto them directly.

mod call_log;
mod contact;

pub use call_log::{CallLogRecord, CallType};
pub use contact::{
    ContactRecord, EmailKind, EmailRow, ImProtocol, ImRow, NameRow, OrganizationRow, PhoneKind,
    PhoneRow, PostalKind, PostalRow,
};
