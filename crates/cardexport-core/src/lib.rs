//! # cardexport-core
//!
//! vCard export engine.
//!
//! This crate provides:
//! - Dialect profiles (vCard 2.1 / 3.0, generic, Japanese, DoCoMo)
//! - Contact and call-history record models
//! - Entry composition for contacts, call history and the own number
//! - The export session driving a record source into entry handlers
//! - A SQLite address book usable as record source
//!
//! # Example
//!
//! ```
//! use cardexport_core::record::{ContactRecord, NameRow, PhoneKind, PhoneRow};
//! use cardexport_core::{Profile, compose_contact};
//!
//! let mut contact = ContactRecord::new(1);
//! contact.names.push(NameRow::new("Doe", "John"));
//! contact.phones.push(PhoneRow::new(PhoneKind::Mobile, "555-0100"));
//!
//! let profile = Profile::from_tag("v30_generic").unwrap();
//! let entry = compose_contact(&profile, &contact);
//! assert!(entry.contains("TEL;CELL:555-0100\r\n"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod compose;
mod error;
pub mod handler;
mod profile;
pub mod record;
mod session;
mod source;
mod store;

pub use compose::{
    EntryBuilder, compose_call_log, compose_contact, compose_own_number_entry,
    construct_name_from_elements,
};
pub use error::{Error, Result};
pub use handler::{
    ByteSink, CollectingHandler, EntryHandler, InitContext, LoggingHandler, OutputStreamHandler,
    SharedBuffer,
};
pub use profile::{DialectKind, NameOrder, Profile};
pub use session::{ExportOptions, ExportOptionsBuilder, ExportSession};
pub use source::{
    CursorRow, ExportMode, MemorySource, RecordCursor, RecordSource, Selection, VecCursor,
};
pub use store::AddressBook;
