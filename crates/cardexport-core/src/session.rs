//! Export session.
//!
//! An [`ExportSession`] owns a record source, a cursor over the selected rows
//! and the registered handlers. The caller drives it one entry at a time:
//!
//! ```
//! use cardexport_core::handler::CollectingHandler;
//! use cardexport_core::record::{ContactRecord, NameRow};
//! use cardexport_core::{ExportMode, ExportOptions, ExportSession, MemorySource, Profile, Selection};
//!
//! let mut contact = ContactRecord::new(1);
//! contact.names.push(NameRow::new("Doe", "John"));
//! let source = MemorySource::new(vec![contact], Vec::new());
//!
//! let collector = CollectingHandler::new();
//! let mut session = ExportSession::new(source, Profile::default(), ExportOptions::default());
//! session.add_handler(collector.clone());
//! session.init(ExportMode::Contacts, &Selection::all()).unwrap();
//! while !session.is_exhausted() {
//!     session.create_one_entry().unwrap();
//! }
//! session.terminate();
//!
//! assert!(collector.entries()[0].contains("FN:John Doe\r\n"));
//! ```

use crate::compose::{compose_call_log, compose_contact};
use crate::error::{Error, Result};
use crate::handler::{EntryHandler, InitContext};
use crate::profile::Profile;
use crate::record::ContactRecord;
use crate::source::{CursorRow, ExportMode, RecordCursor, RecordSource, Selection};

const NO_ERROR: &str = "No error";

/// Session options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    /// Abort on the first handler failure instead of ignoring it.
    pub strict_errors: bool,
    /// Skip contacts whose photos exceed this many bytes.
    pub max_photo_bytes: Option<usize>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            strict_errors: true,
            max_photo_bytes: None,
        }
    }
}

impl ExportOptions {
    /// Creates an options builder.
    #[must_use]
    pub fn builder() -> ExportOptionsBuilder {
        ExportOptionsBuilder::default()
    }
}

/// Builder for [`ExportOptions`].
#[derive(Debug, Clone, Default)]
pub struct ExportOptionsBuilder {
    options: ExportOptions,
}

impl ExportOptionsBuilder {
    /// Sets the handler error policy.
    #[must_use]
    pub const fn strict_errors(mut self, strict: bool) -> Self {
        self.options.strict_errors = strict;
        self
    }

    /// Sets the photo size limit.
    #[must_use]
    pub const fn max_photo_bytes(mut self, limit: usize) -> Self {
        self.options.max_photo_bytes = Some(limit);
        self
    }

    /// Builds the options.
    #[must_use]
    pub fn build(self) -> ExportOptions {
        self.options
    }
}

struct Slot {
    handler: Box<dyn EntryHandler>,
    live: bool,
}

/// Drives composition from a record source to the registered handlers.
pub struct ExportSession<S: RecordSource> {
    source: S,
    profile: Profile,
    options: ExportOptions,
    slots: Vec<Slot>,
    cursor: Option<S::Cursor>,
    error_reason: String,
}

impl<S: RecordSource> std::fmt::Debug for ExportSession<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExportSession")
            .field("profile", &self.profile)
            .field("options", &self.options)
            .field("handlers", &self.slots.len())
            .field("open", &self.cursor.is_some())
            .field("error_reason", &self.error_reason)
            .finish_non_exhaustive()
    }
}

impl<S: RecordSource> ExportSession<S> {
    /// Creates a session over a source.
    #[must_use]
    pub fn new(source: S, profile: Profile, options: ExportOptions) -> Self {
        Self {
            source,
            profile,
            options,
            slots: Vec::new(),
            cursor: None,
            error_reason: NO_ERROR.to_string(),
        }
    }

    /// The profile entries are composed with.
    #[must_use]
    pub const fn profile(&self) -> &Profile {
        &self.profile
    }

    /// Registers a handler. Must be called before [`ExportSession::init`].
    pub fn add_handler(&mut self, handler: impl EntryHandler + 'static) {
        if self.cursor.is_some() {
            tracing::warn!("handler added after init, ignoring");
            return;
        }
        self.slots.push(Slot {
            handler: Box::new(handler),
            live: false,
        });
    }

    fn fail(&mut self, err: Error) -> Error {
        self.error_reason = err.to_string();
        err
    }

    /// Notifies the handlers and opens the cursor.
    ///
    /// Under the DoCoMo profile the first handler is offered a primer entry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Handler`] if a handler fails under strict errors (the
    /// handlers already initialized are terminated), the source error if the
    /// cursor cannot be opened, or [`Error::EmptyCursor`] if nothing matched.
    pub fn init(&mut self, mode: ExportMode, selection: &Selection) -> Result<()> {
        let primer = self
            .profile
            .is_docomo
            .then(|| compose_contact(&self.profile, &ContactRecord::new(-1)));

        for index in 0..self.slots.len() {
            let context = InitContext {
                profile: &self.profile,
                primer: if index == 0 { primer.as_deref() } else { None },
            };
            let slot = &mut self.slots[index];
            match slot.handler.on_init(&context) {
                Ok(()) => slot.live = true,
                Err(e) if self.options.strict_errors => {
                    tracing::error!(handler = index, error = %e, "handler failed to initialize");
                    self.terminate_handlers();
                    return Err(self.fail(Error::Handler(e.to_string())));
                }
                Err(e) => {
                    tracing::warn!(handler = index, error = %e, "handler failed to initialize, ignoring");
                    slot.live = true;
                }
            }
        }

        let cursor = match self.source.open(mode, selection) {
            Ok(cursor) => cursor,
            Err(e) => return Err(self.fail(e)),
        };
        if cursor.is_empty() {
            return Err(self.fail(Error::EmptyCursor));
        }
        tracing::debug!(?mode, entries = cursor.len(), dialect = %self.profile.kind, "session initialized");
        self.cursor = Some(cursor);
        Ok(())
    }

    /// Returns true when there is nothing left to export.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.cursor.as_ref().is_none_or(RecordCursor::is_past_end)
    }

    /// Number of rows selected at init.
    #[must_use]
    pub fn count(&self) -> usize {
        self.cursor.as_ref().map_or(0, RecordCursor::len)
    }

    /// Reason of the last failure, `"No error"` if none.
    #[must_use]
    pub fn error_reason(&self) -> &str {
        &self.error_reason
    }

    /// Composes the entry under the cursor and hands it to the handlers.
    ///
    /// The cursor always moves forward. A contact that cannot be read is
    /// delivered as an empty entry; one whose photos exceed the size limit
    /// is not delivered at all. Neither fails the call.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotInitialized`] before a successful init, or
    /// [`Error::Handler`] if a handler fails under strict errors.
    pub fn create_one_entry(&mut self) -> Result<()> {
        let Some(cursor) = self.cursor.as_mut() else {
            return Err(self.fail(Error::NotInitialized));
        };
        let row = cursor.row().cloned();
        cursor.advance();

        let entry = match row {
            None => return Err(self.fail(Error::Source("cursor is past the end".to_string()))),
            Some(CursorRow::Call(call)) => compose_call_log(&self.profile, &call),
            Some(CursorRow::Contact(id)) => match self.load_contact(id) {
                Ok(contact) => compose_contact(&self.profile, &contact),
                Err(e @ Error::ResourceExhausted { .. }) => {
                    tracing::warn!(id, error = %e, "skipping entry");
                    self.error_reason = e.to_string();
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!(id, error = %e, "unreadable contact, emitting empty entry");
                    self.error_reason = e.to_string();
                    String::new()
                }
            },
        };

        self.dispatch(&entry)
    }

    fn load_contact(&self, id: i64) -> Result<ContactRecord> {
        let contact = self.source.fetch_contact(id)?;
        if let Some(limit) = self.options.max_photo_bytes {
            let size = contact.photo_bytes();
            if size > limit {
                return Err(Error::ResourceExhausted { id, size, limit });
            }
        }
        Ok(contact)
    }

    fn dispatch(&mut self, entry: &str) -> Result<()> {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if let Err(e) = slot.handler.on_entry_created(entry) {
                if self.options.strict_errors {
                    tracing::error!(handler = index, error = %e, "handler rejected entry");
                    let err = Error::Handler(e.to_string());
                    self.error_reason = err.to_string();
                    return Err(err);
                }
                tracing::warn!(handler = index, error = %e, "handler rejected entry, ignoring");
            }
        }
        Ok(())
    }

    fn terminate_handlers(&mut self) {
        for slot in self.slots.iter_mut().filter(|slot| slot.live) {
            slot.handler.on_terminate();
            slot.live = false;
        }
    }

    /// Terminates every handler and closes the cursor. Safe to call twice.
    pub fn terminate(&mut self) {
        self.terminate_handlers();
        if let Some(mut cursor) = self.cursor.take() {
            cursor.close();
            tracing::debug!("session terminated");
        }
    }
}

impl<S: RecordSource> Drop for ExportSession<S> {
    fn drop(&mut self) {
        self.terminate();
    }
}
