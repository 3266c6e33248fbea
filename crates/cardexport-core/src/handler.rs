//! Entry sinks.
//!
//! A session hands every composed vCard to each registered
//! [`EntryHandler`] in registration order. Handlers are notified once at
//! init, once per entry and once at terminate.
//!
//! # Example
//!
//! ```
//! use cardexport_core::handler::{EntryHandler, InitContext};
//! use cardexport_core::Result;
//!
//! #[derive(Default)]
//! struct Counter {
//!     entries: usize,
//! }
//!
//! impl EntryHandler for Counter {
//!     fn on_entry_created(&mut self, _entry: &str) -> Result<()> {
//!         self.entries += 1;
//!         Ok(())
//!     }
//! }
//! ```

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::sync::{Arc, Mutex, PoisonError};

use cardexport_codec::Charset;

use crate::error::{Error, Result};
use crate::profile::Profile;

/// Information passed to [`EntryHandler::on_init`].
#[derive(Debug, Clone, Copy)]
pub struct InitContext<'a> {
    /// Profile entries are composed with.
    pub profile: &'a Profile,
    /// Entry the handler should emit before any other, if any.
    pub primer: Option<&'a str>,
}

/// Receiver of composed vCard entries.
pub trait EntryHandler: Send {
    /// Called once before any entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the handler cannot accept entries.
    fn on_init(&mut self, context: &InitContext<'_>) -> Result<()> {
        let _ = context;
        Ok(())
    }

    /// Called with each complete entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry could not be consumed.
    fn on_entry_created(&mut self, entry: &str) -> Result<()>;

    /// Called once when the session ends.
    fn on_terminate(&mut self) {}
}

/// Byte stream an [`OutputStreamHandler`] writes to.
pub trait ByteSink: Write + Send {
    /// Forces buffered data down to the storage device.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the device reports one.
    fn sync(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl ByteSink for File {
    fn sync(&mut self) -> io::Result<()> {
        self.sync_all()
    }
}

impl ByteSink for Vec<u8> {}

impl ByteSink for io::Stdout {}

/// Handler writing entries to a byte stream in the profile charset.
///
/// The stream is owned by the handler and released on terminate.
#[derive(Debug)]
pub struct OutputStreamHandler<W: ByteSink> {
    writer: Option<BufWriter<W>>,
    charset: Charset,
    terminated: bool,
}

impl<W: ByteSink> OutputStreamHandler<W> {
    /// Wraps a byte sink.
    #[must_use]
    pub fn new(sink: W) -> Self {
        Self {
            writer: Some(BufWriter::new(sink)),
            charset: Charset::default(),
            terminated: false,
        }
    }

    fn write_entry(&mut self, entry: &str) -> Result<()> {
        let writer = self.writer.as_mut().ok_or_else(|| {
            Error::Handler("output stream already closed".to_string())
        })?;
        let (bytes, _) = self.charset.encode_lossy(entry);
        writer.write_all(&bytes)?;
        Ok(())
    }

    fn finish(&mut self) {
        if self.terminated {
            return;
        }
        self.terminated = true;

        let Some(mut writer) = self.writer.take() else {
            return;
        };
        if let Err(e) = writer.flush() {
            tracing::error!(error = %e, "failed to flush output stream");
            return;
        }
        match writer.into_inner() {
            Ok(mut sink) => {
                if let Err(e) = sink.sync() {
                    tracing::error!(error = %e, "failed to sync output stream");
                }
            }
            Err(e) => tracing::error!(error = %e.error(), "failed to release output stream"),
        }
    }
}

impl<W: ByteSink> EntryHandler for OutputStreamHandler<W> {
    fn on_init(&mut self, context: &InitContext<'_>) -> Result<()> {
        self.charset = context.profile.charset;
        if let Some(primer) = context.primer {
            self.write_entry(primer)?;
        }
        Ok(())
    }

    fn on_entry_created(&mut self, entry: &str) -> Result<()> {
        self.write_entry(entry)
    }

    fn on_terminate(&mut self) {
        self.finish();
    }
}

impl<W: ByteSink> Drop for OutputStreamHandler<W> {
    fn drop(&mut self) {
        self.finish();
    }
}

/// Cloneable in-memory byte sink.
///
/// Clones share the same buffer, so the bytes stay readable after the
/// handler owning one clone has been moved into a session.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    inner: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    /// Creates an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the bytes written so far.
    #[must_use]
    pub fn contents(&self) -> Vec<u8> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl ByteSink for SharedBuffer {}

/// Event recorded by a [`CollectingHandler`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerEvent {
    /// `on_init`, with the primer if one was offered.
    Init(Option<String>),
    /// `on_entry_created`.
    Entry(String),
    /// `on_terminate`.
    Terminate,
}

/// Handler that records every event.
///
/// Clones share the same event list. Useful for tests and for callers that
/// post-process entries in memory.
#[derive(Debug, Clone, Default)]
pub struct CollectingHandler {
    events: Arc<Mutex<Vec<HandlerEvent>>>,
}

impl CollectingHandler {
    /// Creates a new collecting handler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All events so far.
    #[must_use]
    pub fn events(&self) -> Vec<HandlerEvent> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// The entries received so far.
    #[must_use]
    pub fn entries(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                HandlerEvent::Entry(entry) => Some(entry),
                _ => None,
            })
            .collect()
    }

    fn record(&self, event: HandlerEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

impl EntryHandler for CollectingHandler {
    fn on_init(&mut self, context: &InitContext<'_>) -> Result<()> {
        self.record(HandlerEvent::Init(context.primer.map(str::to_string)));
        Ok(())
    }

    fn on_entry_created(&mut self, entry: &str) -> Result<()> {
        self.record(HandlerEvent::Entry(entry.to_string()));
        Ok(())
    }

    fn on_terminate(&mut self) {
        self.record(HandlerEvent::Terminate);
    }
}

/// A handler that logs entries using tracing.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingHandler;

impl EntryHandler for LoggingHandler {
    fn on_init(&mut self, context: &InitContext<'_>) -> Result<()> {
        tracing::debug!(dialect = %context.profile.kind, primer = context.primer.is_some(), "init");
        Ok(())
    }

    fn on_entry_created(&mut self, entry: &str) -> Result<()> {
        tracing::trace!(len = entry.len(), "entry");
        Ok(())
    }

    fn on_terminate(&mut self) {
        tracing::debug!("terminate");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::redundant_clone, clippy::manual_string_new, clippy::needless_collect, clippy::unreadable_literal, clippy::used_underscore_items, clippy::similar_names)]
mod tests {
    use super::*;
    use crate::profile::DialectKind;

    fn context(profile: &Profile) -> InitContext<'_> {
        InitContext {
            profile,
            primer: None,
        }
    }

    #[test]
    fn test_stream_handler_writes_in_profile_charset() {
        let buffer = SharedBuffer::new();
        let profile = Profile::for_dialect(DialectKind::V21JapaneseSjis);
        let mut handler = OutputStreamHandler::new(buffer.clone());

        handler.on_init(&context(&profile)).unwrap();
        handler.on_entry_created("あ\r\n").unwrap();
        handler.on_terminate();

        assert_eq!(buffer.contents(), vec![0x82, 0xA0, b'\r', b'\n']);
    }

    #[test]
    fn test_stream_handler_writes_primer() {
        let buffer = SharedBuffer::new();
        let profile = Profile::default();
        let mut handler = OutputStreamHandler::new(buffer.clone());

        handler
            .on_init(&InitContext {
                profile: &profile,
                primer: Some("PRIMER\r\n"),
            })
            .unwrap();
        handler.on_entry_created("ENTRY\r\n").unwrap();
        drop(handler);

        assert_eq!(buffer.contents(), b"PRIMER\r\nENTRY\r\n");
    }

    #[test]
    fn test_stream_handler_rejects_after_terminate() {
        let mut handler = OutputStreamHandler::new(Vec::new());
        handler.on_init(&context(&Profile::default())).unwrap();
        handler.on_terminate();
        handler.on_terminate();

        let err = handler.on_entry_created("x").unwrap_err();
        assert!(matches!(err, Error::Handler(_)));
    }

    #[test]
    fn test_stream_handler_buffers_until_terminate() {
        let buffer = SharedBuffer::new();
        let mut handler = OutputStreamHandler::new(buffer.clone());
        handler.on_init(&context(&Profile::default())).unwrap();
        handler.on_entry_created("short").unwrap();
        assert!(buffer.contents().is_empty());

        handler.on_terminate();
        assert_eq!(buffer.contents(), b"short");
    }

    #[test]
    fn test_stream_handler_file() {
        let path = std::env::temp_dir().join(format!("cardexport-handler-{}.vcf", std::process::id()));
        let file = File::create(&path).unwrap();
        let mut handler = OutputStreamHandler::new(file);
        handler.on_init(&context(&Profile::default())).unwrap();
        handler.on_entry_created("BEGIN:VCARD\r\n").unwrap();
        handler.on_terminate();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "BEGIN:VCARD\r\n");
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_collecting_handler_shares_events() {
        let collector = CollectingHandler::new();
        let mut handle = collector.clone();
        let profile = Profile::default();

        handle.on_init(&context(&profile)).unwrap();
        handle.on_entry_created("a").unwrap();
        handle.on_terminate();

        assert_eq!(
            collector.events(),
            vec![
                HandlerEvent::Init(None),
                HandlerEvent::Entry("a".to_string()),
                HandlerEvent::Terminate
            ]
        );
        assert_eq!(collector.entries(), vec!["a".to_string()]);
    }

    #[test]
    fn test_logging_handler_accepts_everything() {
        let mut handler = LoggingHandler;
        handler.on_init(&context(&Profile::default())).unwrap();
        handler.on_entry_created("x").unwrap();
        handler.on_terminate();
    }
}
