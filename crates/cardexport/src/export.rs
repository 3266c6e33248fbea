//! Blocking export loop.

use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Context;
use cardexport_core::{
    ExportMode, ExportOptions, ExportSession, LoggingHandler, OutputStreamHandler, Profile,
    RecordSource, Selection,
};

/// Outcome of one export run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    /// Rows selected at init.
    pub selected: usize,
    /// Rows processed before the loop stopped.
    pub processed: usize,
    /// Whether the loop stopped on the cancel flag.
    pub cancelled: bool,
}

/// Exports the selected records to a vCard file.
///
/// The cancel flag is checked between entries. The session is terminated
/// on every path, so the output file is flushed and closed.
///
/// # Errors
///
/// Returns an error if the output file cannot be created or the session
/// fails.
pub fn run_export<S: RecordSource>(
    source: S,
    profile: Profile,
    options: ExportOptions,
    mode: ExportMode,
    selection: &Selection,
    output: &Path,
    cancel: &Arc<AtomicBool>,
) -> anyhow::Result<Summary> {
    let file = File::create(output)
        .with_context(|| format!("failed to create output file {}", output.display()))?;

    let mut session = ExportSession::new(source, profile, options);
    session.add_handler(OutputStreamHandler::new(file));
    session.add_handler(LoggingHandler);

    if let Err(e) = session.init(mode, selection) {
        session.terminate();
        return Err(e).context("failed to start export");
    }

    let selected = session.count();
    let mut processed = 0;
    let mut cancelled = false;
    while !session.is_exhausted() {
        if cancel.load(Ordering::Relaxed) {
            tracing::warn!(processed, selected, "export cancelled");
            cancelled = true;
            break;
        }
        if let Err(e) = session.create_one_entry() {
            session.terminate();
            return Err(e).context(format!("export stopped after {processed} entries"));
        }
        processed += 1;
    }
    session.terminate();

    Ok(Summary {
        selected,
        processed,
        cancelled,
    })
}
