//! Record sources and cursors.
//!
//! A session never talks to storage directly. It opens a [`RecordCursor`]
//! through a [`RecordSource`], walks it one row at a time and, in contact
//! mode, asks the source for the full record behind each id.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::record::{CallLogRecord, ContactRecord};

/// What a session exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportMode {
    /// One vCard per contact.
    #[default]
    Contacts,
    /// One vCard per call-history row.
    CallLog,
}

/// Restricts the rows a cursor yields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    /// Only these ids, when set.
    pub ids: Option<Vec<i64>>,
    /// Only calls at or after this time (milliseconds since the epoch).
    pub since_millis: Option<i64>,
}

impl Selection {
    /// Selects everything.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Selects the given ids.
    #[must_use]
    pub fn ids(ids: impl IntoIterator<Item = i64>) -> Self {
        Self {
            ids: Some(ids.into_iter().collect()),
            since_millis: None,
        }
    }

    /// Returns true if the id passes the id filter.
    #[must_use]
    pub fn accepts_id(&self, id: i64) -> bool {
        self.ids.as_ref().is_none_or(|ids| ids.contains(&id))
    }

    /// Returns true if the call passes both filters.
    #[must_use]
    pub fn accepts_call(&self, call: &CallLogRecord) -> bool {
        self.accepts_id(call.id) && self.since_millis.is_none_or(|since| call.date_millis >= since)
    }
}

/// One cursor position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CursorRow {
    /// A contact id; the record is fetched separately.
    Contact(i64),
    /// A complete call-history row.
    Call(CallLogRecord),
}

/// Forward-only cursor over selected rows.
pub trait RecordCursor: Send {
    /// Number of rows.
    fn len(&self) -> usize;

    /// Returns true if there are no rows.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true once the cursor moved beyond the last row.
    fn is_past_end(&self) -> bool;

    /// Moves to the next row.
    fn advance(&mut self);

    /// The current row, `None` past the end.
    fn row(&self) -> Option<&CursorRow>;

    /// Releases the cursor. Further calls see no rows.
    fn close(&mut self);
}

/// A store contacts and calls are exported from.
pub trait RecordSource {
    /// Cursor type produced by [`RecordSource::open`].
    type Cursor: RecordCursor;

    /// Opens a cursor over the selected rows.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Source`] if the store cannot be queried.
    fn open(&self, mode: ExportMode, selection: &Selection) -> Result<Self::Cursor>;

    /// Fetches all rows of one contact.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Source`] if the contact cannot be read.
    fn fetch_contact(&self, id: i64) -> Result<ContactRecord>;
}

/// Cursor over a materialized row list.
#[derive(Debug, Clone, Default)]
pub struct VecCursor {
    rows: Vec<CursorRow>,
    position: usize,
}

impl VecCursor {
    /// Creates a cursor positioned on the first row.
    #[must_use]
    pub const fn new(rows: Vec<CursorRow>) -> Self {
        Self { rows, position: 0 }
    }
}

impl RecordCursor for VecCursor {
    fn len(&self) -> usize {
        self.rows.len()
    }

    fn is_past_end(&self) -> bool {
        self.position >= self.rows.len()
    }

    fn advance(&mut self) {
        if self.position < self.rows.len() {
            self.position += 1;
        }
    }

    fn row(&self) -> Option<&CursorRow> {
        self.rows.get(self.position)
    }

    fn close(&mut self) {
        self.rows.clear();
        self.position = 0;
    }
}

/// In-memory record source, loadable from JSON.
///
/// ```json
/// {"contacts": [{"id": 1, "names": [{"family": "Doe", "given": "John"}]}],
///  "calls": [{"number": "555", "date_millis": 0, "call_type": 3}]}
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemorySource {
    /// Contacts in export order.
    pub contacts: Vec<ContactRecord>,
    /// Call-history rows in export order.
    pub calls: Vec<CallLogRecord>,
}

impl MemorySource {
    /// Creates a source over the given records.
    #[must_use]
    pub const fn new(contacts: Vec<ContactRecord>, calls: Vec<CallLogRecord>) -> Self {
        Self { contacts, calls }
    }

    /// Parses a JSON document.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let source = Self::from_json(&content)?;
        tracing::debug!(
            path = %path.display(),
            contacts = source.contacts.len(),
            calls = source.calls.len(),
            "loaded record file"
        );
        Ok(source)
    }
}

impl RecordSource for MemorySource {
    type Cursor = VecCursor;

    fn open(&self, mode: ExportMode, selection: &Selection) -> Result<VecCursor> {
        let rows = match mode {
            ExportMode::Contacts => self
                .contacts
                .iter()
                .filter(|c| selection.accepts_id(c.id))
                .map(|c| CursorRow::Contact(c.id))
                .collect(),
            ExportMode::CallLog => self
                .calls
                .iter()
                .filter(|c| selection.accepts_call(c))
                .cloned()
                .map(CursorRow::Call)
                .collect(),
        };
        Ok(VecCursor::new(rows))
    }

    fn fetch_contact(&self, id: i64) -> Result<ContactRecord> {
        self.contacts
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| Error::Source(format!("No contact with id {id}")))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::redundant_clone, clippy::manual_string_new, clippy::needless_collect, clippy::unreadable_literal, clippy::used_underscore_items, clippy::similar_names)]
mod tests {
    use super::*;
    use crate::record::CallType;

    fn sample() -> MemorySource {
        MemorySource::new(
            vec![ContactRecord::new(1), ContactRecord::new(2), ContactRecord::new(3)],
            vec![
                CallLogRecord {
                    id: 10,
                    ..CallLogRecord::new("111", 1_000, CallType::Incoming)
                },
                CallLogRecord {
                    id: 11,
                    ..CallLogRecord::new("222", 5_000, CallType::Missed)
                },
            ],
        )
    }

    #[test]
    fn test_cursor_walk() {
        let mut cursor = sample().open(ExportMode::Contacts, &Selection::all()).unwrap();
        assert_eq!(cursor.len(), 3);

        let mut seen = Vec::new();
        while !cursor.is_past_end() {
            if let Some(CursorRow::Contact(id)) = cursor.row() {
                seen.push(*id);
            }
            cursor.advance();
        }
        assert_eq!(seen, vec![1, 2, 3]);
        assert!(cursor.row().is_none());

        cursor.advance();
        assert!(cursor.is_past_end());
    }

    #[test]
    fn test_close_empties_cursor() {
        let mut cursor = sample().open(ExportMode::Contacts, &Selection::all()).unwrap();
        cursor.close();
        assert!(cursor.is_empty());
        assert!(cursor.is_past_end());
    }

    #[test]
    fn test_selection_by_id() {
        let cursor = sample()
            .open(ExportMode::Contacts, &Selection::ids([2, 3, 99]))
            .unwrap();
        assert_eq!(cursor.len(), 2);
        assert_eq!(cursor.row(), Some(&CursorRow::Contact(2)));
    }

    #[test]
    fn test_calls_since() {
        let selection = Selection {
            since_millis: Some(2_000),
            ..Selection::default()
        };
        let cursor = sample().open(ExportMode::CallLog, &selection).unwrap();
        assert_eq!(cursor.len(), 1);
        match cursor.row() {
            Some(CursorRow::Call(call)) => assert_eq!(call.number, "222"),
            other => panic!("unexpected row: {other:?}"),
        }
    }

    #[test]
    fn test_fetch_missing_contact() {
        let err = sample().fetch_contact(42).unwrap_err();
        assert!(matches!(err, Error::Source(_)));
    }

    #[test]
    fn test_from_json() {
        let source = MemorySource::from_json(
            r#"{"contacts": [{"id": 5, "notes": ["hi"]}], "calls": []}"#,
        )
        .unwrap();
        assert_eq!(source.fetch_contact(5).unwrap().notes, vec!["hi".to_string()]);
        assert!(MemorySource::from_json("{").is_err());
    }
}
