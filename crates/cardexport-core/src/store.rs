//! SQLite address book.
//!
//! Contacts are stored the way handset contact stores lay them out: one
//! `raw_contacts` row per contact and one generic `data` row per name,
//! number, address and so on, tagged with a kind. Call history lives in
//! `calls`.

use sqlx::Row;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};

use crate::Result;
use crate::record::{
    CallLogRecord, ContactRecord, EmailKind, EmailRow, ImProtocol, ImRow, NameRow, OrganizationRow,
    PhoneKind, PhoneRow, PostalKind, PostalRow,
};
use crate::source::MemorySource;

const KIND_NAME: &str = "name";
const KIND_NICKNAME: &str = "nickname";
const KIND_PHONE: &str = "phone";
const KIND_EMAIL: &str = "email";
const KIND_POSTAL: &str = "postal";
const KIND_IM: &str = "im";
const KIND_WEBSITE: &str = "website";
const KIND_BIRTHDAY: &str = "birthday";
const KIND_ORGANIZATION: &str = "organization";
const KIND_PHOTO: &str = "photo";
const KIND_NOTE: &str = "note";

/// One `data` row before insertion.
#[derive(Debug, Default)]
struct DataRow<'a> {
    kind: &'static str,
    type_code: Option<i32>,
    label: Option<&'a str>,
    values: Vec<&'a str>,
    photo: Option<&'a [u8]>,
}

impl<'a> DataRow<'a> {
    fn new(kind: &'static str, values: Vec<&'a str>) -> Self {
        Self {
            kind,
            values,
            ..Self::default()
        }
    }

    fn typed(mut self, code: i32, label: Option<&'a str>) -> Self {
        self.type_code = Some(code);
        self.label = label;
        self
    }
}

fn data_rows(contact: &ContactRecord) -> Vec<DataRow<'_>> {
    let mut rows = Vec::new();
    for name in &contact.names {
        rows.push(DataRow::new(
            KIND_NAME,
            vec![
                name.family.as_str(),
                name.middle.as_str(),
                name.given.as_str(),
                name.prefix.as_str(),
                name.suffix.as_str(),
                name.display.as_str(),
                name.phonetic_family.as_str(),
                name.phonetic_middle.as_str(),
                name.phonetic_given.as_str(),
            ],
        ));
    }
    rows.extend(contact.nicknames.iter().map(|n| DataRow::new(KIND_NICKNAME, vec![n.as_str()])));
    rows.extend(contact.phones.iter().map(|p| {
        DataRow::new(KIND_PHONE, vec![p.number.as_str()]).typed(p.kind.code(), p.label.as_deref())
    }));
    rows.extend(contact.emails.iter().map(|e| {
        DataRow::new(KIND_EMAIL, vec![e.address.as_str()]).typed(e.kind.code(), e.label.as_deref())
    }));
    rows.extend(contact.postals.iter().map(|p| {
        DataRow::new(KIND_POSTAL, p.components().to_vec()).typed(p.kind.code(), p.label.as_deref())
    }));
    rows.extend(
        contact
            .ims
            .iter()
            .map(|im| DataRow::new(KIND_IM, vec![im.handle.as_str()]).typed(im.protocol.code(), None)),
    );
    rows.extend(contact.websites.iter().map(|w| DataRow::new(KIND_WEBSITE, vec![w.as_str()])));
    rows.extend(contact.birthday.iter().map(|b| DataRow::new(KIND_BIRTHDAY, vec![b.as_str()])));
    rows.extend(
        contact
            .organizations
            .iter()
            .map(|o| DataRow::new(KIND_ORGANIZATION, vec![o.company.as_str(), o.title.as_str()])),
    );
    rows.extend(contact.photos.iter().map(|p| DataRow {
        photo: Some(p.as_slice()),
        ..DataRow::new(KIND_PHOTO, Vec::new())
    }));
    rows.extend(contact.notes.iter().map(|n| DataRow::new(KIND_NOTE, vec![n.as_str()])));
    rows
}

fn text(row: &SqliteRow, index: usize) -> String {
    row.get::<Option<String>, _>(format!("data{index}").as_str())
        .unwrap_or_default()
}

/// Adds one `data` row to a contact. Returns false for unknown kinds.
fn apply_data_row(contact: &mut ContactRecord, row: &SqliteRow) -> bool {
    let kind: String = row.get("kind");
    let type_code: Option<i32> = row.get("type_code");
    let label: Option<String> = row.get("label");

    match kind.as_str() {
        KIND_NAME => contact.names.push(NameRow {
            family: text(row, 1),
            middle: text(row, 2),
            given: text(row, 3),
            prefix: text(row, 4),
            suffix: text(row, 5),
            display: text(row, 6),
            phonetic_family: text(row, 7),
            phonetic_middle: text(row, 8),
            phonetic_given: text(row, 9),
        }),
        KIND_NICKNAME => contact.nicknames.push(text(row, 1)),
        KIND_PHONE => contact.phones.push(PhoneRow {
            kind: type_code.and_then(PhoneKind::from_code).unwrap_or(PhoneKind::Other),
            label,
            number: text(row, 1),
        }),
        KIND_EMAIL => contact.emails.push(EmailRow {
            kind: type_code.and_then(EmailKind::from_code).unwrap_or_default(),
            label,
            address: text(row, 1),
        }),
        KIND_POSTAL => contact.postals.push(PostalRow {
            kind: type_code.and_then(PostalKind::from_code).unwrap_or_default(),
            label,
            po_box: text(row, 1),
            extended: text(row, 2),
            street: text(row, 3),
            city: text(row, 4),
            region: text(row, 5),
            postal_code: text(row, 6),
            country: text(row, 7),
        }),
        KIND_IM => contact.ims.push(ImRow {
            protocol: type_code
                .and_then(ImProtocol::from_code)
                .unwrap_or(ImProtocol::Custom),
            handle: text(row, 1),
        }),
        KIND_WEBSITE => contact.websites.push(text(row, 1)),
        KIND_BIRTHDAY => {
            if contact.birthday.is_none() {
                contact.birthday = Some(text(row, 1));
            }
        }
        KIND_ORGANIZATION => contact.organizations.push(OrganizationRow {
            company: text(row, 1),
            title: text(row, 2),
        }),
        KIND_PHOTO => {
            if let Some(photo) = row.get::<Option<Vec<u8>>, _>("photo") {
                contact.photos.push(photo);
            }
        }
        KIND_NOTE => contact.notes.push(text(row, 1)),
        _ => return false,
    }
    true
}

/// SQLite-backed address book.
pub struct AddressBook {
    pool: SqlitePool,
}

impl AddressBook {
    /// Opens the address book at the given path.
    ///
    /// Creates the database and tables if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails or schema creation fails.
    pub async fn new(database_path: &str) -> Result<Self> {
        let url = format!("sqlite:{database_path}?mode=rwc");
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&url)
            .await?;

        let book = Self { pool };
        book.initialize().await?;
        Ok(book)
    }

    /// Create an in-memory address book for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails or schema creation fails.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;

        let book = Self { pool };
        book.initialize().await?;
        Ok(book)
    }

    async fn initialize(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS raw_contacts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                deleted INTEGER NOT NULL DEFAULT 0
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS data (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                raw_contact_id INTEGER NOT NULL REFERENCES raw_contacts(id) ON DELETE CASCADE,
                kind TEXT NOT NULL,
                type_code INTEGER,
                label TEXT,
                data1 TEXT, data2 TEXT, data3 TEXT,
                data4 TEXT, data5 TEXT, data6 TEXT,
                data7 TEXT, data8 TEXT, data9 TEXT,
                photo BLOB
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE INDEX IF NOT EXISTS idx_data_raw_contact ON data(raw_contact_id)
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS calls (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                number TEXT NOT NULL DEFAULT '',
                date INTEGER NOT NULL,
                type INTEGER NOT NULL,
                name TEXT,
                numbertype INTEGER NOT NULL DEFAULT 1,
                numberlabel TEXT
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Stores a contact under a new id and returns that id.
    ///
    /// The record's own id is ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn insert_contact(&self, contact: &ContactRecord) -> Result<i64> {
        let mut tx = self.pool.begin().await?;

        let id = sqlx::query("INSERT INTO raw_contacts (deleted) VALUES (0)")
            .execute(&mut *tx)
            .await?
            .last_insert_rowid();

        for data in data_rows(contact) {
            let mut values = data.values.into_iter();
            let mut query = sqlx::query(
                r"
                INSERT INTO data (raw_contact_id, kind, type_code, label,
                    data1, data2, data3, data4, data5, data6, data7, data8, data9, photo)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                ",
            )
            .bind(id)
            .bind(data.kind)
            .bind(data.type_code)
            .bind(data.label);
            for _ in 0..9 {
                query = query.bind(values.next());
            }
            query.bind(data.photo).execute(&mut *tx).await?;
        }

        tx.commit().await?;
        tracing::debug!(id, "stored contact");
        Ok(id)
    }

    /// Stores a call-history row under a new id and returns that id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn insert_call(&self, call: &CallLogRecord) -> Result<i64> {
        let id = sqlx::query(
            r"
            INSERT INTO calls (number, date, type, name, numbertype, numberlabel)
            VALUES (?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(&call.number)
        .bind(call.date_millis)
        .bind(call.call_type)
        .bind(call.cached_name.as_deref())
        .bind(call.cached_number_type)
        .bind(call.cached_number_label.as_deref())
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        Ok(id)
    }

    /// Marks a contact as deleted. Deleted contacts are not exported.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn delete_contact(&self, id: i64) -> Result<()> {
        sqlx::query("UPDATE raw_contacts SET deleted = 1 WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Reads every live contact and call into memory.
    ///
    /// Contacts keep their insertion order; calls are ordered newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn snapshot(&self) -> Result<MemorySource> {
        let ids: Vec<i64> = sqlx::query("SELECT id FROM raw_contacts WHERE deleted = 0 ORDER BY id")
            .fetch_all(&self.pool)
            .await?
            .iter()
            .map(|row| row.get("id"))
            .collect();

        let data = sqlx::query(
            r"
            SELECT data.* FROM data
            JOIN raw_contacts ON raw_contacts.id = data.raw_contact_id
            WHERE raw_contacts.deleted = 0
            ORDER BY data.raw_contact_id, data.id
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut contacts: Vec<ContactRecord> = ids.into_iter().map(ContactRecord::new).collect();
        for row in &data {
            let owner: i64 = row.get("raw_contact_id");
            let Ok(index) = contacts.binary_search_by_key(&owner, |c| c.id) else {
                continue;
            };
            if !apply_data_row(&mut contacts[index], row) {
                let kind: String = row.get("kind");
                tracing::warn!(owner, kind = %kind, "ignoring data row of unknown kind");
            }
        }

        let calls = sqlx::query(
            r"
            SELECT id, number, date, type, name, numbertype, numberlabel
            FROM calls
            ORDER BY date DESC, id DESC
            ",
        )
        .fetch_all(&self.pool)
        .await?
        .iter()
        .map(|row| CallLogRecord {
            id: row.get("id"),
            number: row.get("number"),
            date_millis: row.get("date"),
            call_type: row.get("type"),
            cached_name: row.get("name"),
            cached_number_type: row.get("numbertype"),
            cached_number_label: row.get("numberlabel"),
        })
        .collect();

        tracing::debug!(contacts = contacts.len(), "address book snapshot");
        Ok(MemorySource::new(contacts, calls))
    }
}
