//! End-to-end export behavior across dialects.

#![allow(clippy::unwrap_used, clippy::redundant_clone, clippy::manual_string_new, clippy::needless_collect, clippy::unreadable_literal, clippy::used_underscore_items, clippy::similar_names)]

use cardexport_codec::{Charset, decode_quoted_printable};
use cardexport_core::record::{
    CallLogRecord, CallType, ContactRecord, EmailKind, EmailRow, NameRow, PhoneKind, PhoneRow,
    PostalKind, PostalRow,
};
use cardexport_core::{
    CollectingHandler, DialectKind, ExportMode, ExportOptions, ExportSession, MemorySource,
    OutputStreamHandler, Profile, Selection, SharedBuffer, compose_call_log, compose_contact,
};
use proptest::prelude::*;

fn lines(entry: &str) -> Vec<&str> {
    entry.split("\r\n").filter(|l| !l.is_empty()).collect()
}

fn profile(kind: DialectKind) -> Profile {
    Profile::for_dialect(kind)
}

#[test]
fn v21_generic_single_name() {
    let contact = ContactRecord {
        names: vec![NameRow::new("Doe", "John")],
        ..ContactRecord::new(1)
    };
    let entry = compose_contact(&profile(DialectKind::V21Generic), &contact);
    assert_eq!(
        lines(&entry),
        ["BEGIN:VCARD", "VERSION:2.1", "N:Doe;John;;;", "FN:John Doe", "END:VCARD"]
    );
}

#[test]
fn v30_generic_non_ascii_name() {
    let contact = ContactRecord {
        names: vec![NameRow::new("日", "太")],
        ..ContactRecord::new(1)
    };
    let entry = compose_contact(&profile(DialectKind::V30Generic), &contact);
    assert!(entry.contains("\r\nN;CHARSET=UTF-8:日;太;;;\r\n"));
    assert!(entry.contains("\r\nFN;CHARSET=UTF-8:太 日\r\n"));
}

#[test]
fn japanese_name_order() {
    let contact = ContactRecord {
        names: vec![NameRow::new("日", "太")],
        ..ContactRecord::new(1)
    };
    let entry = compose_contact(&profile(DialectKind::V30JapaneseUtf8), &contact);
    assert!(entry.contains("\r\nFN;CHARSET=UTF-8:日 太\r\n"));
}

#[test]
fn docomo_pager_is_bare_voice() {
    let contact = ContactRecord {
        phones: vec![PhoneRow::new(PhoneKind::Pager, "0120")],
        ..ContactRecord::new(1)
    };
    let entry = compose_contact(&profile(DialectKind::Docomo), &contact);
    assert!(entry.contains("\r\nTEL;VOICE:0120\r\n"));
    assert!(!entry.contains("PAGER"));
    assert!(!entry.contains("TYPE="));
}

#[test]
fn v30_custom_email_label() {
    let contact = ContactRecord {
        emails: vec![EmailRow::custom("school", "kid@school.edu")],
        ..ContactRecord::new(1)
    };
    let entry = compose_contact(&profile(DialectKind::V30Generic), &contact);
    assert!(entry.contains("\r\nEMAIL;TYPE=X-school:kid@school.edu\r\n"));
}

#[test]
fn v21_png_photo() {
    let contact = ContactRecord {
        photos: vec![vec![0x89, 0x50, 0x4E, 0x47, 0x0D]],
        ..ContactRecord::new(1)
    };
    let entry = compose_contact(&profile(DialectKind::V21Generic), &contact);
    assert!(entry.contains("\r\nPHOTO;ENCODING=BASE64;PNG:iVBORw0=\r\n\r\nEND:VCARD\r\n"));
}

#[test]
fn missed_call_at_epoch() {
    let call = CallLogRecord::new("5551234", 0, CallType::Missed);
    let entry = compose_call_log(&profile(DialectKind::V21Generic), &call);
    assert!(entry.contains("\r\nX-IRMC-CALL-DATETIME;MISSED:19700101T000000Z\r\n"));
}

#[test]
fn docomo_stream_starts_with_primer() {
    let contact = ContactRecord {
        names: vec![NameRow::new("山田", "太郎")],
        postals: vec![
            PostalRow {
                kind: PostalKind::Work,
                city: "東京".to_string(),
                ..PostalRow::default()
            },
            PostalRow {
                kind: PostalKind::Home,
                city: "大阪".to_string(),
                ..PostalRow::default()
            },
        ],
        ..ContactRecord::new(7)
    };
    let source = MemorySource::new(vec![contact], Vec::new());
    let buffer = SharedBuffer::new();
    let mut session = ExportSession::new(source, profile(DialectKind::Docomo), ExportOptions::default());
    session.add_handler(OutputStreamHandler::new(buffer.clone()));
    session.init(ExportMode::Contacts, &Selection::all()).unwrap();
    while !session.is_exhausted() {
        session.create_one_entry().unwrap();
    }
    session.terminate();

    let output = Charset::ShiftJis.decode(&buffer.contents()).unwrap();
    let entries: Vec<&str> = output
        .split_inclusive("END:VCARD\r\n")
        .collect();
    assert_eq!(entries.len(), 2);
    assert!(entries[0].starts_with("BEGIN:VCARD\r\nVERSION:2.1\r\nN:\r\n"));
    assert!(!entries[0].contains("山田"));

    let entry = entries[1];
    assert!(entry.contains("\r\nN;CHARSET=SHIFT_JIS:山田;太郎;;;\r\n"));
    assert!(entry.contains("\r\nFN;CHARSET=SHIFT_JIS:山田 太郎\r\n"));
    assert_eq!(entry.matches("\r\nADR").count(), 1);
    let adr = entry
        .split("\r\n")
        .find(|l| l.starts_with("ADR"))
        .unwrap();
    assert!(adr.starts_with("ADR;CHARSET=SHIFT_JIS;ENCODING=QUOTED-PRINTABLE;HOME:"));
    let value = adr.split_once(":").unwrap().1;
    let city = value.split(';').nth(3).unwrap();
    let bytes = decode_quoted_printable(city).unwrap();
    assert_eq!(Charset::ShiftJis.decode(&bytes).unwrap(), "大阪");
    assert!(entry.ends_with("X-CLASS:PUBLIC\r\nX-REDUCTION:\r\nX-NO:\r\nX-DCM-HMN-MODE:\r\nEND:VCARD\r\n"));
}

#[test]
fn call_log_session_filters_by_time() {
    let calls = vec![
        CallLogRecord::new("1", 1_000, CallType::Incoming),
        CallLogRecord::new("2", 60_000, CallType::Outgoing),
    ];
    let collector = CollectingHandler::new();
    let mut session = ExportSession::new(
        MemorySource::new(Vec::new(), calls),
        profile(DialectKind::V30Generic),
        ExportOptions::default(),
    );
    session.add_handler(collector.clone());
    let selection = Selection {
        since_millis: Some(30_000),
        ..Selection::default()
    };
    session.init(ExportMode::CallLog, &selection).unwrap();
    assert_eq!(session.count(), 1);
    session.create_one_entry().unwrap();
    assert!(session.is_exhausted());
    session.terminate();

    let entries = collector.entries();
    assert!(entries[0].contains("\r\nX-IRMC-CALL-DATETIME;TYPE=OUTGOING:19700101T000100Z\r\n"));
}

#[test]
fn note_survives_both_encodings() {
    let note = "line one\nline two; with, punctuation é";
    let contact = ContactRecord {
        notes: vec![note.to_string()],
        ..ContactRecord::new(1)
    };

    let v21 = compose_contact(&profile(DialectKind::V21Generic), &contact);
    let logical = v21
        .split("NOTE;CHARSET=UTF-8;ENCODING=QUOTED-PRINTABLE:")
        .nth(1)
        .unwrap()
        .split("\r\nEND:VCARD")
        .next()
        .unwrap();
    let decoded = decode_quoted_printable(logical).unwrap();
    assert_eq!(String::from_utf8(decoded).unwrap(), note.replace('\n', "\r\n"));

    let v30 = compose_contact(&profile(DialectKind::V30Generic), &contact);
    assert!(v30.contains("\r\nNOTE;CHARSET=UTF-8:line one\\nline two\\; with\\, punctuation é\r\n"));
}

#[test]
fn email_kinds_on_v21() {
    let contact = ContactRecord {
        emails: vec![
            EmailRow::new(EmailKind::Home, "h@x.org"),
            EmailRow::new(EmailKind::Other, "o@x.org"),
        ],
        ..ContactRecord::new(1)
    };
    let entry = compose_contact(&profile(DialectKind::V21Generic), &contact);
    assert!(entry.contains("\r\nEMAIL;HOME:h@x.org\r\n"));
    assert!(entry.contains("\r\nEMAIL;INTERNET:o@x.org\r\n"));
}

/// Physical lines of an entry, tagged with whether each starts a property.
fn property_lines(entry: &str) -> Vec<(bool, &str)> {
    let mut result = Vec::new();
    let mut in_qp = false;
    let mut soft_break = false;
    for line in entry.split("\r\n") {
        if line.is_empty() || line.starts_with(' ') {
            result.push((false, line));
            continue;
        }
        if soft_break {
            result.push((false, line));
        } else {
            in_qp = line
                .split_once(':')
                .is_some_and(|(head, _)| head.contains("ENCODING=QUOTED-PRINTABLE"))
                || line.starts_with("ADR;X-") && line.contains("ENCODING=QUOTED-PRINTABLE:");
            result.push((true, line));
        }
        soft_break = in_qp && line.ends_with('=');
    }
    result
}

fn text_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ;,:\\\\<>\n\r=é日本語ヤマダ]{0,20}"
}

fn contact_strategy() -> impl Strategy<Value = ContactRecord> {
    (
        prop::collection::vec(
            (text_strategy(), text_strategy(), text_strategy(), text_strategy()),
            0..2,
        ),
        prop::collection::vec((0..=20i32, text_strategy()), 0..3),
        prop::collection::vec(text_strategy(), 0..3),
        prop::collection::vec((0..=3i32, text_strategy(), text_strategy()), 0..3),
        prop::collection::vec(prop::collection::vec(any::<u8>(), 0..200), 0..2),
        text_strategy(),
    )
        .prop_map(|(names, phones, notes, postals, photos, org)| ContactRecord {
            names: names
                .into_iter()
                .map(|(family, given, display, phonetic)| NameRow {
                    display,
                    phonetic_family: phonetic,
                    ..NameRow::new(family, given)
                })
                .collect(),
            phones: phones
                .into_iter()
                .map(|(code, number)| PhoneRow::new(PhoneKind::from_code(code).unwrap(), number))
                .collect(),
            notes,
            postals: postals
                .into_iter()
                .map(|(code, street, city)| PostalRow {
                    kind: PostalKind::from_code(code).unwrap(),
                    label: Some("cabin".to_string()),
                    street,
                    city,
                    ..PostalRow::default()
                })
                .collect(),
            photos: photos
                .into_iter()
                .map(|mut tail| {
                    let mut data = vec![0xFF, 0xD8];
                    data.append(&mut tail);
                    data
                })
                .collect(),
            organizations: vec![cardexport_core::record::OrganizationRow {
                company: org,
                title: String::new(),
            }],
            ..ContactRecord::new(1)
        })
}

fn dialect_strategy() -> impl Strategy<Value = DialectKind> {
    prop::sample::select(DialectKind::ALL.to_vec())
}

proptest! {
    #[test]
    fn prop_line_invariants(contact in contact_strategy(), kind in dialect_strategy()) {
        let profile = Profile::for_dialect(kind);
        let entry = compose_contact(&profile, &contact);

        prop_assert!(entry.ends_with("\r\n"));
        for (starts_property, line) in property_lines(&entry) {
            prop_assert!(!line.contains('\r') && !line.contains('\n'));
            if !starts_property {
                continue;
            }

            let (head, _) = line.split_once(':').unwrap();
            let name = head.split(';').next().unwrap();
            let mut chars = name.chars();
            prop_assert!(chars.next().is_some_and(|c| c.is_ascii_uppercase()), "bad name {}", name);
            prop_assert!(chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '-'));

            if !profile.is_v30() {
                prop_assert!(!head.contains("TYPE="), "TYPE= on v2.1: {}", line);
            }
            if !line.is_ascii() {
                prop_assert!(line.contains(profile.charset_attr()), "missing charset: {}", line);
            }
            if name == "PHOTO" {
                prop_assert!(line.len() <= 73);
            }
            if line.contains("ENCODING=QUOTED-PRINTABLE") {
                prop_assert!(line.len() <= 76);
            }
        }
        for line in entry.split("\r\n") {
            if line.starts_with(' ') {
                prop_assert!(line.len() <= 73);
                prop_assert!(!line[1..].starts_with(' '));
            }
        }
    }

    #[test]
    fn prop_qp_physical_lines(contact in contact_strategy(), kind in dialect_strategy()) {
        let profile = Profile::for_dialect(kind);
        let entry = compose_contact(&profile, &contact);
        let mut in_qp = false;
        for (starts_property, line) in property_lines(&entry) {
            if starts_property {
                in_qp = line.contains("ENCODING=QUOTED-PRINTABLE");
            }
            if in_qp {
                prop_assert!(line.len() <= 76, "long QP line: {}", line);
            }
        }
    }

    #[test]
    fn prop_docomo_invariants(contact in contact_strategy()) {
        let entry = compose_contact(&Profile::for_dialect(DialectKind::Docomo), &contact);
        let names: Vec<&str> = property_lines(&entry)
            .into_iter()
            .filter(|(starts, _)| *starts)
            .map(|(_, line)| line.split([';', ':']).next().unwrap())
            .collect();

        prop_assert_eq!(names.iter().filter(|n| **n == "ADR").count(), 1);
        prop_assert!(names.iter().filter(|n| **n == "NOTE").count() <= 1);
        prop_assert!(names.iter().any(|n| *n == "N"));
        prop_assert!(names.iter().any(|n| *n == "TEL"));
        prop_assert!(names.iter().any(|n| *n == "EMAIL"));
        let tail = &names[names.len() - 5..];
        prop_assert_eq!(tail, &["X-CLASS", "X-REDUCTION", "X-NO", "X-DCM-HMN-MODE", "END"][..]);
    }
}
