//! Contact entry composer.

use cardexport_codec::TypeParam;

use super::EntryBuilder;
use super::names::{construct_name_from_elements, to_half_width};
use super::types::{PostalType, email_type_param, phone_type_params, postal_type};
use crate::profile::Profile;
use crate::record::{ContactRecord, EmailKind, ImProtocol, NameRow, PhoneKind, PostalKind, PostalRow};

/// Image formats that can be embedded as `PHOTO`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoFormat {
    /// GIF.
    Gif,
    /// PNG.
    Png,
    /// JPEG.
    Jpeg,
}

impl PhotoFormat {
    /// Detects the format from the leading bytes.
    #[must_use]
    pub fn sniff(data: &[u8]) -> Option<Self> {
        if data.starts_with(b"GIF") {
            Some(Self::Gif)
        } else if data.starts_with(&[0x89, b'P', b'N', b'G']) {
            Some(Self::Png)
        } else if data.starts_with(&[0xFF, 0xD8]) {
            Some(Self::Jpeg)
        } else {
            None
        }
    }

    /// The `TYPE` token.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Gif => "GIF",
            Self::Png => "PNG",
            Self::Jpeg => "JPEG",
        }
    }
}

/// Composes the vCard entry for one contact.
#[must_use]
pub fn compose_contact(profile: &Profile, contact: &ContactRecord) -> String {
    let mut builder = EntryBuilder::new(profile);

    append_names(&mut builder, &contact.names);
    append_nicknames(&mut builder, &contact.nicknames);
    append_phones(&mut builder, contact);
    append_emails(&mut builder, contact);
    append_postals(&mut builder, &contact.postals);
    append_ims(&mut builder, contact);
    for website in contact.websites.iter().filter(|w| !w.is_empty()) {
        builder.append_escaped("URL", website);
    }
    if let Some(birthday) = contact.birthday.as_deref().filter(|b| !b.is_empty()) {
        builder.append_escaped("BDAY", birthday);
    }
    for organization in &contact.organizations {
        builder.append_encoded("ORG", &organization.company);
        builder.append_encoded("TITLE", &organization.title);
    }
    append_photos(&mut builder, contact);
    append_notes(&mut builder, &contact.notes);

    if profile.is_docomo {
        builder
            .append_raw("X-CLASS", "PUBLIC")
            .append_raw("X-REDUCTION", "")
            .append_raw("X-NO", "")
            .append_raw("X-DCM-HMN-MODE", "");
    }

    builder.build()
}

fn append_names(builder: &mut EntryBuilder<'_>, names: &[NameRow]) {
    if names.is_empty() {
        if builder.profile().is_docomo {
            builder.append_raw("N", "");
        }
        return;
    }
    for row in names {
        append_structured_name(builder, row);
        append_phonetic_name(builder, row);
    }
}

fn append_structured_name(builder: &mut EntryBuilder<'_>, row: &NameRow) {
    let profile = builder.profile();

    if !row.family.is_empty() || !row.given.is_empty() {
        let raw = [&row.family, &row.given, &row.middle, &row.prefix, &row.suffix];
        let [family, given, middle, prefix, suffix] = raw.map(|piece| builder.escape(piece));
        let needs_charset = raw.iter().any(|piece| !piece.is_ascii());

        // N and FN are escaped, never Quoted-Printable.
        let n = builder
            .line("N")
            .charset_if(needs_charset, profile.charset)
            .text(&[family.as_str(), given.as_str(), middle.as_str(), prefix.as_str(), suffix.as_str()].join(";"));
        let full_name =
            construct_name_from_elements(profile.name_order, &family, &middle, &given, &prefix, &suffix);
        let fn_line = builder
            .line("FN")
            .charset_if(!full_name.is_ascii(), profile.charset)
            .text(&full_name);
        builder.push(&n).push(&fn_line);
    } else if !row.display.is_empty() {
        let value = format!("{};;;;", builder.escape(&row.display));
        let line = builder.line("N").charset(profile.charset).text(&value);
        builder.push(&line);
    } else if profile.is_docomo {
        builder.append_raw("N", "");
    }
}

fn append_phonetic_name(builder: &mut EntryBuilder<'_>, row: &NameRow) {
    let profile = builder.profile();

    let (family, middle, given) = if profile.is_japanese_mobile {
        (
            to_half_width(&row.phonetic_family),
            to_half_width(&row.phonetic_middle),
            to_half_width(&row.phonetic_given),
        )
    } else {
        (
            row.phonetic_family.clone(),
            row.phonetic_middle.clone(),
            row.phonetic_given.clone(),
        )
    };

    if row.has_phonetic() {
        let joined = construct_name_from_elements(profile.name_order, &family, &middle, &given, "", "");
        if profile.is_v30() {
            builder.append_raw("SORT-STRING", &joined);
        } else {
            let needs_charset = !(family.is_ascii() && middle.is_ascii() && given.is_ascii());
            let value = format!(
                "{};{};{};;",
                builder.escape(&family),
                builder.escape(&middle),
                builder.escape(&given)
            );
            let line = builder
                .line("SOUND")
                .leading_param("X-IRMC-N")
                .charset_if(needs_charset, profile.charset)
                .text(&value);
            builder.push(&line);

            if profile.uses_android_property {
                builder.append_raw("X-PHONETIC-NAME", &joined);
            }
        }
    } else if profile.is_docomo {
        let line = builder.line("SOUND").leading_param("X-IRMC-N").text(";;;;");
        builder.push(&line);
    }

    if profile.uses_defact_property {
        for (name, value) in [
            ("X-PHONETIC-FIRST-NAME", &given),
            ("X-PHONETIC-MIDDLE-NAME", &middle),
            ("X-PHONETIC-LAST-NAME", &family),
        ] {
            if !value.is_empty() {
                builder.append_raw(name, value);
            }
        }
    }
}

fn append_nicknames(builder: &mut EntryBuilder<'_>, nicknames: &[String]) {
    let profile = builder.profile();
    let property = if profile.is_v30() {
        "NICKNAME"
    } else if profile.uses_android_property {
        "X-NICKNAME"
    } else {
        return;
    };

    for nickname in nicknames.iter().filter(|n| !n.is_empty()) {
        builder.append_escaped(property, nickname);
    }
}

fn append_phone(builder: &mut EntryBuilder<'_>, kind: PhoneKind, label: Option<&str>, number: &str) {
    let params = phone_type_params(builder.profile(), kind, label);
    let line = builder.line("TEL").type_params(params);
    let line = line
        .charset_if(!number.is_ascii(), builder.profile().charset)
        .text(&super::strip_line_breaks(number));
    builder.push(&line);
}

fn append_phones(builder: &mut EntryBuilder<'_>, contact: &ContactRecord) {
    if contact.phones.is_empty() {
        if builder.profile().is_docomo {
            append_phone(builder, PhoneKind::Home, None, "");
        }
        return;
    }
    for phone in &contact.phones {
        append_phone(builder, phone.kind, phone.label.as_deref(), &phone.number);
    }
}

fn append_email(builder: &mut EntryBuilder<'_>, kind: EmailKind, label: Option<&str>, address: &str) {
    let param = email_type_param(builder.profile(), kind, label);
    let line = builder
        .line("EMAIL")
        .type_param(param)
        .charset_if(!address.is_ascii(), builder.profile().charset)
        .text(&super::strip_line_breaks(address));
    builder.push(&line);
}

fn append_emails(builder: &mut EntryBuilder<'_>, contact: &ContactRecord) {
    if contact.emails.is_empty() {
        if builder.profile().is_docomo {
            append_email(builder, EmailKind::Home, None, "");
        }
        return;
    }
    for email in &contact.emails {
        append_email(builder, email.kind, email.label.as_deref(), &email.address);
    }
}

fn append_postals(builder: &mut EntryBuilder<'_>, postals: &[PostalRow]) {
    if postals.is_empty() {
        if builder.profile().is_docomo {
            let line = builder.line("ADR").type_param(TypeParam::typed("HOME")).text("");
            builder.push(&line);
        }
        return;
    }

    if builder.profile().is_docomo {
        let preferred = [PostalKind::Home, PostalKind::Work, PostalKind::Other, PostalKind::Custom]
            .iter()
            .find_map(|kind| postals.iter().find(|row| row.kind == *kind));
        if let Some(row) = preferred {
            append_postal(builder, row);
        }
    } else {
        for row in postals {
            append_postal(builder, row);
        }
    }
}

fn append_postal(builder: &mut EntryBuilder<'_>, row: &PostalRow) {
    let profile = builder.profile();
    let line = builder.line("ADR");
    let line = match postal_type(profile, row.kind, row.label.as_deref()) {
        PostalType::Token(param) => line.type_param(param),
        PostalType::InlineLabel(label) => line.inline_label(label),
        PostalType::Untyped => line,
    };

    let components = row.components();
    let rendered = if row.is_empty() {
        line.text("")
    } else if profile.uses_qp {
        line.quoted_printable(profile.charset, &components)
    } else {
        let escaped: Vec<String> = components.iter().map(|c| builder.escape(c)).collect();
        line.charset(profile.charset).text(&escaped.join(";"))
    };
    builder.push(&rendered);
}

fn append_ims(builder: &mut EntryBuilder<'_>, contact: &ContactRecord) {
    if !builder.profile().uses_android_property {
        return;
    }
    for im in contact.ims.iter().filter(|im| im.protocol == ImProtocol::GoogleTalk) {
        builder.append_escaped("X-GOOGLE-TALK", &im.handle);
    }
}

fn append_photos(builder: &mut EntryBuilder<'_>, contact: &ContactRecord) {
    for data in contact.photos.iter().filter(|d| !d.is_empty()) {
        let Some(format) = PhotoFormat::sniff(data) else {
            tracing::debug!(contact_id = contact.id, "unknown photo format, skipping");
            continue;
        };
        let line = builder
            .line("PHOTO")
            .type_param(TypeParam::typed(format.as_str()))
            .base64(data);
        builder.push(&line);
    }
}

fn append_notes(builder: &mut EntryBuilder<'_>, notes: &[String]) {
    if notes.is_empty() {
        return;
    }
    if builder.profile().only_one_note {
        let merged = notes
            .iter()
            .filter(|n| !n.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("\n");
        builder.append_encoded("NOTE", &merged);
    } else {
        for note in notes.iter().filter(|n| !n.is_empty()) {
            builder.append_encoded("NOTE", note);
        }
    }
}
