//! vCard entry composition.
//!
//! [`EntryBuilder`] accumulates the lines of one `BEGIN:VCARD` block under a
//! [`Profile`]. The composers in this module drive it for contacts, call
//! history rows and the handset's own number.

mod call_log;
mod contact;
mod names;
mod types;

use cardexport_codec::{Escaper, PropertyLine};

use crate::profile::Profile;

pub use call_log::{
    CALL_DATETIME_PROPERTY, compose_call_log, compose_own_number_entry, format_call_timestamp,
};
pub use contact::{PhotoFormat, compose_contact};
pub use names::{construct_name_from_elements, is_valid_label, to_half_width};
pub use types::{
    DEFAULT_EMAIL_TYPE, MOBILE_EMAIL_LABEL, PostalType, email_type_param, phone_attribute,
    phone_type_params, postal_type,
};

/// Accumulates the property lines of one vCard entry.
#[derive(Debug)]
pub struct EntryBuilder<'a> {
    profile: &'a Profile,
    escaper: Escaper,
    buffer: String,
}

impl<'a> EntryBuilder<'a> {
    /// Starts an entry with `BEGIN` and `VERSION`.
    #[must_use]
    pub fn new(profile: &'a Profile) -> Self {
        let mut builder = Self {
            profile,
            escaper: profile.escaper(),
            buffer: String::with_capacity(512),
        };
        let begin = builder.line("BEGIN").text("VCARD");
        let version = builder.line("VERSION").text(profile.version.as_str());
        builder.push(&begin).push(&version);
        builder
    }

    /// The profile in use.
    #[must_use]
    pub const fn profile(&self) -> &'a Profile {
        self.profile
    }

    /// Starts a property line for this profile's version.
    #[must_use]
    pub fn line(&self, name: &str) -> PropertyLine {
        PropertyLine::new(name, self.profile.version)
    }

    /// Escapes a free-text value for this profile.
    #[must_use]
    pub fn escape(&self, raw: &str) -> String {
        self.escaper.escape(raw)
    }

    /// Appends a rendered line.
    pub fn push(&mut self, rendered: &str) -> &mut Self {
        self.buffer.push_str(rendered);
        self
    }

    /// Appends an escaped text line, with `CHARSET` when the value is not ASCII.
    pub fn append_escaped(&mut self, name: &str, raw: &str) -> &mut Self {
        let line = self
            .line(name)
            .charset_if(!raw.is_ascii(), self.profile.charset)
            .text(&self.escape(raw));
        self.push(&line)
    }

    /// Appends a line whose value is written as is, minus line breaks.
    pub fn append_raw(&mut self, name: &str, raw: &str) -> &mut Self {
        let line = self
            .line(name)
            .charset_if(!raw.is_ascii(), self.profile.charset)
            .text(&strip_line_breaks(raw));
        self.push(&line)
    }

    /// Appends a line that always carries `CHARSET`, Quoted-Printable encoded
    /// when the profile asks for it and escaped otherwise.
    pub fn append_encoded(&mut self, name: &str, raw: &str) -> &mut Self {
        let line = self.line(name);
        let line = if self.profile.uses_qp {
            line.quoted_printable(self.profile.charset, &[raw])
        } else {
            line.charset(self.profile.charset).text(&self.escape(raw))
        };
        self.push(&line)
    }

    /// Appends `END:VCARD` and returns the entry.
    #[must_use]
    pub fn build(mut self) -> String {
        let end = self.line("END").text("VCARD");
        self.buffer.push_str(&end);
        self.buffer
    }
}

/// Removes CR and LF characters from a value that is not escaped.
#[must_use]
pub fn strip_line_breaks(raw: &str) -> String {
    raw.chars().filter(|c| !matches!(c, '\r' | '\n')).collect()
}
