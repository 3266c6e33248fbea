//! Contact record model.

use serde::{Deserialize, Serialize};

/// One structured name row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NameRow {
    /// Family name.
    pub family: String,
    /// Middle name.
    pub middle: String,
    /// Given name.
    pub given: String,
    /// Honorific prefix.
    pub prefix: String,
    /// Honorific suffix.
    pub suffix: String,
    /// Free-form display name.
    pub display: String,
    /// Phonetic family name.
    pub phonetic_family: String,
    /// Phonetic middle name.
    pub phonetic_middle: String,
    /// Phonetic given name.
    pub phonetic_given: String,
}

impl NameRow {
    /// Creates a row from family and given names.
    #[must_use]
    pub fn new(family: impl Into<String>, given: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            given: given.into(),
            ..Self::default()
        }
    }

    /// Returns true if any phonetic piece is present.
    #[must_use]
    pub fn has_phonetic(&self) -> bool {
        !(self.phonetic_family.is_empty()
            && self.phonetic_middle.is_empty()
            && self.phonetic_given.is_empty())
    }
}

/// Telephone number types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhoneKind {
    /// Custom type described by the row label.
    Custom,
    /// Home.
    #[default]
    Home,
    /// Mobile.
    Mobile,
    /// Work.
    Work,
    /// Work fax.
    FaxWork,
    /// Home fax.
    FaxHome,
    /// Pager.
    Pager,
    /// Other.
    Other,
    /// Callback.
    Callback,
    /// Car.
    Car,
    /// Company main line.
    CompanyMain,
    /// ISDN.
    Isdn,
    /// Main line.
    Main,
    /// Other fax.
    OtherFax,
    /// Radio.
    Radio,
    /// Telex.
    Telex,
    /// TTY/TDD.
    TtyTdd,
    /// Work mobile.
    WorkMobile,
    /// Work pager.
    WorkPager,
    /// Assistant.
    Assistant,
    /// MMS.
    Mms,
}

impl PhoneKind {
    /// Maps a contact-store type code.
    #[must_use]
    pub const fn from_code(code: i32) -> Option<Self> {
        Some(match code {
            0 => Self::Custom,
            1 => Self::Home,
            2 => Self::Mobile,
            3 => Self::Work,
            4 => Self::FaxWork,
            5 => Self::FaxHome,
            6 => Self::Pager,
            7 => Self::Other,
            8 => Self::Callback,
            9 => Self::Car,
            10 => Self::CompanyMain,
            11 => Self::Isdn,
            12 => Self::Main,
            13 => Self::OtherFax,
            14 => Self::Radio,
            15 => Self::Telex,
            16 => Self::TtyTdd,
            17 => Self::WorkMobile,
            18 => Self::WorkPager,
            19 => Self::Assistant,
            20 => Self::Mms,
            _ => return None,
        })
    }

    /// The contact-store type code.
    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }
}

/// One telephone row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhoneRow {
    /// Number type.
    pub kind: PhoneKind,
    /// Label for [`PhoneKind::Custom`].
    pub label: Option<String>,
    /// The number as entered.
    pub number: String,
}

impl PhoneRow {
    /// Creates a row without label.
    #[must_use]
    pub fn new(kind: PhoneKind, number: impl Into<String>) -> Self {
        Self {
            kind,
            label: None,
            number: number.into(),
        }
    }

    /// Creates a custom-labelled row.
    #[must_use]
    pub fn custom(label: impl Into<String>, number: impl Into<String>) -> Self {
        Self {
            kind: PhoneKind::Custom,
            label: Some(label.into()),
            number: number.into(),
        }
    }
}

/// Email address types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmailKind {
    /// Custom type described by the row label.
    Custom,
    /// Home.
    Home,
    /// Work.
    Work,
    /// Other.
    #[default]
    Other,
    /// Mobile.
    Mobile,
}

impl EmailKind {
    /// Maps a contact-store type code.
    #[must_use]
    pub const fn from_code(code: i32) -> Option<Self> {
        Some(match code {
            0 => Self::Custom,
            1 => Self::Home,
            2 => Self::Work,
            3 => Self::Other,
            4 => Self::Mobile,
            _ => return None,
        })
    }

    /// The contact-store type code.
    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }
}

/// One email row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailRow {
    /// Address type.
    pub kind: EmailKind,
    /// Label for [`EmailKind::Custom`].
    pub label: Option<String>,
    /// The address.
    pub address: String,
}

impl EmailRow {
    /// Creates a row without label.
    #[must_use]
    pub fn new(kind: EmailKind, address: impl Into<String>) -> Self {
        Self {
            kind,
            label: None,
            address: address.into(),
        }
    }

    /// Creates a custom-labelled row.
    #[must_use]
    pub fn custom(label: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            kind: EmailKind::Custom,
            label: Some(label.into()),
            address: address.into(),
        }
    }
}

/// Postal address types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostalKind {
    /// Custom type described by the row label.
    Custom,
    /// Home.
    Home,
    /// Work.
    Work,
    /// Other.
    #[default]
    Other,
}

impl PostalKind {
    /// Maps a contact-store type code.
    #[must_use]
    pub const fn from_code(code: i32) -> Option<Self> {
        Some(match code {
            0 => Self::Custom,
            1 => Self::Home,
            2 => Self::Work,
            3 => Self::Other,
            _ => return None,
        })
    }

    /// The contact-store type code.
    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }
}

/// One postal address row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostalRow {
    /// Address type.
    pub kind: PostalKind,
    /// Label for [`PostalKind::Custom`].
    pub label: Option<String>,
    /// Post office box.
    pub po_box: String,
    /// Extended address (neighborhood, apartment).
    pub extended: String,
    /// Street.
    pub street: String,
    /// City.
    pub city: String,
    /// Region or state.
    pub region: String,
    /// Postal code.
    pub postal_code: String,
    /// Country.
    pub country: String,
}

impl PostalRow {
    /// The seven `ADR` components in vCard order.
    #[must_use]
    pub fn components(&self) -> [&str; 7] {
        [
            &self.po_box,
            &self.extended,
            &self.street,
            &self.city,
            &self.region,
            &self.postal_code,
            &self.country,
        ]
    }

    /// Returns true if every component is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components().iter().all(|c| c.is_empty())
    }
}

/// Instant messaging protocols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImProtocol {
    /// Custom protocol.
    Custom,
    /// AOL Instant Messenger.
    Aim,
    /// MSN / Windows Live.
    Msn,
    /// Yahoo Messenger.
    Yahoo,
    /// Skype.
    Skype,
    /// QQ.
    Qq,
    /// Google Talk.
    GoogleTalk,
    /// ICQ.
    Icq,
    /// Jabber / XMPP.
    Jabber,
    /// NetMeeting.
    NetMeeting,
}

impl ImProtocol {
    /// Maps a contact-store protocol code.
    #[must_use]
    pub const fn from_code(code: i32) -> Option<Self> {
        Some(match code {
            -1 => Self::Custom,
            0 => Self::Aim,
            1 => Self::Msn,
            2 => Self::Yahoo,
            3 => Self::Skype,
            4 => Self::Qq,
            5 => Self::GoogleTalk,
            6 => Self::Icq,
            7 => Self::Jabber,
            8 => Self::NetMeeting,
            _ => return None,
        })
    }

    /// The contact-store protocol code.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Custom => -1,
            Self::Aim => 0,
            Self::Msn => 1,
            Self::Yahoo => 2,
            Self::Skype => 3,
            Self::Qq => 4,
            Self::GoogleTalk => 5,
            Self::Icq => 6,
            Self::Jabber => 7,
            Self::NetMeeting => 8,
        }
    }

    /// The vCard extension property for this protocol, if one exists.
    #[must_use]
    pub const fn property_name(self) -> Option<&'static str> {
        match self {
            Self::Aim => Some("X-AIM"),
            Self::Msn => Some("X-MSN"),
            Self::Yahoo => Some("X-YAHOO"),
            Self::Icq => Some("X-ICQ"),
            Self::Jabber => Some("X-JABBER"),
            Self::Skype => Some("X-SKYPE-USERNAME"),
            Self::Custom | Self::Qq | Self::GoogleTalk | Self::NetMeeting => None,
        }
    }
}

/// One instant messaging row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImRow {
    /// Protocol.
    pub protocol: ImProtocol,
    /// Handle on that protocol.
    pub handle: String,
}

/// One organization row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrganizationRow {
    /// Company name.
    pub company: String,
    /// Job title.
    pub title: String,
}

/// All rows of one contact, grouped by kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactRecord {
    /// Contact id in the source.
    pub id: i64,
    /// Structured names.
    pub names: Vec<NameRow>,
    /// Nicknames.
    pub nicknames: Vec<String>,
    /// Telephone numbers.
    pub phones: Vec<PhoneRow>,
    /// Email addresses.
    pub emails: Vec<EmailRow>,
    /// Postal addresses.
    pub postals: Vec<PostalRow>,
    /// Instant messaging handles.
    pub ims: Vec<ImRow>,
    /// Website URLs.
    pub websites: Vec<String>,
    /// Birthday, as stored.
    pub birthday: Option<String>,
    /// Organizations.
    pub organizations: Vec<OrganizationRow>,
    /// Raw photo bytes, Base64 strings in JSON.
    #[serde(with = "photo_serde")]
    pub photos: Vec<Vec<u8>>,
    /// Notes.
    pub notes: Vec<String>,
}

impl ContactRecord {
    /// Creates an empty record.
    #[must_use]
    pub fn new(id: i64) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    /// Total size of the photo payloads in bytes.
    #[must_use]
    pub fn photo_bytes(&self) -> usize {
        self.photos.iter().map(Vec::len).sum()
    }
}

/// Serde helpers for photo payloads (Base64 text in JSON).
mod photo_serde {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use serde::{Deserialize, Deserializer, Serializer, ser::SerializeSeq};

    pub fn serialize<S>(photos: &[Vec<u8>], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(photos.len()))?;
        for photo in photos {
            seq.serialize_element(&STANDARD.encode(photo))?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Vec<u8>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded = Vec::<String>::deserialize(deserializer)?;
        encoded
            .iter()
            .map(|s| STANDARD.decode(s).map_err(serde::de::Error::custom))
            .collect()
    }
}
