//! Mapping of record type enums to vCard `TYPE` tokens.

use cardexport_codec::TypeParam;

use super::names::is_valid_label;
use crate::profile::Profile;
use crate::record::{EmailKind, PhoneKind, PostalKind};

/// Custom email label that older address books used for mobile addresses.
pub const MOBILE_EMAIL_LABEL: &str = "_AUTO_CELL";

/// Default email type token.
pub const DEFAULT_EMAIL_TYPE: &str = "INTERNET";

/// vCard token for phone types outside the common set.
///
/// `None` means vCard has no way to express the type.
#[must_use]
pub const fn phone_attribute(kind: PhoneKind) -> Option<&'static str> {
    match kind {
        PhoneKind::Callback => Some("X-CALLBACK"),
        PhoneKind::Car => Some("CAR"),
        PhoneKind::CompanyMain => Some("X-COMPANY-MAIN"),
        PhoneKind::Isdn => Some("ISDN"),
        PhoneKind::Main => Some("X-MAIN"),
        PhoneKind::OtherFax => Some("FAX"),
        PhoneKind::Radio => Some("X-RADIO"),
        PhoneKind::Telex => Some("X-TELEX"),
        PhoneKind::TtyTdd => Some("X-TTY-TDD"),
        PhoneKind::Assistant => Some("X-ASSISTANT"),
        PhoneKind::Mms => Some("MSG"),
        _ => None,
    }
}

fn custom_token(profile: &Profile, label: Option<&str>) -> Option<String> {
    label
        .filter(|l| profile.uses_android_property && is_valid_label(l))
        .map(|l| format!("X-{l}"))
}

/// `TYPE` tokens for a telephone line.
#[must_use]
pub fn phone_type_params(profile: &Profile, kind: PhoneKind, label: Option<&str>) -> Vec<TypeParam> {
    match kind {
        PhoneKind::Home => vec![TypeParam::typed("HOME"), TypeParam::typed("VOICE")],
        PhoneKind::Work => vec![TypeParam::typed("WORK"), TypeParam::typed("VOICE")],
        PhoneKind::FaxHome => vec![TypeParam::typed("HOME"), TypeParam::typed("FAX")],
        PhoneKind::FaxWork => vec![TypeParam::typed("WORK"), TypeParam::typed("FAX")],
        PhoneKind::Mobile => vec![TypeParam::bare("CELL")],
        PhoneKind::Pager if profile.is_docomo => vec![TypeParam::bare("VOICE")],
        PhoneKind::Pager => vec![TypeParam::typed("PAGER")],
        PhoneKind::Other => vec![TypeParam::typed("VOICE")],
        PhoneKind::Custom => {
            let token = custom_token(profile, label).unwrap_or_else(|| "VOICE".to_string());
            vec![TypeParam::typed(token)]
        }
        _ if profile.is_docomo => vec![TypeParam::bare("VOICE")],
        _ => match phone_attribute(kind) {
            Some(token) => vec![TypeParam::typed(token)],
            None => {
                tracing::error!(?kind, "phone type not supported by vCard");
                Vec::new()
            }
        },
    }
}

/// `TYPE` token for an email line.
#[must_use]
pub fn email_type_param(profile: &Profile, kind: EmailKind, label: Option<&str>) -> TypeParam {
    let token = match kind {
        EmailKind::Home => "HOME".to_string(),
        EmailKind::Work => "WORK".to_string(),
        EmailKind::Mobile => "CELL".to_string(),
        EmailKind::Other => DEFAULT_EMAIL_TYPE.to_string(),
        EmailKind::Custom if label == Some(MOBILE_EMAIL_LABEL) => "CELL".to_string(),
        EmailKind::Custom => {
            custom_token(profile, label).unwrap_or_else(|| DEFAULT_EMAIL_TYPE.to_string())
        }
    };
    TypeParam::typed(token)
}

/// How a postal line declares its type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostalType {
    /// A regular `TYPE` token.
    Token(TypeParam),
    /// `X-<label>:` written straight after `ADR;`.
    InlineLabel(String),
    /// No type at all.
    Untyped,
}

/// Type declaration for a postal line.
#[must_use]
pub fn postal_type(profile: &Profile, kind: PostalKind, label: Option<&str>) -> PostalType {
    match kind {
        PostalKind::Home => PostalType::Token(TypeParam::typed("HOME")),
        PostalKind::Work => PostalType::Token(TypeParam::typed("WORK")),
        PostalKind::Other => PostalType::Untyped,
        PostalKind::Custom => label
            .filter(|l| profile.uses_android_property && is_valid_label(l))
            .map_or(PostalType::Untyped, |l| PostalType::InlineLabel(l.to_string())),
    }
}
