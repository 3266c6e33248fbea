//! Property line assembly.
//!
//! A [`PropertyLine`] collects the property name and its parameters, then
//! renders the complete `NAME;PARAM...:VALUE\r\n` line for one of three
//! value forms: plain text, Quoted-Printable or folded Base64.
//!
//! Parameters are always written in the order `CHARSET`, `ENCODING`, `TYPE`.
//!
//! # Example
//!
//! ```
//! use cardexport_codec::{Charset, PropertyLine, TypeParam, Version};
//!
//! let line = PropertyLine::new("TEL", Version::V30)
//!     .type_param(TypeParam::typed("HOME"))
//!     .type_param(TypeParam::typed("VOICE"))
//!     .text("555-0100");
//! assert_eq!(line, "TEL;TYPE=HOME;TYPE=VOICE:555-0100\r\n");
//!
//! let line = PropertyLine::new("NOTE", Version::V21)
//!     .quoted_printable(Charset::Utf8, &["é"]);
//! assert_eq!(line, "NOTE;CHARSET=UTF-8;ENCODING=QUOTED-PRINTABLE:=C3=A9\r\n");
//! ```

use crate::charset::Charset;
use crate::encoding::{encode_base64, encode_quoted_printable_at, fold_base64_line};
use crate::version::Version;

/// Line terminator.
pub const CRLF: &str = "\r\n";

/// `ENCODING=` parameter for Quoted-Printable values.
pub const QUOTED_PRINTABLE_ATTRIBUTE: &str = "ENCODING=QUOTED-PRINTABLE";

/// A `TYPE` parameter token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeParam {
    /// Written as `TYPE=<token>` under vCard 3.0, bare under vCard 2.1.
    Typed(String),
    /// Always written bare, even under vCard 3.0.
    Bare(String),
}

impl TypeParam {
    /// Creates a version-dependent token.
    #[must_use]
    pub fn typed(token: impl Into<String>) -> Self {
        Self::Typed(token.into())
    }

    /// Creates a token that never receives the `TYPE=` prefix.
    #[must_use]
    pub fn bare(token: impl Into<String>) -> Self {
        Self::Bare(token.into())
    }

    /// The token without any prefix.
    #[must_use]
    pub fn token(&self) -> &str {
        match self {
            Self::Typed(token) | Self::Bare(token) => token,
        }
    }

    fn render(&self, version: Version) -> String {
        match self {
            Self::Typed(token) if version.is_v30() => format!("TYPE={token}"),
            Self::Typed(token) | Self::Bare(token) => token.clone(),
        }
    }
}

/// Builder for one vCard property line.
#[derive(Debug, Clone)]
pub struct PropertyLine {
    name: String,
    version: Version,
    leading_param: Option<String>,
    inline_label: Option<String>,
    charset: Option<Charset>,
    types: Vec<TypeParam>,
}

impl PropertyLine {
    /// Starts a line for the given property name.
    #[must_use]
    pub fn new(name: impl Into<String>, version: Version) -> Self {
        Self {
            name: name.into(),
            version,
            leading_param: None,
            inline_label: None,
            charset: None,
            types: Vec::new(),
        }
    }

    /// Adds the `CHARSET=` parameter.
    #[must_use]
    pub fn charset(mut self, charset: Charset) -> Self {
        self.charset = Some(charset);
        self
    }

    /// Adds the `CHARSET=` parameter when `needed` is true.
    #[must_use]
    pub fn charset_if(self, needed: bool, charset: Charset) -> Self {
        if needed { self.charset(charset) } else { self }
    }

    /// Appends a `TYPE` token.
    #[must_use]
    pub fn type_param(mut self, param: TypeParam) -> Self {
        self.types.push(param);
        self
    }

    /// Appends several `TYPE` tokens.
    #[must_use]
    pub fn type_params(mut self, params: impl IntoIterator<Item = TypeParam>) -> Self {
        self.types.extend(params);
        self
    }

    /// Writes a parameter directly after the property name, ahead of
    /// `CHARSET`.
    ///
    /// Used for the `SOUND;X-IRMC-N` phonetic name marker.
    #[must_use]
    pub fn leading_param(mut self, param: impl Into<String>) -> Self {
        self.leading_param = Some(param.into());
        self
    }

    /// Writes `X-<label>:` directly after the property name.
    ///
    /// Used by custom-labelled addresses, whose remaining parameters then
    /// follow the label without a separator. Importers of the handset
    /// format rely on this exact shape.
    #[must_use]
    pub fn inline_label(mut self, label: impl Into<String>) -> Self {
        self.inline_label = Some(label.into());
        self
    }

    fn head(&self, encoding: Option<&str>) -> String {
        let mut params: Vec<String> = Vec::with_capacity(self.types.len() + 2);
        if let Some(charset) = self.charset {
            params.push(charset.attribute().to_string());
        }
        if let Some(encoding) = encoding {
            params.push(encoding.to_string());
        }
        params.extend(self.types.iter().map(|t| t.render(self.version)));

        let mut head = self.name.clone();
        if let Some(leading) = &self.leading_param {
            head.push(';');
            head.push_str(leading);
        }
        if let Some(label) = &self.inline_label {
            head.push_str(";X-");
            head.push_str(label);
            head.push(':');
            head.push_str(&params.join(";"));
        } else {
            for param in &params {
                head.push(';');
                head.push_str(param);
            }
        }
        head.push(':');
        head
    }

    /// Renders the line with a value written verbatim.
    ///
    /// The caller is responsible for escaping.
    #[must_use]
    pub fn text(&self, value: &str) -> String {
        let mut line = self.head(None);
        line.push_str(value);
        line.push_str(CRLF);
        line
    }

    /// Renders the line with each piece Quoted-Printable encoded and the
    /// pieces joined by `;`.
    ///
    /// The `CHARSET` parameter is always written. Soft breaks account for
    /// the parameter section, so no physical line exceeds 76 columns.
    #[must_use]
    pub fn quoted_printable(&self, charset: Charset, pieces: &[&str]) -> String {
        let mut line = self
            .clone()
            .charset(charset)
            .head(Some(QUOTED_PRINTABLE_ATTRIBUTE));
        let mut column = line.len();

        for (i, piece) in pieces.iter().enumerate() {
            if i > 0 {
                line.push(';');
                column += 1;
            }
            let (encoded, end) = encode_quoted_printable_at(piece, charset, column);
            line.push_str(&encoded);
            column = end;
        }

        line.push_str(CRLF);
        line
    }

    /// Renders the line with the data Base64 encoded, folded at 73 columns
    /// and followed by an empty line.
    #[must_use]
    pub fn base64(&self, data: &[u8]) -> String {
        let mut line = self.head(Some(self.version.base64_attribute()));
        line.push_str(&encode_base64(data));

        let mut folded = fold_base64_line(&line);
        folded.push_str(CRLF);
        folded.push_str(CRLF);
        folded
    }
}
