//! # cardexport-codec
//!
//! Value-level codecs for writing vCard 2.1 and 3.0.
//!
//! ## Features
//!
//! - **Escaping**: dialect-dependent escaping of free-text values
//! - **Quoted-Printable**: every byte escaped, soft breaks below 76 columns
//! - **Base64**: inline binary data with folded continuation lines
//! - **Property lines**: `NAME;PARAMS:VALUE` assembly with fixed parameter order
//! - **Charsets**: UTF-8 and `Shift_JIS` output
//!
//! ## Quick Start
//!
//! ```
//! use cardexport_codec::{Charset, Escaper, PropertyLine, Version};
//!
//! let escaper = Escaper::new(Version::V30, false);
//! let value = escaper.escape("Doe;John");
//! let line = PropertyLine::new("FN", Version::V30).text(&value);
//! assert_eq!(line, "FN:Doe\\;John\r\n");
//!
//! let note = PropertyLine::new("NOTE", Version::V21)
//!     .quoted_printable(Charset::ShiftJis, &["日"]);
//! assert_eq!(note, "NOTE;CHARSET=SHIFT_JIS;ENCODING=QUOTED-PRINTABLE:=93=FA\r\n");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod charset;
mod error;
mod escape;
mod line;
mod version;

pub mod encoding;

pub use charset::Charset;
pub use encoding::{
    decode_base64, decode_quoted_printable, encode_base64, encode_quoted_printable,
    fold_base64_line, normalize_crlf,
};
pub use error::{Error, Result};
pub use escape::Escaper;
pub use line::{CRLF, PropertyLine, QUOTED_PRINTABLE_ATTRIBUTE, TypeParam};
pub use version::Version;
