//! # Text Encodings
//!
//! Converts Unicode strings into the single- or multi-byte forms a receipt
//! printer expects for its active character table.
//!
//! | Name(s) | Encoding | Unmappable characters |
//! |---------|----------|-----------------------|
//! | `ascii`, `us-ascii` | 7-bit ASCII | replaced with `?` |
//! | `utf-8`, `utf8` | UTF-8 | none |
//! | `cp437`, `ibm437`, `437` | IBM Code Page 437 | replaced with `?` |
//! | `latin1`, `iso-8859-1` | ISO 8859-1 | replaced with `?` |
//!
//! The printer must be switched to the matching table (`ESC t n`) for
//! single-byte encodings to render correctly. Replacements are reported
//! through `tracing` at `warn` level.

use std::fmt;
use std::str::FromStr;

use crate::error::{ReciboError, Result};

/// CP437 upper half, indexed by `byte - 0x80`.
const CP437_HIGH: &str = "ÇüéâäàåçêëèïîìÄÅÉæÆôöòûùÿÖÜ¢£¥₧ƒáíóúñÑªº¿⌐¬½¼¡«»\
░▒▓│┤╡╢╖╕╣║╗╝╜╛┐└┴┬├─┼╞╟╚╔╩╦╠═╬╧╨╤╥╙╘╒╓╫╪┘┌█▄▌▐▀\
αßΓπΣσµτΦΘΩδ∞φε∩≡±≥≤⌠⌡÷≈°∙·√ⁿ²■\u{00A0}";

/// A named text encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextEncoding {
    #[default]
    Ascii,
    Utf8,
    Cp437,
    Latin1,
}

impl TextEncoding {
    /// Look up an encoding by name (case-insensitive).
    ///
    /// ```
    /// use recibo::protocol::encoding::TextEncoding;
    ///
    /// assert_eq!(TextEncoding::from_name("UTF-8").unwrap(), TextEncoding::Utf8);
    /// assert!(TextEncoding::from_name("klingon").is_err());
    /// ```
    pub fn from_name(name: &str) -> Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "ascii" | "us-ascii" => Ok(TextEncoding::Ascii),
            "utf-8" | "utf8" => Ok(TextEncoding::Utf8),
            "cp437" | "ibm437" | "437" => Ok(TextEncoding::Cp437),
            "latin1" | "latin-1" | "iso-8859-1" => Ok(TextEncoding::Latin1),
            other => Err(ReciboError::Encoding(other.to_string())),
        }
    }

    /// Canonical name
    pub fn name(self) -> &'static str {
        match self {
            TextEncoding::Ascii => "ascii",
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Cp437 => "cp437",
            TextEncoding::Latin1 => "latin1",
        }
    }

    /// Encode `s` into printer bytes.
    pub fn encode(self, s: &str) -> Vec<u8> {
        match self {
            TextEncoding::Utf8 => s.as_bytes().to_vec(),
            TextEncoding::Ascii => encode_with(s, self, |_| None),
            TextEncoding::Cp437 => encode_with(s, self, cp437_byte),
            TextEncoding::Latin1 => encode_with(s, self, |ch| u8::try_from(ch as u32).ok()),
        }
    }
}

impl FromStr for TextEncoding {
    type Err = ReciboError;

    fn from_str(s: &str) -> Result<Self> {
        TextEncoding::from_name(s)
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// ASCII passes through; anything else goes through `high` or becomes `?`.
fn encode_with(s: &str, encoding: TextEncoding, high: impl Fn(char) -> Option<u8>) -> Vec<u8> {
    let mut out = Vec::with_capacity(s.len());
    for ch in s.chars() {
        if ch.is_ascii() {
            out.push(ch as u8);
        } else if let Some(byte) = high(ch) {
            out.push(byte);
        } else {
            tracing::warn!(
                encoding = encoding.name(),
                "unmapped character '{}' (U+{:04X}), replacing with '?'",
                ch,
                ch as u32
            );
            out.push(b'?');
        }
    }
    out
}

/// Map a Unicode code point to its CP437 byte (0x80–0xFF).
fn cp437_byte(ch: char) -> Option<u8> {
    CP437_HIGH
        .chars()
        .position(|c| c == ch)
        .map(|i| 0x80 + i as u8)
}
