//! # ESC/POS Text Styling Commands
//!
//! This module implements text formatting commands for ESC/POS printers.
//!
//! ## Text Styling Overview
//!
//! Effects combine freely and stay active until switched off or until the
//! printer is initialized:
//!
//! | Style | Command | Effect |
//! |-------|---------|--------|
//! | Bold | ESC E n | **Emphasized** text |
//! | Underline | ESC - n | 1- or 2-dot underline |
//! | Double strike | ESC G n | Overstruck text |
//! | Invert | GS B n | White on black |
//! | Size | GS ! n | 1–8× width and height |
//! | Rotate | ESC V n | 90° clockwise |
//!
//! ## Text Alignment
//!
//! ```text
//! Left aligned (default)    |LEFT TEXT
//! Center aligned            |  CENTER TEXT
//! Right aligned             |      RIGHT TEXT
//! ```
//!
//! ## Font Selection
//!
//! | Font | Size | Columns (80mm) |
//! |------|------|----------------|
//! | Font A | 12×24 dots | 48 chars |
//! | Font B | 9×17 dots | 64 chars |

use super::commands::{ESC, GS, LF};
use super::encoding::TextEncoding;
use crate::error::{ReciboError, Result};

// ============================================================================
// TEXT ALIGNMENT
// ============================================================================

/// Text alignment options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left = 0,
    Center = 1,
    Right = 2,
}

impl Alignment {
    /// Parse `left`/`center`/`right`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "left" => Some(Alignment::Left),
            "center" => Some(Alignment::Center),
            "right" => Some(Alignment::Right),
            _ => None,
        }
    }
}

/// # Select Justification (ESC a n)
///
/// Sets the alignment for subsequent text lines.
///
/// ## Protocol Details
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | ESC a n |
/// | Hex     | 1B 61 n |
/// | Decimal | 27 97 n |
///
/// ## Parameters
///
/// - `n = 0`: Left alignment (default)
/// - `n = 1`: Center alignment
/// - `n = 2`: Right alignment
///
/// ## Behavior
///
/// - Takes effect at the start of the next line
/// - Reset by ESC @ (initialize)
///
/// ## Example
///
/// ```
/// use recibo::protocol::text::{align, Alignment};
///
/// assert_eq!(align(Alignment::Center), vec![0x1B, 0x61, 0x01]);
/// ```
pub fn align(alignment: Alignment) -> Vec<u8> {
    vec![ESC, b'a', alignment as u8]
}

/// Convenience function for left alignment
#[inline]
pub fn align_left() -> Vec<u8> {
    align(Alignment::Left)
}

/// Convenience function for center alignment
#[inline]
pub fn align_center() -> Vec<u8> {
    align(Alignment::Center)
}

/// Convenience function for right alignment
#[inline]
pub fn align_right() -> Vec<u8> {
    align(Alignment::Right)
}

// ============================================================================
// FONT SELECTION
// ============================================================================

/// Available fonts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Font {
    /// Font A: 12×24 dots, 48 columns on 80mm paper
    #[default]
    A = 0,
    /// Font B: 9×17 dots, 64 columns on 80mm paper
    B = 1,
}

impl Font {
    /// Parse `A` or `B`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "A" => Some(Font::A),
            "B" => Some(Font::B),
            _ => None,
        }
    }
}

/// # Select Character Font (ESC M n)
///
/// ## Protocol Details
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | ESC M n |
/// | Hex     | 1B 4D n |
/// | Decimal | 27 77 n |
///
/// ## Example
///
/// ```
/// use recibo::protocol::text::{font, Font};
///
/// assert_eq!(font(Font::B), vec![0x1B, 0x4D, 0x01]);
/// ```
pub fn font(f: Font) -> Vec<u8> {
    vec![ESC, b'M', f as u8]
}

// ============================================================================
// EMPHASIS
// ============================================================================

/// # Turn Emphasized Mode On/Off (ESC E n)
///
/// ## Protocol Details
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | ESC E n |
/// | Hex     | 1B 45 n |
/// | Decimal | 27 69 n |
///
/// ## Example
///
/// ```
/// use recibo::protocol::text::bold;
///
/// let mut data = Vec::new();
/// data.extend(bold(true));
/// data.extend(b"IMPORTANT");
/// data.extend(bold(false));
/// assert_eq!(&data[..3], &[0x1B, 0x45, 0x01]);
/// ```
#[inline]
pub fn bold(on: bool) -> Vec<u8> {
    vec![ESC, b'E', on as u8]
}

/// Double-strike mode (ESC G n)
///
/// Visually close to emphasis on most thermal heads.
#[inline]
pub fn double_strike(on: bool) -> Vec<u8> {
    vec![ESC, b'G', on as u8]
}

// ============================================================================
// UNDERLINE
// ============================================================================

/// Underline thickness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnderlineMode {
    #[default]
    Off = 0,
    OneDot = 1,
    TwoDot = 2,
}

/// # Turn Underline Mode On/Off (ESC - n)
///
/// ## Protocol Details
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | ESC - n |
/// | Hex     | 1B 2D n |
/// | Decimal | 27 45 n |
///
/// ## Parameters
///
/// - `n = 0` / `48`: off
/// - `n = 1` / `49`: 1-dot
/// - `n = 2` / `50`: 2-dot
///
/// Any other byte is passed through unchanged; printers ignore values they
/// do not recognize.
#[inline]
pub fn underline(mode: u8) -> Vec<u8> {
    vec![ESC, b'-', mode]
}

/// Underline with a typed mode
#[inline]
pub fn underline_mode(mode: UnderlineMode) -> Vec<u8> {
    underline(mode as u8)
}

#[inline]
pub fn underline_off() -> Vec<u8> {
    underline_mode(UnderlineMode::Off)
}

#[inline]
pub fn underline_one_dot() -> Vec<u8> {
    underline_mode(UnderlineMode::OneDot)
}

#[inline]
pub fn underline_two_dot() -> Vec<u8> {
    underline_mode(UnderlineMode::TwoDot)
}

// ============================================================================
// INVERT
// ============================================================================

/// # White/Black Reverse Printing (GS B n)
///
/// ## Protocol Details
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | GS B n |
/// | Hex     | 1D 42 n |
/// | Decimal | 29 66 n |
#[inline]
pub fn invert(on: bool) -> Vec<u8> {
    vec![GS, b'B', on as u8]
}

// ============================================================================
// CHARACTER SIZE
// ============================================================================

/// # Select Character Size (GS ! n)
///
/// Scales characters by independent width and height multipliers.
///
/// ## Protocol Details
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | GS ! n |
/// | Hex     | 1D 21 n |
/// | Decimal | 29 33 n |
///
/// ## Parameters
///
/// `n = ((height - 1) << 4) | (width - 1)`, both multipliers in `1..=8`.
/// Values outside that range are rejected, never clamped.
///
/// ## Example
///
/// ```
/// use recibo::protocol::text::character_size;
///
/// assert_eq!(character_size(2, 1).unwrap(), vec![0x1D, 0x21, 0x01]);
/// assert_eq!(character_size(1, 2).unwrap(), vec![0x1D, 0x21, 0x10]);
/// assert!(character_size(9, 1).is_err());
/// ```
pub fn character_size(width: u8, height: u8) -> Result<Vec<u8>> {
    if !(1..=8).contains(&width) {
        return Err(ReciboError::out_of_range("width", width, "1..=8"));
    }
    if !(1..=8).contains(&height) {
        return Err(ReciboError::out_of_range("height", height, "1..=8"));
    }
    Ok(vec![GS, b'!', ((height - 1) << 4) | (width - 1)])
}

/// Reset character size to 1×1 (GS ! 0)
#[inline]
pub fn character_size_normal() -> Vec<u8> {
    vec![GS, b'!', 0x00]
}

// ============================================================================
// ROTATION
// ============================================================================

/// 90° clockwise rotation (ESC V n)
#[inline]
pub fn rotate90(on: bool) -> Vec<u8> {
    vec![ESC, b'V', on as u8]
}

// ============================================================================
// SPACING
// ============================================================================

/// # Set Right-Side Character Spacing (ESC SP n)
///
/// Adds `n` motion units to the right of every character.
#[inline]
pub fn right_side_character_spacing(n: u8) -> Vec<u8> {
    vec![ESC, b' ', n]
}

/// Default line spacing, about 1/6 inch (ESC 2)
#[inline]
pub fn line_spacing_default() -> Vec<u8> {
    vec![ESC, b'2']
}

/// # Set Line Spacing (ESC 3 n)
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | ESC 3 n |
/// | Hex     | 1B 33 n |
#[inline]
pub fn line_spacing(n: u8) -> Vec<u8> {
    vec![ESC, b'3', n]
}

// ============================================================================
// PRINT MODE
// ============================================================================

/// Select print mode (ESC ! n)
///
/// Bit field: 0 = font B, 3 = emphasized, 4 = double height,
/// 5 = double width, 7 = underline.
#[inline]
pub fn set_print_mode(n: u8) -> Vec<u8> {
    vec![ESC, b'!', n]
}

#[inline]
pub fn reset_print_mode() -> Vec<u8> {
    set_print_mode(0)
}

/// Smoothing of enlarged characters (GS b n)
#[inline]
pub fn smoothing(on: bool) -> Vec<u8> {
    vec![GS, b'b', on as u8]
}

// ============================================================================
// CHARACTER TABLES
// ============================================================================

/// Character code tables selectable with `ESC t n`.
///
/// Support varies by model and firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CodePage {
    /// PC437 (USA, Standard Europe)
    #[default]
    Cp437 = 0,
    Katakana = 1,
    /// PC850 Multilingual
    Cp850 = 2,
    /// PC860 Portuguese
    Cp860 = 3,
    /// PC863 Canadian-French
    Cp863 = 4,
    /// PC865 Nordic
    Cp865 = 5,
    /// WPC1252 Windows Latin-1
    Cp1252 = 16,
    /// PC866 Cyrillic #2
    Cp866 = 17,
    /// PC852 Latin 2
    Cp852 = 18,
    /// PC858 Euro
    Cp858 = 19,
    Thai42 = 20,
    Thai11 = 21,
    Thai13 = 22,
    Thai14 = 23,
    Thai16 = 24,
    Thai17 = 25,
    Thai18 = 26,
    /// PC874 Thai
    Cp874 = 30,
    Cp1250 = 48,
    Cp1251 = 49,
    Cp1253 = 50,
    Cp1254 = 51,
    Cp1255 = 52,
    Cp1256 = 53,
    Cp1257 = 54,
    Cp1258 = 55,
    Utf8 = 255,
}

impl From<CodePage> for u8 {
    fn from(cp: CodePage) -> u8 {
        cp as u8
    }
}

/// # Select Character Code Table (ESC t n)
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | ESC t n |
/// | Hex     | 1B 74 n |
///
/// Accepts a [`CodePage`] or a raw table number.
///
/// ```
/// use recibo::protocol::text::{select_code_page, CodePage};
///
/// assert_eq!(select_code_page(CodePage::Cp1252), vec![0x1B, 0x74, 16]);
/// assert_eq!(select_code_page(7u8), vec![0x1B, 0x74, 7]);
/// ```
pub fn select_code_page(n: impl Into<u8>) -> Vec<u8> {
    vec![ESC, b't', n.into()]
}

/// Select an international character set (ESC R n)
#[inline]
pub fn international_character_set(n: u8) -> Vec<u8> {
    vec![ESC, b'R', n]
}

// ============================================================================
// TEXT
// ============================================================================

/// Encode `s` for printing without a line terminator.
pub fn text(s: &str, encoding: TextEncoding) -> Vec<u8> {
    encoding.encode(s)
}

/// Encode `s` followed by LF, printing the line.
///
/// ```
/// use recibo::protocol::encoding::TextEncoding;
/// use recibo::protocol::text::print_line;
///
/// assert_eq!(print_line("Hi", TextEncoding::Ascii), b"Hi\n".to_vec());
/// ```
pub fn print_line(s: &str, encoding: TextEncoding) -> Vec<u8> {
    let mut out = encoding.encode(s);
    out.push(LF);
    out
}

// ============================================================================
// TESTS
// ============================================================================
