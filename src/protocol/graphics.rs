//! # ESC/POS Graphics Commands
//!
//! This module implements raster images and the stored-graphics buffer.
//!
//! ## Graphics Modes Overview
//!
//! | Mode | Command | Description | Best For |
//! |------|---------|-------------|----------|
//! | Raster | GS v 0 | Print immediately | One-off images |
//! | Stored | GS ( L fn 112 / fn 50 | Store in the print buffer, then print | Logos, bitmaps |
//!
//! ## Bit Packing
//!
//! Graphics data is packed as bytes where each bit represents one dot:
//! - Bit 7 (MSB) = leftmost dot
//! - Bit 0 (LSB) = rightmost dot
//! - 1 = black (print), 0 = white (no print)
//!
//! ```text
//! Byte value 0xF0 = 11110000 = ████░░░░
//! Byte value 0x0F = 00001111 = ░░░░████
//! Byte value 0xAA = 10101010 = █░█░█░█░
//! ```
//!
//! Rows are `ceil(width / 8)` bytes; padding bits at the end of a row are 0.

use super::commands::{GS, u16_le};
use crate::error::{ReciboError, Result};

// ============================================================================
// MONOCHROME BITMAP
// ============================================================================

/// A 1-bit packed image, row-major, MSB-first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonochromeBitmap {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl MonochromeBitmap {
    /// Blank (all white) bitmap.
    pub fn new(width: u32, height: u32) -> Self {
        let stride = width.div_ceil(8) as usize;
        Self {
            width,
            height,
            data: vec![0; stride * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes per row
    pub fn stride(&self) -> usize {
        self.width.div_ceil(8) as usize
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mark the dot at (x, y) black. Out-of-bounds coordinates are ignored.
    pub fn set_black(&mut self, x: u32, y: u32) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = y as usize * self.stride() + (x / 8) as usize;
        self.data[idx] |= 0x80 >> (x % 8);
    }

    #[cfg(test)]
    fn is_black(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let idx = y as usize * self.stride() + (x / 8) as usize;
        self.data[idx] & (0x80 >> (x % 8)) != 0
    }
}

// ============================================================================
// RASTER BIT IMAGE (GS v 0)
// ============================================================================

/// Raster scaling mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RasterMode {
    #[default]
    Normal = 0,
    DoubleWidth = 1,
    DoubleHeight = 2,
    Quadruple = 3,
}

/// # Print Raster Bit Image (GS v 0 m xL xH yL yH d1...dk)
///
/// ## Protocol Details
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | GS v 0 m xL xH yL yH d1...dk |
/// | Hex     | 1D 76 30 m xL xH yL yH d1...dk |
///
/// ## Parameters
///
/// - `width_bytes`: bytes per row (`(width_dots + 7) / 8`), must be nonzero
/// - `height`: rows, must be nonzero
/// - `data`: exactly `width_bytes × height` bytes
///
/// ## Example
///
/// ```
/// use recibo::protocol::graphics::{raster, RasterMode};
///
/// let cmd = raster(&[0xFF, 0x00], 1, 2, RasterMode::Normal).unwrap();
/// assert_eq!(cmd, vec![0x1D, 0x76, 0x30, 0, 1, 0, 2, 0, 0xFF, 0x00]);
/// ```
pub fn raster(data: &[u8], width_bytes: u16, height: u16, mode: RasterMode) -> Result<Vec<u8>> {
    if width_bytes == 0 {
        return Err(ReciboError::out_of_range("raster width", 0, "1..=65535"));
    }
    if height == 0 {
        return Err(ReciboError::out_of_range("raster height", 0, "1..=65535"));
    }
    let expected = width_bytes as usize * height as usize;
    if data.len() != expected {
        return Err(ReciboError::InvalidCommand(format!(
            "raster data length must be {} ({} bytes × {} rows), got {}",
            expected,
            width_bytes,
            height,
            data.len()
        )));
    }

    let [xl, xh] = u16_le(width_bytes);
    let [yl, yh] = u16_le(height);

    let mut cmd = Vec::with_capacity(8 + data.len());
    cmd.extend([GS, b'v', b'0', mode as u8, xl, xh, yl, yh]);
    cmd.extend_from_slice(data);
    Ok(cmd)
}

// ============================================================================
// STORED GRAPHICS (GS ( L)
// ============================================================================

/// Tone/colour parameter `c` for 1st colour.
pub const COLOR_1: u8 = 0x31;

/// Print function selector for "print buffered graphics", short form.
pub const PRINT_FN_2: u8 = 2;

/// Print function selector for "print buffered graphics" (`fn = 50`).
pub const PRINT_FN_50: u8 = 50;

/// Fixed bytes between the length and the payload: m fn a bx by c xL xH yL yH
const STORE_HEADER_LEN: usize = 10;

/// Check a print-function selector without building anything.
pub fn check_print_function(f: u8) -> Result<()> {
    match f {
        PRINT_FN_2 | PRINT_FN_50 => Ok(()),
        other => Err(ReciboError::InvalidCommand(format!(
            "print function must be 2 or 50, got {}",
            other
        ))),
    }
}

/// # Store Raster Graphics in the Print Buffer (GS ( L pL pH 30 70 ...)
///
/// ## Protocol Details
///
/// | Format  | Bytes |
/// |---------|-------|
/// | Hex     | 1D 28 4C pL pH 30 70 30 01 01 c xL xH yL yH d1...dk |
///
/// ## Parameters
///
/// - `pL pH`: 10 + payload length, little-endian; must fit in 16 bits
/// - `a = 0x30`: monochrome, `bx = by = 1`: no scaling
/// - `c`: colour, normally [`COLOR_1`]
/// - `xL xH`, `yL yH`: image size in dots
pub fn store_graphics(bitmap: &MonochromeBitmap, color: u8) -> Result<Vec<u8>> {
    let len = STORE_HEADER_LEN + bitmap.data().len();
    let p = u16::try_from(len)
        .map_err(|_| ReciboError::out_of_range("graphics payload length", len, "0..=65535"))?;
    let x = u16::try_from(bitmap.width())
        .map_err(|_| ReciboError::out_of_range("graphics width", bitmap.width(), "1..=65535"))?;
    let y = u16::try_from(bitmap.height())
        .map_err(|_| ReciboError::out_of_range("graphics height", bitmap.height(), "1..=65535"))?;

    let [pl, ph] = u16_le(p);
    let [xl, xh] = u16_le(x);
    let [yl, yh] = u16_le(y);

    let mut cmd = Vec::with_capacity(5 + len);
    cmd.extend([GS, b'(', b'L', pl, ph, 0x30, 0x70, 0x30, 0x01, 0x01, color, xl, xh, yl, yh]);
    cmd.extend_from_slice(bitmap.data());
    Ok(cmd)
}

/// # Print Buffered Graphics (GS ( L 02 00 30 fn)
///
/// | Format  | Bytes |
/// |---------|-------|
/// | Hex     | 1D 28 4C 02 00 30 fn |
///
/// `fn` must be 2 or 50.
///
/// ```
/// use recibo::protocol::graphics::print_stored_graphics;
///
/// assert_eq!(
///     print_stored_graphics(50).unwrap(),
///     vec![0x1D, 0x28, 0x4C, 0x02, 0x00, 0x30, 0x32]
/// );
/// assert!(print_stored_graphics(49).is_err());
/// ```
pub fn print_stored_graphics(f: u8) -> Result<Vec<u8>> {
    check_print_function(f)?;
    Ok(vec![GS, b'(', b'L', 0x02, 0x00, 0x30, f])
}

// ============================================================================
// TESTS
// ============================================================================
