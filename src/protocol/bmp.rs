//! # BMP Transcoding
//!
//! Converts Windows BMP files into the printer's 1-bit raster format and
//! frames the result as a stored-graphics print job.
//!
//! ## Accepted Input
//!
//! | Field | Accepted |
//! |-------|----------|
//! | Header | 14-byte file header + ≥40-byte info header |
//! | Bits per pixel | 1, 4, 8 (palette), 16 (RGB555), 24, 32 (alpha ignored) |
//! | Compression | none, RLE8 (8bpp only), RLE4 (4bpp only) |
//! | Size | 1..=2047 × 1..=1662 dots (TM-T20 graphics buffer) |
//! | Row order | bottom-up, or top-down when height is negative |
//!
//! ## Thresholding
//!
//! A pixel becomes black when its integer luminance
//! `(R*30 + G*59 + B*11) / 100` is below 128. There is no dithering.
//!
//! ## Example
//!
//! ```no_run
//! use recibo::protocol::bmp;
//!
//! let file = std::fs::read("logo.bmp").unwrap();
//! let bytes = bmp::print_bmp(&file, 50).unwrap();
//! ```

use thiserror::Error;

use super::graphics::{self, MonochromeBitmap};
use crate::printer::PrinterConfig;

/// Reasons a BMP file is rejected. Each is raised before any output exists.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BitmapError {
    #[error("BMP data too small ({0} bytes, need at least 54)")]
    TooSmall(usize),

    #[error("not a BMP (missing BM signature)")]
    BadSignature,

    #[error("unsupported DIB header size {0} (need at least 40)")]
    UnsupportedHeader(u32),

    #[error("unsupported plane count {0}")]
    UnsupportedPlanes(u16),

    #[error("unsupported bit depth {0}bpp (supported: 1, 4, 8, 16, 24, 32)")]
    UnsupportedBitDepth(u16),

    #[error("unsupported compression {0} (supported: 0 none, 1 RLE8, 2 RLE4)")]
    UnsupportedCompression(u32),

    #[error("{compression} compression requires {required}bpp, got {bpp}bpp")]
    CompressionMismatch {
        compression: &'static str,
        required: u16,
        bpp: u16,
    },

    #[error("width must be positive, got {0}")]
    InvalidWidth(i32),

    #[error("height must be non-zero")]
    ZeroHeight,

    #[error("width {width} exceeds the {max} dot limit")]
    WidthTooLarge { width: u32, max: u32 },

    #[error("height {height} exceeds the {max} dot limit")]
    HeightTooLarge { height: u32, max: u32 },

    #[error("graphics payload of {0} bytes does not fit a 16-bit length")]
    PayloadTooLarge(usize),

    #[error("palette data is truncated")]
    TruncatedPalette,

    #[error("pixel data offset {0} is outside the file")]
    InvalidPixelOffset(u32),

    #[error("pixel data is truncated")]
    TruncatedPixelData,
}

/// Pixel storage scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Compression {
    None,
    Rle8,
    Rle4,
}

/// Parsed header fields the decoder needs.
#[derive(Debug, Clone, Copy)]
struct BmpHeader {
    pixel_offset: u32,
    dib_size: u32,
    width: u32,
    height: u32,
    top_down: bool,
    bpp: u16,
    compression: Compression,
}

const FILE_HEADER_LEN: usize = 14;
const MIN_FILE_LEN: usize = 54;
const LUMINANCE_THRESHOLD: u32 = 128;

// ============================================================================
// PUBLIC API
// ============================================================================

/// Transcode a BMP file using the TM-T20 graphics limits.
pub fn transcode(data: &[u8]) -> Result<MonochromeBitmap, BitmapError> {
    transcode_for(data, &PrinterConfig::TM_T20)
}

/// Transcode a BMP file, validating its size against `config`.
pub fn transcode_for(data: &[u8], config: &PrinterConfig) -> Result<MonochromeBitmap, BitmapError> {
    let header = parse_header(data, config)?;
    let palette = read_palette(data, &header)?;

    let mut bitmap = MonochromeBitmap::new(header.width, header.height);
    match header.compression {
        Compression::None => decode_uncompressed(data, &header, &palette, &mut bitmap)?,
        Compression::Rle8 | Compression::Rle4 => {
            let indices = decode_rle(data, &header)?;
            let width = header.width as usize;
            for (i, &idx) in indices.iter().enumerate() {
                let [r, g, b] = palette_color(&palette, idx);
                if is_black(r, g, b) {
                    bitmap.set_black((i % width) as u32, (i / width) as u32);
                }
            }
        }
    }

    tracing::debug!(
        width = header.width,
        height = header.height,
        bpp = header.bpp,
        compression = ?header.compression,
        "transcoded bitmap"
    );
    Ok(bitmap)
}

/// # Print a BMP File (GS ( L store + print)
///
/// Transcodes `data` and returns the store sequence followed by the
/// print sequence:
///
/// ```text
/// 1D 28 4C pL pH 30 70 30 01 01 31 xL xH yL yH d1...dk   store
/// 1D 28 4C 02 00 30 fn                                   print
/// ```
///
/// `print_fn` must be 2 or 50. Nothing is returned unless every check
/// passes.
pub fn print_bmp(data: &[u8], print_fn: u8) -> crate::Result<Vec<u8>> {
    graphics::check_print_function(print_fn)?;
    let bitmap = transcode(data)?;
    let mut out = graphics::store_graphics(&bitmap, graphics::COLOR_1)?;
    out.extend(graphics::print_stored_graphics(print_fn)?);
    Ok(out)
}

// ============================================================================
// HEADER
// ============================================================================

fn read_u16(data: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([data[offset], data[offset + 1]])
}

fn read_u32(data: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([data[offset], data[offset + 1], data[offset + 2], data[offset + 3]])
}

fn parse_header(data: &[u8], config: &PrinterConfig) -> Result<BmpHeader, BitmapError> {
    if data.len() < MIN_FILE_LEN {
        return Err(BitmapError::TooSmall(data.len()));
    }
    if &data[..2] != b"BM" {
        return Err(BitmapError::BadSignature);
    }

    let pixel_offset = read_u32(data, 10);
    let dib_size = read_u32(data, 14);
    if dib_size < 40 {
        return Err(BitmapError::UnsupportedHeader(dib_size));
    }

    let width = read_u32(data, 18) as i32;
    let height = read_u32(data, 22) as i32;
    let planes = read_u16(data, 26);
    let bpp = read_u16(data, 28);
    let compression = read_u32(data, 30);

    if planes != 1 {
        return Err(BitmapError::UnsupportedPlanes(planes));
    }
    if !matches!(bpp, 1 | 4 | 8 | 16 | 24 | 32) {
        return Err(BitmapError::UnsupportedBitDepth(bpp));
    }
    let compression = match compression {
        0 => Compression::None,
        1 => Compression::Rle8,
        2 => Compression::Rle4,
        other => return Err(BitmapError::UnsupportedCompression(other)),
    };
    match (compression, bpp) {
        (Compression::Rle8, bpp) if bpp != 8 => {
            return Err(BitmapError::CompressionMismatch {
                compression: "RLE8",
                required: 8,
                bpp,
            });
        }
        (Compression::Rle4, bpp) if bpp != 4 => {
            return Err(BitmapError::CompressionMismatch {
                compression: "RLE4",
                required: 4,
                bpp,
            });
        }
        _ => {}
    }

    if width <= 0 {
        return Err(BitmapError::InvalidWidth(width));
    }
    if height == 0 {
        return Err(BitmapError::ZeroHeight);
    }
    let width = width as u32;
    let abs_height = height.unsigned_abs();
    if width > config.max_graphics_width {
        return Err(BitmapError::WidthTooLarge {
            width,
            max: config.max_graphics_width,
        });
    }
    if abs_height > config.max_graphics_height {
        return Err(BitmapError::HeightTooLarge {
            height: abs_height,
            max: config.max_graphics_height,
        });
    }

    let payload = 10 + width.div_ceil(8) as usize * abs_height as usize;
    if payload > u16::MAX as usize {
        return Err(BitmapError::PayloadTooLarge(payload));
    }

    Ok(BmpHeader {
        pixel_offset,
        dib_size,
        width,
        height: abs_height,
        top_down: height < 0,
        bpp,
        compression,
    })
}

/// Palette entries as RGB; empty for direct-colour formats.
fn read_palette(data: &[u8], header: &BmpHeader) -> Result<Vec<[u8; 3]>, BitmapError> {
    if header.bpp > 8 {
        return Ok(Vec::new());
    }
    let entries = 1usize << header.bpp;
    let start = FILE_HEADER_LEN.saturating_add(header.dib_size as usize);
    let end = start.saturating_add(entries * 4);
    if end > data.len() {
        return Err(BitmapError::TruncatedPalette);
    }
    // stored as B, G, R, reserved
    Ok(data[start..end]
        .chunks_exact(4)
        .map(|bgra| [bgra[2], bgra[1], bgra[0]])
        .collect())
}

#[inline]
fn palette_color(palette: &[[u8; 3]], idx: u8) -> [u8; 3] {
    palette.get(idx as usize).copied().unwrap_or([0, 0, 0])
}

#[inline]
fn is_black(r: u8, g: u8, b: u8) -> bool {
    (r as u32 * 30 + g as u32 * 59 + b as u32 * 11) / 100 < LUMINANCE_THRESHOLD
}

fn pixel_start(data: &[u8], header: &BmpHeader) -> Result<usize, BitmapError> {
    let start = header.pixel_offset as usize;
    if start > data.len() {
        return Err(BitmapError::InvalidPixelOffset(header.pixel_offset));
    }
    Ok(start)
}

// ============================================================================
// UNCOMPRESSED
// ============================================================================

fn decode_uncompressed(
    data: &[u8],
    header: &BmpHeader,
    palette: &[[u8; 3]],
    bitmap: &mut MonochromeBitmap,
) -> Result<(), BitmapError> {
    let width = header.width as usize;
    let height = header.height as usize;
    // rows are padded to 4-byte boundaries
    let stride = (width * header.bpp as usize).div_ceil(32) * 4;

    let start = pixel_start(data, header)?;
    if start + stride * height > data.len() {
        return Err(BitmapError::TruncatedPixelData);
    }

    for y in 0..height {
        let src_y = if header.top_down { y } else { height - 1 - y };
        let row = &data[start + src_y * stride..start + (src_y + 1) * stride];

        for x in 0..width {
            let [r, g, b] = match header.bpp {
                1 => palette_color(palette, (row[x / 8] >> (7 - x % 8)) & 0x01),
                4 => palette_color(palette, (row[x / 2] >> ((1 - x % 2) * 4)) & 0x0F),
                8 => palette_color(palette, row[x]),
                16 => {
                    let px = u16::from_le_bytes([row[x * 2], row[x * 2 + 1]]);
                    let expand = |v: u16| ((v & 0x1F) as u32 * 255 / 31) as u8;
                    [expand(px >> 10), expand(px >> 5), expand(px)]
                }
                24 => [row[x * 3 + 2], row[x * 3 + 1], row[x * 3]],
                _ => [row[x * 4 + 2], row[x * 4 + 1], row[x * 4]],
            };
            if is_black(r, g, b) {
                bitmap.set_black(x as u32, y as u32);
            }
        }
    }
    Ok(())
}

// ============================================================================
// RUN-LENGTH ENCODED
// ============================================================================

/// Cursor writing palette indices into a top-down grid.
struct RleCursor {
    width: usize,
    height: usize,
    x: usize,
    y: i64,
    step: i64,
    indices: Vec<u8>,
}

impl RleCursor {
    fn new(width: usize, height: usize, top_down: bool) -> Self {
        Self {
            width,
            height,
            x: 0,
            y: if top_down { 0 } else { height as i64 - 1 },
            step: if top_down { 1 } else { -1 },
            indices: vec![0; width * height],
        }
    }

    fn in_rows(&self) -> bool {
        self.y >= 0 && (self.y as usize) < self.height
    }

    fn put(&mut self, idx: u8) {
        if self.x < self.width && self.in_rows() {
            self.indices[self.y as usize * self.width + self.x] = idx;
            self.x += 1;
        }
    }

    /// Returns false once the cursor has left the image.
    fn next_line(&mut self) -> bool {
        self.x = 0;
        self.y += self.step;
        self.in_rows()
    }

    fn delta(&mut self, dx: u8, dy: u8) -> bool {
        self.x += dx as usize;
        self.y += dy as i64 * self.step;
        self.in_rows()
    }
}

/// Expand RLE8/RLE4 data into one palette index per pixel, top row first.
///
/// Directives, read as byte pairs `(count, value)`:
///
/// | count | value | Meaning |
/// |-------|-------|---------|
/// | n > 0 | v | n pixels of v (RLE4: alternating high/low nibble) |
/// | 0 | 0 | end of line |
/// | 0 | 1 | end of bitmap |
/// | 0 | 2 | delta, next two bytes are dx, dy |
/// | 0 | n > 2 | n literal indices follow, padded to a 16-bit boundary |
fn decode_rle(data: &[u8], header: &BmpHeader) -> Result<Vec<u8>, BitmapError> {
    let four_bit = header.compression == Compression::Rle4;
    let mut cursor = RleCursor::new(
        header.width as usize,
        header.height as usize,
        header.top_down,
    );
    let mut i = pixel_start(data, header)?;

    while i + 1 < data.len() {
        let count = data[i];
        let value = data[i + 1];
        i += 2;

        if count > 0 {
            for k in 0..count {
                let idx = match (four_bit, k % 2) {
                    (false, _) => value,
                    (true, 0) => value >> 4,
                    (true, _) => value & 0x0F,
                };
                cursor.put(idx);
            }
            continue;
        }

        match value {
            0 => {
                if !cursor.next_line() {
                    break;
                }
            }
            1 => break,
            2 => {
                if i + 1 >= data.len() {
                    break;
                }
                let (dx, dy) = (data[i], data[i + 1]);
                i += 2;
                if !cursor.delta(dx, dy) {
                    break;
                }
            }
            n => {
                let n = n as usize;
                let literal_bytes = if four_bit { n.div_ceil(2) } else { n };
                for k in 0..n {
                    let Some(&byte) = data.get(i + if four_bit { k / 2 } else { k }) else {
                        break;
                    };
                    let idx = match (four_bit, k % 2) {
                        (false, _) => byte,
                        (true, 0) => byte >> 4,
                        (true, _) => byte & 0x0F,
                    };
                    cursor.put(idx);
                }
                i += literal_bytes + literal_bytes % 2;
            }
        }
    }

    Ok(cursor.indices)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: [u8; 3] = [255, 255, 255];
    const BLACK: [u8; 3] = [0, 0, 0];

    /// Minimal BITMAPINFOHEADER file.
    fn build_bmp(
        width: i32,
        height: i32,
        bpp: u16,
        compression: u32,
        palette: &[[u8; 3]],
        pixels: &[u8],
    ) -> Vec<u8> {
        let offset = 54 + palette.len() * 4;
        let mut out = Vec::new();
        out.extend(b"BM");
        out.extend(((offset + pixels.len()) as u32).to_le_bytes());
        out.extend([0u8; 4]);
        out.extend((offset as u32).to_le_bytes());
        out.extend(40u32.to_le_bytes());
        out.extend(width.to_le_bytes());
        out.extend(height.to_le_bytes());
        out.extend(1u16.to_le_bytes());
        out.extend(bpp.to_le_bytes());
        out.extend(compression.to_le_bytes());
        out.extend((pixels.len() as u32).to_le_bytes());
        out.extend([0u8; 16]);
        for [r, g, b] in palette {
            out.extend([*b, *g, *r, 0]);
        }
        out.extend_from_slice(pixels);
        out
    }

    /// Index 0 white, index 1 black, the rest white.
    fn two_tone(bpp: u16) -> Vec<[u8; 3]> {
        let mut palette = vec![WHITE; 1 << bpp];
        palette[1] = BLACK;
        palette
    }

    #[test]
    fn test_single_black_pixel_reference_vector() {
        let file = build_bmp(1, 1, 24, 0, &[], &[0, 0, 0, 0]);
        let bytes = print_bmp(&file, 50).unwrap();
        assert_eq!(
            bytes,
            vec![
                0x1D, 0x28, 0x4C, 0x0B, 0x00, 0x30, 0x70, 0x30, 0x01, 0x01, 0x31, 0x01, 0x00,
                0x01, 0x00, 0x80, 0x1D, 0x28, 0x4C, 0x02, 0x00, 0x30, 0x32
            ]
        );
    }

    #[test]
    fn test_print_bmp_rejects_bad_print_function() {
        let file = build_bmp(1, 1, 24, 0, &[], &[0, 0, 0, 0]);
        assert!(print_bmp(&file, 3).is_err());
        assert_eq!(print_bmp(&file, 2).unwrap().last(), Some(&0x02));
    }

    #[test]
    fn test_luminance_threshold_boundary() {
        // (127,127,127) -> 127 black, (128,128,128) -> 128 white
        let pixels = [127, 127, 127, 128, 128, 128, 0, 0];
        let file = build_bmp(2, 1, 24, 0, &[], &pixels);
        assert_eq!(transcode(&file).unwrap().data(), &[0x80]);
    }

    #[test]
    fn test_1bpp_bottom_up() {
        // file rows: y=1 first, then y=0
        let pixels = [0x00, 0x40, 0, 0, 0x80, 0x00, 0, 0];
        let file = build_bmp(10, 2, 1, 0, &two_tone(1), &pixels);
        let bitmap = transcode(&file).unwrap();
        assert_eq!((bitmap.width(), bitmap.height()), (10, 2));
        assert_eq!(bitmap.data(), &[0x80, 0x00, 0x00, 0x40]);
    }

    #[test]
    fn test_4bpp_palette_lookup() {
        let mut palette = vec![WHITE; 16];
        palette[1] = BLACK;
        palette[2] = [100, 100, 100];
        palette[3] = [200, 200, 200];
        let file = build_bmp(3, 1, 4, 0, &palette, &[0x13, 0x20, 0, 0]);
        assert_eq!(transcode(&file).unwrap().data(), &[0xA0]);
    }

    #[test]
    fn test_4bpp_wide_rows_use_full_stride() {
        // 9 pixels at 4bpp need 5 bytes, padded to 8
        let mut pixels = vec![0u8; 16];
        pixels[4] = 0x10; // bottom row (y=1), x=8
        pixels[8] = 0x10; // top row (y=0), x=0
        let file = build_bmp(9, 2, 4, 0, &two_tone(4), &pixels);
        assert_eq!(transcode(&file).unwrap().data(), &[0x80, 0x00, 0x00, 0x80]);
    }

    #[test]
    fn test_8bpp_top_down() {
        let pixels = [1, 0, 0, 0, 0, 1, 0, 0];
        let file = build_bmp(2, -2, 8, 0, &two_tone(8), &pixels);
        assert_eq!(transcode(&file).unwrap().data(), &[0x80, 0x40]);
    }

    #[test]
    fn test_16bpp_rgb555() {
        let file = build_bmp(2, 1, 16, 0, &[], &[0x00, 0x00, 0xFF, 0x7F]);
        assert_eq!(transcode(&file).unwrap().data(), &[0x80]);
    }

    #[test]
    fn test_32bpp_ignores_alpha() {
        let pixels = [0, 0, 0, 0xFF, 255, 255, 255, 0x00];
        let file = build_bmp(2, 1, 32, 0, &[], &pixels);
        assert_eq!(transcode(&file).unwrap().data(), &[0x80]);
    }

    #[test]
    fn test_rle8_runs_and_absolute_mode() {
        let pixels = [
            0x02, 0x01, 0x02, 0x00, 0x00, 0x00, // y=1: 1 1 0 0, end of line
            0x00, 0x03, 0x01, 0x00, 0x01, 0x00, // y=0: literal 1 0 1 + pad
            0x00, 0x01, // end of bitmap
        ];
        let file = build_bmp(4, 2, 8, 1, &two_tone(8), &pixels);
        assert_eq!(transcode(&file).unwrap().data(), &[0xA0, 0xC0]);
    }

    #[test]
    fn test_rle8_delta() {
        let pixels = [0x00, 0x02, 0x02, 0x01, 0x01, 0x01, 0x00, 0x01];
        let file = build_bmp(4, -2, 8, 1, &two_tone(8), &pixels);
        assert_eq!(transcode(&file).unwrap().data(), &[0x00, 0x20]);
    }

    #[test]
    fn test_rle8_clips_runs_past_row_end() {
        let pixels = [0x09, 0x01, 0x00, 0x01];
        let file = build_bmp(4, 1, 8, 1, &two_tone(8), &pixels);
        assert_eq!(transcode(&file).unwrap().data(), &[0xF0]);
    }

    #[test]
    fn test_rle4_alternating_nibbles() {
        let file = build_bmp(4, 1, 4, 2, &two_tone(4), &[0x04, 0x10, 0x00, 0x01]);
        assert_eq!(transcode(&file).unwrap().data(), &[0xA0]);
    }

    #[test]
    fn test_rle4_absolute_odd_count() {
        // literal 1 1 1 in two bytes, then a run 0 1 0
        let pixels = [0x00, 0x03, 0x11, 0x10, 0x03, 0x01, 0x00, 0x01];
        let file = build_bmp(6, 1, 4, 2, &two_tone(4), &pixels);
        assert_eq!(transcode(&file).unwrap().data(), &[0xE8]);
    }

    #[test]
    fn test_header_rejections() {
        let good = build_bmp(1, 1, 24, 0, &[], &[0, 0, 0, 0]);

        assert_eq!(transcode(&good[..53]), Err(BitmapError::TooSmall(53)));

        let mut bad = good.clone();
        bad[0] = b'X';
        assert_eq!(transcode(&bad), Err(BitmapError::BadSignature));

        let mut bad = good.clone();
        bad[14] = 12;
        assert_eq!(transcode(&bad), Err(BitmapError::UnsupportedHeader(12)));

        let mut bad = good.clone();
        bad[26] = 2;
        assert_eq!(transcode(&bad), Err(BitmapError::UnsupportedPlanes(2)));

        let bad = build_bmp(1, 1, 2, 0, &[], &[0; 4]);
        assert_eq!(transcode(&bad), Err(BitmapError::UnsupportedBitDepth(2)));

        let bad = build_bmp(1, 1, 24, 3, &[], &[0; 4]);
        assert_eq!(transcode(&bad), Err(BitmapError::UnsupportedCompression(3)));

        let bad = build_bmp(1, 1, 4, 1, &two_tone(4), &[0; 4]);
        assert!(matches!(
            transcode(&bad),
            Err(BitmapError::CompressionMismatch { required: 8, bpp: 4, .. })
        ));

        let bad = build_bmp(1, 1, 8, 2, &two_tone(8), &[0; 4]);
        assert!(matches!(
            transcode(&bad),
            Err(BitmapError::CompressionMismatch { required: 4, bpp: 8, .. })
        ));
    }

    #[test]
    fn test_dimension_rejections() {
        let bad = build_bmp(0, 1, 24, 0, &[], &[]);
        assert_eq!(transcode(&bad), Err(BitmapError::InvalidWidth(0)));

        let bad = build_bmp(-4, 1, 24, 0, &[], &[]);
        assert_eq!(transcode(&bad), Err(BitmapError::InvalidWidth(-4)));

        let bad = build_bmp(1, 0, 24, 0, &[], &[]);
        assert_eq!(transcode(&bad), Err(BitmapError::ZeroHeight));

        let bad = build_bmp(2048, 1, 24, 0, &[], &[]);
        assert_eq!(
            transcode(&bad),
            Err(BitmapError::WidthTooLarge { width: 2048, max: 2047 })
        );

        let bad = build_bmp(1, -1663, 24, 0, &[], &[]);
        assert_eq!(
            transcode(&bad),
            Err(BitmapError::HeightTooLarge { height: 1663, max: 1662 })
        );

        let bad = build_bmp(2047, 300, 24, 0, &[], &[]);
        assert_eq!(transcode(&bad), Err(BitmapError::PayloadTooLarge(10 + 256 * 300)));
    }

    #[test]
    fn test_limits_follow_printer_config() {
        let small = PrinterConfig {
            columns: 32,
            max_graphics_width: 8,
            max_graphics_height: 4,
        };
        let wide = build_bmp(9, 1, 24, 0, &[], &[0; 28]);
        assert_eq!(
            transcode_for(&wide, &small),
            Err(BitmapError::WidthTooLarge { width: 9, max: 8 })
        );
        let tall = build_bmp(1, 5, 24, 0, &[], &[0; 20]);
        assert_eq!(
            transcode_for(&tall, &small),
            Err(BitmapError::HeightTooLarge { height: 5, max: 4 })
        );
        assert!(transcode(&wide).is_ok());
    }

    #[test]
    fn test_truncation_rejections() {
        let bad = build_bmp(2, 2, 24, 0, &[], &[0; 8]);
        assert_eq!(transcode(&bad), Err(BitmapError::TruncatedPixelData));

        let bad = build_bmp(1, 1, 8, 0, &two_tone(1), &[0; 4]);
        assert_eq!(transcode(&bad), Err(BitmapError::TruncatedPalette));

        let mut bad = build_bmp(1, 1, 24, 0, &[], &[0; 4]);
        bad[10..14].copy_from_slice(&1000u32.to_le_bytes());
        assert_eq!(transcode(&bad), Err(BitmapError::InvalidPixelOffset(1000)));
    }

    #[test]
    fn test_bitmap_error_converts_to_crate_error() {
        let err = print_bmp(b"nope", 50).unwrap_err();
        assert!(matches!(err, crate::error::ReciboError::Bitmap(BitmapError::TooSmall(4))));
    }
}
