//! # ESC/POS Protocol Implementation
//!
//! Low-level command builders for the ESC/POS command language used by
//! Epson-compatible thermal receipt printers.
//!
//! ## Module Structure
//!
//! - [`commands`]: Printer control (init, feed, cut, drawer, status)
//! - [`text`]: Text styling (alignment, fonts, bold, underline, size, code pages)
//! - [`encoding`]: Unicode to printer byte encodings
//! - [`barcode`]: 1D barcodes and QR codes
//! - [`graphics`]: Raster images and the stored-graphics buffer
//! - [`bmp`]: BMP file transcoding to 1-bit raster
//!
//! ## Usage Example
//!
//! ```
//! use recibo::protocol::{barcode::qr, commands, encoding::TextEncoding, text};
//!
//! let mut data = Vec::new();
//! data.extend(commands::init());
//!
//! data.extend(text::align_center());
//! data.extend(text::bold(true));
//! data.extend(text::print_line("RECEIPT", TextEncoding::Ascii));
//! data.extend(text::bold(false));
//! data.extend(text::align_left());
//!
//! data.extend(qr::generate(b"https://example.com", 4, qr::QrErrorLevel::M)?);
//!
//! data.extend(commands::cut_partial_feed(3));
//! # Ok::<(), recibo::error::ReciboError>(())
//! ```
//!
//! ## Protocol Reference
//!
//! Based on the Epson "ESC/POS Application Programming Guide".

pub mod barcode;
pub mod bmp;
pub mod commands;
pub mod encoding;
pub mod graphics;
pub mod text;
