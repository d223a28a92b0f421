//! # ESC/POS Barcode Commands
//!
//! This module implements 1D barcode and QR code commands.
//!
//! ## 1D Barcodes (GS k)
//!
//! `GS k` has two forms selected by the type discriminant `m`:
//!
//! | Form | `m` | Layout |
//! |------|-----|--------|
//! | A | 0–6 | `GS k m d1..dk NUL` |
//! | B | 65–73 | `GS k m n d1..dn` (n ≤ 255) |
//!
//! Height, module width and HRI placement are configured beforehand with
//! `GS h`, `GS w` and `GS H`.
//!
//! ```
//! use recibo::protocol::barcode::barcode1d;
//!
//! let mut data = Vec::new();
//! data.extend(barcode1d::set_height(80));
//! data.extend(barcode1d::set_width(3));
//! data.extend(barcode1d::set_hri_position(barcode1d::HriPosition::Below));
//! data.extend(barcode1d::print(barcode1d::BarcodeType::Code128, b"ABC-123").unwrap());
//! ```
//!
//! ## QR Code Usage
//!
//! QR codes are generated in a multi-step process using `GS ( k`:
//!
//! 1. Select model 2
//! 2. Set module size
//! 3. Set error correction level
//! 4. Store the payload in the symbol storage area
//! 5. Print the stored symbol
//!
//! ```
//! use recibo::protocol::barcode::qr;
//!
//! let bytes = qr::generate(b"https://example.com", 4, qr::QrErrorLevel::M).unwrap();
//! assert_eq!(&bytes[..9], &qr::select_model2()[..]);
//! ```

// ============================================================================
// 1D BARCODES
// ============================================================================

pub mod barcode1d {
    use crate::error::{ReciboError, Result};
    use crate::protocol::commands::{GS, NUL};

    /// Barcode symbologies (form B discriminants)
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum BarcodeType {
        UpcA = 65,
        UpcE = 66,
        Ean13 = 67,
        Ean8 = 68,
        Code39 = 69,
        Itf = 70,
        Codabar = 71,
        Code93 = 72,
        Code128 = 73,
    }

    impl BarcodeType {
        /// Parse a lowercase-insensitive symbology name such as `code128`.
        pub fn from_name(name: &str) -> Option<Self> {
            match name.to_ascii_lowercase().as_str() {
                "upca" => Some(BarcodeType::UpcA),
                "upce" => Some(BarcodeType::UpcE),
                "ean13" => Some(BarcodeType::Ean13),
                "ean8" => Some(BarcodeType::Ean8),
                "code39" => Some(BarcodeType::Code39),
                "itf" => Some(BarcodeType::Itf),
                "codabar" => Some(BarcodeType::Codabar),
                "code93" => Some(BarcodeType::Code93),
                "code128" => Some(BarcodeType::Code128),
                _ => None,
            }
        }
    }

    impl From<BarcodeType> for u8 {
        fn from(t: BarcodeType) -> u8 {
            t as u8
        }
    }

    /// Human Readable Interpretation (HRI) position
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub enum HriPosition {
        #[default]
        None = 0,
        Above = 1,
        Below = 2,
        Both = 3,
    }

    impl HriPosition {
        pub fn from_name(name: &str) -> Option<Self> {
            match name {
                "none" => Some(HriPosition::None),
                "above" => Some(HriPosition::Above),
                "below" => Some(HriPosition::Below),
                "both" => Some(HriPosition::Both),
                _ => None,
            }
        }
    }

    /// Barcode height in dots (GS h n)
    #[inline]
    pub fn set_height(n: u8) -> Vec<u8> {
        vec![GS, b'h', n]
    }

    /// Barcode module width (GS w n)
    #[inline]
    pub fn set_width(n: u8) -> Vec<u8> {
        vec![GS, b'w', n]
    }

    /// # Select HRI Print Position (GS H n)
    ///
    /// | Format  | Bytes |
    /// |---------|-------|
    /// | ASCII   | GS H n |
    /// | Hex     | 1D 48 n |
    #[inline]
    pub fn set_hri_position(position: HriPosition) -> Vec<u8> {
        vec![GS, b'H', position as u8]
    }

    /// HRI font (GS f n), 0 = font A, 1 = font B
    #[inline]
    pub fn set_hri_font(n: u8) -> Vec<u8> {
        vec![GS, b'f', n]
    }

    /// # Print Barcode (GS k m ...)
    ///
    /// ## Protocol Details
    ///
    /// | Form | Bytes |
    /// |------|-------|
    /// | A (m ≤ 6) | 1D 6B m d1..dk 00 |
    /// | B (m > 6) | 1D 6B m n d1..dn |
    ///
    /// ## Errors
    ///
    /// - Form A payloads may not contain NUL (it terminates the data)
    /// - Form B payloads may not exceed 255 bytes
    ///
    /// ## Example
    ///
    /// ```
    /// use recibo::protocol::barcode::barcode1d::print;
    ///
    /// assert_eq!(print(4u8, b"AB").unwrap(), vec![0x1D, 0x6B, 4, b'A', b'B', 0x00]);
    /// assert_eq!(print(73u8, b"AB").unwrap(), vec![0x1D, 0x6B, 73, 2, b'A', b'B']);
    /// ```
    pub fn print(m: impl Into<u8>, data: &[u8]) -> Result<Vec<u8>> {
        let m = m.into();
        if m <= 6 {
            if data.contains(&NUL) {
                return Err(ReciboError::InvalidCommand(
                    "barcode data may not contain NUL in the terminated form".into(),
                ));
            }
            let mut out = Vec::with_capacity(4 + data.len());
            out.extend([GS, b'k', m]);
            out.extend_from_slice(data);
            out.push(NUL);
            return Ok(out);
        }

        let len = u8::try_from(data.len())
            .map_err(|_| ReciboError::out_of_range("barcode data length", data.len(), "0..=255"))?;
        let mut out = Vec::with_capacity(4 + data.len());
        out.extend([GS, b'k', m, len]);
        out.extend_from_slice(data);
        Ok(out)
    }
}

// ============================================================================
// QR CODES
// ============================================================================

pub mod qr {
    use crate::error::{ReciboError, Result};
    use crate::protocol::commands::{GS, u16_le};

    /// QR error correction levels
    ///
    /// | Level | Byte | Recovery |
    /// |-------|------|----------|
    /// | L | 48 | ~7% |
    /// | M | 49 | ~15% |
    /// | Q | 50 | ~25% |
    /// | H | 51 | ~30% |
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub enum QrErrorLevel {
        L = 48,
        #[default]
        M = 49,
        Q = 50,
        H = 51,
    }

    impl QrErrorLevel {
        pub fn from_name(name: &str) -> Option<Self> {
            match name {
                "L" => Some(QrErrorLevel::L),
                "M" => Some(QrErrorLevel::M),
                "Q" => Some(QrErrorLevel::Q),
                "H" => Some(QrErrorLevel::H),
                _ => None,
            }
        }
    }

    impl From<QrErrorLevel> for u8 {
        fn from(level: QrErrorLevel) -> u8 {
            level as u8
        }
    }

    /// Largest payload whose `len + 3` still fits in 16 bits.
    pub const MAX_DATA_LEN: usize = 0xFFFF - 3;

    /// # Select QR Model 2 (GS ( k fn 65)
    ///
    /// | Format  | Bytes |
    /// |---------|-------|
    /// | Hex     | 1D 28 6B 04 00 31 41 32 00 |
    #[inline]
    pub fn select_model2() -> Vec<u8> {
        vec![GS, b'(', b'k', 0x04, 0x00, 0x31, 0x41, 0x32, 0x00]
    }

    /// # Set Module Size (GS ( k fn 67)
    ///
    /// | Format  | Bytes |
    /// |---------|-------|
    /// | Hex     | 1D 28 6B 03 00 31 43 n |
    ///
    /// `n` must be in `1..=16`.
    ///
    /// ```
    /// use recibo::protocol::barcode::qr::module_size;
    ///
    /// assert_eq!(
    ///     module_size(4).unwrap(),
    ///     vec![0x1D, 0x28, 0x6B, 0x03, 0x00, 0x31, 0x43, 0x04]
    /// );
    /// assert!(module_size(17).is_err());
    /// ```
    pub fn module_size(n: u8) -> Result<Vec<u8>> {
        if !(1..=16).contains(&n) {
            return Err(ReciboError::out_of_range("QR module size", n, "1..=16"));
        }
        Ok(vec![GS, b'(', b'k', 0x03, 0x00, 0x31, 0x43, n])
    }

    /// # Set Error Correction Level (GS ( k fn 69)
    ///
    /// | Format  | Bytes |
    /// |---------|-------|
    /// | Hex     | 1D 28 6B 03 00 31 45 n |
    ///
    /// `n` must be one of 48, 49, 50, 51 (L, M, Q, H).
    pub fn error_correction(level: impl Into<u8>) -> Result<Vec<u8>> {
        let n = level.into();
        if !(48..=51).contains(&n) {
            return Err(ReciboError::out_of_range("QR error correction level", n, "48..=51"));
        }
        Ok(vec![GS, b'(', b'k', 0x03, 0x00, 0x31, 0x45, n])
    }

    /// # Store Symbol Data (GS ( k fn 80)
    ///
    /// | Format  | Bytes |
    /// |---------|-------|
    /// | Hex     | 1D 28 6B pL pH 31 50 30 d1..dk |
    ///
    /// `pL pH = len(data) + 3`, little-endian.
    pub fn store(data: &[u8]) -> Result<Vec<u8>> {
        if data.len() > MAX_DATA_LEN {
            return Err(ReciboError::out_of_range(
                "QR data length",
                data.len(),
                "0..=65532",
            ));
        }
        let [pl, ph] = u16_le((data.len() + 3) as u16);
        let mut out = Vec::with_capacity(8 + data.len());
        out.extend([GS, b'(', b'k', pl, ph, 0x31, 0x50, 0x30]);
        out.extend_from_slice(data);
        Ok(out)
    }

    /// # Print Stored Symbol (GS ( k fn 81)
    ///
    /// | Format  | Bytes |
    /// |---------|-------|
    /// | Hex     | 1D 28 6B 03 00 31 51 30 |
    #[inline]
    pub fn print() -> Vec<u8> {
        vec![GS, b'(', b'k', 0x03, 0x00, 0x31, 0x51, 0x30]
    }

    /// Complete five-step sequence for one QR code.
    pub fn generate(data: &[u8], size: u8, level: QrErrorLevel) -> Result<Vec<u8>> {
        let mut out = select_model2();
        out.extend(module_size(size)?);
        out.extend(error_correction(level)?);
        out.extend(store(data)?);
        out.extend(print());
        Ok(out)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::barcode1d::{self, BarcodeType, HriPosition};
    use super::qr::{self, QrErrorLevel};

    #[test]
    fn test_barcode_settings() {
        assert_eq!(barcode1d::set_height(80), vec![0x1D, 0x68, 80]);
        assert_eq!(barcode1d::set_width(3), vec![0x1D, 0x77, 3]);
        assert_eq!(barcode1d::set_hri_position(HriPosition::Both), vec![0x1D, 0x48, 3]);
        assert_eq!(barcode1d::set_hri_font(1), vec![0x1D, 0x66, 1]);
    }

    #[test]
    fn test_barcode_form_a_is_nul_terminated() {
        let bytes = barcode1d::print(0u8, b"012345678905").unwrap();
        assert_eq!(&bytes[..3], &[0x1D, 0x6B, 0x00]);
        assert_eq!(&bytes[3..15], b"012345678905");
        assert_eq!(bytes[15], 0x00);
        assert_eq!(bytes.len(), 16);
    }

    #[test]
    fn test_barcode_form_a_rejects_embedded_nul() {
        assert!(barcode1d::print(6u8, b"A\0B").is_err());
    }

    #[test]
    fn test_barcode_form_b_is_length_prefixed() {
        let bytes = barcode1d::print(BarcodeType::Code128, b"{BHELLO").unwrap();
        assert_eq!(bytes, [&[0x1D, 0x6B, 73, 7][..], b"{BHELLO"].concat());

        let max = vec![b'1'; 255];
        assert_eq!(barcode1d::print(BarcodeType::Code39, &max).unwrap().len(), 259);
        assert!(barcode1d::print(BarcodeType::Code39, &vec![b'1'; 256]).is_err());
    }

    #[test]
    fn test_barcode_type_names() {
        assert_eq!(BarcodeType::from_name("UPCA"), Some(BarcodeType::UpcA));
        assert_eq!(BarcodeType::from_name("ean8"), Some(BarcodeType::Ean8));
        assert_eq!(BarcodeType::from_name("code93"), Some(BarcodeType::Code93));
        assert_eq!(BarcodeType::from_name("qr"), None);
        assert_eq!(u8::from(BarcodeType::Codabar), 71);
    }

    #[test]
    fn test_qr_fixed_sequences() {
        assert_eq!(
            qr::select_model2(),
            vec![0x1D, 0x28, 0x6B, 0x04, 0x00, 0x31, 0x41, 0x32, 0x00]
        );
        assert_eq!(
            qr::print(),
            vec![0x1D, 0x28, 0x6B, 0x03, 0x00, 0x31, 0x51, 0x30]
        );
    }

    #[test]
    fn test_qr_module_size_range() {
        assert_eq!(
            qr::module_size(4).unwrap(),
            vec![0x1D, 0x28, 0x6B, 0x03, 0x00, 0x31, 0x43, 0x04]
        );
        assert!(qr::module_size(1).is_ok());
        assert!(qr::module_size(16).is_ok());
        assert!(qr::module_size(0).is_err());
        assert!(qr::module_size(17).is_err());
    }

    #[test]
    fn test_qr_error_correction() {
        assert_eq!(
            qr::error_correction(QrErrorLevel::H).unwrap(),
            vec![0x1D, 0x28, 0x6B, 0x03, 0x00, 0x31, 0x45, 51]
        );
        assert!(qr::error_correction(47u8).is_err());
        assert!(qr::error_correction(52u8).is_err());
    }

    #[test]
    fn test_qr_store_length() {
        let bytes = qr::store(b"hello").unwrap();
        assert_eq!(&bytes[..8], &[0x1D, 0x28, 0x6B, 0x08, 0x00, 0x31, 0x50, 0x30]);
        assert_eq!(&bytes[8..], b"hello");

        let big = vec![b'x'; 300];
        let bytes = qr::store(&big).unwrap();
        assert_eq!((bytes[3], bytes[4]), (0x2F, 0x01)); // 303

        assert!(qr::store(&vec![0u8; qr::MAX_DATA_LEN + 1]).is_err());
    }

    #[test]
    fn test_qr_generate_order() {
        let bytes = qr::generate(b"X", 3, QrErrorLevel::L).unwrap();
        let expected = [
            qr::select_model2(),
            qr::module_size(3).unwrap(),
            qr::error_correction(QrErrorLevel::L).unwrap(),
            qr::store(b"X").unwrap(),
            qr::print(),
        ]
        .concat();
        assert_eq!(bytes, expected);
    }
}
