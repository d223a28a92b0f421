//! # ESC/POS Control Commands
//!
//! This module implements the printer-control part of the ESC/POS command
//! language used by Epson-compatible thermal receipt printers (TM-T20,
//! TM-T88, and the many clones that speak the same dialect).
//!
//! ## Protocol Overview
//!
//! ESC/POS commands are byte sequences grouped into opcode families by
//! their first byte:
//!
//! - **Escape family** (`ESC`, 0x1B): initialization, text style, paper feed,
//!   print position, drawer and beeper
//! - **Group-separator family** (`GS`, 0x1D): cutter, character size,
//!   barcodes, QR codes, graphics, margins
//! - **Device-control family** (`DLE`, 0x10): real-time status requests
//! - **Single bytes**: `LF`, `HT`, `CR`, `FF`
//!
//! ## Byte Order
//!
//! Multi-byte integers use **little-endian** encoding:
//! - `u16` value 0x1234 is sent as bytes `[0x34, 0x12]`
//!
//! ## Reference
//!
//! Based on the Epson "ESC/POS Application Programming Guide" and the
//! TM-T20 command reference.

// ============================================================================
// ESCAPE SEQUENCE CONSTANTS
// ============================================================================

/// ESC (Escape) - Command prefix byte
///
/// Most ESC/POS commands begin with ESC (0x1B). This byte signals the start
/// of a control sequence rather than printable text.
pub const ESC: u8 = 0x1B;

/// GS (Group Separator) - Extended command prefix
///
/// Used for cutter, size, barcode and graphics commands.
/// - Hex: 0x1D, Decimal: 29
pub const GS: u8 = 0x1D;

/// DLE (Data Link Escape) - Real-time command prefix
///
/// Real-time commands are processed by the printer as soon as they are
/// received, even when the print buffer is full.
pub const DLE: u8 = 0x10;

/// NUL - Terminator for the short barcode form
pub const NUL: u8 = 0x00;

/// LF (Line Feed) - Print and advance one line
pub const LF: u8 = 0x0A;

/// FF (Form Feed) - Print and return to standard mode in page mode
pub const FF: u8 = 0x0C;

/// HT (Horizontal Tab) - Advance to next tab position
pub const HT: u8 = 0x09;

/// CR (Carriage Return)
///
/// Ignored by most printers when auto line feed is disabled.
pub const CR: u8 = 0x0D;

// ============================================================================
// INITIALIZATION COMMANDS
// ============================================================================

/// # Initialize Printer (ESC @)
///
/// Resets the printer to its power-on default state. This should be called
/// at the start of each print job to ensure consistent behavior.
///
/// ## Protocol Details
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | ESC @ |
/// | Hex     | 1B 40 |
/// | Decimal | 27 64 |
///
/// ## What Gets Reset
///
/// - Print buffer is cleared
/// - Text formatting (bold, underline, invert) disabled
/// - Character size reset to 1x1
/// - Alignment reset to left
/// - Line spacing reset to default
///
/// ## What Does NOT Reset
///
/// - Graphics stored in the printer's graphics buffer
/// - Memory switch settings
///
/// ## Example
///
/// ```
/// use recibo::protocol::commands;
///
/// let init = commands::init();
/// assert_eq!(init, vec![0x1B, 0x40]);
/// ```
#[inline]
pub fn init() -> Vec<u8> {
    vec![ESC, b'@']
}

// ============================================================================
// LINE CONTROL
// ============================================================================

/// # Line Feed (LF), repeated
///
/// Prints the line buffer and advances one line per LF byte.
/// A count of zero produces an empty sequence.
///
/// ```
/// use recibo::protocol::commands;
///
/// assert_eq!(commands::line_feed(0), Vec::<u8>::new());
/// assert_eq!(commands::line_feed(3), vec![0x0A, 0x0A, 0x0A]);
/// ```
pub fn line_feed(count: usize) -> Vec<u8> {
    vec![LF; count]
}

/// Horizontal tab (HT)
#[inline]
pub fn horizontal_tab() -> Vec<u8> {
    vec![HT]
}

/// Carriage return (CR)
#[inline]
pub fn carriage_return() -> Vec<u8> {
    vec![CR]
}

/// # Form Feed (FF)
///
/// In page mode, prints the composed page and returns to standard mode.
/// In standard mode most printers treat it like a line feed.
#[inline]
pub fn form_feed() -> Vec<u8> {
    vec![FF]
}

/// Print and line feed (ESC LF)
#[inline]
pub fn print_and_line_feed() -> Vec<u8> {
    vec![ESC, LF]
}

// ============================================================================
// PRINT POSITION
// ============================================================================

/// # Set Absolute Print Position (ESC $ nL nH)
///
/// Moves the print position to `n` motion units from the start of the line.
///
/// ## Protocol Details
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | ESC $ nL nH |
/// | Hex     | 1B 24 nL nH |
///
/// ```
/// use recibo::protocol::commands;
///
/// assert_eq!(commands::absolute_position(0x0100), vec![0x1B, 0x24, 0x00, 0x01]);
/// ```
pub fn absolute_position(n: u16) -> Vec<u8> {
    let [nl, nh] = u16_le(n);
    vec![ESC, b'$', nl, nh]
}

/// # Set Relative Print Position (ESC \ nL nH)
///
/// Moves the print position `n` motion units from the current position.
pub fn relative_position(n: u16) -> Vec<u8> {
    let [nl, nh] = u16_le(n);
    vec![ESC, b'\\', nl, nh]
}

/// Signed convenience form of [`relative_position`] for small moves.
///
/// The byte is written as its two's-complement value with a zero high byte.
pub fn relative_position_signed(n: i8) -> Vec<u8> {
    vec![ESC, b'\\', n as u8, 0x00]
}

/// # Set Left Margin (GS L nL nH)
///
/// Sets the left margin to `n` motion units.
///
/// ```
/// use recibo::protocol::commands;
///
/// assert_eq!(commands::left_margin(0x1234), vec![0x1D, 0x4C, 0x34, 0x12]);
/// ```
pub fn left_margin(n: u16) -> Vec<u8> {
    let [nl, nh] = u16_le(n);
    vec![GS, b'L', nl, nh]
}

// ============================================================================
// PAPER FEED COMMANDS
// ============================================================================

/// # Print and Feed n Lines (ESC d n)
///
/// ## Protocol Details
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | ESC d n |
/// | Hex     | 1B 64 n |
/// | Decimal | 27 100 n |
#[inline]
pub fn feed_lines(n: u8) -> Vec<u8> {
    vec![ESC, b'd', n]
}

/// # Print and Feed n Dots (ESC J n)
///
/// Feeds paper by `n` vertical motion units (one dot at 203 DPI on most
/// models).
///
/// ## Protocol Details
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | ESC J n |
/// | Hex     | 1B 4A n |
/// | Decimal | 27 74 n |
#[inline]
pub fn feed_dots(n: u8) -> Vec<u8> {
    vec![ESC, b'J', n]
}

// ============================================================================
// CUTTER CONTROL COMMANDS
// ============================================================================

/// # Full Cut (GS V 0)
///
/// ## Protocol Details
///
/// | Format  | Bytes    |
/// |---------|----------|
/// | ASCII   | GS V 0   |
/// | Hex     | 1D 56 00 |
///
/// Cuts the paper at the current position without feeding.
#[inline]
pub fn cut_full() -> Vec<u8> {
    vec![GS, b'V', 0x00]
}

/// # Partial Cut (GS V 1)
///
/// Leaves a small uncut "hinge" so the receipt does not fall.
#[inline]
pub fn cut_partial() -> Vec<u8> {
    vec![GS, b'V', 0x01]
}

/// # Feed Then Full Cut (GS V 65 n)
///
/// Feeds paper to the cutting position plus `n` motion units, then cuts.
///
/// ```
/// use recibo::protocol::commands;
///
/// assert_eq!(commands::cut_full_feed(3), vec![0x1D, 0x56, 0x41, 3]);
/// ```
#[inline]
pub fn cut_full_feed(n: u8) -> Vec<u8> {
    vec![GS, b'V', 0x41, n]
}

/// # Feed Then Partial Cut (GS V 66 n)
#[inline]
pub fn cut_partial_feed(n: u8) -> Vec<u8> {
    vec![GS, b'V', 0x42, n]
}

// ============================================================================
// CASH DRAWER AND BEEPER
// ============================================================================

/// Drawer kick-out connector pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawerPin {
    /// Connector pin 2 (m = 0)
    #[default]
    Pin2 = 0,
    /// Connector pin 5 (m = 1)
    Pin5 = 1,
}

/// Default drawer pulse ON time (units of 2 ms).
pub const DRAWER_ON_TIME: u8 = 120;

/// Default drawer pulse OFF time (units of 2 ms).
pub const DRAWER_OFF_TIME: u8 = 240;

/// # Generate Pulse (ESC p m t1 t2)
///
/// Sends a pulse to the drawer kick-out connector.
///
/// ## Protocol Details
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | ESC p m t1 t2 |
/// | Hex     | 1B 70 m t1 t2 |
///
/// ## Parameters
///
/// - `m`: connector selector (0 = pin 2, 1 = pin 5)
/// - `t1`: ON time, `t2`: OFF time (× 2 ms)
pub fn pulse_drawer(m: u8, on_time: u8, off_time: u8) -> Vec<u8> {
    vec![ESC, b'p', m, on_time, off_time]
}

/// Pulse the given drawer pin with explicit timing.
pub fn pulse_drawer_pin(pin: DrawerPin, on_time: u8, off_time: u8) -> Vec<u8> {
    pulse_drawer(pin as u8, on_time, off_time)
}

/// # Beep (ESC B n t)
///
/// Sounds the buzzer `times` times for `duration` × 100 ms each
/// (supported on models fitted with a buzzer).
pub fn beep(times: u8, duration: u8) -> Vec<u8> {
    vec![ESC, b'B', times, duration]
}

// ============================================================================
// STATUS
// ============================================================================

/// # Transmit Status (GS r n)
///
/// - `n = 1`: paper sensor status
/// - `n = 2`: drawer kick-out connector status
///
/// The response length is device-defined; reading it is the transport's job.
#[inline]
pub fn request_status(n: u8) -> Vec<u8> {
    vec![GS, b'r', n]
}

/// Real-time status transmission (DLE EOT n)
#[inline]
pub fn real_time_status(n: u8) -> Vec<u8> {
    vec![DLE, 0x04, n]
}

/// Real-time request to printer (DLE ENQ n)
#[inline]
pub fn real_time_request(n: u8) -> Vec<u8> {
    vec![DLE, 0x05, n]
}

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

/// Encode a u16 value as little-endian bytes [low, high]
///
/// ESC/POS uses little-endian encoding for all multi-byte integers.
///
/// ## Example
///
/// ```
/// use recibo::protocol::commands::u16_le;
///
/// assert_eq!(u16_le(0x1234), [0x34, 0x12]);
/// assert_eq!(u16_le(576), [0x40, 0x02]); // 576 = 0x0240
/// ```
#[inline]
pub const fn u16_le(value: u16) -> [u8; 2] {
    [value as u8, (value >> 8) as u8]
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init() {
        assert_eq!(init(), vec![0x1B, 0x40]);
    }

    #[test]
    fn test_line_feed() {
        assert_eq!(line_feed(0), Vec::<u8>::new());
        assert_eq!(line_feed(1), vec![0x0A]);
        assert_eq!(line_feed(3), vec![0x0A, 0x0A, 0x0A]);
    }

    #[test]
    fn test_single_byte_controls() {
        assert_eq!(horizontal_tab(), vec![0x09]);
        assert_eq!(carriage_return(), vec![0x0D]);
        assert_eq!(form_feed(), vec![0x0C]);
        assert_eq!(print_and_line_feed(), vec![0x1B, 0x0A]);
    }

    #[test]
    fn test_positions() {
        for n in [0x0000u16, 0x0001, 0x00FF, 0x0100, 0xFFFF] {
            let [lo, hi] = [(n & 0xFF) as u8, (n >> 8) as u8];
            assert_eq!(absolute_position(n), vec![0x1B, 0x24, lo, hi]);
            assert_eq!(relative_position(n), vec![0x1B, 0x5C, lo, hi]);
            assert_eq!(left_margin(n), vec![0x1D, 0x4C, lo, hi]);
        }
    }

    #[test]
    fn test_relative_position_signed() {
        assert_eq!(relative_position_signed(-1), vec![0x1B, 0x5C, 0xFF, 0x00]);
        assert_eq!(relative_position_signed(i8::MIN), vec![0x1B, 0x5C, 0x80, 0x00]);
        assert_eq!(relative_position_signed(i8::MAX), vec![0x1B, 0x5C, 0x7F, 0x00]);
    }

    #[test]
    fn test_feeds() {
        assert_eq!(feed_lines(0xFF), vec![0x1B, 0x64, 0xFF]);
        assert_eq!(feed_dots(0x01), vec![0x1B, 0x4A, 0x01]);
    }

    #[test]
    fn test_cuts() {
        assert_eq!(cut_full(), vec![0x1D, 0x56, 0x00]);
        assert_eq!(cut_partial(), vec![0x1D, 0x56, 0x01]);
        assert_eq!(cut_full_feed(0xFF), vec![0x1D, 0x56, 0x41, 0xFF]);
        assert_eq!(cut_partial_feed(0x00), vec![0x1D, 0x56, 0x42, 0x00]);
    }

    #[test]
    fn test_pulse_drawer_defaults() {
        assert_eq!(
            pulse_drawer_pin(DrawerPin::Pin2, DRAWER_ON_TIME, DRAWER_OFF_TIME),
            vec![0x1B, 0x70, 0x00, 120, 240]
        );
        assert_eq!(
            pulse_drawer_pin(DrawerPin::Pin5, 1, 0xFF),
            vec![0x1B, 0x70, 0x01, 0x01, 0xFF]
        );
    }

    #[test]
    fn test_beep() {
        assert_eq!(beep(1, 2), vec![0x1B, 0x42, 0x01, 0x02]);
    }

    #[test]
    fn test_status_requests() {
        assert_eq!(request_status(1), vec![0x1D, 0x72, 0x01]);
        assert_eq!(real_time_status(0xFF), vec![0x10, 0x04, 0xFF]);
        assert_eq!(real_time_request(1), vec![0x10, 0x05, 0x01]);
    }

    #[test]
    fn test_u16_le() {
        assert_eq!(u16_le(0x0000), [0x00, 0x00]);
        assert_eq!(u16_le(0x00FF), [0xFF, 0x00]);
        assert_eq!(u16_le(0xFF00), [0x00, 0xFF]);
        assert_eq!(u16_le(0x1234), [0x34, 0x12]);
        assert_eq!(u16_le(576), [0x40, 0x02]);
    }
}
