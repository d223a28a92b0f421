//! Text-mode printer simulator.
//!
//! [`TextPrinter`] scans ESC/POS bytes and renders what a receipt would say.
//! Every recognized opcode consumes exactly the bytes the command builders
//! emit for it, so the scanner never drifts out of step with the stream.
//!
//! ## Markers
//!
//! Graphics and barcodes render as one marker line each. A stored image is
//! two `GS ( L` commands (store, then print) but yields a single
//! [`IMAGE_MARKER`], emitted by the print function; the store is silent.
//! Decoders that mark every `GS ( L` opcode show two lines for the same
//! image. QR codes follow the same store/print split under [`QR_MARKER`].

use tracing::{debug, warn};

use super::PreviewConfig;
use crate::error::{ReciboError, Result};
use crate::transport::Printer;

const LF: u8 = 0x0A;
const HT: u8 = 0x09;
const FF: u8 = 0x0C;
const CR: u8 = 0x0D;
const ESC: u8 = 0x1B;
const GS: u8 = 0x1D;
const DLE: u8 = 0x10;

pub const FULL_CUT_MARKER: &str = "-< full cut >-";
pub const PARTIAL_CUT_MARKER: &str = "-< cut >-";
pub const QR_MARKER: &str = "[QRCode]";
pub const IMAGE_MARKER: &str = "[IMAGE]";

/// Justification tracked by the simulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Justify {
    #[default]
    Left,
    Center,
    Right,
}

/// Style and layout state mutated by opcodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderState {
    pub bold: bool,
    pub underline: bool,
    pub invert: bool,
    pub justify: Justify,
    /// Horizontal character scale, 1-8.
    pub width: u8,
    /// Vertical character scale, 1-8. Tracked only.
    pub height: u8,
}

impl Default for DecoderState {
    fn default() -> Self {
        Self {
            bold: false,
            underline: false,
            invert: false,
            justify: Justify::Left,
            width: 1,
            height: 1,
        }
    }
}

/// What one scanner step did.
enum Step {
    /// Bytes consumed with no visible effect beyond state changes.
    Consumed(usize),
    /// Too few bytes left for the opcode this prefix announces.
    Truncated,
}

/// ESC/POS byte stream to text.
///
/// Styles have no visual effect except double width, which repeats each
/// character. Barcodes, QR codes, images and cuts become marker lines.
///
/// ```
/// use recibo::preview::{PreviewConfig, TextPrinter};
///
/// let mut printer = TextPrinter::new(PreviewConfig { line_width: 10 }).unwrap();
/// printer.feed(b"\x1ba\x01Hi\n\x1dV\x00");
/// assert_eq!(printer.finish(), "    Hi\n-< full cut >-\n");
/// ```
#[derive(Debug, Clone)]
pub struct TextPrinter {
    line_width: usize,
    state: DecoderState,
    line: String,
    output: String,
    qr_payload: Option<Vec<u8>>,
}

impl Default for TextPrinter {
    fn default() -> Self {
        Self::with_width(PreviewConfig::default().line_width)
    }
}

impl TextPrinter {
    /// Create a simulator; a zero line width is rejected.
    pub fn new(config: PreviewConfig) -> Result<Self> {
        if config.line_width == 0 {
            return Err(ReciboError::out_of_range("line_width", 0, "1.."));
        }
        Ok(Self::with_width(config.line_width))
    }

    fn with_width(line_width: usize) -> Self {
        Self {
            line_width,
            state: DecoderState::default(),
            line: String::new(),
            output: String::new(),
            qr_payload: None,
        }
    }

    pub fn state(&self) -> &DecoderState {
        &self.state
    }

    /// Completed lines so far. The line still being built is not included.
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Text waiting for a line feed.
    pub fn pending(&self) -> &str {
        &self.line
    }

    /// Flush any pending text and return the full rendering.
    pub fn finish(mut self) -> String {
        self.flush_pending();
        self.output
    }

    /// Scan `data`, returning the number of bytes consumed (always all of them).
    pub fn feed(&mut self, data: &[u8]) -> usize {
        let mut i = 0;
        while i < data.len() {
            let rest = &data[i..];
            let step = match rest[0] {
                ESC => self.escape(rest),
                GS => self.group(rest),
                DLE => self.device_control(rest),
                _ => {
                    self.byte(rest);
                    Step::Consumed(self.char_len(rest))
                }
            };
            i += match step {
                Step::Consumed(n) => n.clamp(1, rest.len()),
                // only possible at the end of the input
                Step::Truncated => {
                    debug!(offset = i, prefix = rest[0], "truncated command at end of input");
                    rest.len()
                }
            };
        }
        i
    }

    // ========================================================================
    // ESC family
    // ========================================================================

    fn escape(&mut self, rest: &[u8]) -> Step {
        let Some(&cmd) = rest.get(1) else {
            return Step::Truncated;
        };
        let arg = rest.get(2).copied();

        match (cmd, arg) {
            (b'@', _) => {
                self.state = DecoderState::default();
                Step::Consumed(2)
            }
            (b'2', _) => Step::Consumed(2),
            (LF, _) => {
                self.end_line();
                Step::Consumed(2)
            }
            (b'E', Some(n)) => {
                self.state.bold = n & 1 != 0;
                Step::Consumed(3)
            }
            (b'-', Some(n)) => {
                self.state.underline = !matches!(n, 0 | b'0');
                Step::Consumed(3)
            }
            (b'a', Some(n)) => {
                self.state.justify = match n {
                    1 | b'1' => Justify::Center,
                    2 | b'2' => Justify::Right,
                    _ => Justify::Left,
                };
                Step::Consumed(3)
            }
            (b'd', Some(n)) => {
                self.flush_pending();
                for _ in 0..n {
                    self.output.push('\n');
                }
                Step::Consumed(3)
            }
            // font, rotation, print mode, charset, code page, spacing,
            // line spacing, double strike, dot feed
            (b'M' | b'V' | b'!' | b'R' | b't' | b' ' | b'3' | b'G' | b'J', Some(_)) => {
                Step::Consumed(3)
            }
            (b'$' | b'\\', _) => fixed(rest, 4),
            (b'B', _) => fixed(rest, 4),
            (b'p', _) => fixed(rest, 5),
            (_, None) if is_known_escape(cmd) => Step::Truncated,
            _ => {
                warn!(cmd, "unknown ESC command");
                Step::Consumed(2)
            }
        }
    }

    // ========================================================================
    // GS family
    // ========================================================================

    fn group(&mut self, rest: &[u8]) -> Step {
        let Some(&cmd) = rest.get(1) else {
            return Step::Truncated;
        };

        match cmd {
            b'!' => match rest.get(2) {
                Some(&n) => {
                    self.state.width = (n & 0x0F) + 1;
                    self.state.height = ((n >> 4) & 0x0F) + 1;
                    Step::Consumed(3)
                }
                None => Step::Truncated,
            },
            b'B' => match rest.get(2) {
                Some(&n) => {
                    self.state.invert = n & 1 != 0;
                    Step::Consumed(3)
                }
                None => Step::Truncated,
            },
            b'V' => self.cut(rest),
            b'k' => self.barcode(rest),
            b'(' => self.extended(rest),
            b'v' => self.raster(rest),
            // barcode height/width/HRI/HRI font, status, smoothing
            b'h' | b'w' | b'H' | b'f' | b'r' | b'b' => fixed(rest, 3),
            b'L' => fixed(rest, 4),
            _ => {
                warn!(cmd, "unknown GS command");
                Step::Consumed(2)
            }
        }
    }

    fn cut(&mut self, rest: &[u8]) -> Step {
        let Some(&mode) = rest.get(2) else {
            return Step::Truncated;
        };
        let (full, len) = match mode {
            0 | b'0' => (true, 3),
            1 | b'1' => (false, 3),
            0x41 => (true, 4),
            0x42 => (false, 4),
            _ => {
                warn!(mode, "unknown cut mode");
                return Step::Consumed(3);
            }
        };
        if rest.len() < len {
            return Step::Truncated;
        }
        self.marker(if full { FULL_CUT_MARKER } else { PARTIAL_CUT_MARKER });
        Step::Consumed(len)
    }

    /// `GS k m d... NUL` (m <= 6) or `GS k m n d...` (m > 6).
    fn barcode(&mut self, rest: &[u8]) -> Step {
        let Some(&m) = rest.get(2) else {
            return Step::Truncated;
        };
        let (payload, len) = if m <= 6 {
            let body = &rest[3..];
            match body.iter().position(|&b| b == 0) {
                Some(end) => (&body[..end], 3 + end + 1),
                None => (body, rest.len()),
            }
        } else {
            let Some(&n) = rest.get(3) else {
                return Step::Truncated;
            };
            let end = (4 + n as usize).min(rest.len());
            (&rest[4..end], 4 + n as usize)
        };

        self.marker(&format!("[{}]", barcode_name(m)));
        if !payload.is_empty() {
            self.output.push_str(&String::from_utf8_lossy(payload));
            self.output.push('\n');
        }
        Step::Consumed(len)
    }

    /// `GS ( x pL pH ...`: QR code (`k`), stored graphics (`L`) and any other
    /// function that shares the framing.
    fn extended(&mut self, rest: &[u8]) -> Step {
        if rest.len() < 5 {
            return Step::Truncated;
        }
        let kind = rest[2];
        let param_len = u16::from_le_bytes([rest[3], rest[4]]) as usize;
        let len = 5 + param_len;
        let params = &rest[5..len.min(rest.len())];

        match (kind, params) {
            // cn = 49 (QR), fn = 80 store
            (b'k', [0x31, 0x50, _, data @ ..]) => {
                self.qr_payload = Some(data.to_vec());
            }
            // cn = 49, fn = 81 print
            (b'k', [0x31, 0x51, ..]) => {
                self.marker(QR_MARKER);
                if let Some(payload) = self.qr_payload.as_deref().filter(|p| !p.is_empty()) {
                    let text = String::from_utf8_lossy(payload).into_owned();
                    self.output.push_str(&text);
                    self.output.push('\n');
                }
            }
            // m = 48, fn = 112 store graphics data
            (b'L', [0x30, 0x70, ..]) => {
                debug!(bytes = param_len, "stored graphics");
            }
            // m = 48, fn = 2 / 50 print stored graphics
            (b'L', [0x30, 0x02 | 0x32]) => self.marker(IMAGE_MARKER),
            _ => debug!(kind, bytes = param_len, "skipping GS ( function"),
        }
        Step::Consumed(len)
    }

    /// `GS v 0 m xL xH yL yH d...`
    fn raster(&mut self, rest: &[u8]) -> Step {
        if rest.len() < 8 {
            return Step::Truncated;
        }
        if rest[2] != b'0' {
            warn!(sub = rest[2], "unknown GS v command");
            return Step::Consumed(3);
        }
        let width_bytes = u16::from_le_bytes([rest[4], rest[5]]) as usize;
        let height = u16::from_le_bytes([rest[6], rest[7]]) as usize;
        self.marker(IMAGE_MARKER);
        Step::Consumed(8 + width_bytes * height)
    }

    // ========================================================================
    // DLE family
    // ========================================================================

    fn device_control(&mut self, rest: &[u8]) -> Step {
        match rest.get(1) {
            // real-time status / request
            Some(0x04 | 0x05) => fixed(rest, 3),
            Some(&cmd) => {
                warn!(cmd, "unknown DLE command");
                Step::Consumed(2)
            }
            None => Step::Truncated,
        }
    }

    // ========================================================================
    // Text
    // ========================================================================

    /// Handle a single non-command byte (or the lead byte of a UTF-8 sequence).
    fn byte(&mut self, rest: &[u8]) {
        let b = rest[0];
        match b {
            LF => self.end_line(),
            FF => {
                self.end_line();
                self.output.push('\n');
            }
            HT => self.line.push_str("    "),
            CR => {}
            0x20..=0x7E => self.push_char(b as char),
            0x80..=0xFF => match decode_utf8(rest) {
                Some((ch, _)) => self.push_char(ch),
                None => self.push_char(char::from(b)),
            },
            _ => debug!(byte = b, "ignoring control byte"),
        }
    }

    fn char_len(&self, rest: &[u8]) -> usize {
        decode_utf8(rest).map_or(1, |(_, len)| len)
    }

    fn push_char(&mut self, ch: char) {
        for _ in 0..self.state.width.max(1) {
            self.line.push(ch);
        }
    }

    /// LF semantics: always produce a line, blank if nothing is pending.
    fn end_line(&mut self) {
        let line = std::mem::take(&mut self.line);
        let padded = self.justify(&line);
        self.output.push_str(&padded);
        self.output.push('\n');
    }

    /// Marker semantics: only emit a line if text is pending.
    fn flush_pending(&mut self) {
        if !self.line.is_empty() {
            self.end_line();
        }
    }

    fn marker(&mut self, marker: &str) {
        self.flush_pending();
        self.output.push_str(marker);
        self.output.push('\n');
    }

    fn justify(&self, line: &str) -> String {
        let deficit = self.line_width.saturating_sub(line.chars().count());
        let pad = match self.state.justify {
            Justify::Left => 0,
            Justify::Center => deficit / 2,
            Justify::Right => deficit,
        };
        format!("{}{}", " ".repeat(pad), line)
    }
}

impl Printer for TextPrinter {
    fn connect(&mut self) -> Result<()> {
        Ok(())
    }

    fn send(&mut self, data: &[u8]) -> Result<()> {
        self.feed(data);
        Ok(())
    }

    fn read_status(&mut self, _n: u8) -> Result<Vec<u8>> {
        Ok(Vec::new())
    }
}

fn fixed(rest: &[u8], len: usize) -> Step {
    if rest.len() < len {
        Step::Truncated
    } else {
        Step::Consumed(len)
    }
}

fn is_known_escape(cmd: u8) -> bool {
    matches!(
        cmd,
        b'E' | b'-' | b'a' | b'd' | b'M' | b'V' | b'!' | b'R' | b't' | b' ' | b'3' | b'G' | b'J'
    )
}

/// Decode one UTF-8 sequence at the start of `bytes`.
fn decode_utf8(bytes: &[u8]) -> Option<(char, usize)> {
    let len = match bytes.first()? {
        b if b & 0xE0 == 0xC0 => 2,
        b if b & 0xF0 == 0xE0 => 3,
        b if b & 0xF8 == 0xF0 => 4,
        _ => return None,
    };
    let seq = bytes.get(..len)?;
    std::str::from_utf8(seq).ok()?.chars().next().map(|c| (c, len))
}

fn barcode_name(m: u8) -> String {
    match m {
        0 | 65 => "UPC-A".into(),
        1 | 66 => "UPC-E".into(),
        2 | 67 => "EAN13".into(),
        3 | 68 => "EAN8".into(),
        4 | 69 => "CODE39".into(),
        5 | 70 => "ITF".into(),
        6 | 71 => "CODABAR".into(),
        72 => "CODE93".into(),
        73 => "CODE128".into(),
        other => format!("Barcode{other}"),
    }
}
