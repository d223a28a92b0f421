//! # Text Preview
//!
//! Decodes ESC/POS bytes back into a readable approximation of the printed
//! receipt. The decoder is independent of the command builders: it only
//! knows the byte layout of each opcode.
//!
//! ## Example
//!
//! ```
//! use recibo::document::{compile, CompileOptions};
//! use recibo::preview::decode;
//!
//! let bytes = compile(
//!     r#"<receipt><align value="right"><line>Total 9.99</line></align><cut type="full"/></receipt>"#,
//!     &CompileOptions::default(),
//! )
//! .unwrap();
//!
//! let text = decode(&bytes, 20).unwrap();
//! assert_eq!(text, "          Total 9.99\n-< full cut >-\n");
//! ```

mod simulator;

pub use simulator::{
    DecoderState, FULL_CUT_MARKER, IMAGE_MARKER, Justify, PARTIAL_CUT_MARKER, QR_MARKER,
    TextPrinter,
};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::printer::PrinterConfig;

/// Simulator settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    /// Characters per line used for center and right padding.
    pub line_width: usize,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            line_width: PrinterConfig::TM_T20.columns,
        }
    }
}

/// Decode a complete byte sequence into text.
pub fn decode(data: &[u8], line_width: usize) -> Result<String> {
    let mut printer = TextPrinter::new(PreviewConfig { line_width })?;
    printer.feed(data);
    Ok(printer.finish())
}
