//! # Printer Configuration
//!
//! Hardware limits of supported ESC/POS receipt printers.
//!
//! ## Supported Printers
//!
//! | Model | Columns (Font A) | Graphics buffer |
//! |-------|------------------|-----------------|
//! | TM-T20 | 48 | 2047 × 1662 dots |
//!
//! ## Usage
//!
//! ```
//! use recibo::printer::PrinterConfig;
//!
//! let config = PrinterConfig::TM_T20;
//! println!("{} columns per line", config.columns);
//! ```

/// # Printer Configuration
///
/// - **columns**: characters per line in Font A at 1× size; the simulator's
///   default line width
/// - **max_graphics_width / max_graphics_height**: largest image accepted by
///   the stored-graphics buffer (`GS ( L`, bx = by = 1); checked before a
///   bitmap is transcoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrinterConfig {
    /// Font A columns per line
    pub columns: usize,

    /// Largest stored-graphics width in dots
    pub max_graphics_width: u32,

    /// Largest stored-graphics height in dots
    pub max_graphics_height: u32,
}

impl PrinterConfig {
    /// # Epson TM-T20 Configuration
    ///
    /// 80mm paper, 72mm (576 dot) print area, 48 columns of 12-dot Font A.
    pub const TM_T20: Self = Self {
        columns: 48,
        max_graphics_width: 2047,
        max_graphics_height: 1662,
    };
}

impl Default for PrinterConfig {
    fn default() -> Self {
        Self::TM_T20
    }
}
