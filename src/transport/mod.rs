//! # Printer Transport Layer
//!
//! The boundary between finished byte buffers and whatever receives them.
//!
//! ## Available Transports
//!
//! - [`FileTransport`]: raw bytes to a file or device node (`/dev/usb/lp0`)
//! - [`TextPrinter`](crate::preview::TextPrinter): the text simulator
//!
//! Network and serial adapters live outside this crate; they only need to
//! implement [`Printer`].

pub mod file;

pub use file::FileTransport;

use crate::error::Result;

/// Something that accepts compiled receipts.
pub trait Printer {
    /// Open the underlying connection. Calling it twice is harmless.
    fn connect(&mut self) -> Result<()>;

    /// Send one complete byte buffer.
    fn send(&mut self, data: &[u8]) -> Result<()>;

    /// Request `n` status bytes.
    ///
    /// Sink-only transports answer with [`ReciboError::Unsupported`](crate::ReciboError::Unsupported).
    fn read_status(&mut self, n: u8) -> Result<Vec<u8>>;
}
