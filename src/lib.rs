//! # Recibo - Receipt Markup Compiler for ESC/POS Printers
//!
//! Recibo turns XML receipt markup into ESC/POS bytes for thermal receipt
//! printers, and turns those bytes back into readable text. It provides:
//!
//! - **Protocol implementation**: byte-exact ESC/POS command builders,
//!   including BMP to monochrome transcoding for stored graphics
//! - **Templates**: `${path:format}` substitution with `for`/`if` elements
//! - **Compiler**: schema-checked markup to bytes
//! - **Preview**: a text-mode printer simulator
//!
//! ## Quick Start
//!
//! ```
//! use recibo::{
//!     document::{compile_with_context, CompileOptions},
//!     preview,
//!     template::TemplateContext,
//! };
//!
//! let mut ctx = TemplateContext::from_json(serde_json::json!({
//!     "Customer": "Ada",
//!     "Items": [{"Name": "Tea"}, {"Name": "Scone"}],
//! }));
//!
//! let xml = r#"<receipt>
//!   <bold><line>Hello ${Customer}</line></bold>
//!   <for var="item" in="Items"><line>- ${item.Name}</line></for>
//!   <cut/>
//! </receipt>"#;
//!
//! let bytes = compile_with_context(xml, &mut ctx, &CompileOptions::default())?;
//! let text = preview::decode(&bytes, 32)?;
//! assert_eq!(text, "Hello Ada\n- Tea\n- Scone\n-< cut >-\n");
//! # Ok::<(), recibo::ReciboError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`protocol`] | ESC/POS command builders and BMP transcoding |
//! | [`template`] | Template values and variable context |
//! | [`document`] | Markup tree, schema and compiler |
//! | [`preview`] | Text-mode simulator |
//! | [`transport`] | Printer boundary and file transport |
//! | [`printer`] | Printer configurations |
//! | [`error`] | Error types |
//!
//! ## Supported Printers
//!
//! Profiles target the Epson TM-T20 (80mm paper, 203 DPI). Other ESC/POS
//! printers work as long as their graphics limits are at least as large.

pub mod document;
pub mod error;
pub mod preview;
pub mod printer;
pub mod protocol;
pub mod template;
pub mod transport;

// Re-exports for convenience
pub use document::{CompileOptions, compile, compile_file, compile_with_context};
pub use error::{ReciboError, Result};
pub use preview::TextPrinter;
pub use printer::PrinterConfig;
pub use template::TemplateContext;
pub use transport::{FileTransport, Printer};
