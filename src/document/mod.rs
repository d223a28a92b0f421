//! # Receipt Documents
//!
//! Receipts are written as XML markup and compiled straight to ESC/POS bytes.
//!
//! ```
//! use recibo::document::{compile_with_context, CompileOptions};
//! use recibo::template::{Record, TemplateContext, Value};
//!
//! let xml = r#"
//! <receipt>
//!   <align value="center"><bold><line>${Store}</line></bold></align>
//!   <for var="item" in="Items">
//!     <line>${item.Name}  ${item.Price:F2}</line>
//!   </for>
//!   <if condition="Paid"><line>PAID</line></if>
//!   <cut/>
//! </receipt>"#;
//!
//! let mut ctx = TemplateContext::new();
//! ctx.add("Store", "Corner Shop").unwrap();
//! ctx.add("Paid", true).unwrap();
//! ctx.add("Items", vec![
//!     Value::from(Record::new().with("Name", "Coffee").with("Price", 3.5)),
//! ]).unwrap();
//!
//! let bytes = compile_with_context(xml, &mut ctx, &CompileOptions::default()).unwrap();
//! assert!(bytes.ends_with(b"PAID\n\x1dV\x01"));
//! ```
//!
//! ## Elements
//!
//! | Element | Attributes | Effect |
//! |---------|------------|--------|
//! | `receipt` | `encoding` | document root |
//! | `text`, `line` | `encoding` | substituted text; `line` adds LF |
//! | `bold`, `invert`, `rotate90` | | bracketing style |
//! | `underline` | `mode` | bracketing style (default mode 1) |
//! | `size` | `width`, `height` (1-8) | bracketing character size |
//! | `align` | `value` (left/center/right) | bracketing justification |
//! | `font` | `name` (A/B) | bracketing font |
//! | `qrcode` | `data`, `size`, `errorLevel` | QR symbol |
//! | `barcode` | `type`, `data`, `height`, `width`, `hri` | 1D barcode |
//! | `image` | `path`, `fn` | BMP file as stored graphics |
//! | `feed` | `lines` or `dots` | paper feed |
//! | `cut` | `type`, `feed` | paper cut |
//! | `drawer` | `pin`, `onTime`, `offTime` | drawer pulse |
//! | `beep` | `times`, `duration` | buzzer |
//! | `spacing` | `character`, `line` | character and line spacing |
//! | `margin` | `left` | left margin in dots |
//! | `codepage` | `value` | character code table |
//! | `initialize` | | printer reset |
//! | `for` | `var`, `in` | repeat children per list item |
//! | `if` | `condition` | children only when truthy |

mod compiler;
mod node;
pub mod schema;

pub use compiler::Compiler;
pub use node::{Content, Element, parse};

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::template::TemplateContext;

/// Compilation settings.
///
/// Deserializable so the CLI (or an embedding application) can load them
/// from JSON; every field is optional there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompileOptions {
    /// Check the document against the schema before emitting anything.
    pub validate: bool,
    /// Default text encoding, overridable per element.
    pub encoding: String,
    /// Largest list a `for` element may expand. `None` means unbounded.
    pub max_loop_items: Option<usize>,
    /// Directory relative `image` paths are resolved against.
    pub base_dir: Option<PathBuf>,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            validate: true,
            encoding: "ascii".to_string(),
            max_loop_items: None,
            base_dir: None,
        }
    }
}

/// Compile markup without template bindings.
///
/// `${...}` tokens are printed literally and `for`/`if` elements fail.
pub fn compile(xml: &str, options: &CompileOptions) -> Result<Vec<u8>> {
    let root = parse(xml)?;
    Compiler::new(options).compile(&root, None)
}

/// Compile markup, resolving variables and control elements against `context`.
pub fn compile_with_context(
    xml: &str,
    context: &mut TemplateContext,
    options: &CompileOptions,
) -> Result<Vec<u8>> {
    let root = parse(xml)?;
    Compiler::new(options).compile(&root, Some(context))
}

/// Compile a markup file.
///
/// Relative image paths resolve against the file's directory unless
/// `options.base_dir` says otherwise.
pub fn compile_file(
    path: impl AsRef<Path>,
    context: Option<&mut TemplateContext>,
    options: &CompileOptions,
) -> Result<Vec<u8>> {
    let path = path.as_ref();
    let xml = std::fs::read_to_string(path)?;

    let mut options = options.clone();
    if options.base_dir.is_none() {
        options.base_dir = path.parent().map(Path::to_path_buf);
    }

    let root = parse(&xml)?;
    Compiler::new(&options).compile(&root, context)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReciboError;

    #[test]
    fn test_options_defaults() {
        let options = CompileOptions::default();
        assert!(options.validate);
        assert_eq!(options.encoding, "ascii");
        assert_eq!(options.max_loop_items, None);
        assert_eq!(options.base_dir, None);
    }

    #[test]
    fn test_options_from_partial_json() {
        let options: CompileOptions =
            serde_json::from_str(r#"{"encoding":"cp437","max_loop_items":100}"#).unwrap();
        assert!(options.validate);
        assert_eq!(options.encoding, "cp437");
        assert_eq!(options.max_loop_items, Some(100));
    }

    #[test]
    fn test_compile_rejects_malformed_xml() {
        let err = compile("<receipt>", &CompileOptions::default()).unwrap_err();
        assert!(matches!(err, ReciboError::Xml(_)));
    }

    #[test]
    fn test_compile_file_resolves_images_next_to_markup() {
        let dir = tempfile::tempdir().unwrap();
        let markup = dir.path().join("receipt.xml");
        std::fs::write(&markup, r#"<receipt><image path="missing.bmp"/></receipt>"#).unwrap();

        let err = compile_file(&markup, None, &CompileOptions::default()).unwrap_err();
        let expected = dir.path().join("missing.bmp");
        assert!(
            err.to_string().contains(&expected.display().to_string()),
            "{err}"
        );
    }
}
