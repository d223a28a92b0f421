//! # Receipt Compiler
//!
//! Walks an [`Element`] tree and appends ESC/POS bytes for each node.
//!
//! Bracketing elements (`bold`, `underline`, `invert`, `size`, `align`,
//! `font`, `rotate90`) emit their "on" sequence, compile their children and
//! then emit the matching reset, so styles never leak past the closing tag.
//! `for` and `if` need a [`TemplateContext`]; the loop body is the already
//! parsed subtree, re-walked once per item inside its own scope.
//!
//! Text is substituted only when a context is bound. Without one, `${...}`
//! tokens are printed as written.

use std::path::{Path, PathBuf};

use tracing::debug;

use super::node::{Content, Element};
use super::{CompileOptions, schema};
use crate::error::{ReciboError, Result};
use crate::protocol::barcode::{barcode1d, qr};
use crate::protocol::commands::{self, DRAWER_OFF_TIME, DRAWER_ON_TIME, DrawerPin};
use crate::protocol::encoding::TextEncoding;
use crate::protocol::text::{self, Alignment, Font};
use crate::protocol::{bmp, graphics};
use crate::template::{TemplateContext, Value};

const DEFAULT_QR_SIZE: u8 = 4;
const DEFAULT_BARCODE_HEIGHT: u8 = 80;
const DEFAULT_BARCODE_WIDTH: u8 = 3;
const DEFAULT_UNDERLINE_MODE: u8 = 1;
const DEFAULT_BEEP_TIMES: u8 = 1;
const DEFAULT_BEEP_DURATION: u8 = 5;

/// Compiles pre-parsed receipt trees.
///
/// ```
/// use recibo::document::{parse, CompileOptions, Compiler};
///
/// let root = parse("<receipt><bold><text>Hi</text></bold></receipt>").unwrap();
/// let options = CompileOptions::default();
/// let bytes = Compiler::new(&options).compile(&root, None).unwrap();
/// assert_eq!(bytes, b"\x1bE\x01Hi\x1bE\x00");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Compiler<'o> {
    options: &'o CompileOptions,
}

impl<'o> Compiler<'o> {
    pub fn new(options: &'o CompileOptions) -> Self {
        Self { options }
    }

    /// Compile a tree, validating it first when the options ask for it.
    ///
    /// Validation failures are reported before any byte is produced. Errors
    /// raised while walking discard everything emitted so far.
    pub fn compile(&self, root: &Element, context: Option<&mut TemplateContext>) -> Result<Vec<u8>> {
        if self.options.validate {
            schema::validate(root)?;
        }
        let encoding = TextEncoding::from_name(&self.options.encoding)?;

        debug!(
            root = %root.name,
            encoding = encoding.name(),
            templated = context.is_some(),
            "compiling receipt"
        );

        let mut emitter = Emitter {
            options: self.options,
            context,
            out: Vec::new(),
        };
        emitter.element(root, encoding)?;

        debug!(bytes = emitter.out.len(), "compiled receipt");
        Ok(emitter.out)
    }
}

/// Per-compilation walk state.
struct Emitter<'a> {
    options: &'a CompileOptions,
    context: Option<&'a mut TemplateContext>,
    out: Vec<u8>,
}

impl Emitter<'_> {
    fn element(&mut self, el: &Element, inherited: TextEncoding) -> Result<()> {
        let encoding = match el.attr_non_empty("encoding") {
            Some(name) => TextEncoding::from_name(name)?,
            None => inherited,
        };

        match el.name.as_str() {
            "receipt" => self.children(el, encoding),
            "initialize" => {
                self.out.extend(commands::init());
                Ok(())
            }

            // ---- text ----
            "text" => {
                let content = self.substitute(&el.text());
                if !content.is_empty() {
                    self.out.extend(text::text(&content, encoding));
                }
                Ok(())
            }
            "line" => {
                let content = self.substitute(&el.text());
                self.out.extend(text::print_line(&content, encoding));
                Ok(())
            }

            // ---- bracketing styles ----
            "bold" => self.bracket(el, encoding, text::bold(true), text::bold(false)),
            "invert" => self.bracket(el, encoding, text::invert(true), text::invert(false)),
            "rotate90" => self.bracket(el, encoding, text::rotate90(true), text::rotate90(false)),
            "underline" => {
                let mode = byte_attr(el, "mode")?.unwrap_or(DEFAULT_UNDERLINE_MODE);
                self.bracket(el, encoding, text::underline(mode), text::underline_off())
            }
            "size" => {
                let width = byte_attr(el, "width")?.unwrap_or(1);
                let height = byte_attr(el, "height")?.unwrap_or(1);
                let on = text::character_size(width, height)?;
                self.bracket(el, encoding, on, text::character_size_normal())
            }
            "align" => {
                let alignment = el
                    .attr("value")
                    .and_then(Alignment::from_name)
                    .unwrap_or_default();
                self.bracket(el, encoding, text::align(alignment), text::align_left())
            }
            "font" => {
                let font = el.attr("name").and_then(Font::from_name).unwrap_or_default();
                self.bracket(el, encoding, text::font(font), text::font(Font::A))
            }

            // ---- codes and images ----
            "qrcode" => self.qrcode(el),
            "barcode" => self.barcode(el),
            "image" => self.image(el),

            // ---- paper, drawer, buzzer ----
            "feed" => {
                if let Some(lines) = byte_attr(el, "lines")? {
                    self.out.extend(commands::feed_lines(lines));
                } else if let Some(dots) = byte_attr(el, "dots")? {
                    self.out.extend(commands::feed_dots(dots));
                }
                Ok(())
            }
            "cut" => {
                let full = el.attr("type") == Some("full");
                let bytes = match (full, byte_attr(el, "feed")?) {
                    (true, Some(n)) => commands::cut_full_feed(n),
                    (false, Some(n)) => commands::cut_partial_feed(n),
                    (true, None) => commands::cut_full(),
                    (false, None) => commands::cut_partial(),
                };
                self.out.extend(bytes);
                Ok(())
            }
            "drawer" => {
                let pin = match el.attr("pin") {
                    Some("5") => DrawerPin::Pin5,
                    _ => DrawerPin::Pin2,
                };
                let on = byte_attr(el, "onTime")?.unwrap_or(DRAWER_ON_TIME);
                let off = byte_attr(el, "offTime")?.unwrap_or(DRAWER_OFF_TIME);
                self.out.extend(commands::pulse_drawer_pin(pin, on, off));
                Ok(())
            }
            "beep" => {
                let times = byte_attr(el, "times")?.unwrap_or(DEFAULT_BEEP_TIMES);
                let duration = byte_attr(el, "duration")?.unwrap_or(DEFAULT_BEEP_DURATION);
                self.out.extend(commands::beep(times, duration));
                Ok(())
            }
            "spacing" => {
                if let Some(n) = byte_attr(el, "character")? {
                    self.out.extend(text::right_side_character_spacing(n));
                }
                if let Some(n) = byte_attr(el, "line")? {
                    self.out.extend(text::line_spacing(n));
                }
                Ok(())
            }
            "margin" => {
                if let Some(left) = u16_attr(el, "left")? {
                    self.out.extend(commands::left_margin(left));
                }
                Ok(())
            }
            "codepage" => {
                if let Some(n) = byte_attr(el, "value")? {
                    self.out.extend(text::select_code_page(n));
                }
                Ok(())
            }

            // ---- control ----
            "if" => self.conditional(el, encoding),
            "for" => self.repeat(el, encoding),

            other => {
                debug!(element = other, "unknown element, compiling children only");
                self.children(el, encoding)
            }
        }
    }

    fn children(&mut self, el: &Element, encoding: TextEncoding) -> Result<()> {
        for child in &el.children {
            match child {
                Content::Element(e) => self.element(e, encoding)?,
                Content::Text(t) if !t.trim().is_empty() => {
                    let content = self.substitute(t);
                    self.out.extend(text::text(&content, encoding));
                }
                Content::Text(_) => {}
            }
        }
        Ok(())
    }

    fn bracket(&mut self, el: &Element, encoding: TextEncoding, on: Vec<u8>, off: Vec<u8>) -> Result<()> {
        self.out.extend(on);
        self.children(el, encoding)?;
        self.out.extend(off);
        Ok(())
    }

    fn substitute(&self, text: &str) -> String {
        match self.context.as_deref() {
            Some(ctx) => ctx.substitute(text),
            None => text.to_string(),
        }
    }

    fn context(&mut self, element: &str) -> Result<&mut TemplateContext> {
        self.context.as_deref_mut().ok_or_else(|| {
            ReciboError::Template(format!("<{element}> requires a template context"))
        })
    }

    fn qrcode(&mut self, el: &Element) -> Result<()> {
        let data = self.substitute(el.attr("data").unwrap_or_default());
        let size = byte_attr(el, "size")?.unwrap_or(DEFAULT_QR_SIZE);
        let level = el
            .attr("errorLevel")
            .and_then(qr::QrErrorLevel::from_name)
            .unwrap_or_default();
        self.out.extend(qr::generate(data.as_bytes(), size, level)?);
        Ok(())
    }

    fn barcode(&mut self, el: &Element) -> Result<()> {
        let kind = el
            .attr("type")
            .and_then(barcode1d::BarcodeType::from_name)
            .unwrap_or(barcode1d::BarcodeType::Code128);
        let data = self.substitute(el.attr("data").unwrap_or_default());
        let height = byte_attr(el, "height")?.unwrap_or(DEFAULT_BARCODE_HEIGHT);
        let width = byte_attr(el, "width")?.unwrap_or(DEFAULT_BARCODE_WIDTH);

        let mut bytes = barcode1d::set_height(height);
        bytes.extend(barcode1d::set_width(width));
        if let Some(hri) = el.attr_non_empty("hri") {
            let position = barcode1d::HriPosition::from_name(hri).unwrap_or_default();
            bytes.extend(barcode1d::set_hri_position(position));
        }
        bytes.extend(barcode1d::print(kind, &TextEncoding::Ascii.encode(&data))?);
        self.out.extend(bytes);
        Ok(())
    }

    fn image(&mut self, el: &Element) -> Result<()> {
        let path = self.substitute(el.attr("path").unwrap_or_default());
        if path.is_empty() {
            return Err(ReciboError::Structure(
                "<image> is missing required attribute 'path'".into(),
            ));
        }
        let print_fn = byte_attr(el, "fn")?.unwrap_or(graphics::PRINT_FN_50);
        let path = self.resolve(Path::new(&path));

        let data = std::fs::read(&path).map_err(|e| {
            std::io::Error::new(e.kind(), format!("{}: {}", path.display(), e))
        })?;
        debug!(path = %path.display(), bytes = data.len(), "loaded image");

        self.out.extend(bmp::print_bmp(&data, print_fn)?);
        Ok(())
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        match &self.options.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }

    fn conditional(&mut self, el: &Element, encoding: TextEncoding) -> Result<()> {
        let condition = required_attr(el, "condition")?;
        let truthy = self
            .context("if")?
            .get_value(condition)
            .is_some_and(|v| v.is_truthy());

        if truthy {
            self.children(el, encoding)
        } else {
            debug!(condition, "condition false, skipping");
            Ok(())
        }
    }

    fn repeat(&mut self, el: &Element, encoding: TextEncoding) -> Result<()> {
        let var = required_attr(el, "var")?;
        let source = required_attr(el, "in")?;

        let items = match self.context("for")?.get_value(source) {
            None | Some(Value::Null) => {
                debug!(source, "loop source is null, skipping");
                return Ok(());
            }
            Some(Value::List(items)) => items,
            Some(_) => {
                return Err(ReciboError::Structure(format!(
                    "the value at '{source}' is not enumerable"
                )));
            }
        };

        if let Some(max) = self.options.max_loop_items {
            if items.len() > max {
                return Err(ReciboError::Structure(format!(
                    "'{source}' has {} items, more than the limit of {max}",
                    items.len()
                )));
            }
        }
        debug!(var, source, items = items.len(), "expanding loop");

        for item in items.iter() {
            self.context("for")?.push_scope();
            let result = self.iteration(el, encoding, var, item);
            // always unwind, even when the body failed
            self.context("for")?.pop_scope()?;
            result?;
        }
        Ok(())
    }

    fn iteration(&mut self, el: &Element, encoding: TextEncoding, var: &str, item: &Value) -> Result<()> {
        self.context("for")?.set_loop_variable(var, item.clone())?;
        self.children(el, encoding)
    }
}

// ============================================================================
// ATTRIBUTE PARSING
// ============================================================================

fn required_attr<'e>(el: &'e Element, name: &str) -> Result<&'e str> {
    el.attr_non_empty(name).ok_or_else(|| {
        ReciboError::Structure(format!(
            "<{}> is missing required attribute '{name}'",
            el.name
        ))
    })
}

fn byte_attr(el: &Element, name: &str) -> Result<Option<u8>> {
    numeric_attr(el, name, "0..=255")
}

fn u16_attr(el: &Element, name: &str) -> Result<Option<u16>> {
    numeric_attr(el, name, "0..=65535")
}

fn numeric_attr<T: std::str::FromStr>(el: &Element, name: &str, range: &str) -> Result<Option<T>> {
    match el.attr_non_empty(name) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ReciboError::out_of_range(&format!("<{}> {name}", el.name), format!("'{raw}'"), range)),
    }
}
