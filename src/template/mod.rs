//! # Template Variables
//!
//! Values, the [`Members`] capability for structured data, and the
//! [`TemplateContext`] that resolves `${path}` substitutions and holds loop
//! scopes during compilation.
//!
//! ```
//! use recibo::template::{Record, TemplateContext, Value};
//!
//! let mut ctx = TemplateContext::new();
//! ctx.add("Items", vec![
//!     Value::from(Record::new().with("Name", "Tea")),
//!     Value::from(Record::new().with("Name", "Cake")),
//! ])?;
//! assert_eq!(ctx.substitute("${Items.Count} items"), "2 items");
//! # Ok::<(), recibo::error::ReciboError>(())
//! ```

mod context;
pub mod format;
mod value;

pub use context::TemplateContext;
pub use value::{Members, Record, Value};
