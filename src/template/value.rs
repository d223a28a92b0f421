//! Bound template values.
//!
//! Every value a template can see is a [`Value`]. Structured values expose
//! their fields through the [`Members`] trait, so paths like
//! `order.customer.name` resolve one member at a time without reflection.

use std::fmt;
use std::sync::Arc;

use super::format;

/// Read access to the named fields of a structured value.
///
/// Member lookup is case-insensitive: `member("NAME")` and `member("name")`
/// must return the same field.
pub trait Members: fmt::Debug + Send + Sync {
    /// The field called `name`, if any.
    fn member(&self, name: &str) -> Option<Value>;

    /// Field names in declaration order.
    fn member_names(&self) -> Vec<String>;

    /// Text used when the object itself is substituted into a template.
    fn render(&self) -> String {
        String::new()
    }
}

/// A template value.
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Object(Arc<dyn Members>),
    List(Arc<[Value]>),
}

impl Value {
    /// Wrap any [`Members`] implementation.
    pub fn object(members: impl Members + 'static) -> Self {
        Value::Object(Arc::new(members))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Condition semantics used by `<if>`.
    ///
    /// | Value | Truthy when |
    /// |-------|-------------|
    /// | null | never |
    /// | bool | `true` |
    /// | int / float | non-zero |
    /// | string | non-empty and not `"false"` (any case) |
    /// | object / list | always |
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Int(n) => *n != 0,
            Value::Float(f) => *f != 0.0,
            Value::Str(s) => !s.is_empty() && !s.eq_ignore_ascii_case("false"),
            Value::Object(_) | Value::List(_) => true,
        }
    }

    /// Items of a list, or `None` for anything that cannot be iterated.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(&items[..]),
            _ => None,
        }
    }

    /// Resolve one path segment against this value.
    ///
    /// Objects look the name up through [`Members`]; lists answer `count`
    /// and `length`. Everything else has no members.
    pub fn member(&self, name: &str) -> Option<Value> {
        match self {
            Value::Object(obj) => obj.member(name),
            Value::List(items)
                if name.eq_ignore_ascii_case("count") || name.eq_ignore_ascii_case("length") =>
            {
                Some(Value::Int(items.len() as i64))
            }
            _ => None,
        }
    }

    /// Default textual form.
    pub fn render(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Int(n) => n.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Str(s) => s.clone(),
            Value::Object(obj) => obj.render(),
            Value::List(items) => items
                .iter()
                .map(Value::render)
                .collect::<Vec<_>>()
                .join(", "),
        }
    }

    /// Render with a format string such as `F2`, `N0`, `D4`, `X` or `0.00`.
    ///
    /// Only numbers honour a format; other values, and formats that are not
    /// understood, fall back to [`Value::render`].
    pub fn render_with(&self, spec: &str) -> String {
        let formatted = match self {
            Value::Int(n) => format::format_int(*n, spec),
            Value::Float(f) => format::format_float(*f, spec),
            _ => None,
        };
        formatted.unwrap_or_else(|| self.render())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

// ============================================================================
// CONVERSIONS
// ============================================================================

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

macro_rules! int_value {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(n: $t) -> Self {
                Value::Int(n as i64)
            }
        })*
    };
}

int_value!(i8, i16, i32, i64, u8, u16, u32);

// Values past `i64::MAX` saturate.
macro_rules! wide_int_value {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(n: $t) -> Self {
                Value::Int(i64::try_from(n).unwrap_or(i64::MAX))
            }
        })*
    };
}

wide_int_value!(u64, usize);

impl From<isize> for Value {
    fn from(n: isize) -> Self {
        Value::Int(n as i64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<f32> for Value {
    fn from(f: f32) -> Self {
        Value::Float(f as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items.into())
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::object(record)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        use serde_json::Value as Json;
        match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(b),
            Json::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Json::String(s) => Value::Str(s),
            Json::Array(items) => Value::List(items.into_iter().map(Value::from).collect()),
            Json::Object(map) => {
                let mut record = Record::new();
                for (key, value) in map {
                    record.insert(key, Value::from(value));
                }
                Value::object(record)
            }
        }
    }
}

// ============================================================================
// RECORD
// ============================================================================

/// An ordered set of named fields; the general-purpose [`Members`] type.
///
/// ```
/// use recibo::template::{Record, Value};
///
/// let item = Record::new().with("Name", "Coffee").with("Price", 3.5);
/// let value = Value::from(item);
/// assert_eq!(value.member("name"), Some(Value::from("Coffee")));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Record::insert`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Set a field, replacing any field whose name matches ignoring case.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        match self
            .fields
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(&name))
        {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
    }

}

impl Members for Record {
    fn member(&self, name: &str) -> Option<Value> {
        self.fields
            .iter()
            .find(|(field, _)| field.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.clone())
    }

    fn member_names(&self) -> Vec<String> {
        self.fields.iter().map(|(name, _)| name.clone()).collect()
    }
}
