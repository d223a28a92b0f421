//! # Template Context
//!
//! Variable bindings for one compilation.
//!
//! Keys are case-insensitive. A path such as `Order.Customer.Name` is first
//! looked up as a literal key (flattened bindings are stored that way);
//! otherwise the longest bound prefix is looked up and each remaining
//! segment is resolved as a member of the value before it.
//!
//! Loop scopes are snapshots: [`TemplateContext::push_scope`] saves every
//! binding and [`TemplateContext::pop_scope`] restores exactly that state.

use std::collections::HashMap;

use super::value::{Members, Value};
use crate::error::{ReciboError, Result};

/// Case-insensitive variable store with a scope stack.
///
/// One context serves one compilation at a time; the compiler borrows it
/// mutably for the whole run.
#[derive(Debug, Clone, Default)]
pub struct TemplateContext {
    /// lowercased key → (key as bound, value)
    vars: HashMap<String, (String, Value)>,
    scopes: Vec<HashMap<String, (String, Value)>>,
}

impl TemplateContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context whose top-level keys are the members of `model`.
    pub fn from_object(model: &dyn Members) -> Self {
        let mut ctx = Self::new();
        ctx.add_object(model, None);
        ctx
    }

    /// Context built from a JSON document.
    ///
    /// An object's fields become top-level keys; any other JSON value is
    /// bound under `model`.
    pub fn from_json(json: serde_json::Value) -> Self {
        let mut ctx = Self::new();
        match Value::from(json) {
            Value::Object(obj) => ctx.add_object(obj.as_ref(), None),
            other => ctx.insert("model", other),
        }
        ctx
    }

    /// Bind `key` to `value`, replacing any binding that differs only in case.
    pub fn add(&mut self, key: &str, value: impl Into<Value>) -> Result<()> {
        if key.trim().is_empty() {
            return Err(ReciboError::Template(
                "key cannot be empty or whitespace".into(),
            ));
        }
        self.insert(key, value.into());
        Ok(())
    }

    /// Bind every pair in `vars`.
    pub fn add_range<K, V, I>(&mut self, vars: I) -> Result<()>
    where
        K: AsRef<str>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        for (key, value) in vars {
            self.add(key.as_ref(), value)?;
        }
        Ok(())
    }

    /// Flatten the members of `model` into `name` or `prefix.name` keys.
    ///
    /// Only one level is flattened; deeper paths resolve lazily through
    /// [`Members::member`] at lookup time.
    pub fn add_object(&mut self, model: &dyn Members, prefix: Option<&str>) {
        for name in model.member_names() {
            let value = model.member(&name).unwrap_or_default();
            let key = match prefix {
                Some(p) if !p.is_empty() => format!("{}.{}", p, name),
                _ => name,
            };
            self.insert(&key, value);
        }
    }

    fn insert(&mut self, key: &str, value: Value) {
        self.vars
            .insert(key.to_lowercase(), (key.to_string(), value));
    }

    /// Resolve a key or dotted path.
    ///
    /// The whole path is tried as a literal key first. Otherwise the root is
    /// the longest dotted prefix that is bound, not just the first segment,
    /// so keys flattened by [`add_object`](Self::add_object) with a prefix
    /// (`Receipt.Order`) can be walked into (`Receipt.Order.Total`). For
    /// paths whose first segment is the only bound prefix both readings
    /// agree.
    ///
    /// Returns `None` when the key is unbound or any member along the path is
    /// missing or null. A key bound to null yields `Some(Value::Null)`.
    ///
    /// ```
    /// use recibo::template::{Record, TemplateContext, Value};
    ///
    /// let mut ctx = TemplateContext::new();
    /// ctx.add("Order", Record::new().with("Total", 9.5)).unwrap();
    /// assert_eq!(ctx.get_value("order.total"), Some(Value::Float(9.5)));
    /// assert_eq!(ctx.get_value("order.missing"), None);
    /// ```
    pub fn get_value(&self, path: &str) -> Option<Value> {
        if let Some((_, value)) = self.vars.get(&path.to_lowercase()) {
            return Some(value.clone());
        }
        if !path.contains('.') {
            return None;
        }

        // longest bound prefix first, so `prefix.key` bindings nest too
        let segments: Vec<&str> = path.split('.').collect();
        for cut in (1..segments.len()).rev() {
            let head = segments[..cut].join(".").to_lowercase();
            if let Some((_, value)) = self.vars.get(&head) {
                return resolve_members(value.clone(), &segments[cut..]);
            }
        }
        None
    }

    /// Whether `path` resolves to anything, null included.
    pub fn contains(&self, path: &str) -> bool {
        self.get_value(path).is_some()
    }

    /// Replace every `${path}` and `${path:format}` in `text`.
    ///
    /// Unresolved paths become the empty string. A format only applies to
    /// numbers; for other values it is ignored. `${` without a closing `}`
    /// and the empty `${}` are left as written.
    ///
    /// ```
    /// use recibo::template::TemplateContext;
    ///
    /// let mut ctx = TemplateContext::new();
    /// ctx.add("Total", 3.5).unwrap();
    /// assert_eq!(ctx.substitute("Total: $${Total:F2}${Nope}"), "Total: $3.50");
    /// ```
    pub fn substitute(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut rest = text;

        while let Some(start) = rest.find("${") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            match after.find('}') {
                Some(end) if end > 0 => {
                    out.push_str(&self.render_token(&after[..end]));
                    rest = &after[end + 1..];
                }
                _ => {
                    out.push_str("${");
                    rest = after;
                }
            }
        }
        out.push_str(rest);
        out
    }

    fn render_token(&self, token: &str) -> String {
        let token = token.trim();
        let (path, format) = match token.split_once(':') {
            Some((path, format)) => (path.trim(), Some(format.trim())),
            None => (token, None),
        };
        match (self.get_value(path), format) {
            (None, _) => String::new(),
            (Some(value), Some(format)) => value.render_with(format),
            (Some(value), None) => value.render(),
        }
    }

    /// Save the current bindings.
    pub fn push_scope(&mut self) {
        self.scopes.push(self.vars.clone());
    }

    /// Restore the bindings saved by the matching [`push_scope`](Self::push_scope).
    pub fn pop_scope(&mut self) -> Result<()> {
        match self.scopes.pop() {
            Some(saved) => {
                self.vars = saved;
                Ok(())
            }
            None => Err(ReciboError::Template("no scope to pop".into())),
        }
    }

    /// Number of scopes currently pushed.
    pub fn scope_depth(&self) -> usize {
        self.scopes.len()
    }

    /// Bind a loop variable in the current scope.
    ///
    /// Fails unless a scope has been pushed, so the binding is always
    /// discarded by the matching pop.
    pub fn set_loop_variable(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        if self.scopes.is_empty() {
            return Err(ReciboError::Template(format!(
                "loop variable '{}' set outside a scope",
                name
            )));
        }
        self.add(name, value)
    }

    /// Keys as they were bound, sorted.
    #[cfg(test)]
    fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.vars.values().map(|(key, _)| key.as_str()).collect();
        keys.sort_unstable();
        keys
    }
}

fn resolve_members(mut current: Value, segments: &[&str]) -> Option<Value> {
    for segment in segments {
        if current.is_null() {
            return None;
        }
        current = current.member(segment)?;
    }
    Some(current)
}
