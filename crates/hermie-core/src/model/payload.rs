// ── Cached response payloads ──
//
// Controller responses are open field-sets: a few known keys plus whatever
// the server chooses to echo. `Payload` keeps the parsed JSON verbatim and
// exposes explicit lookups that map "absent" to a typed sentinel.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Sentinel returned by text accessors when nothing is cached.
pub const EMPTY: &str = "";

/// One parsed JSON response, stored as received.
#[derive(Debug, Clone, PartialEq)]
pub struct Payload(Value);

impl Payload {
    /// The `{}` payload.
    pub fn empty() -> Self {
        Self(Value::Object(Map::new()))
    }

    /// Field value, treating JSON `null` as absent.
    ///
    /// Non-object payloads have no fields.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field).filter(|v| !v.is_null())
    }

    /// Returns `true` if `field` is present and non-null.
    pub fn has(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    /// Field rendered as text, or [`EMPTY`].
    pub fn text(&self, field: &str) -> String {
        self.get(field).map(render_text).unwrap_or_default()
    }

    /// Numeric field. Numeric strings are accepted.
    pub fn number(&self, field: &str) -> Option<f64> {
        match self.get(field)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Boolean-ish field: `true`, a non-zero number, or one of
    /// `true`/`on`/`yes`/`1` as a string. Anything else is `false`.
    pub fn flag(&self, field: &str) -> bool {
        self.get(field).is_some_and(is_on)
    }

    /// Loose presence test: any non-null value other than `false`, `0`,
    /// or the empty string counts.
    pub fn truthy(&self, field: &str) -> bool {
        self.get(field).is_some_and(is_truthy)
    }

    /// Serialized JSON text.
    pub fn to_json(&self) -> String {
        self.0.to_string()
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Deserialize into a typed view. `None` if the shape doesn't fit.
    pub fn view<T: DeserializeOwned>(&self) -> Option<T> {
        serde_json::from_value(self.0.clone()).ok()
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Render a JSON value the way the host displays it: strings unquoted,
/// scalars via their JSON text, containers as compact JSON.
pub(crate) fn render_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub(crate) fn is_on(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "true" | "on" | "yes" | "1"
        ),
        _ => false,
    }
}

pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
