//! JSON value types.
//!
//! [`JsonValue`] is a closed tagged union over the six JSON kinds. Objects
//! are stored in an [`IndexMap`], so iteration follows insertion order while
//! equality ignores it: two objects with the same members compare equal no
//! matter how their keys were inserted. Key order only becomes observable
//! when a value is iterated or encoded as text.
//!
//! Numbers are [`serde_json::Number`], which cannot represent NaN or the
//! infinities, so every `JsonValue` is JSON-representable by construction.

use std::mem;

use indexmap::IndexMap;
use serde_json::Number;

use crate::error::{CanonResult, ErrorCode};

/// Ordered mapping used for JSON objects. Iteration order is insertion order.
pub type JsonMap = IndexMap<String, JsonValue>;

/// A JSON value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum JsonValue {
    /// JSON null literal
    #[default]
    Null,
    /// JSON boolean (true/false)
    Bool(bool),
    /// JSON number (always finite)
    Number(Number),
    /// JSON string
    String(String),
    /// JSON array of values
    Array(Vec<JsonValue>),
    /// JSON object; member order is insertion order
    Object(JsonMap),
}

impl JsonValue {
    /// Build a number from an `f64`, rejecting NaN and the infinities.
    pub fn from_f64(value: f64) -> CanonResult<Self> {
        Number::from_f64(value)
            .map(JsonValue::Number)
            .ok_or(ErrorCode::E109_NonFiniteNumber)
    }

    /// Build an object from `(key, value)` pairs, keeping their order.
    ///
    /// A repeated key keeps its first position and takes the last value.
    pub fn object<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, JsonValue)>,
    {
        JsonValue::Object(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Returns true if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, JsonValue::Null)
    }

    /// Returns true if this is a boolean value.
    pub fn is_bool(&self) -> bool {
        matches!(self, JsonValue::Bool(_))
    }

    /// Returns true if this is a number value.
    pub fn is_number(&self) -> bool {
        matches!(self, JsonValue::Number(_))
    }

    /// Returns true if this is a string value.
    pub fn is_string(&self) -> bool {
        matches!(self, JsonValue::String(_))
    }

    /// Returns true if this is an array value.
    pub fn is_array(&self) -> bool {
        matches!(self, JsonValue::Array(_))
    }

    /// Returns true if this is an object value.
    pub fn is_object(&self) -> bool {
        matches!(self, JsonValue::Object(_))
    }

    /// Returns true for arrays and objects.
    pub fn is_container(&self) -> bool {
        matches!(self, JsonValue::Array(_) | JsonValue::Object(_))
    }

    /// Returns the boolean value if this is a Bool, None otherwise.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            JsonValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the number if this is a Number, None otherwise.
    pub fn as_number(&self) -> Option<&Number> {
        match self {
            JsonValue::Number(n) => Some(n),
            _ => None,
        }
    }

    /// Returns the value as i64 if it is an integer that fits.
    pub fn as_i64(&self) -> Option<i64> {
        self.as_number().and_then(Number::as_i64)
    }

    /// Returns the value as f64 if this is a Number.
    pub fn as_f64(&self) -> Option<f64> {
        self.as_number().and_then(Number::as_f64)
    }

    /// Returns a reference to the string if this is a String, None otherwise.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            JsonValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns a reference to the array if this is an Array, None otherwise.
    pub fn as_array(&self) -> Option<&Vec<JsonValue>> {
        match self {
            JsonValue::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Returns a reference to the object if this is an Object, None otherwise.
    pub fn as_object(&self) -> Option<&JsonMap> {
        match self {
            JsonValue::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Get a value from an object by key.
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        match self {
            JsonValue::Object(map) => map.get(key),
            _ => None,
        }
    }

    /// Get a value from an array by index.
    pub fn get_index(&self, index: usize) -> Option<&JsonValue> {
        match self {
            JsonValue::Array(arr) => arr.get(index),
            _ => None,
        }
    }

    /// Object keys in stored order; empty for non-objects.
    pub fn keys(&self) -> Vec<&str> {
        match self {
            JsonValue::Object(map) => map.keys().map(String::as_str).collect(),
            _ => Vec::new(),
        }
    }

    /// Returns the type name as a string for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            JsonValue::Null => "null",
            JsonValue::Bool(_) => "boolean",
            JsonValue::Number(_) => "number",
            JsonValue::String(_) => "string",
            JsonValue::Array(_) => "array",
            JsonValue::Object(_) => "object",
        }
    }
}

impl From<bool> for JsonValue {
    fn from(value: bool) -> Self {
        JsonValue::Bool(value)
    }
}

impl From<i64> for JsonValue {
    fn from(value: i64) -> Self {
        JsonValue::Number(value.into())
    }
}

impl From<i32> for JsonValue {
    fn from(value: i32) -> Self {
        JsonValue::Number(value.into())
    }
}

impl From<u64> for JsonValue {
    fn from(value: u64) -> Self {
        JsonValue::Number(value.into())
    }
}

impl From<Number> for JsonValue {
    fn from(value: Number) -> Self {
        JsonValue::Number(value)
    }
}

impl From<&str> for JsonValue {
    fn from(value: &str) -> Self {
        JsonValue::String(value.to_string())
    }
}

impl From<String> for JsonValue {
    fn from(value: String) -> Self {
        JsonValue::String(value)
    }
}

impl From<Vec<JsonValue>> for JsonValue {
    fn from(value: Vec<JsonValue>) -> Self {
        JsonValue::Array(value)
    }
}

impl From<JsonMap> for JsonValue {
    fn from(value: JsonMap) -> Self {
        JsonValue::Object(value)
    }
}

impl From<serde_json::Value> for JsonValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => JsonValue::Null,
            serde_json::Value::Bool(b) => JsonValue::Bool(b),
            serde_json::Value::Number(n) => JsonValue::Number(n),
            serde_json::Value::String(s) => JsonValue::String(s),
            serde_json::Value::Array(items) => {
                JsonValue::Array(items.into_iter().map(JsonValue::from).collect())
            }
            serde_json::Value::Object(map) => JsonValue::Object(
                map.into_iter()
                    .map(|(k, v)| (k, JsonValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<JsonValue> for serde_json::Value {
    fn from(mut value: JsonValue) -> Self {
        // JsonValue implements Drop, so payloads are taken rather than moved out
        match &mut value {
            JsonValue::Null => serde_json::Value::Null,
            JsonValue::Bool(b) => serde_json::Value::Bool(*b),
            JsonValue::Number(n) => serde_json::Value::Number(n.clone()),
            JsonValue::String(s) => serde_json::Value::String(mem::take(s)),
            JsonValue::Array(items) => serde_json::Value::Array(
                mem::take(items)
                    .into_iter()
                    .map(serde_json::Value::from)
                    .collect(),
            ),
            JsonValue::Object(map) => serde_json::Value::Object(
                mem::take(map)
                    .into_iter()
                    .map(|(k, v)| (k, serde_json::Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl Drop for JsonValue {
    /// Tears nested containers down from a heap list, so dropping a deeply
    /// nested value never recurses through the compiler's drop glue.
    fn drop(&mut self) {
        let mut pending = match self {
            JsonValue::Array(items) if items.iter().any(JsonValue::is_container) => {
                mem::take(items)
            }
            JsonValue::Object(map) if map.values().any(JsonValue::is_container) => {
                mem::take(map).into_values().collect()
            }
            _ => return,
        };

        while let Some(mut value) = pending.pop() {
            match &mut value {
                JsonValue::Array(items) => pending.append(items),
                JsonValue::Object(map) => pending.extend(mem::take(map).into_values()),
                _ => {}
            }
            // `value` now has no children and drops without recursing
        }
    }
}
