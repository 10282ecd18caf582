//! Key-order canonicalization.
//!
//! [`canonicalize`] rewrites a value so that every object, at every depth,
//! stores its members in ascending key order. Arrays keep their element
//! order and scalars are copied unchanged. The transform walks the tree
//! itself rather than relying on an encoder callback, so the result can be
//! handed to any order-preserving encoder ([`to_json_string`], `serde_json`)
//! and yields the same text.
//!
//! The walk uses an explicit heap stack instead of native recursion. Depth
//! is still bounded by [`Limits::max_nesting_depth`] so untrusted values
//! fail with `E111_NestingTooDeep` instead of consuming unbounded memory.
//!
//! # Example
//!
//! ```
//! use json_canon::json::{canonical_string, parse};
//!
//! let a = parse(br#"{"b":[{"y":1,"x":2}],"a":null}"#).unwrap();
//! let b = parse(br#"{"a":null,"b":[{"x":2,"y":1}]}"#).unwrap();
//! assert_eq!(canonical_string(&a).unwrap(), r#"{"a":null,"b":[{"x":2,"y":1}]}"#);
//! assert_eq!(canonical_string(&a).unwrap(), canonical_string(&b).unwrap());
//! ```

use std::cmp::Ordering;

use serde::Serialize;

use super::encode::to_json_string;
use super::limits::Limits;
use super::parser::parse_with_limits;
use super::types::{JsonMap, JsonValue};
use crate::error::{CanonResult, ErrorCode};

/// Ordering applied to object keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyOrder {
    /// Unicode code point order, identical to UTF-8 byte order and to
    /// `str::cmp`. Independent of locale.
    #[default]
    CodePoint,
    /// UTF-16 code unit order, as produced by a default JavaScript
    /// `Array.prototype.sort` over object keys.
    Utf16,
}

impl KeyOrder {
    /// Compare two keys under this ordering.
    pub fn compare(self, a: &str, b: &str) -> Ordering {
        match self {
            KeyOrder::CodePoint => a.cmp(b),
            KeyOrder::Utf16 => compare_keys_utf16(a, b),
        }
    }
}

/// Compare two strings by UTF-16 code units.
///
/// Differs from code point order only when one key has a supplementary
/// plane character where the other has a character in U+E000..=U+FFFF:
/// surrogates (0xD800..0xDFFF) sort below those code units.
pub fn compare_keys_utf16(a: &str, b: &str) -> Ordering {
    a.encode_utf16().cmp(b.encode_utf16())
}

/// Options controlling canonicalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CanonOptions {
    /// Depth limit; other fields only matter when parsing.
    pub limits: Limits,
    /// Object key ordering.
    pub key_order: KeyOrder,
}

impl CanonOptions {
    /// Options with the given limits.
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Options with the given key ordering.
    pub fn with_key_order(mut self, key_order: KeyOrder) -> Self {
        self.key_order = key_order;
        self
    }
}

/// A container being rebuilt, with the children still to visit.
enum Frame<'a> {
    Array {
        rest: std::slice::Iter<'a, JsonValue>,
        out: Vec<JsonValue>,
    },
    Object {
        rest: std::vec::IntoIter<(&'a String, &'a JsonValue)>,
        key: Option<&'a String>,
        out: JsonMap,
    },
}

impl<'a> Frame<'a> {
    /// Start rebuilding `value`; returns None for scalars.
    fn open(value: &'a JsonValue, order: KeyOrder) -> Option<Self> {
        match value {
            JsonValue::Array(items) => Some(Frame::Array {
                rest: items.iter(),
                out: Vec::with_capacity(items.len()),
            }),
            JsonValue::Object(map) => {
                let mut entries: Vec<(&String, &JsonValue)> = map.iter().collect();
                // Keys are unique, so an unstable sort is deterministic
                entries.sort_unstable_by(|a, b| order.compare(a.0, b.0));
                Some(Frame::Object {
                    rest: entries.into_iter(),
                    key: None,
                    out: JsonMap::with_capacity(map.len()),
                })
            }
            _ => None,
        }
    }

    fn next_child(&mut self) -> Option<&'a JsonValue> {
        match self {
            Frame::Array { rest, .. } => rest.next(),
            Frame::Object { rest, key, .. } => rest.next().map(|(k, v)| {
                *key = Some(k);
                v
            }),
        }
    }

    fn accept(&mut self, child: JsonValue) {
        match self {
            Frame::Array { out, .. } => out.push(child),
            Frame::Object { key, out, .. } => {
                if let Some(k) = key.take() {
                    out.insert(k.clone(), child);
                }
            }
        }
    }

    fn finish(self) -> JsonValue {
        match self {
            Frame::Array { out, .. } => JsonValue::Array(out),
            Frame::Object { out, .. } => JsonValue::Object(out),
        }
    }
}

/// Canonicalize a value with default options.
///
/// Returns a fresh value; the input is not modified.
pub fn canonicalize(value: &JsonValue) -> CanonResult<JsonValue> {
    canonicalize_with(value, &CanonOptions::default())
}

/// Canonicalize a value with explicit options.
pub fn canonicalize_with(value: &JsonValue, options: &CanonOptions) -> CanonResult<JsonValue> {
    let mut stack: Vec<Frame<'_>> = Vec::new();
    let mut next = Some(value);
    let mut nodes: u64 = 0;
    let mut deepest: usize = 0;

    loop {
        // Descend: containers become frames, scalars are finished at once
        let mut done = match next.take() {
            Some(node) => {
                nodes += 1;
                match Frame::open(node, options.key_order) {
                    Some(frame) => {
                        options.limits.check_depth(stack.len() as u64 + 1)?;
                        stack.push(frame);
                        deepest = deepest.max(stack.len());
                        None
                    }
                    None => Some(node.clone()),
                }
            }
            None => None,
        };

        // Ascend: hand finished values to parents until one has another child
        loop {
            let Some(top) = stack.last_mut() else {
                tracing::trace!(nodes, depth = deepest, "canonicalized value");
                return done.ok_or(ErrorCode::E999_InternalError);
            };
            if let Some(child) = done.take() {
                top.accept(child);
            }
            if let Some(child) = top.next_child() {
                next = Some(child);
                break;
            }
            done = stack.pop().map(Frame::finish);
        }
    }
}

/// Returns true if every object in `value` already stores its keys in
/// strictly ascending `order`.
pub fn is_canonical_value(value: &JsonValue, order: KeyOrder) -> bool {
    let mut pending = vec![value];
    while let Some(node) = pending.pop() {
        match node {
            JsonValue::Array(items) => pending.extend(items.iter()),
            JsonValue::Object(map) => {
                let sorted = map
                    .keys()
                    .zip(map.keys().skip(1))
                    .all(|(a, b)| order.compare(a, b) == Ordering::Less);
                if !sorted {
                    return false;
                }
                pending.extend(map.values());
            }
            _ => {}
        }
    }
    true
}

/// Canonicalize and encode as compact JSON text.
pub fn canonical_string(value: &JsonValue) -> CanonResult<String> {
    canonical_string_with(value, &CanonOptions::default())
}

/// Canonicalize with explicit options and encode as compact JSON text.
pub fn canonical_string_with(value: &JsonValue, options: &CanonOptions) -> CanonResult<String> {
    let canonical = canonicalize_with(value, options)?;
    Ok(to_json_string(&canonical))
}

/// Canonical text for any `Serialize` value.
///
/// The value is first converted with `serde_json::to_value`, which maps
/// non-finite floats to `null`; use [`JsonValue::from_f64`] to reject them
/// instead.
pub fn to_canonical_string<T>(value: &T) -> CanonResult<String>
where
    T: Serialize + ?Sized,
{
    let json = serde_json::to_value(value)
        .map_err(|e| ErrorCode::E902_SerializationFailed(e.to_string()))?;
    canonical_string(&JsonValue::from(json))
}

/// Returns true if `input` is byte-for-byte the canonical text of `value`.
pub fn is_canonical(input: &str, value: &JsonValue) -> CanonResult<bool> {
    Ok(canonical_string(value)? == input)
}

/// Parse `input` and check that it is already canonical text.
pub fn is_canonical_text(input: &[u8], options: &CanonOptions) -> CanonResult<bool> {
    let value = parse_with_limits(input, options.limits)?;
    Ok(canonical_string_with(&value, options)?.as_bytes() == input)
}
