//! json-canon - deterministic JSON canonicalization and array assembly.
//!
//! Two values that are structurally equal always produce the same canonical
//! text, no matter how their object keys were inserted. Canonical text is
//! the stable input for content hashing, cache keys and snapshot diffs.
//!
//! # Architecture
//!
//! - [`json`] - JSON values, strict parsing, encoding and canonicalization
//! - [`assemble`] - Joining pre-serialized fragments into an array literal
//! - [`conformance`] - Test-vector corpus runner
//! - [`error`] - Error codes shared by the library and the CLI
//!
//! # Example
//!
//! ```
//! use json_canon::{canonical_string, JsonValue};
//!
//! let a = JsonValue::object([("b", JsonValue::from(1)), ("a", JsonValue::from(2))]);
//! let b = JsonValue::object([("a", JsonValue::from(2)), ("b", JsonValue::from(1))]);
//!
//! assert_eq!(canonical_string(&a).unwrap(), "{\"a\":2,\"b\":1}");
//! assert_eq!(canonical_string(&a).unwrap(), canonical_string(&b).unwrap());
//! ```

// Library code must avoid unwrap/expect/panic.
// Tests are checked separately with `cargo test`.
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(missing_docs)]

pub mod assemble;
pub mod conformance;
pub mod error;
pub mod json;

// Re-export commonly used types
pub use assemble::{assemble_array, assemble_iter, ArrayWriter};
pub use error::{CanonResult, ErrorCode};
pub use json::{
    canonical_string, canonical_string_with, canonicalize, canonicalize_with, is_canonical,
    is_canonical_text, parse, parse_with_limits, to_canonical_string, to_json_string,
    CanonOptions, JsonMap, JsonValue, KeyOrder, Limits,
};
