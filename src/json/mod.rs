//! JSON values, parsing, encoding and canonicalization.
//!
//! # Architecture
//!
//! - [`types`] - [`JsonValue`] and the insertion-ordered [`JsonMap`]
//! - [`limits`] - DoS protection limits
//! - [`lexer`] - Tokenizer with UTF-8/escape handling
//! - [`parser`] - Order-preserving recursive descent parser
//! - [`encode`] - Compact text encoder that keeps stored member order
//! - [`jcs`] - Key-order canonicalization
//!
//! `JsonValue` also implements serde's `Serialize` and `Deserialize`.
//!
//! # Example
//!
//! ```
//! use json_canon::json::{canonicalize, parse, to_json_string};
//!
//! let value = parse(b"{\"b\":2,\"a\":1}").unwrap();
//! assert_eq!(to_json_string(&value), "{\"b\":2,\"a\":1}");
//!
//! let canonical = canonicalize(&value).unwrap();
//! assert_eq!(to_json_string(&canonical), "{\"a\":1,\"b\":2}");
//! ```

pub mod encode;
pub mod jcs;
pub mod lexer;
pub mod limits;
pub mod parser;
mod serde_impl;
pub mod types;

pub use encode::{to_json_string, write_json};
pub use jcs::{
    canonical_string, canonical_string_with, canonicalize, canonicalize_with,
    compare_keys_utf16, is_canonical, is_canonical_text, is_canonical_value,
    to_canonical_string, CanonOptions, KeyOrder,
};
pub use limits::Limits;
pub use parser::{parse, parse_with_limits};
pub use types::{JsonMap, JsonValue};
