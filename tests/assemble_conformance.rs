//! Array assembly conformance tests.
//!
//! Fragments are copied verbatim between brackets and commas; the result
//! is valid JSON exactly when every fragment is.

use json_canon::json::{canonical_string, parse, CanonOptions, JsonValue};
use json_canon::{assemble_array, assemble_iter, ArrayWriter};
use pretty_assertions::assert_eq;

// ============================================================================
// Identity Laws
// ============================================================================

#[test]
fn identity_empty() {
    let none: Vec<String> = Vec::new();
    assert_eq!(assemble_array(&none), "[]");
}

#[test]
fn identity_numbers() {
    assert_eq!(assemble_array(&["1", "2", "3"]), "[1,2,3]");
}

#[test]
fn identity_single_string() {
    assert_eq!(assemble_array(&["\"a\""]), "[\"a\"]");
}

// ============================================================================
// Composition With Canonicalization
// ============================================================================

#[test]
fn assembled_canonical_fragments_parse_back() {
    let rows = [
        parse(br#"{"id":2,"name":"b"}"#).unwrap(),
        parse(br#"{"name":"a","id":1}"#).unwrap(),
    ];
    let fragments: Vec<String> = rows.iter().map(|r| canonical_string(r).unwrap()).collect();
    let array = assemble_array(&fragments);

    assert_eq!(array, r#"[{"id":2,"name":"b"},{"id":1,"name":"a"}]"#);

    let parsed = parse(array.as_bytes()).unwrap();
    assert_eq!(parsed, JsonValue::Array(rows.to_vec()));
}

#[test]
fn assembled_array_of_canonical_fragments_is_canonical() {
    let fragments = [r#"{"a":1}"#, "[]", "null", r#""s""#];
    let array = assemble_array(&fragments);
    let parsed = parse(array.as_bytes()).unwrap();
    assert_eq!(canonical_string(&parsed).unwrap(), array);
}

#[test]
fn invalid_fragment_yields_invalid_array() {
    // No validation: garbage in, garbage out
    let array = assemble_array(&["1", "{oops", "3"]);
    assert_eq!(array, "[1,{oops,3]");
    assert!(parse(array.as_bytes()).is_err());
}

#[test]
fn empty_fragment_is_copied_as_is() {
    assert_eq!(assemble_array(&["1", "", "3"]), "[1,,3]");
}

// ============================================================================
// Iterator and Streaming Variants
// ============================================================================

#[test]
fn iter_variant_matches_slice_variant() {
    let fragments: Vec<String> = (1..=100).map(|i| i.to_string()).collect();
    let from_iter = assemble_iter(fragments.iter().map(String::as_str));
    assert_eq!(from_iter, assemble_array(&fragments));
}

#[test]
fn writer_matches_assemble_array() {
    let fragments = ["{\"k\":\"v\"}", "1.5", "true", "[null]"];

    let mut writer = ArrayWriter::new(Vec::new()).unwrap();
    for fragment in fragments {
        writer.push(fragment).unwrap();
    }
    let streamed = String::from_utf8(writer.finish().unwrap()).unwrap();

    assert_eq!(streamed, assemble_array(&fragments));
}

#[test]
fn writer_push_canonical_sorts_keys() {
    let options = CanonOptions::default();
    let mut writer = ArrayWriter::new(Vec::new()).unwrap();
    writer
        .push_canonical(&parse(br#"{"z":1,"a":{"c":2,"b":3}}"#).unwrap(), &options)
        .unwrap();
    writer.push_canonical(&JsonValue::Null, &options).unwrap();
    assert_eq!(writer.len(), 2);

    let bytes = writer.finish().unwrap();
    assert_eq!(
        String::from_utf8(bytes).unwrap(),
        r#"[{"a":{"b":3,"c":2},"z":1},null]"#
    );
}

#[test]
fn writer_to_file() {
    let file = tempfile::NamedTempFile::new().unwrap();
    let mut writer = ArrayWriter::new(file.reopen().unwrap()).unwrap();
    writer.extend(["1", "2"]).unwrap();
    writer.finish().unwrap();

    assert_eq!(std::fs::read_to_string(file.path()).unwrap(), "[1,2]");
}
