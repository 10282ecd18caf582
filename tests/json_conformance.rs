//! JSON subsystem conformance tests.
//!
//! Parsing must be strict (RFC 8259 grammar, duplicate keys rejected after
//! unescaping, finite numbers only) and must keep document order, so that
//! naive serialization of a parsed value reproduces the member order of
//! the input text.

use json_canon::json::{parse, parse_with_limits, to_json_string, JsonMap, JsonValue, Limits};

// ============================================================================
// UTF-8 Validation
// ============================================================================

#[test]
fn utf8_valid_accepted() {
    let result = parse(br#""hello""#);
    assert!(result.is_ok(), "Valid UTF-8 should be accepted");
}

#[test]
fn utf8_invalid_rejected() {
    let invalid = vec![b'"', 0xFF, 0xFE, b'"'];
    let result = parse(&invalid);
    assert_eq!(result.unwrap_err().code(), 105); // E105_InvalidUTF8
}

#[test]
fn utf8_overlong_encoding_rejected() {
    // Overlong encoding of '/' (0x2F) as C0 AF
    let overlong = vec![b'"', 0xC0, 0xAF, b'"'];
    assert_eq!(parse(&overlong).unwrap_err().code(), 105);
}

#[test]
fn utf8_multibyte_text_accepted() {
    let value = parse("\"caf\u{e9} \u{1F600}\"".as_bytes()).unwrap();
    assert_eq!(value.as_str(), Some("caf\u{e9} \u{1F600}"));
}

// ============================================================================
// Surrogates
// ============================================================================

#[test]
fn surrogate_unpaired_high_rejected() {
    let result = parse(br#""\uD800""#);
    assert_eq!(result.unwrap_err().code(), 105);
}

#[test]
fn surrogate_unpaired_low_rejected() {
    let result = parse(br#""\uDC00""#);
    assert_eq!(result.unwrap_err().code(), 105);
}

#[test]
fn surrogate_valid_pair_accepted() {
    // U+1F600
    let result = parse(br#""\uD83D\uDE00""#).unwrap();
    assert_eq!(result.as_str(), Some("\u{1F600}"));
}

#[test]
fn surrogate_high_followed_by_non_surrogate_rejected() {
    let result = parse(br#""\uD800\u0041""#);
    assert!(result.is_err());
}

// ============================================================================
// Duplicate Keys After Unescaping
// ============================================================================

#[test]
fn duplicate_keys_rejected() {
    let result = parse(br#"{"a": 1, "a": 2}"#);
    assert_eq!(result.unwrap_err().code(), 101); // E101_DuplicateKey
}

#[test]
fn duplicate_keys_after_unescape_rejected() {
    // "a" and "\u0061" are the same key after unescaping
    let result = parse(br#"{"a": 1, "\u0061": 2}"#);
    assert_eq!(result.unwrap_err().code(), 101);
}

#[test]
fn duplicate_keys_with_escapes_rejected() {
    let result = parse(br#"{"a\nb": 1, "a\nb": 2}"#);
    assert_eq!(result.unwrap_err().code(), 101);
}

#[test]
fn duplicate_keys_in_nested_object_rejected() {
    let result = parse(br#"{"outer": {"k": 1, "k": 2}}"#);
    assert_eq!(result.unwrap_err().code(), 101);
}

#[test]
fn same_key_in_sibling_objects_accepted() {
    let result = parse(br#"[{"a": 1}, {"a": 2}]"#);
    assert!(result.is_ok());
}

// ============================================================================
// Numbers
// ============================================================================

#[test]
fn number_integer_accepted() {
    assert_eq!(parse(b"42").unwrap(), JsonValue::from(42));
    assert_eq!(parse(b"-42").unwrap(), JsonValue::from(-42));
    assert_eq!(parse(b"0").unwrap(), JsonValue::from(0));
}

#[test]
fn number_fraction_and_exponent_accepted() {
    assert_eq!(parse(b"3.25").unwrap().as_f64(), Some(3.25));
    assert_eq!(parse(b"1e3").unwrap().as_f64(), Some(1000.0));
    assert_eq!(parse(b"-2.5E-1").unwrap().as_f64(), Some(-0.25));
}

#[test]
fn number_large_integers_accepted() {
    assert_eq!(
        to_json_string(&parse(b"9007199254740993").unwrap()),
        "9007199254740993"
    );
    assert_eq!(
        to_json_string(&parse(b"-9223372036854775808").unwrap()),
        "-9223372036854775808"
    );
}

#[test]
fn number_overflowing_double_rejected() {
    assert_eq!(parse(b"1e400").unwrap_err().code(), 109); // E109_NonFiniteNumber
    assert_eq!(parse(b"-1e400").unwrap_err().code(), 109);
}

#[test]
fn number_leading_zero_rejected() {
    assert_eq!(parse(b"01").unwrap_err().code(), 100);
}

#[test]
fn number_malformed_rejected() {
    for input in ["1.", ".5", "-", "1e", "+1", "0x10"] {
        assert!(parse(input.as_bytes()).is_err(), "{input} should be rejected");
    }
}

#[test]
fn number_nan_and_infinity_literals_rejected() {
    for input in ["NaN", "Infinity", "-Infinity"] {
        assert!(parse(input.as_bytes()).is_err(), "{input} should be rejected");
    }
}

// ============================================================================
// Document Order
// ============================================================================

#[test]
fn order_object_members_keep_document_order() {
    let value = parse(br#"{"c": 1, "a": 2, "b": 3}"#).unwrap();
    assert_eq!(value.keys(), vec!["c", "a", "b"]);
    assert_eq!(to_json_string(&value), r#"{"c":1,"a":2,"b":3}"#);
}

#[test]
fn order_equality_ignores_member_order() {
    let a = parse(br#"{"x": 1, "y": [1, 2]}"#).unwrap();
    let b = parse(br#"{"y": [1, 2], "x": 1}"#).unwrap();
    assert_eq!(a, b);
    assert_ne!(to_json_string(&a), to_json_string(&b));
}

#[test]
fn order_array_order_is_significant() {
    let a = parse(b"[1, 2]").unwrap();
    let b = parse(b"[2, 1]").unwrap();
    assert_ne!(a, b);
}

// ============================================================================
// DoS Protection Limits
// ============================================================================

#[test]
fn limit_e110_input_too_large() {
    let mut limits = Limits::standard();
    limits.max_input_size = 10;
    let result = parse_with_limits(b"this input is too large for the limit", limits);
    assert_eq!(result.unwrap_err().code(), 110); // E110_InputTooLarge
}

#[test]
fn limit_e111_nesting_too_deep() {
    let limits = Limits::standard().with_max_depth(2);
    let result = parse_with_limits(b"[[[1]]]", limits);
    assert_eq!(result.unwrap_err().code(), 111); // E111_NestingTooDeep
    assert!(parse_with_limits(b"[[1]]", limits).is_ok());
}

#[test]
fn limit_e111_default_depth() {
    let deep = format!("{}{}", "[".repeat(129), "]".repeat(129));
    assert_eq!(parse(deep.as_bytes()).unwrap_err().code(), 111);

    let ok = format!("{}{}", "[".repeat(128), "]".repeat(128));
    assert!(parse(ok.as_bytes()).is_ok());
}

#[test]
fn limit_e111_raised_limit_parses_very_deep_input() {
    let depth = 250_000;
    let mut text = String::new();
    for _ in 0..depth {
        text.push_str(r#"[{"a":"#);
    }
    text.push('1');
    for _ in 0..depth {
        text.push_str("}]");
    }

    let limits = Limits::lenient().with_max_depth(2 * depth as u64);
    let value = parse_with_limits(text.as_bytes(), limits).unwrap();
    assert!(to_json_string(&value) == text, "deep input did not round-trip");

    let tighter = limits.with_max_depth(2 * depth as u64 - 1);
    assert_eq!(parse_with_limits(text.as_bytes(), tighter).unwrap_err().code(), 111);
}

#[test]
fn limit_e112_string_too_long() {
    let mut limits = Limits::standard();
    limits.max_string_length = 5;
    let result = parse_with_limits(br#""this string is too long""#, limits);
    assert_eq!(result.unwrap_err().code(), 112); // E112_StringTooLong
}

#[test]
fn limit_e112_counts_escaped_and_raw_text_together() {
    let mut limits = Limits::standard();
    limits.max_string_length = 5;
    assert_eq!(
        parse_with_limits(br#""abc\ndefgh""#, limits).unwrap_err().code(),
        112
    );
    assert!(parse_with_limits(br#""ab\nde""#, limits).is_ok());
}

#[test]
fn limit_e113_too_many_fields() {
    let mut limits = Limits::standard();
    limits.max_object_fields = 2;
    let result = parse_with_limits(br#"{"a": 1, "b": 2, "c": 3}"#, limits);
    assert_eq!(result.unwrap_err().code(), 113); // E113_TooManyFields
}

#[test]
fn limit_e114_array_too_long() {
    let mut limits = Limits::standard();
    limits.max_array_length = 2;
    let result = parse_with_limits(b"[1, 2, 3]", limits);
    assert_eq!(result.unwrap_err().code(), 114); // E114_ArrayTooLong
}

#[test]
fn limit_e115_non_ascii_character() {
    let mut limits = Limits::standard();
    limits.ascii_only = true;
    let result = parse_with_limits(br#""\u00E9""#, limits);
    assert_eq!(result.unwrap_err().code(), 115); // E115_NonASCIICharacter
}

#[test]
fn limit_non_ascii_allowed_by_default() {
    let result = parse(br#""\u00E9""#);
    assert_eq!(result.unwrap().as_str(), Some("\u{e9}"));
}

// ============================================================================
// Edge Cases
// ============================================================================

#[test]
fn edge_empty_object() {
    assert_eq!(parse(b"{}").unwrap(), JsonValue::Object(JsonMap::new()));
}

#[test]
fn edge_empty_array() {
    assert_eq!(parse(b"[]").unwrap(), JsonValue::Array(vec![]));
}

#[test]
fn edge_empty_string() {
    assert_eq!(parse(br#""""#).unwrap(), JsonValue::String(String::new()));
}

#[test]
fn edge_literals() {
    assert_eq!(parse(b"null").unwrap(), JsonValue::Null);
    assert_eq!(parse(b"true").unwrap(), JsonValue::Bool(true));
    assert_eq!(parse(b"false").unwrap(), JsonValue::Bool(false));
}

#[test]
fn edge_surrounding_whitespace_accepted() {
    assert_eq!(parse(b" \t\r\n 7 \n").unwrap(), JsonValue::from(7));
}

#[test]
fn edge_empty_input_rejected() {
    assert_eq!(parse(b"").unwrap_err().code(), 100);
    assert_eq!(parse(b"   ").unwrap_err().code(), 100);
}

#[test]
fn edge_trailing_content_rejected() {
    assert!(parse(b"null extra").is_err());
    assert!(parse(b"{} {}").is_err());
}

#[test]
fn edge_trailing_comma_rejected() {
    assert!(parse(b"[1, 2,]").is_err());
    assert!(parse(br#"{"a": 1,}"#).is_err());
}

#[test]
fn edge_control_characters_in_string_rejected() {
    // literal tab, not \t
    let input = b"\"a\tb\"";
    assert_eq!(parse(input).unwrap_err().code(), 100);
}

#[test]
fn edge_all_escape_sequences() {
    let result = parse(br#""\\\/\b\f\n\r\t\"""#).unwrap();
    assert_eq!(result.as_str().unwrap(), "\\/\x08\x0C\n\r\t\"");
}

#[test]
fn edge_non_string_key_rejected() {
    assert!(parse(b"{1: 2}").is_err());
}
