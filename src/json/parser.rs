//! Strict JSON parser.
//!
//! Iterative descent over [`Lexer`] tokens: open containers live on a heap
//! stack, so input nesting never grows the call stack and is bounded only
//! by `Limits::max_nesting_depth`. Object members are stored in document
//! order, which is what lets callers observe the difference between naive
//! and canonical serialization of the same text.

use std::mem;
use std::str::FromStr;

use serde_json::Number;

use super::lexer::{Lexer, Token};
use super::limits::Limits;
use super::types::{JsonMap, JsonValue};
use crate::error::{CanonResult, ErrorCode};

/// A container whose closing token has not been read yet.
enum Open {
    Array(Vec<JsonValue>),
    /// `key` names the member whose value is being parsed.
    Object { map: JsonMap, key: String },
}

impl Open {
    fn finish(self) -> JsonValue {
        match self {
            Open::Array(items) => JsonValue::Array(items),
            Open::Object { map, .. } => JsonValue::Object(map),
        }
    }
}

/// JSON parser with strict validation.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token<'a>,
    limits: Limits,
}

impl<'a> Parser<'a> {
    /// Create a new parser for the given input.
    pub fn new(input: &'a [u8], limits: Limits) -> CanonResult<Self> {
        let mut lexer = Lexer::new(input, limits)?;
        let current = lexer.next_token()?;
        Ok(Self {
            lexer,
            current,
            limits,
        })
    }

    /// Parse the input and return a JsonValue.
    pub fn parse(&mut self) -> CanonResult<JsonValue> {
        let value = self.parse_value()?;

        // Ensure no trailing content
        if self.current != Token::Eof {
            return Err(ErrorCode::E100_InvalidJSON);
        }

        Ok(value)
    }

    /// Advance to the next token, returning the one just consumed.
    fn advance(&mut self) -> CanonResult<Token<'a>> {
        let next = self.lexer.next_token()?;
        Ok(mem::replace(&mut self.current, next))
    }

    fn expect(&mut self, token: Token<'static>) -> CanonResult<()> {
        if self.current != token {
            return Err(ErrorCode::E100_InvalidJSON);
        }
        self.advance()?;
        Ok(())
    }

    /// Read `"key":` for the next member of `map`.
    fn read_key(&mut self, map: &JsonMap) -> CanonResult<String> {
        let key = match self.advance()? {
            Token::String(s) => s.into_owned(),
            _ => return Err(ErrorCode::E100_InvalidJSON),
        };

        if map.contains_key(&key) {
            return Err(ErrorCode::E101_DuplicateKey(key));
        }

        self.expect(Token::Colon)?;
        Ok(key)
    }

    fn parse_value(&mut self) -> CanonResult<JsonValue> {
        let mut stack: Vec<Open> = Vec::new();

        loop {
            // Descend until a complete value is in hand
            let mut value = match self.advance()? {
                Token::LeftBracket => {
                    self.limits.check_depth(stack.len() as u64 + 1)?;
                    if self.current == Token::RightBracket {
                        self.advance()?;
                        JsonValue::Array(Vec::new())
                    } else {
                        stack.push(Open::Array(Vec::new()));
                        continue;
                    }
                }
                Token::LeftBrace => {
                    self.limits.check_depth(stack.len() as u64 + 1)?;
                    if self.current == Token::RightBrace {
                        self.advance()?;
                        JsonValue::Object(JsonMap::new())
                    } else {
                        let map = JsonMap::new();
                        let key = self.read_key(&map)?;
                        stack.push(Open::Object { map, key });
                        continue;
                    }
                }
                Token::Null => JsonValue::Null,
                Token::True => JsonValue::Bool(true),
                Token::False => JsonValue::Bool(false),
                Token::String(s) => JsonValue::String(s.into_owned()),
                Token::Number(text) => parse_number(text)?,
                _ => return Err(ErrorCode::E100_InvalidJSON),
            };

            // Ascend: attach to the enclosing container and read its separator
            loop {
                let Some(top) = stack.last_mut() else {
                    return Ok(value);
                };

                match top {
                    Open::Array(items) => {
                        items.push(value);

                        if items.len() as u64 > self.limits.max_array_length {
                            return Err(ErrorCode::E114_ArrayTooLong(
                                items.len() as u64,
                                self.limits.max_array_length,
                            ));
                        }

                        match self.advance()? {
                            Token::Comma => {
                                if self.current == Token::RightBracket {
                                    return Err(ErrorCode::E100_InvalidJSON);
                                }
                                break;
                            }
                            Token::RightBracket => {}
                            _ => return Err(ErrorCode::E100_InvalidJSON),
                        }
                    }
                    Open::Object { map, key } => {
                        map.insert(mem::take(key), value);

                        if map.len() as u64 > self.limits.max_object_fields {
                            return Err(ErrorCode::E113_TooManyFields(
                                map.len() as u64,
                                self.limits.max_object_fields,
                            ));
                        }

                        match self.advance()? {
                            // Trailing comma is not allowed in JSON; the next key read fails
                            Token::Comma => {
                                *key = self.read_key(map)?;
                                break;
                            }
                            Token::RightBrace => {}
                            _ => return Err(ErrorCode::E100_InvalidJSON),
                        }
                    }
                }

                value = match stack.pop() {
                    Some(open) => open.finish(),
                    None => return Err(ErrorCode::E999_InternalError),
                };
            }
        }
    }
}

/// Convert a number literal. Literals that overflow an f64 are rejected.
fn parse_number(text: &str) -> CanonResult<JsonValue> {
    Number::from_str(text)
        .map(JsonValue::Number)
        .map_err(|_| ErrorCode::E109_NonFiniteNumber)
}

/// Parse JSON text into a JsonValue with standard limits.
pub fn parse(input: &[u8]) -> CanonResult<JsonValue> {
    parse_with_limits(input, Limits::standard())
}

/// Parse JSON text into a JsonValue with custom limits.
pub fn parse_with_limits(input: &[u8], limits: Limits) -> CanonResult<JsonValue> {
    let mut parser = Parser::new(input, limits)?;
    let value = parser.parse()?;
    tracing::trace!(bytes = input.len(), kind = value.type_name(), "parsed JSON input");
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_lenient(input: &str) -> CanonResult<JsonValue> {
        parse_with_limits(input.as_bytes(), Limits::lenient())
    }

    #[test]
    fn test_parse_null() {
        assert_eq!(parse_lenient("null").unwrap(), JsonValue::Null);
    }

    #[test]
    fn test_parse_booleans() {
        assert_eq!(parse_lenient("true").unwrap(), JsonValue::Bool(true));
        assert_eq!(parse_lenient("false").unwrap(), JsonValue::Bool(false));
    }

    #[test]
    fn test_parse_numbers() {
        assert_eq!(parse_lenient("42").unwrap(), JsonValue::from(42));
        assert_eq!(parse_lenient("-123").unwrap(), JsonValue::from(-123));
        assert_eq!(parse_lenient("0").unwrap(), JsonValue::from(0));
        assert_eq!(parse_lenient("2.5").unwrap().as_f64(), Some(2.5));
        assert_eq!(parse_lenient("1e3").unwrap().as_f64(), Some(1000.0));
    }

    #[test]
    fn test_overflowing_number_rejected() {
        assert_eq!(parse_lenient("1e400"), Err(ErrorCode::E109_NonFiniteNumber));
        assert_eq!(parse_lenient("-1e400"), Err(ErrorCode::E109_NonFiniteNumber));
    }

    #[test]
    fn test_parse_string() {
        assert_eq!(
            parse_lenient(r#""hello""#).unwrap(),
            JsonValue::String("hello".to_string())
        );
    }

    #[test]
    fn test_parse_array() {
        let result = parse_lenient("[1, 2, 3]").unwrap();
        assert_eq!(
            result,
            JsonValue::Array(vec![
                JsonValue::from(1),
                JsonValue::from(2),
                JsonValue::from(3),
            ])
        );
    }

    #[test]
    fn test_parse_object_keeps_document_order() {
        let result = parse_lenient(r#"{"b": 2, "a": 1, "c": 3}"#).unwrap();
        assert_eq!(result.keys(), vec!["b", "a", "c"]);
        assert_eq!(result.get("a"), Some(&JsonValue::from(1)));
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let result = parse_lenient(r#"{"a": 1, "a": 2}"#);
        assert_eq!(result, Err(ErrorCode::E101_DuplicateKey("a".to_string())));
    }

    #[test]
    fn test_duplicate_key_after_unescape_rejected() {
        let result = parse_lenient(r#"{"a": 1, "\u0061": 2}"#);
        assert_eq!(result.unwrap_err().code(), 101);
    }

    #[test]
    fn test_nesting_depth_limit() {
        let limits = Limits::standard().with_max_depth(2);

        assert!(parse_with_limits(b"[[1]]", limits).is_ok());
        assert!(parse_with_limits(br#"{"a":[1]}"#, limits).is_ok());

        assert_eq!(
            parse_with_limits(b"[[[1]]]", limits),
            Err(ErrorCode::E111_NestingTooDeep(3, 2))
        );
    }

    #[test]
    fn test_object_field_limit() {
        let mut limits = Limits::lenient();
        limits.max_object_fields = 2;

        let result = parse_with_limits(br#"{"a": 1, "b": 2, "c": 3}"#, limits);
        assert_eq!(result.unwrap_err().code(), 113);
    }

    #[test]
    fn test_array_length_limit() {
        let mut limits = Limits::lenient();
        limits.max_array_length = 2;

        let result = parse_with_limits(b"[1, 2, 3]", limits);
        assert_eq!(result.unwrap_err().code(), 114);
    }

    #[test]
    fn test_trailing_content_rejected() {
        assert!(parse_lenient("null extra").is_err());
        assert!(parse_lenient("{} {}").is_err());
    }

    #[test]
    fn test_trailing_comma_rejected() {
        assert!(parse_lenient("[1, 2,]").is_err());
        assert!(parse_lenient(r#"{"a": 1,}"#).is_err());
    }

    #[test]
    fn test_structural_errors() {
        for input in ["", "[", "{", r#"{"a"}"#, r#"{"a" 1}"#, "{1: 2}", "[1 2]", "]"] {
            assert_eq!(parse_lenient(input), Err(ErrorCode::E100_InvalidJSON), "input {input:?}");
        }
    }

    #[test]
    fn test_deeply_nested_input_with_raised_limit() {
        let depth = 200_000;
        let text = format!("{}{}", "[".repeat(depth), "]".repeat(depth));
        let limits = Limits::lenient().with_max_depth(depth as u64);

        let value = parse_with_limits(text.as_bytes(), limits).unwrap();
        assert!(value.is_array());

        assert_eq!(
            parse_with_limits(text.as_bytes(), limits.with_max_depth(depth as u64 - 1)),
            Err(ErrorCode::E111_NestingTooDeep(depth as u64, depth as u64 - 1))
        );
    }

    #[test]
    fn test_deeply_nested_objects() {
        let depth = 100_000;
        let text = format!("{}null{}", r#"{"a":"#.repeat(depth), "}".repeat(depth));
        let limits = Limits::lenient().with_max_depth(depth as u64);

        let value = parse_with_limits(text.as_bytes(), limits).unwrap();
        assert_eq!(value.keys(), vec!["a"]);
    }

    #[test]
    fn test_nested_structure() {
        let result = parse_lenient(r#"{"arr": [1, {"nested": true}], "num": 42}"#).unwrap();
        assert!(result.is_object());
        let arr = result.get("arr").unwrap();
        assert!(arr.is_array());
        assert_eq!(
            arr.get_index(1).and_then(|v| v.get("nested")),
            Some(&JsonValue::Bool(true))
        );
    }
}
