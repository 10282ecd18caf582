//! JSON lexer/tokenizer.
//!
//! Converts JSON text into a stream of tokens for the parser. The whole
//! input is validated as UTF-8 up front, so string runs without escapes are
//! handed out as borrowed slices and only escaped strings allocate.
//! Escapes are decoded here so the parser compares keys exactly as they
//! will be stored; surrogate escapes must pair up.

use std::borrow::Cow;

use super::limits::Limits;
use crate::error::{CanonResult, ErrorCode};

/// Token types produced by the lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    /// Left brace `{`
    LeftBrace,
    /// Right brace `}`
    RightBrace,
    /// Left bracket `[`
    LeftBracket,
    /// Right bracket `]`
    RightBracket,
    /// Colon `:`
    Colon,
    /// Comma `,`
    Comma,
    /// Null literal
    Null,
    /// True literal
    True,
    /// False literal
    False,
    /// String value, unescaped
    String(Cow<'a, str>),
    /// Number literal text; grammar already checked
    Number(&'a str),
    /// End of input
    Eof,
}

/// JSON lexer over validated UTF-8 text.
pub struct Lexer<'a> {
    text: &'a str,
    pos: usize,
    limits: Limits,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer, checking input size and UTF-8 validity.
    pub fn new(input: &'a [u8], limits: Limits) -> CanonResult<Self> {
        if input.len() as u64 > limits.max_input_size {
            return Err(ErrorCode::E110_InputTooLarge(
                input.len() as u64,
                limits.max_input_size,
            ));
        }

        let text = std::str::from_utf8(input).map_err(|_| ErrorCode::E105_InvalidUTF8)?;

        Ok(Self {
            text,
            pos: 0,
            limits,
        })
    }

    /// Byte offset of the next unread character.
    pub fn position(&self) -> usize {
        self.pos
    }

    fn peek(&self) -> Option<u8> {
        self.text.as_bytes().get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let b = self.peek();
        if b.is_some() {
            self.pos += 1;
        }
        b
    }

    fn skip_whitespace(&mut self) {
        while let Some(b' ' | b'\t' | b'\n' | b'\r') = self.peek() {
            self.pos += 1;
        }
    }

    /// Consume a single-byte punctuation token.
    fn punct(&mut self, token: Token<'a>) -> CanonResult<Token<'a>> {
        self.pos += 1;
        Ok(token)
    }

    /// Read the next token from the input.
    pub fn next_token(&mut self) -> CanonResult<Token<'a>> {
        self.skip_whitespace();

        match self.peek() {
            None => Ok(Token::Eof),
            Some(b'{') => self.punct(Token::LeftBrace),
            Some(b'}') => self.punct(Token::RightBrace),
            Some(b'[') => self.punct(Token::LeftBracket),
            Some(b']') => self.punct(Token::RightBracket),
            Some(b':') => self.punct(Token::Colon),
            Some(b',') => self.punct(Token::Comma),
            Some(b'"') => self.read_string(),
            Some(b'-' | b'0'..=b'9') => self.read_number(),
            Some(b't') => self.read_literal("true", Token::True),
            Some(b'f') => self.read_literal("false", Token::False),
            Some(b'n') => self.read_literal("null", Token::Null),
            Some(_) => Err(ErrorCode::E100_InvalidJSON),
        }
    }

    /// Read a string token. Borrows when the string has no escapes.
    fn read_string(&mut self) -> CanonResult<Token<'a>> {
        let text = self.text;
        self.pos += 1; // opening quote
        let mut owned: Option<String> = None;
        let mut run_start = self.pos;

        loop {
            let b = self.peek().ok_or(ErrorCode::E100_InvalidJSON)?;
            match b {
                b'"' => {
                    let run = &text[run_start..self.pos];
                    self.pos += 1;
                    let value = match owned {
                        Some(mut buf) => {
                            buf.push_str(run);
                            Cow::Owned(buf)
                        }
                        None => Cow::Borrowed(run),
                    };
                    self.check_string_length(value.len())?;
                    return Ok(Token::String(value));
                }
                b'\\' => {
                    let run = &text[run_start..self.pos];
                    self.pos += 1;
                    let ch = self.read_escape()?;
                    let buf = owned.get_or_insert_with(String::new);
                    buf.push_str(run);
                    buf.push(ch);
                    self.check_string_length(buf.len())?;
                    run_start = self.pos;
                }
                0x00..=0x1F => return Err(ErrorCode::E100_InvalidJSON),
                0x80..=0xFF if self.limits.ascii_only => {
                    let cp = text[self.pos..]
                        .chars()
                        .next()
                        .map_or(u64::from(b), |c| u64::from(c as u32));
                    return Err(ErrorCode::E115_NonASCIICharacter(cp));
                }
                _ => {
                    self.pos += 1;
                    // Bytes unescaped so far plus the current raw run
                    let len = owned.as_ref().map_or(0, String::len) + (self.pos - run_start);
                    self.check_string_length(len)?;
                }
            }
        }
    }

    fn check_string_length(&self, len: usize) -> CanonResult<()> {
        if len as u64 > self.limits.max_string_length {
            return Err(ErrorCode::E112_StringTooLong(
                len as u64,
                self.limits.max_string_length,
            ));
        }
        Ok(())
    }

    /// Decode the escape sequence following a backslash.
    fn read_escape(&mut self) -> CanonResult<char> {
        let ch = match self.bump() {
            Some(b'"') => '"',
            Some(b'\\') => '\\',
            Some(b'/') => '/',
            Some(b'b') => '\x08',
            Some(b'f') => '\x0C',
            Some(b'n') => '\n',
            Some(b'r') => '\r',
            Some(b't') => '\t',
            Some(b'u') => self.read_unicode_escape()?,
            _ => return Err(ErrorCode::E100_InvalidJSON),
        };

        if self.limits.ascii_only && !ch.is_ascii() {
            return Err(ErrorCode::E115_NonASCIICharacter(u64::from(ch as u32)));
        }
        Ok(ch)
    }

    /// Decode `\uXXXX`, joining a surrogate pair when present.
    fn read_unicode_escape(&mut self) -> CanonResult<char> {
        let unit = self.read_hex4()?;

        let codepoint = match unit {
            0xD800..=0xDBFF => {
                if self.bump() != Some(b'\\') || self.bump() != Some(b'u') {
                    return Err(ErrorCode::E105_InvalidUTF8);
                }
                let low = self.read_hex4()?;
                if !(0xDC00..=0xDFFF).contains(&low) {
                    return Err(ErrorCode::E105_InvalidUTF8);
                }
                0x10000 + ((u32::from(unit) - 0xD800) << 10) + (u32::from(low) - 0xDC00)
            }
            0xDC00..=0xDFFF => return Err(ErrorCode::E105_InvalidUTF8),
            _ => u32::from(unit),
        };

        char::from_u32(codepoint).ok_or(ErrorCode::E105_InvalidUTF8)
    }

    fn read_hex4(&mut self) -> CanonResult<u16> {
        let digits = self
            .text
            .get(self.pos..self.pos + 4)
            .ok_or(ErrorCode::E100_InvalidJSON)?;
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ErrorCode::E100_InvalidJSON);
        }
        self.pos += 4;
        u16::from_str_radix(digits, 16).map_err(|_| ErrorCode::E100_InvalidJSON)
    }

    /// Read a number literal: `-? int frac? exp?`.
    fn read_number(&mut self) -> CanonResult<Token<'a>> {
        let text = self.text;
        let start = self.pos;

        if self.peek() == Some(b'-') {
            self.pos += 1;
        }

        match self.bump() {
            // No digits may follow a leading zero
            Some(b'0') => {
                if let Some(b'0'..=b'9') = self.peek() {
                    return Err(ErrorCode::E100_InvalidJSON);
                }
            }
            Some(b'1'..=b'9') => self.skip_digits(),
            _ => return Err(ErrorCode::E100_InvalidJSON),
        }

        if self.peek() == Some(b'.') {
            self.pos += 1;
            self.read_digits()?;
        }

        if let Some(b'e' | b'E') = self.peek() {
            self.pos += 1;
            if let Some(b'+' | b'-') = self.peek() {
                self.pos += 1;
            }
            self.read_digits()?;
        }

        Ok(Token::Number(&text[start..self.pos]))
    }

    fn skip_digits(&mut self) {
        while let Some(b'0'..=b'9') = self.peek() {
            self.pos += 1;
        }
    }

    /// Read one or more decimal digits.
    fn read_digits(&mut self) -> CanonResult<()> {
        match self.peek() {
            Some(b'0'..=b'9') => {
                self.skip_digits();
                Ok(())
            }
            _ => Err(ErrorCode::E100_InvalidJSON),
        }
    }

    fn read_literal(&mut self, word: &str, token: Token<'a>) -> CanonResult<Token<'a>> {
        if !self.text[self.pos..].starts_with(word) {
            return Err(ErrorCode::E100_InvalidJSON);
        }
        self.pos += word.len();
        Ok(token)
    }
}
