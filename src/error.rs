//! Error handling for json-canon.
//!
//! Every failure is reported as an [`ErrorCode`] carrying a stable numeric
//! code, so the CLI, the conformance corpus and library callers agree on
//! how a given invalid input is classified.
//!
//! Library code returns [`ErrorCode::E999_InternalError`] rather than
//! panicking when an internal invariant does not hold.

use thiserror::Error;

/// All error codes produced by the parser, canonicalizer and CLI.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[allow(non_camel_case_types)]
pub enum ErrorCode {
    /// Malformed JSON text (code 100)
    #[error("E100_InvalidJSON")]
    E100_InvalidJSON,

    /// Object key appears twice after unescaping (code 101)
    #[error("E101_DuplicateKey({0})")]
    E101_DuplicateKey(String),

    /// Input is not valid UTF-8 or contains an unpaired surrogate (code 105)
    #[error("E105_InvalidUTF8")]
    E105_InvalidUTF8,

    /// Number is NaN, infinite, or overflows an IEEE-754 double (code 109)
    #[error("E109_NonFiniteNumber")]
    E109_NonFiniteNumber,

    /// Input exceeds the size limit: (size, limit) (code 110)
    #[error("E110_InputTooLarge({0}, {1})")]
    E110_InputTooLarge(u64, u64),

    /// Arrays/objects nested deeper than allowed: (depth, limit) (code 111)
    #[error("E111_NestingTooDeep({0}, {1})")]
    E111_NestingTooDeep(u64, u64),

    /// String longer than allowed: (length, limit) (code 112)
    #[error("E112_StringTooLong({0}, {1})")]
    E112_StringTooLong(u64, u64),

    /// Object has too many members: (count, limit) (code 113)
    #[error("E113_TooManyFields({0}, {1})")]
    E113_TooManyFields(u64, u64),

    /// Array has too many elements: (length, limit) (code 114)
    #[error("E114_ArrayTooLong({0}, {1})")]
    E114_ArrayTooLong(u64, u64),

    /// Non-ASCII codepoint in ASCII-only mode (code 115)
    #[error("E115_NonASCIICharacter({0})")]
    E115_NonASCIICharacter(u64),

    /// Text is valid JSON but not in canonical form (code 205)
    #[error("E205_NonCanonicalJSON")]
    E205_NonCanonicalJSON,

    /// Input file does not exist (code 900)
    #[error("E900_FileNotFound({0})")]
    E900_FileNotFound(String),

    /// Reading or writing failed (code 901)
    #[error("E901_IoError({0})")]
    E901_IoError(String),

    /// A `Serialize` value could not be converted to JSON (code 902)
    #[error("E902_SerializationFailed({0})")]
    E902_SerializationFailed(String),

    /// Internal invariant violated (code 999)
    #[error("E999_InternalError")]
    E999_InternalError,
}

impl ErrorCode {
    /// Get the numeric error code.
    pub fn code(&self) -> u32 {
        match self {
            ErrorCode::E100_InvalidJSON => 100,
            ErrorCode::E101_DuplicateKey(_) => 101,
            ErrorCode::E105_InvalidUTF8 => 105,
            ErrorCode::E109_NonFiniteNumber => 109,
            ErrorCode::E110_InputTooLarge(_, _) => 110,
            ErrorCode::E111_NestingTooDeep(_, _) => 111,
            ErrorCode::E112_StringTooLong(_, _) => 112,
            ErrorCode::E113_TooManyFields(_, _) => 113,
            ErrorCode::E114_ArrayTooLong(_, _) => 114,
            ErrorCode::E115_NonASCIICharacter(_) => 115,
            ErrorCode::E205_NonCanonicalJSON => 205,
            ErrorCode::E900_FileNotFound(_) => 900,
            ErrorCode::E901_IoError(_) => 901,
            ErrorCode::E902_SerializationFailed(_) => 902,
            ErrorCode::E999_InternalError => 999,
        }
    }

    /// Get the error name as a string.
    pub fn name(&self) -> &'static str {
        match self {
            ErrorCode::E100_InvalidJSON => "E100_InvalidJSON",
            ErrorCode::E101_DuplicateKey(_) => "E101_DuplicateKey",
            ErrorCode::E105_InvalidUTF8 => "E105_InvalidUTF8",
            ErrorCode::E109_NonFiniteNumber => "E109_NonFiniteNumber",
            ErrorCode::E110_InputTooLarge(_, _) => "E110_InputTooLarge",
            ErrorCode::E111_NestingTooDeep(_, _) => "E111_NestingTooDeep",
            ErrorCode::E112_StringTooLong(_, _) => "E112_StringTooLong",
            ErrorCode::E113_TooManyFields(_, _) => "E113_TooManyFields",
            ErrorCode::E114_ArrayTooLong(_, _) => "E114_ArrayTooLong",
            ErrorCode::E115_NonASCIICharacter(_) => "E115_NonASCIICharacter",
            ErrorCode::E205_NonCanonicalJSON => "E205_NonCanonicalJSON",
            ErrorCode::E900_FileNotFound(_) => "E900_FileNotFound",
            ErrorCode::E901_IoError(_) => "E901_IoError",
            ErrorCode::E902_SerializationFailed(_) => "E902_SerializationFailed",
            ErrorCode::E999_InternalError => "E999_InternalError",
        }
    }
}

impl From<std::io::Error> for ErrorCode {
    fn from(err: std::io::Error) -> Self {
        ErrorCode::E901_IoError(err.to_string())
    }
}

/// Result type for canonicalization operations.
pub type CanonResult<T> = Result<T, ErrorCode>;
