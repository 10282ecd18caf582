//! DoS protection limits for JSON parsing and canonicalization.
//!
//! Parsing checks every limit. Canonicalization only checks
//! `max_nesting_depth`, since a value that already exists in memory has
//! paid for its size.

/// DoS protection limits.
///
/// Two presets are provided; individual fields may be adjusted after
/// construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Maximum total input size in bytes (E110)
    pub max_input_size: u64,
    /// Maximum nesting depth for arrays/objects (E111)
    pub max_nesting_depth: u64,
    /// Maximum string length in bytes (E112)
    pub max_string_length: u64,
    /// Maximum number of fields in an object (E113)
    pub max_object_fields: u64,
    /// Maximum number of elements in an array (E114)
    pub max_array_length: u64,
    /// Whether to enforce ASCII-only strings (E115)
    pub ascii_only: bool,
}

impl Limits {
    /// Default limits for untrusted input.
    pub const fn standard() -> Self {
        Self {
            max_input_size: 16 * 1024 * 1024, // 16 MiB
            max_nesting_depth: 128,           // 128 levels
            max_string_length: 1024 * 1024,   // 1 MiB
            max_object_fields: 10_000,        // 10,000 fields
            max_array_length: 1_000_000,      // 1,000,000 elements
            ascii_only: false,
        }
    }

    /// Lenient limits for trusted batch input.
    pub const fn lenient() -> Self {
        Self {
            max_input_size: 256 * 1024 * 1024, // 256 MiB
            max_nesting_depth: 1024,           // 1024 levels
            max_string_length: 64 * 1024 * 1024,
            max_object_fields: 1_000_000,
            max_array_length: 50_000_000,
            ascii_only: false,
        }
    }

    /// Returns the limits with `max_nesting_depth` replaced.
    pub const fn with_max_depth(mut self, depth: u64) -> Self {
        self.max_nesting_depth = depth;
        self
    }

    /// Check a nesting depth against `max_nesting_depth`.
    pub(crate) fn check_depth(&self, depth: u64) -> crate::CanonResult<()> {
        if depth > self.max_nesting_depth {
            return Err(crate::ErrorCode::E111_NestingTooDeep(
                depth,
                self.max_nesting_depth,
            ));
        }
        Ok(())
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self::standard()
    }
}
