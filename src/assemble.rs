//! JSON array assembly from pre-serialized fragments.
//!
//! Each fragment is taken to be valid JSON text for one element. Fragments
//! are copied verbatim between `[`, `,` and `]`: nothing is parsed,
//! escaped, trimmed or validated, so the cost is linear in the total
//! fragment length. If a fragment is not valid JSON the assembled text is
//! not valid JSON either; fragment validity is the caller's responsibility.
//!
//! # Example
//!
//! ```
//! use json_canon::assemble_array;
//!
//! assert_eq!(assemble_array::<&str>(&[]), "[]");
//! assert_eq!(assemble_array(&["1", "2", "3"]), "[1,2,3]");
//! assert_eq!(assemble_array(&["\"a\""]), "[\"a\"]");
//! ```

use std::io::{self, Write};

use crate::error::CanonResult;
use crate::json::{canonical_string_with, CanonOptions, JsonValue};

/// Join fragments into a JSON array literal.
///
/// The output buffer is sized up front, so this allocates exactly once.
pub fn assemble_array<S: AsRef<str>>(fragments: &[S]) -> String {
    let body: usize = fragments.iter().map(|f| f.as_ref().len()).sum();
    let separators = fragments.len().saturating_sub(1);
    let mut output = String::with_capacity(body + separators + 2);

    output.push('[');
    for (i, fragment) in fragments.iter().enumerate() {
        if i > 0 {
            output.push(',');
        }
        output.push_str(fragment.as_ref());
    }
    output.push(']');

    tracing::trace!(fragments = fragments.len(), bytes = output.len(), "assembled array");
    output
}

/// Join fragments from any iterator into a JSON array literal.
pub fn assemble_iter<I>(fragments: I) -> String
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut output = String::from("[");
    for (i, fragment) in fragments.into_iter().enumerate() {
        if i > 0 {
            output.push(',');
        }
        output.push_str(fragment.as_ref());
    }
    output.push(']');
    output
}

/// Streams a JSON array to a writer one fragment at a time.
///
/// Produces the same bytes as [`assemble_array`] without holding the
/// combined text in memory. The closing `]` is only written by
/// [`ArrayWriter::finish`]; dropping the writer early leaves an
/// unterminated array in the sink.
pub struct ArrayWriter<W: Write> {
    writer: W,
    count: usize,
}

impl<W: Write> ArrayWriter<W> {
    /// Start an array, writing the opening `[`.
    pub fn new(mut writer: W) -> io::Result<Self> {
        writer.write_all(b"[")?;
        Ok(Self { writer, count: 0 })
    }

    /// Append one fragment verbatim.
    pub fn push(&mut self, fragment: &str) -> io::Result<()> {
        if self.count > 0 {
            self.writer.write_all(b",")?;
        }
        self.writer.write_all(fragment.as_bytes())?;
        self.count += 1;
        Ok(())
    }

    /// Append every fragment from an iterator.
    pub fn extend<I>(&mut self, fragments: I) -> io::Result<()>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        for fragment in fragments {
            self.push(fragment.as_ref())?;
        }
        Ok(())
    }

    /// Canonicalize a value and append its text as the next element.
    pub fn push_canonical(&mut self, value: &JsonValue, options: &CanonOptions) -> CanonResult<()> {
        let text = canonical_string_with(value, options)?;
        self.push(&text)?;
        Ok(())
    }

    /// Number of fragments written so far.
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns true if no fragment has been written.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Write the closing `]`, flush, and return the sink.
    pub fn finish(mut self) -> io::Result<W> {
        self.writer.write_all(b"]")?;
        self.writer.flush()?;
        tracing::trace!(fragments = self.count, "finished streamed array");
        Ok(self.writer)
    }
}
