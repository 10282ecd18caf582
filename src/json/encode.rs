//! Compact JSON text encoder.
//!
//! Emits object members in stored order, so the text of a canonical value
//! is canonical and the text of any other value is its naive serialization.
//! Output matches `serde_json::to_string` for the same value: no
//! whitespace, short escapes where JSON has them, `\u00xx` for the
//! remaining control characters, and numbers in `serde_json`'s shortest
//! round-trip form.
//!
//! The encoder keeps its own work list, so arbitrarily deep values do not
//! grow the call stack, and [`write_json`] streams text to its writer as
//! the walk proceeds instead of building the whole document first.

use std::convert::Infallible;
use std::io::{self, Write};

use super::types::JsonValue;

/// Destination for encoded text.
trait Sink {
    type Error;

    fn put(&mut self, text: &str) -> Result<(), Self::Error>;
}

impl Sink for String {
    type Error = Infallible;

    fn put(&mut self, text: &str) -> Result<(), Infallible> {
        self.push_str(text);
        Ok(())
    }
}

/// Buffered `io::Write` destination.
struct Stream<W: Write>(io::BufWriter<W>);

impl<W: Write> Sink for Stream<W> {
    type Error = io::Error;

    fn put(&mut self, text: &str) -> io::Result<()> {
        self.0.write_all(text.as_bytes())
    }
}

/// Pending output while walking a value.
enum Step<'a> {
    Value(&'a JsonValue),
    Key(&'a str),
    Text(&'static str),
}

/// Encode a value as compact JSON text.
pub fn to_json_string(value: &JsonValue) -> String {
    let mut output = String::new();
    match write_value(value, &mut output) {
        Ok(()) => output,
        Err(never) => match never {},
    }
}

/// Encode a value into an `io::Write` sink.
///
/// Output goes through a fixed-size buffer; memory use does not grow with
/// the length of the encoded text.
pub fn write_json<W: Write>(value: &JsonValue, writer: W) -> io::Result<()> {
    let mut stream = Stream(io::BufWriter::new(writer));
    write_value(value, &mut stream)?;
    stream.0.flush()
}

fn write_value<S: Sink>(value: &JsonValue, output: &mut S) -> Result<(), S::Error> {
    let mut work = vec![Step::Value(value)];

    while let Some(step) = work.pop() {
        match step {
            Step::Text(text) => output.put(text)?,
            Step::Key(key) => {
                write_string(key, output)?;
                output.put(":")?;
            }
            Step::Value(JsonValue::Null) => output.put("null")?,
            Step::Value(JsonValue::Bool(true)) => output.put("true")?,
            Step::Value(JsonValue::Bool(false)) => output.put("false")?,
            Step::Value(JsonValue::Number(n)) => output.put(&n.to_string())?,
            Step::Value(JsonValue::String(s)) => write_string(s, output)?,
            Step::Value(JsonValue::Array(items)) => {
                output.put("[")?;
                work.push(Step::Text("]"));
                // Pushed in reverse so they pop in order
                for (i, item) in items.iter().enumerate().rev() {
                    work.push(Step::Value(item));
                    if i > 0 {
                        work.push(Step::Text(","));
                    }
                }
            }
            Step::Value(JsonValue::Object(map)) => {
                output.put("{")?;
                work.push(Step::Text("}"));
                for (i, (key, item)) in map.iter().enumerate().rev() {
                    work.push(Step::Value(item));
                    work.push(Step::Key(key));
                    if i > 0 {
                        work.push(Step::Text(","));
                    }
                }
            }
        }
    }
    Ok(())
}

/// Write a string with JSON escaping. Unescaped runs are written as slices.
fn write_string<S: Sink>(s: &str, output: &mut S) -> Result<(), S::Error> {
    output.put("\"")?;
    let mut run_start = 0;
    for (i, ch) in s.char_indices() {
        let unicode;
        let escape = match ch {
            '"' => "\\\"",
            '\\' => "\\\\",
            '\x08' => "\\b",
            '\x0C' => "\\f",
            '\n' => "\\n",
            '\r' => "\\r",
            '\t' => "\\t",
            c if c < '\x20' => {
                unicode = format!("\\u{:04x}", c as u32);
                unicode.as_str()
            }
            _ => continue,
        };
        output.put(&s[run_start..i])?;
        output.put(escape)?;
        run_start = i + ch.len_utf8();
    }
    output.put(&s[run_start..])?;
    output.put("\"")
}
