//! JSON rendering of records
//!
//! Compact canonical proto3 JSON with the HTML-safe string escapes used by
//! protobuf-java's `JsonFormat`: `<`, `>`, `&`, `=` and `'` become `\uXXXX`,
//! as do U+2028 and U+2029. Values are unchanged; only the bytes differ from
//! plain `serde_json` output.

use std::io;

use serde::Serialize;
use serde_json::ser::{Formatter, Serializer};

/// Compact output (the [`Formatter`] defaults) plus HTML-safe escaping inside strings
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlSafeFormatter;

impl Formatter for HtmlSafeFormatter {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut start = 0;
        for (i, c) in fragment.char_indices() {
            let escape = match c {
                '<' => "\\u003c",
                '>' => "\\u003e",
                '&' => "\\u0026",
                '=' => "\\u003d",
                '\'' => "\\u0027",
                '\u{2028}' => "\\u2028",
                '\u{2029}' => "\\u2029",
                _ => continue,
            };
            writer.write_all(&fragment.as_bytes()[start..i])?;
            writer.write_all(escape.as_bytes())?;
            start = i + c.len_utf8();
        }
        writer.write_all(&fragment.as_bytes()[start..])
    }
}

/// Serialize `value` as one compact, HTML-safe JSON value
pub fn to_writer<W, T>(writer: W, value: &T) -> serde_json::Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    let mut serializer = Serializer::with_formatter(writer, HtmlSafeFormatter);
    value.serialize(&mut serializer)
}
