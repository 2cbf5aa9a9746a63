//! Pretty-printing of results

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use serde_json::Value;
use std::io::{self, Write};

/// Shown instead of an empty result
pub const NO_DATA: &str = "No data to display.";

/// Render a result as 4-space-indented JSON
///
/// `null`, an empty string, array, or object renders as [`NO_DATA`].
#[must_use]
pub fn render(value: &Value) -> String {
    if is_empty(value) {
        return NO_DATA.to_string();
    }

    let mut out = Vec::new();
    let mut ser = Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"    "));
    match value.serialize(&mut ser) {
        Ok(()) => String::from_utf8_lossy(&out).into_owned(),
        Err(_) => value.to_string(),
    }
}

/// Write [`render`] output and a newline to `out`
///
/// # Errors
///
/// Whatever the writer returns.
pub fn write_to<W: Write + ?Sized>(out: &mut W, value: &Value) -> io::Result<()> {
    writeln!(out, "{}", render(value))
}

/// Write [`render`] output to stdout
///
/// # Errors
///
/// Fails if stdout is closed.
pub fn print(value: &Value) -> io::Result<()> {
    write_to(&mut io::stdout().lock(), value)
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}
