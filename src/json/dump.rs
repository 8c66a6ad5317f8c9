//! JSON serialization.
//!
//! Turns a [`Value`] tree back into JSON text. Output is a pure function of
//! the tree: objects keep their stored key order, strings are re-escaped, and
//! numbers use the shortest text that parses back to the same `f64`.

use std::fmt::{self, Write};

use super::types::Value;

/// Largest magnitude below which every integral `f64` is exact (2^53).
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Layout of the produced text.
#[derive(Debug, Clone, Copy)]
enum Style {
    /// No insignificant whitespace.
    Compact,
    /// One member per line, indented by the given number of spaces per level.
    Pretty(usize),
}

impl Value {
    /// Serialize to compact JSON text.
    ///
    /// Re-parsing the output yields a value equal to `self`.
    pub fn dump(&self) -> String {
        let mut output = String::new();
        serialize_value(self, &mut output, Style::Compact);
        output
    }

    /// Serialize to indented JSON text, `indent` spaces per nesting level.
    pub fn dump_pretty(&self, indent: usize) -> String {
        let mut output = String::new();
        serialize_value(self, &mut output, Style::Pretty(indent));
        output
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dump())
    }
}

/// Serialize an `f64` the way it is written back into documents.
///
/// Integral values up to 2^53 print without a fraction (`1`, not `1.0`).
pub(crate) fn serialize_number(value: f64, output: &mut String) {
    let integral = value.fract() == 0.0 && value.abs() <= MAX_EXACT_INTEGER;
    if integral && !(value == 0.0 && value.is_sign_negative()) {
        // Exact: |value| <= 2^53 and has no fractional part
        #[allow(clippy::cast_possible_truncation)]
        let n = value as i64;
        output.push_str(itoa::Buffer::new().format(n));
    } else {
        output.push_str(ryu::Buffer::new().format_finite(value));
    }
}

/// Remaining members of a container being written.
enum Members<'v> {
    Array(std::slice::Iter<'v, Value>),
    Object(indexmap::map::Iter<'v, String, Value>),
}

/// An open container: its unwritten members, and whether one was written.
struct Open<'v> {
    members: Members<'v>,
    started: bool,
}

fn serialize_value(root: &Value, output: &mut String, style: Style) {
    let mut stack: Vec<Open<'_>> = Vec::new();
    let mut next = Some(root);

    loop {
        if let Some(value) = next.take() {
            match value {
                Value::Null => output.push_str("null"),
                Value::Bool(true) => output.push_str("true"),
                Value::Bool(false) => output.push_str("false"),
                Value::Number(n) => serialize_number(*n, output),
                Value::String(s) => serialize_string(s, output),
                Value::Array(items) if items.is_empty() => output.push_str("[]"),
                Value::Object(map) if map.is_empty() => output.push_str("{}"),
                Value::Array(items) => {
                    output.push('[');
                    stack.push(Open {
                        members: Members::Array(items.iter()),
                        started: false,
                    });
                }
                Value::Object(map) => {
                    output.push('{');
                    stack.push(Open {
                        members: Members::Object(map.iter()),
                        started: false,
                    });
                }
            }
        }

        let depth = stack.len();
        let Some(open) = stack.last_mut() else {
            return;
        };
        let member = match &mut open.members {
            Members::Array(items) => items.next().map(|item| (None, item)),
            Members::Object(entries) => entries.next().map(|(key, value)| (Some(key), value)),
        };

        match member {
            Some((key, value)) => {
                if open.started {
                    output.push(',');
                }
                open.started = true;
                newline(output, style, depth);
                if let Some(key) = key {
                    serialize_string(key, output);
                    output.push(':');
                    if let Style::Pretty(_) = style {
                        output.push(' ');
                    }
                }
                next = Some(value);
            }
            None => {
                let close = match open.members {
                    Members::Array(_) => ']',
                    Members::Object(_) => '}',
                };
                stack.pop();
                newline(output, style, depth - 1);
                output.push(close);
            }
        }
    }
}

/// Serialize a string with proper JSON escaping.
pub(crate) fn serialize_string(s: &str, output: &mut String) {
    output.push('"');
    for ch in s.chars() {
        match ch {
            '"' => output.push_str("\\\""),
            '\\' => output.push_str("\\\\"),
            '\x08' => output.push_str("\\b"),
            '\x0C' => output.push_str("\\f"),
            '\n' => output.push_str("\\n"),
            '\r' => output.push_str("\\r"),
            '\t' => output.push_str("\\t"),
            c if c < '\x20' => {
                // Other control characters as \u00XX; writing to a String cannot fail
                let _ = write!(output, "\\u{:04x}", c as u32);
            }
            c => output.push(c),
        }
    }
    output.push('"');
}

/// Start a new line at `depth` when pretty-printing.
fn newline(output: &mut String, style: Style, depth: usize) {
    if let Style::Pretty(indent) = style {
        output.push('\n');
        output.extend(std::iter::repeat_n(' ', indent * depth));
    }
}
