//! Textual forms of values.
//!
//! `Display` is what a template writes into its output and what string
//! concatenation uses. `repr` is the debugging form printed by `print` and
//! `repr()`: strings come back quoted and escaped.

use std::fmt::{self, Write};

use super::Value;

/// Largest magnitude printed without a fractional part or exponent.
const INTEGRAL_DISPLAY_LIMIT: f64 = 1e15;

/// Format a number the way templates show it: `5`, `-3`, `2.5`.
pub fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < INTEGRAL_DISPLAY_LIMIT {
        format!("{n:.0}")
    } else {
        n.to_string()
    }
}

fn write_quoted(out: &mut impl Write, s: &str) -> fmt::Result {
    out.write_char('"')?;
    for c in s.chars() {
        match c {
            '"' => out.write_str("\\\"")?,
            '\\' => out.write_str("\\\\")?,
            '\n' => out.write_str("\\n")?,
            '\t' => out.write_str("\\t")?,
            '\r' => out.write_str("\\r")?,
            c => out.write_char(c)?,
        }
    }
    out.write_char('"')
}

impl Value {
    /// Human-readable representation, with strings quoted.
    pub fn repr(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_repr(&mut out);
        out
    }

    fn write_repr(&self, out: &mut String) -> fmt::Result {
        match self {
            Value::Str(s) => write_quoted(out, s),
            Value::StrV(items) => {
                out.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    write_quoted(out, item)?;
                }
                out.push(']');
                Ok(())
            }
            Value::Enum(e) => write!(out, "<{}.{}>", e.type_desc.name(), e.nick),
            Value::Type(t) => write!(out, "<type {}>", t.name()),
            other => write!(out, "{other}"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => f.write_str(&format_number(*n)),
            Value::Int(n) => write!(f, "{n}"),
            Value::UInt(n) => write!(f, "{n}"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Str(s) => f.write_str(s),
            Value::StrV(items) => f.write_str(&items.join(", ")),
            Value::Null => f.write_str("null"),
            Value::Enum(e) => f.write_str(&e.nick),
            Value::Native(h) if h.is_null() => write!(f, "<{} (null)>", h.type_desc.name()),
            Value::Native(h) => write!(f, "<{}>", h.type_desc.name()),
            Value::Type(t) => f.write_str(t.name()),
            Value::Closure(c) => write!(f, "<function {}>", c.display_name()),
        }
    }
}
