//! String methods.

use std::fmt::Write;

use crate::errors::{no_such_method, EvalResult};
use crate::value::Value;

use super::require_args;

pub(super) fn dispatch_string_method(s: &str, method: &str, args: &[Value]) -> EvalResult {
    let transform: fn(&str) -> String = match method {
        "upper" => str::to_uppercase,
        "lower" => str::to_lowercase,
        // Full Unicode case folding is not in std; lowercasing covers the common cases.
        "casefold" => str::to_lowercase,
        "reverse" => |s| s.chars().rev().collect(),
        "len" => {
            require_args("string", method, 0, args)?;
            return Ok(Value::UInt(s.len() as u64));
        }
        "escape" => escape,
        "escape_markup" => escape_markup,
        "space" => |s| " ".repeat(s.len()),
        "title" => title,
        "mangle" => mangle,
        _ => return Err(no_such_method(method, "string")),
    };
    require_args("string", method, 0, args)?;
    Ok(Value::from(transform(s)))
}

/// C-style escapes. Control bytes and non-ASCII bytes become octal.
fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'\x08' => out.push_str("\\b"),
            b'\x0c' => out.push_str("\\f"),
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            b'\t' => out.push_str("\\t"),
            b'\x0b' => out.push_str("\\v"),
            b'\\' => out.push_str("\\\\"),
            b'"' => out.push_str("\\\""),
            b if !(0x20..0x7f).contains(&b) => {
                // Writing into a String cannot fail.
                let _ = write!(out, "\\{b:03o}");
            }
            b => out.push(char::from(b)),
        }
    }
    out
}

fn escape_markup(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Capitalize each word. Runs of non-alphanumerics collapse to one space.
fn title(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        let at_word_start = out.is_empty() || out.ends_with(' ');
        if !c.is_alphanumeric() {
            if !at_word_start {
                out.push(' ');
            }
        } else if at_word_start {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// `CamelCase` to `snake_case`, splitting before each capital that follows
/// a lowercase letter and inside runs of capitals.
fn mangle(s: &str) -> String {
    // Anything unchanged by ASCII uppercasing counts as a capital here,
    // digits and underscores included.
    let chars: Vec<char> = s.chars().collect();
    let upper = |i: usize| chars[i].to_ascii_uppercase() == chars[i];

    let mut out = String::with_capacity(s.len() + 4);
    for (i, c) in chars.iter().enumerate() {
        let after_lower = i > 0 && upper(i) && !upper(i - 1);
        let second_of_leading_caps = i == 1 && upper(1) && upper(0);
        let inside_caps_run = i > 2 && upper(i) && upper(i - 1) && upper(i - 2);
        if after_lower || second_of_leading_caps || inside_caps_run {
            out.push('_');
        }
        out.push(c.to_ascii_lowercase());
    }
    out
}
