//! Methods on core values, answered without the bridge.
//!
//! Strings, enums and type descriptors carry a small fixed method set. The
//! set is closed, so dispatch is a plain match on the method name. Any other
//! receiver is the bridge's business.

mod string;

use crate::errors::{arity_mismatch, no_such_method, type_mismatch, EvalError, EvalResult};
use crate::value::{EnumValue, TypeDescriptor, Value};

/// Every method answered here, as `(receiver type, method)`. Sorted.
pub const CORE_METHODS: &[(&str, &str)] = &[
    ("enum", "nick"),
    ("string", "casefold"),
    ("string", "escape"),
    ("string", "escape_markup"),
    ("string", "len"),
    ("string", "lower"),
    ("string", "mangle"),
    ("string", "reverse"),
    ("string", "space"),
    ("string", "title"),
    ("string", "upper"),
    ("type", "is_a"),
    ("type", "name"),
];

/// Whether calls on `receiver` are answered by [`dispatch_core_method`].
pub fn is_core_receiver(receiver: &Value) -> bool {
    matches!(receiver, Value::Str(_) | Value::Enum(_) | Value::Type(_))
}

/// Call `method` on a string, enum or type receiver.
///
/// Other receivers fail with `NoSuchMethod`; check [`is_core_receiver`] first.
pub fn dispatch_core_method(receiver: &Value, method: &str, args: &[Value]) -> EvalResult {
    match receiver {
        Value::Str(s) => string::dispatch_string_method(s, method, args),
        Value::Enum(e) => dispatch_enum_method(e, method, args),
        Value::Type(t) => dispatch_type_method(t, method, args),
        other => Err(no_such_method(method, other.type_name())),
    }
}

fn require_args(
    receiver: &str,
    method: &str,
    expected: usize,
    args: &[Value],
) -> Result<(), EvalError> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(arity_mismatch(&format!("{receiver}.{method}"), expected, args.len()))
    }
}

fn dispatch_enum_method(value: &EnumValue, method: &str, args: &[Value]) -> EvalResult {
    match method {
        "nick" => {
            require_args("enum", method, 0, args)?;
            Ok(Value::string(value.nick.clone()))
        }
        _ => Err(no_such_method(method, "enum")),
    }
}

fn dispatch_type_method(desc: &TypeDescriptor, method: &str, args: &[Value]) -> EvalResult {
    match method {
        "name" => {
            require_args("type", method, 0, args)?;
            Ok(Value::from(desc.name()))
        }
        "is_a" => {
            require_args("type", method, 1, args)?;
            match &args[0] {
                Value::Type(other) => Ok(Value::Boolean(desc.is_a(other))),
                other => Err(type_mismatch("type", other.type_name())),
            }
        }
        _ => Err(no_such_method(method, "type")),
    }
}

#[cfg(test)]
mod tests;
