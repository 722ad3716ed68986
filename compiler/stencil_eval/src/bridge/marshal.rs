//! Conversion of template values into the representation a native
//! parameter or property declares.

use crate::errors::{conversion_failed, type_mismatch, EvalResult};
use crate::value::Value;

/// Representation a native parameter or property expects.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ArgKind {
    Number,
    Int,
    UInt,
    Boolean,
    /// String or null.
    Str,
    StrV,
    /// Native handle or null.
    Object,
    /// Passed through unchanged.
    Any,
}

impl ArgKind {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::Int => "int",
            Self::UInt => "uint",
            Self::Boolean => "boolean",
            Self::Str => "string",
            Self::StrV => "strv",
            Self::Object => "object",
            Self::Any => "any",
        }
    }
}

/// 2^63 as a double; integral doubles in `[-2^63, 2^63)` fit an `i64`.
const TWO_POW_63: f64 = 9_223_372_036_854_775_808.0;

fn integral_in_range(n: f64, min: f64, max_exclusive: f64) -> bool {
    n.is_finite() && n.fract() == 0.0 && n >= min && n < max_exclusive
}

/// Convert `value` for an "in" parameter or property of kind `kind`.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    reason = "ranges are checked before each cast"
)]
pub fn marshal_in(value: &Value, kind: ArgKind) -> EvalResult {
    let converted = match (kind, value) {
        (ArgKind::Any, v) => v.clone(),

        (ArgKind::Number, Value::Number(n)) => Value::Number(*n),
        (ArgKind::Number, Value::Int(n)) => Value::Number(*n as f64),
        (ArgKind::Number, Value::UInt(n)) => Value::Number(*n as f64),

        (ArgKind::Int, Value::Int(n)) => Value::Int(*n),
        (ArgKind::Int, Value::UInt(n)) => {
            Value::Int(i64::try_from(*n).map_err(|_| conversion_failed("uint", "int"))?)
        }
        (ArgKind::Int, Value::Number(n)) => {
            if !integral_in_range(*n, -TWO_POW_63, TWO_POW_63) {
                return Err(conversion_failed(&crate::value::format_number(*n), "int"));
            }
            Value::Int(*n as i64)
        }

        (ArgKind::UInt, Value::UInt(n)) => Value::UInt(*n),
        (ArgKind::UInt, Value::Int(n)) => {
            Value::UInt(u64::try_from(*n).map_err(|_| conversion_failed("int", "uint"))?)
        }
        (ArgKind::UInt, Value::Number(n)) => {
            if !integral_in_range(*n, 0.0, 2.0 * TWO_POW_63) {
                return Err(conversion_failed(&crate::value::format_number(*n), "uint"));
            }
            Value::UInt(*n as u64)
        }

        (ArgKind::Boolean, Value::Boolean(b)) => Value::Boolean(*b),
        (ArgKind::Boolean, v @ (Value::Number(_) | Value::Int(_) | Value::UInt(_))) => {
            Value::Boolean(v.is_truthy())
        }

        (ArgKind::Str, v @ (Value::Str(_) | Value::Null)) => v.clone(),
        (ArgKind::StrV, v @ (Value::StrV(_) | Value::Null)) => v.clone(),
        (ArgKind::Object, v @ (Value::Native(_) | Value::Null)) => v.clone(),

        (kind, v) => return Err(type_mismatch(kind.name(), v.type_name())),
    };
    Ok(converted)
}
