//! The fixed table of single-argument builtin functions.
//!
//! Math functions work in double precision. Casts are range-checked and
//! never wrap: a value that does not fit the target fails with
//! `ConversionFailed` naming both types.

use stencil_ir::Builtin;

use crate::errors::{
    assertion_failed, conversion_failed, type_mismatch, EvalError, EvalResult,
};
use crate::print_handler::{PrintHandler, Stream};
use crate::value::{TypeDescriptor, Value, ValueTag};

/// Run `builtin` on an already evaluated argument.
pub fn call_builtin(builtin: Builtin, arg: &Value, print: &PrintHandler) -> EvalResult {
    match builtin {
        Builtin::Abs => abs(arg),
        Builtin::Ceil => math(arg, f64::ceil),
        Builtin::Floor => math(arg, f64::floor),
        Builtin::Sqrt => math(arg, f64::sqrt),
        Builtin::Log => math(arg, f64::ln),
        Builtin::Sin => math(arg, f64::sin),
        Builtin::Cos => math(arg, f64::cos),
        Builtin::Tan => math(arg, f64::tan),
        Builtin::TypeOf => Ok(Value::Type(type_of(arg))),
        Builtin::Hex => hex(arg),
        Builtin::Repr => Ok(Value::from(arg.repr())),
        Builtin::Print => {
            print.println(Stream::Out, &arg.repr());
            Ok(Value::Boolean(true))
        }
        Builtin::PrintErr => {
            print.println(Stream::Err, &arg.repr());
            Ok(Value::Boolean(true))
        }
        Builtin::Assert => {
            if arg.is_truthy() {
                Ok(Value::Boolean(true))
            } else {
                Err(assertion_failed())
            }
        }
        Builtin::CastByte => {
            let n = integral(arg, "byte")?;
            u8::try_from(n)
                .map(|b| Value::UInt(u64::from(b)))
                .map_err(|_| conversion_failed(arg.type_name(), "byte"))
        }
        Builtin::CastChar => {
            let n = integral(arg, "char")?;
            i8::try_from(n)
                .map(|c| Value::Int(i64::from(c)))
                .map_err(|_| conversion_failed(arg.type_name(), "char"))
        }
        Builtin::CastI32 => {
            let n = integral(arg, "i32")?;
            i32::try_from(n)
                .map(|v| Value::Int(i64::from(v)))
                .map_err(|_| conversion_failed(arg.type_name(), "i32"))
        }
        Builtin::CastU32 => {
            let n = integral(arg, "u32")?;
            u32::try_from(n)
                .map(|v| Value::UInt(u64::from(v)))
                .map_err(|_| conversion_failed(arg.type_name(), "u32"))
        }
        Builtin::CastI64 => {
            let n = integral(arg, "i64")?;
            i64::try_from(n)
                .map(Value::Int)
                .map_err(|_| conversion_failed(arg.type_name(), "i64"))
        }
        Builtin::CastU64 => {
            let n = integral(arg, "u64")?;
            u64::try_from(n)
                .map(Value::UInt)
                .map_err(|_| conversion_failed(arg.type_name(), "u64"))
        }
        Builtin::CastFloat => cast_float(arg),
        Builtin::CastDouble => numeric(arg, "double").map(Value::Number),
        Builtin::CastBool => match arg {
            Value::Number(_)
            | Value::Int(_)
            | Value::UInt(_)
            | Value::Boolean(_)
            | Value::Str(_)
            | Value::Null
            | Value::Native(_) => Ok(Value::Boolean(arg.is_truthy())),
            other => Err(conversion_failed(other.type_name(), "bool")),
        },
    }
}

fn abs(arg: &Value) -> EvalResult {
    match arg {
        Value::Number(n) => Ok(Value::Number(n.abs())),
        Value::Int(n) => n
            .checked_abs()
            .map(Value::Int)
            .ok_or_else(|| conversion_failed(&n.to_string(), "int")),
        Value::UInt(n) => Ok(Value::UInt(*n)),
        other => Err(type_mismatch("number", other.type_name())),
    }
}

/// Numeric view for math and float casts. Enums are not numbers here.
fn numeric(arg: &Value, to: &str) -> Result<f64, EvalError> {
    let n = match arg {
        Value::Enum(_) => None,
        other => other.to_number(),
    };
    n.ok_or_else(|| conversion_failed(arg.type_name(), to))
}

fn math(arg: &Value, f: fn(f64) -> f64) -> EvalResult {
    numeric(arg, "number").map(|n| Value::Number(f(n)))
}

/// Integer view for the integral casts. Doubles truncate toward zero.
#[expect(
    clippy::cast_possible_truncation,
    reason = "saturating cast; targets are range-checked by the caller"
)]
fn integral(arg: &Value, to: &str) -> Result<i128, EvalError> {
    match arg {
        Value::Int(n) => Ok(i128::from(*n)),
        Value::UInt(n) => Ok(i128::from(*n)),
        other => {
            let n = numeric(other, to)?;
            if !n.is_finite() {
                return Err(conversion_failed(other.type_name(), to));
            }
            Ok(n.trunc() as i128)
        }
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "magnitude is checked against f32::MAX first"
)]
fn cast_float(arg: &Value) -> EvalResult {
    let n = numeric(arg, "float")?;
    if n.is_finite() && n.abs() > f64::from(f32::MAX) {
        return Err(conversion_failed(arg.type_name(), "float"));
    }
    Ok(Value::Number(f64::from(n as f32)))
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "doubles outside the i64 range saturate, like the C conversion"
)]
fn hex(arg: &Value) -> EvalResult {
    let text = match arg {
        Value::Number(n) if n.is_finite() => format!("0x{:x}", n.trunc() as i64),
        Value::Number(_) => return Err(conversion_failed("number", "hex")),
        Value::Int(n) => format!("0x{n:x}"),
        Value::UInt(n) => format!("0x{n:x}"),
        other => return Err(type_mismatch("number", other.type_name())),
    };
    Ok(Value::from(text))
}

/// Runtime type of `value` as a type descriptor.
pub fn type_of(value: &Value) -> TypeDescriptor {
    match value {
        Value::Native(h) => h.type_desc.clone(),
        Value::Enum(e) => e.type_desc.clone(),
        Value::Type(_) => TypeDescriptor::fundamental(ValueTag::Type),
        other => TypeDescriptor::fundamental(other.tag()),
    }
}
