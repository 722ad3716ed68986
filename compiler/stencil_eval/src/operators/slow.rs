//! Predicate-guarded operator rules, tried in order after the fast table misses.

use stencil_ir::{BinaryOp, UnaryOp};

use super::equality_result;
use crate::errors::{binary_type_mismatch, null_comparison, unary_type_mismatch, EvalResult};
use crate::value::Value;

struct BinaryRule {
    name: &'static str,
    matches: fn(BinaryOp, &Value, &Value) -> bool,
    apply: fn(BinaryOp, &Value, &Value) -> EvalResult,
}

/// Binary rules in priority order. The first match wins.
static BINARY_RULES: &[BinaryRule] = &[
    BinaryRule {
        name: "enum-string-equality",
        matches: |op, l, r| {
            op.is_equality()
                && matches!(
                    (l, r),
                    (Value::Str(_), Value::Enum(_)) | (Value::Enum(_), Value::Str(_))
                )
        },
        apply: enum_string_equality,
    },
    BinaryRule {
        name: "enum-equality",
        matches: |op, l, r| op.is_equality() && matches!((l, r), (Value::Enum(_), Value::Enum(_))),
        apply: enum_equality,
    },
    BinaryRule {
        name: "type-equality",
        matches: |op, l, r| op.is_equality() && matches!((l, r), (Value::Type(_), Value::Type(_))),
        apply: type_equality,
    },
    BinaryRule {
        name: "null-equality",
        matches: |op, l, r| op.is_equality() && (l.is_null() || r.is_null()),
        apply: null_equality,
    },
    BinaryRule {
        name: "strv-equality",
        matches: |op, l, r| op.is_equality() && matches!((l, r), (Value::StrV(_), Value::StrV(_))),
        apply: strv_equality,
    },
    BinaryRule {
        name: "handle-identity",
        matches: |op, l, r| {
            op.is_equality() && matches!((l, r), (Value::Native(_), Value::Native(_)))
        },
        apply: handle_identity,
    },
    BinaryRule {
        name: "string-coercion",
        matches: |op, l, r| {
            op == BinaryOp::Add && (matches!(l, Value::Str(_)) || matches!(r, Value::Str(_)))
        },
        apply: concat_coerced,
    },
];

pub(super) fn evaluate_binary(left: &Value, right: &Value, op: BinaryOp) -> EvalResult {
    if let Some(rule) = BINARY_RULES.iter().find(|rule| (rule.matches)(op, left, right)) {
        tracing::trace!(rule = rule.name, op = op.as_symbol(), "slow operator rule");
        return (rule.apply)(op, left, right);
    }
    Err(binary_type_mismatch(
        op.as_symbol(),
        left.type_name(),
        right.type_name(),
    ))
}

pub(super) fn evaluate_unary(operand: &Value, op: UnaryOp) -> EvalResult {
    match op {
        UnaryOp::Not => Ok(Value::Boolean(!operand.is_truthy())),
        UnaryOp::Neg => Err(unary_type_mismatch(op.as_symbol(), operand.type_name())),
    }
}

fn enum_string_equality(op: BinaryOp, left: &Value, right: &Value) -> EvalResult {
    let equal = match (left, right) {
        (Value::Str(s), Value::Enum(e)) | (Value::Enum(e), Value::Str(s)) => **s == *e.nick,
        _ => false,
    };
    Ok(equality_result(op, equal))
}

fn enum_equality(op: BinaryOp, left: &Value, right: &Value) -> EvalResult {
    let equal = match (left, right) {
        (Value::Enum(a), Value::Enum(b)) => a.type_desc == b.type_desc && a.value == b.value,
        _ => false,
    };
    Ok(equality_result(op, equal))
}

/// Types are equal when identical or when the right side derives from the left.
fn type_equality(op: BinaryOp, left: &Value, right: &Value) -> EvalResult {
    let equal = match (left, right) {
        (Value::Type(a), Value::Type(b)) => b.is_a(a),
        _ => false,
    };
    Ok(equality_result(op, equal))
}

/// Comparison against `null`. Only kinds that can carry a null are accepted.
fn null_equality(op: BinaryOp, left: &Value, right: &Value) -> EvalResult {
    let other = if left.is_null() { right } else { left };
    let is_null = match other {
        Value::Null => true,
        Value::Native(h) => h.is_null(),
        Value::Str(_) | Value::StrV(_) | Value::Type(_) | Value::Closure(_) => false,
        Value::Number(_) | Value::Int(_) | Value::UInt(_) | Value::Boolean(_) | Value::Enum(_) => {
            return Err(null_comparison(other.type_name()));
        }
    };
    Ok(equality_result(op, is_null))
}

fn strv_equality(op: BinaryOp, left: &Value, right: &Value) -> EvalResult {
    let equal = match (left, right) {
        (Value::StrV(a), Value::StrV(b)) => a == b,
        _ => false,
    };
    Ok(equality_result(op, equal))
}

fn handle_identity(op: BinaryOp, left: &Value, right: &Value) -> EvalResult {
    let equal = match (left, right) {
        (Value::Native(a), Value::Native(b)) => a.same_object(b),
        _ => false,
    };
    Ok(equality_result(op, equal))
}

/// `+` with a string on either side stringifies the other side.
fn concat_coerced(_op: BinaryOp, left: &Value, right: &Value) -> EvalResult {
    Ok(Value::string(format!("{left}{right}")))
}
