//! Operator dispatch.
//!
//! Two tiers. The fast tier is a hash table keyed on the operator and the
//! operand tags, built once on first use and shared by every thread. It only
//! holds fundamental tags. Everything else (enumerations, type descriptors,
//! handles, string arrays, string coercion) goes to an ordered list of
//! predicate-guarded rules. No match in either tier is a type mismatch.

mod fast;
mod slow;

use stencil_ir::{BinaryOp, UnaryOp};

use crate::errors::EvalResult;
use crate::value::Value;

pub use fast::{fast_table, FastTable};

/// Any operator that goes through dispatch.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Operator {
    Binary(BinaryOp),
    Unary(UnaryOp),
}

impl Operator {
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Binary(op) => op.as_symbol(),
            Self::Unary(op) => op.as_symbol(),
        }
    }
}

impl From<BinaryOp> for Operator {
    fn from(op: BinaryOp) -> Self {
        Self::Binary(op)
    }
}

impl From<UnaryOp> for Operator {
    fn from(op: UnaryOp) -> Self {
        Self::Unary(op)
    }
}

/// Apply `op` to one operand (`right` is `None`) or two.
pub fn apply(op: Operator, left: &Value, right: Option<&Value>) -> EvalResult {
    match (op, right) {
        (Operator::Binary(op), Some(right)) => evaluate_binary(left, right, op),
        (Operator::Unary(op), None) => evaluate_unary(left, op),
        (Operator::Binary(op), None) => Err(crate::errors::unary_type_mismatch(
            op.as_symbol(),
            left.type_name(),
        )),
        (Operator::Unary(op), Some(right)) => Err(crate::errors::binary_type_mismatch(
            op.as_symbol(),
            left.type_name(),
            right.type_name(),
        )),
    }
}

/// Evaluate a binary operation.
pub fn evaluate_binary(left: &Value, right: &Value, op: BinaryOp) -> EvalResult {
    if let Some(handler) = fast_table().binary(op, left.tag(), right.tag()) {
        return handler(op, left, right);
    }
    slow::evaluate_binary(left, right, op)
}

/// Evaluate a unary operation.
pub fn evaluate_unary(operand: &Value, op: UnaryOp) -> EvalResult {
    if let Some(handler) = fast_table().unary(op, operand.tag()) {
        return handler(op, operand);
    }
    slow::evaluate_unary(operand, op)
}

/// Boolean result of `==` or `!=` given whether the operands are equal.
#[inline]
fn equality_result(op: BinaryOp, equal: bool) -> Value {
    Value::Boolean(if op == BinaryOp::NotEq { !equal } else { equal })
}

#[cfg(test)]
mod tests;
