//! Fast dispatch table for fundamental operand tags.

use std::cmp::Ordering;
use std::sync::OnceLock;

use rustc_hash::FxHashMap;
use stencil_ir::{BinaryOp, UnaryOp};

use super::equality_result;
use crate::errors::{binary_type_mismatch, divide_by_zero, unary_type_mismatch, EvalError, EvalResult};
use crate::value::{Value, ValueTag};

pub type BinaryHandler = fn(BinaryOp, &Value, &Value) -> EvalResult;
pub type UnaryHandler = fn(UnaryOp, &Value) -> EvalResult;

/// Pre-computed handlers keyed by operator and operand tags.
pub struct FastTable {
    binary: FxHashMap<(BinaryOp, ValueTag, ValueTag), BinaryHandler>,
    unary: FxHashMap<(UnaryOp, ValueTag), UnaryHandler>,
}

/// Upper bound on the size of a repeated string.
const MAX_REPEAT_BYTES: usize = 1 << 30;

const ARITHMETIC: [BinaryOp; 4] = [BinaryOp::Add, BinaryOp::Sub, BinaryOp::Mul, BinaryOp::Div];
const EQUALITY: [BinaryOp; 2] = [BinaryOp::Eq, BinaryOp::NotEq];
const COMPARISON: [BinaryOp; 6] = [
    BinaryOp::Eq,
    BinaryOp::NotEq,
    BinaryOp::Lt,
    BinaryOp::LtEq,
    BinaryOp::Gt,
    BinaryOp::GtEq,
];

impl FastTable {
    fn new() -> Self {
        use ValueTag::{Boolean, Int, Null, Number, Str, UInt};

        let mut table = FastTable {
            binary: FxHashMap::default(),
            unary: FxHashMap::default(),
        };

        table.add_all(&ARITHMETIC, Number, Number, number_arithmetic);
        table.add_all(&COMPARISON, Number, Number, compare_numbers);
        for (left, right) in [(Int, Number), (Number, Int), (UInt, Number), (Number, UInt)] {
            table.add_all(&COMPARISON, left, right, compare_numbers);
        }

        table.add(BinaryOp::Add, Str, Str, concat_strings);
        table.add_all(&EQUALITY, Str, Str, string_equality);
        table.add(BinaryOp::Mul, Str, Number, repeat_string);
        table.add(BinaryOp::Mul, Number, Str, repeat_string);

        table.add_all(&EQUALITY, Boolean, Boolean, boolean_equality);
        table.add_all(&EQUALITY, Null, Null, null_identity);

        table.unary.insert((UnaryOp::Neg, Number), negate_number);

        tracing::debug!(
            binary = table.binary.len(),
            unary = table.unary.len(),
            "built fast operator table"
        );
        table
    }

    fn add(&mut self, op: BinaryOp, left: ValueTag, right: ValueTag, handler: BinaryHandler) {
        debug_assert!(left.is_fundamental() && right.is_fundamental());
        self.binary.entry((op, left, right)).or_insert(handler);
    }

    fn add_all(&mut self, ops: &[BinaryOp], left: ValueTag, right: ValueTag, handler: BinaryHandler) {
        for &op in ops {
            self.add(op, left, right, handler);
        }
    }

    #[inline]
    pub fn binary(&self, op: BinaryOp, left: ValueTag, right: ValueTag) -> Option<BinaryHandler> {
        if !(left.is_fundamental() && right.is_fundamental()) {
            return None;
        }
        self.binary.get(&(op, left, right)).copied()
    }

    #[inline]
    pub fn unary(&self, op: UnaryOp, operand: ValueTag) -> Option<UnaryHandler> {
        if !operand.is_fundamental() {
            return None;
        }
        self.unary.get(&(op, operand)).copied()
    }

    /// Number of binary and unary entries.
    pub fn len(&self) -> usize {
        self.binary.len() + self.unary.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

static FAST_TABLE: OnceLock<FastTable> = OnceLock::new();

/// The process-wide fast table, built on first use.
pub fn fast_table() -> &'static FastTable {
    FAST_TABLE.get_or_init(FastTable::new)
}

#[cold]
fn mismatch(op: BinaryOp, left: &Value, right: &Value) -> EvalError {
    binary_type_mismatch(op.as_symbol(), left.type_name(), right.type_name())
}

#[expect(
    clippy::cast_precision_loss,
    reason = "integers are compared against doubles in double precision"
)]
fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => Some(*n),
        Value::Int(n) => Some(*n as f64),
        Value::UInt(n) => Some(*n as f64),
        _ => None,
    }
}

fn number_arithmetic(op: BinaryOp, left: &Value, right: &Value) -> EvalResult {
    let (Value::Number(a), Value::Number(b)) = (left, right) else {
        return Err(mismatch(op, left, right));
    };
    let result = match op {
        BinaryOp::Add => a + b,
        BinaryOp::Sub => a - b,
        BinaryOp::Mul => a * b,
        BinaryOp::Div => {
            if *b == 0.0 {
                return Err(divide_by_zero());
            }
            a / b
        }
        _ => return Err(mismatch(op, left, right)),
    };
    Ok(Value::Number(result))
}

fn compare_numbers(op: BinaryOp, left: &Value, right: &Value) -> EvalResult {
    let (Some(a), Some(b)) = (numeric(left), numeric(right)) else {
        return Err(mismatch(op, left, right));
    };
    let ordering = a.partial_cmp(&b);
    let result = match op {
        BinaryOp::Eq => ordering == Some(Ordering::Equal),
        BinaryOp::NotEq => ordering != Some(Ordering::Equal),
        BinaryOp::Lt => ordering == Some(Ordering::Less),
        BinaryOp::LtEq => matches!(ordering, Some(Ordering::Less | Ordering::Equal)),
        BinaryOp::Gt => ordering == Some(Ordering::Greater),
        BinaryOp::GtEq => matches!(ordering, Some(Ordering::Greater | Ordering::Equal)),
        _ => return Err(mismatch(op, left, right)),
    };
    Ok(Value::Boolean(result))
}

fn concat_strings(op: BinaryOp, left: &Value, right: &Value) -> EvalResult {
    let (Value::Str(a), Value::Str(b)) = (left, right) else {
        return Err(mismatch(op, left, right));
    };
    let mut out = String::with_capacity(a.len() + b.len());
    out.push_str(a);
    out.push_str(b);
    Ok(Value::string(out))
}

fn string_equality(op: BinaryOp, left: &Value, right: &Value) -> EvalResult {
    let (Value::Str(a), Value::Str(b)) = (left, right) else {
        return Err(mismatch(op, left, right));
    };
    Ok(equality_result(op, a == b))
}

/// `"ab" * 3` and `3 * "ab"`. The count truncates toward zero; a count at
/// or below zero gives the empty string.
fn repeat_string(op: BinaryOp, left: &Value, right: &Value) -> EvalResult {
    let (text, count) = match (left, right) {
        (Value::Str(s), Value::Number(n)) | (Value::Number(n), Value::Str(s)) => (s, *n),
        _ => return Err(mismatch(op, left, right)),
    };
    let count = count.trunc();
    if count.is_nan() || count <= 0.0 {
        return Ok(Value::string(""));
    }
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "count is positive and saturates"
    )]
    let count = count as usize;
    let fits = text
        .len()
        .checked_mul(count)
        .is_some_and(|len| len <= MAX_REPEAT_BYTES);
    if !fits {
        return Err(EvalError::new(format!(
            "string repetition of {} bytes by {count} is too large",
            text.len()
        )));
    }
    Ok(Value::string(text.repeat(count)))
}

fn boolean_equality(op: BinaryOp, left: &Value, right: &Value) -> EvalResult {
    let (Value::Boolean(a), Value::Boolean(b)) = (left, right) else {
        return Err(mismatch(op, left, right));
    };
    Ok(equality_result(op, a == b))
}

fn null_identity(op: BinaryOp, left: &Value, right: &Value) -> EvalResult {
    Ok(equality_result(op, left.is_null() && right.is_null()))
}

fn negate_number(op: UnaryOp, operand: &Value) -> EvalResult {
    match operand {
        Value::Number(n) => Ok(Value::Number(-n)),
        other => Err(unary_type_mismatch(op.as_symbol(), other.type_name())),
    }
}
