use std::rc::Rc;

use super::*;
use crate::errors::ErrorCode;
use crate::value::{EnumValue, NativeHandle, TypeDescriptor};
use pretty_assertions::assert_eq;

fn binary(op: BinaryOp, left: impl Into<Value>, right: impl Into<Value>) -> EvalResult {
    evaluate_binary(&left.into(), &right.into(), op)
}

fn code(result: EvalResult) -> Option<ErrorCode> {
    result.err().map(|e| e.code())
}

#[test]
fn number_arithmetic() {
    assert_eq!(binary(BinaryOp::Add, 2.0, 3.0).ok(), Some(Value::Number(5.0)));
    assert_eq!(binary(BinaryOp::Sub, 2.0, 3.0).ok(), Some(Value::Number(-1.0)));
    assert_eq!(binary(BinaryOp::Mul, 2.0, 3.0).ok(), Some(Value::Number(6.0)));
    assert_eq!(binary(BinaryOp::Div, 3.0, 2.0).ok(), Some(Value::Number(1.5)));
}

#[test]
fn division_by_zero_fails() {
    assert_eq!(code(binary(BinaryOp::Div, 1.0, 0.0)), Some(ErrorCode::DivideByZero));
    assert_eq!(code(binary(BinaryOp::Div, 1.0, -0.0)), Some(ErrorCode::DivideByZero));
}

#[test]
fn number_comparisons() {
    assert_eq!(binary(BinaryOp::Lt, 1.0, 2.0).ok(), Some(Value::Boolean(true)));
    assert_eq!(binary(BinaryOp::GtEq, 2.0, 2.0).ok(), Some(Value::Boolean(true)));
    assert_eq!(binary(BinaryOp::Gt, 1.0, 2.0).ok(), Some(Value::Boolean(false)));
    assert_eq!(binary(BinaryOp::NotEq, 1.0, 2.0).ok(), Some(Value::Boolean(true)));
    assert_eq!(
        binary(BinaryOp::Eq, f64::NAN, f64::NAN).ok(),
        Some(Value::Boolean(false))
    );
}

#[test]
fn mixed_integer_comparisons() {
    assert_eq!(binary(BinaryOp::Eq, 3_i64, 3.0).ok(), Some(Value::Boolean(true)));
    assert_eq!(binary(BinaryOp::Lt, 2.5, 3_u64).ok(), Some(Value::Boolean(true)));
    assert_eq!(binary(BinaryOp::GtEq, -1_i64, 0.0).ok(), Some(Value::Boolean(false)));
    // No arithmetic between integers and doubles.
    assert_eq!(code(binary(BinaryOp::Add, 1_i64, 1.0)), Some(ErrorCode::TypeMismatch));
}

#[test]
fn string_repetition() {
    assert_eq!(binary(BinaryOp::Mul, "ab", 3.0).ok(), Some(Value::from("ababab")));
    assert_eq!(binary(BinaryOp::Mul, 2.0, "ab").ok(), Some(Value::from("abab")));
    assert_eq!(binary(BinaryOp::Mul, "ab", 2.9).ok(), Some(Value::from("abab")));
    assert_eq!(binary(BinaryOp::Mul, "ab", 0.0).ok(), Some(Value::from("")));
    assert_eq!(binary(BinaryOp::Mul, "ab", -1.0).ok(), Some(Value::from("")));
    assert_eq!(code(binary(BinaryOp::Mul, "ab", 1e18)), Some(ErrorCode::RuntimeError));
}

#[test]
fn string_concatenation_and_coercion() {
    assert_eq!(binary(BinaryOp::Add, "a", "b").ok(), Some(Value::from("ab")));
    assert_eq!(binary(BinaryOp::Add, "x=", 5.0).ok(), Some(Value::from("x=5")));
    assert_eq!(binary(BinaryOp::Add, 5.0, "=x").ok(), Some(Value::from("5=x")));
    assert_eq!(binary(BinaryOp::Add, "ok? ", true).ok(), Some(Value::from("ok? true")));
    assert_eq!(binary(BinaryOp::Add, "v", Value::Null).ok(), Some(Value::from("vnull")));
}

#[test]
fn string_equality() {
    assert_eq!(binary(BinaryOp::Eq, "a", "a").ok(), Some(Value::Boolean(true)));
    assert_eq!(binary(BinaryOp::NotEq, "a", "b").ok(), Some(Value::Boolean(true)));
    assert_eq!(code(binary(BinaryOp::Lt, "a", "b")), Some(ErrorCode::TypeMismatch));
}

#[test]
fn boolean_and_null_equality() {
    assert_eq!(binary(BinaryOp::Eq, true, true).ok(), Some(Value::Boolean(true)));
    assert_eq!(binary(BinaryOp::NotEq, true, false).ok(), Some(Value::Boolean(true)));
    assert_eq!(
        binary(BinaryOp::Eq, Value::Null, Value::Null).ok(),
        Some(Value::Boolean(true))
    );
    assert_eq!(
        binary(BinaryOp::Eq, "s", Value::Null).ok(),
        Some(Value::Boolean(false))
    );
    assert_eq!(
        code(binary(BinaryOp::Eq, 1.0, Value::Null)),
        Some(ErrorCode::TypeMismatch)
    );
}

#[test]
fn null_handles_equal_null() {
    let widget = TypeDescriptor::new("Widget");
    let null_handle = Value::Native(NativeHandle::null(widget.clone()));
    let live = Value::object(widget, Rc::new(1_u8));

    assert_eq!(
        binary(BinaryOp::Eq, null_handle, Value::Null).ok(),
        Some(Value::Boolean(true))
    );
    assert_eq!(
        binary(BinaryOp::NotEq, Value::Null, live).ok(),
        Some(Value::Boolean(true))
    );
}

#[test]
fn handle_identity() {
    let widget = TypeDescriptor::new("Widget");
    let a = Value::object(widget.clone(), Rc::new(1_u8));
    let b = a.clone();
    let c = Value::object(widget, Rc::new(1_u8));

    assert_eq!(binary(BinaryOp::Eq, a.clone(), b).ok(), Some(Value::Boolean(true)));
    assert_eq!(binary(BinaryOp::Eq, a, c).ok(), Some(Value::Boolean(false)));
}

#[test]
fn enum_compares_with_string_by_nick() {
    let mode = TypeDescriptor::new("Mode");
    let fast = Value::Enum(EnumValue::new(mode.clone(), 1, "fast"));

    assert_eq!(binary(BinaryOp::Eq, fast.clone(), "fast").ok(), Some(Value::Boolean(true)));
    assert_eq!(binary(BinaryOp::Eq, "slow", fast.clone()).ok(), Some(Value::Boolean(false)));
    assert_eq!(binary(BinaryOp::NotEq, "slow", fast.clone()).ok(), Some(Value::Boolean(true)));

    let also_fast = Value::Enum(EnumValue::new(mode, 1, "fast"));
    assert_eq!(binary(BinaryOp::Eq, fast, also_fast).ok(), Some(Value::Boolean(true)));
}

#[test]
fn type_equality_accepts_subtypes_on_the_right() {
    let object = TypeDescriptor::new("Object");
    let widget = TypeDescriptor::derived("Widget", &object, &[]);

    assert_eq!(
        binary(BinaryOp::Eq, object.clone(), widget.clone()).ok(),
        Some(Value::Boolean(true))
    );
    assert_eq!(
        binary(BinaryOp::Eq, widget, object).ok(),
        Some(Value::Boolean(false))
    );
}

#[test]
fn strv_equality() {
    assert_eq!(
        binary(BinaryOp::Eq, Value::strv(["a", "b"]), Value::strv(["a", "b"])).ok(),
        Some(Value::Boolean(true))
    );
    assert_eq!(
        binary(BinaryOp::NotEq, Value::strv(["a"]), Value::strv(["a", "b"])).ok(),
        Some(Value::Boolean(true))
    );
}

#[test]
fn unmatched_pairs_are_type_mismatches() {
    let err = binary(BinaryOp::Sub, "a", 1.0).err();
    assert_eq!(
        err.map(|e| e.message),
        Some("type mismatch (-): string and number".to_string())
    );
    assert_eq!(code(binary(BinaryOp::Add, true, 1.0)), Some(ErrorCode::TypeMismatch));
    assert_eq!(
        code(binary(BinaryOp::Mul, Value::strv(["a"]), 2.0)),
        Some(ErrorCode::TypeMismatch)
    );
}

#[test]
fn unary_operators() {
    assert_eq!(evaluate_unary(&Value::Number(2.0), UnaryOp::Neg).ok(), Some(Value::Number(-2.0)));
    assert_eq!(evaluate_unary(&Value::from(""), UnaryOp::Not).ok(), Some(Value::Boolean(true)));
    assert_eq!(evaluate_unary(&Value::Number(3.0), UnaryOp::Not).ok(), Some(Value::Boolean(false)));
    assert_eq!(
        code(evaluate_unary(&Value::from("a"), UnaryOp::Neg)),
        Some(ErrorCode::TypeMismatch)
    );
}

#[test]
fn apply_checks_operand_count() {
    let two = Value::Number(2.0);
    assert_eq!(
        apply(Operator::Binary(BinaryOp::Mul), &two, Some(&two)).ok(),
        Some(Value::Number(4.0))
    );
    assert_eq!(apply(UnaryOp::Neg.into(), &two, None).ok(), Some(Value::Number(-2.0)));
    assert_eq!(
        code(apply(BinaryOp::Add.into(), &two, None)),
        Some(ErrorCode::TypeMismatch)
    );
}

#[test]
fn fast_table_is_built_once() {
    let first: *const FastTable = fast_table();
    let second: *const FastTable = fast_table();
    assert!(std::ptr::eq(first, second));
    assert!(!fast_table().is_empty());
}

#[test]
fn fast_table_is_shared_across_threads() {
    let local = fast_table() as *const FastTable as usize;
    let remote = std::thread::spawn(|| fast_table() as *const FastTable as usize)
        .join()
        .unwrap_or_default();
    assert_eq!(local, remote);
}

#[test]
fn non_fundamental_tags_skip_the_fast_table() {
    use crate::value::ValueTag;
    assert!(fast_table()
        .binary(BinaryOp::Eq, ValueTag::Type, ValueTag::Type)
        .is_none());
    assert!(fast_table()
        .binary(BinaryOp::Add, ValueTag::Number, ValueTag::Number)
        .is_some());
}
