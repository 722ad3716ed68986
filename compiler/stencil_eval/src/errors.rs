//! Error types for expression evaluation.
//!
//! `EvalErrorKind` carries the structured data for each failure; `ErrorCode`
//! is the coarse category embedders switch on. Factory functions at the
//! bottom of this module are the public way to build errors. They fill in
//! both `kind` and `message`.

use std::fmt;

use crate::value::Value;

/// Result of evaluation.
pub type EvalResult = Result<Value, EvalError>;

/// Coarse error category reported to embedders.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    TypeMismatch,
    DivideByZero,
    MissingSymbol,
    NotAValue,
    NotAFunction,
    NotAnObject,
    NullPointerAccess,
    NoSuchProperty,
    NoSuchMethod,
    /// Call-time arity mismatch.
    SyntaxError,
    RuntimeError,
    InvalidOpCode,
    ConversionFailed,
    BridgeFailure,
    RecursionLimit,
    LoopBudgetExceeded,
}

impl ErrorCode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TypeMismatch => "type-mismatch",
            Self::DivideByZero => "divide-by-zero",
            Self::MissingSymbol => "missing-symbol",
            Self::NotAValue => "not-a-value",
            Self::NotAFunction => "not-a-function",
            Self::NotAnObject => "not-an-object",
            Self::NullPointerAccess => "null-pointer",
            Self::NoSuchProperty => "no-such-property",
            Self::NoSuchMethod => "no-such-method",
            Self::SyntaxError => "syntax-error",
            Self::RuntimeError => "runtime-error",
            Self::InvalidOpCode => "invalid-op-code",
            Self::ConversionFailed => "conversion-failed",
            Self::BridgeFailure => "bridge-failure",
            Self::RecursionLimit => "recursion-limit",
            Self::LoopBudgetExceeded => "loop-budget-exceeded",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed error category with the data needed to describe the failure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EvalErrorKind {
    // Operators
    BinaryTypeMismatch {
        op: &'static str,
        left: String,
        right: String,
    },
    UnaryTypeMismatch {
        op: &'static str,
        operand: String,
    },
    NullComparison {
        type_name: String,
    },
    TypeMismatch {
        expected: String,
        got: String,
    },
    DivideByZero,

    // Symbols
    MissingSymbol {
        name: String,
    },
    MissingFunction {
        name: String,
    },
    NotAValue {
        name: String,
    },
    NotAFunction {
        name: String,
    },

    // Objects
    NotAnObject {
        attr: String,
        type_name: String,
    },
    NullPointerAccess {
        member: String,
    },
    NoSuchProperty {
        property: String,
        type_name: String,
    },
    NoSuchMethod {
        method: String,
        type_name: String,
    },
    UnsupportedParameter {
        method: String,
        param: String,
    },
    BridgeFailure {
        message: String,
    },

    // Calls
    ArityMismatch {
        name: String,
        expected: usize,
        got: usize,
    },
    RecursionLimit {
        depth: usize,
    },
    LoopBudgetExceeded {
        limit: u64,
    },

    // Runtime
    AssertionFailed,
    EmptyStatementList,
    ConversionFailed {
        from: String,
        to: String,
    },
    InvalidOpCode,

    /// Anything without a dedicated variant. Reported as `RuntimeError`.
    Custom {
        message: String,
    },
}

impl EvalErrorKind {
    /// The category this failure is reported under.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::BinaryTypeMismatch { .. }
            | Self::UnaryTypeMismatch { .. }
            | Self::NullComparison { .. }
            | Self::TypeMismatch { .. } => ErrorCode::TypeMismatch,
            Self::DivideByZero => ErrorCode::DivideByZero,
            Self::MissingSymbol { .. } | Self::MissingFunction { .. } => ErrorCode::MissingSymbol,
            Self::NotAValue { .. } => ErrorCode::NotAValue,
            Self::NotAFunction { .. } => ErrorCode::NotAFunction,
            Self::NotAnObject { .. } => ErrorCode::NotAnObject,
            Self::NullPointerAccess { .. } => ErrorCode::NullPointerAccess,
            Self::NoSuchProperty { .. } => ErrorCode::NoSuchProperty,
            Self::NoSuchMethod { .. } => ErrorCode::NoSuchMethod,
            Self::UnsupportedParameter { .. } | Self::BridgeFailure { .. } => {
                ErrorCode::BridgeFailure
            }
            Self::ArityMismatch { .. } => ErrorCode::SyntaxError,
            Self::RecursionLimit { .. } => ErrorCode::RecursionLimit,
            Self::LoopBudgetExceeded { .. } => ErrorCode::LoopBudgetExceeded,
            Self::AssertionFailed | Self::EmptyStatementList | Self::Custom { .. } => {
                ErrorCode::RuntimeError
            }
            Self::ConversionFailed { .. } => ErrorCode::ConversionFailed,
            Self::InvalidOpCode => ErrorCode::InvalidOpCode,
        }
    }
}

impl fmt::Display for EvalErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Operators
            Self::BinaryTypeMismatch { op, left, right } => {
                write!(f, "type mismatch ({op}): {left} and {right}")
            }
            Self::UnaryTypeMismatch { op, operand } => {
                write!(f, "type mismatch ({op}): {operand}")
            }
            Self::NullComparison { type_name } => {
                write!(f, "cannot compare {type_name} for null equality")
            }
            Self::TypeMismatch { expected, got } => {
                write!(f, "type mismatch: expected {expected}, got {got}")
            }
            Self::DivideByZero => write!(f, "divide by zero"),

            // Symbols
            Self::MissingSymbol { name } => write!(f, "no such symbol \"{name}\" in scope"),
            Self::MissingFunction { name } => write!(f, "no such function \"{name}\""),
            Self::NotAValue { name } => write!(f, "\"{name}\" is not a value"),
            Self::NotAFunction { name } => write!(f, "\"{name}\" is not a function"),

            // Objects
            Self::NotAnObject { attr, type_name } => {
                write!(f, "cannot access \"{attr}\" of non-object {type_name}")
            }
            Self::NullPointerAccess { member } => {
                write!(f, "cannot access \"{member}\" of a null object")
            }
            Self::NoSuchProperty {
                property,
                type_name,
            } => write!(f, "no property \"{property}\" on {type_name}"),
            Self::NoSuchMethod { method, type_name } => {
                write!(f, "no method \"{method}\" on {type_name}")
            }
            Self::UnsupportedParameter { method, param } => write!(
                f,
                "{method}: parameter \"{param}\" is not an \"in\" parameter; only \"in\" parameters are supported"
            ),
            Self::BridgeFailure { message } => write!(f, "{message}"),

            // Calls
            Self::ArityMismatch {
                name,
                expected,
                got,
            } => {
                let arg_word = if *expected == 1 {
                    "argument"
                } else {
                    "arguments"
                };
                write!(f, "\"{name}\" takes {expected} {arg_word}, got {got}")
            }
            Self::RecursionLimit { depth } => {
                write!(f, "maximum call depth exceeded (limit: {depth})")
            }
            Self::LoopBudgetExceeded { limit } => {
                write!(f, "loop exceeded {limit} iterations")
            }

            // Runtime
            Self::AssertionFailed => write!(f, "assertion failed"),
            Self::EmptyStatementList => write!(f, "empty statement list"),
            Self::ConversionFailed { from, to } => write!(f, "cannot convert {from} to {to}"),
            Self::InvalidOpCode => write!(f, "invalid node in expression tree"),
            Self::Custom { message } => write!(f, "{message}"),
        }
    }
}

/// Snapshot of the user-function call chain at an error site.
///
/// Most recent call first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EvalBacktrace {
    frames: Vec<String>,
}

impl EvalBacktrace {
    pub fn new(frames: Vec<String>) -> Self {
        Self { frames }
    }

    pub fn frames(&self) -> &[String] {
        &self.frames
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl fmt::Display for EvalBacktrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.frames.is_empty() {
            return Ok(());
        }
        writeln!(f, "call backtrace:")?;
        for (i, name) in self.frames.iter().enumerate() {
            writeln!(f, "  {i}: {name}")?;
        }
        Ok(())
    }
}

/// Evaluation error.
#[derive(Clone, Debug)]
pub struct EvalError {
    pub kind: EvalErrorKind,
    /// Human-readable message. Equals `kind.to_string()` for factory-built errors.
    pub message: String,
    /// Call chain at the error site, attached by the interpreter.
    pub backtrace: Option<EvalBacktrace>,
    /// Secondary context lines.
    pub notes: Vec<String>,
}

impl EvalError {
    /// Create a `RuntimeError` with just a message.
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            kind: EvalErrorKind::Custom {
                message: message.clone(),
            },
            message,
            backtrace: None,
            notes: Vec::new(),
        }
    }

    fn from_kind(kind: EvalErrorKind) -> Self {
        let message = kind.to_string();
        Self {
            kind,
            message,
            backtrace: None,
            notes: Vec::new(),
        }
    }

    #[inline]
    pub fn code(&self) -> ErrorCode {
        self.kind.code()
    }

    #[must_use]
    pub fn with_backtrace(mut self, backtrace: EvalBacktrace) -> Self {
        self.backtrace = Some(backtrace);
        self
    }

    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code(), self.message)?;
        for note in &self.notes {
            write!(f, "\n  note: {note}")?;
        }
        Ok(())
    }
}

impl std::error::Error for EvalError {}

// Operator Errors

/// No handler for a binary operator and operand types.
#[cold]
pub fn binary_type_mismatch(op: &'static str, left: &str, right: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::BinaryTypeMismatch {
        op,
        left: left.to_string(),
        right: right.to_string(),
    })
}

/// No handler for a unary operator and operand type.
#[cold]
pub fn unary_type_mismatch(op: &'static str, operand: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UnaryTypeMismatch {
        op,
        operand: operand.to_string(),
    })
}

/// `x == null` where `x` can never be null.
#[cold]
pub fn null_comparison(type_name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NullComparison {
        type_name: type_name.to_string(),
    })
}

#[cold]
pub fn type_mismatch(expected: &str, got: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::TypeMismatch {
        expected: expected.to_string(),
        got: got.to_string(),
    })
}

#[cold]
pub fn divide_by_zero() -> EvalError {
    EvalError::from_kind(EvalErrorKind::DivideByZero)
}

// Symbol Errors

#[cold]
pub fn missing_symbol(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::MissingSymbol {
        name: name.to_string(),
    })
}

#[cold]
pub fn missing_function(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::MissingFunction {
        name: name.to_string(),
    })
}

/// The symbol is bound to something other than a plain value.
#[cold]
pub fn not_a_value(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotAValue {
        name: name.to_string(),
    })
}

#[cold]
pub fn not_a_function(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotAFunction {
        name: name.to_string(),
    })
}

// Object Errors

#[cold]
pub fn not_an_object(attr: &str, type_name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotAnObject {
        attr: attr.to_string(),
        type_name: type_name.to_string(),
    })
}

#[cold]
pub fn null_pointer_access(member: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NullPointerAccess {
        member: member.to_string(),
    })
}

#[cold]
pub fn no_such_property(property: &str, type_name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NoSuchProperty {
        property: property.to_string(),
        type_name: type_name.to_string(),
    })
}

#[cold]
pub fn no_such_method(method: &str, type_name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NoSuchMethod {
        method: method.to_string(),
        type_name: type_name.to_string(),
    })
}

/// A native method declares an `out` or `inout` parameter.
#[cold]
pub fn unsupported_parameter(method: &str, param: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UnsupportedParameter {
        method: method.to_string(),
        param: param.to_string(),
    })
}

#[cold]
pub fn bridge_failure(message: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::BridgeFailure {
        message: message.into(),
    })
}

// Call Errors

#[cold]
pub fn arity_mismatch(name: &str, expected: usize, got: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ArityMismatch {
        name: name.to_string(),
        expected,
        got,
    })
}

#[cold]
pub fn recursion_limit_exceeded(depth: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::RecursionLimit { depth })
}

#[cold]
pub fn loop_budget_exceeded(limit: u64) -> EvalError {
    EvalError::from_kind(EvalErrorKind::LoopBudgetExceeded { limit })
}

// Runtime Errors

#[cold]
pub fn assertion_failed() -> EvalError {
    EvalError::from_kind(EvalErrorKind::AssertionFailed)
}

#[cold]
pub fn empty_statement_list() -> EvalError {
    EvalError::from_kind(EvalErrorKind::EmptyStatementList)
}

#[cold]
pub fn conversion_failed(from: &str, to: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ConversionFailed {
        from: from.to_string(),
        to: to.to_string(),
    })
}

#[cold]
pub fn invalid_op_code() -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidOpCode)
}
