//! Stencil Eval - expression evaluator for the Stencil template engine.
//!
//! Templates compute values with a small dynamically typed expression
//! language. This crate evaluates the trees built by `stencil_ir`.
//!
//! # Architecture
//!
//! - `Value`: closed set of runtime values, with truthiness, display and `repr`
//! - `Scope`/`Symbol`: chained symbol tables with optional lazy resolvers
//! - `operators`: two-tier dispatch, a fast table keyed on
//!   `(operator, tag, tag)` and an ordered list of predicate rules behind it
//! - `Interpreter`: the tree walk, configured through `InterpreterBuilder`
//! - `Bridge`: the protocol for host objects, with `RegistryBridge` as an
//!   adapter over registered namespaces and types
//!
//! # Example
//!
//! ```
//! use stencil_eval::{evaluate, Scope, Value};
//! use stencil_ir::{BinaryOp, Expr};
//!
//! let scope = Scope::new();
//! scope.bind_value("name", "world");
//! let expr = Expr::binary(BinaryOp::Add, Expr::string("hello "), Expr::symbol("name"));
//! assert_eq!(evaluate(&expr, &scope).ok(), Some(Value::from("hello world")));
//! ```

pub mod bridge;
mod builtins;
mod diagnostics;
mod environment;
pub mod errors;
mod eval_mode;
pub mod interpreter;
mod methods;
pub mod operators;
mod print_handler;
mod shared;
mod symbol;
mod value;

pub use bridge::{Bridge, NoBridge, RegistryBridge};
pub use builtins::{call_builtin, type_of};
pub use diagnostics::CallStack;
pub use environment::{Resolver, Scope};
pub use errors::{ErrorCode, EvalBacktrace, EvalError, EvalErrorKind, EvalResult};
pub use eval_mode::{EvalMode, DEFAULT_SANDBOX_CALL_DEPTH, DEFAULT_SANDBOX_LOOP_ITERATIONS};
pub use interpreter::{evaluate, Interpreter, InterpreterBuilder};
pub use methods::{dispatch_core_method, is_core_receiver, CORE_METHODS};
pub use operators::{apply, evaluate_binary, evaluate_unary, Operator};
pub use print_handler::{
    buffer_handler, console_handler, silent_handler, BufferPrintHandler, PrintHandler,
    SharedPrintHandler, Stream,
};
pub use shared::LocalCell;
pub use symbol::{Symbol, SymbolKind};
pub use value::{
    format_number, ClosureValue, EnumValue, HandleKind, NativeHandle, TypeDescriptor, Value,
    ValueIter, ValueTag,
};
