//! Tree-walking interpreter for template expressions.
//!
//! # Architecture
//!
//! [`Interpreter::eval`] is the entry point. Each node is evaluated by
//! `eval_expr`, which wraps the recursion in `ensure_sufficient_stack` so
//! deeply nested trees grow the stack instead of overflowing it. Function
//! application lives in `calls.rs`.
//!
//! Evaluation is single-threaded and strict: operands are evaluated left to
//! right, and the first error aborts the whole evaluation unchanged.
//!
//! # Scopes
//!
//! Every call gets a fresh child scope. Its parent is the closure's captured
//! scope for anonymous functions, and the call-site scope for named `def`
//! functions. Assignment always binds in the current scope.

mod builder;
mod calls;

pub use builder::InterpreterBuilder;

use std::rc::Rc;

use stencil_ir::{Expr, FuncDef, LogicalOp, UnaryOp};
use stencil_stack::ensure_sufficient_stack;

use crate::bridge::Bridge;
use crate::builtins::call_builtin;
use crate::diagnostics::CallStack;
use crate::environment::Scope;
use crate::errors::{
    empty_statement_list, invalid_op_code, loop_budget_exceeded, missing_symbol, not_a_value,
    not_an_object, EvalResult,
};
use crate::eval_mode::EvalMode;
use crate::methods::{dispatch_core_method, is_core_receiver};
use crate::operators::{evaluate_binary, evaluate_unary};
use crate::print_handler::SharedPrintHandler;
use crate::value::{ClosureValue, Value};

/// Evaluates expression trees against a scope.
///
/// Holds the collaborators an evaluation needs: the host bridge, the print
/// destination, the evaluation mode, and the call stack of active functions.
pub struct Interpreter {
    bridge: Rc<dyn Bridge>,
    print_handler: SharedPrintHandler,
    mode: EvalMode,
    call_stack: CallStack,
}

impl Interpreter {
    /// Interpreter with no bridge, console output, and `Interpret` mode.
    pub fn new() -> Self {
        InterpreterBuilder::new().build()
    }

    pub fn builder() -> InterpreterBuilder {
        InterpreterBuilder::new()
    }

    pub fn mode(&self) -> &EvalMode {
        &self.mode
    }

    pub fn print_handler(&self) -> &SharedPrintHandler {
        &self.print_handler
    }

    pub fn bridge(&self) -> &dyn Bridge {
        &*self.bridge
    }

    /// Number of function calls currently active.
    pub fn call_depth(&self) -> usize {
        self.call_stack.depth()
    }

    /// Evaluate `expr` in `scope`.
    #[tracing::instrument(level = "trace", skip_all)]
    pub fn eval(&mut self, expr: &Expr, scope: &Scope) -> EvalResult {
        self.eval_expr(expr, scope)
    }

    fn eval_expr(&mut self, expr: &Expr, scope: &Scope) -> EvalResult {
        ensure_sufficient_stack(|| self.eval_inner(expr, scope))
    }

    fn eval_inner(&mut self, expr: &Expr, scope: &Scope) -> EvalResult {
        match expr {
            Expr::Number(n) => Ok(Value::Number(*n)),
            Expr::Boolean(b) => Ok(Value::Boolean(*b)),
            Expr::String(s) => Ok(Value::from(s.as_str())),
            Expr::Null | Expr::Nop => Ok(Value::Null),

            Expr::Binary { op, left, right } => {
                let left = self.eval_expr(left, scope)?;
                let right = self.eval_expr(right, scope)?;
                evaluate_binary(&left, &right, *op)
            }
            Expr::Unary { op, operand } => {
                let value = self.eval_expr(operand, scope)?;
                match op {
                    UnaryOp::Not => Ok(Value::Boolean(!value.is_truthy())),
                    UnaryOp::Neg => evaluate_unary(&value, *op),
                }
            }
            Expr::Logical { op, left, right } => self.eval_logical(*op, left, right, scope),

            Expr::If {
                condition,
                then_branch,
                else_branch,
            } => {
                let branch = if self.eval_expr(condition, scope)?.is_truthy() {
                    then_branch
                } else {
                    else_branch
                };
                match branch {
                    Some(branch) => self.eval_expr(branch, scope),
                    None => Ok(Value::Null),
                }
            }
            Expr::While { condition, body } => self.eval_while(condition, body.as_deref(), scope),
            Expr::StmtList(stmts) => {
                let (last, init) = stmts.split_last().ok_or_else(empty_statement_list)?;
                for stmt in init {
                    self.eval_expr(stmt, scope)?;
                }
                self.eval_expr(last, scope)
            }

            Expr::SymbolRef(name) => {
                let symbol = scope.peek(name).ok_or_else(|| missing_symbol(name))?;
                symbol.value().ok_or_else(|| not_a_value(name))
            }
            Expr::SymbolAssign { name, value } => {
                let value = self.eval_expr(value, scope)?;
                scope.bind_value(name, value.clone());
                Ok(value)
            }
            Expr::Args { .. } => {
                let mut last = Value::Null;
                for arg in expr.arg_iter() {
                    last = self.eval_expr(arg, scope)?;
                }
                Ok(last)
            }

            Expr::BuiltinCall { builtin, arg } => {
                let arg = self.eval_expr(arg, scope)?;
                call_builtin(*builtin, &arg, &self.print_handler)
            }
            Expr::AnonCall { callee, args } => {
                self.eval_anon_call(callee, args.as_deref(), scope)
            }
            Expr::UserCall { name, args } => self.eval_user_call(name, args.as_deref(), scope),
            Expr::NativeCall {
                object,
                method,
                args,
            } => {
                let receiver = self.eval_expr(object, scope)?;
                let args = self.eval_args(args.as_deref(), scope)?;
                if is_core_receiver(&receiver) {
                    dispatch_core_method(&receiver, method, &args)
                } else {
                    self.bridge.invoke(&receiver, method, &args)
                }
            }

            Expr::GetAttr { object, attr } => {
                let receiver = self.eval_object(object, attr, scope)?;
                self.bridge.get_attribute(&receiver, attr)
            }
            Expr::SetAttr {
                object,
                attr,
                value,
            } => {
                let receiver = self.eval_object(object, attr, scope)?;
                let value = self.eval_expr(value, scope)?;
                self.bridge.set_attribute(&receiver, attr, value)
            }

            Expr::Require { namespace, version } => {
                scope.require(&*self.bridge, namespace, version.as_deref())
            }
            Expr::Func(def) => Ok(Self::define(def, scope)),

            _ => Err(invalid_op_code()),
        }
    }

    /// Short-circuit `&&`/`||`. The result is always a boolean.
    fn eval_logical(
        &mut self,
        op: LogicalOp,
        left: &Expr,
        right: &Expr,
        scope: &Scope,
    ) -> EvalResult {
        let left = self.eval_expr(left, scope)?.is_truthy();
        let result = match op {
            LogicalOp::And => left && self.eval_expr(right, scope)?.is_truthy(),
            LogicalOp::Or => left || self.eval_expr(right, scope)?.is_truthy(),
        };
        Ok(Value::Boolean(result))
    }

    /// The value of the last iteration, or `Null` when the body never runs.
    fn eval_while(&mut self, condition: &Expr, body: Option<&Expr>, scope: &Scope) -> EvalResult {
        let Some(body) = body else {
            self.eval_expr(condition, scope)?;
            return Ok(Value::Null);
        };

        let budget = self.mode.loop_budget();
        let mut iterations: u64 = 0;
        let mut result = Value::Null;
        while self.eval_expr(condition, scope)?.is_truthy() {
            if let Some(limit) = budget {
                if iterations >= limit {
                    return Err(loop_budget_exceeded(limit));
                }
            }
            iterations += 1;
            result = self.eval_expr(body, scope)?;
        }
        Ok(result)
    }

    /// Evaluate the receiver of an attribute access. Only native handles have attributes.
    fn eval_object(&mut self, object: &Expr, attr: &str, scope: &Scope) -> EvalResult {
        let receiver = self.eval_expr(object, scope)?;
        if matches!(receiver, Value::Native(_)) {
            Ok(receiver)
        } else {
            Err(not_an_object(attr, receiver.type_name()))
        }
    }

    /// Named definitions install a symbol and yield `Null`; anonymous ones
    /// yield a closure over `scope`.
    fn define(def: &FuncDef, scope: &Scope) -> Value {
        match &def.name {
            Some(name) => {
                tracing::debug!(function = %name, params = def.params.len(), "define");
                scope.bind_expr(name, Rc::clone(&def.params), Rc::clone(&def.body));
                Value::Null
            }
            None => Value::Closure(ClosureValue {
                name: None,
                params: Rc::clone(&def.params),
                body: Rc::clone(&def.body),
                captured: Some(scope.clone()),
            }),
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

/// Evaluate `expr` in `scope` with a default [`Interpreter`].
///
/// Assigning an anonymous function into the scope it captures keeps that
/// scope alive until [`Scope::clear`] is called.
pub fn evaluate(expr: &Expr, scope: &Scope) -> EvalResult {
    Interpreter::new().eval(expr, scope)
}
