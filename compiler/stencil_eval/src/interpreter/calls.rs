//! Function application: argument evaluation, arity checks, call frames.

use smallvec::SmallVec;
use stencil_ir::Expr;

use super::Interpreter;
use crate::environment::Scope;
use crate::errors::{arity_mismatch, missing_function, not_a_function, EvalError, EvalResult};
use crate::symbol::SymbolKind;
use crate::value::{ClosureValue, Value};

/// Evaluated call arguments. Most calls take few arguments.
pub(super) type ArgValues = SmallVec<[Value; 4]>;

impl Interpreter {
    /// Evaluate an argument cons-list left to right.
    pub(super) fn eval_args(
        &mut self,
        args: Option<&Expr>,
        scope: &Scope,
    ) -> Result<ArgValues, EvalError> {
        let mut values = ArgValues::new();
        if let Some(args) = args {
            for arg in args.arg_iter() {
                values.push(self.eval_expr(arg, scope)?);
            }
        }
        Ok(values)
    }

    pub(super) fn eval_anon_call(
        &mut self,
        callee: &Expr,
        args: Option<&Expr>,
        scope: &Scope,
    ) -> EvalResult {
        let callee = self.eval_expr(callee, scope)?;
        let Value::Closure(closure) = &callee else {
            return Err(not_a_function(callee.type_name()));
        };
        let args = self.eval_args(args, scope)?;
        self.call_closure(closure, &args, scope)
    }

    /// Call the function bound to `name`: a `def` symbol or a closure value.
    pub(super) fn eval_user_call(
        &mut self,
        name: &str,
        args: Option<&Expr>,
        scope: &Scope,
    ) -> EvalResult {
        let symbol = scope.peek(name).ok_or_else(|| missing_function(name))?;
        match symbol.kind() {
            SymbolKind::Expr { params, body } => {
                let args = self.eval_args(args, scope)?;
                self.apply(name, &params, &body, scope, &args)
            }
            SymbolKind::Value(Value::Closure(closure)) => {
                let args = self.eval_args(args, scope)?;
                self.call_closure(&closure, &args, scope)
            }
            SymbolKind::Value(_) | SymbolKind::Unbound => Err(not_a_function(name)),
        }
    }

    /// Call a closure value. Free names resolve through the captured scope
    /// when there is one, otherwise through the call site.
    pub fn call_closure(
        &mut self,
        closure: &ClosureValue,
        args: &[Value],
        call_site: &Scope,
    ) -> EvalResult {
        let parent = closure.captured.as_ref().unwrap_or(call_site);
        self.apply(closure.display_name(), &closure.params, &closure.body, parent, args)
    }

    /// Bind `args` to `params` in a fresh child of `parent` and evaluate `body`.
    ///
    /// The arity check happens before a frame is pushed or the body runs.
    fn apply(
        &mut self,
        name: &str,
        params: &[String],
        body: &Expr,
        parent: &Scope,
        args: &[Value],
    ) -> EvalResult {
        if args.len() != params.len() {
            return Err(arity_mismatch(name, params.len(), args.len()));
        }
        self.call_stack.push(name)?;
        tracing::debug!(
            function = name,
            args = args.len(),
            depth = self.call_stack.depth(),
            "apply"
        );

        let local = parent.new_child();
        for (param, arg) in params.iter().zip(args) {
            local.bind_value(param, arg.clone());
        }
        let result = self
            .eval_expr(body, &local)
            .map_err(|e| self.call_stack.attach_backtrace(e));

        self.call_stack.pop();
        result
    }
}
