//! Named binding cells.
//!
//! A `Symbol` is shared: every clone refers to the same cell, so assigning
//! through one handle is visible through all of them. Scopes hand out
//! clones; closures and resolvers may keep them.

use std::fmt;
use std::rc::Rc;

use stencil_ir::Expr;

use crate::shared::LocalCell;
use crate::value::Value;

/// Current content of a symbol.
#[derive(Clone, Debug, Default)]
pub enum SymbolKind {
    /// Created by a lookup but never assigned.
    #[default]
    Unbound,
    Value(Value),
    /// Named function installed by a definition. The body is not evaluated
    /// until called.
    Expr {
        params: Rc<[String]>,
        body: Rc<Expr>,
    },
}

#[derive(Clone, Default)]
pub struct Symbol(LocalCell<SymbolKind>);

impl Symbol {
    /// A fresh unbound symbol.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(value: impl Into<Value>) -> Self {
        Symbol(LocalCell::new(SymbolKind::Value(value.into())))
    }

    pub fn with_expr(params: Rc<[String]>, body: Rc<Expr>) -> Self {
        Symbol(LocalCell::new(SymbolKind::Expr { params, body }))
    }

    /// Snapshot of the current content.
    pub fn kind(&self) -> SymbolKind {
        self.0.borrow().clone()
    }

    /// The bound value, if the symbol holds one.
    pub fn value(&self) -> Option<Value> {
        match &*self.0.borrow() {
            SymbolKind::Value(v) => Some(v.clone()),
            _ => None,
        }
    }

    pub fn is_unbound(&self) -> bool {
        matches!(*self.0.borrow(), SymbolKind::Unbound)
    }

    pub fn assign_value(&self, value: impl Into<Value>) {
        *self.0.borrow_mut() = SymbolKind::Value(value.into());
    }

    pub fn assign_expr(&self, params: Rc<[String]>, body: Rc<Expr>) {
        *self.0.borrow_mut() = SymbolKind::Expr { params, body };
    }

    /// Whether both handles refer to the same cell.
    pub fn same_cell(&self, other: &Symbol) -> bool {
        self.0.ptr_eq(&other.0)
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.0.borrow() {
            SymbolKind::Unbound => f.write_str("Symbol(unbound)"),
            SymbolKind::Value(v) => write!(f, "Symbol({})", v.repr()),
            SymbolKind::Expr { params, .. } => write!(f, "Symbol(func/{})", params.len()),
        }
    }
}
