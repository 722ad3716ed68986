//! Stencil IR - expression trees for the template engine.
//!
//! The parser produces [`Expr`] trees; `stencil_eval` walks them. Nothing in
//! this crate evaluates anything.

mod ast;
mod builtin;

pub use ast::{ArgIter, BinaryOp, Expr, FuncDef, LogicalOp, UnaryOp};
pub use builtin::Builtin;
