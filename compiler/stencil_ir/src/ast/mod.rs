//! Expression tree produced by the template parser.
//!
//! Trees are built once and evaluated many times against different scopes,
//! so nodes are never mutated after construction. Function bodies sit behind
//! `Rc` because a closure value may outlive the walk that created it.

mod operators;

use std::rc::Rc;

use crate::Builtin;

pub use operators::{BinaryOp, LogicalOp, UnaryOp};

/// A function definition, named (`func f(a, b) ...`) or anonymous.
#[derive(Clone, Debug, PartialEq)]
pub struct FuncDef {
    /// `None` for anonymous functions.
    pub name: Option<String>,
    pub params: Rc<[String]>,
    pub body: Rc<Expr>,
}

/// Expression node.
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub enum Expr {
    // Literals
    Number(f64),
    Boolean(bool),
    String(String),
    Null,
    /// Empty statement.
    Nop,

    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Logical {
        op: LogicalOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    // Control flow
    If {
        condition: Box<Expr>,
        then_branch: Option<Box<Expr>>,
        else_branch: Option<Box<Expr>>,
    },
    While {
        condition: Box<Expr>,
        body: Option<Box<Expr>>,
    },
    StmtList(Vec<Expr>),

    // Symbols
    SymbolRef(String),
    SymbolAssign {
        name: String,
        value: Box<Expr>,
    },

    /// One cell of an argument cons-list. `tail` is the next `Args` cell.
    Args {
        head: Box<Expr>,
        tail: Option<Box<Expr>>,
    },

    // Calls
    BuiltinCall {
        builtin: Builtin,
        arg: Box<Expr>,
    },
    /// Call of an expression that yields a closure.
    AnonCall {
        callee: Box<Expr>,
        args: Option<Box<Expr>>,
    },
    /// Call of a function bound to a name.
    UserCall {
        name: String,
        args: Option<Box<Expr>>,
    },
    /// Method call on a value (`obj.method(args)`).
    NativeCall {
        object: Box<Expr>,
        method: String,
        args: Option<Box<Expr>>,
    },

    // Attributes
    GetAttr {
        object: Box<Expr>,
        attr: String,
    },
    SetAttr {
        object: Box<Expr>,
        attr: String,
        value: Box<Expr>,
    },

    /// `require Name [version]`.
    Require {
        namespace: String,
        version: Option<String>,
    },

    Func(Rc<FuncDef>),
}

// Construction helpers, used by the parser and by tests that build trees by hand.
impl Expr {
    pub fn number(n: f64) -> Self {
        Self::Number(n)
    }

    pub fn boolean(b: bool) -> Self {
        Self::Boolean(b)
    }

    pub fn string(s: impl Into<String>) -> Self {
        Self::String(s.into())
    }

    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        Self::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn unary(op: UnaryOp, operand: Expr) -> Self {
        Self::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    pub fn logical(op: LogicalOp, left: Expr, right: Expr) -> Self {
        Self::Logical {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn if_else(condition: Expr, then_branch: Option<Expr>, else_branch: Option<Expr>) -> Self {
        Self::If {
            condition: Box::new(condition),
            then_branch: then_branch.map(Box::new),
            else_branch: else_branch.map(Box::new),
        }
    }

    pub fn while_loop(condition: Expr, body: Option<Expr>) -> Self {
        Self::While {
            condition: Box::new(condition),
            body: body.map(Box::new),
        }
    }

    pub fn symbol(name: impl Into<String>) -> Self {
        Self::SymbolRef(name.into())
    }

    pub fn assign(name: impl Into<String>, value: Expr) -> Self {
        Self::SymbolAssign {
            name: name.into(),
            value: Box::new(value),
        }
    }

    /// Build an argument cons-list. Returns `None` for an empty list.
    pub fn args(items: Vec<Expr>) -> Option<Box<Expr>> {
        items.into_iter().rev().fold(None, |tail, head| {
            Some(Box::new(Self::Args {
                head: Box::new(head),
                tail,
            }))
        })
    }

    pub fn builtin_call(builtin: Builtin, arg: Expr) -> Self {
        Self::BuiltinCall {
            builtin,
            arg: Box::new(arg),
        }
    }

    pub fn anon_call(callee: Expr, args: Vec<Expr>) -> Self {
        Self::AnonCall {
            callee: Box::new(callee),
            args: Self::args(args),
        }
    }

    pub fn user_call(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Self::UserCall {
            name: name.into(),
            args: Self::args(args),
        }
    }

    pub fn native_call(object: Expr, method: impl Into<String>, args: Vec<Expr>) -> Self {
        Self::NativeCall {
            object: Box::new(object),
            method: method.into(),
            args: Self::args(args),
        }
    }

    pub fn get_attr(object: Expr, attr: impl Into<String>) -> Self {
        Self::GetAttr {
            object: Box::new(object),
            attr: attr.into(),
        }
    }

    pub fn set_attr(object: Expr, attr: impl Into<String>, value: Expr) -> Self {
        Self::SetAttr {
            object: Box::new(object),
            attr: attr.into(),
            value: Box::new(value),
        }
    }

    pub fn require(namespace: impl Into<String>, version: Option<&str>) -> Self {
        Self::Require {
            namespace: namespace.into(),
            version: version.map(str::to_owned),
        }
    }

    /// Named function definition.
    pub fn func(name: impl Into<String>, params: &[&str], body: Expr) -> Self {
        Self::Func(Rc::new(FuncDef {
            name: Some(name.into()),
            params: params.iter().map(|p| (*p).to_owned()).collect(),
            body: Rc::new(body),
        }))
    }

    /// Anonymous function (lambda).
    pub fn lambda(params: &[&str], body: Expr) -> Self {
        Self::Func(Rc::new(FuncDef {
            name: None,
            params: params.iter().map(|p| (*p).to_owned()).collect(),
            body: Rc::new(body),
        }))
    }

    /// Iterate the elements of an argument cons-list rooted at `self`.
    ///
    /// A non-`Args` node is treated as a one-element list.
    pub fn arg_iter(&self) -> ArgIter<'_> {
        ArgIter { next: Some(self) }
    }
}

/// Iterator over the heads of an argument cons-list.
pub struct ArgIter<'a> {
    next: Option<&'a Expr>,
}

impl<'a> Iterator for ArgIter<'a> {
    type Item = &'a Expr;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.next.take()?;
        match node {
            Expr::Args { head, tail } => {
                self.next = tail.as_deref();
                Some(head)
            }
            other => Some(other),
        }
    }
}
