//! Dynamic values produced and consumed by template expressions.
//!
//! `Value` is a closed set of variants; the variant alone decides how the
//! payload is read. Conversions between variants are always explicit
//! (`to_number`, the cast builtins) and may fail.

mod format;
mod iter;
mod types;

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use stencil_ir::Expr;

use crate::environment::Scope;

pub use format::format_number;
pub use iter::ValueIter;
pub use types::{EnumValue, HandleKind, NativeHandle, TypeDescriptor};

/// Run-time tag of a [`Value`].
///
/// Fundamental tags take part in the fast operator table; the rest always
/// go through the predicate rules.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ValueTag {
    Number,
    Int,
    UInt,
    Boolean,
    Str,
    StrV,
    Null,
    Enum,
    Native,
    Type,
    Closure,
}

impl ValueTag {
    #[inline]
    pub const fn is_fundamental(self) -> bool {
        matches!(
            self,
            Self::Number | Self::Int | Self::UInt | Self::Boolean | Self::Str | Self::Null
        )
    }

    /// Name of the tag as shown to template authors.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::Int => "int",
            Self::UInt => "uint",
            Self::Boolean => "boolean",
            Self::Str => "string",
            Self::StrV => "strv",
            Self::Null => "null",
            Self::Enum => "enum",
            Self::Native => "object",
            Self::Type => "type",
            Self::Closure => "closure",
        }
    }
}

/// A function value: parameters, body, and the scope it was created in.
#[derive(Clone)]
pub struct ClosureValue {
    pub name: Option<Rc<str>>,
    pub params: Rc<[String]>,
    pub body: Rc<Expr>,
    /// Scope the closure was defined in. `None` resolves free names through
    /// the call site.
    pub captured: Option<Scope>,
}

impl ClosureValue {
    /// Name used in diagnostics.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<anonymous>")
    }
}

impl fmt::Debug for ClosureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClosureValue")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("captured", &self.captured.is_some())
            .finish_non_exhaustive()
    }
}

/// Runtime value.
#[derive(Clone, Debug)]
pub enum Value {
    /// Double-precision number. All template arithmetic happens here.
    Number(f64),
    /// Signed integer, from casts or native calls.
    Int(i64),
    /// Unsigned integer, from casts or native calls.
    UInt(u64),
    Boolean(bool),
    Str(Rc<str>),
    /// Array of strings.
    StrV(Rc<[String]>),
    Null,
    Enum(EnumValue),
    Native(NativeHandle),
    Type(TypeDescriptor),
    Closure(ClosureValue),
}

impl Value {
    pub fn string(s: impl Into<Rc<str>>) -> Self {
        Value::Str(s.into())
    }

    pub fn strv<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Value::StrV(items.into_iter().map(Into::into).collect())
    }

    /// Wrap a host object in a native handle.
    pub fn object(type_desc: TypeDescriptor, payload: Rc<dyn Any>) -> Self {
        Value::Native(NativeHandle::object(type_desc, payload))
    }

    pub fn tag(&self) -> ValueTag {
        match self {
            Value::Number(_) => ValueTag::Number,
            Value::Int(_) => ValueTag::Int,
            Value::UInt(_) => ValueTag::UInt,
            Value::Boolean(_) => ValueTag::Boolean,
            Value::Str(_) => ValueTag::Str,
            Value::StrV(_) => ValueTag::StrV,
            Value::Null => ValueTag::Null,
            Value::Enum(_) => ValueTag::Enum,
            Value::Native(_) => ValueTag::Native,
            Value::Type(_) => ValueTag::Type,
            Value::Closure(_) => ValueTag::Closure,
        }
    }

    /// Type name for diagnostics. Handles and enums report their own type.
    pub fn type_name(&self) -> &str {
        match self {
            Value::Enum(e) => e.type_desc.name(),
            Value::Native(h) => h.type_desc.name(),
            other => other.tag().name(),
        }
    }

    /// Canonical truthiness used by conditions, logical operators and `assert`.
    pub fn is_truthy(&self) -> bool {
        match self {
            // NaN compares unequal to zero, so it is truthy.
            Value::Number(n) => *n != 0.0,
            Value::Int(n) => *n != 0,
            Value::UInt(n) => *n != 0,
            Value::Boolean(b) => *b,
            Value::Str(s) => !s.is_empty(),
            Value::StrV(items) => !items.is_empty(),
            Value::Null => false,
            Value::Enum(e) => e.value != 0,
            Value::Native(h) => !h.is_null(),
            Value::Type(_) | Value::Closure(_) => true,
        }
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric view of the value, if it has one.
    ///
    /// Integers wider than 2^53 lose precision. Strings are parsed.
    #[expect(
        clippy::cast_precision_loss,
        reason = "template arithmetic is double precision"
    )]
    pub fn to_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Int(n) => Some(*n as f64),
            Value::UInt(n) => Some(*n as f64),
            Value::Boolean(b) => Some(f64::from(u8::from(*b))),
            Value::Str(s) => s.trim().parse().ok(),
            Value::Enum(e) => Some(e.value as f64),
            _ => None,
        }
    }

    /// Iterate the value, for template `for` loops.
    ///
    /// Strings yield one string per character; string arrays yield each element.
    pub fn iter(&self) -> Option<ValueIter> {
        ValueIter::new(self)
    }
}

/// Host-side equality: structural for data, identity for handles and closures.
///
/// This is not the template `==` operator, which lives in operator dispatch.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::UInt(a), Value::UInt(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::StrV(a), Value::StrV(b)) => a == b,
            (Value::Null, Value::Null) => true,
            (Value::Enum(a), Value::Enum(b)) => a == b,
            (Value::Native(a), Value::Native(b)) => a.same_object(b),
            (Value::Type(a), Value::Type(b)) => a == b,
            (Value::Closure(a), Value::Closure(b)) => Rc::ptr_eq(&a.body, &b.body),
            _ => false,
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::UInt(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.into())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s.into())
    }
}

impl From<Vec<String>> for Value {
    fn from(items: Vec<String>) -> Self {
        Value::StrV(items.into())
    }
}

impl From<EnumValue> for Value {
    fn from(e: EnumValue) -> Self {
        Value::Enum(e)
    }
}

impl From<NativeHandle> for Value {
    fn from(h: NativeHandle) -> Self {
        Value::Native(h)
    }
}

impl From<TypeDescriptor> for Value {
    fn from(t: TypeDescriptor) -> Self {
        Value::Type(t)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

#[cfg(test)]
mod tests;
