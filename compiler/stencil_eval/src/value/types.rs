//! Run-time type descriptors, enumeration members and native handles.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use super::ValueTag;

struct TypeData {
    name: String,
    parent: Option<TypeDescriptor>,
    interfaces: Vec<TypeDescriptor>,
}

/// Descriptor of a run-time type, with single inheritance and interfaces.
///
/// Descriptors compare by name. `is_a` follows the parent chain and the
/// declared interfaces.
#[derive(Clone)]
pub struct TypeDescriptor(Rc<TypeData>);

impl TypeDescriptor {
    /// A root type.
    pub fn new(name: impl Into<String>) -> Self {
        Self(Rc::new(TypeData {
            name: name.into(),
            parent: None,
            interfaces: Vec::new(),
        }))
    }

    /// A type deriving from `parent` and implementing `interfaces`.
    pub fn derived(
        name: impl Into<String>,
        parent: &TypeDescriptor,
        interfaces: &[TypeDescriptor],
    ) -> Self {
        Self(Rc::new(TypeData {
            name: name.into(),
            parent: Some(parent.clone()),
            interfaces: interfaces.to_vec(),
        }))
    }

    /// Descriptor for a value tag, as reported by `typeof`.
    pub fn fundamental(tag: ValueTag) -> Self {
        Self::new(tag.name())
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn parent(&self) -> Option<&TypeDescriptor> {
        self.0.parent.as_ref()
    }

    pub fn interfaces(&self) -> &[TypeDescriptor] {
        &self.0.interfaces
    }

    /// Whether `self` is `other`, derives from it, or implements it.
    pub fn is_a(&self, other: &TypeDescriptor) -> bool {
        if self == other {
            return true;
        }
        if self.0.interfaces.iter().any(|iface| iface.is_a(other)) {
            return true;
        }
        self.0.parent.as_ref().is_some_and(|parent| parent.is_a(other))
    }

    /// `self` followed by its ancestors, nearest first.
    pub fn ancestry(&self) -> impl Iterator<Item = &TypeDescriptor> {
        std::iter::successors(Some(self), |t| t.parent())
    }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0) || self.0.name == other.0.name
    }
}

impl Eq for TypeDescriptor {}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeDescriptor({})", self.0.name)
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.name)
    }
}

/// A member of an enumeration type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnumValue {
    pub type_desc: TypeDescriptor,
    pub value: i64,
    /// Symbolic short name, compared against strings by `==`.
    pub nick: Rc<str>,
}

impl EnumValue {
    pub fn new(type_desc: TypeDescriptor, value: i64, nick: impl Into<Rc<str>>) -> Self {
        Self {
            type_desc,
            value,
            nick: nick.into(),
        }
    }
}

/// What a native handle refers to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum HandleKind {
    Namespace,
    Type,
    Object,
}

/// Opaque reference to something living on the host side of the bridge.
///
/// `payload` is `None` for a null handle.
#[derive(Clone)]
pub struct NativeHandle {
    pub kind: HandleKind,
    pub type_desc: TypeDescriptor,
    pub payload: Option<Rc<dyn Any>>,
}

impl NativeHandle {
    pub fn new(kind: HandleKind, type_desc: TypeDescriptor, payload: Option<Rc<dyn Any>>) -> Self {
        Self {
            kind,
            type_desc,
            payload,
        }
    }

    pub fn object(type_desc: TypeDescriptor, payload: Rc<dyn Any>) -> Self {
        Self::new(HandleKind::Object, type_desc, Some(payload))
    }

    pub fn null(type_desc: TypeDescriptor) -> Self {
        Self::new(HandleKind::Object, type_desc, None)
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        self.payload.is_none()
    }

    /// Borrow the payload as a concrete host type.
    pub fn downcast<T: Any>(&self) -> Option<&T> {
        self.payload.as_deref()?.downcast_ref::<T>()
    }

    /// Clone the payload as a concrete host type.
    pub fn downcast_rc<T: Any>(&self) -> Option<Rc<T>> {
        self.payload.clone()?.downcast::<T>().ok()
    }

    /// Payload identity; two null handles are the same.
    pub fn same_object(&self, other: &NativeHandle) -> bool {
        match (&self.payload, &other.payload) {
            (Some(a), Some(b)) => std::ptr::eq(
                Rc::as_ptr(a).cast::<()>(),
                Rc::as_ptr(b).cast::<()>(),
            ),
            (None, None) => true,
            _ => false,
        }
    }
}

impl fmt::Debug for NativeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeHandle")
            .field("kind", &self.kind)
            .field("type_desc", &self.type_desc)
            .field("null", &self.is_null())
            .finish()
    }
}
