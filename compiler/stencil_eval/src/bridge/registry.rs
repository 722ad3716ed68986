//! A [`Bridge`] over host-registered namespaces and types.
//!
//! Embedders describe their objects up front: each type lists its
//! properties (getter, optional setter), methods (parameter specs plus a
//! native closure), static functions and constants. Method lookup walks the
//! receiver's type, then that type's interfaces, then the same for each
//! ancestor, nearest first.

use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use super::marshal::{marshal_in, ArgKind};
use super::Bridge;
use crate::errors::{
    arity_mismatch, bridge_failure, no_such_method, no_such_property, not_an_object,
    null_pointer_access, unsupported_parameter, EvalResult,
};
use crate::value::{HandleKind, NativeHandle, TypeDescriptor, Value};

/// Direction of a native parameter. Only `In` is callable from templates.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    In,
    Out,
    InOut,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: String,
    pub direction: Direction,
    pub kind: ArgKind,
}

impl ParamSpec {
    pub fn input(name: impl Into<String>, kind: ArgKind) -> Self {
        Self {
            name: name.into(),
            direction: Direction::In,
            kind,
        }
    }

    pub fn output(name: impl Into<String>, kind: ArgKind) -> Self {
        Self {
            name: name.into(),
            direction: Direction::Out,
            kind,
        }
    }
}

/// Native implementation of a method. Receives the receiver (`Null` for
/// static functions) and the marshaled arguments.
pub type NativeFn = Rc<dyn Fn(&Value, &[Value]) -> EvalResult>;
pub type Getter = Rc<dyn Fn(&NativeHandle) -> EvalResult>;
pub type Setter = Rc<dyn Fn(&NativeHandle, Value) -> EvalResult>;

#[derive(Clone)]
pub struct MethodInfo {
    pub name: String,
    pub params: Vec<ParamSpec>,
    pub func: NativeFn,
}

impl MethodInfo {
    pub fn new(
        name: impl Into<String>,
        params: Vec<ParamSpec>,
        func: impl Fn(&Value, &[Value]) -> EvalResult + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            params,
            func: Rc::new(func),
        }
    }

    /// Check directions and arity, marshal the arguments, and run the method.
    fn call(&self, owner: &str, receiver: &Value, args: &[Value]) -> EvalResult {
        let qualified = format!("{owner}.{}", self.name);
        if let Some(param) = self.params.iter().find(|p| p.direction != Direction::In) {
            return Err(unsupported_parameter(&qualified, &param.name));
        }
        if args.len() != self.params.len() {
            return Err(arity_mismatch(&qualified, self.params.len(), args.len()));
        }
        let marshaled = self
            .params
            .iter()
            .zip(args)
            .map(|(param, arg)| {
                marshal_in(arg, param.kind)
                    .map_err(|e| e.with_note(format!("argument \"{}\" of {qualified}", param.name)))
            })
            .collect::<Result<Vec<_>, _>>()?;
        tracing::debug!(method = %qualified, args = marshaled.len(), "native call");
        (self.func)(receiver, &marshaled)
    }
}

impl fmt::Debug for MethodInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodInfo")
            .field("name", &self.name)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

#[derive(Clone)]
pub struct PropertyInfo {
    pub name: String,
    pub kind: ArgKind,
    pub getter: Getter,
    /// `None` for read-only properties.
    pub setter: Option<Setter>,
}

impl PropertyInfo {
    pub fn read_only(
        name: impl Into<String>,
        kind: ArgKind,
        getter: impl Fn(&NativeHandle) -> EvalResult + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            getter: Rc::new(getter),
            setter: None,
        }
    }

    pub fn read_write(
        name: impl Into<String>,
        kind: ArgKind,
        getter: impl Fn(&NativeHandle) -> EvalResult + 'static,
        setter: impl Fn(&NativeHandle, Value) -> EvalResult + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            getter: Rc::new(getter),
            setter: Some(Rc::new(setter)),
        }
    }
}

/// Description of one host type.
#[derive(Clone)]
pub struct TypeInfo {
    desc: TypeDescriptor,
    properties: FxHashMap<String, PropertyInfo>,
    methods: FxHashMap<String, MethodInfo>,
    functions: FxHashMap<String, MethodInfo>,
    constants: FxHashMap<String, Value>,
}

impl TypeInfo {
    pub fn new(desc: TypeDescriptor) -> Self {
        Self {
            desc,
            properties: FxHashMap::default(),
            methods: FxHashMap::default(),
            functions: FxHashMap::default(),
            constants: FxHashMap::default(),
        }
    }

    pub fn desc(&self) -> &TypeDescriptor {
        &self.desc
    }

    #[must_use]
    pub fn property(mut self, property: PropertyInfo) -> Self {
        self.properties.insert(property.name.clone(), property);
        self
    }

    /// Instance method.
    #[must_use]
    pub fn method(mut self, method: MethodInfo) -> Self {
        self.methods.insert(method.name.clone(), method);
        self
    }

    /// Static function or constructor, called on the type handle.
    #[must_use]
    pub fn function(mut self, function: MethodInfo) -> Self {
        self.functions.insert(function.name.clone(), function);
        self
    }

    /// Named constant, read as an attribute of the type handle.
    #[must_use]
    pub fn constant(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.constants.insert(name.into(), value.into());
        self
    }
}

/// A loadable namespace.
#[derive(Clone, Debug)]
pub struct NamespaceInfo {
    pub name: String,
    pub version: String,
    /// Types and constants reachable as attributes of the namespace handle.
    members: FxHashMap<String, Value>,
    functions: FxHashMap<String, MethodInfo>,
}

impl NamespaceInfo {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            members: FxHashMap::default(),
            functions: FxHashMap::default(),
        }
    }

    #[must_use]
    pub fn member(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.members.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn function(mut self, function: MethodInfo) -> Self {
        self.functions.insert(function.name.clone(), function);
        self
    }
}

/// Bridge backed by registered [`NamespaceInfo`] and [`TypeInfo`] entries.
#[derive(Default)]
pub struct RegistryBridge {
    namespaces: FxHashMap<String, Rc<NamespaceInfo>>,
    types: FxHashMap<String, TypeInfo>,
}

impl RegistryBridge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_type(&mut self, info: TypeInfo) {
        self.types.insert(info.desc.name().to_owned(), info);
    }

    /// Register a namespace. A type registered with [`Self::register_type`]
    /// can be exposed as a member via [`Self::type_handle`].
    pub fn register_namespace(&mut self, info: NamespaceInfo) {
        self.namespaces.insert(info.name.clone(), Rc::new(info));
    }

    /// Handle through which templates call a type's static functions.
    pub fn type_handle(desc: &TypeDescriptor) -> Value {
        let payload: Rc<dyn std::any::Any> = Rc::new(desc.name().to_owned());
        Value::Native(NativeHandle::new(HandleKind::Type, desc.clone(), Some(payload)))
    }

    /// Registered types along `desc`'s ancestry, each followed by its
    /// interfaces. Nearest first.
    fn lookup_order<'a>(&'a self, desc: &'a TypeDescriptor) -> impl Iterator<Item = &'a TypeInfo> {
        desc.ancestry().flat_map(move |t| {
            std::iter::once(t)
                .chain(t.interfaces())
                .filter_map(move |t| self.types.get(t.name()))
        })
    }

    fn find_property<'a>(
        &'a self,
        desc: &'a TypeDescriptor,
        name: &str,
    ) -> Option<&'a PropertyInfo> {
        self.lookup_order(desc).find_map(move |info| info.properties.get(name))
    }

    fn find_method<'a>(
        &'a self,
        desc: &'a TypeDescriptor,
        name: &str,
    ) -> Option<(&'a TypeInfo, &'a MethodInfo)> {
        self.lookup_order(desc)
            .find_map(move |info| info.methods.get(name).map(|m| (info, m)))
    }

    fn namespace_of(&self, handle: &NativeHandle) -> Option<&NamespaceInfo> {
        let name = handle.downcast::<String>()?;
        self.namespaces.get(name).map(|ns| &**ns)
    }
}

/// Split a value into a native handle, or fail with `NotAnObject`.
fn as_handle<'v>(object: &'v Value, member: &str) -> Result<&'v NativeHandle, crate::EvalError> {
    match object {
        Value::Native(handle) => Ok(handle),
        other => Err(not_an_object(member, other.type_name())),
    }
}

impl Bridge for RegistryBridge {
    fn resolve_namespace(&self, name: &str, version: Option<&str>) -> EvalResult {
        let Some(info) = self.namespaces.get(name) else {
            return Err(bridge_failure(format!("namespace \"{name}\" is not available")));
        };
        if let Some(wanted) = version {
            if wanted != info.version {
                return Err(bridge_failure(format!(
                    "namespace \"{name}\" version {wanted} is not available (have {})",
                    info.version
                )));
            }
        }
        let payload: Rc<dyn std::any::Any> = Rc::new(info.name.clone());
        Ok(Value::Native(NativeHandle::new(
            HandleKind::Namespace,
            TypeDescriptor::new(info.name.as_str()),
            Some(payload),
        )))
    }

    fn get_attribute(&self, object: &Value, name: &str) -> EvalResult {
        let handle = as_handle(object, name)?;
        match handle.kind {
            HandleKind::Namespace => {
                let ns = self
                    .namespace_of(handle)
                    .ok_or_else(|| null_pointer_access(name))?;
                ns.members.get(name).cloned().ok_or_else(|| {
                    bridge_failure(format!("failed to locate \"{name}\" within {}", ns.name))
                })
            }
            HandleKind::Type => self
                .lookup_order(&handle.type_desc)
                .find_map(|info| info.constants.get(name))
                .cloned()
                .ok_or_else(|| no_such_property(name, handle.type_desc.name())),
            HandleKind::Object => {
                if handle.is_null() {
                    return Err(null_pointer_access(name));
                }
                let property = self
                    .find_property(&handle.type_desc, name)
                    .ok_or_else(|| no_such_property(name, handle.type_desc.name()))?;
                (property.getter)(handle)
            }
        }
    }

    fn set_attribute(&self, object: &Value, name: &str, value: Value) -> EvalResult {
        let handle = as_handle(object, name)?;
        if handle.kind != HandleKind::Object {
            return Err(no_such_property(name, handle.type_desc.name()));
        }
        if handle.is_null() {
            return Err(null_pointer_access(name));
        }
        let property = self
            .find_property(&handle.type_desc, name)
            .ok_or_else(|| no_such_property(name, handle.type_desc.name()))?;
        let Some(setter) = &property.setter else {
            return Err(bridge_failure(format!(
                "property \"{name}\" of {} is read-only",
                handle.type_desc.name()
            )));
        };
        let value = marshal_in(&value, property.kind)?;
        setter(handle, value)
    }

    fn invoke(&self, object: &Value, method: &str, args: &[Value]) -> EvalResult {
        let handle = as_handle(object, method)?;
        match handle.kind {
            HandleKind::Object => {
                if handle.is_null() {
                    return Err(null_pointer_access(method));
                }
                let (owner, info) = self
                    .find_method(&handle.type_desc, method)
                    .ok_or_else(|| no_such_method(method, handle.type_desc.name()))?;
                info.call(owner.desc.name(), object, args)
            }
            HandleKind::Type => {
                let info = self
                    .types
                    .get(handle.type_desc.name())
                    .and_then(|t| t.functions.get(method))
                    .ok_or_else(|| no_such_method(method, handle.type_desc.name()))?;
                info.call(handle.type_desc.name(), &Value::Null, args)
            }
            HandleKind::Namespace => {
                let ns = self
                    .namespace_of(handle)
                    .ok_or_else(|| null_pointer_access(method))?;
                let info = ns
                    .functions
                    .get(method)
                    .ok_or_else(|| no_such_method(method, &ns.name))?;
                info.call(&ns.name, &Value::Null, args)
            }
        }
    }
}
