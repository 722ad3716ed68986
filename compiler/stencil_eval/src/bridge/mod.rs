//! The boundary between template expressions and host objects.
//!
//! The evaluator never inspects a native handle itself. Namespaces,
//! attribute access on handles and method calls that the core does not
//! understand are all forwarded to a [`Bridge`]. Only "in" parameters cross
//! the boundary.

mod marshal;
mod registry;

use crate::errors::{bridge_failure, not_an_object, EvalResult};
use crate::value::Value;

pub use marshal::{marshal_in, ArgKind};
pub use registry::{
    Direction, MethodInfo, NamespaceInfo, ParamSpec, PropertyInfo, RegistryBridge, TypeInfo,
};

/// Host-object protocol used by `require`, attribute access and method calls.
pub trait Bridge {
    /// Load a namespace, yielding a handle of kind `Namespace`.
    fn resolve_namespace(&self, name: &str, version: Option<&str>) -> EvalResult;

    fn get_attribute(&self, object: &Value, name: &str) -> EvalResult;

    /// Store `value` and return what was stored.
    fn set_attribute(&self, object: &Value, name: &str, value: Value) -> EvalResult;

    /// Call `method` on `object`. `args` are already evaluated, in order.
    fn invoke(&self, object: &Value, method: &str, args: &[Value]) -> EvalResult;
}

/// Bridge for embedders without host objects. Every request fails.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoBridge;

impl Bridge for NoBridge {
    fn resolve_namespace(&self, name: &str, _version: Option<&str>) -> EvalResult {
        Err(bridge_failure(format!(
            "cannot load namespace \"{name}\": no host bridge installed"
        )))
    }

    fn get_attribute(&self, object: &Value, name: &str) -> EvalResult {
        Err(not_an_object(name, object.type_name()))
    }

    fn set_attribute(&self, object: &Value, name: &str, _value: Value) -> EvalResult {
        Err(not_an_object(name, object.type_name()))
    }

    fn invoke(&self, object: &Value, method: &str, _args: &[Value]) -> EvalResult {
        Err(not_an_object(method, object.type_name()))
    }
}
