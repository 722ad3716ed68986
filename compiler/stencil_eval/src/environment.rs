//! Lexical scopes: symbol tables chained to a parent, with optional resolvers.
//!
//! Lookup order for a name requested from scope `S`:
//!
//! 1. `S`'s own table, then each ancestor's table up to the root.
//! 2. Resolvers, starting at `S` and walking to the root. The first symbol
//!    produced is cached in `S`'s table, so the resolver is not asked again
//!    for that name from `S`.
//! 3. When creating, a fresh unbound symbol in `S`'s table.
//!
//! The parent link is fixed at construction, so chains are finite and
//! acyclic. No `RefCell` borrow is held while a resolver runs.

use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;
use stencil_ir::Expr;

use crate::bridge::Bridge;
use crate::errors::EvalResult;
use crate::shared::LocalCell;
use crate::symbol::Symbol;
use crate::value::Value;

/// Produces symbols for names missing from every table in a chain.
pub trait Resolver {
    /// `scope` is the scope the resolver is installed on.
    fn resolve(&self, scope: &Scope, name: &str) -> Option<Symbol>;
}

impl<F> Resolver for F
where
    F: Fn(&Scope, &str) -> Option<Symbol>,
{
    fn resolve(&self, scope: &Scope, name: &str) -> Option<Symbol> {
        self(scope, name)
    }
}

#[derive(Default)]
struct ScopeData {
    symbols: FxHashMap<String, Symbol>,
    resolver: Option<Rc<dyn Resolver>>,
}

/// A shared, reference-counted scope.
///
/// Cloning a `Scope` shares it. A scope stays alive while any child,
/// closure or embedder holds it.
///
/// An anonymous function captures the scope it is created in. Storing it
/// back into that scope (`g = func() 1`) forms a reference cycle, and the
/// scope, its symbols and its resolver are then only released after
/// [`Scope::clear`].
#[derive(Clone)]
pub struct Scope {
    data: LocalCell<ScopeData>,
    parent: Option<Rc<Scope>>,
}

impl Scope {
    /// A root scope.
    pub fn new() -> Self {
        Self {
            data: LocalCell::default(),
            parent: None,
        }
    }

    /// A scope whose parent is `self`.
    #[must_use]
    pub fn new_child(&self) -> Self {
        Self {
            data: LocalCell::default(),
            parent: Some(Rc::new(self.clone())),
        }
    }

    pub fn parent(&self) -> Option<&Scope> {
        self.parent.as_deref()
    }

    /// `self` followed by its ancestors.
    fn chain(&self) -> impl Iterator<Item = &Scope> {
        std::iter::successors(Some(self), |s| s.parent())
    }

    fn local(&self, name: &str) -> Option<Symbol> {
        self.data.borrow().symbols.get(name).cloned()
    }

    fn insert(&self, name: &str, symbol: Symbol) {
        self.data
            .borrow_mut()
            .symbols
            .insert(name.to_owned(), symbol);
    }

    fn lookup(&self, name: &str, create: bool) -> Option<Symbol> {
        if let Some(symbol) = self.chain().find_map(|scope| scope.local(name)) {
            return Some(symbol);
        }

        for owner in self.chain() {
            let resolver = owner.data.borrow().resolver.clone();
            let Some(resolver) = resolver else {
                continue;
            };
            if let Some(symbol) = resolver.resolve(owner, name) {
                tracing::debug!(name, "resolver produced symbol");
                self.insert(name, symbol.clone());
                return Some(symbol);
            }
        }

        if create {
            let symbol = Symbol::new();
            self.insert(name, symbol.clone());
            return Some(symbol);
        }
        None
    }

    /// Find `name` along the chain, creating an unbound local symbol if absent.
    pub fn get_or_create(&self, name: &str) -> Symbol {
        self.lookup(name, true).unwrap_or_default()
    }

    /// Find `name` along the chain without creating it.
    pub fn peek(&self, name: &str) -> Option<Symbol> {
        self.lookup(name, false)
    }

    /// Bind `value` to `name` in this scope's own table.
    ///
    /// An existing local symbol is assigned in place. Otherwise a new local
    /// symbol is created, shadowing any ancestor binding.
    pub fn bind_value(&self, name: &str, value: impl Into<Value>) {
        let value = value.into();
        if let Some(symbol) = self.local(name) {
            symbol.assign_value(value);
        } else {
            self.insert(name, Symbol::with_value(value));
        }
    }

    /// Bind a named function to `name` in this scope's own table.
    ///
    /// Like [`Scope::bind_value`], an existing local symbol is assigned in
    /// place so every holder of it sees the definition.
    pub fn bind_expr(&self, name: &str, params: Rc<[String]>, body: Rc<Expr>) {
        if let Some(symbol) = self.local(name) {
            symbol.assign_expr(params, body);
        } else {
            self.insert(name, Symbol::with_expr(params, body));
        }
    }

    pub fn bind_null(&self, name: &str) {
        self.bind_value(name, Value::Null);
    }

    /// Install `symbol` under `name` locally, or remove the local entry when `None`.
    pub fn take(&self, name: &str, symbol: Option<Symbol>) {
        match symbol {
            Some(symbol) => self.insert(name, symbol),
            None => {
                self.remove(name);
            }
        }
    }

    /// Remove the local entry for `name`. Ancestors are untouched.
    pub fn remove(&self, name: &str) -> Option<Symbol> {
        self.data.borrow_mut().symbols.remove(name)
    }

    /// Drop every local symbol.
    ///
    /// A closure stored in the scope it captured keeps that scope alive;
    /// clearing breaks the cycle.
    pub fn clear(&self) {
        let symbols = std::mem::take(&mut self.data.borrow_mut().symbols);
        drop(symbols);
    }

    /// The string bound to `name`, if it is bound to a string.
    pub fn get_string(&self, name: &str) -> Option<String> {
        self.peek(name)?.value()?.as_str().map(str::to_owned)
    }

    /// Names in this scope, and in every ancestor when `recursive`.
    ///
    /// Sorted, without duplicates.
    pub fn list_symbols(&self, recursive: bool) -> Vec<String> {
        let mut names: Vec<String> = if recursive {
            self.chain()
                .flat_map(|scope| scope.data.borrow().symbols.keys().cloned().collect::<Vec<_>>())
                .collect()
        } else {
            self.data.borrow().symbols.keys().cloned().collect()
        };
        names.sort_unstable();
        names.dedup();
        names
    }

    /// Install a resolver, dropping the one it replaces.
    pub fn set_resolver(&self, resolver: impl Resolver + 'static) {
        self.data.borrow_mut().resolver = Some(Rc::new(resolver));
    }

    pub fn clear_resolver(&self) {
        let old = self.data.borrow_mut().resolver.take();
        drop(old);
    }

    /// Resolve `namespace` through the bridge and bind it here under its name.
    pub fn require(&self, bridge: &dyn Bridge, namespace: &str, version: Option<&str>) -> EvalResult {
        let handle = bridge.resolve_namespace(namespace, version)?;
        tracing::debug!(namespace, version, "namespace required");
        self.bind_value(namespace, handle.clone());
        Ok(handle)
    }

    /// Whether both handles refer to the same scope.
    pub fn same_scope(&self, other: &Scope) -> bool {
        self.data.ptr_eq(&other.data)
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.data.borrow();
        f.debug_struct("Scope")
            .field("symbols", &data.symbols)
            .field("has_resolver", &data.resolver.is_some())
            .field("has_parent", &self.parent.is_some())
            .finish()
    }
}
