use std::{cell::RefCell, collections::HashMap, rc::Rc};

use crate::engine::value::core::Value;

/// The variable environment an expression is evaluated against.
///
/// The engine depends only on this capability set; callers own the storage
/// and may back it with anything from a plain map to a database view. All
/// reads return owned values, so no borrow outlives the call.
pub trait Scope {
    /// Reads a variable, or `None` when it is not bound.
    fn get(&self, name: &str) -> Option<Value>;
    /// Binds a variable, overwriting any previous binding.
    fn set(&mut self, name: &str, value: Value);
    /// Tests whether a variable is bound.
    fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
    /// Lists the bound variable names, in no particular order.
    fn keys(&self) -> Vec<String>;
}

/// A shared, mutable handle to a scope.
///
/// Compiled expressions hold one of these only for the duration of a call;
/// no reference is retained afterwards.
pub type ScopeRef = Rc<RefCell<dyn Scope>>;

impl Scope for HashMap<String, Value> {
    fn get(&self, name: &str) -> Option<Value> {
        Self::get(self, name).cloned()
    }

    fn set(&mut self, name: &str, value: Value) {
        self.insert(name.to_string(), value);
    }

    fn has(&self, name: &str) -> bool {
        self.contains_key(name)
    }

    fn keys(&self) -> Vec<String> {
        Self::keys(self).cloned().collect()
    }
}

/// Builds a fresh, empty map-backed scope.
#[must_use]
pub fn new_scope() -> ScopeRef {
    let scope: ScopeRef = Rc::new(RefCell::new(HashMap::new()));
    scope
}

/// A scope layered on top of a parent.
///
/// Reads fall back to the parent when the local layer has no binding; writes
/// always land locally and are never visible in the parent. Every function
/// invocation gets a fresh layer of this kind as its parameter frame.
pub struct ChildScope {
    locals: HashMap<String, Value>,
    parent: ScopeRef,
}

impl ChildScope {
    /// Creates an empty layer over `parent`.
    #[must_use]
    pub fn new(parent: &ScopeRef) -> Self {
        Self {
            locals: HashMap::new(),
            parent: Rc::clone(parent),
        }
    }

    /// Wraps the layer in a shared handle.
    #[must_use]
    pub fn into_ref(self) -> ScopeRef {
        Rc::new(RefCell::new(self))
    }
}

impl Scope for ChildScope {
    fn get(&self, name: &str) -> Option<Value> {
        self.locals
            .get(name)
            .cloned()
            .or_else(|| self.parent.borrow().get(name))
    }

    fn set(&mut self, name: &str, value: Value) {
        self.locals.insert(name.to_string(), value);
    }

    fn has(&self, name: &str) -> bool {
        self.locals.contains_key(name) || self.parent.borrow().has(name)
    }

    fn keys(&self) -> Vec<String> {
        self.locals.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{new_scope, ChildScope, Scope};
    use crate::engine::value::core::Value;

    #[test]
    fn child_reads_fall_back_but_writes_stay_local() {
        let parent = new_scope();
        parent.borrow_mut().set("x", Value::Number(1.0));

        let child = ChildScope::new(&parent).into_ref();
        assert_eq!(child.borrow().get("x"), Some(Value::Number(1.0)));

        child.borrow_mut().set("x", Value::Number(2.0));
        child.borrow_mut().set("y", Value::Number(3.0));

        assert_eq!(child.borrow().get("x"), Some(Value::Number(2.0)));
        assert_eq!(parent.borrow().get("x"), Some(Value::Number(1.0)));
        assert_eq!(parent.borrow().get("y"), None);
    }
}
