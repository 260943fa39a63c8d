// lox-core - Environment for lexical scoping
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Environment chain for variable bindings.
//!
//! Environments form a singly linked chain through parent references; the
//! global frame is the tail. Every block, function call and class body
//! pushes a fresh frame. The resolver records, per use site, how many
//! parent links to walk, so resolved reads and writes land on exactly the
//! frame that held the binding when the code was resolved.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::value::Value;

/// A lexical environment frame.
///
/// Cloning an `Environment` clones a handle to the same frame, which is
/// how closures capture their defining scope.
///
/// # Examples
///
/// ```
/// use lox_core::{Environment, Value};
///
/// let globals = Environment::new();
/// globals.define("x", Value::Number(1.0));
///
/// let inner = globals.child();
/// assert_eq!(inner.get("x"), Some(Value::Number(1.0)));
///
/// // Shadowing in the child leaves the parent untouched.
/// inner.define("x", Value::Number(2.0));
/// assert_eq!(globals.get("x"), Some(Value::Number(1.0)));
/// ```
#[derive(Debug, Clone)]
pub struct Environment {
    inner: Rc<RefCell<EnvInner>>,
}

#[derive(Debug)]
struct EnvInner {
    bindings: HashMap<String, Value>,
    parent: Option<Environment>,
}

impl Environment {
    /// Create a root (global) frame.
    pub fn new() -> Self {
        Environment {
            inner: Rc::new(RefCell::new(EnvInner {
                bindings: HashMap::new(),
                parent: None,
            })),
        }
    }

    /// Create a child frame with this frame as parent.
    #[must_use]
    pub fn child(&self) -> Self {
        Environment {
            inner: Rc::new(RefCell::new(EnvInner {
                bindings: HashMap::new(),
                parent: Some(self.clone()),
            })),
        }
    }

    /// Define a binding in this frame. Redefinition is allowed and
    /// replaces the previous value.
    pub fn define(&self, name: impl Into<String>, value: Value) {
        self.inner.borrow_mut().bindings.insert(name.into(), value);
    }

    /// Look a name up through this frame and its ancestors.
    pub fn get(&self, name: &str) -> Option<Value> {
        let mut current = self.clone();
        loop {
            let inner = current.inner.borrow();
            if let Some(value) = inner.bindings.get(name) {
                return Some(value.clone());
            }
            let parent = inner.parent.clone();
            drop(inner);
            match parent {
                Some(parent) => current = parent,
                None => return None,
            }
        }
    }

    /// Assign to an existing binding, walking up the chain to find it.
    /// Returns `false` when the name is not bound anywhere.
    pub fn assign(&self, name: &str, value: Value) -> bool {
        let mut current = self.clone();
        loop {
            {
                let mut inner = current.inner.borrow_mut();
                if let Some(slot) = inner.bindings.get_mut(name) {
                    *slot = value;
                    return true;
                }
            }
            let parent = current.inner.borrow().parent.clone();
            match parent {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    /// The frame exactly `distance` parent links above this one.
    ///
    /// # Panics
    ///
    /// Panics if the chain is shorter than `distance`, which indicates a
    /// resolver bug: distances are only recorded for frames that existed
    /// at resolution time.
    fn ancestor(&self, distance: usize) -> Environment {
        let mut frame = self.clone();
        for _ in 0..distance {
            let parent = frame
                .inner
                .borrow()
                .parent
                .clone()
                .expect("resolver recorded a distance past the global frame");
            frame = parent;
        }
        frame
    }

    /// Read a binding at an exact resolver-recorded distance.
    pub fn get_at(&self, distance: usize, name: &str) -> Option<Value> {
        self.ancestor(distance)
            .inner
            .borrow()
            .bindings
            .get(name)
            .cloned()
    }

    /// Write a binding at an exact resolver-recorded distance. Returns
    /// `false` when the frame has no such binding.
    pub fn assign_at(&self, distance: usize, name: &str, value: Value) -> bool {
        let frame = self.ancestor(distance);
        let mut inner = frame.inner.borrow_mut();
        match inner.bindings.get_mut(name) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn define_and_get() {
        let env = Environment::new();
        env.define("x", Value::Number(42.0));
        assert_eq!(env.get("x"), Some(Value::Number(42.0)));
        assert_eq!(env.get("y"), None);
    }

    #[test]
    fn child_inherits_and_shadows() {
        let parent = Environment::new();
        parent.define("x", Value::Number(1.0));

        let child = parent.child();
        assert_eq!(child.get("x"), Some(Value::Number(1.0)));

        child.define("x", Value::Number(2.0));
        assert_eq!(child.get("x"), Some(Value::Number(2.0)));
        assert_eq!(parent.get("x"), Some(Value::Number(1.0)));
    }

    #[test]
    fn assign_walks_to_defining_frame() {
        let parent = Environment::new();
        parent.define("x", Value::Number(1.0));

        let child = parent.child();
        assert!(child.assign("x", Value::Number(5.0)));
        assert_eq!(parent.get("x"), Some(Value::Number(5.0)));
        assert!(!child.assign("missing", Value::Nil));
    }

    #[test]
    fn distance_walking() {
        let globals = Environment::new();
        globals.define("a", Value::Str("global".into()));

        let middle = globals.child();
        middle.define("a", Value::Str("middle".into()));

        let inner = middle.child();

        assert_eq!(inner.get_at(1, "a"), Some(Value::Str("middle".into())));
        assert_eq!(inner.get_at(2, "a"), Some(Value::Str("global".into())));

        assert!(inner.assign_at(1, "a", Value::Str("patched".into())));
        assert_eq!(middle.get("a"), Some(Value::Str("patched".into())));
        assert_eq!(globals.get("a"), Some(Value::Str("global".into())));
    }

    #[test]
    fn closure_keeps_frame_alive() {
        let captured = {
            let globals = Environment::new();
            let frame = globals.child();
            frame.define("i", Value::Number(0.0));
            frame
        };
        assert_eq!(captured.get("i"), Some(Value::Number(0.0)));
    }
}
