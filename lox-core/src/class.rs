// lox-core - Class and instance runtime objects
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Classes and instances.
//!
//! A class holds its method table and an optional superclass; method
//! lookup walks the superclass chain. Instances hold a field map; fields
//! shadow methods on property access.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::function::LoxFunction;
use crate::value::Value;

/// A Lox class object.
#[derive(Debug)]
pub struct LoxClass {
    pub name: String,
    pub superclass: Option<Rc<LoxClass>>,
    pub methods: HashMap<String, Rc<LoxFunction>>,
}

impl LoxClass {
    /// Look a method up on this class or any superclass.
    pub fn find_method(&self, name: &str) -> Option<Rc<LoxFunction>> {
        if let Some(method) = self.methods.get(name) {
            return Some(Rc::clone(method));
        }
        self.superclass
            .as_ref()
            .and_then(|superclass| superclass.find_method(name))
    }

    /// Arity of construction: the `init` method's arity, or zero.
    pub fn arity(&self) -> usize {
        self.find_method("init")
            .map(|init| init.arity())
            .unwrap_or(0)
    }
}

impl fmt::Display for LoxClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// An instance of a Lox class.
#[derive(Debug)]
pub struct LoxInstance {
    pub class: Rc<LoxClass>,
    fields: RefCell<HashMap<String, Value>>,
}

impl LoxInstance {
    /// Create an instance with no fields set.
    pub fn new(class: Rc<LoxClass>) -> Self {
        LoxInstance {
            class,
            fields: RefCell::new(HashMap::new()),
        }
    }

    /// Property lookup: fields first, then methods bound to the receiver.
    ///
    /// Method lookup returns a *new* bound callable on every access.
    pub fn get(self: &Rc<Self>, name: &str) -> Option<Value> {
        if let Some(value) = self.fields.borrow().get(name) {
            return Some(value.clone());
        }
        self.class.find_method(name).map(|method| {
            Value::Function(Rc::new(method.bind(Value::Instance(Rc::clone(self)))))
        })
    }

    /// Create or update a field. Methods cannot be replaced this way;
    /// a field of the same name simply shadows them.
    pub fn set(&self, name: impl Into<String>, value: Value) {
        self.fields.borrow_mut().insert(name.into(), value);
    }
}

impl fmt::Display for LoxInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} instance", self.class.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class(name: &str, superclass: Option<Rc<LoxClass>>) -> Rc<LoxClass> {
        Rc::new(LoxClass {
            name: name.to_string(),
            superclass,
            methods: HashMap::new(),
        })
    }

    #[test]
    fn fields_roundtrip() {
        let instance = Rc::new(LoxInstance::new(class("Point", None)));
        assert_eq!(instance.get("x"), None);
        instance.set("x", Value::Number(3.0));
        assert_eq!(instance.get("x"), Some(Value::Number(3.0)));
    }

    #[test]
    fn method_lookup_walks_superclass_chain() {
        let base = class("Base", None);
        let derived = class("Derived", Some(Rc::clone(&base)));
        assert!(derived.find_method("missing").is_none());
        assert_eq!(derived.arity(), 0);
    }
}
