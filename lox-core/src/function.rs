// lox-core - Function objects for the Lox evaluator
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! User-defined functions and bound methods.

use std::fmt;
use std::rc::Rc;

use lox_parser::FunctionDecl;

use crate::env::Environment;
use crate::value::Value;

/// A user-defined function: a declaration plus the environment it closed
/// over. Methods are the same object with `is_initializer` set when the
/// method is named `init`.
#[derive(Debug)]
pub struct LoxFunction {
    /// The parsed declaration, shared with the AST.
    pub decl: Rc<FunctionDecl>,
    /// The frame the function was declared in.
    pub closure: Environment,
    /// Whether this is a class `init` method, which always returns the
    /// receiver.
    pub is_initializer: bool,
}

impl LoxFunction {
    /// Create a function value closing over `closure`.
    pub fn new(decl: Rc<FunctionDecl>, closure: Environment, is_initializer: bool) -> Self {
        LoxFunction {
            decl,
            closure,
            is_initializer,
        }
    }

    /// Number of declared parameters.
    pub fn arity(&self) -> usize {
        self.decl.params.len()
    }

    /// Bind this method to a receiver.
    ///
    /// Produces a fresh callable whose closure has `this` pre-inserted in
    /// a new frame. Each access mints a new object, so two bindings of the
    /// same method are never reference-equal.
    pub fn bind(&self, instance: Value) -> LoxFunction {
        let environment = self.closure.child();
        environment.define("this", instance);
        LoxFunction::new(Rc::clone(&self.decl), environment, self.is_initializer)
    }
}

impl fmt::Display for LoxFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<fn {}>", self.decl.name)
    }
}
