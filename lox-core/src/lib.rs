// lox-core - Resolver and tree-walking evaluator for the Lox programming language
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! # lox-core
//!
//! The tree-walking execution engine for Lox: a static resolution pass
//! that records lexical binding distances, and an evaluator that walks
//! the AST honouring them. This is the engine behind the `lox` binary;
//! `lox-vm` provides an alternative bytecode back end.
//!
//! # Quick Start
//!
//! ```
//! use lox_core::{resolve, Interpreter};
//! use lox_parser::{NodeIds, Parser, Scanner};
//!
//! let source = "fun greet(name) { print \"hi \" + name; } greet(\"lox\");";
//!
//! let (tokens, scan_errors) = Scanner::scan_all(source);
//! assert!(scan_errors.is_empty());
//!
//! let mut ids = NodeIds::new();
//! let program = Parser::new(tokens, &mut ids).parse().unwrap();
//! let locals = resolve(&program).unwrap();
//!
//! let mut interpreter = Interpreter::with_output(Vec::new());
//! interpreter.resolve(locals);
//! interpreter.interpret(&program).unwrap();
//!
//! assert_eq!(String::from_utf8(interpreter.into_output()).unwrap(), "hi lox\n");
//! ```

pub mod builtins;
pub mod class;
pub mod env;
pub mod error;
pub mod function;
pub mod interpreter;
pub mod resolver;
pub mod value;

pub use builtins::register_builtins;
pub use class::{LoxClass, LoxInstance};
pub use env::Environment;
pub use error::{Error, ResolveError, Result};
pub use function::LoxFunction;
pub use interpreter::Interpreter;
pub use resolver::resolve;
pub use value::{NativeFn, Value};
