// lox-vm - Bytecode compiler and virtual machine for the Lox programming language
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! # lox-vm
//!
//! Single-pass bytecode compiler and stack-based virtual machine for Lox.
//!
//! This crate is an alternative execution model to the AST-walking
//! interpreter in `lox-core`: tokens compile straight to a bytecode
//! [`Chunk`] — no AST — which a stack machine executes. The language
//! surface is the statement subset of Lox (expressions, variables,
//! scopes, control flow); functions and classes live in the tree-walking
//! engine.
//!
//! # Quick Start
//!
//! ```
//! use lox_vm::VM;
//!
//! let mut vm = VM::with_output(Vec::new());
//! vm.interpret("var x = 3; for (var i = 0; i < x; i = i + 1) print i;").unwrap();
//! assert_eq!(String::from_utf8(vm.into_output()).unwrap(), "0\n1\n2\n");
//! ```

pub mod chunk;
pub mod compiler;
pub mod debug;
pub mod gc;
pub mod intern;
pub mod object;
pub mod opcode;
pub mod table;
pub mod value;
pub mod vm;

pub use chunk::{Chunk, MAX_CONSTANTS};
pub use compiler::{compile, CompileError};
pub use debug::{disassemble_chunk, disassemble_instruction};
pub use gc::Gc;
pub use intern::Interner;
pub use object::{fnv1a, ObjString};
pub use opcode::OpCode;
pub use table::Table;
pub use value::Value;
pub use vm::{InterpretError, RuntimeError, ValueStack, MAX_STACK, VM};
