// lox-core - Common test utilities
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Shared helpers for the tree-engine integration tests.
//!
//! # Usage
//!
//! In a test file, add:
//! ```ignore
//! mod common;
//! use common::*;
//! ```

// Each test binary uses a different subset of these helpers.
#![allow(dead_code)]

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

pub use lox_core::{resolve, Error, Interpreter, ResolveError};
pub use lox_parser::{NodeIds, ParseError, Parser, Scanner};

/// Run a program in a fresh interpreter, returning its printed output.
///
/// # Panics
///
/// Panics on scan, parse or resolution errors; use [`try_resolve`] or
/// [`parse_errors`] to test those paths.
pub fn run(src: &str) -> Result<String, Error> {
    let (tokens, scan_errors) = Scanner::scan_all(src);
    assert!(scan_errors.is_empty(), "scan errors: {:?}", scan_errors);
    let mut ids = NodeIds::new();
    let program = Parser::new(tokens, &mut ids)
        .parse()
        .unwrap_or_else(|e| panic!("parse errors: {:?}", e));
    let locals = resolve(&program).unwrap_or_else(|e| panic!("resolve errors: {:?}", e));

    let mut interpreter = Interpreter::with_output(Vec::new());
    interpreter.resolve(locals);
    interpreter.interpret(&program)?;
    Ok(String::from_utf8(interpreter.into_output()).expect("program output was not UTF-8"))
}

/// Resolve a program without running it.
pub fn try_resolve(src: &str) -> Result<(), Vec<ResolveError>> {
    let (tokens, scan_errors) = Scanner::scan_all(src);
    assert!(scan_errors.is_empty(), "scan errors: {:?}", scan_errors);
    let mut ids = NodeIds::new();
    let program = Parser::new(tokens, &mut ids)
        .parse()
        .unwrap_or_else(|e| panic!("parse errors: {:?}", e));
    resolve(&program).map(|_| ())
}

/// Parse a program, returning its collected syntax errors.
pub fn parse_errors(src: &str) -> Vec<ParseError> {
    let (tokens, _) = Scanner::scan_all(src);
    let mut ids = NodeIds::new();
    match Parser::new(tokens, &mut ids).parse() {
        Ok(_) => Vec::new(),
        Err(errors) => errors,
    }
}

/// A shareable output buffer so a session can be inspected while the
/// interpreter is still alive.
#[derive(Clone, Default)]
pub struct SharedBuf(Rc<RefCell<Vec<u8>>>);

impl SharedBuf {
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.borrow().clone()).expect("program output was not UTF-8")
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A REPL-like session: one interpreter, one id generator, many lines.
pub struct Session {
    interpreter: Interpreter<SharedBuf>,
    ids: NodeIds,
    out: SharedBuf,
}

impl Session {
    pub fn new() -> Self {
        let out = SharedBuf::default();
        Session {
            interpreter: Interpreter::with_output(out.clone()),
            ids: NodeIds::new(),
            out,
        }
    }

    /// Execute one line, as the REPL would.
    pub fn feed(&mut self, src: &str) -> Result<(), Error> {
        let (tokens, scan_errors) = Scanner::scan_all(src);
        assert!(scan_errors.is_empty(), "scan errors: {:?}", scan_errors);
        let program = Parser::new(tokens, &mut self.ids)
            .parse()
            .unwrap_or_else(|e| panic!("parse errors: {:?}", e));
        let locals = resolve(&program).unwrap_or_else(|e| panic!("resolve errors: {:?}", e));
        self.interpreter.resolve(locals);
        self.interpreter.interpret(&program)
    }

    /// Everything printed so far.
    pub fn output(&self) -> String {
        self.out.contents()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
