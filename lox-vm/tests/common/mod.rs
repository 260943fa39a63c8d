// lox-vm - Common test utilities
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Shared helpers for the VM integration tests.

pub use lox_vm::{CompileError, InterpretError, RuntimeError, VM};

/// Compile and run a source string in a fresh VM, returning its printed
/// output.
pub fn run(src: &str) -> Result<String, InterpretError> {
    let mut vm = VM::with_output(Vec::new());
    vm.interpret(src)?;
    Ok(String::from_utf8(vm.into_output()).expect("program output was not UTF-8"))
}

/// Run a source string, expecting a runtime error.
///
/// # Panics
///
/// Panics when the program compiles badly or runs to completion.
pub fn run_runtime_err(src: &str) -> RuntimeError {
    match run(src) {
        Err(InterpretError::Runtime(err)) => err,
        Err(InterpretError::Compile(errors)) => panic!("compile errors: {:?}", errors),
        Ok(out) => panic!("expected runtime error, program printed {:?}", out),
    }
}

/// Run a source string, expecting compile errors.
///
/// # Panics
///
/// Panics when the program compiles.
pub fn compile_errors(src: &str) -> Vec<CompileError> {
    match run(src) {
        Err(InterpretError::Compile(errors)) => errors,
        Err(InterpretError::Runtime(err)) => panic!("unexpected runtime error: {}", err),
        Ok(out) => panic!("expected compile errors, program printed {:?}", out),
    }
}
