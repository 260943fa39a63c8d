// lox-core - Built-in native functions
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Native functions installed in the global frame.
//!
//! `print` is a statement, not a function, so the globals hold only
//! `clock` and `type`.

use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::env::Environment;
use crate::error::Result;
use crate::value::{NativeFn, Value};

/// Register every built-in in the given (global) frame.
pub fn register_builtins(globals: &Environment) {
    globals.define(
        "clock",
        Value::Native(NativeFn {
            name: "clock",
            arity: 0,
            call: native_clock,
        }),
    );
    globals.define(
        "type",
        Value::Native(NativeFn {
            name: "type",
            arity: 1,
            call: native_type,
        }),
    );
}

/// `clock()` — seconds since the Unix epoch, as a Number.
fn native_clock(_args: &[Value]) -> Result<Value> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    Ok(Value::Number(now.as_secs_f64()))
}

/// `type(x)` — the lowercase type name of `x`, as a string.
fn native_type(args: &[Value]) -> Result<Value> {
    Ok(Value::Str(Rc::from(args[0].type_name())))
}
