// lox-core - Diagnostic format tests
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Exact diagnostic wording and rendering.
//!
//! Static errors render as `[line N] Error at '<lexeme>': <message>`
//! (or `at end`); runtime errors render as the bare message, with the
//! line exposed separately for the `[line N]` trailer.

mod common;

use common::*;

#[test]
fn parse_error_at_lexeme() {
    let errors = parse_errors("var 1 = 2;");
    assert_eq!(
        errors[0].to_string(),
        "[line 1] Error at '1': Expected a variable name."
    );
}

#[test]
fn parse_error_at_end() {
    let errors = parse_errors("print(1)");
    assert_eq!(
        errors[0].to_string(),
        "[line 1] Error at end: Expected ';' after value."
    );
}

#[test]
fn parse_error_line_numbers_follow_newlines() {
    let errors = parse_errors("var a = 1;\nvar b = ;\n");
    assert_eq!(
        errors[0].to_string(),
        "[line 2] Error at ';': Expected an expression."
    );
}

#[test]
fn resolver_error_rendering() {
    let errors = try_resolve("{ var a = a; }").unwrap_err();
    assert_eq!(
        errors[0].to_string(),
        "[line 1] Error at 'a': Can't read local variable in its own initializer."
    );

    let errors = try_resolve("return;").unwrap_err();
    assert_eq!(
        errors[0].to_string(),
        "[line 1] Error at 'return': Can't return from top-level code."
    );
}

#[test]
fn multiple_statements_each_report() {
    let errors = parse_errors("print ;\nprint ;\n");
    assert_eq!(errors.len(), 2);
    assert!(errors[0].to_string().starts_with("[line 1]"));
    assert!(errors[1].to_string().starts_with("[line 2]"));
}

#[test]
fn runtime_error_lines() {
    let err = run("var a = 1;\nvar b = 2;\nprint(a + nil);").unwrap_err();
    assert_eq!(err.to_string(), "Operands must be two numbers or two strings.");
    assert_eq!(err.line(), Some(3));

    let err = run("fun f(a, b) {}\nf(1);").unwrap_err();
    assert_eq!(err.to_string(), "Expected 2 arguments but got 1.");
    assert_eq!(err.line(), Some(2));
}

#[test]
fn undefined_variable_names_the_variable() {
    let err = run("print(oops);").unwrap_err();
    assert_eq!(err.to_string(), "Undefined variable 'oops'.");
}

#[test]
fn invalid_assignment_target_keeps_parsing() {
    // The error is reported but the parser continues in the same
    // statement, so a second error on a later line is found too.
    let errors = parse_errors("1 = 2;\nvar 3;\n");
    assert!(errors
        .iter()
        .any(|e| e.message == "Invalid assignment target."));
    assert!(errors
        .iter()
        .any(|e| e.message == "Expected a variable name."));
}

#[test]
fn scan_error_rendering() {
    let (_, errors) = Scanner::scan_all("var a = #;");
    assert_eq!(
        errors[0].to_string(),
        "[line 1] Error: Unexpected character '#'."
    );

    let (_, errors) = Scanner::scan_all("\n\"unclosed");
    assert_eq!(errors[0].to_string(), "[line 2] Error: Unterminated string.");
}
