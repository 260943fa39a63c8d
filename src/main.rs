// lox - A Lox interpreter written in Rust
// Copyright (c) 2025 Tom Waddington. MIT licensed.

use std::env;
use std::fs;
use std::io::{self, Write};
use std::process;

use lox_core::{resolve, Interpreter};
use lox_parser::{NodeIds, Parser, Scanner};

// Exit codes follow sysexits.h: 64 usage, 65 data (static) error,
// 70 software (runtime) error, 74 I/O error.
const EX_USAGE: i32 = 64;
const EX_DATAERR: i32 = 65;
const EX_SOFTWARE: i32 = 70;
const EX_IOERR: i32 = 74;

fn main() {
    let args: Vec<String> = env::args().collect();
    match args.len() {
        1 => run_repl(),
        2 => run_file(&args[1]),
        _ => {
            eprintln!("Usage: lox [script]");
            process::exit(EX_USAGE);
        }
    }
}

/// How a single run failed, if it did.
enum RunError {
    /// Scan, parse or resolution errors; nothing executed.
    Static,
    /// Execution aborted partway.
    Runtime,
}

/// Load and execute a script, then exit.
fn run_file(path: &str) {
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Could not read '{}': {}", path, e);
            process::exit(EX_IOERR);
        }
    };

    let mut interpreter = Interpreter::new();
    let mut ids = NodeIds::new();
    match run(&source, &mut interpreter, &mut ids) {
        Ok(()) => {}
        Err(RunError::Static) => process::exit(EX_DATAERR),
        Err(RunError::Runtime) => process::exit(EX_SOFTWARE),
    }
}

/// The interactive prompt. One interpreter lives for the whole session:
/// globals persist, the static-error flag is per line.
fn run_repl() {
    let mut interpreter = Interpreter::new();
    let mut ids = NodeIds::new();
    let stdin = io::stdin();

    loop {
        print!("> ");
        if let Err(e) = io::stdout().flush() {
            eprintln!("Could not flush stdout: {}", e);
        }

        let mut line = String::new();
        match stdin.read_line(&mut line) {
            Ok(0) => {
                println!();
                break;
            }
            Ok(_) => {
                // Errors are reported and forgotten; the next line starts
                // clean while bindings survive.
                let _ = run(&line, &mut interpreter, &mut ids);
            }
            Err(e) => {
                eprintln!("Read error: {}", e);
                break;
            }
        }
    }
}

/// Scan, parse, resolve and execute one source buffer.
fn run(
    source: &str,
    interpreter: &mut Interpreter,
    ids: &mut NodeIds,
) -> Result<(), RunError> {
    let (tokens, scan_errors) = Scanner::scan_all(source);
    for error in &scan_errors {
        eprintln!("{}", error);
    }

    let program = match Parser::new(tokens, ids).parse() {
        Ok(program) => program,
        Err(errors) => {
            for error in errors {
                eprintln!("{}", error);
            }
            return Err(RunError::Static);
        }
    };
    if !scan_errors.is_empty() {
        return Err(RunError::Static);
    }

    let locals = match resolve(&program) {
        Ok(locals) => locals,
        Err(errors) => {
            for error in errors {
                eprintln!("{}", error);
            }
            return Err(RunError::Static);
        }
    };
    interpreter.resolve(locals);

    match interpreter.interpret(&program) {
        Ok(()) => Ok(()),
        Err(error) => {
            match error.line() {
                Some(line) => eprintln!("{}\n[line {}]", error, line),
                None => eprintln!("{}", error),
            }
            Err(RunError::Runtime)
        }
    }
}
