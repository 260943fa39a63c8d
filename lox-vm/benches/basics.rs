// lox-vm - Bytecode compiler and virtual machine for the Lox programming language
// Copyright (c) 2025 Tom Waddington. MIT licensed.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lox_vm::VM;

fn arithmetic(c: &mut Criterion) {
    let src = "\
        var sum = 0;\n\
        for (var i = 0; i < 1000; i = i + 1) {\n\
            sum = sum + i * 2 - i / 2;\n\
        }\n";
    c.bench_function("arithmetic_loop", |b| {
        b.iter(|| {
            let mut vm = VM::with_output(std::io::sink());
            vm.interpret(black_box(src)).unwrap();
        })
    });
}

fn globals(c: &mut Criterion) {
    let src = "\
        var a = 1; var b = 2; var c = 3; var d = 4;\n\
        var i = 0;\n\
        while (i < 1000) {\n\
            a = b; b = c; c = d; d = a;\n\
            i = i + 1;\n\
        }\n";
    c.bench_function("global_access", |b| {
        b.iter(|| {
            let mut vm = VM::with_output(std::io::sink());
            vm.interpret(black_box(src)).unwrap();
        })
    });
}

fn string_interning(c: &mut Criterion) {
    let src = "\
        var s = \"\";\n\
        for (var i = 0; i < 100; i = i + 1) {\n\
            s = s + \"x\";\n\
        }\n";
    c.bench_function("string_concat", |b| {
        b.iter(|| {
            let mut vm = VM::with_output(std::io::sink());
            vm.interpret(black_box(src)).unwrap();
        })
    });
}

criterion_group!(benches, arithmetic, globals, string_interning);
criterion_main!(benches);
