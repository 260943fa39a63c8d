// lox-vm - Bytecode compiler and virtual machine for the Lox programming language
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Human-readable chunk disassembly.

use std::io::{self, Write};

use crate::chunk::Chunk;
use crate::opcode::OpCode;

/// Write a whole chunk in disassembled form.
pub fn disassemble_chunk(chunk: &Chunk, name: &str, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "== {} ==", name)?;
    let mut offset = 0;
    while offset < chunk.code.len() {
        offset = disassemble_instruction(chunk, offset, out)?;
    }
    Ok(())
}

/// Write one instruction; returns the offset of the next one.
pub fn disassemble_instruction(
    chunk: &Chunk,
    offset: usize,
    out: &mut impl Write,
) -> io::Result<usize> {
    write!(out, "{:04} ", offset)?;
    if offset > 0 && chunk.line(offset) == chunk.line(offset - 1) {
        write!(out, "   | ")?;
    } else {
        write!(out, "{:4} ", chunk.line(offset))?;
    }

    let op = match OpCode::try_from(chunk.code[offset]) {
        Ok(op) => op,
        Err(byte) => {
            writeln!(out, "Unknown opcode {:#04x}", byte)?;
            return Ok(offset + 1);
        }
    };

    match op {
        OpCode::Constant | OpCode::GetGlobal | OpCode::DefineGlobal | OpCode::SetGlobal => {
            let index = chunk.code[offset + 1];
            writeln!(
                out,
                "{:-16} {:4} '{}'",
                name_of(op),
                index,
                chunk.constant(index)
            )?;
            Ok(offset + 2)
        }
        OpCode::GetLocal | OpCode::SetLocal => {
            writeln!(out, "{:-16} {:4}", name_of(op), chunk.code[offset + 1])?;
            Ok(offset + 2)
        }
        OpCode::Jump | OpCode::JumpIfFalse | OpCode::Loop => {
            let operand =
                u16::from_be_bytes([chunk.code[offset + 1], chunk.code[offset + 2]]) as usize;
            let target = if op == OpCode::Loop {
                offset + 3 - operand
            } else {
                offset + 3 + operand
            };
            writeln!(out, "{:-16} {:4} -> {}", name_of(op), offset, target)?;
            Ok(offset + 3)
        }
        _ => {
            writeln!(out, "{}", name_of(op))?;
            Ok(offset + 1)
        }
    }
}

fn name_of(op: OpCode) -> &'static str {
    match op {
        OpCode::Constant => "OP_CONSTANT",
        OpCode::Nil => "OP_NIL",
        OpCode::True => "OP_TRUE",
        OpCode::False => "OP_FALSE",
        OpCode::Pop => "OP_POP",
        OpCode::GetLocal => "OP_GET_LOCAL",
        OpCode::SetLocal => "OP_SET_LOCAL",
        OpCode::GetGlobal => "OP_GET_GLOBAL",
        OpCode::DefineGlobal => "OP_DEFINE_GLOBAL",
        OpCode::SetGlobal => "OP_SET_GLOBAL",
        OpCode::Equal => "OP_EQUAL",
        OpCode::Greater => "OP_GREATER",
        OpCode::Less => "OP_LESS",
        OpCode::Add => "OP_ADD",
        OpCode::Subtract => "OP_SUBTRACT",
        OpCode::Multiply => "OP_MULTIPLY",
        OpCode::Divide => "OP_DIVIDE",
        OpCode::Not => "OP_NOT",
        OpCode::Negate => "OP_NEGATE",
        OpCode::Print => "OP_PRINT",
        OpCode::Jump => "OP_JUMP",
        OpCode::JumpIfFalse => "OP_JUMP_IF_FALSE",
        OpCode::Loop => "OP_LOOP",
        OpCode::Return => "OP_RETURN",
    }
}
