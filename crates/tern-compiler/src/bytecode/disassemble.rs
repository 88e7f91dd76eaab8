//! Human-readable bytecode listings.

use std::fmt::{self, Write};

use super::{Chunk, OpCode};

/// Render one line per instruction: `<offset>\t| <mnemonic> <operand>`.
///
/// Bytes that are not an opcode, and operands cut off by the end of the
/// chunk, are listed instead of aborting the scan.
pub fn disassemble(chunk: &Chunk) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = write_listing(chunk, &mut out);
    out
}

fn write_listing(chunk: &Chunk, out: &mut impl Write) -> fmt::Result {
    let mut offset = 0;
    while offset < chunk.len() {
        write!(out, "{offset}\t| ")?;
        let Some(op) = chunk.read_op(offset) else {
            writeln!(out, "<bad opcode {}>", chunk.code()[offset])?;
            offset += 1;
            continue;
        };

        out.write_str(op.name())?;
        let operand = offset + 1;
        match op {
            OpCode::PushNumber => match chunk.read_f64(operand) {
                Some(n) => write!(out, " {n}")?,
                None => out.write_str(" <truncated>")?,
            },
            OpCode::PushString => match chunk.read_u16(operand) {
                Some(index) => match chunk.string(index) {
                    Some(s) => write!(out, " {:?}", s.as_str())?,
                    None => write!(out, " <bad string {index}>")?,
                },
                None => out.write_str(" <truncated>")?,
            },
            OpCode::Load | OpCode::Store => match chunk.read_u8(operand) {
                Some(slot) => write!(out, " ${slot}")?,
                None => out.write_str(" <truncated>")?,
            },
            OpCode::NativeCall => match (chunk.read_u8(operand), chunk.read_u8(operand + 1)) {
                (Some(index), Some(argc)) => write!(out, " #{index} {argc}")?,
                _ => out.write_str(" <truncated>")?,
            },
            OpCode::JumpBack => match chunk.read_u16(operand) {
                Some(distance) => write!(out, " -{distance}")?,
                None => out.write_str(" <truncated>")?,
            },
            op if op.is_forward_jump() => match chunk.read_u16(operand) {
                Some(distance) => write!(out, " +{distance}")?,
                None => out.write_str(" <truncated>")?,
            },
            _ => {}
        }
        out.write_char('\n')?;
        offset += 1 + op.operand_size();
    }
    Ok(())
}

impl fmt::Display for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_listing(self, f)
    }
}
