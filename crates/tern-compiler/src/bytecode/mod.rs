//! Bytecode types for the Tern compiler.
//!
//! - [`OpCode`] - the instruction set of the virtual machine
//! - [`Chunk`] - an instruction stream plus its string constants
//! - [`disassemble`] - a readable listing of a chunk

mod chunk;
mod disassemble;
mod opcode;

pub use chunk::{Chunk, Hole};
pub use disassemble::disassemble;
pub use opcode::OpCode;
