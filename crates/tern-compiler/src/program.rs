//! The output of a successful compile.

use crate::bytecode::{Chunk, disassemble};

/// A compiled script: its bytecode plus the stack shape it leaves behind.
#[derive(Debug, Clone)]
pub struct Program {
    chunk: Chunk,
    /// Top-level variables still on the stack when the script ends.
    globals: usize,
    /// Whether the script ends with its result on top of the stack.
    yields_value: bool,
}

impl Program {
    pub fn new(chunk: Chunk, globals: usize, yields_value: bool) -> Self {
        Self {
            chunk,
            globals,
            yields_value,
        }
    }

    pub fn chunk(&self) -> &Chunk {
        &self.chunk
    }

    pub fn globals(&self) -> usize {
        self.globals
    }

    pub fn yields_value(&self) -> bool {
        self.yields_value
    }

    /// Stack depth right after the last instruction.
    pub fn final_depth(&self) -> usize {
        self.globals + usize::from(self.yields_value)
    }

    pub fn disassemble(&self) -> String {
        disassemble(&self.chunk)
    }
}
