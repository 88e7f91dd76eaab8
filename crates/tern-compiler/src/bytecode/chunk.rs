//! Bytecode chunk for a compiled script.
//!
//! A [`Chunk`] holds the instruction bytes, the source line of every byte and
//! the string constants the instructions refer to by index.

use tern_core::ScriptString;

use super::OpCode;

/// Position of a reserved 16-bit jump operand that still has to be patched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hole(pub usize);

#[derive(Debug, Clone, Default)]
pub struct Chunk {
    code: Vec<u8>,
    /// Line numbers, parallel to `code`.
    lines: Vec<u32>,
    /// String constants. Every literal gets its own entry.
    strings: Vec<ScriptString>,
}

impl Chunk {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_op(&mut self, op: OpCode, line: u32) {
        self.write_u8(op.into(), line);
    }

    pub fn write_u8(&mut self, byte: u8, line: u32) {
        self.code.push(byte);
        self.lines.push(line);
    }

    pub fn write_u16(&mut self, value: u16, line: u32) {
        for byte in value.to_le_bytes() {
            self.write_u8(byte, line);
        }
    }

    pub fn write_f64(&mut self, value: f64, line: u32) {
        for byte in value.to_le_bytes() {
            self.write_u8(byte, line);
        }
    }

    /// Reserve a zeroed 16-bit operand to be filled in by [`patch_hole`](Self::patch_hole).
    pub fn write_hole(&mut self, line: u32) -> Hole {
        let hole = Hole(self.code.len());
        self.write_u16(0, line);
        hole
    }

    /// Fill a hole with the distance from just after it to the current end.
    ///
    /// Returns the distance as the error when it does not fit 16 bits.
    pub fn patch_hole(&mut self, hole: Hole) -> Result<(), usize> {
        let distance = self.code.len() - hole.0 - 2;
        let value = u16::try_from(distance).map_err(|_| distance)?;
        self.code[hole.0..hole.0 + 2].copy_from_slice(&value.to_le_bytes());
        Ok(())
    }

    /// Write a backward jump to `target`.
    ///
    /// The operand counts from the end of the operand back to `target`.
    pub fn write_jump_back(&mut self, target: usize, line: u32) -> Result<(), usize> {
        self.write_op(OpCode::JumpBack, line);
        let distance = self.code.len() + 2 - target;
        let value = u16::try_from(distance).map_err(|_| distance)?;
        self.write_u16(value, line);
        Ok(())
    }

    /// Intern a string constant and return its pool index.
    ///
    /// Returns `None` once the pool has no 16-bit index left.
    pub fn add_string(&mut self, string: ScriptString) -> Option<u16> {
        let index = u16::try_from(self.strings.len()).ok()?;
        self.strings.push(string);
        Some(index)
    }

    pub fn string(&self, index: u16) -> Option<&ScriptString> {
        self.strings.get(index as usize)
    }

    pub fn strings(&self) -> &[ScriptString] {
        &self.strings
    }

    #[inline]
    pub fn current_offset(&self) -> usize {
        self.code.len()
    }

    #[inline]
    pub fn code(&self) -> &[u8] {
        &self.code
    }

    pub fn line_at(&self, offset: usize) -> Option<u32> {
        self.lines.get(offset).copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.code.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    // =========================================================================
    // Checked reads
    // =========================================================================

    pub fn read_op(&self, offset: usize) -> Option<OpCode> {
        self.code.get(offset).copied().and_then(OpCode::from_u8)
    }

    pub fn read_u8(&self, offset: usize) -> Option<u8> {
        self.code.get(offset).copied()
    }

    pub fn read_u16(&self, offset: usize) -> Option<u16> {
        let bytes = self.code.get(offset..offset + 2)?;
        Some(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    pub fn read_f64(&self, offset: usize) -> Option<f64> {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(self.code.get(offset..offset + 8)?);
        Some(f64::from_le_bytes(buf))
    }

    // =========================================================================
    // Test helpers
    // =========================================================================

    /// All opcodes in order, skipping operands.
    pub fn opcodes(&self) -> Vec<OpCode> {
        let mut ops = Vec::new();
        let mut offset = 0;

        while offset < self.code.len() {
            match self.read_op(offset) {
                Some(op) => {
                    ops.push(op);
                    offset += 1 + op.operand_size();
                }
                None => offset += 1,
            }
        }

        ops
    }

    /// Check that the chunk holds exactly the given opcode sequence.
    #[track_caller]
    pub fn assert_opcodes(&self, expected: &[OpCode]) {
        let actual = self.opcodes();
        assert_eq!(
            actual,
            expected,
            "Bytecode mismatch.\nExpected: {:?}\nActual:   {:?}",
            expected.iter().map(|op| op.name()).collect::<Vec<_>>(),
            actual.iter().map(|op| op.name()).collect::<Vec<_>>(),
        );
    }
}
