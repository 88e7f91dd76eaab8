//! Bytecode emitter for the Tern compiler.
//!
//! The [`BytecodeEmitter`] wraps a [`Chunk`] with the current source span,
//! forward/backward jump helpers and the loop bookkeeping `break` and
//! `continue` need.
//!
//! # Example
//!
//! ```
//! use tern_compiler::bytecode::OpCode;
//! use tern_compiler::emit::BytecodeEmitter;
//!
//! let mut emitter = BytecodeEmitter::new();
//! emitter.emit_number(42.0);
//! emitter.emit_number(10.0);
//! emitter.emit(OpCode::Add);
//!
//! let chunk = emitter.finish();
//! chunk.assert_opcodes(&[OpCode::PushNumber, OpCode::PushNumber, OpCode::Add]);
//! ```

mod expr;
mod jumps;

pub use expr::compile_expr;

use tern_core::{CompilationError, ScriptString, Span};

use crate::bytecode::{Chunk, Hole, OpCode};
pub use jumps::JumpManager;

type Result<T> = std::result::Result<T, CompilationError>;

/// A forward jump waiting for its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JumpLabel(pub(crate) Hole);

/// Loop control used where it has no loop to act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakError {
    /// `break` outside of a loop.
    BreakOutsideLoop,
    /// `continue` outside of a loop.
    ContinueOutsideLoop,
}

impl std::fmt::Display for BreakError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BreakError::BreakOutsideLoop => write!(f, "break statement not inside a loop"),
            BreakError::ContinueOutsideLoop => write!(f, "continue statement not inside a loop"),
        }
    }
}

pub struct BytecodeEmitter {
    chunk: Chunk,
    jumps: JumpManager,
    /// Span of the statement being compiled, for line info and errors.
    current_span: Span,
}

impl Default for BytecodeEmitter {
    fn default() -> Self {
        Self::new()
    }
}

impl BytecodeEmitter {
    pub fn new() -> Self {
        Self {
            chunk: Chunk::new(),
            jumps: JumpManager::new(),
            current_span: Span::point(1, 1),
        }
    }

    pub fn set_span(&mut self, span: Span) {
        self.current_span = span;
    }

    pub fn current_span(&self) -> Span {
        self.current_span
    }

    #[inline]
    fn line(&self) -> u32 {
        self.current_span.line
    }

    // ==========================================================================
    // Basic Emission
    // ==========================================================================

    pub fn emit(&mut self, op: OpCode) {
        self.chunk.write_op(op, self.line());
    }

    pub fn emit_byte(&mut self, op: OpCode, byte: u8) {
        self.emit(op);
        self.chunk.write_u8(byte, self.line());
    }

    pub fn emit_number(&mut self, value: f64) {
        self.emit(OpCode::PushNumber);
        self.chunk.write_f64(value, self.line());
    }

    pub fn emit_bool(&mut self, value: bool) {
        self.emit(if value {
            OpCode::PushTrue
        } else {
            OpCode::PushFalse
        });
    }

    pub fn emit_null(&mut self) {
        self.emit(OpCode::PushNull);
    }

    /// Add `value` to the string pool and push it.
    pub fn emit_string(&mut self, value: ScriptString) -> Result<()> {
        let index = self
            .chunk
            .add_string(value)
            .ok_or(CompilationError::TooManyStrings {
                limit: u16::MAX as usize + 1,
                span: self.current_span,
            })?;
        self.emit(OpCode::PushString);
        self.chunk.write_u16(index, self.line());
        Ok(())
    }

    pub fn emit_load(&mut self, slot: u8) {
        self.emit_byte(OpCode::Load, slot);
    }

    pub fn emit_store(&mut self, slot: u8) {
        self.emit_byte(OpCode::Store, slot);
    }

    pub fn emit_pop(&mut self) {
        self.emit(OpCode::Pop);
    }

    pub fn emit_pop_n(&mut self, count: usize) {
        for _ in 0..count {
            self.emit_pop();
        }
    }

    pub fn emit_copy(&mut self) {
        self.emit(OpCode::Copy);
    }

    pub fn emit_native_call(&mut self, index: u8, argc: u8) {
        self.emit_byte(OpCode::NativeCall, index);
        self.chunk.write_u8(argc, self.line());
    }

    // ==========================================================================
    // Jumps
    // ==========================================================================

    /// Emit a forward jump with a hole for its distance.
    pub fn emit_jump(&mut self, op: OpCode) -> JumpLabel {
        debug_assert!(op.is_forward_jump(), "{} is not a forward jump", op.name());
        self.emit(op);
        JumpLabel(self.chunk.write_hole(self.line()))
    }

    /// Point a forward jump at the current position.
    pub fn patch_jump(&mut self, label: JumpLabel) -> Result<()> {
        self.chunk
            .patch_hole(label.0)
            .map_err(|distance| self.too_far(distance))
    }

    /// Emit a backward jump to `target`.
    pub fn emit_jump_back(&mut self, target: usize) -> Result<()> {
        let line = self.line();
        self.chunk
            .write_jump_back(target, line)
            .map_err(|distance| self.too_far(distance))
    }

    fn too_far(&self, distance: usize) -> CompilationError {
        CompilationError::CodeTooLarge {
            distance,
            span: self.current_span,
        }
    }

    pub fn current_offset(&self) -> usize {
        self.chunk.current_offset()
    }

    // ==========================================================================
    // Loop Control
    // ==========================================================================

    pub fn enter_loop(&mut self) {
        self.jumps.enter_loop();
    }

    /// Send pending `continue` jumps of the innermost loop here.
    pub fn patch_continues(&mut self) -> Result<()> {
        for label in self.jumps.take_continues() {
            self.patch_jump(label)?;
        }
        Ok(())
    }

    /// Leave the innermost loop, sending its `break` jumps here.
    pub fn exit_loop(&mut self) -> Result<()> {
        for label in self.jumps.exit_loop() {
            self.patch_jump(label)?;
        }
        Ok(())
    }

    /// Drop the loop's variables and jump to its exit.
    pub fn emit_break(&mut self) -> std::result::Result<(), BreakError> {
        let vars = self.jumps.loop_vars().ok_or(BreakError::BreakOutsideLoop)?;
        self.emit_pop_n(vars);
        let label = self.emit_jump(OpCode::Jump);
        self.jumps.add_break(label);
        Ok(())
    }

    /// Drop the loop's variables and jump to its next iteration.
    pub fn emit_continue(&mut self) -> std::result::Result<(), BreakError> {
        let vars = self.jumps.loop_vars().ok_or(BreakError::ContinueOutsideLoop)?;
        self.emit_pop_n(vars);
        let label = self.emit_jump(OpCode::Jump);
        self.jumps.add_continue(label);
        Ok(())
    }

    pub fn in_loop(&self) -> bool {
        self.jumps.in_loop()
    }

    /// Record a variable declaration for the innermost loop.
    pub fn var_declared(&mut self) {
        self.jumps.var_declared();
    }

    /// Record variables leaving scope for the innermost loop.
    pub fn vars_popped(&mut self, count: usize) {
        self.jumps.vars_popped(count);
    }

    // ==========================================================================
    // Finalization
    // ==========================================================================

    pub fn chunk(&self) -> &Chunk {
        &self.chunk
    }

    pub fn finish(self) -> Chunk {
        self.chunk
    }
}
