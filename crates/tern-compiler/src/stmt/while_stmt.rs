//! While loop compilation.
//!
//! Handles while loops with a loop context for break/continue statements.

use tern_core::CompilationError;

use crate::bytecode::OpCode;
use crate::compiler::{Result, ScriptCompiler};

impl<'src, 'reg> ScriptCompiler<'src, 'reg> {
    /// Compile a while loop. The condition must be a bool.
    ///
    /// Bytecode layout:
    /// ```text
    /// cond:
    /// [condition]
    /// JumpIfFalse -> exit
    /// [body]
    /// continue:
    /// JumpBack -> cond
    /// exit:
    /// ```
    pub(crate) fn while_stmt(&mut self) -> Result<()> {
        self.advance();

        let condition = self.expression()?;
        if !condition.ty.is_boolean() {
            return Err(CompilationError::TypeMismatch {
                message: format!("while condition must be a bool, found '{}'", condition.ty),
                span: condition.span,
            }
            .into());
        }

        let cond_pos = self.emitter.current_offset();
        self.finalize_expr(condition)?;
        let exit = self.emitter.emit_jump(OpCode::JumpIfFalse);

        self.expect_block("while condition")?;
        self.emitter.enter_loop();
        self.block()?;

        self.emitter.patch_continues()?;
        self.emitter.emit_jump_back(cond_pos)?;
        self.emitter.patch_jump(exit)?;
        self.emitter.exit_loop()?;
        Ok(())
    }
}
