//! If statement compilation.

use tern_core::CompilationError;
use tern_parser::TokenKind;

use crate::bytecode::OpCode;
use crate::compiler::{Result, ScriptCompiler};

impl<'src, 'reg> ScriptCompiler<'src, 'reg> {
    /// Compile an if statement, with an optional `else` block or `else if`
    /// chain.
    ///
    /// Bytecode layout:
    /// ```text
    /// [condition]
    /// JumpIfFalse -> else
    /// [then block]
    /// Jump -> end        (only with else)
    /// else:
    /// [else block]
    /// end:
    /// ```
    pub(crate) fn if_stmt(&mut self) -> Result<()> {
        self.advance();

        let condition = self.expression()?;
        if !condition.ty.is_boolean() {
            return Err(CompilationError::TypeMismatch {
                message: format!("if condition must be a bool, found '{}'", condition.ty),
                span: condition.span,
            }
            .into());
        }
        self.finalize_expr(condition)?;
        let skip_then = self.emitter.emit_jump(OpCode::JumpIfFalse);

        self.expect_block("if condition")?;
        self.block()?;

        if self.eat(TokenKind::Else).is_none() {
            self.emitter.patch_jump(skip_then)?;
            return Ok(());
        }

        let skip_else = self.emitter.emit_jump(OpCode::Jump);
        self.emitter.patch_jump(skip_then)?;

        if self.check(TokenKind::If) {
            self.emitter.set_span(self.peek().span);
            self.if_stmt()?;
        } else {
            self.expect_block("'else'")?;
            self.block()?;
        }

        self.emitter.patch_jump(skip_else)?;
        Ok(())
    }
}
