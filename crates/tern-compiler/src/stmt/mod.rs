//! Statement compilation.
//!
//! Statements are compiled as soon as they are parsed:
//! - Variable declarations push their initializer into a new stack slot
//! - Blocks pop the variables they declared when they end
//! - `if`, `while` and `for` emit forward jumps patched once their bodies
//!   are known
//! - `break` and `continue` unwind the loop's variables before jumping
//!
//! Every statement leaves the stack as it found it, except a declaration,
//! which leaves exactly its new variable, and the final expression
//! statement, which may leave the script result.

mod block;
mod for_stmt;
mod if_stmt;
mod loop_control;
mod var_decl;
mod while_stmt;

use tern_parser::TokenKind;

use crate::compiler::{Result, ScriptCompiler};

impl<'src, 'reg> ScriptCompiler<'src, 'reg> {
    pub(crate) fn statement(&mut self) -> Result<()> {
        let token = self.peek();
        self.emitter.set_span(token.span);
        tracing::trace!(line = token.span.line, kind = %token.kind, "compiling statement");

        match token.kind {
            TokenKind::Let => self.var_decl(),
            TokenKind::LeftBrace => self.block_stmt(),
            TokenKind::If => self.if_stmt(),
            TokenKind::While => self.while_stmt(),
            TokenKind::For => self.for_stmt(),
            TokenKind::Break => self.break_stmt(),
            TokenKind::Continue => self.continue_stmt(),
            _ => self.expr_stmt(),
        }
    }

    /// Evaluate an expression for its effects.
    ///
    /// The `;` may be left off the last statement of the script. When that
    /// statement is a top-level expression with a value, the value is kept
    /// as the script result instead of being popped.
    fn expr_stmt(&mut self) -> Result<()> {
        let expr = self.expression()?;
        let has_value = !expr.ty.is_void();
        self.finalize_expr(expr)?;

        if !self.check(TokenKind::Eof) {
            self.expect(TokenKind::Semicolon, "';' after expression")?;
        }

        if has_value && self.check(TokenKind::Eof) && self.scope.depth() == 0 {
            self.yields_value = true;
        } else if has_value {
            self.emitter.emit_pop();
        }
        Ok(())
    }
}
