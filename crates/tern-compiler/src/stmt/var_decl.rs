//! Variable declaration compilation.

use tern_core::CompilationError;
use tern_parser::TokenKind;

use crate::compiler::{Result, ScriptCompiler};

impl<'src, 'reg> ScriptCompiler<'src, 'reg> {
    /// `let name = value;`
    ///
    /// The initializer is parsed before the name is declared, so it cannot
    /// refer to the variable it initializes. Its value becomes the
    /// variable's stack slot.
    pub(crate) fn var_decl(&mut self) -> Result<()> {
        self.advance();
        let name = self.expect_identifier("'let'")?;
        self.expect(TokenKind::Equal, "'=' after variable name")?;

        let value = self.expression()?;
        if value.ty.is_void() {
            return Err(CompilationError::TypeMismatch {
                message: format!("'{}' can't be initialized with a void value", name.lexeme),
                span: value.span,
            }
            .into());
        }
        self.expect(TokenKind::Semicolon, "';' after variable declaration")?;

        let ty = value.ty;
        self.finalize_expr(value)?;
        self.declare_var(name.lexeme, ty, name.span)?;
        Ok(())
    }
}
