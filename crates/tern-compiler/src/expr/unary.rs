//! Prefix operators.

use tern_core::{CompilationError, TypeDef};
use tern_parser::{Expr, UnaryOp};

use crate::compiler::{Result, ScriptCompiler};

impl<'src, 'reg> ScriptCompiler<'src, 'reg> {
    /// `-x` needs a definite number and `!x` a definite boolean.
    pub(crate) fn prefix(&mut self) -> Result<Expr> {
        let Some(op) = UnaryOp::from_token(self.peek().kind) else {
            return self.primary();
        };
        let token = self.advance();
        let operand = self.prefix()?;

        let (ty, expected) = match op {
            UnaryOp::Neg => (TypeDef::NUMBER, "a number"),
            UnaryOp::Not => (TypeDef::BOOLEAN, "a boolean"),
        };
        if operand.ty != ty {
            return Err(CompilationError::InvalidOperation {
                message: format!("operator '{op}' needs {expected}, found '{}'", operand.ty),
                span: token.span.merge(operand.span),
            }
            .into());
        }

        let span = token.span.merge(operand.span);
        Ok(Expr::unary(op, operand, ty, span))
    }
}
