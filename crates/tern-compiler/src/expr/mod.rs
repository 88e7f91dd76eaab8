//! Expression parsing with type checking.
//!
//! Each precedence level is one method, lowest first:
//!
//! ```text
//! expression  → logic_or ( "=" expression )?
//! logic_or    → logic_and ( "||" logic_and )*
//! logic_and   → equality ( "&&" equality )*
//! equality    → relational ( ( "==" | "!=" ) relational )*
//! relational  → sum ( ( "<" | "<=" | ">" | ">=" ) sum )*
//! sum         → factor ( ( "+" | "-" ) factor )*
//! factor      → prefix ( ( "*" | "/" ) prefix )*
//! prefix      → ( "-" | "!" ) prefix | primary
//! primary     → literal | identifier | call | "(" expression ")"
//! ```
//!
//! Every node is typed as it is built, so type errors point at the operator
//! or operand that caused them.

mod binary;
mod calls;
mod primary;
mod unary;

use tern_core::CompilationError;
use tern_parser::{Expr, ExprKind, TokenKind};

use crate::compiler::{Result, ScriptCompiler};

impl<'src, 'reg> ScriptCompiler<'src, 'reg> {
    /// Parse a full expression, including assignment.
    pub(crate) fn expression(&mut self) -> Result<Expr> {
        let target = self.logic_or()?;

        let Some(equals) = self.eat(TokenKind::Equal) else {
            return Ok(target);
        };
        let ExprKind::GetVar { slot } = target.kind else {
            return Err(CompilationError::InvalidOperation {
                message: "left side of '=' must be a variable".to_string(),
                span: equals.span,
            }
            .into());
        };

        // Right associative: `a = b = 1` assigns `b` first
        let value = self.expression()?;
        if !target.ty.accepts(value.ty) {
            return Err(CompilationError::TypeMismatch {
                message: format!(
                    "cannot assign '{}' to a variable of type '{}'",
                    value.ty, target.ty
                ),
                span: value.span,
            }
            .into());
        }

        let span = target.span.merge(value.span);
        Ok(Expr::set_var(slot, target.ty, value, span))
    }
}
