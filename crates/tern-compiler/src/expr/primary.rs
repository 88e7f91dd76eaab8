//! Literals, names and parenthesized expressions.

use tern_core::{CompilationError, ParseError, Value};
use tern_parser::{Expr, Token, TokenKind};

use crate::compiler::{Result, ScriptCompiler, describe};

impl<'src, 'reg> ScriptCompiler<'src, 'reg> {
    pub(crate) fn primary(&mut self) -> Result<Expr> {
        let token = self.peek();
        let value = match token.kind {
            TokenKind::Null => Value::Null,
            TokenKind::True => Value::Boolean(true),
            TokenKind::False => Value::Boolean(false),
            TokenKind::Number => match token.number() {
                Some(n) => Value::Number(n),
                None => return Err(ParseError::unexpected_token(token.span, token.lexeme).into()),
            },
            TokenKind::String => Value::string(token.string_contents().unwrap_or_default()),
            TokenKind::Identifier => {
                self.advance();
                return self.identifier(token);
            }
            TokenKind::LeftParen => {
                self.advance();
                let inner = self.expression()?;
                let close = self.expect(TokenKind::RightParen, "')' to close '('")?;
                return Ok(Expr {
                    span: token.span.merge(close.span),
                    ..inner
                });
            }
            TokenKind::Error | TokenKind::Eof => {
                return Err(self.unexpected(token, "expression"));
            }
            _ => return Err(ParseError::expected_expression(token.span, &describe(&token)).into()),
        };

        self.advance();
        Ok(Expr::literal(value, token.span))
    }

    /// A variable read or a native call.
    fn identifier(&mut self, name: Token<'src>) -> Result<Expr> {
        let is_call = self.check(TokenKind::LeftParen);

        if let Some((slot, var)) = self.scope.lookup(name.lexeme) {
            if is_call {
                return Err(CompilationError::NotAFunction {
                    name: name.lexeme.to_string(),
                    span: name.span,
                }
                .into());
            }
            return Ok(Expr::get_var(slot, var.ty, name.span));
        }

        if self.registry.contains(name.lexeme) {
            if !is_call {
                return Err(CompilationError::NotAValue {
                    name: name.lexeme.to_string(),
                    span: name.span,
                }
                .into());
            }
            return self.call(name);
        }

        Err(CompilationError::UnknownSymbol {
            name: name.lexeme.to_string(),
            span: name.span,
        }
        .into())
    }
}
