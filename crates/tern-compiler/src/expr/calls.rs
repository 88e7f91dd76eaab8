//! Native function calls.

use tern_core::{CompilationError, TernError};
use tern_parser::{Expr, Token, TokenKind};

use crate::compiler::{Result, ScriptCompiler};

/// Argument counts are a single byte in bytecode.
const MAX_ARGUMENTS: usize = u8::MAX as usize;

impl<'src, 'reg> ScriptCompiler<'src, 'reg> {
    /// Parse the argument list of a call to the native function `name` and
    /// check it against the function's signature.
    pub(crate) fn call(&mut self, name: Token<'src>) -> Result<Expr> {
        let registry = self.registry;
        let Some((index, native)) = registry.lookup(name.lexeme) else {
            return Err(unknown(name));
        };
        let signature = native.signature();

        self.expect(TokenKind::LeftParen, "'('")?;
        let mut args = Vec::new();
        while !self.check(TokenKind::RightParen) {
            let arg = self.expression()?;
            let position = args.len() + 1;

            if arg.ty.is_void() {
                return Err(CompilationError::TypeMismatch {
                    message: format!("argument {position} of '{}' has no value", signature.name),
                    span: arg.span,
                }
                .into());
            }
            // The variadic tail takes any non-void value
            if let Some(param) = signature.params.get(args.len()) {
                if !param.accepts(arg.ty) {
                    return Err(CompilationError::TypeMismatch {
                        message: format!(
                            "argument {position} of '{}' expects '{param}', found '{}'",
                            signature.name, arg.ty
                        ),
                        span: arg.span,
                    }
                    .into());
                }
            }
            if position > MAX_ARGUMENTS {
                return Err(CompilationError::TooManyArguments {
                    name: signature.name.clone(),
                    limit: MAX_ARGUMENTS,
                    span: arg.span,
                }
                .into());
            }
            args.push(arg);

            if self.eat(TokenKind::Comma).is_none() {
                break;
            }
        }
        let close = self.expect(TokenKind::RightParen, "')' to close argument list")?;
        let span = name.span.merge(close.span);

        let expected = signature.params.len();
        if signature.variadic && args.len() < expected {
            return Err(CompilationError::TooFewArguments {
                name: signature.name.clone(),
                minimum: expected,
                got: args.len(),
                span,
            }
            .into());
        }
        if !signature.variadic && args.len() != expected {
            return Err(CompilationError::ArgumentCountMismatch {
                name: signature.name.clone(),
                expected,
                got: args.len(),
                span,
            }
            .into());
        }

        Ok(Expr::native_call(index, signature.return_type, args, span))
    }
}

fn unknown(name: Token<'_>) -> TernError {
    CompilationError::UnknownSymbol {
        name: name.lexeme.to_string(),
        span: name.span,
    }
    .into()
}
