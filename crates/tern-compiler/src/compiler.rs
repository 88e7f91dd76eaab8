//! The single-pass script compiler.
//!
//! [`ScriptCompiler`] pulls tokens from the lexer, builds a typed expression
//! tree per expression, folds it and emits bytecode straight away. There is
//! no statement-level syntax tree: statements are compiled as soon as they
//! are recognized.

use tern_core::{CompilationError, ParseError, ParseErrorKind, Span, TernError, TypeDef};
use tern_parser::{Expr, Lexer, Token, TokenKind};
use tern_registry::Registry;

use crate::emit::{BytecodeEmitter, compile_expr};
use crate::scope::LocalScope;
use crate::{CompileOptions, Program};

pub(crate) type Result<T> = std::result::Result<T, TernError>;

pub struct ScriptCompiler<'src, 'reg> {
    pub(crate) lexer: Lexer<'src>,
    pub(crate) registry: &'reg Registry,
    pub(crate) emitter: BytecodeEmitter,
    pub(crate) scope: LocalScope,
    /// Set when the last statement leaves its value as the script result.
    pub(crate) yields_value: bool,
}

impl<'src, 'reg> ScriptCompiler<'src, 'reg> {
    pub fn new(source: &'src str, registry: &'reg Registry, options: CompileOptions) -> Self {
        Self {
            lexer: Lexer::new(source),
            registry,
            emitter: BytecodeEmitter::new(),
            scope: LocalScope::with_capacity(options.max_variables),
            yields_value: false,
        }
    }

    /// Compile every statement of the source.
    pub fn compile(mut self) -> Result<Program> {
        while !self.check(TokenKind::Eof) {
            self.statement()?;
        }

        let globals = self.scope.len();
        Ok(Program::new(self.emitter.finish(), globals, self.yields_value))
    }

    // ==========================================================================
    // Tokens
    // ==========================================================================

    #[inline]
    pub(crate) fn peek(&self) -> Token<'src> {
        self.lexer.peek()
    }

    #[inline]
    pub(crate) fn advance(&mut self) -> Token<'src> {
        self.lexer.advance()
    }

    #[inline]
    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.lexer.check(kind)
    }

    pub(crate) fn eat(&mut self, kind: TokenKind) -> Option<Token<'src>> {
        self.lexer.eat(kind)
    }

    /// Consume a token of the given kind or fail naming `expected`.
    pub(crate) fn expect(&mut self, kind: TokenKind, expected: &str) -> Result<Token<'src>> {
        let token = self.peek();
        if token.kind == kind {
            Ok(self.advance())
        } else {
            Err(self.unexpected(token, expected))
        }
    }

    pub(crate) fn expect_identifier(&mut self, after: &str) -> Result<Token<'src>> {
        let token = self.peek();
        match token.kind {
            TokenKind::Identifier => Ok(self.advance()),
            TokenKind::Error | TokenKind::Eof => {
                Err(self.unexpected(token, &format!("identifier after {after}")))
            }
            _ => Err(ParseError::expected_identifier(token.span, &describe(&token)).into()),
        }
    }

    /// Consume the `{` opening a statement body.
    pub(crate) fn expect_block(&mut self, after: &str) -> Result<Token<'src>> {
        let token = self.peek();
        match token.kind {
            TokenKind::LeftBrace => Ok(self.advance()),
            TokenKind::Error | TokenKind::Eof => {
                Err(self.unexpected(token, &format!("'{{' after {after}")))
            }
            _ => Err(ParseError::new(
                ParseErrorKind::ExpectedBlock,
                token.span,
                format!("expected '{{' after {after}, found {}", describe(&token)),
            )
            .into()),
        }
    }

    /// Error for `token` appearing where `expected` should be.
    ///
    /// Error tokens report the lexer's own error.
    pub(crate) fn unexpected(&mut self, token: Token<'_>, expected: &str) -> TernError {
        match token.kind {
            TokenKind::Error => match self.lexer.take_error() {
                Some(error) => error.into(),
                None => ParseError::unexpected_token(token.span, token.lexeme).into(),
            },
            TokenKind::Eof => ParseError::unexpected_eof(token.span, expected).into(),
            _ => ParseError::expected_token(token.span, expected, &describe(&token)).into(),
        }
    }

    // ==========================================================================
    // Scopes
    // ==========================================================================

    /// Declare a variable whose value is about to be pushed.
    pub(crate) fn declare_var(&mut self, name: &str, ty: TypeDef, span: Span) -> Result<u8> {
        if self.registry.contains(name) {
            return Err(CompilationError::InvalidOperation {
                message: format!("'{name}' is already a native function"),
                span,
            }
            .into());
        }
        let slot = self.scope.declare(name, ty, span)?;
        self.emitter.var_declared();
        Ok(slot)
    }

    pub(crate) fn begin_scope(&mut self) {
        self.scope.push_scope();
    }

    /// Leave a block, popping its variables off the stack.
    pub(crate) fn end_scope(&mut self) {
        let dropped = self.scope.pop_scope();
        self.emitter.emit_pop_n(dropped);
        self.emitter.vars_popped(dropped);
    }

    // ==========================================================================
    // Emission
    // ==========================================================================

    /// Fold an expression tree and emit it.
    pub(crate) fn finalize_expr(&mut self, mut expr: Expr) -> Result<()> {
        expr.simplify();
        compile_expr(&mut self.emitter, &expr)?;
        Ok(())
    }
}

/// How a token is named in error messages.
pub(crate) fn describe(token: &Token<'_>) -> String {
    match token.kind {
        TokenKind::Identifier => format!("identifier '{}'", token.lexeme),
        TokenKind::Number | TokenKind::String => {
            format!("{} {}", token.kind.description(), token.lexeme)
        }
        kind => kind.description().to_string(),
    }
}
