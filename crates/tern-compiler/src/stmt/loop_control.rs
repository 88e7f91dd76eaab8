//! `break` and `continue`.

use tern_core::{ParseError, ParseErrorKind};
use tern_parser::TokenKind;

use crate::compiler::{Result, ScriptCompiler};
use crate::emit::BreakError;

impl<'src, 'reg> ScriptCompiler<'src, 'reg> {
    pub(crate) fn break_stmt(&mut self) -> Result<()> {
        let token = self.advance();
        self.emitter
            .emit_break()
            .map_err(|e| loop_control_error(e, token.span))?;
        self.expect(TokenKind::Semicolon, "';' after 'break'")?;
        Ok(())
    }

    pub(crate) fn continue_stmt(&mut self) -> Result<()> {
        let token = self.advance();
        self.emitter
            .emit_continue()
            .map_err(|e| loop_control_error(e, token.span))?;
        self.expect(TokenKind::Semicolon, "';' after 'continue'")?;
        Ok(())
    }
}

fn loop_control_error(error: BreakError, span: tern_core::Span) -> ParseError {
    let kind = match error {
        BreakError::BreakOutsideLoop => ParseErrorKind::BreakOutsideLoop,
        BreakError::ContinueOutsideLoop => ParseErrorKind::ContinueOutsideLoop,
    };
    ParseError::new(kind, span, error.to_string())
}
