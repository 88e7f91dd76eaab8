//! Block statement compilation.

use tern_parser::TokenKind;

use crate::compiler::{Result, ScriptCompiler};

impl<'src, 'reg> ScriptCompiler<'src, 'reg> {
    /// A bare `{ ... }` statement.
    pub(crate) fn block_stmt(&mut self) -> Result<()> {
        self.expect_block("statement start")?;
        self.block()
    }

    /// Compile statements up to the closing `}`; the opening `{` is already
    /// consumed. Variables declared inside are popped at the end.
    pub(crate) fn block(&mut self) -> Result<()> {
        self.begin_scope();
        while !self.check(TokenKind::RightBrace) && !self.check(TokenKind::Eof) {
            self.statement()?;
        }
        let close = self.expect(TokenKind::RightBrace, "'}' to close '{'")?;

        // pops belong to the closing brace
        self.emitter.set_span(close.span);
        self.end_scope();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tern_core::{ParseErrorKind, TernError};
    use tern_registry::Registry;

    use crate::bytecode::OpCode;
    use crate::compile_script;

    #[test]
    fn block_pops_its_variables() {
        let program = compile_script("let a = 1; { let b = 2; let c = 3; }", &Registry::new()).unwrap();
        program.chunk().assert_opcodes(&[
            OpCode::PushNumber,
            OpCode::PushNumber,
            OpCode::PushNumber,
            OpCode::Pop,
            OpCode::Pop,
        ]);
        assert_eq!(program.globals(), 1);
    }

    #[test]
    fn nested_blocks() {
        let program =
            compile_script("{ let a = 1; { let b = a; } let c = a; }", &Registry::new()).unwrap();
        program.chunk().assert_opcodes(&[
            OpCode::PushNumber,
            OpCode::Load,
            OpCode::Pop,
            OpCode::Load,
            OpCode::Pop,
            OpCode::Pop,
        ]);
        assert_eq!(program.globals(), 0);
    }

    #[test]
    fn names_are_reusable_after_their_block() {
        assert!(compile_script("{ let a = 1; } let a = \"x\";", &Registry::new()).is_ok());
    }

    #[test]
    fn variables_do_not_leak_out_of_blocks() {
        assert!(matches!(
            compile_script("{ let a = 1; } a;", &Registry::new()),
            Err(TernError::Compilation(_))
        ));
    }

    #[test]
    fn unclosed_block() {
        let Err(TernError::Parse(error)) = compile_script("{ let a = 1;", &Registry::new()) else {
            panic!("expected parse error");
        };
        assert_eq!(error.kind, ParseErrorKind::UnexpectedEof);
    }
}
