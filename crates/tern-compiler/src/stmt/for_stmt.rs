//! Numeric range loop compilation.

use tern_core::{CompilationError, TypeDef};
use tern_parser::{Expr, LexerContext, TokenKind};

use crate::bytecode::OpCode;
use crate::compiler::{Result, ScriptCompiler};

impl<'src, 'reg> ScriptCompiler<'src, 'reg> {
    /// Compile `for name in from -> to [by step] { ... }`.
    ///
    /// `->` excludes `to` and `=>` includes it. Without `by`, a range whose
    /// bounds are both constant counts down when `from > to`; every other
    /// range counts up by one. The counter lives in its own slot for the
    /// duration of the loop.
    ///
    /// Bytecode layout:
    /// ```text
    /// [from]                       counter slot
    /// cond:
    /// Copy
    /// [to]
    /// Less | LessEqual | Greater | GreaterEqual
    /// JumpIfFalse -> exit
    /// [body]
    /// continue:
    /// Load counter, PushNumber step, Add, Store counter, Pop
    /// JumpBack -> cond
    /// exit:
    /// Pop                          counter
    /// ```
    pub(crate) fn for_stmt(&mut self) -> Result<()> {
        let for_token = self.advance();

        // `in` and `by` are keywords only inside the header
        self.lexer.set_context(LexerContext::ForHeader);
        let counter = self.expect_identifier("'for'")?;
        self.expect(TokenKind::In, "'in' after loop counter")?;

        let from = self.range_bound("start")?;
        let arrow = self.peek();
        let inclusive = match arrow.kind {
            TokenKind::Arrow => false,
            TokenKind::FatArrow => true,
            _ => return Err(self.unexpected(arrow, "'->' or '=>' after range start")),
        };
        self.advance();
        let to = self.range_bound("end")?;

        let step = if self.eat(TokenKind::By).is_some() {
            self.range_step()?
        } else {
            match (from.as_number(), to.as_number()) {
                (Some(start), Some(end)) if start > end => -1.0,
                _ => 1.0,
            }
        };
        self.lexer.set_context(LexerContext::Default);

        self.finalize_expr(from)?;
        let slot = self.declare_var(counter.lexeme, TypeDef::NUMBER, counter.span)?;

        let cond_pos = self.emitter.current_offset();
        self.emitter.emit_copy();
        self.finalize_expr(to)?;
        self.emitter.emit(match (step >= 0.0, inclusive) {
            (true, false) => OpCode::Less,
            (true, true) => OpCode::LessEqual,
            (false, false) => OpCode::Greater,
            (false, true) => OpCode::GreaterEqual,
        });
        let exit = self.emitter.emit_jump(OpCode::JumpIfFalse);

        self.expect_block("range end")?;
        self.emitter.enter_loop();
        self.block()?;

        self.emitter.set_span(for_token.span);
        self.emitter.patch_continues()?;
        self.emitter.emit_load(slot);
        self.emitter.emit_number(step);
        self.emitter.emit(OpCode::Add);
        self.emitter.emit_store(slot);
        self.emitter.emit_pop();
        self.emitter.emit_jump_back(cond_pos)?;

        self.emitter.patch_jump(exit)?;
        self.emitter.exit_loop()?;

        self.scope.pop_last();
        self.emitter.emit_pop();
        self.emitter.vars_popped(1);
        Ok(())
    }

    /// A range bound: any number expression, folded.
    fn range_bound(&mut self, which: &str) -> Result<Expr> {
        let mut bound = self.expression()?;
        if !bound.ty.is_number() {
            return Err(CompilationError::TypeMismatch {
                message: format!("range {which} must be a number, found '{}'", bound.ty),
                span: bound.span,
            }
            .into());
        }
        bound.simplify();
        Ok(bound)
    }

    /// The `by` step: a non-zero number known at compile time.
    fn range_step(&mut self) -> Result<f64> {
        let mut step = self.expression()?;
        if !step.ty.is_number() {
            return Err(CompilationError::TypeMismatch {
                message: format!("range step must be a number, found '{}'", step.ty),
                span: step.span,
            }
            .into());
        }
        step.simplify();
        match step.as_number() {
            Some(value) if value != 0.0 && !value.is_nan() => Ok(value),
            _ => Err(CompilationError::NonConstantStep { span: step.span }.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use tern_core::{CompilationError, TernError};
    use tern_registry::Registry;

    use crate::bytecode::{Chunk, OpCode};
    use crate::compile_script;

    fn compile(source: &str) -> Chunk {
        compile_script(source, &Registry::new()).unwrap().chunk().clone()
    }

    fn compare_op(chunk: &Chunk) -> OpCode {
        chunk
            .opcodes()
            .into_iter()
            .find(|op| {
                matches!(
                    op,
                    OpCode::Less | OpCode::LessEqual | OpCode::Greater | OpCode::GreaterEqual
                )
            })
            .expect("loop condition")
    }

    /// The step pushed by the increment, the last number literal.
    fn step(chunk: &Chunk) -> f64 {
        let mut offset = 0;
        let mut last = None;
        while let Some(op) = chunk.read_op(offset) {
            if op == OpCode::PushNumber {
                last = chunk.read_f64(offset + 1);
            }
            offset += 1 + op.operand_size();
        }
        last.expect("step")
    }

    #[test]
    fn loop_layout() {
        compile("for i in 0 -> 3 { }").assert_opcodes(&[
            OpCode::PushNumber,
            OpCode::Copy,
            OpCode::PushNumber,
            OpCode::Less,
            OpCode::JumpIfFalse,
            OpCode::Load,
            OpCode::PushNumber,
            OpCode::Add,
            OpCode::Store,
            OpCode::Pop,
            OpCode::JumpBack,
            OpCode::Pop,
        ]);
    }

    #[test]
    fn direction_and_inclusivity() {
        assert_eq!(compare_op(&compile("for i in 0 -> 3 { }")), OpCode::Less);
        assert_eq!(compare_op(&compile("for i in 0 => 3 { }")), OpCode::LessEqual);
        assert_eq!(compare_op(&compile("for i in 5 -> 1 { }")), OpCode::Greater);
        assert_eq!(
            compare_op(&compile("for i in 5 => 1 { }")),
            OpCode::GreaterEqual
        );
        assert_eq!(step(&compile("for i in 5 -> 1 { }")), -1.0);
    }

    #[test]
    fn folded_bounds_decide_direction() {
        assert_eq!(step(&compile("for i in 2 * 5 -> 1 + 1 { }")), -1.0);
    }

    #[test]
    fn variable_bounds_count_up() {
        let chunk = compile("let n = 0; for i in 5 -> n { }");
        assert_eq!(compare_op(&chunk), OpCode::Less);
        assert_eq!(step(&chunk), 1.0);
    }

    #[test]
    fn explicit_step() {
        let chunk = compile("for i in 0 -> 10 by 2 + 1 { }");
        assert_eq!(step(&chunk), 3.0);
        let chunk = compile("for i in 10 -> 0 by -2 { }");
        assert_eq!(compare_op(&chunk), OpCode::Greater);
        assert_eq!(step(&chunk), -2.0);
    }

    #[test]
    fn step_must_be_nonzero_constant() {
        let registry = Registry::new();
        assert!(matches!(
            compile_script("let s = 1; for i in 0 -> 3 by s { }", &registry),
            Err(TernError::Compilation(CompilationError::NonConstantStep { .. }))
        ));
        assert!(matches!(
            compile_script("for i in 0 -> 3 by 0 { }", &registry),
            Err(TernError::Compilation(CompilationError::NonConstantStep { .. }))
        ));
    }

    #[test]
    fn bounds_must_be_numbers() {
        assert!(matches!(
            compile_script("for i in \"a\" -> 3 { }", &Registry::new()),
            Err(TernError::Compilation(CompilationError::TypeMismatch { .. }))
        ));
    }

    #[test]
    fn counter_is_scoped_to_the_loop() {
        let registry = Registry::new();
        assert!(compile_script("for i in 0 -> 3 { } for i in 0 -> 3 { }", &registry).is_ok());
        assert!(matches!(
            compile_script("for i in 0 -> 3 { } i;", &registry),
            Err(TernError::Compilation(CompilationError::UnknownSymbol { .. }))
        ));
        assert!(matches!(
            compile_script("for i in 0 -> i { }", &registry),
            Err(TernError::Compilation(CompilationError::UnknownSymbol { .. }))
        ));
        assert_eq!(
            compile_script("for i in 0 -> 3 { }", &registry)
                .unwrap()
                .globals(),
            0
        );
    }

    #[test]
    fn in_and_by_are_plain_names_elsewhere() {
        let registry = Registry::new();
        assert!(compile_script("let in = 1; let by = 2; in + by", &registry).is_ok());
        // but not inside a header
        assert!(compile_script("let by = 2; for i in 0 -> by { }", &registry).is_err());
    }

    #[test]
    fn header_syntax_errors() {
        let registry = Registry::new();
        assert!(matches!(
            compile_script("for 1 in 0 -> 3 { }", &registry),
            Err(TernError::Parse(_))
        ));
        assert!(matches!(
            compile_script("for i 0 -> 3 { }", &registry),
            Err(TernError::Parse(_))
        ));
        assert!(matches!(
            compile_script("for i in 0 .. 3 { }", &registry),
            Err(TernError::Lex(_))
        ));
        assert!(matches!(
            compile_script("for i in 0 < 3 { }", &registry),
            Err(_)
        ));
    }
}
