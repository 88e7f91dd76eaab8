//! Code generation for typed expression trees.

use tern_core::{CompilationError, Value};
use tern_parser::{BinaryOp, Expr, ExprKind, UnaryOp};

use super::BytecodeEmitter;
use crate::bytecode::OpCode;

/// Emit `expr` as a post-order walk, leaving exactly one value on the stack
/// (none for a `void` native call).
pub fn compile_expr(emitter: &mut BytecodeEmitter, expr: &Expr) -> Result<(), CompilationError> {
    match &expr.kind {
        ExprKind::Literal(value) => match value {
            Value::Null => emitter.emit_null(),
            Value::Number(n) => emitter.emit_number(*n),
            Value::Boolean(b) => emitter.emit_bool(*b),
            Value::String(s) => emitter.emit_string(s.clone())?,
        },

        ExprKind::GetVar { slot } => emitter.emit_load(*slot),

        ExprKind::SetVar { slot, value } => {
            compile_expr(emitter, value)?;
            emitter.emit_store(*slot);
        }

        ExprKind::NativeCall { index, args } => {
            for arg in args {
                compile_expr(emitter, arg)?;
            }
            // The parser caps calls at 255 arguments
            emitter.emit_native_call(*index, args.len() as u8);
        }

        ExprKind::Unary { op, operand } => {
            compile_expr(emitter, operand)?;
            emitter.emit(match op {
                UnaryOp::Neg => OpCode::Negate,
                UnaryOp::Not => OpCode::Not,
            });
        }

        ExprKind::Binary { op, lhs, rhs } if op.is_logical() => {
            compile_expr(emitter, lhs)?;
            let skip = emitter.emit_jump(match op {
                BinaryOp::And => OpCode::JumpIfFalseRetain,
                _ => OpCode::JumpIfTrueRetain,
            });
            compile_expr(emitter, rhs)?;
            emitter.patch_jump(skip)?;
        }

        ExprKind::Binary { op, lhs, rhs } => {
            compile_expr(emitter, lhs)?;
            compile_expr(emitter, rhs)?;
            emitter.emit(binary_opcode(*op, lhs));
        }
    }
    Ok(())
}

fn binary_opcode(op: BinaryOp, lhs: &Expr) -> OpCode {
    match op {
        BinaryOp::Add if lhs.ty.is_string() => OpCode::Concat,
        BinaryOp::Add => OpCode::Add,
        BinaryOp::Sub => OpCode::Subtract,
        BinaryOp::Mul => OpCode::Multiply,
        BinaryOp::Div => OpCode::Divide,
        BinaryOp::Equal => OpCode::Equal,
        BinaryOp::NotEqual => OpCode::NotEqual,
        BinaryOp::Less => OpCode::Less,
        BinaryOp::LessEqual => OpCode::LessEqual,
        BinaryOp::Greater => OpCode::Greater,
        BinaryOp::GreaterEqual => OpCode::GreaterEqual,
        BinaryOp::And | BinaryOp::Or => unreachable!("logical operators are emitted as jumps"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tern_core::{Span, TypeDef};

    fn span() -> Span {
        Span::point(1, 1)
    }

    fn num(n: f64) -> Expr {
        Expr::literal(Value::Number(n), span())
    }

    fn text(s: &str) -> Expr {
        Expr::literal(Value::string(s), span())
    }

    fn boolean(b: bool) -> Expr {
        Expr::literal(Value::Boolean(b), span())
    }

    fn emit(expr: &Expr) -> crate::bytecode::Chunk {
        let mut emitter = BytecodeEmitter::new();
        compile_expr(&mut emitter, expr).unwrap();
        emitter.finish()
    }

    #[test]
    fn post_order_arithmetic() {
        let expr = Expr::binary(
            BinaryOp::Mul,
            Expr::binary(BinaryOp::Add, num(1.0), num(2.0), TypeDef::NUMBER),
            Expr::get_var(0, TypeDef::NUMBER, span()),
            TypeDef::NUMBER,
        );
        emit(&expr).assert_opcodes(&[
            OpCode::PushNumber,
            OpCode::PushNumber,
            OpCode::Add,
            OpCode::Load,
            OpCode::Multiply,
        ]);
    }

    #[test]
    fn string_plus_is_concat() {
        let expr = Expr::binary(BinaryOp::Add, text("a"), text("b"), TypeDef::STRING);
        let chunk = emit(&expr);
        chunk.assert_opcodes(&[OpCode::PushString, OpCode::PushString, OpCode::Concat]);
        assert_eq!(chunk.strings().len(), 2);
    }

    #[test]
    fn and_uses_retain_jump() {
        let expr = Expr::binary(BinaryOp::And, boolean(true), boolean(false), TypeDef::BOOLEAN);
        let chunk = emit(&expr);
        chunk.assert_opcodes(&[
            OpCode::PushTrue,
            OpCode::JumpIfFalseRetain,
            OpCode::PushFalse,
        ]);
        // skips exactly the right operand
        assert_eq!(chunk.read_u16(2), Some(1));
    }

    #[test]
    fn or_uses_retain_jump() {
        let expr = Expr::binary(BinaryOp::Or, boolean(false), boolean(true), TypeDef::BOOLEAN);
        emit(&expr).assert_opcodes(&[
            OpCode::PushFalse,
            OpCode::JumpIfTrueRetain,
            OpCode::PushTrue,
        ]);
    }

    #[test]
    fn assignment_stores_and_keeps_value() {
        let expr = Expr::set_var(2, TypeDef::NUMBER, num(4.0), span());
        let chunk = emit(&expr);
        chunk.assert_opcodes(&[OpCode::PushNumber, OpCode::Store]);
        assert_eq!(chunk.read_u8(10), Some(2));
    }

    #[test]
    fn native_call_args_then_call() {
        let expr = Expr::native_call(3, TypeDef::NUMBER, vec![num(1.0), text("x")], span());
        let chunk = emit(&expr);
        chunk.assert_opcodes(&[OpCode::PushNumber, OpCode::PushString, OpCode::NativeCall]);
        let call = chunk.len() - 3;
        assert_eq!(chunk.read_u8(call + 1), Some(3));
        assert_eq!(chunk.read_u8(call + 2), Some(2));
    }

    #[test]
    fn unary_after_operand() {
        let expr = Expr::unary(UnaryOp::Not, boolean(true), TypeDef::BOOLEAN, span());
        emit(&expr).assert_opcodes(&[OpCode::PushTrue, OpCode::Not]);
    }
}
