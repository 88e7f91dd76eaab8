//! Binary operator levels and their operand checks.

use tern_core::{CompilationError, Span, TypeDef};
use tern_parser::{BinaryOp, Expr, TokenKind};

use crate::compiler::{Result, ScriptCompiler};

impl<'src, 'reg> ScriptCompiler<'src, 'reg> {
    pub(crate) fn logic_or(&mut self) -> Result<Expr> {
        self.binary_level(&[TokenKind::PipePipe], Self::logic_and)
    }

    fn logic_and(&mut self) -> Result<Expr> {
        self.binary_level(&[TokenKind::AmpAmp], Self::equality)
    }

    fn equality(&mut self) -> Result<Expr> {
        self.binary_level(
            &[TokenKind::EqualEqual, TokenKind::BangEqual],
            Self::relational,
        )
    }

    fn relational(&mut self) -> Result<Expr> {
        self.binary_level(
            &[
                TokenKind::Less,
                TokenKind::LessEqual,
                TokenKind::Greater,
                TokenKind::GreaterEqual,
            ],
            Self::sum,
        )
    }

    fn sum(&mut self) -> Result<Expr> {
        self.binary_level(&[TokenKind::Plus, TokenKind::Minus], Self::factor)
    }

    fn factor(&mut self) -> Result<Expr> {
        self.binary_level(&[TokenKind::Star, TokenKind::Slash], Self::prefix)
    }

    /// One left-associative level: `next ( op next )*`.
    fn binary_level(
        &mut self,
        operators: &[TokenKind],
        next: fn(&mut Self) -> Result<Expr>,
    ) -> Result<Expr> {
        let mut lhs = next(self)?;

        loop {
            let kind = self.peek().kind;
            let Some(op) = BinaryOp::from_token(kind).filter(|_| operators.contains(&kind)) else {
                break;
            };
            let token = self.advance();
            let rhs = next(self)?;
            let ty = result_type(op, lhs.ty, rhs.ty, token.span)?;
            lhs = Expr::binary(op, lhs, rhs, ty);
        }

        Ok(lhs)
    }
}

/// The type of `lhs op rhs`, or the error when the operator is not defined
/// for the operand types.
fn result_type(op: BinaryOp, lhs: TypeDef, rhs: TypeDef, span: Span) -> Result<TypeDef> {
    let ty = match op {
        BinaryOp::Add if lhs.is_string() && rhs.is_string() => Some(TypeDef::STRING),
        _ if op.is_arithmetic() => (lhs.is_number() && rhs.is_number()).then_some(TypeDef::NUMBER),
        _ if op.is_relational() => {
            (lhs.is_number() && rhs.is_number()).then_some(TypeDef::BOOLEAN)
        }
        _ if op.is_equality() => TypeDef::comparable(lhs, rhs).then_some(TypeDef::BOOLEAN),
        _ => (lhs.is_boolean() && rhs.is_boolean()).then_some(TypeDef::BOOLEAN),
    };

    ty.ok_or_else(|| {
        CompilationError::NoOperator {
            op: op.to_string(),
            left: lhs.to_string(),
            right: rhs.to_string(),
            span,
        }
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span() -> Span {
        Span::point(1, 1)
    }

    #[test]
    fn arithmetic_types() {
        assert_eq!(
            result_type(BinaryOp::Div, TypeDef::NUMBER, TypeDef::NUMBER, span()),
            Ok(TypeDef::NUMBER)
        );
        assert_eq!(
            result_type(BinaryOp::Add, TypeDef::STRING, TypeDef::STRING, span()),
            Ok(TypeDef::STRING)
        );
        assert!(result_type(BinaryOp::Sub, TypeDef::STRING, TypeDef::STRING, span()).is_err());
        assert!(
            result_type(BinaryOp::Mul, TypeDef::NUMBER.optional(), TypeDef::NUMBER, span())
                .is_err()
        );
    }

    #[test]
    fn comparison_types() {
        assert_eq!(
            result_type(BinaryOp::Less, TypeDef::NUMBER, TypeDef::NUMBER, span()),
            Ok(TypeDef::BOOLEAN)
        );
        assert_eq!(
            result_type(BinaryOp::NotEqual, TypeDef::NULL, TypeDef::STRING.optional(), span()),
            Ok(TypeDef::BOOLEAN)
        );
        assert_eq!(
            result_type(BinaryOp::Equal, TypeDef::BOOLEAN, TypeDef::BOOLEAN, span()),
            Ok(TypeDef::BOOLEAN)
        );
    }

    #[test]
    fn error_names_operator_and_types() {
        let error = result_type(BinaryOp::Or, TypeDef::BOOLEAN, TypeDef::NUMBER, span());
        assert_eq!(
            error,
            Err(CompilationError::NoOperator {
                op: "||".into(),
                left: "bool".into(),
                right: "number".into(),
                span: span(),
            }
            .into())
        );
    }
}
