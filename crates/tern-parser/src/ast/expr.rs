use tern_core::{Span, TypeDef, Value};

use super::{BinaryOp, UnaryOp};

/// An expression with its statically resolved type.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub ty: TypeDef,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Literal(Value),
    /// Read the variable in an absolute stack slot.
    GetVar { slot: u8 },
    /// Overwrite a variable, the assigned value stays as the result.
    SetVar { slot: u8, value: Box<Expr> },
    NativeCall { index: u8, args: Vec<Expr> },
    Unary { op: UnaryOp, operand: Box<Expr> },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

impl Expr {
    pub fn literal(value: Value, span: Span) -> Self {
        Self {
            ty: value.type_def(),
            kind: ExprKind::Literal(value),
            span,
        }
    }

    pub fn get_var(slot: u8, ty: TypeDef, span: Span) -> Self {
        Self {
            kind: ExprKind::GetVar { slot },
            ty,
            span,
        }
    }

    pub fn set_var(slot: u8, ty: TypeDef, value: Expr, span: Span) -> Self {
        Self {
            kind: ExprKind::SetVar {
                slot,
                value: Box::new(value),
            },
            ty,
            span,
        }
    }

    pub fn native_call(index: u8, return_type: TypeDef, args: Vec<Expr>, span: Span) -> Self {
        Self {
            kind: ExprKind::NativeCall { index, args },
            ty: return_type,
            span,
        }
    }

    pub fn unary(op: UnaryOp, operand: Expr, ty: TypeDef, span: Span) -> Self {
        Self {
            kind: ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            ty,
            span,
        }
    }

    pub fn binary(op: BinaryOp, lhs: Expr, rhs: Expr, ty: TypeDef) -> Self {
        let span = lhs.span.merge(rhs.span);
        Self {
            kind: ExprKind::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            },
            ty,
            span,
        }
    }

    pub fn as_literal(&self) -> Option<&Value> {
        match &self.kind {
            ExprKind::Literal(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_literal(&self) -> bool {
        self.as_literal().is_some()
    }

    /// The value of a number literal.
    pub fn as_number(&self) -> Option<f64> {
        self.as_literal().and_then(Value::as_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_type_follows_value() {
        let expr = Expr::literal(Value::Boolean(true), Span::new(1, 1, 4));
        assert_eq!(expr.ty, TypeDef::BOOLEAN);
        assert!(expr.is_literal());
        assert_eq!(expr.as_number(), None);
    }

    #[test]
    fn binary_span_covers_operands() {
        let lhs = Expr::literal(Value::Number(1.0), Span::new(1, 1, 1));
        let rhs = Expr::get_var(0, TypeDef::NUMBER, Span::new(1, 5, 1));
        let expr = Expr::binary(BinaryOp::Add, lhs, rhs, TypeDef::NUMBER);
        assert_eq!(expr.span, Span::new(1, 1, 5));
        assert!(!expr.is_literal());
    }
}
