//! Constant folding.

use tern_core::Value;

use super::{BinaryOp, Expr, ExprKind, UnaryOp};

impl Expr {
    /// Replace operators whose operands are all literals by their result,
    /// bottom-up.
    ///
    /// Variable accesses and native calls are never folded, only their
    /// operands are. The node keeps its type and span.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn simplify(&mut self) {
        let folded = match &mut self.kind {
            ExprKind::Literal(_) | ExprKind::GetVar { .. } => None,
            ExprKind::SetVar { value, .. } => {
                value.simplify();
                None
            }
            ExprKind::NativeCall { args, .. } => {
                args.iter_mut().for_each(Expr::simplify);
                None
            }
            ExprKind::Unary { op, operand } => {
                operand.simplify();
                operand.as_literal().and_then(|v| fold_unary(*op, v))
            }
            ExprKind::Binary { op, lhs, rhs } => {
                lhs.simplify();
                rhs.simplify();
                match (lhs.as_literal(), rhs.as_literal()) {
                    (Some(l), Some(r)) => fold_binary(*op, l, r),
                    _ => None,
                }
            }
        };

        if let Some(value) = folded {
            self.kind = ExprKind::Literal(value);
        }
    }
}

fn fold_unary(op: UnaryOp, value: &Value) -> Option<Value> {
    match (op, value) {
        (UnaryOp::Neg, Value::Number(n)) => Some(Value::Number(-n)),
        (UnaryOp::Not, Value::Boolean(b)) => Some(Value::Boolean(!b)),
        _ => None,
    }
}

fn fold_binary(op: BinaryOp, lhs: &Value, rhs: &Value) -> Option<Value> {
    use BinaryOp::*;

    if op.is_equality() {
        let equal = lhs == rhs;
        return Some(Value::Boolean(if op == Equal { equal } else { !equal }));
    }

    match (lhs, rhs) {
        (Value::Number(a), Value::Number(b)) => {
            let (a, b) = (*a, *b);
            Some(match op {
                Add => Value::Number(a + b),
                Sub => Value::Number(a - b),
                Mul => Value::Number(a * b),
                Div => Value::Number(a / b),
                Less => Value::Boolean(a < b),
                LessEqual => Value::Boolean(a <= b),
                Greater => Value::Boolean(a > b),
                GreaterEqual => Value::Boolean(a >= b),
                _ => return None,
            })
        }
        (Value::Boolean(a), Value::Boolean(b)) => match op {
            And => Some(Value::Boolean(*a && *b)),
            Or => Some(Value::Boolean(*a || *b)),
            _ => None,
        },
        (Value::String(a), Value::String(b)) if op == Add => Some(Value::String(a.concat(b))),
        _ => None,
    }
}
