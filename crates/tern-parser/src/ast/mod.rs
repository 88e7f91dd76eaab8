//! Typed expression trees.
//!
//! The parser builds one [`Expr`] per expression statement, folds constants
//! with [`Expr::simplify`], hands it to the bytecode emitter and drops it.

mod expr;
mod fold;
mod ops;

pub use expr::{Expr, ExprKind};
pub use ops::{BinaryOp, UnaryOp};
