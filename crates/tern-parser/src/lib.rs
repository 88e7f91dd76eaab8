//! Tern parser crate.
//!
//! Provides the front half of the toolchain that does not depend on code
//! generation:
//! - Lexical analysis with context-restricted keywords
//! - Type-name parsing for native signatures
//! - Typed expression trees and constant folding
//!
//! # Example
//!
//! ```
//! use tern_parser::{Lexer, TokenKind};
//!
//! let kinds: Vec<_> = Lexer::new("let x = 1;").map(|t| t.kind).collect();
//! assert_eq!(kinds[0], TokenKind::Let);
//! ```

pub mod ast;
pub mod lexer;
pub mod types;

pub use ast::{BinaryOp, Expr, ExprKind, UnaryOp};
pub use lexer::{Lexer, LexerContext, Token, TokenKind};
pub use types::parse_type_def;
