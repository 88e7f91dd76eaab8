//! Lexical analysis for Tern source text.

mod cursor;
mod lexer;
mod token;

pub use lexer::Lexer;
pub use token::{LexerContext, Token, TokenKind, lookup_keyword};
