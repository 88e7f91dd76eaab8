//! Type-name parsing shared by native signatures.

use tern_core::{TypeDef, ValueKind};

use crate::lexer::{Lexer, TokenKind};

/// Parse a type name such as `number` or `string?`.
///
/// Unknown names yield [`TypeDef::ERROR`] after consuming the name. A token
/// that cannot name a type at all is left in place and also yields
/// [`TypeDef::ERROR`].
pub fn parse_type_def(lexer: &mut Lexer<'_>) -> TypeDef {
    let token = lexer.peek();
    let kind = match token.kind {
        TokenKind::Identifier => ValueKind::from_name(token.lexeme),
        TokenKind::Null => Some(ValueKind::Null),
        _ => return TypeDef::ERROR,
    };
    lexer.advance();

    let Some(kind) = kind else {
        return TypeDef::ERROR;
    };
    let type_def = TypeDef::new(kind);
    if lexer.eat(TokenKind::Question).is_some() {
        type_def.optional()
    } else {
        type_def
    }
}
