//! Native function signatures.
//!
//! A signature reads like a declaration: `ReturnType name(Type, Type, ...)`.
//! A trailing `...` accepts any number of extra arguments of any type.

use std::fmt;

use tern_core::{RegistrationError, TypeDef};
use tern_parser::{Lexer, TokenKind, parse_type_def};

/// The parsed form of a native function declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct Signature {
    pub name: String,
    pub return_type: TypeDef,
    pub params: Vec<TypeDef>,
    pub variadic: bool,
}

impl Signature {
    /// Parse `text`, for example `number add(number, number)`.
    pub fn parse(text: &str) -> Result<Signature, RegistrationError> {
        let invalid = |message: String| RegistrationError::InvalidSignature {
            signature: text.to_string(),
            message,
        };
        let mut lexer = Lexer::new(text);

        let return_type = parse_type_def(&mut lexer);
        if return_type.is_error() {
            return Err(invalid("unknown return type".into()));
        }

        let name = lexer.peek();
        if name.kind != TokenKind::Identifier {
            return Err(invalid(format!(
                "expected function name, found {}",
                describe(&mut lexer, name.kind)
            )));
        }
        lexer.advance();

        expect(&mut lexer, TokenKind::LeftParen).map_err(&invalid)?;

        let mut params = Vec::new();
        let mut variadic = false;
        if lexer.eat(TokenKind::RightParen).is_none() {
            loop {
                if lexer.eat(TokenKind::TripleDot).is_some() {
                    variadic = true;
                    if !lexer.check(TokenKind::RightParen) {
                        return Err(invalid("'...' must be the last parameter".into()));
                    }
                } else {
                    let param = parse_type_def(&mut lexer);
                    if param.is_error() {
                        return Err(invalid(format!(
                            "unknown type for parameter {}",
                            params.len() + 1
                        )));
                    }
                    if param.is_void() {
                        return Err(invalid(format!(
                            "parameter {} can't be void",
                            params.len() + 1
                        )));
                    }
                    params.push(param);
                }

                if lexer.eat(TokenKind::Comma).is_none() {
                    expect(&mut lexer, TokenKind::RightParen).map_err(&invalid)?;
                    break;
                }
            }
        }

        if !lexer.check(TokenKind::Eof) {
            let kind = lexer.peek().kind;
            return Err(invalid(format!(
                "unexpected {} after ')'",
                describe(&mut lexer, kind)
            )));
        }

        Ok(Signature {
            name: name.lexeme.to_string(),
            return_type,
            params,
            variadic,
        })
    }

    /// Smallest number of arguments a call must pass.
    pub fn min_args(&self) -> usize {
        self.params.len()
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}(", self.return_type, self.name)?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{param}")?;
        }
        if self.variadic {
            if !self.params.is_empty() {
                f.write_str(", ")?;
            }
            f.write_str("...")?;
        }
        f.write_str(")")
    }
}

fn expect(lexer: &mut Lexer<'_>, kind: TokenKind) -> Result<(), String> {
    let found = lexer.peek().kind;
    if found == kind {
        lexer.advance();
        Ok(())
    } else {
        Err(format!("expected {kind}, found {}", describe(lexer, found)))
    }
}

/// Name a token for an error message, preferring the lexer's own diagnosis.
fn describe(lexer: &mut Lexer<'_>, kind: TokenKind) -> String {
    match kind {
        TokenKind::Error => lexer
            .take_error()
            .map(|e| e.to_string())
            .unwrap_or_else(|| kind.description().to_string()),
        _ => kind.description().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(text: &str) -> String {
        match Signature::parse(text) {
            Err(RegistrationError::InvalidSignature { message, .. }) => message,
            other => panic!("expected invalid signature, got {other:?}"),
        }
    }

    #[test]
    fn parses_fixed_arity() {
        let sig = Signature::parse("number add(number, number)").unwrap();
        assert_eq!(sig.name, "add");
        assert_eq!(sig.return_type, TypeDef::NUMBER);
        assert_eq!(sig.params, vec![TypeDef::NUMBER, TypeDef::NUMBER]);
        assert!(!sig.variadic);
        assert_eq!(sig.min_args(), 2);
    }

    #[test]
    fn parses_optional_and_variadic() {
        let sig = Signature::parse("void print(string?, ...)").unwrap();
        assert_eq!(sig.return_type, TypeDef::VOID);
        assert_eq!(sig.params, vec![TypeDef::STRING.optional()]);
        assert!(sig.variadic);

        let only_rest = Signature::parse("number? max(...)").unwrap();
        assert!(only_rest.params.is_empty());
        assert!(only_rest.variadic);
    }

    #[test]
    fn parses_empty_parameter_list() {
        let sig = Signature::parse("number random()").unwrap();
        assert!(sig.params.is_empty());
        assert_eq!(sig.to_string(), "number random()");
    }

    #[test]
    fn display_is_canonical() {
        let sig = Signature::parse("string  join ( string,bool? , ... )").unwrap();
        assert_eq!(sig.to_string(), "string join(string, bool?, ...)");
    }

    #[test]
    fn rejects_bad_return_type() {
        assert_eq!(message("int f()"), "unknown return type");
    }

    #[test]
    fn rejects_missing_name() {
        assert!(message("number (number)").starts_with("expected function name"));
    }

    #[test]
    fn rejects_void_parameter() {
        assert_eq!(message("void f(void)"), "parameter 1 can't be void");
    }

    #[test]
    fn rejects_unknown_parameter_type() {
        assert_eq!(message("void f(number, int)"), "unknown type for parameter 2");
    }

    #[test]
    fn rejects_variadic_not_last() {
        assert_eq!(
            message("void f(..., number)"),
            "'...' must be the last parameter"
        );
    }

    #[test]
    fn rejects_unclosed_list_and_trailing_input() {
        assert!(message("void f(number").starts_with("expected ')'"));
        assert!(message("void f() x").starts_with("unexpected identifier"));
    }

    #[test]
    fn reports_lexer_errors() {
        assert!(message("void f(number & bool)").contains("unexpected character '&'"));
    }
}
