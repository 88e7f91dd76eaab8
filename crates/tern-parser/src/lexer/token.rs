//! Token types and definitions for the Tern lexer.

use std::fmt;

use tern_core::Span;

/// A token borrowed from the source text.
#[derive(Clone, Copy, PartialEq)]
pub struct Token<'src> {
    pub kind: TokenKind,
    /// The source text of this token. String literals keep their quotes.
    pub lexeme: &'src str,
    pub span: Span,
}

impl<'src> Token<'src> {
    #[inline]
    pub fn new(kind: TokenKind, lexeme: &'src str, span: Span) -> Self {
        Self { kind, lexeme, span }
    }

    /// Value of a number literal.
    pub fn number(&self) -> Option<f64> {
        match self.kind {
            TokenKind::Number => parse_number(self.lexeme).ok(),
            _ => None,
        }
    }

    /// Contents of a string literal without the surrounding quotes.
    pub fn string_contents(&self) -> Option<&'src str> {
        match self.kind {
            TokenKind::String => self
                .lexeme
                .strip_prefix('"')
                .and_then(|s| s.strip_suffix('"')),
            _ => None,
        }
    }
}

impl fmt::Debug for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({:?} @ {:?})", self.kind, self.lexeme, self.span)
    }
}

/// Parse the text of a number literal: decimal with an optional fraction, or
/// `0x`-prefixed hexadecimal.
pub(crate) fn parse_number(lexeme: &str) -> Result<f64, &'static str> {
    if let Some(digits) = lexeme
        .strip_prefix("0x")
        .or_else(|| lexeme.strip_prefix("0X"))
    {
        if digits.is_empty() {
            return Err("expected hex digits after '0x'");
        }
        return u64::from_str_radix(digits, 16)
            .map(|n| n as f64)
            .map_err(|_| "hex literal does not fit in 64 bits");
    }
    lexeme.parse::<f64>().map_err(|_| "malformed decimal literal")
}

/// All token types of the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Delimiters
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,
    TripleDot,
    Comma,
    Semicolon,
    Question,

    // Operators
    Plus,
    Minus,
    /// `->`, exclusive range
    Arrow,
    Star,
    Slash,
    Equal,
    /// `=>`, inclusive range
    FatArrow,
    EqualEqual,
    Bang,
    BangEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    AmpAmp,
    PipePipe,

    // Keywords
    Null,
    True,
    False,
    Let,
    If,
    Else,
    While,
    For,
    /// Keyword only inside a `for` header.
    In,
    /// Keyword only inside a `for` header.
    By,
    Break,
    Continue,

    // Literals
    Number,
    String,
    Identifier,

    Eof,
    /// A lexical error, the lexer records the details.
    Error,
}

impl TokenKind {
    pub fn is_keyword(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            Null | True | False | Let | If | Else | While | For | In | By | Break | Continue
        )
    }

    /// Human-readable description for error messages.
    pub fn description(self) -> &'static str {
        use TokenKind::*;
        match self {
            LeftParen => "'('",
            RightParen => "')'",
            LeftBrace => "'{'",
            RightBrace => "'}'",
            LeftBracket => "'['",
            RightBracket => "']'",
            TripleDot => "'...'",
            Comma => "','",
            Semicolon => "';'",
            Question => "'?'",
            Plus => "'+'",
            Minus => "'-'",
            Arrow => "'->'",
            Star => "'*'",
            Slash => "'/'",
            Equal => "'='",
            FatArrow => "'=>'",
            EqualEqual => "'=='",
            Bang => "'!'",
            BangEqual => "'!='",
            Less => "'<'",
            LessEqual => "'<='",
            Greater => "'>'",
            GreaterEqual => "'>='",
            AmpAmp => "'&&'",
            PipePipe => "'||'",
            Null => "'null'",
            True => "'true'",
            False => "'false'",
            Let => "'let'",
            If => "'if'",
            Else => "'else'",
            While => "'while'",
            For => "'for'",
            In => "'in'",
            By => "'by'",
            Break => "'break'",
            Continue => "'continue'",
            Number => "number literal",
            String => "string literal",
            Identifier => "identifier",
            Eof => "end of file",
            Error => "invalid token",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Lexing context that decides which context-restricted keywords apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LexerContext {
    #[default]
    Default,
    /// Inside a `for` header, where `in` and `by` are keywords.
    ForHeader,
}

/// Look up an identifier in the keyword table.
pub fn lookup_keyword(ident: &str, context: LexerContext) -> Option<TokenKind> {
    use TokenKind::*;
    Some(match ident {
        "null" => Null,
        "true" => True,
        "false" => False,
        "let" => Let,
        "if" => If,
        "else" => Else,
        "while" => While,
        "for" => For,
        "break" => Break,
        "continue" => Continue,
        "in" if context == LexerContext::ForHeader => In,
        "by" if context == LexerContext::ForHeader => By,
        _ => return None,
    })
}
