//! The [`Lexer`] turns source text into tokens on demand.
//!
//! It keeps exactly one token of lookahead: [`peek`](Lexer::peek) shows it
//! and [`advance`](Lexer::advance) hands it over and scans the next one.
//! Errors never abort scanning; they become [`TokenKind::Error`] tokens and
//! the details are kept for the parser to pick up.

use tern_core::{LexError, Span};

use super::cursor::{Cursor, is_ident_continue, is_ident_start};
use super::token::{LexerContext, Token, TokenKind, lookup_keyword, parse_number};

pub struct Lexer<'src> {
    cursor: Cursor<'src>,
    context: LexerContext,
    /// The next token to be consumed.
    current: Token<'src>,
    errors: Vec<LexError>,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        let mut lexer = Self {
            cursor: Cursor::new(source),
            context: LexerContext::Default,
            current: Token::new(TokenKind::Eof, "", Span::point(1, 1)),
            errors: Vec::new(),
        };
        lexer.current = lexer.scan_token();
        lexer
    }

    /// The current token, without consuming it.
    #[inline]
    pub fn peek(&self) -> Token<'src> {
        self.current
    }

    /// Consume the current token and scan the following one.
    pub fn advance(&mut self) -> Token<'src> {
        let next = self.scan_token();
        std::mem::replace(&mut self.current, next)
    }

    /// Consume the current token if it has the given kind.
    pub fn eat(&mut self, kind: TokenKind) -> Option<Token<'src>> {
        if self.current.kind == kind {
            Some(self.advance())
        } else {
            None
        }
    }

    #[inline]
    pub fn check(&self, kind: TokenKind) -> bool {
        self.current.kind == kind
    }

    /// Switch keyword context. Only tokens scanned afterwards are affected;
    /// the current lookahead token keeps the kind it was scanned with.
    pub fn set_context(&mut self, context: LexerContext) {
        self.context = context;
    }

    pub fn context(&self) -> LexerContext {
        self.context
    }

    /// Take the oldest recorded error, the one behind the first error token.
    pub fn take_error(&mut self) -> Option<LexError> {
        if self.errors.is_empty() {
            None
        } else {
            Some(self.errors.remove(0))
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    // =========================================
    // Internal: Token scanning
    // =========================================

    fn scan_token(&mut self) -> Token<'src> {
        self.skip_trivia();

        let start_line = self.cursor.line();
        let start_col = self.cursor.column();
        let start_offset = self.cursor.offset();

        let Some(first) = self.cursor.peek() else {
            return Token::new(TokenKind::Eof, "", Span::point(start_line, start_col));
        };

        match first {
            '"' => self.scan_string(start_line, start_col, start_offset),
            c if c.is_ascii_digit() => self.scan_number(start_line, start_col, start_offset),
            '.' if self.cursor.peek_nth(1).is_some_and(|c| c.is_ascii_digit()) => {
                self.scan_number(start_line, start_col, start_offset)
            }
            c if is_ident_start(c) => self.scan_identifier(start_line, start_col, start_offset),
            _ => self.scan_operator(start_line, start_col, start_offset),
        }
    }

    /// Skip whitespace and `//` line comments.
    fn skip_trivia(&mut self) {
        loop {
            self.cursor.eat_while(|c| c.is_ascii_whitespace());
            if self.cursor.peek() == Some('/') && self.cursor.peek_nth(1) == Some('/') {
                self.cursor.eat_while(|c| c != '\n');
            } else {
                break;
            }
        }
    }

    fn make_token(
        &self,
        kind: TokenKind,
        start_line: u32,
        start_col: u32,
        start_offset: u32,
    ) -> Token<'src> {
        let lexeme = self.cursor.slice_from(start_offset);
        Token::new(
            kind,
            lexeme,
            Span::new(start_line, start_col, lexeme.len() as u32),
        )
    }

    fn make_error(&mut self, error: LexError, start_offset: u32) -> Token<'src> {
        let span = error.span();
        self.errors.push(error);
        Token::new(TokenKind::Error, self.cursor.slice_from(start_offset), span)
    }

    fn span_from(&self, start_line: u32, start_col: u32, start_offset: u32) -> Span {
        Span::new(start_line, start_col, self.cursor.offset() - start_offset)
    }

    // =========================================
    // Scanning: Strings
    // =========================================

    /// Strings have no escapes and may not span lines. Either line ending
    /// character ends an unterminated string.
    fn scan_string(&mut self, start_line: u32, start_col: u32, start_offset: u32) -> Token<'src> {
        self.cursor.advance();
        self.cursor.eat_while(|c| !matches!(c, '"' | '\n' | '\r'));

        if self.cursor.eat('"') {
            self.make_token(TokenKind::String, start_line, start_col, start_offset)
        } else {
            let span = self.span_from(start_line, start_col, start_offset);
            self.make_error(LexError::UnterminatedString { span }, start_offset)
        }
    }

    // =========================================
    // Scanning: Numbers
    // =========================================

    fn scan_number(&mut self, start_line: u32, start_col: u32, start_offset: u32) -> Token<'src> {
        if self.cursor.peek() == Some('0') && matches!(self.cursor.peek_nth(1), Some('x' | 'X')) {
            self.cursor.advance();
            self.cursor.advance();
            self.cursor.eat_while(|c| c.is_ascii_hexdigit());
        } else {
            self.cursor.eat_while(|c| c.is_ascii_digit());
            if self.cursor.peek() == Some('.')
                && self.cursor.peek_nth(1).is_some_and(|c| c.is_ascii_digit())
            {
                self.cursor.advance();
                self.cursor.eat_while(|c| c.is_ascii_digit());
            }
        }

        let lexeme = self.cursor.slice_from(start_offset);
        match parse_number(lexeme) {
            Ok(_) => self.make_token(TokenKind::Number, start_line, start_col, start_offset),
            Err(detail) => {
                let span = self.span_from(start_line, start_col, start_offset);
                let error = LexError::InvalidNumber {
                    span,
                    detail: detail.to_string(),
                };
                self.make_error(error, start_offset)
            }
        }
    }

    // =========================================
    // Scanning: Identifiers and keywords
    // =========================================

    fn scan_identifier(
        &mut self,
        start_line: u32,
        start_col: u32,
        start_offset: u32,
    ) -> Token<'src> {
        let lexeme = self.cursor.eat_while(is_ident_continue);
        let kind = lookup_keyword(lexeme, self.context).unwrap_or(TokenKind::Identifier);
        self.make_token(kind, start_line, start_col, start_offset)
    }

    // =========================================
    // Scanning: Operators
    // =========================================

    fn scan_operator(&mut self, start_line: u32, start_col: u32, start_offset: u32) -> Token<'src> {
        let Some(c) = self.cursor.advance() else {
            return Token::new(TokenKind::Eof, "", Span::point(start_line, start_col));
        };
        let next = self.cursor.peek();

        let kind = match (c, next) {
            ('(', _) => TokenKind::LeftParen,
            (')', _) => TokenKind::RightParen,
            ('{', _) => TokenKind::LeftBrace,
            ('}', _) => TokenKind::RightBrace,
            ('[', _) => TokenKind::LeftBracket,
            (']', _) => TokenKind::RightBracket,
            (',', _) => TokenKind::Comma,
            (';', _) => TokenKind::Semicolon,
            ('?', _) => TokenKind::Question,
            ('+', _) => TokenKind::Plus,
            ('*', _) => TokenKind::Star,
            ('/', _) => TokenKind::Slash,

            ('.', Some('.')) if self.cursor.peek_nth(1) == Some('.') => {
                self.cursor.advance();
                self.cursor.advance();
                TokenKind::TripleDot
            }

            ('-', Some('>')) => { self.cursor.advance(); TokenKind::Arrow }
            ('-', _) => TokenKind::Minus,

            ('=', Some('=')) => { self.cursor.advance(); TokenKind::EqualEqual }
            ('=', Some('>')) => { self.cursor.advance(); TokenKind::FatArrow }
            ('=', _) => TokenKind::Equal,

            ('!', Some('=')) => { self.cursor.advance(); TokenKind::BangEqual }
            ('!', _) => TokenKind::Bang,

            ('<', Some('=')) => { self.cursor.advance(); TokenKind::LessEqual }
            ('<', _) => TokenKind::Less,

            ('>', Some('=')) => { self.cursor.advance(); TokenKind::GreaterEqual }
            ('>', _) => TokenKind::Greater,

            ('&', Some('&')) => { self.cursor.advance(); TokenKind::AmpAmp }
            ('|', Some('|')) => { self.cursor.advance(); TokenKind::PipePipe }

            // Lone `&`, lone `|`, `.`, `..` and anything else
            _ => {
                let span = self.span_from(start_line, start_col, start_offset);
                return self.make_error(LexError::UnexpectedChar { ch: c, span }, start_offset);
            }
        };

        self.make_token(kind, start_line, start_col, start_offset)
    }
}

/// Stream tokens until end of input.
impl<'src> Iterator for Lexer<'src> {
    type Item = Token<'src>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current.kind == TokenKind::Eof {
            None
        } else {
            Some(self.advance())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenize(source: &str) -> Vec<(TokenKind, String)> {
        Lexer::new(source)
            .map(|t| (t.kind, t.lexeme.to_string()))
            .collect()
    }

    fn token_kinds(source: &str) -> Vec<TokenKind> {
        Lexer::new(source).map(|t| t.kind).collect()
    }

    #[test]
    fn empty_source() {
        let mut lexer = Lexer::new("");
        assert_eq!(lexer.peek().kind, TokenKind::Eof);
        assert_eq!(lexer.advance().kind, TokenKind::Eof);
        assert_eq!(lexer.peek().kind, TokenKind::Eof);
    }

    #[test]
    fn whitespace_and_comments() {
        assert_eq!(
            token_kinds("  // nothing here\n\tx // trailing\n"),
            vec![TokenKind::Identifier]
        );
    }

    #[test]
    fn peek_does_not_consume() {
        let mut lexer = Lexer::new("let x");
        assert_eq!(lexer.peek().kind, TokenKind::Let);
        assert_eq!(lexer.peek().kind, TokenKind::Let);
        assert_eq!(lexer.advance().kind, TokenKind::Let);
        assert_eq!(lexer.peek().lexeme, "x");
    }

    #[test]
    fn keywords_and_identifiers() {
        use TokenKind::*;
        assert_eq!(
            token_kinds("let if else while for break continue null true false lets _x"),
            vec![
                Let, If, Else, While, For, Break, Continue, Null, True, False, Identifier,
                Identifier
            ]
        );
    }

    #[test]
    fn range_keywords_depend_on_context() {
        assert_eq!(
            token_kinds("in by"),
            vec![TokenKind::Identifier, TokenKind::Identifier]
        );

        let mut lexer = Lexer::new("for i in 0 -> 3 by 1");
        assert_eq!(lexer.advance().kind, TokenKind::For);
        // `i` is already scanned; `in` is scanned after the switch
        lexer.set_context(LexerContext::ForHeader);
        assert_eq!(lexer.advance().kind, TokenKind::Identifier);
        assert_eq!(lexer.advance().kind, TokenKind::In);
        assert_eq!(lexer.advance().kind, TokenKind::Number);
        assert_eq!(lexer.advance().kind, TokenKind::Arrow);
        assert_eq!(lexer.advance().kind, TokenKind::Number);
        assert_eq!(lexer.advance().kind, TokenKind::By);
        lexer.set_context(LexerContext::Default);
        assert_eq!(lexer.context(), LexerContext::Default);
    }

    #[test]
    fn number_literals() {
        let mut lexer = Lexer::new("42 3.25 .5 0x1f 7.");
        assert_eq!(lexer.advance().number(), Some(42.0));
        assert_eq!(lexer.advance().number(), Some(3.25));
        assert_eq!(lexer.advance().number(), Some(0.5));
        assert_eq!(lexer.advance().number(), Some(31.0));
        assert_eq!(lexer.advance().number(), Some(7.0));
        // A dot without digits after it is not part of the number
        assert_eq!(lexer.advance().kind, TokenKind::Error);
    }

    #[test]
    fn hex_without_digits_is_an_error() {
        let mut lexer = Lexer::new("0x;");
        assert_eq!(lexer.advance().kind, TokenKind::Error);
        assert!(matches!(
            lexer.take_error(),
            Some(LexError::InvalidNumber { .. })
        ));
        assert_eq!(lexer.advance().kind, TokenKind::Semicolon);
    }

    #[test]
    fn string_literals() {
        let tokens = tokenize(r#""hello world" "" "#);
        assert_eq!(tokens[0], (TokenKind::String, "\"hello world\"".to_string()));
        assert_eq!(tokens[1], (TokenKind::String, "\"\"".to_string()));

        let mut lexer = Lexer::new(r#""a\n""#);
        assert_eq!(lexer.advance().string_contents(), Some("a\\n"));
    }

    #[test]
    fn unterminated_string() {
        let mut lexer = Lexer::new("\"abc\nlet");
        let token = lexer.advance();
        assert_eq!(token.kind, TokenKind::Error);
        assert_eq!(
            lexer.take_error(),
            Some(LexError::UnterminatedString {
                span: Span::new(1, 1, 4)
            })
        );
        assert_eq!(lexer.advance().kind, TokenKind::Let);
    }

    #[test]
    fn carriage_return_ends_string() {
        let mut lexer = Lexer::new("\"abc\r");
        assert_eq!(lexer.advance().kind, TokenKind::Error);
        assert_eq!(
            lexer.take_error(),
            Some(LexError::UnterminatedString {
                span: Span::new(1, 1, 4)
            })
        );
        assert_eq!(lexer.advance().kind, TokenKind::Eof);
    }

    #[test]
    fn operators() {
        use TokenKind::*;
        assert_eq!(
            token_kinds("( ) { } [ ] ... , ; ? + - -> * / = => == ! != < <= > >= && ||"),
            vec![
                LeftParen, RightParen, LeftBrace, RightBrace, LeftBracket, RightBracket,
                TripleDot, Comma, Semicolon, Question, Plus, Minus, Arrow, Star, Slash, Equal,
                FatArrow, EqualEqual, Bang, BangEqual, Less, LessEqual, Greater, GreaterEqual,
                AmpAmp, PipePipe
            ]
        );
    }

    #[test]
    fn operators_without_spaces() {
        use TokenKind::*;
        assert_eq!(
            token_kinds("a-->b"),
            vec![Identifier, Minus, Arrow, Identifier]
        );
    }

    #[test]
    fn lone_ampersand_and_pipe_are_errors() {
        let mut lexer = Lexer::new("& | ..");
        assert_eq!(lexer.advance().kind, TokenKind::Error);
        assert_eq!(lexer.advance().kind, TokenKind::Error);
        assert_eq!(lexer.advance().kind, TokenKind::Error);
        assert!(matches!(
            lexer.take_error(),
            Some(LexError::UnexpectedChar { ch: '&', .. })
        ));
    }

    #[test]
    fn spans_track_lines_and_columns() {
        let tokens: Vec<_> = Lexer::new("let x\n  = 10;").collect();
        assert_eq!(tokens[0].span, Span::new(1, 1, 3));
        assert_eq!(tokens[1].span, Span::new(1, 5, 1));
        assert_eq!(tokens[2].span, Span::new(2, 3, 1));
        assert_eq!(tokens[3].span, Span::new(2, 5, 2));
    }
}
