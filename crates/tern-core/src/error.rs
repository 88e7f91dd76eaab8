//! Unified error types for Tern.
//!
//! Every phase of turning source text into a result value has its own error
//! type: lexing, parsing, native registration, compilation and execution.
//!
//! ## Error Hierarchy
//!
//! ```text
//! TernError (top-level wrapper)
//! ├── LexError          - tokenization errors
//! ├── ParseError        - syntax errors (with ParseErrorKind)
//! ├── RegistrationError - native function signature errors
//! ├── CompilationError  - name resolution and type checking errors
//! └── RuntimeError      - execution errors
//! ```
//!
//! Phase errors convert into [`TernError`] with `?`:
//!
//! ```ignore
//! fn eval(engine: &Engine, source: &str) -> Result<Value, TernError> {
//!     let program = engine.compile(source)?;
//!     engine.execute(&program)
//! }
//! ```

use thiserror::Error;

use crate::Span;

// ============================================================================
// Lexer Errors
// ============================================================================

/// Errors that occur during lexical analysis.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexError {
    /// A character that starts no token.
    #[error("unexpected character '{ch}' at {span}")]
    UnexpectedChar { ch: char, span: Span },

    /// A string literal reached the end of its line before the closing quote.
    #[error("unterminated string at {span}")]
    UnterminatedString { span: Span },

    /// A numeric literal could not be parsed.
    #[error("invalid number at {span}: {detail}")]
    InvalidNumber { span: Span, detail: String },
}

impl LexError {
    /// Get the span where this error occurred.
    pub fn span(&self) -> Span {
        match self {
            LexError::UnexpectedChar { span, .. } => *span,
            LexError::UnterminatedString { span } => *span,
            LexError::InvalidNumber { span, .. } => *span,
        }
    }
}

// ============================================================================
// Parse Errors
// ============================================================================

/// Categories of parse errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseErrorKind {
    /// A specific token was expected but not found.
    ExpectedToken,
    /// An unexpected token was encountered.
    UnexpectedToken,
    /// Unexpected end of input.
    UnexpectedEof,
    /// An expression was expected.
    ExpectedExpression,
    /// An identifier was expected.
    ExpectedIdentifier,
    /// A block was expected.
    ExpectedBlock,
    /// `break` used outside of a loop.
    BreakOutsideLoop,
    /// `continue` used outside of a loop.
    ContinueOutsideLoop,
}

impl ParseErrorKind {
    /// Returns a human-readable name for this error kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseErrorKind::ExpectedToken => "expected token",
            ParseErrorKind::UnexpectedToken => "unexpected token",
            ParseErrorKind::UnexpectedEof => "unexpected end of file",
            ParseErrorKind::ExpectedExpression => "expected expression",
            ParseErrorKind::ExpectedIdentifier => "expected identifier",
            ParseErrorKind::ExpectedBlock => "expected block",
            ParseErrorKind::BreakOutsideLoop => "break outside loop",
            ParseErrorKind::ContinueOutsideLoop => "continue outside loop",
        }
    }
}

impl std::fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A parse error with location and context.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind} at {span}: {message}")]
pub struct ParseError {
    /// The category of this error.
    pub kind: ParseErrorKind,
    /// The source location where the error occurred.
    pub span: Span,
    /// A detailed error message.
    pub message: String,
}

impl ParseError {
    /// Create a new parse error.
    pub fn new(kind: ParseErrorKind, span: Span, message: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            message: message.into(),
        }
    }

    /// Create an "expected token" error.
    pub fn expected_token(span: Span, expected: &str, found: &str) -> Self {
        Self::new(
            ParseErrorKind::ExpectedToken,
            span,
            format!("expected {expected}, found {found}"),
        )
    }

    /// Create an "unexpected token" error.
    pub fn unexpected_token(span: Span, token: &str) -> Self {
        Self::new(
            ParseErrorKind::UnexpectedToken,
            span,
            format!("unexpected token: {token}"),
        )
    }

    /// Create an "unexpected EOF" error naming what was expected instead.
    pub fn unexpected_eof(span: Span, expected: &str) -> Self {
        Self::new(
            ParseErrorKind::UnexpectedEof,
            span,
            format!("expected {expected}"),
        )
    }

    /// Create an "expected identifier" error.
    pub fn expected_identifier(span: Span, found: &str) -> Self {
        Self::new(
            ParseErrorKind::ExpectedIdentifier,
            span,
            format!("expected identifier, found {found}"),
        )
    }

    /// Create an "expected expression" error.
    pub fn expected_expression(span: Span, found: &str) -> Self {
        Self::new(
            ParseErrorKind::ExpectedExpression,
            span,
            format!("expected expression, found {found}"),
        )
    }

    /// Format the error with the offending source line and a caret under it.
    pub fn display_with_source(&self, source: &str) -> String {
        let mut output = String::new();
        let line = self.span.line;
        let column = self.span.col;

        output.push_str(&format!("Error at {}:{}: {}\n", line, column, self.kind));
        if !self.message.is_empty() {
            output.push_str(&format!("  {}\n", self.message));
        }

        if let Some(line_text) = source.lines().nth((line as usize).saturating_sub(1)) {
            output.push_str("  |\n");
            output.push_str(&format!("{:>3} | {}\n", line, line_text));

            let indent = " ".repeat((column as usize).saturating_sub(1));
            let pointer = if self.span.len <= 1 {
                "^".to_string()
            } else {
                "^".to_string() + &"~".repeat((self.span.len - 1) as usize)
            };
            output.push_str(&format!("  | {}{}\n", indent, pointer));
        }

        output
    }
}

// ============================================================================
// Registration Errors
// ============================================================================

/// Errors raised while registering native functions.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistrationError {
    /// The signature text could not be parsed.
    #[error("invalid signature '{signature}': {message}")]
    InvalidSignature { signature: String, message: String },

    /// A native function with this name already exists.
    #[error("duplicate native function: {0}")]
    DuplicateFunction(String),

    /// Function indices are a single byte in bytecode.
    #[error("too many native functions (limit is {limit})")]
    TooManyFunctions { limit: usize },
}

// ============================================================================
// Compilation Errors
// ============================================================================

/// Name resolution and type checking errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompilationError {
    /// Neither a variable nor a native function has this name.
    #[error("at {span}: unknown symbol '{name}'")]
    UnknownSymbol { name: String, span: Span },

    /// A variable was used with call syntax.
    #[error("at {span}: '{name}' is a variable, not a function")]
    NotAFunction { name: String, span: Span },

    /// A native function name was used as a value.
    #[error("at {span}: native function '{name}' can only be called")]
    NotAValue { name: String, span: Span },

    /// A value of the wrong type in an assignment, argument or condition.
    #[error("at {span}: {message}")]
    TypeMismatch { message: String, span: Span },

    /// No binary operator exists for the operand types.
    #[error("at {span}: no operator '{op}' for types '{left}' and '{right}'")]
    NoOperator {
        op: String,
        left: String,
        right: String,
        span: Span,
    },

    /// A unary operator or statement form applied to an unsupported type.
    #[error("at {span}: {message}")]
    InvalidOperation { message: String, span: Span },

    /// A variable name collides with a visible variable or a native function.
    #[error("at {new_span}: '{name}' redeclared (originally declared at {original_span})")]
    VariableRedeclaration {
        name: String,
        original_span: Span,
        new_span: Span,
    },

    /// Wrong number of arguments for a fixed-arity native function.
    #[error("at {span}: {name} expects {expected} argument(s), got {got}")]
    ArgumentCountMismatch {
        name: String,
        expected: usize,
        got: usize,
        span: Span,
    },

    /// Not enough arguments for a variadic native function.
    #[error("at {span}: {name} expects at least {minimum} argument(s), got {got}")]
    TooFewArguments {
        name: String,
        minimum: usize,
        got: usize,
        span: Span,
    },

    /// Argument counts are a single byte in bytecode.
    #[error("at {span}: too many arguments in call to {name} (limit is {limit})")]
    TooManyArguments {
        name: String,
        limit: usize,
        span: Span,
    },

    /// The variable table is full.
    #[error("at {span}: too many variables (limit is {limit})")]
    TooManyVariables { limit: usize, span: Span },

    /// String pool indices are 16 bits wide.
    #[error("at {span}: too many string constants (limit is {limit})")]
    TooManyStrings { limit: usize, span: Span },

    /// A `for` step that is not a non-zero numeric constant.
    #[error("at {span}: for-loop step must be a non-zero constant number")]
    NonConstantStep { span: Span },

    /// A jump distance does not fit its 16-bit operand.
    #[error("at {span}: jump distance {distance} exceeds the 16-bit operand")]
    CodeTooLarge { distance: usize, span: Span },
}

impl CompilationError {
    /// Get the span where this error occurred.
    pub fn span(&self) -> Span {
        match self {
            CompilationError::UnknownSymbol { span, .. }
            | CompilationError::NotAFunction { span, .. }
            | CompilationError::NotAValue { span, .. }
            | CompilationError::TypeMismatch { span, .. }
            | CompilationError::NoOperator { span, .. }
            | CompilationError::InvalidOperation { span, .. }
            | CompilationError::ArgumentCountMismatch { span, .. }
            | CompilationError::TooFewArguments { span, .. }
            | CompilationError::TooManyArguments { span, .. }
            | CompilationError::TooManyVariables { span, .. }
            | CompilationError::TooManyStrings { span, .. }
            | CompilationError::NonConstantStep { span }
            | CompilationError::CodeTooLarge { span, .. } => *span,
            CompilationError::VariableRedeclaration { new_span, .. } => *new_span,
        }
    }
}

// ============================================================================
// Runtime Errors
// ============================================================================

/// Errors raised while executing a compiled program.
///
/// Malformed bytecode is not reported here: the virtual machine trusts the
/// compiler and panics on broken invariants.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    /// The value stack ran out of slots.
    #[error("stack overflow (capacity is {capacity})")]
    StackOverflow { capacity: usize },
}

// ============================================================================
// Top-level Error
// ============================================================================

/// Any error produced by the toolchain.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TernError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Registration(#[from] RegistrationError),

    #[error(transparent)]
    Compilation(#[from] CompilationError),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl TernError {
    pub fn is_lex(&self) -> bool {
        matches!(self, TernError::Lex(_))
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, TernError::Parse(_))
    }

    pub fn is_registration(&self) -> bool {
        matches!(self, TernError::Registration(_))
    }

    pub fn is_compilation(&self) -> bool {
        matches!(self, TernError::Compilation(_))
    }

    pub fn is_runtime(&self) -> bool {
        matches!(self, TernError::Runtime(_))
    }

    /// Source location of the error, when it has one.
    pub fn span(&self) -> Option<Span> {
        match self {
            TernError::Lex(e) => Some(e.span()),
            TernError::Parse(e) => Some(e.span),
            TernError::Compilation(e) => Some(e.span()),
            TernError::Registration(_) | TernError::Runtime(_) => None,
        }
    }
}
