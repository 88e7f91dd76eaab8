//! Tern: a small statically typed scripting language for embedding.
//!
//! Scripts are compiled to bytecode in a single pass and run on a stack
//! virtual machine. Hosts extend the language with native functions
//! described by typed signatures.
//!
//! ```
//! use tern::{Engine, Value};
//!
//! let engine = Engine::new();
//! let result = engine.eval("let total = 0; for i in 1 => 4 { total = total + i; } total");
//! assert_eq!(result.unwrap(), Value::Number(10.0));
//! ```
//!
//! The pipeline crates are re-exported for hosts that need the pieces:
//! [`tern_parser`] (lexer and AST), [`tern_registry`] (native functions) and
//! [`tern_compiler`] (bytecode and disassembly).

mod config;
mod engine;
pub mod vm;

pub use config::EngineOptions;
pub use engine::Engine;

pub use tern_compiler::{self, Program};
pub use tern_core::{
    self, CompilationError, LexError, ParseError, ParseErrorKind, RegistrationError, RuntimeError,
    ScriptString, Span, TernError, TypeDef, Value, ValueKind, live_strings,
};
pub use tern_parser;
pub use tern_registry::{self, CallContext, NativeCallable, Registry};
