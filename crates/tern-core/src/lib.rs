//! Core types shared by every Tern crate.
//!
//! - [`Span`] for source locations
//! - The error hierarchy rooted at [`TernError`]
//! - [`TypeDef`], the static type of every expression
//! - [`Value`] and [`ScriptString`], the run-time representation

mod error;
mod span;
mod type_def;
mod value;

pub use error::{
    CompilationError, LexError, ParseError, ParseErrorKind, RegistrationError, RuntimeError,
    TernError,
};
pub use span::Span;
pub use type_def::{TypeDef, ValueKind};
pub use value::{ScriptString, Value, live_strings};
