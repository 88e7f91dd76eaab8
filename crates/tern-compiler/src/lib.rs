//! Tern compiler.
//!
//! A single-pass compiler: statements are parsed, type checked and turned
//! into bytecode in one walk over the token stream.
//!
//! ## Modules
//!
//! - [`bytecode`]: Instruction set, chunks and disassembly
//! - [`emit`]: Bytecode emitter with jump and loop bookkeeping
//! - [`scope`]: Variable slots and block scopes
//!
//! # Example
//!
//! ```
//! use tern_compiler::compile_script;
//! use tern_registry::Registry;
//!
//! let program = compile_script("let x = 5; let y = x * 2 - 3; y", &Registry::new()).unwrap();
//! assert_eq!(program.globals(), 2);
//! assert!(program.yields_value());
//! ```

pub mod bytecode;
mod compiler;
pub mod emit;
mod expr;
mod program;
pub mod scope;
mod stmt;

pub use bytecode::{Chunk, OpCode, disassemble};
pub use compiler::ScriptCompiler;
pub use emit::{BreakError, BytecodeEmitter, JumpLabel};
pub use program::Program;
pub use scope::{LocalScope, LocalVar, MAX_VARIABLES};

use tern_core::TernError;
use tern_registry::Registry;

/// Variable slots available to a script by default.
pub const DEFAULT_MAX_VARIABLES: usize = 128;

/// Compiler limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompileOptions {
    /// Live variables allowed at once, clamped to [`MAX_VARIABLES`].
    pub max_variables: usize,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            max_variables: DEFAULT_MAX_VARIABLES,
        }
    }
}

/// Compile `source` against the native functions in `registry`.
pub fn compile_script(source: &str, registry: &Registry) -> Result<Program, TernError> {
    compile_script_with_options(source, registry, CompileOptions::default())
}

#[cfg_attr(feature = "profiling", profiling::function)]
pub fn compile_script_with_options(
    source: &str,
    registry: &Registry,
    options: CompileOptions,
) -> Result<Program, TernError> {
    let program = ScriptCompiler::new(source, registry, options).compile()?;

    tracing::debug!(
        bytes = program.chunk().len(),
        strings = program.chunk().strings().len(),
        globals = program.globals(),
        yields_value = program.yields_value(),
        "compiled script"
    );
    Ok(program)
}
