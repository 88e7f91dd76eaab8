//! Engine configuration.

use tern_compiler::{CompileOptions, DEFAULT_MAX_VARIABLES, MAX_VARIABLES};

use crate::vm::DEFAULT_STACK_CAPACITY;

/// Limits applied to every script an [`Engine`](crate::Engine) runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    /// Slots in the VM value stack.
    pub stack_capacity: usize,
    /// Variables a script may have live at once, at most 256.
    pub max_variables: usize,
}

impl EngineOptions {
    pub fn with_stack_capacity(mut self, capacity: usize) -> Self {
        self.stack_capacity = capacity;
        self
    }

    pub fn with_max_variables(mut self, max: usize) -> Self {
        self.max_variables = max.min(MAX_VARIABLES);
        self
    }

    pub(crate) fn compile_options(&self) -> CompileOptions {
        CompileOptions {
            max_variables: self.max_variables,
        }
    }
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            stack_capacity: DEFAULT_STACK_CAPACITY,
            max_variables: DEFAULT_MAX_VARIABLES,
        }
    }
}
