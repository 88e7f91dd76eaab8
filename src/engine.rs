//! The host-facing entry point.

use tern_compiler::{Program, compile_script_with_options};
use tern_core::{TernError, Value};
use tern_registry::{NativeCallable, Registry};

use crate::EngineOptions;
use crate::vm::Vm;

/// Owns the native functions and runs scripts against them.
///
/// Register every native function first: compiled programs refer to natives
/// by index, so a program must be executed by the engine that compiled it.
///
/// ```
/// use tern::{CallContext, Engine, Value};
///
/// let mut engine = Engine::new();
/// engine
///     .register_fn("number add(number, number)", |ctx: &CallContext<'_>| {
///         Value::Number(ctx.number(0).unwrap_or(0.0) + ctx.number(1).unwrap_or(0.0))
///     })
///     .unwrap();
///
/// assert_eq!(engine.eval("add(2, 3)").unwrap(), Value::Number(5.0));
/// assert!(engine.compile("add(2, \"x\")").is_err());
/// ```
#[derive(Debug, Default)]
pub struct Engine {
    registry: Registry,
    options: EngineOptions,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: EngineOptions) -> Self {
        Self {
            registry: Registry::new(),
            options,
        }
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Register a native function from its signature, e.g.
    /// `"string? lookup(string, number?)"` or `"void print(string, ...)"`.
    ///
    /// Returns the function's index.
    pub fn register_fn<F>(&mut self, signature: &str, callable: F) -> Result<u8, TernError>
    where
        F: NativeCallable + 'static,
    {
        Ok(self.registry.register_native_fn(signature, callable)?)
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn compile(&self, source: &str) -> Result<Program, TernError> {
        compile_script_with_options(source, &self.registry, self.options.compile_options())
    }

    /// Run a program compiled by this engine and return its result.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn execute(&self, program: &Program) -> Result<Value, TernError> {
        tracing::debug!(
            bytes = program.chunk().len(),
            stack_capacity = self.options.stack_capacity,
            "executing program"
        );
        let mut vm = Vm::new(program, &self.registry, self.options.stack_capacity);
        let result = vm.run();
        match &result {
            Ok(value) => tracing::debug!(result = %value, "execution finished"),
            Err(error) => tracing::debug!(%error, "execution failed"),
        }
        Ok(result?)
    }

    /// Compile and run `source` in one step.
    pub fn eval(&self, source: &str) -> Result<Value, TernError> {
        let program = self.compile(source)?;
        self.execute(&program)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tern_core::{CompilationError, RegistrationError, RuntimeError};
    use tern_registry::CallContext;

    #[test]
    fn eval_returns_last_expression() {
        let engine = Engine::new();
        assert_eq!(
            engine.eval("let x = 5; let y = x * 2 - 3; y").unwrap(),
            Value::Number(7.0)
        );
        assert_eq!(engine.eval("let x = 5;").unwrap(), Value::Null);
    }

    #[test]
    fn programs_can_run_twice() {
        let engine = Engine::new();
        let program = engine.compile("let s = \"a\" + \"b\"; s").unwrap();
        assert_eq!(engine.execute(&program).unwrap().as_str(), Some("ab"));
        assert_eq!(engine.execute(&program).unwrap().as_str(), Some("ab"));
    }

    #[test]
    fn registration_errors_surface() {
        let mut engine = Engine::new();
        let noop = |_: &CallContext<'_>| Value::Null;
        engine.register_fn("void f()", noop).unwrap();
        assert!(matches!(
            engine.register_fn("void f()", noop),
            Err(TernError::Registration(RegistrationError::DuplicateFunction(_)))
        ));
        assert!(matches!(
            engine.register_fn("f()", noop),
            Err(TernError::Registration(RegistrationError::InvalidSignature { .. }))
        ));
    }

    #[test]
    fn options_reach_compiler_and_vm() {
        let engine = Engine::with_options(EngineOptions::default().with_max_variables(1));
        assert!(matches!(
            engine.eval("let a = 1; let b = 2;"),
            Err(TernError::Compilation(CompilationError::TooManyVariables { .. }))
        ));

        let engine = Engine::with_options(EngineOptions::default().with_stack_capacity(2));
        assert_eq!(
            engine.eval("1 + (2 + (3 + 4))"),
            Ok(Value::Number(10.0))
        );
        assert_eq!(
            engine.eval("let a = 1; let b = 2; a + b"),
            Err(TernError::Runtime(RuntimeError::StackOverflow { capacity: 2 }))
        );
    }
}
