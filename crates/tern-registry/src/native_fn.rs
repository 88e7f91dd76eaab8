//! Native function storage and the call context handed to them.

use std::fmt;

use tern_core::{ScriptString, TypeDef, Value};

use crate::Signature;

/// Trait for callable native functions.
///
/// Arguments arrive in source order and the returned value is pushed as the
/// call's result. Functions declared `void` should return [`Value::Null`],
/// which the compiler never lets a script observe.
pub trait NativeCallable {
    fn call(&self, ctx: &CallContext<'_>) -> Value;
}

impl<F> NativeCallable for F
where
    F: Fn(&CallContext<'_>) -> Value,
{
    fn call(&self, ctx: &CallContext<'_>) -> Value {
        (self)(ctx)
    }
}

/// Arguments of one native call.
///
/// The compiler has already checked every argument against the signature,
/// so the typed accessors only fail for optional parameters holding `null`
/// or for variadic arguments of another type.
pub struct CallContext<'vm> {
    args: &'vm [Value],
}

impl<'vm> CallContext<'vm> {
    pub fn new(args: &'vm [Value]) -> Self {
        Self { args }
    }

    pub fn argc(&self) -> usize {
        self.args.len()
    }

    pub fn args(&self) -> &'vm [Value] {
        self.args
    }

    pub fn arg(&self, index: usize) -> Option<&'vm Value> {
        self.args.get(index)
    }

    pub fn number(&self, index: usize) -> Option<f64> {
        self.arg(index).and_then(Value::as_number)
    }

    pub fn boolean(&self, index: usize) -> Option<bool> {
        self.arg(index).and_then(Value::as_boolean)
    }

    pub fn string(&self, index: usize) -> Option<&'vm ScriptString> {
        self.arg(index).and_then(Value::as_string)
    }

    pub fn str(&self, index: usize) -> Option<&'vm str> {
        self.arg(index).and_then(Value::as_str)
    }
}

impl fmt::Debug for CallContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallContext")
            .field("args", &self.args)
            .finish()
    }
}

/// A registered native function: its signature plus the Rust callable.
pub struct NativeFn {
    signature: Signature,
    callable: Box<dyn NativeCallable>,
}

impl NativeFn {
    pub fn new<F>(signature: Signature, callable: F) -> Self
    where
        F: NativeCallable + 'static,
    {
        Self {
            signature,
            callable: Box::new(callable),
        }
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn name(&self) -> &str {
        &self.signature.name
    }

    pub fn return_type(&self) -> TypeDef {
        self.signature.return_type
    }

    pub fn params(&self) -> &[TypeDef] {
        &self.signature.params
    }

    pub fn is_variadic(&self) -> bool {
        self.signature.variadic
    }

    pub fn call(&self, ctx: &CallContext<'_>) -> Value {
        self.callable.call(ctx)
    }
}

impl fmt::Debug for NativeFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFn")
            .field("signature", &self.signature.to_string())
            .finish_non_exhaustive()
    }
}
