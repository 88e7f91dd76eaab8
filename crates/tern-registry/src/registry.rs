//! The native function table shared by the compiler and the virtual machine.
//!
//! Functions are registered before compiling and addressed by the index
//! returned at registration. Indices are append-only and fit in one byte,
//! which is how bytecode refers to them.

use rustc_hash::FxHashMap;
use tern_core::RegistrationError;

use crate::{NativeCallable, NativeFn, Signature};

/// Highest number of native functions one registry can hold.
pub const MAX_NATIVE_FUNCTIONS: usize = 256;

#[derive(Default)]
pub struct Registry {
    functions: Vec<NativeFn>,
    by_name: FxHashMap<String, u8>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `signature` and register `callable` under its name.
    ///
    /// Returns the index bytecode uses to call the function.
    pub fn register_native_fn<F>(
        &mut self,
        signature: &str,
        callable: F,
    ) -> Result<u8, RegistrationError>
    where
        F: NativeCallable + 'static,
    {
        let signature = Signature::parse(signature)?;

        if self.by_name.contains_key(&signature.name) {
            return Err(RegistrationError::DuplicateFunction(signature.name));
        }
        let index = u8::try_from(self.functions.len()).map_err(|_| {
            RegistrationError::TooManyFunctions {
                limit: MAX_NATIVE_FUNCTIONS,
            }
        })?;

        tracing::debug!(
            name = %signature.name,
            index,
            arity = signature.params.len(),
            variadic = signature.variadic,
            "registered native function"
        );

        self.by_name.insert(signature.name.clone(), index);
        self.functions.push(NativeFn::new(signature, callable));
        Ok(index)
    }

    /// Look up a function and its index by name.
    pub fn lookup(&self, name: &str) -> Option<(u8, &NativeFn)> {
        let index = *self.by_name.get(name)?;
        Some((index, &self.functions[index as usize]))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn get(&self, index: u8) -> Option<&NativeFn> {
        self.functions.get(index as usize)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Functions in index order.
    pub fn iter(&self) -> impl Iterator<Item = &NativeFn> {
        self.functions.iter()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.functions.iter()).finish()
    }
}
