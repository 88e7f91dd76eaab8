//! Tern native function registry.
//!
//! Hosts describe each native function with a textual signature:
//!
//! ```
//! use tern_core::Value;
//! use tern_registry::{CallContext, Registry};
//!
//! let mut registry = Registry::new();
//! let index = registry
//!     .register_native_fn("number add(number, number)", |ctx: &CallContext<'_>| {
//!         Value::Number(ctx.number(0).unwrap_or(0.0) + ctx.number(1).unwrap_or(0.0))
//!     })
//!     .unwrap();
//! assert_eq!(registry.lookup("add").map(|(i, _)| i), Some(index));
//! ```

mod native_fn;
mod registry;
mod signature;

pub use native_fn::{CallContext, NativeCallable, NativeFn};
pub use registry::{MAX_NATIVE_FUNCTIONS, Registry};
pub use signature::Signature;
