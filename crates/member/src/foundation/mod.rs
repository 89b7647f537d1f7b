//! Core runtime types the validation engine operates on
//!
//! - **Values**: [`Value`], the dynamically typed payload of every write
//! - **Types**: [`TypeHandle`] and the [`builtins`] table
//! - **Owners**: the [`Atom`] trait implemented by objects that own members
//! - **Callables**: [`Callable`], user functions used as coercers
//! - **Errors**: [`ConfigurationError`] and [`ValidationError`]
//!
//! Nothing in here knows about modes or members beyond what the value model
//! needs to hold them.

mod atom;
mod callable;
mod error;
mod types;
mod value;

pub use atom::{Atom, AtomRef, same_atom};
pub use callable::{Callable, CallableFn};
pub use error::{ConfigurationError, ErrorKind, ValidationError};
pub use types::{Builtins, TypeHandle, builtins};
pub use value::{Dict, Value};

#[cfg(test)]
pub(crate) use atom::testing;

/// Result of a single validation.
pub type ValidationResult<T> = Result<T, ValidationError>;
