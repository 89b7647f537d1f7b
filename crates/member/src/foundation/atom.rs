//! The owner side of a write: the object whose member is being assigned.

use std::fmt;
use std::sync::Arc;

use crate::foundation::{TypeHandle, ValidationError, Value};

/// An object that owns members.
///
/// The validation engine treats owners as opaque. It only reads the owner's
/// type (for diagnostics and instance checks) and, for the callback modes,
/// resolves and invokes methods by name.
pub trait Atom: fmt::Debug + Send + Sync {
    /// Returns the concrete type of this object.
    fn atom_type(&self) -> &TypeHandle;

    /// Resolves `name` on this object and invokes it with `args`.
    ///
    /// Resolution happens on every call, so implementations are free to
    /// rebind methods at runtime. The default has no methods at all.
    fn call_method(&self, name: &str, args: &[Value]) -> Result<Value, ValidationError> {
        let _ = args;
        Err(ValidationError::missing_method(
            self.atom_type().name().to_owned(),
            name.to_owned(),
        ))
    }

    /// Returns `true` if the object itself can be invoked.
    fn is_callable(&self) -> bool {
        false
    }
}

/// Shared handle to an owner.
pub type AtomRef = Arc<dyn Atom>;

/// Returns `true` if both handles point at the same object.
#[must_use]
pub fn same_atom(a: &AtomRef, b: &AtomRef) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}
