//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use nebula_member::prelude::*;
//!
//! let tags = Member::new("tags", Mode::ContainerList, Value::None)?;
//! ```

// ============================================================================
// FOUNDATION: Values, types, owners, errors
// ============================================================================

pub use crate::foundation::{
    Atom, AtomRef, Callable, ConfigurationError, Dict, ErrorKind, TypeHandle, ValidationError,
    ValidationResult, Value, builtins,
};

// ============================================================================
// DECLARATION AND DISPATCH
// ============================================================================

pub use crate::context::check_context;
pub use crate::member::{Member, MemberBuilder, MemberMethod};
pub use crate::mode::Mode;
pub use crate::validators::Validator;

// ============================================================================
// CONTAINERS AND RECORDS
// ============================================================================

pub use crate::change::{ChangeKind, ChangeRecord};
pub use crate::list::{ConstrainedListFactory, List, ListFactory, ObservableListFactory};
