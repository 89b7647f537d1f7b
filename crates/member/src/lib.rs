//! # nebula-member
//!
//! Runtime validation for the members of Nebula atoms, and the change
//! records observers receive after a write.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use nebula_member::prelude::*;
//!
//! // Declared once per class attribute; a bad context fails right here.
//! let level = Member::new("level", Mode::Range, Value::pair(0, 10))?;
//!
//! // Every write goes through the member.
//! assert_eq!(level.validate(&owner, &Value::None, Value::Int(5))?, Value::Int(5));
//! assert!(level.validate(&owner, &Value::None, Value::Int(11)).is_err());
//! ```
//!
//! ## Declaring Members
//!
//! A member pairs a [`Mode`] from the catalog with a mode-specific context.
//! [`check_context`] validates that pairing once and compiles it into a
//! [`Validator`]; writes then dispatch through a single exhaustive match.
//!
//! ## Mode Families
//!
//! - **Scalar**: `bool`, `int`, `float`, `bytes`, `str` and their
//!   `*_promote` variants
//! - **Container**: `tuple`, `list`, `container_list`, `dict`
//! - **Constraint**: `instance`, `typed`, `subclass`, `enum`, `callable`,
//!   `range`, `float_range`
//! - **Escape hatch**: `coerced`, `delegate`, and the three callback modes
//!
//! ## Change Records
//!
//! [`ChangeRecord`] packages a successful write for observers;
//! [`Member::validate_change`] validates and builds the record in one step.

// ValidationError is the error type of every write; boxing it would add an
// indirection to the hot path.
#![allow(clippy::result_large_err)]

pub mod change;
pub mod context;
pub mod foundation;
pub mod list;
pub mod member;
pub mod mode;
pub mod prelude;
pub mod validators;

pub use change::{ChangeKind, ChangeRecord};
pub use context::check_context;
pub use foundation::{
    Atom, AtomRef, Callable, ConfigurationError, ErrorKind, TypeHandle, ValidationError,
    ValidationResult, Value,
};
pub use list::{ConstrainedListFactory, List, ListFactory, ObservableListFactory};
pub use member::{Member, MemberBuilder, MemberMethod};
pub use mode::Mode;
pub use validators::Validator;
