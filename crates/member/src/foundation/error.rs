//! Error types for declaration and validation failures
//!
//! Two families exist:
//!
//! - [`ConfigurationError`] is raised once, when a member is declared with a
//!   context payload that does not fit its mode.
//! - [`ValidationError`] is raised on a write. It is a structured record
//!   (code, message, member, params) so that diagnostics can be inspected
//!   without parsing messages. User code (coercers, callbacks) returns the
//!   same type, and its failures travel through the engine unchanged.
//!
//! All string fields use `Cow<'static, str>` so static codes and messages
//! never allocate.

use std::borrow::Cow;
use std::fmt;

use smallvec::SmallVec;
use thiserror::Error;

use crate::mode::Mode;

// ============================================================================
// CONFIGURATION ERROR
// ============================================================================

/// A member was declared with a context that does not fit its mode.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// The context payload has the wrong shape.
    #[error("invalid context for '{mode}' mode: expected {expected}, got {actual}")]
    InvalidContext {
        /// Mode the member was declared with.
        mode: Mode,
        /// Shape the mode requires.
        expected: &'static str,
        /// Description of what was supplied.
        actual: String,
    },

    /// A catalog index outside the known modes.
    #[error("unknown validation mode index {0}")]
    UnknownMode(u8),

    /// A mode name that is not in the catalog.
    #[error("unknown validation mode '{0}'")]
    UnknownModeName(String),

    /// A list factory was supplied for a mode that does not build lists.
    #[error("'{0}' mode does not build lists, a list factory cannot be used")]
    ListFactoryUnsupported(Mode),
}

impl ConfigurationError {
    /// Creates an invalid-context error for `mode`.
    pub fn invalid_context(mode: Mode, actual: impl Into<String>) -> Self {
        Self::InvalidContext {
            mode,
            expected: mode.expected_context(),
            actual: actual.into(),
        }
    }
}

// ============================================================================
// VALIDATION ERROR
// ============================================================================

/// Broad class of a validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The value has the wrong kind or type.
    Type,
    /// The value has the right kind but is not acceptable.
    Value,
    /// A numeric bound was violated.
    Range,
    /// A method could not be resolved.
    Attribute,
    /// A promotion could not represent the value in the target kind.
    Conversion,
    /// A list position does not exist.
    Index,
    /// Raised by user code.
    User,
}

impl ErrorKind {
    /// Returns the kind as a lowercase string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Type => "type",
            Self::Value => "value",
            Self::Range => "range",
            Self::Attribute => "attribute",
            Self::Conversion => "conversion",
            Self::Index => "index",
            Self::User => "user",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

type Params = SmallVec<[(Cow<'static, str>, Cow<'static, str>); 4]>;

/// A structured validation failure.
///
/// # Examples
///
/// ```rust,ignore
/// use nebula_member::foundation::{ErrorKind, ValidationError};
///
/// let error = ValidationError::type_mismatch("age", "Person", "int", "str");
/// assert_eq!(error.kind, ErrorKind::Type);
/// assert_eq!(error.param("expected"), Some("int"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Broad class of the failure.
    pub kind: ErrorKind,

    /// Error code for programmatic handling.
    ///
    /// Examples: "type_mismatch", "too_large", "invalid_enum"
    pub code: Cow<'static, str>,

    /// Human-readable message.
    pub message: Cow<'static, str>,

    /// Name of the member being written, when known.
    pub member: Option<Cow<'static, str>>,

    /// Ordered key-value details (typically 1-4 entries).
    pub params: Params,
}

impl ValidationError {
    /// Creates a new error with a kind, code and message.
    pub fn new(
        kind: ErrorKind,
        code: impl Into<Cow<'static, str>>,
        message: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            kind,
            code: code.into(),
            message: message.into(),
            member: None,
            params: SmallVec::new(),
        }
    }

    /// Sets the member name.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_member(mut self, member: impl Into<Cow<'static, str>>) -> Self {
        self.member = Some(member.into());
        self
    }

    /// Adds a parameter.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_param(
        mut self,
        key: impl Into<Cow<'static, str>>,
        value: impl Into<Cow<'static, str>>,
    ) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Looks up a parameter value by key.
    #[must_use]
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k.as_ref() == key)
            .map(|(_, v)| v.as_ref())
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ValidationError {}

// ============================================================================
// CONVENIENCE CONSTRUCTORS
// ============================================================================

impl ValidationError {
    /// The value is not of the kind the member requires.
    pub fn type_mismatch(
        member: impl Into<Cow<'static, str>>,
        owner_type: impl Into<Cow<'static, str>>,
        expected: impl Into<Cow<'static, str>>,
        actual: impl Into<Cow<'static, str>>,
    ) -> Self {
        let member = member.into();
        let owner_type = owner_type.into();
        let expected = expected.into();
        let actual = actual.into();
        Self::new(
            ErrorKind::Type,
            "type_mismatch",
            format!(
                "The '{member}' member on the '{owner_type}' object must be of type \
                 '{expected}'. Got object of type '{actual}' instead."
            ),
        )
        .with_member(member)
        .with_param("owner", owner_type)
        .with_param("expected", expected)
        .with_param("actual", actual)
    }

    /// The value is not an instance of any accepted type.
    pub fn invalid_instance(
        member: impl Into<Cow<'static, str>>,
        expected: impl Into<Cow<'static, str>>,
        actual: impl Into<Cow<'static, str>>,
    ) -> Self {
        let member = member.into();
        let expected = expected.into();
        let actual = actual.into();
        Self::new(
            ErrorKind::Type,
            "invalid_instance",
            format!(
                "invalid instance type: the '{member}' member requires an instance of \
                 {expected}, got '{actual}'"
            ),
        )
        .with_member(member)
        .with_param("expected", expected)
        .with_param("actual", actual)
    }

    /// The value is not a subclass of the required type.
    pub fn invalid_subclass(
        member: impl Into<Cow<'static, str>>,
        expected: impl Into<Cow<'static, str>>,
        actual: impl Into<Cow<'static, str>>,
    ) -> Self {
        let member = member.into();
        let expected = expected.into();
        let actual = actual.into();
        Self::new(
            ErrorKind::Type,
            "invalid_subclass",
            format!(
                "invalid subclass type: the '{member}' member requires a subclass of \
                 '{expected}', got {actual}"
            ),
        )
        .with_member(member)
        .with_param("expected", expected)
        .with_param("actual", actual)
    }

    /// The value is not one of the allowed items.
    pub fn invalid_enum(
        member: impl Into<Cow<'static, str>>,
        value: impl Into<Cow<'static, str>>,
    ) -> Self {
        let member = member.into();
        let value = value.into();
        Self::new(
            ErrorKind::Value,
            "invalid_enum",
            format!("invalid enum value {value} for the '{member}' member"),
        )
        .with_member(member)
        .with_param("value", value)
    }

    /// The value is below the low bound.
    pub fn too_small(
        member: impl Into<Cow<'static, str>>,
        low: impl fmt::Display,
        value: impl fmt::Display,
    ) -> Self {
        Self::new(ErrorKind::Range, "too_small", "range value too small")
            .with_member(member)
            .with_param("bound", "low")
            .with_param("limit", low.to_string())
            .with_param("actual", value.to_string())
    }

    /// The value is above the high bound.
    pub fn too_large(
        member: impl Into<Cow<'static, str>>,
        high: impl fmt::Display,
        value: impl fmt::Display,
    ) -> Self {
        Self::new(ErrorKind::Range, "too_large", "range value too large")
            .with_member(member)
            .with_param("bound", "high")
            .with_param("limit", high.to_string())
            .with_param("actual", value.to_string())
    }

    /// A coercer returned a value of the wrong type.
    pub fn coercion(
        member: impl Into<Cow<'static, str>>,
        expected: impl Into<Cow<'static, str>>,
        actual: impl Into<Cow<'static, str>>,
    ) -> Self {
        let expected = expected.into();
        let actual = actual.into();
        Self::new(
            ErrorKind::Value,
            "coercion",
            format!("could not coerce value to '{expected}', coercer returned '{actual}'"),
        )
        .with_member(member)
        .with_param("expected", expected)
        .with_param("actual", actual)
    }

    /// A promotion could not represent the value in the target kind.
    pub fn conversion(
        member: impl Into<Cow<'static, str>>,
        from: &'static str,
        to: &'static str,
        reason: impl Into<Cow<'static, str>>,
    ) -> Self {
        let reason = reason.into();
        Self::new(
            ErrorKind::Conversion,
            "conversion",
            format!("cannot convert {from} to {to}: {reason}"),
        )
        .with_member(member)
        .with_param("from", from)
        .with_param("to", to)
    }

    /// A dict key cannot be hashed stably.
    pub fn unhashable_key(
        member: impl Into<Cow<'static, str>>,
        actual: impl Into<Cow<'static, str>>,
    ) -> Self {
        let actual = actual.into();
        Self::new(
            ErrorKind::Type,
            "unhashable_key",
            format!("unhashable type: '{actual}'"),
        )
        .with_member(member)
        .with_param("actual", actual)
    }

    /// A method name could not be resolved on its target.
    pub fn missing_method(
        target: impl Into<Cow<'static, str>>,
        name: impl Into<Cow<'static, str>>,
    ) -> Self {
        let target = target.into();
        let name = name.into();
        Self::new(
            ErrorKind::Attribute,
            "missing_method",
            format!("'{target}' object has no method '{name}'"),
        )
        .with_param("target", target)
        .with_param("method", name)
    }

    /// A callable was invoked with the wrong number of arguments.
    pub fn arity(
        callable: impl Into<Cow<'static, str>>,
        expected: usize,
        given: usize,
    ) -> Self {
        let callable = callable.into();
        Self::new(
            ErrorKind::Type,
            "arity",
            format!("{callable}() takes {expected} argument(s) but {given} were given"),
        )
        .with_param("callable", callable)
        .with_param("expected", expected.to_string())
        .with_param("given", given.to_string())
    }

    /// A list position does not exist.
    pub fn index_out_of_range(index: usize, len: usize) -> Self {
        Self::new(
            ErrorKind::Index,
            "index_out_of_range",
            format!("list index {index} out of range for length {len}"),
        )
        .with_param("index", index.to_string())
        .with_param("len", len.to_string())
    }

    /// A failure raised by user code.
    pub fn user(
        code: impl Into<Cow<'static, str>>,
        message: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::new(ErrorKind::User, code, message)
    }
}

// ============================================================================
// TESTS
// ============================================================================
