//! The catalog of validation modes.
//!
//! Every member is declared with exactly one [`Mode`]. The mode decides which
//! validation strategy runs on each write and what shape the member's context
//! payload must have (see [`Mode::expected_context`]).
//!
//! Modes are addressable three ways, so member tables can come from code or
//! from configuration: the enum itself, its snake_case name (`FromStr` and
//! serde), and its catalog index (`TryFrom<u8>`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::foundation::ConfigurationError;

/// A validation strategy.
///
/// The discriminants are the catalog indices and are stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Mode {
    /// Accept any value unchanged.
    NoOp = 0,
    /// Exactly a bool.
    Bool,
    /// Exactly an int.
    Int,
    /// An int, or a float truncated toward zero.
    IntPromote,
    /// Legacy alias of [`Mode::Int`].
    Long,
    /// Legacy alias of [`Mode::IntPromote`].
    LongPromote,
    /// Exactly a float.
    Float,
    /// A float, or an int converted to float.
    FloatPromote,
    /// Exactly a byte string.
    Bytes,
    /// A byte string, or text encoded as UTF-8.
    BytesPromote,
    /// Exactly a text string.
    Str,
    /// A text string, or bytes decoded as UTF-8.
    StrPromote,
    /// Legacy alias of [`Mode::Str`].
    Unicode,
    /// Legacy alias of [`Mode::StrPromote`].
    UnicodePromote,
    /// A tuple, optionally validating every item.
    Tuple,
    /// A list, rebuilt as a plain observable list.
    List,
    /// A list, rebuilt as a constrained observable list.
    ContainerList,
    /// A dict, optionally validating keys and/or values.
    Dict,
    /// `None` or an instance of the configured type(s).
    Instance,
    /// `None` or a value whose type is exactly the configured type.
    Typed,
    /// A type deriving from the configured type.
    Subclass,
    /// One of the configured values.
    Enum,
    /// `None` or something invocable.
    Callable,
    /// A float within optional bounds.
    FloatRange,
    /// An int within optional bounds.
    Range,
    /// An instance of a type, or whatever a coercer turns the value into.
    Coerced,
    /// Whatever another member accepts.
    Delegate,
    /// Owner method called with `(old, new)`.
    ObjectMethodOldNew,
    /// Owner method called with `(name, old, new)`.
    ObjectMethodNameOldNew,
    /// Member method called with `(owner, old, new)`.
    MemberMethodObjectOldNew,
}

impl Mode {
    /// Every mode in catalog order.
    pub const ALL: [Mode; 30] = [
        Self::NoOp,
        Self::Bool,
        Self::Int,
        Self::IntPromote,
        Self::Long,
        Self::LongPromote,
        Self::Float,
        Self::FloatPromote,
        Self::Bytes,
        Self::BytesPromote,
        Self::Str,
        Self::StrPromote,
        Self::Unicode,
        Self::UnicodePromote,
        Self::Tuple,
        Self::List,
        Self::ContainerList,
        Self::Dict,
        Self::Instance,
        Self::Typed,
        Self::Subclass,
        Self::Enum,
        Self::Callable,
        Self::FloatRange,
        Self::Range,
        Self::Coerced,
        Self::Delegate,
        Self::ObjectMethodOldNew,
        Self::ObjectMethodNameOldNew,
        Self::MemberMethodObjectOldNew,
    ];

    /// Returns the catalog index.
    #[must_use]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Returns the snake_case name used in configuration.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::NoOp => "no_op",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::IntPromote => "int_promote",
            Self::Long => "long",
            Self::LongPromote => "long_promote",
            Self::Float => "float",
            Self::FloatPromote => "float_promote",
            Self::Bytes => "bytes",
            Self::BytesPromote => "bytes_promote",
            Self::Str => "str",
            Self::StrPromote => "str_promote",
            Self::Unicode => "unicode",
            Self::UnicodePromote => "unicode_promote",
            Self::Tuple => "tuple",
            Self::List => "list",
            Self::ContainerList => "container_list",
            Self::Dict => "dict",
            Self::Instance => "instance",
            Self::Typed => "typed",
            Self::Subclass => "subclass",
            Self::Enum => "enum",
            Self::Callable => "callable",
            Self::FloatRange => "float_range",
            Self::Range => "range",
            Self::Coerced => "coerced",
            Self::Delegate => "delegate",
            Self::ObjectMethodOldNew => "object_method_old_new",
            Self::ObjectMethodNameOldNew => "object_method_name_old_new",
            Self::MemberMethodObjectOldNew => "member_method_object_old_new",
        }
    }

    /// Describes the context payload this mode requires.
    #[must_use]
    pub const fn expected_context(self) -> &'static str {
        match self {
            Self::Tuple | Self::List | Self::ContainerList => "Member or None",
            Self::Dict => "2-tuple of Member or None",
            Self::Instance => "type or tuple of types",
            Self::Typed | Self::Subclass => "type",
            Self::Enum => "sequence",
            Self::FloatRange => "2-tuple of float or None",
            Self::Range => "2-tuple of int or None",
            Self::Coerced => "2-tuple of (type, callable)",
            Self::Delegate => "Member",
            Self::ObjectMethodOldNew
            | Self::ObjectMethodNameOldNew
            | Self::MemberMethodObjectOldNew => "str",
            _ => "anything (ignored)",
        }
    }

    /// Returns `true` for the modes that call back into user methods.
    #[must_use]
    pub const fn is_callback(self) -> bool {
        matches!(
            self,
            Self::ObjectMethodOldNew | Self::ObjectMethodNameOldNew | Self::MemberMethodObjectOldNew
        )
    }

    /// Returns `true` for the modes that rebuild a container.
    #[must_use]
    pub const fn is_container(self) -> bool {
        matches!(
            self,
            Self::Tuple | Self::List | Self::ContainerList | Self::Dict
        )
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u8> for Mode {
    type Error = ConfigurationError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .get(usize::from(index))
            .copied()
            .ok_or(ConfigurationError::UnknownMode(index))
    }
}

impl FromStr for Mode {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|mode| mode.name() == s)
            .ok_or_else(|| ConfigurationError::UnknownModeName(s.to_owned()))
    }
}
