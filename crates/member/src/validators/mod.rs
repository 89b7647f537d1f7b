//! Compiled validators and write-time dispatch
//!
//! A [`Validator`] is what a member's mode and context compile into when the
//! member is declared (see [`check_context`](crate::context::check_context)).
//! It holds the context already unpacked into typed fields, so a write never
//! re-inspects the context shape: dispatch is a single exhaustive `match`.
//!
//! # Families
//!
//! - **Scalar**: exact and promoting checks for bool, int, float, bytes, str
//! - **Container**: tuple, list (plain or constrained), dict
//! - **Constraint**: instance, exact type, subclass, enum, callable, ranges
//! - **Escape hatch**: coercer, delegate, and the three callback flavours
//!
//! Legacy catalog aliases (`Long`, `Unicode`, ...) compile to the same
//! variant as the mode they alias.

mod constraint;
mod container;
mod escape;
mod scalar;

use std::fmt;
use std::sync::Arc;

use crate::foundation::{AtomRef, Callable, TypeHandle, ValidationResult, Value};
use crate::list::ListFactory;
use crate::member::Member;

/// A member's validation strategy with its context unpacked.
#[derive(Clone)]
pub enum Validator {
    /// Accept anything.
    NoOp,
    /// Exactly a bool.
    Bool,
    /// Exactly an int.
    Int,
    /// Int, or float truncated toward zero.
    IntPromote,
    /// Exactly a float.
    Float,
    /// Float, or int converted to float.
    FloatPromote,
    /// Exactly bytes.
    Bytes,
    /// Bytes, or text encoded as UTF-8.
    BytesPromote,
    /// Exactly text.
    Str,
    /// Text, or bytes decoded as UTF-8.
    StrPromote,
    /// A tuple, items validated by the optional member.
    Tuple(Option<Arc<Member>>),
    /// A list, items validated by the optional member.
    List {
        /// Item member.
        item: Option<Arc<Member>>,
        /// Whether the member was declared as a constrained list.
        constrained: bool,
        /// Builds the result list.
        factory: Arc<dyn ListFactory>,
    },
    /// A dict, keys and values validated by the optional members.
    Dict {
        /// Key member.
        key: Option<Arc<Member>>,
        /// Value member.
        value: Option<Arc<Member>>,
    },
    /// `None` or an instance of any of the types.
    Instance(Arc<[TypeHandle]>),
    /// `None` or exactly this type.
    Typed(TypeHandle),
    /// A subclass of this type.
    Subclass(TypeHandle),
    /// One of these values.
    Enum(Arc<[Value]>),
    /// `None` or something invocable.
    Callable,
    /// A float within optional bounds.
    FloatRange {
        /// Inclusive low bound.
        low: Option<f64>,
        /// Inclusive high bound.
        high: Option<f64>,
    },
    /// An int within optional bounds.
    Range {
        /// Inclusive low bound.
        low: Option<i64>,
        /// Inclusive high bound.
        high: Option<i64>,
    },
    /// An instance of `ty`, or the coercer's result.
    Coerced {
        /// Target type.
        ty: TypeHandle,
        /// One-argument conversion.
        coercer: Callable,
    },
    /// Whatever the target member accepts.
    Delegate(Arc<Member>),
    /// `owner.<method>(old, new)`.
    ObjectMethodOldNew(Arc<str>),
    /// `owner.<method>(name, old, new)`.
    ObjectMethodNameOldNew(Arc<str>),
    /// `member.<method>(owner, old, new)`.
    MemberMethodObjectOldNew(Arc<str>),
}

impl Validator {
    /// Validates `new` for a write of `member` on `owner`.
    ///
    /// Returns the accepted value, which may differ from `new` when the
    /// validator promotes, rebuilds or coerces it.
    pub fn validate(
        &self,
        member: &Member,
        owner: &AtomRef,
        old: &Value,
        new: Value,
    ) -> ValidationResult<Value> {
        match self {
            Self::NoOp => Ok(new),
            Self::Bool => scalar::validate_bool(member, owner, new),
            Self::Int => scalar::validate_int(member, owner, new),
            Self::IntPromote => scalar::validate_int_promote(member, owner, new),
            Self::Float => scalar::validate_float(member, owner, new),
            Self::FloatPromote => scalar::validate_float_promote(member, owner, new),
            Self::Bytes => scalar::validate_bytes(member, owner, new),
            Self::BytesPromote => scalar::validate_bytes_promote(member, owner, new),
            Self::Str => scalar::validate_str(member, owner, new),
            Self::StrPromote => scalar::validate_str_promote(member, owner, new),
            Self::Tuple(item) => container::validate_tuple(item.as_ref(), member, owner, new),
            Self::List { item, factory, .. } => {
                container::validate_list(factory.as_ref(), item.as_ref(), member, owner, new)
            }
            Self::Dict { key, value } => {
                container::validate_dict(key.as_ref(), value.as_ref(), member, owner, new)
            }
            Self::Instance(types) => constraint::validate_instance(types, member, new),
            Self::Typed(ty) => constraint::validate_typed(ty, member, owner, new),
            Self::Subclass(ty) => constraint::validate_subclass(ty, member, new),
            Self::Enum(items) => constraint::validate_enum(items, member, new),
            Self::Callable => constraint::validate_callable(member, owner, new),
            Self::FloatRange { low, high } => {
                constraint::validate_float_range(*low, *high, member, owner, new)
            }
            Self::Range { low, high } => {
                constraint::validate_range(*low, *high, member, owner, new)
            }
            Self::Coerced { ty, coercer } => escape::validate_coerced(ty, coercer, member, new),
            Self::Delegate(target) => escape::validate_delegate(target, owner, old, new),
            Self::ObjectMethodOldNew(method) => {
                escape::validate_object_method_old_new(method, owner, old, new)
            }
            Self::ObjectMethodNameOldNew(method) => {
                escape::validate_object_method_name_old_new(method, member, owner, old, new)
            }
            Self::MemberMethodObjectOldNew(method) => {
                escape::validate_member_method_object_old_new(method, member, owner, old, new)
            }
        }
    }

    /// Short name of the strategy, for logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::NoOp => "no_op",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::IntPromote => "int_promote",
            Self::Float => "float",
            Self::FloatPromote => "float_promote",
            Self::Bytes => "bytes",
            Self::BytesPromote => "bytes_promote",
            Self::Str => "str",
            Self::StrPromote => "str_promote",
            Self::Tuple(_) => "tuple",
            Self::List {
                constrained: false, ..
            } => "list",
            Self::List {
                constrained: true, ..
            } => "container_list",
            Self::Dict { .. } => "dict",
            Self::Instance(_) => "instance",
            Self::Typed(_) => "typed",
            Self::Subclass(_) => "subclass",
            Self::Enum(_) => "enum",
            Self::Callable => "callable",
            Self::FloatRange { .. } => "float_range",
            Self::Range { .. } => "range",
            Self::Coerced { .. } => "coerced",
            Self::Delegate(_) => "delegate",
            Self::ObjectMethodOldNew(_) => "object_method_old_new",
            Self::ObjectMethodNameOldNew(_) => "object_method_name_old_new",
            Self::MemberMethodObjectOldNew(_) => "member_method_object_old_new",
        }
    }
}

fn member_name(member: Option<&Arc<Member>>) -> Option<&str> {
    member.map(|m| m.name())
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tuple(item) => f
                .debug_tuple("Tuple")
                .field(&member_name(item.as_ref()))
                .finish(),
            Self::List {
                item, constrained, ..
            } => f
                .debug_struct("List")
                .field("item", &member_name(item.as_ref()))
                .field("constrained", constrained)
                .finish_non_exhaustive(),
            Self::Dict { key, value } => f
                .debug_struct("Dict")
                .field("key", &member_name(key.as_ref()))
                .field("value", &member_name(value.as_ref()))
                .finish(),
            Self::Instance(types) => f.debug_tuple("Instance").field(types).finish(),
            Self::Typed(ty) => f.debug_tuple("Typed").field(ty).finish(),
            Self::Subclass(ty) => f.debug_tuple("Subclass").field(ty).finish(),
            Self::Enum(items) => f.debug_tuple("Enum").field(items).finish(),
            Self::FloatRange { low, high } => f
                .debug_struct("FloatRange")
                .field("low", low)
                .field("high", high)
                .finish(),
            Self::Range { low, high } => f
                .debug_struct("Range")
                .field("low", low)
                .field("high", high)
                .finish(),
            Self::Coerced { ty, coercer } => f
                .debug_struct("Coerced")
                .field("ty", ty)
                .field("coercer", coercer)
                .finish(),
            Self::Delegate(target) => f.debug_tuple("Delegate").field(&target.name()).finish(),
            Self::ObjectMethodOldNew(method)
            | Self::ObjectMethodNameOldNew(method)
            | Self::MemberMethodObjectOldNew(method) => {
                write!(f, "{}({method:?})", self.kind())
            }
            other => f.write_str(other.kind()),
        }
    }
}
