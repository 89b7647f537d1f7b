//! Declaration-time configuration checking.
//!
//! [`check_context`] is the only place that looks at the raw context
//! payload. It either rejects the payload with a [`ConfigurationError`] or
//! compiles it into a [`Validator`] that carries the payload in typed form.
//! Modes that take no configuration ignore their context.

use std::sync::Arc;

use tracing::debug;

use crate::foundation::{ConfigurationError, TypeHandle, Value};
use crate::list::{ConstrainedListFactory, ListFactory, ObservableListFactory};
use crate::member::Member;
use crate::mode::Mode;
use crate::validators::Validator;

/// Checks `context` against the shape `mode` requires and compiles it.
///
/// # Errors
///
/// Returns [`ConfigurationError::InvalidContext`] naming the expected shape
/// when `context` does not fit.
///
/// # Examples
///
/// ```rust,ignore
/// use nebula_member::{Mode, Value, check_context};
///
/// assert!(check_context(Mode::Range, &Value::pair(0, 10)).is_ok());
/// assert!(check_context(Mode::Range, &Value::pair(0.5, 10)).is_err());
/// ```
pub fn check_context(mode: Mode, context: &Value) -> Result<Validator, ConfigurationError> {
    let reject = || {
        debug!(%mode, context = %context, "rejected member context");
        ConfigurationError::invalid_context(mode, describe(context))
    };

    let validator = match mode {
        Mode::NoOp => Validator::NoOp,
        Mode::Bool => Validator::Bool,
        Mode::Int | Mode::Long => Validator::Int,
        Mode::IntPromote | Mode::LongPromote => Validator::IntPromote,
        Mode::Float => Validator::Float,
        Mode::FloatPromote => Validator::FloatPromote,
        Mode::Bytes => Validator::Bytes,
        Mode::BytesPromote => Validator::BytesPromote,
        Mode::Str | Mode::Unicode => Validator::Str,
        Mode::StrPromote | Mode::UnicodePromote => Validator::StrPromote,
        Mode::Callable => Validator::Callable,

        Mode::Tuple => Validator::Tuple(optional_member(context).ok_or_else(reject)?),
        Mode::List | Mode::ContainerList => {
            let constrained = mode == Mode::ContainerList;
            let factory: Arc<dyn ListFactory> = if constrained {
                Arc::new(ConstrainedListFactory)
            } else {
                Arc::new(ObservableListFactory)
            };
            Validator::List {
                item: optional_member(context).ok_or_else(reject)?,
                constrained,
                factory,
            }
        }
        Mode::Dict => {
            let [key, value] = pair(context).ok_or_else(reject)?;
            Validator::Dict {
                key: optional_member(key).ok_or_else(reject)?,
                value: optional_member(value).ok_or_else(reject)?,
            }
        }

        Mode::Instance => Validator::Instance(type_list(context).ok_or_else(reject)?),
        Mode::Typed => Validator::Typed(context.as_type().cloned().ok_or_else(reject)?),
        Mode::Subclass => Validator::Subclass(context.as_type().cloned().ok_or_else(reject)?),
        Mode::Enum => Validator::Enum(sequence(context).ok_or_else(reject)?),
        Mode::FloatRange => {
            let [low, high] = pair(context).ok_or_else(reject)?;
            let bound = |v: &Value| match v {
                Value::None => Some(None),
                Value::Float(f) => Some(Some(*f)),
                _ => None,
            };
            Validator::FloatRange {
                low: bound(low).ok_or_else(reject)?,
                high: bound(high).ok_or_else(reject)?,
            }
        }
        Mode::Range => {
            let [low, high] = pair(context).ok_or_else(reject)?;
            let bound = |v: &Value| match v {
                Value::None => Some(None),
                Value::Int(i) => Some(Some(*i)),
                _ => None,
            };
            Validator::Range {
                low: bound(low).ok_or_else(reject)?,
                high: bound(high).ok_or_else(reject)?,
            }
        }

        Mode::Coerced => {
            let [ty, coercer] = pair(context).ok_or_else(reject)?;
            match (ty, coercer) {
                (Value::Type(ty), Value::Callable(coercer)) if coercer.accepts(1) => {
                    Validator::Coerced {
                        ty: ty.clone(),
                        coercer: coercer.clone(),
                    }
                }
                _ => return Err(reject()),
            }
        }
        Mode::Delegate => Validator::Delegate(context.as_member().cloned().ok_or_else(reject)?),
        Mode::ObjectMethodOldNew => {
            Validator::ObjectMethodOldNew(method_name(context).ok_or_else(reject)?)
        }
        Mode::ObjectMethodNameOldNew => {
            Validator::ObjectMethodNameOldNew(method_name(context).ok_or_else(reject)?)
        }
        Mode::MemberMethodObjectOldNew => {
            Validator::MemberMethodObjectOldNew(method_name(context).ok_or_else(reject)?)
        }
    };
    Ok(validator)
}

/// Short description of a rejected payload for diagnostics.
fn describe(context: &Value) -> String {
    match context {
        Value::Tuple(items) => format!("{}-tuple {context}", items.len()),
        Value::None => "None".to_owned(),
        other => other.type_name(),
    }
}

/// `None` or a member.
fn optional_member(context: &Value) -> Option<Option<Arc<Member>>> {
    match context {
        Value::None => Some(None),
        Value::Member(member) => Some(Some(Arc::clone(member))),
        _ => None,
    }
}

/// Exactly a 2-tuple.
fn pair(context: &Value) -> Option<&[Value; 2]> {
    context.as_tuple()?.try_into().ok()
}

/// A type, or a non-empty tuple of types.
fn type_list(context: &Value) -> Option<Arc<[TypeHandle]>> {
    match context {
        Value::Type(ty) => Some(Arc::from([ty.clone()])),
        Value::Tuple(items) if !items.is_empty() => items
            .iter()
            .map(|item| item.as_type().cloned())
            .collect(),
        _ => None,
    }
}

/// A snapshot of a tuple, list, or the keys of a dict.
///
/// Text and byte strings are not accepted: membership is checked with value
/// equality, so their characters would never match a whole value. A dict
/// contributes its keys, as iterating it would.
fn sequence(context: &Value) -> Option<Arc<[Value]>> {
    match context {
        Value::Tuple(items) => Some(Arc::clone(items)),
        Value::List(list) => Some(list.to_vec().into()),
        Value::Dict(map) => Some(map.keys().cloned().collect()),
        _ => None,
    }
}

fn method_name(context: &Value) -> Option<Arc<str>> {
    match context {
        Value::Str(name) => Some(Arc::clone(name)),
        _ => None,
    }
}
