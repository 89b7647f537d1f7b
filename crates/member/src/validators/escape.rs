//! Validation handed to user code: coercers, delegates and callbacks.
//!
//! Failures raised by user code travel back unchanged. Callbacks are
//! resolved by name on every write, so rebinding a method takes effect on
//! the next write.

use std::sync::Arc;

use crate::foundation::{AtomRef, Callable, TypeHandle, ValidationError, ValidationResult, Value};
use crate::member::Member;

/// Keeps instances of `ty`; anything else goes through `coercer`.
pub(crate) fn validate_coerced(
    ty: &TypeHandle,
    coercer: &Callable,
    member: &Member,
    new: Value,
) -> ValidationResult<Value> {
    if new.is_instance_of(ty) {
        return Ok(new);
    }
    let coerced = coercer.call(std::slice::from_ref(&new))?;
    if coerced.is_instance_of(ty) {
        return Ok(coerced);
    }
    Err(ValidationError::coercion(
        member.name().to_owned(),
        ty.name().to_owned(),
        coerced.type_name(),
    ))
}

pub(crate) fn validate_delegate(
    target: &Arc<Member>,
    owner: &AtomRef,
    old: &Value,
    new: Value,
) -> ValidationResult<Value> {
    target.validate(owner, old, new)
}

/// Calls `owner.<method>(old, new)`.
pub(crate) fn validate_object_method_old_new(
    method: &str,
    owner: &AtomRef,
    old: &Value,
    new: Value,
) -> ValidationResult<Value> {
    owner.call_method(method, &[old.clone(), new])
}

/// Calls `owner.<method>(name, old, new)`.
pub(crate) fn validate_object_method_name_old_new(
    method: &str,
    member: &Member,
    owner: &AtomRef,
    old: &Value,
    new: Value,
) -> ValidationResult<Value> {
    owner.call_method(method, &[Value::str(member.name()), old.clone(), new])
}

/// Calls `member.<method>(owner, old, new)`.
pub(crate) fn validate_member_method_object_old_new(
    method: &str,
    member: &Member,
    owner: &AtomRef,
    old: &Value,
    new: Value,
) -> ValidationResult<Value> {
    member.call_method(method, owner, old, new)
}
