//! Instance, exact-type, subclass, enum, callable and range constraints.

use crate::foundation::{AtomRef, TypeHandle, ValidationError, ValidationResult, Value};
use crate::member::Member;
use crate::validators::scalar::type_fail;

/// `None`, or an instance of any of `types`.
pub(crate) fn validate_instance(
    types: &[TypeHandle],
    member: &Member,
    new: Value,
) -> ValidationResult<Value> {
    if new.is_none() || types.iter().any(|ty| new.is_instance_of(ty)) {
        return Ok(new);
    }
    let expected = match types {
        [single] => format!("'{single}'"),
        many => {
            let names: Vec<_> = many.iter().map(|ty| format!("'{ty}'")).collect();
            format!("one of ({})", names.join(", "))
        }
    };
    Err(ValidationError::invalid_instance(
        member.name().to_owned(),
        expected,
        new.type_name(),
    ))
}

/// `None`, or a value whose concrete type is exactly `ty`.
pub(crate) fn validate_typed(
    ty: &TypeHandle,
    member: &Member,
    owner: &AtomRef,
    new: Value,
) -> ValidationResult<Value> {
    if new.is_none() || new.type_handle() == *ty {
        return Ok(new);
    }
    Err(type_fail(member, owner, &new, ty.name().to_owned()))
}

/// A type deriving from `ty` (or `ty` itself).
pub(crate) fn validate_subclass(
    ty: &TypeHandle,
    member: &Member,
    new: Value,
) -> ValidationResult<Value> {
    match new.as_type() {
        Some(candidate) if candidate.is_subclass_of(ty) => Ok(new),
        _ => Err(ValidationError::invalid_subclass(
            member.name().to_owned(),
            ty.name().to_owned(),
            new.to_string(),
        )),
    }
}

pub(crate) fn validate_enum(
    items: &[Value],
    member: &Member,
    new: Value,
) -> ValidationResult<Value> {
    if items.contains(&new) {
        return Ok(new);
    }
    Err(ValidationError::invalid_enum(
        member.name().to_owned(),
        new.to_string(),
    ))
}

pub(crate) fn validate_callable(
    member: &Member,
    owner: &AtomRef,
    new: Value,
) -> ValidationResult<Value> {
    if new.is_none() || new.is_callable() {
        return Ok(new);
    }
    Err(type_fail(member, owner, &new, "callable"))
}

/// A float within the optional inclusive bounds. NaN passes every bound.
pub(crate) fn validate_float_range(
    low: Option<f64>,
    high: Option<f64>,
    member: &Member,
    owner: &AtomRef,
    new: Value,
) -> ValidationResult<Value> {
    let Value::Float(value) = new else {
        return Err(type_fail(member, owner, &new, "float"));
    };
    if let Some(low) = low
        && value < low
    {
        return Err(ValidationError::too_small(member.name().to_owned(), low, value));
    }
    if let Some(high) = high
        && value > high
    {
        return Err(ValidationError::too_large(member.name().to_owned(), high, value));
    }
    Ok(new)
}

/// An int within the optional inclusive bounds.
pub(crate) fn validate_range(
    low: Option<i64>,
    high: Option<i64>,
    member: &Member,
    owner: &AtomRef,
    new: Value,
) -> ValidationResult<Value> {
    let Value::Int(value) = new else {
        return Err(type_fail(member, owner, &new, "int"));
    };
    if let Some(low) = low
        && value < low
    {
        return Err(ValidationError::too_small(member.name().to_owned(), low, value));
    }
    if let Some(high) = high
        && value > high
    {
        return Err(ValidationError::too_large(member.name().to_owned(), high, value));
    }
    Ok(new)
}
