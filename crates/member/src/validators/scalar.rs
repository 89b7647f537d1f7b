//! Exact-kind and promoting checks for the primitive kinds.
//!
//! Exact checks return the candidate unchanged. Promoting checks return the
//! candidate unchanged when it already has the target kind, and a freshly
//! built value of the target kind otherwise.

use crate::foundation::{AtomRef, ValidationError, ValidationResult, Value};
use crate::member::Member;

/// Smallest float that no longer fits in an `i64` (2^63).
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

/// Builds the standard type-mismatch failure for a write.
pub(crate) fn type_fail(
    member: &Member,
    owner: &AtomRef,
    new: &Value,
    expected: impl Into<std::borrow::Cow<'static, str>>,
) -> ValidationError {
    ValidationError::type_mismatch(
        member.name().to_owned(),
        owner.atom_type().name().to_owned(),
        expected,
        new.type_name(),
    )
}

pub(crate) fn validate_bool(
    member: &Member,
    owner: &AtomRef,
    new: Value,
) -> ValidationResult<Value> {
    match new {
        Value::Bool(_) => Ok(new),
        _ => Err(type_fail(member, owner, &new, "bool")),
    }
}

pub(crate) fn validate_int(
    member: &Member,
    owner: &AtomRef,
    new: Value,
) -> ValidationResult<Value> {
    match new {
        Value::Int(_) => Ok(new),
        _ => Err(type_fail(member, owner, &new, "int")),
    }
}

/// Accepts ints, and floats truncated toward zero.
pub(crate) fn validate_int_promote(
    member: &Member,
    owner: &AtomRef,
    new: Value,
) -> ValidationResult<Value> {
    match new {
        Value::Int(_) => Ok(new),
        Value::Float(f) => float_to_int(member, f).map(Value::Int),
        _ => Err(type_fail(member, owner, &new, "int")),
    }
}

fn float_to_int(member: &Member, f: f64) -> ValidationResult<i64> {
    if !f.is_finite() {
        return Err(ValidationError::conversion(
            member.name().to_owned(),
            "float",
            "int",
            format!("{f} has no integer value"),
        ));
    }
    let truncated = f.trunc();
    if !(-I64_BOUND..I64_BOUND).contains(&truncated) {
        return Err(ValidationError::conversion(
            member.name().to_owned(),
            "float",
            "int",
            format!("{f} is out of range"),
        ));
    }
    #[allow(clippy::cast_possible_truncation)]
    Ok(truncated as i64)
}

pub(crate) fn validate_float(
    member: &Member,
    owner: &AtomRef,
    new: Value,
) -> ValidationResult<Value> {
    match new {
        Value::Float(_) => Ok(new),
        _ => Err(type_fail(member, owner, &new, "float")),
    }
}

/// Accepts floats, and ints converted to the nearest float.
pub(crate) fn validate_float_promote(
    member: &Member,
    owner: &AtomRef,
    new: Value,
) -> ValidationResult<Value> {
    match new {
        Value::Float(_) => Ok(new),
        #[allow(clippy::cast_precision_loss)]
        Value::Int(i) => Ok(Value::Float(i as f64)),
        _ => Err(type_fail(member, owner, &new, "float")),
    }
}

pub(crate) fn validate_bytes(
    member: &Member,
    owner: &AtomRef,
    new: Value,
) -> ValidationResult<Value> {
    match new {
        Value::Bytes(_) => Ok(new),
        _ => Err(type_fail(member, owner, &new, "bytes")),
    }
}

/// Accepts byte strings, and text encoded as UTF-8.
pub(crate) fn validate_bytes_promote(
    member: &Member,
    owner: &AtomRef,
    new: Value,
) -> ValidationResult<Value> {
    match new {
        Value::Bytes(_) => Ok(new),
        Value::Str(ref s) => Ok(Value::bytes(s.as_bytes())),
        _ => Err(type_fail(member, owner, &new, "bytes")),
    }
}

pub(crate) fn validate_str(
    member: &Member,
    owner: &AtomRef,
    new: Value,
) -> ValidationResult<Value> {
    match new {
        Value::Str(_) => Ok(new),
        _ => Err(type_fail(member, owner, &new, "str")),
    }
}

/// Accepts text, and byte strings decoded as UTF-8.
///
/// The whole byte string is decoded, embedded NUL bytes included.
pub(crate) fn validate_str_promote(
    member: &Member,
    owner: &AtomRef,
    new: Value,
) -> ValidationResult<Value> {
    match new {
        Value::Str(_) => Ok(new),
        Value::Bytes(ref b) => std::str::from_utf8(b).map(Value::str).map_err(|e| {
            ValidationError::conversion(member.name().to_owned(), "bytes", "str", e.to_string())
        }),
        _ => Err(type_fail(member, owner, &new, "str")),
    }
}
