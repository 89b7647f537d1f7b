//! Tuple, list and dict validation.
//!
//! Container validators never touch their input. When items need
//! validation, a new container is built from a snapshot of the input and
//! only handed out once every item passed. A failing item drops the partial
//! result with the error.

use std::sync::Arc;

use crate::foundation::{AtomRef, Dict, ValidationError, ValidationResult, Value};
use crate::list::ListFactory;
use crate::member::Member;
use crate::validators::scalar::type_fail;

/// Runs `item` over one element, as a fresh write with no old value.
fn revalidate(item: &Member, owner: &AtomRef, value: Value) -> ValidationResult<Value> {
    item.validate(owner, &Value::None, value)
}

/// Validates a tuple, rebuilding it when an item member is configured.
pub(crate) fn validate_tuple(
    item: Option<&Arc<Member>>,
    member: &Member,
    owner: &AtomRef,
    new: Value,
) -> ValidationResult<Value> {
    let Value::Tuple(ref items) = new else {
        return Err(type_fail(member, owner, &new, "tuple"));
    };
    let Some(item) = item else {
        return Ok(new);
    };
    let rebuilt = items
        .iter()
        .map(|value| revalidate(item, owner, value.clone()))
        .collect::<ValidationResult<Arc<[Value]>>>()?;
    Ok(Value::Tuple(rebuilt))
}

/// Validates a list, producing a new list from `factory`.
///
/// The result is always a fresh list, even when no item member is set.
pub(crate) fn validate_list(
    factory: &dyn ListFactory,
    item: Option<&Arc<Member>>,
    member: &Member,
    owner: &AtomRef,
    new: Value,
) -> ValidationResult<Value> {
    let Value::List(ref source) = new else {
        return Err(type_fail(member, owner, &new, "list"));
    };
    let snapshot = source.to_vec();
    let items = match item {
        Some(item) => snapshot
            .into_iter()
            .map(|value| revalidate(item, owner, value))
            .collect::<ValidationResult<Vec<_>>>()?,
        None => snapshot,
    };
    let list = factory.make(member, owner, item.cloned(), items.len());
    list.fill(items);
    Ok(Value::List(list))
}

/// Validates a dict, always producing a new dict in the input's order.
///
/// Keys holding a list are rejected, both on input and after the key
/// member ran.
pub(crate) fn validate_dict(
    key: Option<&Arc<Member>>,
    value: Option<&Arc<Member>>,
    member: &Member,
    owner: &AtomRef,
    new: Value,
) -> ValidationResult<Value> {
    let Value::Dict(ref source) = new else {
        return Err(type_fail(member, owner, &new, "dict"));
    };
    if let Some(bad) = source.keys().find(|k| !k.is_hashable()) {
        return Err(ValidationError::unhashable_key(
            member.name().to_owned(),
            bad.type_name(),
        ));
    }
    let rebuilt = match (key, value) {
        (None, None) => Dict::clone(source),
        (key, value) => {
            let mut rebuilt = Dict::with_capacity(source.len());
            for (k, v) in source.iter() {
                let k = match key {
                    Some(key) => revalidate(key, owner, k.clone())?,
                    None => k.clone(),
                };
                if !k.is_hashable() {
                    return Err(ValidationError::unhashable_key(
                        member.name().to_owned(),
                        k.type_name(),
                    ));
                }
                let v = match value {
                    Some(value) => revalidate(value, owner, v.clone())?,
                    None => v.clone(),
                };
                rebuilt.insert(k, v);
            }
            rebuilt
        }
    };
    Ok(Value::Dict(Arc::new(rebuilt)))
}
