//! Coercers, delegation and the callback modes.

use std::sync::{Arc, Mutex};

use nebula_member::prelude::*;
use pretty_assertions::assert_eq;

use crate::support::{Widget, declare, owner, write};

fn str_to_int() -> Callable {
    Callable::new("str_to_int", 1, |args| match &args[0] {
        Value::Str(s) => s
            .trim()
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|e| ValidationError::user("parse_int", e.to_string())),
        other => Ok(other.clone()),
    })
}

fn coerced_int() -> Arc<Member> {
    let int = builtins().int.clone();
    declare("count", Mode::Coerced, Value::pair(int, str_to_int()))
}

#[test]
fn test_coerced_converts_text() {
    assert_eq!(write(&coerced_int(), &owner(), "42").unwrap(), Value::Int(42));
}

#[test]
fn test_coerced_keeps_instances_without_calling() {
    let int = builtins().int.clone();
    let calls = Arc::new(Mutex::new(0));
    let counter = Arc::clone(&calls);
    let coercer = Callable::new("count_calls", 1, move |args| {
        *counter.lock().unwrap() += 1;
        Ok(args[0].clone())
    });
    let member = declare("count", Mode::Coerced, Value::pair(int, coercer));

    assert_eq!(write(&member, &owner(), 7).unwrap(), Value::Int(7));
    assert_eq!(*calls.lock().unwrap(), 0);
}

#[test]
fn test_coerced_propagates_coercer_failure() {
    let err = write(&coerced_int(), &owner(), "x").unwrap_err();
    assert_eq!(err.kind, ErrorKind::User);
    assert_eq!(err.code, "parse_int");
    assert_eq!(err.member, None);
}

#[test]
fn test_coerced_rejects_result_of_wrong_type() {
    let err = write(&coerced_int(), &owner(), 2.5).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Value);
    assert_eq!(err.code, "coercion");
    assert_eq!(err.param("expected"), Some("int"));
}

#[test]
fn test_delegate_reproduces_target_error() {
    let target = declare("bounded", Mode::Range, Value::pair(0, 10));
    let alias = declare("alias", Mode::Delegate, target.clone());
    let owner = owner();

    assert_eq!(write(&alias, &owner, 5).unwrap(), Value::Int(5));
    let direct = write(&target, &owner, 11).unwrap_err();
    let delegated = write(&alias, &owner, 11).unwrap_err();
    assert_eq!(delegated, direct);
}

#[test]
fn test_delegate_passes_old_value_through() {
    let target = Member::builder("target")
        .mode(Mode::MemberMethodObjectOldNew)
        .context("keep_old")
        .method("keep_old", |_, _, old, _| Ok(old.clone()))
        .build()
        .unwrap();
    let alias = declare("alias", Mode::Delegate, target);
    let out = alias.validate(&owner(), &Value::Int(1), Value::Int(2)).unwrap();
    assert_eq!(out, Value::Int(1));
}

#[test]
fn test_object_method_old_new() {
    let widget = Widget::new("Model");
    widget.bind("_validate_size", |args| match args {
        [Value::Int(old), Value::Int(new)] if new >= old => Ok(Value::Int(*new)),
        [_, Value::Int(_)] => Err(ValidationError::user("shrink", "size may only grow")),
        _ => Err(ValidationError::user("args", "unexpected arguments")),
    });
    let owner: AtomRef = widget;
    let member = declare("size", Mode::ObjectMethodOldNew, "_validate_size");

    assert_eq!(member.validate(&owner, &Value::Int(1), Value::Int(3)).unwrap(), Value::Int(3));
    let err = member.validate(&owner, &Value::Int(3), Value::Int(1)).unwrap_err();
    assert_eq!(err.code, "shrink");
}

#[test]
fn test_object_method_name_old_new_receives_member_name() {
    let widget = Widget::new("Model");
    widget.bind("_validate", |args| match args {
        [Value::Str(name), _, new] => Ok(Value::str(format!("{name}={new}"))),
        _ => Err(ValidationError::user("args", "unexpected arguments")),
    });
    let owner: AtomRef = widget;
    let member = declare("title", Mode::ObjectMethodNameOldNew, "_validate");

    let out = write(&member, &owner, 7).unwrap();
    assert_eq!(out, Value::str("title=7"));
}

#[test]
fn test_member_method_object_old_new_receives_owner() {
    let member = Member::builder("owner_type")
        .mode(Mode::MemberMethodObjectOldNew)
        .context("describe")
        .method("describe", |_, owner, _, _| Ok(Value::str(owner.atom_type().name())))
        .build()
        .unwrap();
    assert_eq!(write(&member, &owner(), Value::None).unwrap(), Value::str("Model"));
}

#[test]
fn test_missing_callback_is_an_attribute_error() {
    let owner = owner();
    for mode in [Mode::ObjectMethodOldNew, Mode::ObjectMethodNameOldNew] {
        let member = declare("x", mode, "_nowhere");
        let err = write(&member, &owner, 1).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Attribute);
        assert_eq!(err.param("method"), Some("_nowhere"));
    }
    let member = declare("x", Mode::MemberMethodObjectOldNew, "_nowhere");
    assert_eq!(write(&member, &owner, 1).unwrap_err().kind, ErrorKind::Attribute);
}

#[test]
fn test_rebinding_owner_method_takes_effect_on_next_write() {
    let widget = Widget::new("Model");
    widget.bind("_v", |args| Ok(args[1].clone()));
    let owner: AtomRef = widget.clone();
    let member = declare("x", Mode::ObjectMethodOldNew, "_v");

    assert_eq!(write(&member, &owner, 1).unwrap(), Value::Int(1));
    widget.bind("_v", |_| Ok(Value::Int(0)));
    assert_eq!(write(&member, &owner, 1).unwrap(), Value::Int(0));
}

#[test]
fn test_callback_can_reenter_dispatch() {
    let widget = Widget::new("Model");
    let inner = declare("inner", Mode::Range, Value::pair(0, 100));
    let weak = Arc::downgrade(&widget);
    let nested = Arc::clone(&inner);
    widget.bind("_validate", move |args| {
        let Some(owner) = weak.upgrade() else {
            return Err(ValidationError::user("gone", "owner dropped"));
        };
        let owner: AtomRef = owner;
        let doubled = match &args[1] {
            Value::Int(i) => Value::Int(i * 2),
            other => other.clone(),
        };
        nested.validate(&owner, &Value::None, doubled)
    });
    let owner: AtomRef = widget;
    let outer = declare("outer", Mode::ObjectMethodOldNew, "_validate");

    assert_eq!(write(&outer, &owner, 21).unwrap(), Value::Int(42));
    assert_eq!(write(&outer, &owner, 60).unwrap_err().code, "too_large");
}
