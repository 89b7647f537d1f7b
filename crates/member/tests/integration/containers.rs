//! Tuple, list and dict modes, including recursion into item members.

use nebula_member::prelude::*;
use pretty_assertions::assert_eq;

use crate::support::{declare, owner, write};

#[test]
fn test_tuple_items_are_revalidated_into_a_new_tuple() {
    let item = declare("coord", Mode::FloatPromote, Value::None);
    let member = declare("point", Mode::Tuple, item);
    let input = Value::tuple([Value::Int(1), Value::Float(2.5)]);

    let accepted = write(&member, &owner(), input.clone()).unwrap();
    assert_eq!(accepted, Value::tuple([1.0, 2.5]));
    assert!(!accepted.is_same(&input));
}

#[test]
fn test_tuple_without_item_member_is_passed_through() {
    let member = declare("point", Mode::Tuple, Value::None);
    let input = Value::tuple(["a", "b"]);
    assert!(write(&member, &owner(), input.clone()).unwrap().is_same(&input));
}

#[test]
fn test_tuple_failure_leaves_input_untouched() {
    let item = declare("coord", Mode::Int, Value::None);
    let member = declare("point", Mode::Tuple, item);
    let input = Value::tuple([Value::Int(1), Value::str("two")]);
    let before = input.clone();

    let err = write(&member, &owner(), input.clone()).unwrap_err();
    assert_eq!(err.param("actual"), Some("str"));
    assert_eq!(input, before);
}

#[test]
fn test_nested_tuples_recurse() {
    let leaf = declare("leaf", Mode::Range, Value::pair(0, 9));
    let row = declare("row", Mode::Tuple, leaf);
    let grid = declare("grid", Mode::Tuple, row);
    let owner = owner();

    let ok = Value::tuple([Value::tuple([1, 2]), Value::tuple([3, 4])]);
    assert_eq!(write(&grid, &owner, ok.clone()).unwrap(), ok);

    let bad = Value::tuple([Value::tuple([1, 2]), Value::tuple([3, 40])]);
    assert_eq!(write(&grid, &owner, bad).unwrap_err().code, "too_large");
}

#[test]
fn test_list_result_is_a_fresh_list() {
    let member = declare("tags", Mode::List, Value::None);
    let input = Value::list(["a", "b"]);

    let accepted = write(&member, &owner(), input.clone()).unwrap();
    assert_eq!(accepted, input);
    let (out, src) = (accepted.as_list().unwrap(), input.as_list().unwrap());
    assert!(!out.ptr_eq(src));

    src.push(Value::str("c")).unwrap();
    assert_eq!(out.len(), 2);
}

#[test]
fn test_list_failure_leaves_input_untouched() {
    let item = declare("tag", Mode::Str, Value::None);
    let member = declare("tags", Mode::ContainerList, item);
    let input = Value::list([Value::str("a"), Value::Int(2)]);

    assert!(write(&member, &owner(), input.clone()).is_err());
    assert_eq!(input, Value::list([Value::str("a"), Value::Int(2)]));
}

#[test]
fn test_list_items_are_promoted() {
    let item = declare("n", Mode::IntPromote, Value::None);
    let member = declare("ns", Mode::List, item);
    let accepted = write(&member, &owner(), Value::list([1.9, 2.1])).unwrap();
    assert_eq!(accepted, Value::list([1, 2]));
}

#[test]
fn test_dict_with_key_and_value_members() {
    let key = declare("key", Mode::Str, Value::None);
    let value = declare("value", Mode::FloatPromote, Value::None);
    let member = declare("weights", Mode::Dict, Value::pair(key, value));
    let input = Value::dict([("b", Value::Int(2)), ("a", Value::Float(0.5))]);

    let accepted = write(&member, &owner(), input).unwrap();
    let map = accepted.as_dict().unwrap();
    let entries: Vec<_> = map.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
    assert_eq!(
        entries,
        vec![(Value::str("b"), Value::Float(2.0)), (Value::str("a"), Value::Float(0.5))]
    );
}

#[test]
fn test_dict_only_value_member_copies_keys() {
    let value = declare("value", Mode::Int, Value::None);
    let member = declare("counts", Mode::Dict, Value::pair(Value::None, value));
    let owner = owner();

    let accepted = write(&member, &owner, Value::dict([(Value::Int(1), 1)])).unwrap();
    assert_eq!(accepted, Value::dict([(Value::Int(1), 1)]));

    let err = write(&member, &owner, Value::dict([("x", "y")])).unwrap_err();
    assert_eq!(err.member.as_deref(), Some("value"));
}

#[test]
fn test_dict_only_key_member_copies_values() {
    let key = declare("key", Mode::Int, Value::None);
    let member = declare("index", Mode::Dict, Value::pair(key, Value::None));
    let owner = owner();

    assert!(write(&member, &owner, Value::dict([(1, "anything")])).is_ok());
    assert!(write(&member, &owner, Value::dict([("1", "anything")])).is_err());
}

#[test]
fn test_dict_without_members_is_a_shallow_copy() {
    let member = declare("extra", Mode::Dict, Value::pair(Value::None, Value::None));
    let inner = Value::list([1]);
    let input = Value::dict([("inner", inner.clone())]);

    let accepted = write(&member, &owner(), input.clone()).unwrap();
    assert_eq!(accepted, input);
    assert!(!accepted.is_same(&input));
    let copied = &accepted.as_dict().unwrap()[&Value::str("inner")];
    assert!(copied.is_same(&inner));
}

#[test]
fn test_containers_reject_other_kinds() {
    let owner = owner();
    for (mode, context, value) in [
        (Mode::Tuple, Value::None, Value::list([1])),
        (Mode::List, Value::None, Value::tuple([1])),
        (Mode::ContainerList, Value::None, Value::None),
        (Mode::Dict, Value::pair(Value::None, Value::None), Value::list([1])),
    ] {
        let member = declare("c", mode, context);
        let err = write(&member, &owner, value).unwrap_err();
        assert_eq!(err.code, "type_mismatch");
    }
}

#[test]
fn test_dict_rejects_list_keys() {
    let owner = owner();
    let plain = declare("extra", Mode::Dict, Value::pair(Value::None, Value::None));
    let err = write(&plain, &owner, Value::dict([(Value::list([1]), 1)])).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Type);
    assert_eq!(err.code, "unhashable_key");
    assert_eq!(err.param("actual"), Some("list"));

    let nested = Value::tuple([Value::Int(1), Value::list([2])]);
    assert!(write(&plain, &owner, Value::dict([(nested, 1)])).is_err());
    assert!(write(&plain, &owner, Value::dict([(Value::tuple([1, 2]), 1)])).is_ok());
}

#[test]
fn test_dict_rejects_list_produced_by_key_member() {
    let wrap = Callable::new("wrap", 1, |args| Ok(Value::list([args[0].clone()])));
    let key = declare("key", Mode::Coerced, Value::pair(builtins().list.clone(), wrap));
    let member = declare("index", Mode::Dict, Value::pair(key, Value::None));

    let err = write(&member, &owner(), Value::dict([("a", 1)])).unwrap_err();
    assert_eq!(err.code, "unhashable_key");
    assert_eq!(err.member.as_deref(), Some("index"));
}
