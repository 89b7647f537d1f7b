//! Change records: field shape, mapping form and JSON export.

use nebula_member::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::support::{declare, owner};

fn keys(record: &ChangeRecord) -> Vec<String> {
    record
        .to_value()
        .as_dict()
        .unwrap()
        .keys()
        .map(|k| k.as_str().unwrap().to_owned())
        .collect()
}

#[test]
fn test_update_record_fields() {
    let owner = owner();
    let member = declare("x", Mode::Int, Value::None);
    let record = ChangeRecord::update(&owner, &member, Value::Int(1), Value::Int(2));

    assert_eq!(keys(&record), ["type", "object", "name", "oldvalue", "value"]);
    let value = record.to_value();
    let map = value.as_dict().unwrap();
    assert_eq!(map[&Value::str("type")], Value::str("update"));
    assert_eq!(map[&Value::str("object")], Value::Object(owner.clone()));
    assert_eq!(map[&Value::str("name")], Value::str("x"));
    assert_eq!(map[&Value::str("oldvalue")], Value::Int(1));
    assert_eq!(map[&Value::str("value")], Value::Int(2));
}

#[test]
fn test_create_record_has_no_old_value() {
    let owner = owner();
    let member = declare("x", Mode::Int, Value::None);
    let record = ChangeRecord::create(&owner, &member, Value::Int(5));

    assert_eq!(keys(&record), ["type", "object", "name", "value"]);
    let value = record.to_value();
    let map = value.as_dict().unwrap();
    assert_eq!(map[&Value::str("type")], Value::str("create"));
    assert_eq!(map[&Value::str("value")], Value::Int(5));
}

#[test]
fn test_every_kind() {
    let owner = owner();
    let member = declare("x", Mode::NoOp, Value::None);
    let cases = [
        (ChangeRecord::create(&owner, &member, Value::Int(1)), "create", false),
        (ChangeRecord::update(&owner, &member, Value::Int(1), Value::Int(2)), "update", true),
        (ChangeRecord::delete(&owner, &member, Value::Int(1)), "delete", false),
        (ChangeRecord::event(&owner, &member, Value::Int(1)), "event", false),
        (ChangeRecord::property(&owner, &member, Value::None, Value::Int(2)), "property", true),
    ];
    for (record, kind, has_old) in cases {
        assert_eq!(record.kind().as_str(), kind);
        assert_eq!(record.old_value().is_some(), has_old);
        assert_eq!(record.name(), "x");
    }
}

#[test]
fn test_records_serialize_to_json() {
    let owner = owner();
    let member = declare("x", Mode::Int, Value::None);
    let record = ChangeRecord::create(&owner, &member, Value::list([1, 2]));
    assert_eq!(
        serde_json::to_value(&record).unwrap(),
        json!({"type": "create", "object": "Model", "name": "x", "value": [1, 2]})
    );
}

#[test]
fn test_validate_change_feeds_observers() {
    let owner = owner();
    let member = declare("level", Mode::Range, Value::pair(0, 10));
    let mut observed = Vec::new();

    let mut stored: Option<Value> = None;
    for input in [3, 7, 42] {
        match member.validate_change(&owner, stored.as_ref(), Value::Int(input)) {
            Ok((accepted, record)) => {
                stored = Some(accepted);
                observed.push(record);
            }
            Err(err) => assert_eq!(err.code, "too_large"),
        }
    }

    assert_eq!(observed.len(), 2);
    assert_eq!(observed[0].kind(), ChangeKind::Create);
    assert_eq!(observed[1].kind(), ChangeKind::Update);
    assert_eq!(observed[1].old_value(), Some(&Value::Int(3)));
    assert_eq!(stored, Some(Value::Int(7)));
}
