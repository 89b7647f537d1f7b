//! Declaration-time checks: bad contexts never produce a usable member.

use nebula_member::prelude::*;
use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::support::declare;

fn int_type() -> Value {
    Value::from(builtins().int.clone())
}

fn unary() -> Value {
    Value::from(Callable::new("to_int", 1, |args| Ok(args[0].clone())))
}

#[rstest]
#[case::tuple_with_int(Mode::Tuple, Value::Int(1))]
#[case::list_with_str(Mode::List, Value::str("item"))]
#[case::container_list_with_type(Mode::ContainerList, int_type())]
#[case::dict_not_a_pair(Mode::Dict, Value::None)]
#[case::dict_three_items(Mode::Dict, Value::tuple([Value::None, Value::None, Value::None]))]
#[case::dict_int_key(Mode::Dict, Value::pair(1, Value::None))]
#[case::instance_with_str(Mode::Instance, Value::str("int"))]
#[case::typed_with_none(Mode::Typed, Value::None)]
#[case::subclass_with_int(Mode::Subclass, Value::Int(3))]
#[case::enum_with_int(Mode::Enum, Value::Int(3))]
#[case::float_range_int_bound(Mode::FloatRange, Value::pair(0, 1.0))]
#[case::float_range_list(Mode::FloatRange, Value::list([0.0, 1.0]))]
#[case::range_float_bound(Mode::Range, Value::pair(0, 10.5))]
#[case::range_str_bound(Mode::Range, Value::pair("0", 10))]
#[case::coerced_no_callable(Mode::Coerced, Value::pair(int_type(), 1))]
#[case::coerced_no_type(Mode::Coerced, Value::pair(1, unary()))]
#[case::delegate_with_none(Mode::Delegate, Value::None)]
#[case::object_method_int(Mode::ObjectMethodOldNew, Value::Int(1))]
#[case::object_method_name_none(Mode::ObjectMethodNameOldNew, Value::None)]
#[case::member_method_bytes(Mode::MemberMethodObjectOldNew, Value::bytes(b"m"))]
fn test_invalid_context_is_rejected(#[case] mode: Mode, #[case] context: Value) {
    let err = Member::new("attr", mode, context).unwrap_err();
    match err {
        ConfigurationError::InvalidContext {
            mode: rejected,
            expected,
            ..
        } => {
            assert_eq!(rejected, mode);
            assert_eq!(expected, mode.expected_context());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[rstest]
#[case::tuple_none(Mode::Tuple, Value::None)]
#[case::dict_both_none(Mode::Dict, Value::pair(Value::None, Value::None))]
#[case::instance_type(Mode::Instance, int_type())]
#[case::enum_tuple(Mode::Enum, Value::tuple(["a", "b", "c"]))]
#[case::float_range_open(Mode::FloatRange, Value::pair(Value::None, Value::None))]
#[case::range_low_only(Mode::Range, Value::pair(0, Value::None))]
#[case::coerced(Mode::Coerced, Value::pair(int_type(), unary()))]
#[case::callback(Mode::ObjectMethodOldNew, Value::str("_validate"))]
fn test_valid_context_is_accepted(#[case] mode: Mode, #[case] context: Value) {
    let member = Member::new("attr", mode, context.clone()).unwrap();
    assert_eq!(member.mode(), mode);
    assert_eq!(member.context(), &context);
}

#[test]
fn test_nested_members_as_context() {
    let item = declare("item", Mode::Int, Value::None);
    let tuple = declare("pairs", Mode::Tuple, item.clone());
    let delegate = declare("alias", Mode::Delegate, item);
    assert_eq!(tuple.validator().kind(), "tuple");
    assert_eq!(delegate.validator().kind(), "delegate");
}

#[test]
fn test_legacy_aliases_share_validators() {
    for (legacy, modern) in [
        (Mode::Long, Mode::Int),
        (Mode::LongPromote, Mode::IntPromote),
        (Mode::Unicode, Mode::Str),
        (Mode::UnicodePromote, Mode::StrPromote),
    ] {
        let a = declare("a", legacy, Value::None);
        let b = declare("b", modern, Value::None);
        assert_eq!(a.validator().kind(), b.validator().kind());
    }
}

#[test]
fn test_modes_load_from_configuration() {
    let modes: Vec<Mode> =
        serde_json::from_str(r#"["int_promote", "container_list", "float_range"]"#).unwrap();
    assert_eq!(modes, vec![Mode::IntPromote, Mode::ContainerList, Mode::FloatRange]);
    assert_eq!("delegate".parse::<Mode>().unwrap(), Mode::Delegate);
    assert_eq!(Mode::try_from(26).unwrap(), Mode::Delegate);
}

#[test]
fn test_unknown_modes_are_configuration_errors() {
    assert_eq!(Mode::try_from(200).unwrap_err(), ConfigurationError::UnknownMode(200));
    assert_eq!(
        "ranged".parse::<Mode>().unwrap_err().to_string(),
        "unknown validation mode 'ranged'"
    );
    assert!(serde_json::from_str::<Mode>(r#""ranged""#).is_err());
}
