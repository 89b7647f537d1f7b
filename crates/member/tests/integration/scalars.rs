//! Exact-kind and promoting scalar modes.

use nebula_member::prelude::*;
use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::support::{declare, owner, write};

#[rstest]
#[case::bool(Mode::Bool, Value::Bool(false))]
#[case::int(Mode::Int, Value::Int(-4))]
#[case::long(Mode::Long, Value::Int(i64::MAX))]
#[case::float(Mode::Float, Value::Float(0.25))]
#[case::bytes(Mode::Bytes, Value::bytes(b"\x00\x01"))]
#[case::str(Mode::Str, Value::str("text"))]
#[case::unicode(Mode::Unicode, Value::str("πλ"))]
fn test_exact_kind_is_accepted_unchanged(#[case] mode: Mode, #[case] value: Value) {
    let member = declare("attr", mode, Value::None);
    let accepted = write(&member, &owner(), value.clone()).unwrap();
    assert!(accepted.is_same(&value));
}

#[rstest]
#[case::bool_from_int(Mode::Bool, Value::Int(1), "bool", "int")]
#[case::int_from_bool(Mode::Int, Value::Bool(true), "int", "bool")]
#[case::int_from_float(Mode::Int, Value::Float(1.0), "int", "float")]
#[case::float_from_int(Mode::Float, Value::Int(1), "float", "int")]
#[case::bytes_from_str(Mode::Bytes, Value::str("b"), "bytes", "str")]
#[case::str_from_bytes(Mode::Str, Value::bytes(b"s"), "str", "bytes")]
#[case::int_promote_from_str(Mode::IntPromote, Value::str("1"), "int", "str")]
#[case::float_promote_from_none(Mode::FloatPromote, Value::None, "float", "NoneType")]
fn test_wrong_kind_is_a_type_mismatch(
    #[case] mode: Mode,
    #[case] value: Value,
    #[case] expected: &str,
    #[case] actual: &str,
) {
    let member = declare("attr", mode, Value::None);
    let err = write(&member, &owner(), value).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Type);
    assert_eq!(err.code, "type_mismatch");
    assert_eq!(err.member.as_deref(), Some("attr"));
    assert_eq!(err.param("owner"), Some("Model"));
    assert_eq!(err.param("expected"), Some(expected));
    assert_eq!(err.param("actual"), Some(actual));
}

#[rstest]
#[case::int_from_float(Mode::IntPromote, Value::Float(-7.9), Value::Int(-7))]
#[case::long_from_float(Mode::LongPromote, Value::Float(3.2), Value::Int(3))]
#[case::float_from_int(Mode::FloatPromote, Value::Int(3), Value::Float(3.0))]
#[case::bytes_from_str(Mode::BytesPromote, Value::str("ok"), Value::bytes(b"ok"))]
#[case::str_from_bytes(Mode::StrPromote, Value::bytes(b"ok"), Value::str("ok"))]
#[case::unicode_from_bytes(Mode::UnicodePromote, Value::bytes("ü".as_bytes()), Value::str("ü"))]
fn test_promotion_converts(#[case] mode: Mode, #[case] value: Value, #[case] expected: Value) {
    let member = declare("attr", mode, Value::None);
    assert_eq!(write(&member, &owner(), value).unwrap(), expected);
}

#[test]
fn test_promotion_is_identity_on_target_kind() {
    let owner = owner();
    let member = declare("ratio", Mode::FloatPromote, Value::None);
    let x = Value::Float(1.5);
    let accepted = write(&member, &owner, x.clone()).unwrap();
    assert!(accepted.is_same(&x));

    let text = declare("label", Mode::StrPromote, Value::None);
    let s = Value::str("label");
    assert!(write(&text, &owner, s.clone()).unwrap().is_same(&s));
}

#[test]
fn test_str_promote_keeps_embedded_nul() {
    let member = declare("raw", Mode::StrPromote, Value::None);
    let accepted = write(&member, &owner(), Value::bytes(b"head\0tail")).unwrap();
    assert_eq!(accepted.as_str(), Some("head\0tail"));
}

#[test]
fn test_int_promote_of_nan_is_a_conversion_error() {
    let member = declare("count", Mode::IntPromote, Value::None);
    let err = write(&member, &owner(), f64::NAN).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conversion);
    assert_eq!(err.param("to"), Some("int"));
}

#[test]
fn test_no_op_accepts_anything() {
    let member = declare("any", Mode::NoOp, Value::None);
    let owner = owner();
    for value in [Value::None, Value::Int(1), Value::list([1]), Value::Object(owner.clone())] {
        assert_eq!(write(&member, &owner, value.clone()).unwrap(), value);
    }
}
