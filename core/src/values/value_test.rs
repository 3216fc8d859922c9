//! Tests for RuntimeValue conversions, truthiness and display.

use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_display_integral_number_has_no_fraction() {
    assert_eq!(RuntimeValue::Number(100.0).to_string(), "100");
    assert_eq!(RuntimeValue::Number(-3.0).to_string(), "-3");
    assert_eq!(RuntimeValue::Number(-0.0).to_string(), "0");
}

#[test]
fn test_display_fractional_number() {
    assert_eq!(RuntimeValue::Number(3.14).to_string(), "3.14");
    assert_eq!(RuntimeValue::Number(0.1 + 0.2).to_string(), "0.30000000000000004");
}

#[test]
fn test_display_special_numbers() {
    assert_eq!(format_number(f64::INFINITY), "Infinity");
    assert_eq!(format_number(f64::NEG_INFINITY), "-Infinity");
    assert_eq!(format_number(f64::NAN), "NaN");
    assert_eq!(format_number(1e21), "1e+21");
    assert_eq!(format_number(1.5e-7), "1.5e-7");
}

#[test]
fn test_display_vector_and_list() {
    assert_eq!(RuntimeValue::Vec2(Vec2::new(1.0, 2.5)).to_string(), "(1, 2.5)");
    let list = RuntimeValue::from(vec![
        RuntimeValue::from(1),
        RuntimeValue::from("a"),
        RuntimeValue::from(true),
    ]);
    assert_eq!(list.to_string(), "1,a,true");
}

#[test]
fn test_as_number_coerces_bool() {
    assert_eq!(RuntimeValue::Bool(true).as_number(), Ok(1.0));
    assert_eq!(RuntimeValue::Bool(false).as_number(), Ok(0.0));
    assert_eq!(
        RuntimeValue::from("x").as_number(),
        Err(TypeMismatch {
            expected: ValueKind::Number,
            found: ValueKind::Str
        })
    );
}

#[test]
fn test_as_vec2_broadcasts_number() {
    assert_eq!(RuntimeValue::Number(2.0).as_vec2(), Ok(Vec2::splat(2.0)));
    assert!(RuntimeValue::Bool(true).as_vec2().is_err());
}

#[test]
fn test_as_list_and_as_str_are_strict() {
    assert!(RuntimeValue::Number(1.0).as_list().is_err());
    assert!(RuntimeValue::Number(1.0).as_str().is_err());
    let list = RuntimeValue::from(vec![RuntimeValue::from(1)]);
    assert_eq!(list.as_list().map(|l| l.len()), Ok(1));
}

#[test]
fn test_truthiness() {
    assert!(!RuntimeValue::Number(0.0).is_truthy());
    assert!(RuntimeValue::Number(-1.0).is_truthy());
    assert!(!RuntimeValue::from("").is_truthy());
    assert!(RuntimeValue::from("a").is_truthy());
    assert!(!RuntimeValue::Vec2(Vec2::ZERO).is_truthy());
    assert!(RuntimeValue::Vec2(Vec2::new(0.0, 1.0)).is_truthy());
    assert!(!RuntimeValue::List(Default::default()).is_truthy());
}

#[test]
fn test_type_mismatch_message() {
    let err = TypeMismatch {
        expected: ValueKind::Vec2,
        found: ValueKind::Bool,
    };
    assert_eq!(err.to_string(), "Expected vec2, got boolean");
}

#[test]
fn test_deserialize_untagged_literals() {
    let v: RuntimeValue = serde_json::from_str("3").unwrap();
    assert_eq!(v, RuntimeValue::Number(3.0));
    let v: RuntimeValue = serde_json::from_str("true").unwrap();
    assert_eq!(v, RuntimeValue::Bool(true));
    let v: RuntimeValue = serde_json::from_str(r#"{"x": 1, "y": -2}"#).unwrap();
    assert_eq!(v, RuntimeValue::Vec2(Vec2::new(1.0, -2.0)));
    let v: RuntimeValue = serde_json::from_str(r#"[1, "a"]"#).unwrap();
    assert_eq!(
        v,
        RuntimeValue::from(vec![RuntimeValue::from(1), RuntimeValue::from("a")])
    );
}

#[test]
fn test_vector_helpers() {
    let v = Vec2::new(3.0, 4.0);
    assert_eq!(v.length(), 5.0);
    assert_eq!(v.normalize(), Vec2::new(0.6, 0.8));
    assert_eq!(Vec2::ZERO.normalize(), Vec2::ZERO);
    assert_eq!(v.dot(Vec2::new(1.0, 1.0)), 7.0);
    assert_eq!(Vec2::ZERO.distance(v), 5.0);
}
