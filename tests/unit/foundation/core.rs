use super::*;
use serde_json::json;

fn row(v: Value) -> Row {
    v.as_object().unwrap().clone()
}

#[test]
fn group_keys_treat_signed_zero_as_equal() {
    assert_eq!(GroupKey::Num(0.0), GroupKey::Num(-0.0));
    assert_ne!(GroupKey::Num(1.0), GroupKey::Str("1".to_string()));
    assert_eq!(GroupKey::from_value(&json!("a")), GroupKey::from("a"));
    assert_eq!(GroupKey::from_value(&json!(null)), GroupKey::Null);
}

#[test]
fn group_key_display_matches_group_names() {
    assert_eq!(GroupKey::Num(3.0).to_string(), "3");
    assert_eq!(GroupKey::Num(2.5).to_string(), "2.5");
    assert_eq!(GroupKey::Bool(true).to_string(), "true");
    assert_eq!(GroupKey::Null.to_string(), "undefined");
}

#[test]
fn field_path_reads_nested_and_escaped_fields() {
    let r = row(json!({"a": {"b": 5}, "c.d": "x"}));
    assert_eq!(FieldPath::new("a.b").get(&r), Some(&json!(5)));
    assert_eq!(FieldPath::new("c\\.d").get(&r), Some(&json!("x")));
    assert_eq!(FieldPath::new("a.z").get(&r), None);
    assert_eq!(FieldPath::new("a.b").get_f64(&r), Some(5.0));
}

#[test]
fn compare_values_puts_undefined_last() {
    let one = json!(1);
    let two = json!(2);
    let s = json!("s");
    assert_eq!(compare_values(Some(&one), Some(&two)), Ordering::Less);
    assert_eq!(compare_values(Some(&two), Some(&s)), Ordering::Less);
    assert_eq!(compare_values(None, Some(&one)), Ordering::Greater);
    assert_eq!(compare_values(Some(&Value::Null), None), Ordering::Equal);
}

#[test]
fn undefined_detection() {
    assert!(is_undefined(None));
    assert!(is_undefined(Some(&Value::Null)));
    assert!(!is_undefined(Some(&json!(0))));
    assert!(!is_undefined(Some(&json!(""))));
    assert_eq!(as_number(Some(&json!("3"))), None);
    assert_eq!(as_number(Some(&json!(3))), Some(3.0));
}

#[test]
fn comparison_ops() {
    assert!(ComparisonOp::Lt.test(1.0, 2.0));
    assert!(!ComparisonOp::Lt.test(2.0, 2.0));
    assert!(ComparisonOp::Lte.test(2.0, 2.0));
    assert!(ComparisonOp::Eq.test(2.0, 2.0));
    assert!(ComparisonOp::Gte.test(3.0, 2.0));
    assert!(!ComparisonOp::Gt.test(2.0, 2.0));
    let op: ComparisonOp = serde_json::from_value(json!("gte")).unwrap();
    assert_eq!(op, ComparisonOp::Gte);
}
