use super::*;
use serde_json::json;

fn parse(v: Value) -> VizSpec {
    serde_json::from_value(v).unwrap()
}

#[test]
fn parses_nested_views_and_genome() {
    let spec = parse(json!({
        "genome": {"name": "toy", "chromosomes": [{"name": "chr1", "size": 10}]},
        "data": {"values": [{"x": 1}]},
        "layer": [
            {"name": "points", "mark": "point", "facet": "sample"},
            {"mark": "rect", "sort": {"field": "x"}}
        ]
    }));
    assert_eq!(spec.genome.as_ref().unwrap().total_size(), 10);
    assert_eq!(spec.view.kind().unwrap(), ViewKind::Layer);
    assert_eq!(spec.view.layer[0].facet, vec!["sample".to_string()]);

    let names: Vec<String> = spec.views().into_iter().map(|(n, _)| n).collect();
    assert_eq!(names, vec!["root", "points", "root_layer1"]);
    spec.validate().unwrap();
}

#[test]
fn duplicate_names_are_rejected() {
    let spec = parse(json!({
        "concat": [{"name": "a", "mark": "point"}, {"name": "a", "mark": "point"}]
    }));
    assert!(matches!(spec.validate(), Err(GentrackError::Validation(_))));
}

#[test]
fn view_kind_must_be_unambiguous() {
    let spec = parse(json!({"mark": "point", "layer": [{"mark": "point"}]}));
    assert!(matches!(spec.view.kind(), Err(GentrackError::Config { .. })));
    let spec = parse(json!({"name": "empty"}));
    assert!(spec.validate().is_err());
}

#[test]
fn facet_requires_a_mark() {
    let spec = parse(json!({"facet": "s", "layer": [{"mark": "point"}]}));
    assert!(spec.validate().is_err());
}

#[test]
fn from_json_str_reports_parse_errors() {
    assert!(VizSpec::from_json_str("{").is_err());
    let spec = VizSpec::from_json_str(r#"{"name": "v", "mark": "point"}"#).unwrap();
    assert_eq!(spec.root_name(), "v");
}
