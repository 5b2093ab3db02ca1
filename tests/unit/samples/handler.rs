use super::*;
use crate::data::domain::DataType;
use crate::foundation::core::ComparisonOp;
use crate::samples::operations::NominalFilterAction;
use serde_json::json;
use std::collections::HashMap;
use std::rc::Rc;

fn ids(v: &[&str]) -> Vec<SampleId> {
    v.iter().map(|s| s.to_string()).collect()
}

fn attr(name: &str) -> AttributeIdentifier {
    AttributeIdentifier::new("SAMPLE_ATTRIBUTE", name)
}

fn handler(samples: &[&str], columns: Value) -> SampleHandler {
    let columns: Rc<HashMap<String, HashMap<String, Value>>> =
        Rc::new(serde_json::from_value(columns).unwrap());
    let mut h = SampleHandler::new();
    h.set_samples(ids(samples));
    h.add_attribute_resolver("SAMPLE_ATTRIBUTE", move |id| {
        let name = id.specifier.as_str()?;
        let column = columns.get(name)?.clone();
        let data_type = if column.values().all(|v| v.is_number() || v.is_null()) {
            DataType::Quantitative
        } else {
            DataType::Nominal
        };
        Some(AttributeInfo::new(name, data_type, move |s| {
            column.get(s).cloned().unwrap_or(Value::Null)
        }))
    });
    h
}

fn leaf_samples(h: &SampleHandler) -> Vec<Vec<SampleId>> {
    h.sample_groups()
        .iter()
        .map(|g| g.samples().unwrap_or_default().to_vec())
        .collect()
}

#[test]
fn sort_then_undo_restores_order() {
    let mut h = handler(
        &["s1", "s2", "s3"],
        json!({"age": {"s1": 40, "s2": 20, "s3": 30}}),
    );
    let before = leaf_samples(&h);
    h.dispatch(SampleAction::SortBy {
        attribute: attr("age"),
    })
    .unwrap();
    assert_eq!(leaf_samples(&h), vec![ids(&["s2", "s3", "s1"])]);
    assert!(h.can_undo());

    h.dispatch(SampleAction::Undo).unwrap();
    assert_eq!(leaf_samples(&h), before);
    assert!(!h.can_undo());
}

#[test]
fn group_by_nominal_keeps_first_seen_order() {
    let mut h = handler(
        &["s1", "s2", "s3", "s4", "s5", "s6"],
        json!({"t": {"s1": "A", "s2": "B", "s3": "A", "s4": "C", "s5": "B", "s6": "A"}}),
    );
    h.dispatch(SampleAction::GroupByNominal { attribute: attr("t") })
        .unwrap();

    let names: Vec<&str> = h.sample_groups().iter().map(|g| g.name()).collect();
    assert_eq!(names, vec!["A", "B", "C"]);
    assert_eq!(
        leaf_samples(&h),
        vec![ids(&["s1", "s3", "s6"]), ids(&["s2", "s5"]), ids(&["s4"])]
    );
    assert_eq!(h.state().grouping_steps.len(), 1);
    assert_eq!(h.state().grouping_steps[0].name, attr("t"));

    let initial = &h.provenance().history()[0].state;
    assert!(matches!(initial.root_group, SampleGroup::Leaf { .. }));
}

#[test]
fn group_to_quartiles_uses_strict_thresholds() {
    let mut h = handler(
        &["s1", "s2", "s3", "s4", "s5", "s6", "s7", "s8", "s9"],
        json!({"v": {
            "s1": 1, "s2": 2, "s3": 3, "s4": 4, "s5": 5,
            "s6": 6, "s7": 7, "s8": 8, "s9": null
        }}),
    );
    h.dispatch(SampleAction::GroupToQuartiles { attribute: attr("v") })
        .unwrap();
    let groups: Vec<(&str, Vec<SampleId>)> = h
        .sample_groups()
        .iter()
        .map(|g| (g.name(), g.samples().unwrap_or_default().to_vec()))
        .collect();
    assert_eq!(
        groups,
        vec![
            ("0", ids(&["s1", "s2"])),
            ("1", ids(&["s3", "s4"])),
            ("2", ids(&["s5", "s6"])),
            ("3", ids(&["s7", "s8"])),
            ("undefined", ids(&["s9"])),
        ]
    );
}

#[test]
fn nested_grouping_applies_to_every_leaf() {
    let mut h = handler(
        &["a", "b", "c", "d"],
        json!({
            "t": {"a": "x", "b": "y", "c": "x", "d": "y"},
            "v": {"a": 2, "b": 1, "c": 1, "d": 2}
        }),
    );
    h.dispatch(SampleAction::GroupByNominal { attribute: attr("t") })
        .unwrap();
    h.dispatch(SampleAction::SortBy { attribute: attr("v") })
        .unwrap();
    assert_eq!(leaf_samples(&h), vec![ids(&["c", "a"]), ids(&["b", "d"])]);

    h.dispatch(SampleAction::GroupByNominal { attribute: attr("v") })
        .unwrap();
    let paths: Vec<Vec<&str>> = h
        .flattened_group_hierarchy()
        .iter()
        .map(|p| p.iter().map(|g| g.name()).collect())
        .collect();
    assert_eq!(
        paths,
        vec![
            vec!["ROOT", "x", "1"],
            vec!["ROOT", "x", "2"],
            vec!["ROOT", "y", "1"],
            vec!["ROOT", "y", "2"],
        ]
    );
    assert_eq!(h.state().grouping_steps.len(), 2);
}

#[test]
fn filters_and_retain_first() {
    let mut h = handler(
        &["a", "b", "c", "d"],
        json!({
            "v": {"a": 1, "b": 5, "c": null, "d": 9},
            "t": {"a": "x", "b": "x", "c": "y", "d": "z"}
        }),
    );
    h.dispatch(SampleAction::RemoveUndefined { attribute: attr("v") })
        .unwrap();
    assert_eq!(leaf_samples(&h), vec![ids(&["a", "b", "d"])]);

    h.dispatch(SampleAction::FilterByQuantitative {
        attribute: attr("v"),
        operator: ComparisonOp::Gt,
        operand: 1.0,
    })
    .unwrap();
    assert_eq!(leaf_samples(&h), vec![ids(&["b", "d"])]);

    h.dispatch(SampleAction::FilterByNominal {
        attribute: attr("t"),
        action: NominalFilterAction::Remove,
        values: vec![json!("z")],
    })
    .unwrap();
    assert_eq!(leaf_samples(&h), vec![ids(&["b"])]);

    h.dispatch(SampleAction::Undo).unwrap();
    h.dispatch(SampleAction::Undo).unwrap();
    h.dispatch(SampleAction::RetainFirstOfEach { attribute: attr("t") })
        .unwrap();
    assert_eq!(leaf_samples(&h), vec![ids(&["a", "d"])]);
    assert_eq!(h.provenance().len(), 3);
}

#[test]
fn nominal_filter_matches_integral_floats() {
    let mut h = handler(&["a", "b"], json!({"n": {"a": 1, "b": 2}}));
    h.dispatch(SampleAction::FilterByNominal {
        attribute: attr("n"),
        action: NominalFilterAction::Retain,
        values: vec![json!(1.0)],
    })
    .unwrap();
    assert_eq!(leaf_samples(&h), vec![ids(&["a"])]);
}

#[test]
fn unknown_action_leaves_history_unchanged() {
    let mut h = handler(&["a"], json!({}));
    let err = h.dispatch_json(&json!({"type": "SHUFFLE"})).unwrap_err();
    assert!(matches!(err, GentrackError::UnknownAction(v) if v["type"] == json!("SHUFFLE")));
    assert!(h.dispatch_json(&json!({"attribute": {"type": "X"}})).is_err());
    assert_eq!(h.provenance().len(), 1);
}

#[test]
fn resolver_failures_leave_history_unchanged() {
    let mut h = handler(&["a", "b"], json!({"v": {"a": 1, "b": 2}}));
    let err = h
        .dispatch(SampleAction::SortBy {
            attribute: AttributeIdentifier::new("NO_SUCH_TYPE", "v"),
        })
        .unwrap_err();
    assert!(matches!(err, GentrackError::Attribute { .. }));

    let err = h
        .dispatch(SampleAction::GroupByNominal {
            attribute: attr("missing"),
        })
        .unwrap_err();
    assert!(matches!(
        err,
        GentrackError::Attribute { attribute, .. } if attribute["specifier"] == json!("missing")
    ));
    assert_eq!(h.provenance().len(), 1);
    assert!(!h.can_undo());
}

#[test]
fn dispatch_json_decodes_actions() {
    let mut h = handler(&["a", "b"], json!({"v": {"a": 2, "b": 1}}));
    h.dispatch_json(&json!({
        "type": "SORT_BY",
        "attribute": {"type": "SAMPLE_ATTRIBUTE", "specifier": "v"}
    }))
    .unwrap();
    assert_eq!(leaf_samples(&h), vec![ids(&["b", "a"])]);
    assert_eq!(
        h.provenance().action_history()[0].kind(),
        "SORT_BY"
    );

    let malformed = json!({
        "type": "FILTER_BY_QUANTITATIVE",
        "attribute": {"type": "SAMPLE_ATTRIBUTE"}
    });
    assert!(matches!(
        h.dispatch_json(&malformed),
        Err(GentrackError::Config { .. })
    ));
    assert_eq!(h.provenance().len(), 2);
}

#[test]
fn push_after_undo_discards_redo_branch() {
    let mut h = handler(&["a", "b"], json!({"v": {"a": 2, "b": 1}}));
    h.dispatch(SampleAction::SortBy { attribute: attr("v") }).unwrap();
    h.dispatch(SampleAction::RemoveUndefined { attribute: attr("v") })
        .unwrap();
    h.dispatch(SampleAction::Undo).unwrap();
    h.dispatch(SampleAction::Undo).unwrap();
    h.dispatch(SampleAction::GroupByNominal { attribute: attr("v") })
        .unwrap();
    let kinds: Vec<&str> = h
        .provenance()
        .history()
        .iter()
        .filter_map(|e| e.action.as_ref().map(SampleAction::kind))
        .collect();
    assert_eq!(kinds, vec!["GROUP_BY_NOMINAL"]);
}

#[test]
fn set_samples_resets_history() {
    let mut h = handler(&["a", "b"], json!({"v": {"a": 2, "b": 1}}));
    h.dispatch(SampleAction::SortBy { attribute: attr("v") }).unwrap();
    h.set_samples(ids(&["z"]));
    assert_eq!(leaf_samples(&h), vec![ids(&["z"])]);
    assert_eq!(h.sample_groups()[0].name(), "ROOT");
    assert!(!h.can_undo());
}
