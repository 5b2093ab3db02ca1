use super::*;
use serde_json::json;
use std::rc::Rc;

fn datum(v: serde_json::Value) -> Datum {
    Rc::new(v.as_object().unwrap().clone())
}

fn feed(c: &mut Collector, rows: serde_json::Value) {
    c.reset();
    for r in rows.as_array().unwrap() {
        c.handle(datum(r.clone()));
    }
    c.complete();
}

#[test]
fn data_before_completion_is_an_error() {
    let c = Collector::new(CollectorParams::default());
    assert!(!c.is_complete());
    assert!(c.data().is_err());
}

#[test]
fn ungrouped_collector_yields_single_leaf() {
    let mut c = Collector::new(CollectorParams::default());
    feed(&mut c, json!([{"x": 2}, {"x": 1}]));
    let g = c.data().unwrap();
    assert!(g.is_leaf());
    assert_eq!(g.key(), &GroupKey::Null);
    assert_eq!(g.len(), 2);
}

#[test]
fn groups_by_fields_in_first_seen_order() {
    let mut c = Collector::new(CollectorParams {
        groupby: vec!["sample".to_string(), "chrom".to_string()],
        sort: None,
    });
    feed(
        &mut c,
        json!([
            {"sample": "s2", "chrom": "chr1", "v": 1},
            {"sample": "s1", "chrom": "chr1", "v": 2},
            {"sample": "s2", "chrom": "chr2", "v": 3},
            {"sample": "s2", "chrom": "chr1", "v": 4}
        ]),
    );
    let Group::Internal(root) = c.data().unwrap() else {
        panic!("expected internal root");
    };
    let samples: Vec<_> = root.subgroups.iter().map(|g| g.key().clone()).collect();
    assert_eq!(samples, vec![GroupKey::from("s2"), GroupKey::from("s1")]);

    let Group::Internal(s2) = &root.subgroups[0] else {
        panic!("expected internal s2");
    };
    assert_eq!(s2.subgroups[0].key(), &GroupKey::from("chr1"));
    let vs: Vec<_> = s2.subgroups[0].flat_data().map(|d| d["v"].clone()).collect();
    assert_eq!(vs, vec![json!(1), json!(4)]);
}

#[test]
fn missing_groupby_field_keys_as_null() {
    let mut c = Collector::new(CollectorParams {
        groupby: vec!["sample".to_string()],
        sort: None,
    });
    feed(&mut c, json!([{"sample": "a"}, {}]));
    let Group::Internal(root) = c.data().unwrap() else {
        panic!("expected internal root");
    };
    assert_eq!(root.subgroups[1].key(), &GroupKey::Null);
}

#[test]
fn sorts_each_group_with_comparator() {
    let mut c = Collector::new(CollectorParams {
        groupby: vec!["g".to_string()],
        sort: Some(CompareParams::field("start")),
    });
    feed(
        &mut c,
        json!([
            {"g": "a", "start": 5},
            {"g": "b", "start": 3},
            {"g": "a", "start": 1},
            {"g": "a"},
            {"g": "b", "start": 2}
        ]),
    );
    let starts: Vec<_> = c
        .data()
        .unwrap()
        .flat_data()
        .map(|d| d.get("start").cloned())
        .collect();
    assert_eq!(
        starts,
        vec![
            Some(json!(1)),
            Some(json!(5)),
            None,
            Some(json!(2)),
            Some(json!(3))
        ]
    );
}

#[test]
fn descending_multi_field_comparator() {
    let params: CollectorParams = serde_json::from_value(json!({
        "sort": {"field": ["a", "b"], "order": ["descending", "ascending"]}
    }))
    .unwrap();
    let mut c = Collector::new(params);
    feed(
        &mut c,
        json!([{"a": 1, "b": 2}, {"a": 2, "b": 9}, {"a": 1, "b": 1}]),
    );
    let pairs: Vec<_> = c
        .data()
        .unwrap()
        .flat_data()
        .map(|d| (d["a"].clone(), d["b"].clone()))
        .collect();
    assert_eq!(
        pairs,
        vec![
            (json!(2), json!(9)),
            (json!(1), json!(1)),
            (json!(1), json!(2))
        ]
    );
}

#[test]
fn reset_discards_previous_cycle() {
    let mut c = Collector::new(CollectorParams::default());
    feed(&mut c, json!([{"x": 1}, {"x": 2}]));
    feed(&mut c, json!([{"x": 3}]));
    let xs: Vec<_> = c.data().unwrap().flat_data().map(|d| d["x"].clone()).collect();
    assert_eq!(xs, vec![json!(3)]);
}

#[test]
fn single_string_sort_field_deserializes() {
    let params: CollectorParams =
        serde_json::from_value(json!({"sort": {"field": "start"}})).unwrap();
    assert_eq!(params.sort, Some(CompareParams::field("start")));
}
