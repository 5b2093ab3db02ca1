use super::*;
use crate::flow::collector::CollectorParams;
use crate::foundation::core::Row;
use crate::sources::InlineSource;
use crate::transforms::{CloneTransform, FlattenSequenceParams, FlattenSequenceTransform};
use crate::transforms::{IdentifierParams, IdentifierTransform};
use serde_json::{Value, json};
use std::cell::RefCell;

fn rows(v: Value) -> Vec<Row> {
    v.as_array()
        .unwrap()
        .iter()
        .map(|r| r.as_object().unwrap().clone())
        .collect()
}

fn inline(v: Value) -> Box<dyn DataSource> {
    Box::new(InlineSource::from_rows(rows(v)))
}

fn collector() -> FlowNode {
    FlowNode::Collector(Collector::new(CollectorParams::default()))
}

fn collected(g: &FlowGraph, id: NodeId) -> Vec<Value> {
    g.collector(id)
        .unwrap()
        .data()
        .unwrap()
        .flat_data()
        .map(|d| Value::Object((**d).clone()))
        .collect()
}

#[derive(Debug)]
struct SharedSource(Rc<RefCell<Vec<Row>>>);

impl DataSource for SharedSource {
    fn kind(&self) -> &'static str {
        "shared"
    }

    fn load(&mut self) -> GentrackResult<Vec<Row>> {
        Ok(self.0.borrow().clone())
    }
}

#[test]
fn fan_out_reaches_every_child_in_order() {
    let mut g = FlowGraph::new();
    let src = g.add_source(inline(json!([{"sequence": "AC"}]))).unwrap();
    let flat = g
        .add_child(
            src,
            FlowNode::transform(FlattenSequenceTransform::new(
                FlattenSequenceParams::default(),
            )),
        )
        .unwrap();
    let a = g.add_child(flat, collector()).unwrap();
    let b = g.add_child(flat, collector()).unwrap();
    g.load(src).unwrap();

    let expected = vec![
        json!({"sequence": "A", "pos": 0}),
        json!({"sequence": "C", "pos": 1}),
    ];
    assert_eq!(collected(&g, a), expected);
    assert_eq!(collected(&g, b), expected);
    assert_eq!(g.children(flat), &[a, b]);
    assert_eq!(g.parent(a), Some(flat));
}

#[test]
fn modification_is_not_visible_on_sibling_branch() {
    let mut g = FlowGraph::new();
    let src = g.add_source(inline(json!([{"x": 1}, {"x": 2}]))).unwrap();
    let plain = g.add_child(src, collector()).unwrap();
    let copy = g.add_child(src, FlowNode::transform(CloneTransform)).unwrap();
    let id = g
        .add_child(
            copy,
            FlowNode::transform(IdentifierTransform::new(IdentifierParams::default())),
        )
        .unwrap();
    let tagged = g.add_child(id, collector()).unwrap();
    g.load(src).unwrap();

    assert_eq!(collected(&g, plain), vec![json!({"x": 1}), json!({"x": 2})]);
    assert_eq!(
        collected(&g, tagged),
        vec![json!({"x": 1, "_uniqueId": 0}), json!({"x": 2, "_uniqueId": 1})]
    );
    assert_eq!(g.behavior(id), Some(Behavior::Modifies));
    assert_eq!(g.lineage(tagged), vec!["inline", "clone", "identifier", "collect"]);
}

#[test]
fn reloading_reflects_latest_data() {
    let shared = Rc::new(RefCell::new(rows(json!([{"v": 1}]))));
    let mut g = FlowGraph::new();
    let src = g.add_source(Box::new(SharedSource(Rc::clone(&shared)))).unwrap();
    let c = g.add_child(src, collector()).unwrap();

    g.load(src).unwrap();
    assert_eq!(collected(&g, c), vec![json!({"v": 1})]);

    *shared.borrow_mut() = rows(json!([{"v": 2}, {"v": 3}]));
    g.load_all().unwrap();
    assert_eq!(collected(&g, c), vec![json!({"v": 2}), json!({"v": 3})]);
}

#[test]
fn collectors_are_terminal_and_sources_are_roots() {
    let mut g = FlowGraph::new();
    let src = g.add_source(inline(json!([]))).unwrap();
    let c = g.add_child(src, collector()).unwrap();
    assert!(g.add_child(c, FlowNode::transform(CloneTransform)).is_err());
    assert!(g.add_child(src, FlowNode::Source(inline(json!([])))).is_err());
    assert!(g.load(c).is_err());
    assert_eq!(g.sources(), vec![src]);
    assert_eq!(g.collectors(), vec![c]);
}

#[test]
fn elides_clone_only_on_unshared_path() {
    let mut g = FlowGraph::new();
    let src = g.add_source(inline(json!([{"x": 1}]))).unwrap();
    let copy = g.add_child(src, FlowNode::transform(CloneTransform)).unwrap();
    let id = g
        .add_child(
            copy,
            FlowNode::transform(IdentifierTransform::new(IdentifierParams::default())),
        )
        .unwrap();
    let c = g.add_child(id, collector()).unwrap();

    let mut shared = FlowGraph::new();
    let s2 = shared.add_source(inline(json!([{"x": 1}]))).unwrap();
    shared.add_child(s2, collector()).unwrap();
    let copy2 = shared.add_child(s2, FlowNode::transform(CloneTransform)).unwrap();
    shared
        .add_child(
            copy2,
            FlowNode::transform(IdentifierTransform::new(IdentifierParams::default())),
        )
        .unwrap();

    assert_eq!(g.elide_redundant_clones(), 1);
    assert_eq!(g.children(src), &[id]);
    assert_eq!(g.parent(id), Some(src));
    assert!(g.node(copy).is_none());
    g.load(src).unwrap();
    assert_eq!(collected(&g, c), vec![json!({"x": 1, "_uniqueId": 0})]);

    assert_eq!(shared.elide_redundant_clones(), 0);
    assert!(shared.node(copy2).is_some());
}
