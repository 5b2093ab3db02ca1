use super::*;

fn ids(v: &[&str]) -> Vec<SampleId> {
    v.iter().map(|s| s.to_string()).collect()
}

fn nested() -> SampleState {
    SampleState {
        grouping_steps: Vec::new(),
        root_group: SampleGroup::Internal {
            name: "ROOT".to_string(),
            groups: vec![
                SampleGroup::Leaf {
                    name: "A".to_string(),
                    samples: ids(&["s1", "s2"]),
                },
                SampleGroup::Internal {
                    name: "B".to_string(),
                    groups: vec![SampleGroup::Leaf {
                        name: "x".to_string(),
                        samples: ids(&["s3"]),
                    }],
                },
            ],
        },
    }
}

#[test]
fn flattened_paths_end_in_leaves() {
    let state = nested();
    let paths: Vec<Vec<&str>> = state
        .root_group
        .flattened_paths()
        .iter()
        .map(|p| p.iter().map(|g| g.name()).collect())
        .collect();
    assert_eq!(paths, vec![vec!["ROOT", "A"], vec!["ROOT", "B", "x"]]);
    let leaves: Vec<&str> = state.sample_groups().iter().map(|g| g.name()).collect();
    assert_eq!(leaves, vec!["A", "x"]);
}

#[test]
fn map_samples_leaves_original_untouched() {
    let before = nested();
    let after = before.map_samples(|s| s.iter().rev().cloned().collect());
    assert_eq!(before, nested());
    assert_eq!(after.sample_groups()[0].samples(), Some(&ids(&["s2", "s1"])[..]));
}

#[test]
fn group_leaves_turns_leaves_into_internal_groups() {
    let before = SampleState::new(ids(&["a", "b"]));
    let step = GroupingStep {
        name: AttributeIdentifier::new("T", "x"),
    };
    let after = before.group_leaves(step.clone(), |s| {
        s.iter().map(|id| (id.to_uppercase(), vec![id.clone()])).collect()
    });
    assert!(matches!(before.root_group, SampleGroup::Leaf { .. }));
    assert_eq!(after.grouping_steps, vec![step]);
    let SampleGroup::Internal { name, groups } = &after.root_group else {
        panic!("expected internal root");
    };
    assert_eq!(name, "ROOT");
    assert_eq!(groups[1].name(), "B");

    let json = serde_json::to_value(&after).unwrap();
    assert_eq!(
        json["groupingSteps"],
        serde_json::json!([{"name": {"type": "T", "specifier": "x"}}])
    );
}

#[test]
fn serializes_with_discriminating_fields() {
    let json = serde_json::to_value(nested()).unwrap();
    assert!(json["rootGroup"].get("groups").is_some());
    assert!(json["rootGroup"]["groups"][0].get("samples").is_some());
    assert!(json["rootGroup"]["groups"][0].get("groups").is_none());
    let back: SampleState = serde_json::from_value(json).unwrap();
    assert_eq!(back, nested());
}
