//! Tests for PathLabeler

use pathtree::domain::{InputRecord, PathLabeler, RecordId, TreeBuilder};
use pathtree::util::testing;

#[ctor::ctor]
fn init() {
    testing::init_test_setup();
}

fn rec(id: i64, parent: Option<i64>, title: &str) -> InputRecord {
    InputRecord::new(id, parent.map(RecordId::Int), title)
}

fn labels(records: Vec<InputRecord>) -> Vec<String> {
    let forest = TreeBuilder::new().build(records).unwrap();
    PathLabeler::default()
        .label_paths(&forest)
        .into_iter()
        .map(|n| n.label)
        .collect()
}

#[test]
fn given_root_and_child_when_labeling_then_joins_titles() {
    let result = labels(vec![rec(1, None, "Africa"), rec(2, Some(1), "Nigeria")]);

    assert_eq!(result, ["Africa", "Africa > Nigeria"]);
}

#[test]
fn given_forest_when_labeling_then_emits_pre_order() {
    // Africa
    // ├── Nigeria
    // │   └── Kano
    // └── Chad
    // Asia
    let records = vec![
        rec(1, None, "Africa"),
        rec(2, Some(1), "Nigeria"),
        rec(3, None, "Asia"),
        rec(4, Some(1), "Chad"),
        rec(5, Some(2), "Kano"),
    ];

    let result = labels(records);

    assert_eq!(
        result,
        [
            "Africa",
            "Africa > Nigeria",
            "Africa > Nigeria > Kano",
            "Africa > Chad",
            "Asia",
        ]
    );
}

#[test]
fn given_empty_forest_when_labeling_then_returns_empty() {
    assert!(labels(Vec::new()).is_empty());
}

#[test]
fn given_empty_title_when_labeling_then_keeps_empty_segment() {
    let result = labels(vec![rec(1, None, "World"), rec(2, Some(1), ""), rec(3, Some(2), "X")]);

    assert_eq!(result, ["World", "World > ", "World >  > X"]);
}

#[test]
fn given_any_node_when_labeling_single_then_matches_flattened_label() {
    let records = vec![
        rec(1, None, "Africa"),
        rec(2, Some(1), "Nigeria"),
        rec(3, Some(2), "Kano"),
        rec(4, Some(3), "Dala"),
        rec(5, Some(99), "Orphan"),
    ];
    let forest = TreeBuilder::new().build(records).unwrap();
    let labeler = PathLabeler::default();

    for node in labeler.label_paths(&forest) {
        assert_eq!(labeler.label(&forest, node.index), node.label);
    }
}

#[test]
fn given_nested_nodes_when_labeling_then_reports_depth() {
    let forest = TreeBuilder::new()
        .build(vec![rec(1, None, "a"), rec(2, Some(1), "b"), rec(3, Some(2), "c")])
        .unwrap();

    let depths: Vec<usize> = PathLabeler::default()
        .label_paths(&forest)
        .iter()
        .map(|n| n.depth)
        .collect();

    assert_eq!(depths, [0, 1, 2]);
}

#[test]
fn given_every_node_when_labeling_then_each_appears_once() {
    let records: Vec<InputRecord> = (1..=50)
        .map(|i| rec(i, if i > 1 { Some(i / 2) } else { None }, &format!("n{}", i)))
        .collect();
    let forest = TreeBuilder::new().build(records).unwrap();

    let labeled = PathLabeler::default().label_paths(&forest);

    assert_eq!(labeled.len(), 50);
    let mut ids: Vec<&RecordId> = labeled.iter().map(|n| &n.record.id).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 50);
}
