// ABOUTME: Integration tests for the tree validator
// ABOUTME: Validates structural acceptance and rejection over realistic catalog JSON
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ServiceFlow

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use serviceflow_server::tree::{samples, validate, Tree, TreeError, TreeRule};

/// The exact JSON shape clients submit: a flat id→node map.
fn parse_tree(json: &str) -> Tree {
    serde_json::from_str(json).unwrap()
}

#[test]
fn accepts_well_formed_client_tree() {
    let tree = parse_tree(
        r#"{
            "root": {
                "id": "root",
                "label": "Service Configuration",
                "description": "Configure your service options",
                "children": ["basic", "premium"]
            },
            "basic": {
                "id": "basic",
                "label": "Basic Plan",
                "description": "Standard service plan",
                "children": [],
                "data": {"unitOfMeasurement": ["month"], "description": "Basic service plan"}
            },
            "premium": {
                "id": "premium",
                "label": "Premium Plan",
                "description": "Premium service plan",
                "children": [],
                "data": {"unitOfMeasurement": ["month"], "description": "Premium service plan"}
            }
        }"#,
    );
    assert!(validate(&tree).is_ok());
}

#[test]
fn accepts_both_sample_catalogs() {
    assert!(validate(&samples::broadband_tree()).is_ok());
    assert!(validate(&samples::business_tree()).is_ok());
}

#[test]
fn rejects_tree_without_root() {
    let tree = parse_tree(
        r#"{
            "basic": {
                "id": "basic", "label": "Basic", "children": [],
                "data": {"unitOfMeasurement": ["month"]}
            }
        }"#,
    );
    assert_eq!(
        validate(&tree),
        Err(TreeError::MalformedTree {
            rule: TreeRule::MissingRoot,
            node_id: "root".into(),
        })
    );
}

#[test]
fn rejects_dangling_child_reference() {
    let tree = parse_tree(
        r#"{
            "root": {"id": "root", "label": "Root", "children": ["missing_child"]}
        }"#,
    );
    let err = validate(&tree).unwrap_err();
    assert_eq!(
        err,
        TreeError::MalformedTree {
            rule: TreeRule::UnresolvedChild,
            node_id: "missing_child".into(),
        }
    );
}

#[test]
fn rejects_two_node_cycle_without_looping() {
    // A lists B as a child and B lists A; the validator must reject,
    // never spin.
    let tree = parse_tree(
        r#"{
            "root": {"id": "root", "label": "Root", "children": ["a"]},
            "a": {"id": "a", "label": "A", "children": ["b"],
                  "data": {"unitOfMeasurement": ["month"]}},
            "b": {"id": "b", "label": "B", "children": ["a"],
                  "data": {"unitOfMeasurement": ["month"]}}
        }"#,
    );
    let err = validate(&tree).unwrap_err();
    assert!(matches!(
        err,
        TreeError::MalformedTree {
            rule: TreeRule::CycleDetected,
            ..
        }
    ));
}

#[test]
fn rejects_leaf_without_units() {
    let tree = parse_tree(
        r#"{
            "root": {"id": "root", "label": "Root", "children": ["dead_end"]},
            "dead_end": {"id": "dead_end", "label": "Dead End", "children": []}
        }"#,
    );
    assert_eq!(
        validate(&tree),
        Err(TreeError::MalformedTree {
            rule: TreeRule::UnpriceableLeaf,
            node_id: "dead_end".into(),
        })
    );
}

#[test]
fn diamond_sharing_is_not_a_cycle() {
    // Two branches converging on one child is acyclic and fine.
    let tree = parse_tree(
        r#"{
            "root": {"id": "root", "label": "Root", "children": ["a", "b"]},
            "a": {"id": "a", "label": "A", "children": ["shared"],
                  "data": {"unitOfMeasurement": ["month"]}},
            "b": {"id": "b", "label": "B", "children": ["shared"],
                  "data": {"unitOfMeasurement": ["month"]}},
            "shared": {"id": "shared", "label": "Shared", "children": [],
                       "data": {"unitOfMeasurement": ["GB"]}}
        }"#,
    );
    assert!(validate(&tree).is_ok());
}

#[test]
fn empty_map_is_missing_root() {
    let tree = parse_tree("{}");
    assert!(matches!(
        validate(&tree),
        Err(TreeError::MalformedTree {
            rule: TreeRule::MissingRoot,
            ..
        })
    ));
}
