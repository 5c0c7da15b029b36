// ABOUTME: Integration tests for the tree path resolver
// ABOUTME: Valid walks, broken edges, and unknown nodes over the sample catalog
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ServiceFlow

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use serviceflow_server::tree::{resolve_path, samples, TreeError};

fn path(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|id| (*id).to_owned()).collect()
}

#[test]
fn resolves_full_walk_to_fiber_100() {
    let tree = samples::broadband_tree();
    let node = resolve_path(&tree, &path(&["root", "wired", "fiber", "fiber_100"])).unwrap();
    assert_eq!(node.id, "fiber_100");
    assert_eq!(node.label, "100 Mbps Fiber");
}

#[test]
fn resolves_wireless_walks() {
    let tree = samples::broadband_tree();
    let node = resolve_path(
        &tree,
        &path(&["root", "wireless", "mobile", "mobile_5g"]),
    )
    .unwrap();
    assert_eq!(node.id, "mobile_5g");
}

#[test]
fn claimed_shortcut_breaks_at_first_bad_edge() {
    let tree = samples::broadband_tree();
    let err = resolve_path(&tree, &path(&["root", "mobile", "fiber_100"])).unwrap_err();
    // mobile hangs off wireless, so the walk already breaks at root.
    assert_eq!(
        err,
        TreeError::DisconnectedPath {
            from: "root".into(),
            to: "mobile".into(),
        }
    );
}

#[test]
fn cross_branch_hop_is_disconnected() {
    let tree = samples::broadband_tree();
    let err = resolve_path(
        &tree,
        &path(&["root", "wireless", "mobile", "fiber_100"]),
    )
    .unwrap_err();
    assert_eq!(
        err,
        TreeError::DisconnectedPath {
            from: "mobile".into(),
            to: "fiber_100".into(),
        }
    );
}

#[test]
fn unknown_node_in_path_is_reported_by_name() {
    let tree = samples::broadband_tree();
    let err = resolve_path(&tree, &path(&["root", "wired", "carrier_pigeon"])).unwrap_err();
    assert_eq!(
        err,
        TreeError::UnknownNode {
            node_id: "carrier_pigeon".into()
        }
    );
}

#[test]
fn path_not_anchored_at_root_is_rejected() {
    let tree = samples::broadband_tree();
    assert!(resolve_path(&tree, &path(&["wired", "fiber"])).is_err());
    assert!(resolve_path(&tree, &[]).is_err());
}
