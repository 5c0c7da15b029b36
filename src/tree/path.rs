// ABOUTME: Path resolution over a configuration tree
// ABOUTME: Verifies a claimed selection path is a valid root-to-node walk
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ServiceFlow

use super::{Tree, TreeError, TreeNode, ROOT_ID};

/// Verify that `path` is a valid root-to-node walk through `tree` and
/// return the terminal node.
///
/// The path must be non-empty, start at `root`, name only existing
/// nodes, and each consecutive pair must be a parent→child edge. Used to
/// check that a consumer's submitted path is consistent with the tree
/// topology before a configuration snapshot is persisted.
///
/// # Errors
///
/// - [`TreeError::UnknownNode`] when a path element is not a key in the
///   tree (checked before edge membership);
/// - [`TreeError::DisconnectedPath`] at the first pair that is not a
///   valid edge, reporting the break point. An empty path, or a path
///   that does not start at `root`, is reported as the missing edge into
///   its first element.
pub fn resolve_path<'a>(tree: &'a Tree, path: &[String]) -> Result<&'a TreeNode, TreeError> {
    let Some(first) = path.first() else {
        return Err(TreeError::DisconnectedPath {
            from: String::new(),
            to: ROOT_ID.to_owned(),
        });
    };

    if first != ROOT_ID {
        return Err(TreeError::DisconnectedPath {
            from: String::new(),
            to: first.clone(),
        });
    }

    let mut current = tree.get(first).ok_or_else(|| TreeError::UnknownNode {
        node_id: first.clone(),
    })?;

    for next_id in &path[1..] {
        let next = tree.get(next_id).ok_or_else(|| TreeError::UnknownNode {
            node_id: next_id.clone(),
        })?;
        if !current.children.iter().any(|child| child == next_id) {
            return Err(TreeError::DisconnectedPath {
                from: current.id.clone(),
                to: next_id.clone(),
            });
        }
        current = next;
    }

    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::samples;

    fn path(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|id| (*id).to_owned()).collect()
    }

    #[test]
    fn valid_walk_resolves_to_terminal_node() {
        let tree = samples::broadband_tree();
        let node = resolve_path(&tree, &path(&["root", "wired", "fiber", "fiber_100"])).unwrap();
        assert_eq!(node.id, "fiber_100");
    }

    #[test]
    fn root_alone_is_a_valid_path() {
        let tree = samples::broadband_tree();
        let node = resolve_path(&tree, &path(&["root"])).unwrap();
        assert_eq!(node.id, "root");
    }

    #[test]
    fn broken_edge_reports_the_break_point() {
        let tree = samples::broadband_tree();
        // wireless -> mobile is a real edge; wifi_basic hangs off wifi,
        // not mobile, so the walk breaks at the last pair.
        let err = resolve_path(
            &tree,
            &path(&["root", "wireless", "mobile", "wifi_basic"]),
        )
        .unwrap_err();
        assert_eq!(
            err,
            TreeError::DisconnectedPath {
                from: "mobile".into(),
                to: "wifi_basic".into(),
            }
        );
    }

    #[test]
    fn first_invalid_edge_wins() {
        let tree = samples::broadband_tree();
        // root's children are wired and wireless; mobile hangs off
        // wireless, so the claimed shortcut breaks at the first pair even
        // though fiber_100 is not a child of mobile either.
        let err = resolve_path(&tree, &path(&["root", "mobile", "fiber_100"])).unwrap_err();
        assert_eq!(
            err,
            TreeError::DisconnectedPath {
                from: "root".into(),
                to: "mobile".into(),
            }
        );
    }

    #[test]
    fn unknown_path_element_is_reported_as_unknown_node() {
        let tree = samples::broadband_tree();
        let err = resolve_path(&tree, &path(&["root", "wired", "laser"])).unwrap_err();
        assert_eq!(
            err,
            TreeError::UnknownNode {
                node_id: "laser".into()
            }
        );
    }

    #[test]
    fn path_must_start_at_root() {
        let tree = samples::broadband_tree();
        let err = resolve_path(&tree, &path(&["wired", "fiber"])).unwrap_err();
        assert!(matches!(err, TreeError::DisconnectedPath { .. }));
    }

    #[test]
    fn empty_path_is_disconnected() {
        let tree = samples::broadband_tree();
        let err = resolve_path(&tree, &[]).unwrap_err();
        assert!(matches!(err, TreeError::DisconnectedPath { .. }));
    }
}
