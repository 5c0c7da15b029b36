// ABOUTME: Structural validation for candidate configuration trees
// ABOUTME: Rejects missing roots, dangling child ids, cycles, and unpriceable leaves
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ServiceFlow

use std::collections::HashSet;

use super::{Tree, TreeError, TreeRule, ROOT_ID};
use crate::constants::limits::MAX_TREE_DEPTH;

/// Validate a candidate tree before it is persisted.
///
/// Checks run in a fixed order and the first violation wins:
///
/// 1. a `root` entry exists;
/// 2. every id appearing in any `children` list exists as a key;
/// 3. the structure is acyclic (visited-set depth-first walk, depth
///    bounded at [`MAX_TREE_DEPTH`] to guard pathological input);
/// 4. every node reachable from root either has at least one child or
///    carries a non-empty unit set — a usable leaf must be priceable.
///
/// Pure function: no side effects, safe to call concurrently.
///
/// # Errors
///
/// Returns [`TreeError::MalformedTree`] naming the first violated rule
/// and the offending node id.
pub fn validate(tree: &Tree) -> Result<(), TreeError> {
    if tree.root().is_none() {
        return Err(TreeError::MalformedTree {
            rule: TreeRule::MissingRoot,
            node_id: ROOT_ID.to_owned(),
        });
    }

    // Scan nodes in sorted id order so the reported offender is stable
    // across runs (map iteration order is not).
    for id in tree.sorted_ids() {
        let Some(node) = tree.get(id) else { continue };
        for child in &node.children {
            if !tree.contains(child) {
                return Err(TreeError::MalformedTree {
                    rule: TreeRule::UnresolvedChild,
                    node_id: child.clone(),
                });
            }
        }
    }

    let reachable = walk_from_root(tree)?;

    for id in tree.sorted_ids() {
        if !reachable.contains(id) {
            continue;
        }
        let Some(node) = tree.get(id) else { continue };
        if node.children.is_empty() && !node.is_priceable() {
            return Err(TreeError::MalformedTree {
                rule: TreeRule::UnpriceableLeaf,
                node_id: id.to_owned(),
            });
        }
    }

    Ok(())
}

/// Depth-first walk from `root` collecting reachable ids.
///
/// A node already on the current path means a cycle; exceeding
/// [`MAX_TREE_DEPTH`] is rejected outright rather than risking a stack
/// overflow on adversarial input.
fn walk_from_root(tree: &Tree) -> Result<HashSet<String>, TreeError> {
    let mut reachable: HashSet<String> = HashSet::new();
    let mut on_path: HashSet<String> = HashSet::new();
    // Explicit stack of (node id, next child index) frames; recursion
    // depth is attacker-controlled here.
    let mut stack: Vec<(&str, usize)> = vec![(ROOT_ID, 0)];
    reachable.insert(ROOT_ID.to_owned());
    on_path.insert(ROOT_ID.to_owned());

    while let Some((id, child_idx)) = stack.pop() {
        let Some(node) = tree.get(id) else { continue };

        if let Some(child) = node.children.get(child_idx) {
            // Re-push the current frame advanced past this child.
            stack.push((id, child_idx + 1));

            if on_path.contains(child.as_str()) {
                return Err(TreeError::MalformedTree {
                    rule: TreeRule::CycleDetected,
                    node_id: child.clone(),
                });
            }
            if stack.len() >= MAX_TREE_DEPTH {
                return Err(TreeError::MalformedTree {
                    rule: TreeRule::DepthExceeded,
                    node_id: child.clone(),
                });
            }
            // A node already explored from another branch (shared
            // subtree) needs no second walk; any cycle below it was
            // found the first time.
            if reachable.insert(child.clone()) {
                on_path.insert(child.clone());
                stack.push((child.as_str(), 0));
            }
        } else {
            // All children visited; node leaves the current path.
            on_path.remove(id);
        }
    }

    Ok(reachable)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::samples;
    use crate::tree::{NodeData, TreeNode};

    fn node(id: &str, children: &[&str], units: &[&str]) -> TreeNode {
        TreeNode {
            id: id.to_owned(),
            label: id.to_owned(),
            description: String::new(),
            children: children.iter().map(|c| (*c).to_owned()).collect(),
            data: if units.is_empty() {
                None
            } else {
                Some(NodeData {
                    unit_of_measurement: units.iter().map(|u| (*u).to_owned()).collect(),
                    description: String::new(),
                })
            },
        }
    }

    #[test]
    fn sample_trees_are_well_formed() {
        assert!(validate(&samples::broadband_tree()).is_ok());
        assert!(validate(&samples::business_tree()).is_ok());
    }

    #[test]
    fn missing_root_is_rejected() {
        let mut tree = Tree::new();
        tree.insert(node("orphan", &[], &["month"]));
        assert_eq!(
            validate(&tree),
            Err(TreeError::MalformedTree {
                rule: TreeRule::MissingRoot,
                node_id: "root".into(),
            })
        );
    }

    #[test]
    fn dangling_child_reference_is_rejected() {
        let mut tree = Tree::new();
        tree.insert(node("root", &["ghost"], &[]));
        assert_eq!(
            validate(&tree),
            Err(TreeError::MalformedTree {
                rule: TreeRule::UnresolvedChild,
                node_id: "ghost".into(),
            })
        );
    }

    #[test]
    fn two_node_cycle_is_rejected_not_looped() {
        let mut tree = Tree::new();
        tree.insert(node("root", &["a"], &[]));
        tree.insert(node("a", &["b"], &["month"]));
        tree.insert(node("b", &["a"], &["month"]));
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
    fn self_cycle_is_rejected() {
        let mut tree = Tree::new();
        tree.insert(node("root", &["root"], &[]));
        assert_eq!(
            validate(&tree),
            Err(TreeError::MalformedTree {
                rule: TreeRule::CycleDetected,
                node_id: "root".into(),
            })
        );
    }

    #[test]
    fn unpriceable_reachable_leaf_is_rejected() {
        let mut tree = Tree::new();
        tree.insert(node("root", &["dead_end"], &[]));
        tree.insert(node("dead_end", &[], &[]));
        assert_eq!(
            validate(&tree),
            Err(TreeError::MalformedTree {
                rule: TreeRule::UnpriceableLeaf,
                node_id: "dead_end".into(),
            })
        );
    }

    #[test]
    fn unreachable_unpriceable_node_is_tolerated() {
        // Rule (d) applies to reachable nodes only.
        let mut tree = Tree::new();
        tree.insert(node("root", &["a"], &[]));
        tree.insert(node("a", &[], &["month"]));
        tree.insert(node("island", &[], &[]));
        assert!(validate(&tree).is_ok());
    }

    #[test]
    fn depth_bound_guards_pathological_chains() {
        let mut tree = Tree::new();
        let deep = MAX_TREE_DEPTH + 8;
        tree.insert(node("root", &["n0"], &[]));
        for i in 0..deep {
            let next = format!("n{}", i + 1);
            let children = if i + 1 < deep {
                vec![next.clone()]
            } else {
                vec![]
            };
            tree.insert(TreeNode {
                id: format!("n{i}"),
                label: format!("n{i}"),
                description: String::new(),
                children,
                data: Some(NodeData {
                    unit_of_measurement: vec!["month".into()],
                    description: String::new(),
                }),
            });
        }
        let err = validate(&tree).unwrap_err();
        assert!(matches!(
            err,
            TreeError::MalformedTree {
                rule: TreeRule::DepthExceeded,
                ..
            }
        ));
    }
}
