// ABOUTME: Configuration tree model for service catalogs
// ABOUTME: Tree types plus pure validation, cost estimation, and path resolution
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ServiceFlow

//! # Configuration Tree Model
//!
//! A service's catalog is a rooted tree of option nodes. Each node carries
//! a label, a description, an ordered list of child node ids, and —
//! on configurable nodes — a set of measurement units it can be priced in.
//! The tree is stored and exchanged as a flat id→node JSON map; children
//! are referenced by id, never by owning pointer.
//!
//! Everything in this module is a pure function over an immutable tree
//! snapshot: the validator ([`validate`]), the cost estimator
//! ([`estimate`]), and the path resolver ([`resolve_path`]) perform no
//! I/O and are safe to run concurrently against the same tree.

mod error;
mod estimate;
mod path;
/// Sample catalog trees used by the demo seeder and tests
pub mod samples;
mod validate;

pub use error::{TreeError, TreeRule};
pub use estimate::{estimate, round_currency, Estimate, LineItem, Selection, UnitCostTable};
pub use path::resolve_path;
pub use validate::validate;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Id of the distinguished entry every tree must contain
pub const ROOT_ID: &str = "root";

/// Pricing metadata attached to configurable nodes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeData {
    /// Units this node can be priced in (e.g. "Mbps", "month")
    pub unit_of_measurement: Vec<String>,
    /// Display description for the pricing panel
    #[serde(default)]
    pub description: String,
}

impl NodeData {
    /// Whether the node offers the given unit
    #[must_use]
    pub fn offers_unit(&self, unit: &str) -> bool {
        self.unit_of_measurement.iter().any(|u| u == unit)
    }
}

/// One selectable option in a catalog tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    /// Node id, unique within the tree
    pub id: String,
    /// Display label
    pub label: String,
    /// Display description
    #[serde(default)]
    pub description: String,
    /// Ordered child node ids; insertion order is display order
    #[serde(default)]
    pub children: Vec<String>,
    /// Pricing metadata; present on leaf-like or configurable nodes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<NodeData>,
}

impl TreeNode {
    /// Whether this node carries at least one priceable unit
    #[must_use]
    pub fn is_priceable(&self) -> bool {
        self.data
            .as_ref()
            .is_some_and(|d| !d.unit_of_measurement.is_empty())
    }
}

/// A catalog tree: flat map from node id to node.
///
/// Map order is irrelevant; each node's `children` order is meaningful
/// and preserved. The external JSON shape is exactly this map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tree {
    nodes: HashMap<String, TreeNode>,
}

impl Tree {
    /// Create an empty tree (invalid until a `root` node is inserted)
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree from an id→node map
    #[must_use]
    pub fn from_nodes(nodes: HashMap<String, TreeNode>) -> Self {
        Self { nodes }
    }

    /// Insert a node under its own id, replacing any previous entry
    pub fn insert(&mut self, node: TreeNode) {
        self.nodes.insert(node.id.clone(), node);
    }

    /// Look up a node by id
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&TreeNode> {
        self.nodes.get(id)
    }

    /// The distinguished root node, if present
    #[must_use]
    pub fn root(&self) -> Option<&TreeNode> {
        self.nodes.get(ROOT_ID)
    }

    /// Whether the tree contains a node with this id
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Number of nodes in the tree
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree has no nodes at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over all nodes in unspecified order
    pub fn nodes(&self) -> impl Iterator<Item = &TreeNode> {
        self.nodes.values()
    }

    /// Node ids in sorted order, for deterministic error reporting
    #[must_use]
    pub fn sorted_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.nodes.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tree_json_shape_is_flat_map() {
        let json = r#"{
            "root": {"id": "root", "label": "Root", "description": "", "children": ["a"]},
            "a": {"id": "a", "label": "A", "children": [],
                  "data": {"unitOfMeasurement": ["month"], "description": "monthly"}}
        }"#;
        let tree: Tree = serde_json::from_str(json).unwrap();
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.root().unwrap().children, vec!["a"]);
        let a = tree.get("a").unwrap();
        assert!(a.is_priceable());
        assert!(a.data.as_ref().unwrap().offers_unit("month"));
        assert!(!a.data.as_ref().unwrap().offers_unit("Mbps"));
    }

    #[test]
    fn children_order_survives_round_trip() {
        let json = r#"{
            "root": {"id": "root", "label": "Root", "children": ["b", "a", "c"],
                     "data": {"unitOfMeasurement": ["month"]}},
            "a": {"id": "a", "label": "A", "children": [], "data": {"unitOfMeasurement": ["GB"]}},
            "b": {"id": "b", "label": "B", "children": [], "data": {"unitOfMeasurement": ["GB"]}},
            "c": {"id": "c", "label": "C", "children": [], "data": {"unitOfMeasurement": ["GB"]}}
        }"#;
        let tree: Tree = serde_json::from_str(json).unwrap();
        let reparsed: Tree = serde_json::from_str(&serde_json::to_string(&tree).unwrap()).unwrap();
        assert_eq!(reparsed.root().unwrap().children, vec!["b", "a", "c"]);
    }
}
