// ABOUTME: Rejection types for the configuration tree model
// ABOUTME: Deterministic, input-driven errors naming the violated rule and offending id
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ServiceFlow

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Structural rule violated by a malformed tree.
///
/// Rules are checked in declaration order; a rejection names the first
/// rule that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeRule {
    /// The tree has no `root` entry
    MissingRoot,
    /// A `children` list references an id that is not a key in the map
    UnresolvedChild,
    /// A node is reachable from itself
    CycleDetected,
    /// Traversal exceeded the depth bound
    DepthExceeded,
    /// A reachable node has no children and no priceable unit
    UnpriceableLeaf,
}

impl fmt::Display for TreeRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::MissingRoot => "missing root",
            Self::UnresolvedChild => "unresolved child reference",
            Self::CycleDetected => "cycle detected",
            Self::DepthExceeded => "depth bound exceeded",
            Self::UnpriceableLeaf => "unpriceable leaf",
        };
        f.write_str(name)
    }
}

/// Rejection raised by the tree validator, cost estimator, or path
/// resolver.
///
/// Every variant is a deterministic, input-driven rejection — never
/// transient — so callers report it immediately; no retry is meaningful.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TreeError {
    /// The candidate tree failed a structural check
    #[error("malformed tree ({rule}) at node `{node_id}`")]
    MalformedTree {
        /// First violated rule
        rule: TreeRule,
        /// Offending node id
        node_id: String,
    },

    /// A selection or path referenced an id absent from the tree
    #[error("unknown node `{node_id}`")]
    UnknownNode {
        /// The id that did not resolve
        node_id: String,
    },

    /// A selection chose a unit its node does not offer
    #[error("node `{node_id}` does not offer unit `{unit}`")]
    InvalidUnit {
        /// Node the selection referenced
        node_id: String,
        /// The rejected unit
        unit: String,
    },

    /// A selection's quantity was zero or negative
    #[error("quantity for node `{node_id}` must be positive, got {quantity}")]
    InvalidQuantity {
        /// Node the selection referenced
        node_id: String,
        /// The rejected quantity
        quantity: f64,
    },

    /// A claimed path broke at a pair that is not a parent→child edge
    #[error("path is disconnected: `{to}` is not a child of `{from}`")]
    DisconnectedPath {
        /// Parent side of the broken pair
        from: String,
        /// Child side of the broken pair
        to: String,
    },
}

impl TreeError {
    /// Structured detail payload for the HTTP error envelope
    #[must_use]
    pub fn details(&self) -> serde_json::Value {
        match self {
            Self::MalformedTree { rule, node_id } => serde_json::json!({
                "rule": rule,
                "nodeId": node_id,
            }),
            Self::UnknownNode { node_id } => serde_json::json!({ "nodeId": node_id }),
            Self::InvalidUnit { node_id, unit } => serde_json::json!({
                "nodeId": node_id,
                "unit": unit,
            }),
            Self::InvalidQuantity { node_id, quantity } => serde_json::json!({
                "nodeId": node_id,
                "quantity": quantity,
            }),
            Self::DisconnectedPath { from, to } => serde_json::json!({
                "from": from,
                "to": to,
            }),
        }
    }
}
