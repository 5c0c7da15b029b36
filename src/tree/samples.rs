// ABOUTME: Sample catalog trees for demo seeding and tests
// ABOUTME: Broadband and business-services trees with realistic unit sets
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ServiceFlow

use super::{NodeData, Tree, TreeNode};

fn node(id: &str, label: &str, description: &str, children: &[&str], units: &[&str]) -> TreeNode {
    TreeNode {
        id: id.to_owned(),
        label: label.to_owned(),
        description: description.to_owned(),
        children: children.iter().map(|c| (*c).to_owned()).collect(),
        data: if units.is_empty() {
            None
        } else {
            Some(NodeData {
                unit_of_measurement: units.iter().map(|u| (*u).to_owned()).collect(),
                description: description.to_owned(),
            })
        },
    }
}

/// The broadband sample catalog: wired (fiber/cable) and wireless
/// (wifi/mobile) branches with speed-tier leaves.
#[must_use]
pub fn broadband_tree() -> Tree {
    let mut tree = Tree::new();
    tree.insert(node(
        "root",
        "Broadband Services",
        "Choose your broadband service configuration",
        &["wired", "wireless"],
        &[],
    ));
    tree.insert(node(
        "wired",
        "Wired Connection",
        "Fiber optic or cable connection",
        &["fiber", "cable"],
        &["Mbps", "GB", "month"],
    ));
    tree.insert(node(
        "wireless",
        "Wireless Connection",
        "WiFi or mobile broadband",
        &["wifi", "mobile"],
        &["Mbps", "GB", "month"],
    ));
    tree.insert(node(
        "fiber",
        "Fiber Optic",
        "High-speed fiber optic connection",
        &["fiber_100", "fiber_500", "fiber_1000"],
        &["Mbps", "month"],
    ));
    tree.insert(node(
        "cable",
        "Cable Internet",
        "Coaxial cable connection",
        &["cable_50", "cable_100", "cable_200"],
        &["Mbps", "month"],
    ));
    tree.insert(node(
        "wifi",
        "WiFi Hotspot",
        "Wireless hotspot service",
        &["wifi_basic", "wifi_premium"],
        &["GB", "month"],
    ));
    tree.insert(node(
        "mobile",
        "Mobile Broadband",
        "4G/5G mobile internet",
        &["mobile_4g", "mobile_5g"],
        &["GB", "month"],
    ));
    tree.insert(node(
        "fiber_100",
        "100 Mbps Fiber",
        "100 Mbps fiber optic connection",
        &[],
        &["Mbps", "month"],
    ));
    tree.insert(node(
        "fiber_500",
        "500 Mbps Fiber",
        "500 Mbps fiber optic connection",
        &[],
        &["Mbps", "month"],
    ));
    tree.insert(node(
        "fiber_1000",
        "1 Gbps Fiber",
        "1 Gbps fiber optic connection",
        &[],
        &["Mbps", "month"],
    ));
    tree.insert(node(
        "cable_50",
        "50 Mbps Cable",
        "50 Mbps cable connection",
        &[],
        &["Mbps", "month"],
    ));
    tree.insert(node(
        "cable_100",
        "100 Mbps Cable",
        "100 Mbps cable connection",
        &[],
        &["Mbps", "month"],
    ));
    tree.insert(node(
        "cable_200",
        "200 Mbps Cable",
        "200 Mbps cable connection",
        &[],
        &["Mbps", "month"],
    ));
    tree.insert(node(
        "wifi_basic",
        "Basic WiFi",
        "Basic WiFi hotspot service",
        &[],
        &["GB", "month"],
    ));
    tree.insert(node(
        "wifi_premium",
        "Premium WiFi",
        "Premium WiFi hotspot service",
        &[],
        &["GB", "month"],
    ));
    tree.insert(node(
        "mobile_4g",
        "4G Mobile",
        "4G mobile broadband",
        &[],
        &["GB", "month"],
    ));
    tree.insert(node(
        "mobile_5g",
        "5G Mobile",
        "5G mobile broadband",
        &[],
        &["GB", "month"],
    ));
    tree
}

/// The business sample catalog: dedicated/shared internet plus support
/// tiers, including an `incident` unit the default cost table does not
/// price.
#[must_use]
pub fn business_tree() -> Tree {
    let mut tree = Tree::new();
    tree.insert(node(
        "root",
        "Business Services",
        "Choose your business service configuration",
        &["internet", "support"],
        &[],
    ));
    tree.insert(node(
        "internet",
        "Business Internet",
        "Dedicated business internet connection",
        &["dedicated", "shared"],
        &["Mbps", "month"],
    ));
    tree.insert(node(
        "support",
        "Technical Support",
        "Business technical support services",
        &["basic_support", "premium_support"],
        &["month", "incident"],
    ));
    tree.insert(node(
        "dedicated",
        "Dedicated Line",
        "Dedicated internet line for business",
        &[],
        &["Mbps", "month"],
    ));
    tree.insert(node(
        "shared",
        "Shared Line",
        "Shared internet line for business",
        &[],
        &["Mbps", "month"],
    ));
    tree.insert(node(
        "basic_support",
        "Basic Support",
        "Basic technical support",
        &[],
        &["month"],
    ));
    tree.insert(node(
        "premium_support",
        "Premium Support",
        "Premium technical support with 24/7 availability",
        &[],
        &["month"],
    ));
    tree
}
