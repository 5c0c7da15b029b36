// ABOUTME: Integration tests for the cost estimator
// ABOUTME: Worked pricing examples, linearity, idempotence, and failure modes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ServiceFlow

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use serviceflow_server::tree::{
    estimate, round_currency, samples, Selection, TreeError, UnitCostTable,
};

fn selection(node_id: &str, quantity: f64, unit: &str) -> Selection {
    Selection {
        node_id: node_id.to_owned(),
        quantity,
        unit: unit.to_owned(),
    }
}

#[test]
fn spec_worked_example() {
    // fiber_100 at 100 Mbps with Mbps = 10.0 -> line 1000.00, total 1000.00
    let tree = samples::broadband_tree();
    let costs = UnitCostTable::defaults();

    let result = estimate(&tree, &costs, &[selection("fiber_100", 100.0, "Mbps")]).unwrap();

    assert!((result.total - 1000.00).abs() < f64::EPSILON);
    assert_eq!(result.breakdown.len(), 1);
    let line = &result.breakdown[0];
    assert_eq!(line.node_id, "fiber_100");
    assert!((line.unit_price - 10.0).abs() < f64::EPSILON);
    assert!((line.line_total - 1000.00).abs() < f64::EPSILON);
}

#[test]
fn total_is_sum_of_line_totals() {
    let tree = samples::broadband_tree();
    let costs = UnitCostTable::defaults();

    let result = estimate(
        &tree,
        &costs,
        &[
            selection("fiber_500", 500.0, "Mbps"),
            selection("fiber_500", 12.0, "month"),
            selection("wifi_basic", 50.0, "GB"),
        ],
    )
    .unwrap();

    let sum: f64 = result.breakdown.iter().map(|line| line.line_total).sum();
    assert!((result.total - round_currency(sum)).abs() < f64::EPSILON);
}

#[test]
fn doubling_quantity_doubles_the_line() {
    let tree = samples::broadband_tree();
    let costs = UnitCostTable::defaults();

    let single = estimate(&tree, &costs, &[selection("mobile_5g", 25.0, "GB")]).unwrap();
    let double = estimate(&tree, &costs, &[selection("mobile_5g", 50.0, "GB")]).unwrap();

    assert!(
        (double.breakdown[0].line_total - 2.0 * single.breakdown[0].line_total).abs()
            < f64::EPSILON
    );
}

#[test]
fn repeated_runs_reproduce_the_total() {
    let tree = samples::business_tree();
    let costs = UnitCostTable::defaults();
    let selections = vec![
        selection("dedicated", 200.0, "Mbps"),
        selection("premium_support", 12.0, "month"),
    ];

    let first = estimate(&tree, &costs, &selections).unwrap();
    for _ in 0..10 {
        let again = estimate(&tree, &costs, &selections).unwrap();
        assert_eq!(again, first);
    }
}

#[test]
fn unknown_node_yields_error_not_partial_total() {
    let tree = samples::broadband_tree();
    let costs = UnitCostTable::defaults();

    let err = estimate(
        &tree,
        &costs,
        &[
            selection("fiber_100", 100.0, "Mbps"),
            selection("no_such_node", 1.0, "month"),
        ],
    )
    .unwrap_err();

    assert_eq!(
        err,
        TreeError::UnknownNode {
            node_id: "no_such_node".into()
        }
    );
}

#[test]
fn unit_must_be_offered_by_the_node() {
    let tree = samples::broadband_tree();
    let costs = UnitCostTable::defaults();

    let err = estimate(&tree, &costs, &[selection("mobile_4g", 10.0, "Mbps")]).unwrap_err();
    assert_eq!(
        err,
        TreeError::InvalidUnit {
            node_id: "mobile_4g".into(),
            unit: "Mbps".into(),
        }
    );
}

#[test]
fn quantity_must_be_positive() {
    let tree = samples::broadband_tree();
    let costs = UnitCostTable::defaults();

    for bad in [0.0, -1.0] {
        let err = estimate(&tree, &costs, &[selection("fiber_100", bad, "Mbps")]).unwrap_err();
        assert!(matches!(err, TreeError::InvalidQuantity { .. }));
    }
}

#[test]
fn unpriced_unit_is_free_not_fatal() {
    // The business tree's support node offers "incident", which the
    // default catalog does not price; the estimate degrades to zero for
    // that line instead of failing.
    let tree = samples::business_tree();
    let costs = UnitCostTable::defaults();

    let result = estimate(
        &tree,
        &costs,
        &[
            selection("support", 3.0, "incident"),
            selection("basic_support", 1.0, "month"),
        ],
    )
    .unwrap();

    assert!((result.breakdown[0].line_total - 0.0).abs() < f64::EPSILON);
    assert!((result.total - 500.0).abs() < f64::EPSILON);
}

#[test]
fn fractional_quantities_round_at_two_decimals() {
    let tree = samples::broadband_tree();
    let costs = UnitCostTable::defaults();

    // 1.234 GB at 5.0 per GB = 6.17 after rounding at two decimals.
    let result = estimate(&tree, &costs, &[selection("wifi_basic", 1.234, "GB")]).unwrap();
    assert!((result.breakdown[0].line_total - 6.17).abs() < f64::EPSILON);
    assert!((result.total - 6.17).abs() < f64::EPSILON);
}
