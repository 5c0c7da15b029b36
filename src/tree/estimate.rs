// ABOUTME: Cost estimation over a configuration tree and unit-cost table
// ABOUTME: Prices consumer selections and produces a rounded total with breakdown
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ServiceFlow

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Tree, TreeError};
use crate::constants::unit_costs;

/// Immutable unit→price-per-unit catalog.
///
/// Built once at process start (defaults plus optional overrides) and
/// passed explicitly into [`estimate`]; never read from ambient global
/// state. The table is advisory: a unit a node legitimately offers but
/// the table does not price degrades to zero instead of failing the
/// whole estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitCostTable {
    prices: HashMap<String, f64>,
}

impl UnitCostTable {
    /// Build the table from explicit unit/price pairs
    #[must_use]
    pub fn from_prices(prices: HashMap<String, f64>) -> Self {
        Self { prices }
    }

    /// The fixed default catalog (Mbps, GB, month, ...)
    #[must_use]
    pub fn defaults() -> Self {
        let prices = unit_costs::DEFAULTS
            .iter()
            .map(|(unit, price)| ((*unit).to_owned(), *price))
            .collect();
        Self { prices }
    }

    /// Defaults with per-unit overrides applied on top
    #[must_use]
    pub fn defaults_with_overrides(overrides: &HashMap<String, f64>) -> Self {
        let mut table = Self::defaults();
        for (unit, price) in overrides {
            table.prices.insert(unit.clone(), *price);
        }
        table
    }

    /// Price for a unit, if the catalog knows it
    #[must_use]
    pub fn price(&self, unit: &str) -> Option<f64> {
        self.prices.get(unit).copied()
    }

    /// Unit/price pairs in sorted unit order, for stable display
    #[must_use]
    pub fn entries(&self) -> Vec<(&str, f64)> {
        let mut entries: Vec<(&str, f64)> = self
            .prices
            .iter()
            .map(|(unit, price)| (unit.as_str(), *price))
            .collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        entries
    }
}

impl Default for UnitCostTable {
    fn default() -> Self {
        Self::defaults()
    }
}

/// One consumer choice over a tree: a node, a quantity, and a unit drawn
/// from that node's unit set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    /// Selected node id
    pub node_id: String,
    /// Positive quantity of the chosen unit
    pub quantity: f64,
    /// Chosen unit name
    pub unit: String,
}

/// Priced line for one selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Selected node id
    pub node_id: String,
    /// Quantity priced
    pub quantity: f64,
    /// Unit priced in
    pub unit: String,
    /// Price per unit applied (zero when the catalog is silent)
    pub unit_price: f64,
    /// quantity × unit price, rounded to two decimals
    pub line_total: f64,
}

/// Result of pricing a list of selections
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Estimate {
    /// Sum of line totals, rounded to two decimals
    pub total: f64,
    /// Per-selection cost breakdown in input order
    pub breakdown: Vec<LineItem>,
}

/// Round to two decimals, half-up.
///
/// `f64::round` ties away from zero, which coincides with half-up for
/// the non-negative amounts this system produces.
#[must_use]
pub fn round_currency(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Price `selections` against `tree` using `costs`.
///
/// For each selection the node id must resolve, the chosen unit must be
/// a member of the node's unit set, and the quantity must be positive.
/// A unit missing from the cost table prices at zero (advisory-table
/// policy). Line totals and the final sum round half-up at two decimals.
///
/// Deterministic and side-effect free: repeated calls on the same
/// `(tree, costs, selections)` triple always produce the same estimate,
/// which is what lets saved snapshots reproduce their stored total on
/// audit.
///
/// # Errors
///
/// Returns the first failing selection's rejection: [`TreeError::UnknownNode`],
/// [`TreeError::InvalidUnit`], or [`TreeError::InvalidQuantity`]. No
/// partial total is produced.
pub fn estimate(
    tree: &Tree,
    costs: &UnitCostTable,
    selections: &[Selection],
) -> Result<Estimate, TreeError> {
    let mut breakdown = Vec::with_capacity(selections.len());
    let mut total = 0.0_f64;

    for selection in selections {
        let node = tree
            .get(&selection.node_id)
            .ok_or_else(|| TreeError::UnknownNode {
                node_id: selection.node_id.clone(),
            })?;

        let offers_unit = node
            .data
            .as_ref()
            .is_some_and(|data| data.offers_unit(&selection.unit));
        if !offers_unit {
            return Err(TreeError::InvalidUnit {
                node_id: selection.node_id.clone(),
                unit: selection.unit.clone(),
            });
        }

        if selection.quantity.is_nan() || selection.quantity <= 0.0 {
            return Err(TreeError::InvalidQuantity {
                node_id: selection.node_id.clone(),
                quantity: selection.quantity,
            });
        }

        let unit_price = costs.price(&selection.unit).unwrap_or_else(|| {
            debug!(
                unit = %selection.unit,
                node_id = %selection.node_id,
                "unit not in cost table, pricing at zero"
            );
            0.0
        });

        let line_total = round_currency(selection.quantity * unit_price);
        total += line_total;
        breakdown.push(LineItem {
            node_id: selection.node_id.clone(),
            quantity: selection.quantity,
            unit: selection.unit.clone(),
            unit_price,
            line_total,
        });
    }

    Ok(Estimate {
        total: round_currency(total),
        breakdown,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::samples;

    fn selection(node_id: &str, quantity: f64, unit: &str) -> Selection {
        Selection {
            node_id: node_id.to_owned(),
            quantity,
            unit: unit.to_owned(),
        }
    }

    #[test]
    fn worked_example_from_broadband_tree() {
        // 100 Mbps at 10.0 per Mbps -> 1000.00
        let tree = samples::broadband_tree();
        let costs = UnitCostTable::defaults();
        let result = estimate(&tree, &costs, &[selection("fiber_100", 100.0, "Mbps")]).unwrap();
        assert!((result.total - 1000.0).abs() < f64::EPSILON);
        assert_eq!(result.breakdown.len(), 1);
        assert!((result.breakdown[0].line_total - 1000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn total_is_sum_of_line_totals() {
        let tree = samples::broadband_tree();
        let costs = UnitCostTable::defaults();
        let result = estimate(
            &tree,
            &costs,
            &[
                selection("fiber_100", 100.0, "Mbps"),
                selection("fiber_100", 1.0, "month"),
            ],
        )
        .unwrap();
        let sum: f64 = result.breakdown.iter().map(|l| l.line_total).sum();
        assert!((result.total - round_currency(sum)).abs() < f64::EPSILON);
        assert!((result.total - 1500.0).abs() < f64::EPSILON);
    }

    #[test]
    fn doubling_quantity_doubles_line_total() {
        let tree = samples::broadband_tree();
        let costs = UnitCostTable::defaults();
        let once = estimate(&tree, &costs, &[selection("wifi_basic", 20.0, "GB")]).unwrap();
        let twice = estimate(&tree, &costs, &[selection("wifi_basic", 40.0, "GB")]).unwrap();
        assert!((twice.breakdown[0].line_total - 2.0 * once.breakdown[0].line_total).abs()
            < f64::EPSILON);
    }

    #[test]
    fn estimate_is_idempotent() {
        let tree = samples::broadband_tree();
        let costs = UnitCostTable::defaults();
        let selections = vec![
            selection("fiber_500", 500.0, "Mbps"),
            selection("fiber_500", 12.0, "month"),
        ];
        let first = estimate(&tree, &costs, &selections).unwrap();
        let second = estimate(&tree, &costs, &selections).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn unknown_node_fails_with_no_partial_total() {
        let tree = samples::broadband_tree();
        let costs = UnitCostTable::defaults();
        let err = estimate(
            &tree,
            &costs,
            &[
                selection("fiber_100", 100.0, "Mbps"),
                selection("fiber_9000", 1.0, "Mbps"),
            ],
        )
        .unwrap_err();
        assert_eq!(
            err,
            TreeError::UnknownNode {
                node_id: "fiber_9000".into()
            }
        );
    }

    #[test]
    fn unit_not_offered_by_node_is_rejected() {
        let tree = samples::broadband_tree();
        let costs = UnitCostTable::defaults();
        // wifi_basic offers GB and month, not Mbps.
        let err = estimate(&tree, &costs, &[selection("wifi_basic", 10.0, "Mbps")]).unwrap_err();
        assert_eq!(
            err,
            TreeError::InvalidUnit {
                node_id: "wifi_basic".into(),
                unit: "Mbps".into()
            }
        );
    }

    #[test]
    fn non_positive_quantity_is_rejected() {
        let tree = samples::broadband_tree();
        let costs = UnitCostTable::defaults();
        for quantity in [0.0, -3.0, f64::NAN] {
            let err =
                estimate(&tree, &costs, &[selection("fiber_100", quantity, "Mbps")]).unwrap_err();
            assert!(matches!(err, TreeError::InvalidQuantity { .. }));
        }
    }

    #[test]
    fn unpriced_unit_degrades_to_zero() {
        let tree = samples::business_tree();
        // "incident" is offered by the support node but absent from the
        // default catalog.
        let costs = UnitCostTable::defaults();
        let result = estimate(&tree, &costs, &[selection("support", 3.0, "incident")]).unwrap();
        assert!((result.total - 0.0).abs() < f64::EPSILON);
        assert!((result.breakdown[0].unit_price - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rounding_is_half_up_at_two_decimals() {
        // 0.125 is exactly representable, so this is a true tie: half-up
        // takes it to 0.13, not banker's 0.12.
        assert!((round_currency(0.125) - 0.13).abs() < f64::EPSILON);
        assert!((round_currency(10.0 / 3.0) - 3.33).abs() < f64::EPSILON);
        assert!((round_currency(1234.567) - 1234.57).abs() < f64::EPSILON);
    }

    #[test]
    fn overrides_replace_default_prices() {
        let mut overrides = HashMap::new();
        overrides.insert("Mbps".to_owned(), 25.0);
        let table = UnitCostTable::defaults_with_overrides(&overrides);
        assert!((table.price("Mbps").unwrap() - 25.0).abs() < f64::EPSILON);
        assert!((table.price("GB").unwrap() - 5.0).abs() < f64::EPSILON);
    }
}
