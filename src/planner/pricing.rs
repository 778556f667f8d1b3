//! Price aggregation
//!
//! `total = base + Σ unit_price × quantity` over every selected, non-mandatory
//! component. Mandatory components are priced into the base. Never fails:
//! unknown prices fall back to the table's default unit price.

use super::catalog::Catalog;
use super::graph::DependencyGraph;
use super::selection::SelectionState;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Base price plus per-component unit prices
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceTable {
    base_price: u64,
    unit_prices: HashMap<String, u64>,
    default_unit_price: u64,
}

impl PriceTable {
    pub fn new(base_price: u64, default_unit_price: u64) -> Self {
        Self {
            base_price,
            unit_prices: HashMap::new(),
            default_unit_price,
        }
    }

    /// Unit prices from the catalog, with configured overrides on top
    pub fn from_catalog(
        catalog: &Catalog,
        base_price: u64,
        default_unit_price: u64,
        overrides: &HashMap<String, u64>,
    ) -> Self {
        let mut unit_prices: HashMap<String, u64> = catalog
            .iter()
            .map(|c| (c.key.clone(), c.unit_price))
            .collect();

        for (key, price) in overrides {
            if let Some(slot) = unit_prices.get_mut(key) {
                *slot = *price;
            }
        }

        Self {
            base_price,
            unit_prices,
            default_unit_price,
        }
    }

    pub fn with_price(mut self, key: impl Into<String>, price: u64) -> Self {
        self.unit_prices.insert(key.into(), price);
        self
    }

    pub fn base_price(&self) -> u64 {
        self.base_price
    }

    pub fn unit_price(&self, key: &str) -> u64 {
        self.unit_prices
            .get(key)
            .copied()
            .unwrap_or(self.default_unit_price)
    }
}

/// Breakdown of a computed estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceEstimate {
    pub base_price: u64,
    pub optional_modules_cost: u64,
    pub total: u64,
}

impl PriceEstimate {
    pub fn new(base_price: u64, optional_modules_cost: u64) -> Self {
        Self {
            base_price,
            optional_modules_cost,
            total: base_price.saturating_add(optional_modules_cost),
        }
    }
}

/// Cost of the selected non-mandatory components, excluding the base
pub fn optional_modules_cost(
    state: &SelectionState,
    graph: &DependencyGraph,
    prices: &PriceTable,
) -> u64 {
    state
        .optional_keys(graph)
        .map(|key| {
            prices
                .unit_price(key)
                .saturating_mul(u64::from(state.quantity(key)))
        })
        .fold(0u64, u64::saturating_add)
}

pub fn compute_total(state: &SelectionState, graph: &DependencyGraph, prices: &PriceTable) -> u64 {
    estimate(state, graph, prices).total
}

pub fn estimate(
    state: &SelectionState,
    graph: &DependencyGraph,
    prices: &PriceTable,
) -> PriceEstimate {
    PriceEstimate::new(
        prices.base_price(),
        optional_modules_cost(state, graph, prices),
    )
}

/// Format a whole-rupee amount with Indian digit grouping, e.g. `₹1,23,000`
pub fn format_amount(amount: u64) -> String {
    let digits = amount.to_string();
    if digits.len() <= 3 {
        return format!("₹{}", digits);
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 2 {
        groups.push(&head[end - 2..end]);
        end -= 2;
    }
    groups.push(&head[..end]);
    groups.reverse();

    format!("₹{},{}", groups.join(","), tail)
}
