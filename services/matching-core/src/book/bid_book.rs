//! Bid (buy-side) order book
//!
//! Maintains buy orders keyed by price, best (highest) price first.
//! BTreeMap keeps the level index ordered and iteration deterministic;
//! the first order at a new price costs a logarithmic insert, subsequent
//! orders at an existing level are O(1) appends.

use std::collections::BTreeMap;
use types::ids::OrderId;
use types::numeric::{Price, Quantity};
use types::order::Order;

use super::price_level::PriceLevel;

/// Bid (buy) side of the book
///
/// Price priority is descending: the highest bid matches first. Within a
/// level, orders are FIFO.
#[derive(Debug, Clone, Default)]
pub struct BidBook {
    levels: BTreeMap<Price, PriceLevel>,
}

impl BidBook {
    /// Create a new empty bid book
    pub fn new() -> Self {
        Self {
            levels: BTreeMap::new(),
        }
    }

    /// Insert an order at the back of its price level
    pub fn insert(&mut self, order: Order) {
        self.levels.entry(order.price).or_default().push_back(order);
    }

    /// Remove an order by id at a known price
    ///
    /// Empty price levels are dropped to keep the book clean.
    pub fn remove(&mut self, order_id: OrderId, price: Price) -> Option<Order> {
        let level = self.levels.get_mut(&price)?;
        let removed = level.remove(order_id)?;
        if level.is_empty() {
            self.levels.remove(&price);
        }
        Some(removed)
    }

    /// Reduce an order in place after a partial fill; returns the remainder
    pub fn reduce(&mut self, order_id: OrderId, price: Price, fill: Quantity) -> Option<Quantity> {
        self.levels.get_mut(&price)?.reduce(order_id, fill)
    }

    /// Best (highest) bid price
    pub fn best_price(&self) -> Option<Price> {
        // BTreeMap iterates ascending, so the best bid is the last key
        self.levels.keys().next_back().copied()
    }

    /// The resting order at the head of the book
    pub fn peek_top(&self) -> Option<&Order> {
        self.levels.values().next_back().and_then(PriceLevel::front)
    }

    /// Remove and return the order at the head of the book
    pub fn pop_top(&mut self) -> Option<Order> {
        let price = self.best_price()?;
        let level = self.levels.get_mut(&price)?;
        let order = level.pop_front();
        if level.is_empty() {
            self.levels.remove(&price);
        }
        order
    }

    /// Look up an order by id at a known price
    pub fn get(&self, order_id: OrderId, price: Price) -> Option<&Order> {
        self.levels
            .get(&price)?
            .iter()
            .find(|order| order.order_id == order_id)
    }

    /// Total resting quantity at a price, zero if the level is absent
    pub fn volume_at(&self, price: Price) -> Quantity {
        self.levels
            .get(&price)
            .map(PriceLevel::total_quantity)
            .unwrap_or_else(Quantity::zero)
    }

    /// Top-N price levels as (price, total quantity), best first
    pub fn depth_snapshot(&self, depth: usize) -> Vec<(Price, Quantity)> {
        self.levels
            .iter()
            .rev()
            .take(depth)
            .map(|(price, level)| (*price, level.total_quantity()))
            .collect()
    }

    /// Iterate resting orders in match-priority order (best price first,
    /// FIFO within a level)
    pub fn iter(&self) -> impl Iterator<Item = &Order> {
        self.levels.values().rev().flat_map(PriceLevel::iter)
    }

    /// Check if the bid book is empty
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Number of price levels
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Number of resting orders across all levels
    pub fn order_count(&self) -> usize {
        self.levels.values().map(PriceLevel::order_count).sum()
    }
}
