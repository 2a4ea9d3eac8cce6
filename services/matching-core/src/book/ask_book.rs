//! Ask (sell-side) order book
//!
//! Maintains sell orders keyed by price, best (lowest) price first.
//! Mirror image of the bid book: BTreeMap level index, FIFO within a
//! level, empty levels dropped eagerly.

use std::collections::BTreeMap;
use types::ids::OrderId;
use types::numeric::{Price, Quantity};
use types::order::Order;

use super::price_level::PriceLevel;

/// Ask (sell) side of the book
///
/// Price priority is ascending: the lowest ask matches first.
#[derive(Debug, Clone, Default)]
pub struct AskBook {
    levels: BTreeMap<Price, PriceLevel>,
}

impl AskBook {
    /// Create a new empty ask book
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

    /// Best (lowest) ask price
    pub fn best_price(&self) -> Option<Price> {
        self.levels.keys().next().copied()
    }

    /// The resting order at the head of the book
    pub fn peek_top(&self) -> Option<&Order> {
        self.levels.values().next().and_then(PriceLevel::front)
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
            .take(depth)
            .map(|(price, level)| (*price, level.total_quantity()))
            .collect()
    }

    /// Iterate resting orders in match-priority order (best price first,
    /// FIFO within a level)
    pub fn iter(&self) -> impl Iterator<Item = &Order> {
        self.levels.values().flat_map(PriceLevel::iter)
    }

    /// Check if the ask book is empty
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

#[cfg(test)]
mod tests {
    use super::*;
    use types::ids::ClientId;
    use types::order::Side;

    fn ask(id: u64, price: u64, qty: u64) -> Order {
        Order::new(
            OrderId::from_u64(id),
            ClientId::new("B"),
            Side::Ask,
            Price::from_u64(price),
            Quantity::from_u64(qty),
        )
    }

    #[test]
    fn test_best_price_is_lowest() {
        let mut book = AskBook::new();
        book.insert(ask(1, 100, 3));
        book.insert(ask(2, 75, 4));

        assert_eq!(book.best_price(), Some(Price::from_u64(75)));
        assert_eq!(book.peek_top().unwrap().order_id, OrderId::from_u64(2));
    }

    #[test]
    fn test_iter_priority_order() {
        let mut book = AskBook::new();
        book.insert(ask(1, 100, 3));
        book.insert(ask(2, 75, 4));
        book.insert(ask(3, 75, 1));

        let ids: Vec<OrderId> = book.iter().map(|o| o.order_id).collect();
        assert_eq!(
            ids,
            vec![
                OrderId::from_u64(2),
                OrderId::from_u64(3),
                OrderId::from_u64(1),
            ]
        );
    }

    #[test]
    fn test_remove_drops_empty_level() {
        let mut book = AskBook::new();
        book.insert(ask(1, 100, 3));
        book.insert(ask(2, 75, 4));

        book.remove(OrderId::from_u64(2), Price::from_u64(75));
        assert_eq!(book.level_count(), 1);
        assert_eq!(book.best_price(), Some(Price::from_u64(100)));
    }

    #[test]
    fn test_pop_top() {
        let mut book = AskBook::new();
        book.insert(ask(1, 100, 3));
        book.insert(ask(2, 75, 4));

        let popped = book.pop_top().unwrap();
        assert_eq!(popped.order_id, OrderId::from_u64(2));
        assert!(book.peek_top().is_some());
    }

    #[test]
    fn test_depth_snapshot_best_first() {
        let mut book = AskBook::new();
        book.insert(ask(1, 100, 3));
        book.insert(ask(2, 75, 4));
        book.insert(ask(3, 80, 1));

        let depth = book.depth_snapshot(2);
        assert_eq!(depth[0].0, Price::from_u64(75));
        assert_eq!(depth[1].0, Price::from_u64(80));
    }
}
