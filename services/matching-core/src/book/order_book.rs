//! Intent-driven order book for a single instrument
//!
//! Owns both side books, the process-wide order id counter, and a locator
//! index from order id to (side, price) so cancel and amend address orders
//! by identifier in O(1) rather than by value equality.

use std::collections::HashMap;

use types::errors::BookError;
use types::ids::OrderId;
use types::numeric::{Price, Quantity};
use types::order::{Order, OrderAction, OrderIntent, OrderStatus, Side};

use super::ask_book::AskBook;
use super::bid_book::BidBook;

/// Limit order book: resting buy and sell interest with price priority
///
/// Invariants: bids are non-increasing and asks non-decreasing in price
/// from head to tail; an order id rests on at most one side, at most once;
/// the locator and the side books always agree.
#[derive(Debug, Clone, Default)]
pub struct OrderBook {
    bids: BidBook,
    asks: AskBook,
    /// Order id → (side, price) for identifier-addressed removal
    locator: HashMap<OrderId, (Side, Price)>,
    /// Monotonic id counter; ids are never reused
    next_id: u64,
}

impl OrderBook {
    /// Create a new empty book
    pub fn new() -> Self {
        Self::default()
    }

    /// Process an order intent
    ///
    /// - `Add`: validates price and quantity, assigns an id when the intent
    ///   carries none, and inserts preserving price priority (FIFO within
    ///   a level).
    /// - `Amend`: replaces the addressed order's price and quantity;
    ///   logically cancel-then-reinsert, so prior time priority is
    ///   forfeited. The identifier is preserved.
    /// - `Cancel`: removes the addressed order from its side.
    ///
    /// Returns the id of the affected order.
    pub fn submit(&mut self, intent: OrderIntent) -> Result<OrderId, BookError> {
        match intent.action {
            OrderAction::Add => self.handle_add(intent),
            OrderAction::Amend => self.handle_amend(intent),
            OrderAction::Cancel => self.handle_cancel(intent),
        }
    }

    fn handle_add(&mut self, intent: OrderIntent) -> Result<OrderId, BookError> {
        let (price, quantity) = validate_fields(&intent)?;

        let order_id = match intent.order_id {
            Some(id) if self.locator.contains_key(&id) => {
                return Err(BookError::MalformedOrder {
                    reason: format!("duplicate order identifier: {id}"),
                });
            }
            Some(id) => {
                // keep the counter ahead of re-admitted ids so no id is
                // ever allocated twice
                self.next_id = self.next_id.max(id.as_u64());
                id
            }
            None => self.allocate_id(),
        };

        let order = Order::new(order_id, intent.client_id, intent.side, price, quantity);
        self.insert(order);
        Ok(order_id)
    }

    fn handle_amend(&mut self, intent: OrderIntent) -> Result<OrderId, BookError> {
        let (price, quantity) = validate_fields(&intent)?;
        let order_id = intent.order_id.ok_or_else(missing_id)?;

        // Cancel-then-reinsert at the new price/quantity. The client id and
        // order id carry over from the resting order.
        let removed = self.remove(intent.side, order_id)?;
        let order = Order::new(order_id, removed.client_id, intent.side, price, quantity);
        self.insert(order);
        Ok(order_id)
    }

    fn handle_cancel(&mut self, intent: OrderIntent) -> Result<OrderId, BookError> {
        let order_id = intent.order_id.ok_or_else(missing_id)?;
        self.remove(intent.side, order_id)?;
        Ok(order_id)
    }

    fn allocate_id(&mut self) -> OrderId {
        self.next_id += 1;
        OrderId::from_u64(self.next_id)
    }

    fn insert(&mut self, order: Order) {
        self.locator
            .insert(order.order_id, (order.side, order.price));
        match order.side {
            Side::Bid => self.bids.insert(order),
            Side::Ask => self.asks.insert(order),
        }
    }

    /// Best bid price, or `EmptyBook` if no buy interest rests
    pub fn best_bid(&self) -> Result<Price, BookError> {
        self.bids.best_price().ok_or(BookError::EmptyBook)
    }

    /// Best ask price, or `EmptyBook` if no sell interest rests
    pub fn best_ask(&self) -> Result<Price, BookError> {
        self.asks.best_price().ok_or(BookError::EmptyBook)
    }

    /// Arithmetic mean of best bid and best ask
    pub fn mid_price(&self) -> Result<Price, BookError> {
        Ok(Price::midpoint(self.best_bid()?, self.best_ask()?))
    }

    /// The resting order at the head of a side, without removing it
    pub fn peek_top(&self, side: Side) -> Result<&Order, BookError> {
        match side {
            Side::Bid => self.bids.peek_top(),
            Side::Ask => self.asks.peek_top(),
        }
        .ok_or(BookError::EmptyBook)
    }

    /// Remove and return the order at the head of a side
    pub fn remove_top(&mut self, side: Side) -> Result<Order, BookError> {
        let order = match side {
            Side::Bid => self.bids.pop_top(),
            Side::Ask => self.asks.pop_top(),
        }
        .ok_or(BookError::EmptyBook)?;
        self.locator.remove(&order.order_id);
        Ok(order)
    }

    /// Remove an order by id from the addressed side
    pub fn remove(&mut self, side: Side, order_id: OrderId) -> Result<Order, BookError> {
        let not_found = BookError::OrderNotFound { order_id };
        let (stored_side, price) = *self.locator.get(&order_id).ok_or(not_found.clone())?;
        if stored_side != side {
            return Err(not_found);
        }
        let removed = match side {
            Side::Bid => self.bids.remove(order_id, price),
            Side::Ask => self.asks.remove(order_id, price),
        }
        .ok_or(not_found)?;
        self.locator.remove(&order_id);
        Ok(removed)
    }

    /// Reduce a resting order in place after a partial fill
    ///
    /// The order keeps its queue position and stays resting with the
    /// remaining quantity, which is returned.
    pub fn reduce(
        &mut self,
        side: Side,
        order_id: OrderId,
        fill: Quantity,
    ) -> Result<Quantity, BookError> {
        let not_found = BookError::OrderNotFound { order_id };
        let (stored_side, price) = *self.locator.get(&order_id).ok_or(not_found.clone())?;
        if stored_side != side {
            return Err(not_found);
        }
        match side {
            Side::Bid => self.bids.reduce(order_id, price, fill),
            Side::Ask => self.asks.reduce(order_id, price, fill),
        }
        .ok_or(not_found)
    }

    /// Look up a resting order by id
    pub fn get(&self, order_id: OrderId) -> Option<&Order> {
        let (side, price) = *self.locator.get(&order_id)?;
        match side {
            Side::Bid => self.bids.get(order_id, price),
            Side::Ask => self.asks.get(order_id, price),
        }
    }

    /// Status of a resting order (`Resting` or `PartiallyFilled`), or None
    /// if the id no longer rests in the book
    pub fn status_of(&self, order_id: OrderId) -> Option<OrderStatus> {
        self.get(order_id).map(|order| order.status)
    }

    /// Total resting quantity at a price on one side (O(1))
    pub fn volume_at(&self, side: Side, price: Price) -> Quantity {
        match side {
            Side::Bid => self.bids.volume_at(price),
            Side::Ask => self.asks.volume_at(price),
        }
    }

    /// Top-N price levels of a side as (price, total quantity), best first
    pub fn depth(&self, side: Side, levels: usize) -> Vec<(Price, Quantity)> {
        match side {
            Side::Bid => self.bids.depth_snapshot(levels),
            Side::Ask => self.asks.depth_snapshot(levels),
        }
    }

    /// Iterate a side's resting orders in match-priority order
    pub fn iter_side(&self, side: Side) -> Box<dyn Iterator<Item = &Order> + '_> {
        match side {
            Side::Bid => Box::new(self.bids.iter()),
            Side::Ask => Box::new(self.asks.iter()),
        }
    }

    /// Check whether a side has no resting orders
    pub fn is_empty(&self, side: Side) -> bool {
        match side {
            Side::Bid => self.bids.is_empty(),
            Side::Ask => self.asks.is_empty(),
        }
    }

    /// Number of resting orders on a side
    pub fn order_count(&self, side: Side) -> usize {
        match side {
            Side::Bid => self.bids.order_count(),
            Side::Ask => self.asks.order_count(),
        }
    }

    /// Whether an order id currently rests in the book
    pub fn contains(&self, order_id: OrderId) -> bool {
        self.locator.contains_key(&order_id)
    }
}

fn validate_fields(intent: &OrderIntent) -> Result<(Price, Quantity), BookError> {
    let price = intent.price.ok_or_else(|| BookError::MalformedOrder {
        reason: "missing price".to_string(),
    })?;
    let quantity = intent.quantity.ok_or_else(|| BookError::MalformedOrder {
        reason: "missing quantity".to_string(),
    })?;
    if price.is_zero() {
        return Err(BookError::MalformedOrder {
            reason: "price must be positive".to_string(),
        });
    }
    if quantity.is_zero() {
        return Err(BookError::MalformedOrder {
            reason: "quantity must be positive".to_string(),
        });
    }
    Ok((price, quantity))
}

fn missing_id() -> BookError {
    BookError::MalformedOrder {
        reason: "missing order identifier".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::ids::ClientId;

    fn add(side: Side, price: u64, qty: u64) -> OrderIntent {
        OrderIntent::add(
            side,
            Price::from_u64(price),
            Quantity::from_u64(qty),
            ClientId::new("A"),
        )
    }

    #[test]
    fn test_ids_are_monotonic() {
        let mut book = OrderBook::new();
        let id1 = book.submit(add(Side::Bid, 10, 1)).unwrap();
        let id2 = book.submit(add(Side::Ask, 20, 1)).unwrap();
        assert!(id2 > id1);
    }

    #[test]
    fn test_price_methods() {
        let mut book = OrderBook::new();
        for intent in [
            add(Side::Bid, 10, 1),
            add(Side::Bid, 50, 2),
            add(Side::Ask, 100, 3),
            add(Side::Ask, 75, 4),
            add(Side::Bid, 20, 5),
        ] {
            book.submit(intent).unwrap();
        }

        assert_eq!(book.best_bid().unwrap(), Price::from_u64(50));
        assert_eq!(book.best_ask().unwrap(), Price::from_u64(75));
        assert_eq!(book.mid_price().unwrap(), Price::from_str("62.5").unwrap());
    }

    #[test]
    fn test_empty_book_errors() {
        let mut book = OrderBook::new();
        assert_eq!(book.best_bid(), Err(BookError::EmptyBook));
        assert_eq!(book.mid_price(), Err(BookError::EmptyBook));
        assert!(matches!(
            book.peek_top(Side::Ask),
            Err(BookError::EmptyBook)
        ));
        assert_eq!(book.remove_top(Side::Bid), Err(BookError::EmptyBook));

        // one-sided book still has no mid price
        book.submit(add(Side::Bid, 10, 1)).unwrap();
        assert_eq!(book.mid_price(), Err(BookError::EmptyBook));
    }

    #[test]
    fn test_malformed_add_rejected() {
        let mut book = OrderBook::new();

        let mut missing_price = add(Side::Bid, 10, 1);
        missing_price.price = None;
        assert!(matches!(
            book.submit(missing_price),
            Err(BookError::MalformedOrder { .. })
        ));

        let zero_qty = add(Side::Bid, 10, 0);
        assert!(matches!(
            book.submit(zero_qty),
            Err(BookError::MalformedOrder { .. })
        ));

        assert!(book.is_empty(Side::Bid));
    }

    #[test]
    fn test_cancel_restores_prior_state() {
        let mut book = OrderBook::new();
        book.submit(add(Side::Bid, 10, 1)).unwrap();
        let best_before = book.best_bid().unwrap();

        let id = book.submit(add(Side::Bid, 50, 2)).unwrap();
        let cancel = OrderIntent::cancel(id, Side::Bid, ClientId::new("A"));
        book.submit(cancel).unwrap();

        assert_eq!(book.best_bid().unwrap(), best_before);
        assert_eq!(book.order_count(Side::Bid), 1);
        assert!(!book.contains(id));
    }

    #[test]
    fn test_cancel_unknown_id() {
        let mut book = OrderBook::new();
        let cancel = OrderIntent::cancel(OrderId::from_u64(99), Side::Bid, ClientId::new("A"));
        assert_eq!(
            book.submit(cancel),
            Err(BookError::OrderNotFound {
                order_id: OrderId::from_u64(99)
            })
        );
    }

    #[test]
    fn test_cancel_wrong_side_not_found() {
        let mut book = OrderBook::new();
        let id = book.submit(add(Side::Bid, 10, 1)).unwrap();

        let cancel = OrderIntent::cancel(id, Side::Ask, ClientId::new("A"));
        assert!(matches!(
            book.submit(cancel),
            Err(BookError::OrderNotFound { .. })
        ));
        // still resting on the bid side
        assert!(book.contains(id));
    }

    #[test]
    fn test_amend_moves_price_and_forfeits_priority() {
        let mut book = OrderBook::new();
        let first = book.submit(add(Side::Bid, 50, 1)).unwrap();
        let second = book.submit(add(Side::Bid, 50, 2)).unwrap();

        // amend the first order to a new quantity at the same price; it
        // re-enters the level behind the second order
        let amend = OrderIntent::amend(
            first,
            Side::Bid,
            Price::from_u64(50),
            Quantity::from_u64(3),
            ClientId::new("A"),
        );
        book.submit(amend).unwrap();

        assert_eq!(book.peek_top(Side::Bid).unwrap().order_id, second);
        assert_eq!(book.volume_at(Side::Bid, Price::from_u64(50)), Quantity::from_u64(5));

        // amend to a new price re-derives book position
        let amend = OrderIntent::amend(
            first,
            Side::Bid,
            Price::from_u64(60),
            Quantity::from_u64(3),
            ClientId::new("A"),
        );
        book.submit(amend).unwrap();
        assert_eq!(book.best_bid().unwrap(), Price::from_u64(60));
        assert_eq!(book.peek_top(Side::Bid).unwrap().order_id, first);
    }

    #[test]
    fn test_amend_unknown_id() {
        let mut book = OrderBook::new();
        let amend = OrderIntent::amend(
            OrderId::from_u64(7),
            Side::Ask,
            Price::from_u64(10),
            Quantity::from_u64(1),
            ClientId::new("A"),
        );
        assert!(matches!(
            book.submit(amend),
            Err(BookError::OrderNotFound { .. })
        ));
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut book = OrderBook::new();
        let id = book.submit(add(Side::Bid, 10, 1)).unwrap();

        let mut resubmit = add(Side::Ask, 20, 1);
        resubmit.order_id = Some(id);
        assert!(matches!(
            book.submit(resubmit),
            Err(BookError::MalformedOrder { .. })
        ));
    }

    #[test]
    fn test_reduce_keeps_order_resting() {
        let mut book = OrderBook::new();
        let id = book.submit(add(Side::Ask, 75, 4)).unwrap();

        let remaining = book.reduce(Side::Ask, id, Quantity::from_u64(3)).unwrap();
        assert_eq!(remaining, Quantity::from_u64(1));
        assert_eq!(
            book.status_of(id),
            Some(OrderStatus::PartiallyFilled)
        );
        assert_eq!(book.volume_at(Side::Ask, Price::from_u64(75)), Quantity::from_u64(1));
    }

    #[test]
    fn test_remove_top_updates_locator() {
        let mut book = OrderBook::new();
        let id = book.submit(add(Side::Bid, 10, 1)).unwrap();

        let removed = book.remove_top(Side::Bid).unwrap();
        assert_eq!(removed.order_id, id);
        assert!(!book.contains(id));
        assert!(book.is_empty(Side::Bid));
    }

    #[test]
    fn test_id_never_in_both_sides() {
        let mut book = OrderBook::new();
        let bid_id = book.submit(add(Side::Bid, 10, 1)).unwrap();
        let ask_id = book.submit(add(Side::Ask, 20, 1)).unwrap();

        let bid_ids: Vec<OrderId> = book.iter_side(Side::Bid).map(|o| o.order_id).collect();
        let ask_ids: Vec<OrderId> = book.iter_side(Side::Ask).map(|o| o.order_id).collect();
        assert!(bid_ids.contains(&bid_id) && !bid_ids.contains(&ask_id));
        assert!(ask_ids.contains(&ask_id) && !ask_ids.contains(&bid_id));
    }
}
