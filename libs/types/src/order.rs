//! Order intents and resting-order lifecycle types

use crate::ids::{ClientId, OrderId};
use crate::numeric::{Price, Quantity};
use serde::{Deserialize, Serialize};

/// Order side (resting intent to buy or sell)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    /// Buy interest
    Bid,
    /// Sell interest
    Ask,
}

impl Side {
    /// Get the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            Side::Bid => Side::Ask,
            Side::Ask => Side::Bid,
        }
    }
}

/// What an inbound intent asks the book to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderAction {
    /// Admit a new resting order
    Add,
    /// Replace the mutable fields of a resting order
    Amend,
    /// Remove a resting order
    Cancel,
}

/// An inbound order intent, before admission to the book
///
/// Price and quantity are optional at this stage so that a structurally
/// incomplete intent can be rejected with `MalformedOrder` rather than
/// failing to construct. Add intents carry no id; the book assigns one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderIntent {
    pub action: OrderAction,
    pub side: Side,
    pub price: Option<Price>,
    pub quantity: Option<Quantity>,
    pub client_id: ClientId,
    pub order_id: Option<OrderId>,
}

impl OrderIntent {
    /// Intent to admit a new order
    pub fn add(side: Side, price: Price, quantity: Quantity, client_id: ClientId) -> Self {
        Self {
            action: OrderAction::Add,
            side,
            price: Some(price),
            quantity: Some(quantity),
            client_id,
            order_id: None,
        }
    }

    /// Intent to replace the price and quantity of a resting order
    pub fn amend(
        order_id: OrderId,
        side: Side,
        price: Price,
        quantity: Quantity,
        client_id: ClientId,
    ) -> Self {
        Self {
            action: OrderAction::Amend,
            side,
            price: Some(price),
            quantity: Some(quantity),
            client_id,
            order_id: Some(order_id),
        }
    }

    /// Intent to remove a resting order
    pub fn cancel(order_id: OrderId, side: Side, client_id: ClientId) -> Self {
        Self {
            action: OrderAction::Cancel,
            side,
            price: None,
            quantity: None,
            client_id,
            order_id: Some(order_id),
        }
    }
}

/// Lifecycle state of an order
///
/// Pending → Resting → Filled | PartiallyFilled | Cancelled.
/// PartiallyFilled orders remain in the book with reduced quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Submitted and balance-validated, not yet in the book
    Pending,
    /// Admitted to the book
    Resting,
    /// Quantity reduced by a match, still resting
    PartiallyFilled,
    /// Fully matched and removed (terminal)
    Filled,
    /// Removed by explicit cancel or automatic invalidation (terminal)
    Cancelled,
}

impl OrderStatus {
    /// Check if the status is terminal (no further transitions possible)
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Filled | OrderStatus::Cancelled)
    }
}

/// A resting order owned by the order book
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: OrderId,
    pub client_id: ClientId,
    pub side: Side,
    pub price: Price,
    pub quantity: Quantity,
    pub status: OrderStatus,
}

impl Order {
    /// Create a resting order at admission
    pub fn new(
        order_id: OrderId,
        client_id: ClientId,
        side: Side,
        price: Price,
        quantity: Quantity,
    ) -> Self {
        Self {
            order_id,
            client_id,
            side,
            price,
            quantity,
            status: OrderStatus::Resting,
        }
    }

    /// Reduce quantity in place after a partial fill
    ///
    /// # Panics
    /// Panics if the fill is not strictly smaller than the remaining
    /// quantity; a full fill must remove the order instead.
    pub fn reduce(&mut self, fill: Quantity) {
        assert!(
            fill < self.quantity,
            "partial fill must leave a positive remainder"
        );
        self.quantity = self
            .quantity
            .checked_sub(fill)
            .expect("fill bounded by remaining quantity");
        self.status = OrderStatus::PartiallyFilled;
    }

    /// Mark the order fully matched
    ///
    /// # Panics
    /// Panics if the order is already in a terminal state.
    pub fn fill(&mut self) {
        assert!(!self.status.is_terminal(), "cannot fill a terminal order");
        self.status = OrderStatus::Filled;
    }

    /// Mark the order cancelled (explicit cancel or invalidation)
    ///
    /// # Panics
    /// Panics if the order is already in a terminal state.
    pub fn cancel(&mut self) {
        assert!(!self.status.is_terminal(), "cannot cancel a terminal order");
        self.status = OrderStatus::Cancelled;
    }
}
