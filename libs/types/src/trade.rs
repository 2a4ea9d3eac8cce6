//! Fill and trade types
//!
//! A `Fill` is the outcome of one settled match; the ledger stamps it with
//! a timestamp and a trade id to produce an immutable `Trade`.

use crate::ids::{ClientId, TradeId};
use crate::numeric::{notional, Price, Quantity};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A settled match, before the ledger assigns its timestamp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fill {
    pub buyer: ClientId,
    pub seller: ClientId,
    pub price: Price,
    pub quantity: Quantity,
}

impl Fill {
    pub fn new(buyer: ClientId, seller: ClientId, price: Price, quantity: Quantity) -> Self {
        Self {
            buyer,
            seller,
            price,
            quantity,
        }
    }

    /// Trade value (price × quantity)
    pub fn notional(&self) -> Decimal {
        notional(self.price, self.quantity)
    }

    /// A fill where buyer and seller coincide must never settle
    pub fn is_self_trade(&self) -> bool {
        self.buyer == self.seller
    }
}

/// A completed trade recorded in the ledger
///
/// Immutable once appended; the timestamp is assigned by the ledger at
/// append time and is non-decreasing across the history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub trade_id: TradeId,
    pub buyer: ClientId,
    pub seller: ClientId,
    pub price: Price,
    pub quantity: Quantity,
    pub executed_at: DateTime<Utc>,
}

impl Trade {
    /// Stamp a fill into a trade record
    pub fn from_fill(fill: Fill, executed_at: DateTime<Utc>) -> Self {
        Self {
            trade_id: TradeId::new(),
            buyer: fill.buyer,
            seller: fill.seller,
            price: fill.price,
            quantity: fill.quantity,
            executed_at,
        }
    }

    /// Trade value (price × quantity)
    pub fn notional(&self) -> Decimal {
        notional(self.price, self.quantity)
    }

    pub fn is_self_trade(&self) -> bool {
        self.buyer == self.seller
    }
}
