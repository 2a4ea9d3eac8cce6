//! Error taxonomy for the matching core
//!
//! Structural book failures (`BookError`) are separated from the engine's
//! business conditions (`EngineError`). `EmptyBook` and `NoCrossing` are
//! non-fatal statuses of a no-op `execute` step, surfaced as errors so no
//! condition is silently swallowed. Every failure path leaves book,
//! registry, and ledger invariants intact.

use crate::ids::{ClientId, OrderId};
use rust_decimal::Decimal;
use thiserror::Error;

/// Structural order-book failures
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BookError {
    /// A required intent field is absent or invalid
    #[error("malformed order: {reason}")]
    MalformedOrder { reason: String },

    /// Cancel or amend addressed an identifier not resting on that side
    #[error("order not found: {order_id}")]
    OrderNotFound { order_id: OrderId },

    /// A queried or matched side has no resting orders
    #[error("order book side is empty")]
    EmptyBook,
}

/// Matching-engine error taxonomy
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("book error: {0}")]
    Book(#[from] BookError),

    /// The submitting client has never been registered
    #[error("unknown client: {client_id}")]
    UnknownClient { client_id: ClientId },

    /// Bid admission: price × quantity exceeds the client's cash
    #[error("insufficient cash balance: required {required}, available {available}")]
    InsufficientBalance { required: Decimal, available: Decimal },

    /// Ask admission: quantity exceeds the client's asset balance
    #[error("insufficient asset balance: required {required}, available {available}")]
    InsufficientAsset { required: Decimal, available: Decimal },

    /// No eligible bid crosses the top ask; the book is unchanged
    #[error("no crossing interest at the top of the book")]
    NoCrossing,

    /// A resting order failed revalidation at match time and was cancelled
    #[error("resting order {order_id} failed revalidation and was cancelled")]
    ExecutionInvalidated { order_id: OrderId },

    /// Defensive check: buyer and seller resolved to the same client
    #[error("buyer and seller are the same client; settlement rejected")]
    SelfTradeRejected,
}
