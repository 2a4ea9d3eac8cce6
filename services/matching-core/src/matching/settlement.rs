//! Trade settlement
//!
//! Computes the execution terms of a crossed bid/ask pair and performs the
//! balance transfer between counterparties. All checks run before any
//! balance is touched, so a rejected settlement mutates nothing.

use types::errors::EngineError;
use types::numeric::{Price, Quantity};
use types::order::Order;
use types::trade::Fill;

use crate::registry::ClientRegistry;

/// Execution terms for a crossed bid/ask pair
///
/// Price is the midpoint of the two limit prices: the price improvement
/// is shared equally between both sides. Quantity is the smaller of the
/// two orders; the larger order keeps its remainder in the book.
pub fn execution_terms(bid: &Order, ask: &Order) -> (Price, Quantity) {
    (
        Price::midpoint(bid.price, ask.price),
        bid.quantity.min(ask.quantity),
    )
}

/// Transfer balances for a fill
///
/// Debits the buyer's cash by the notional and credits their asset balance
/// by the quantity; the symmetric opposite for the seller. Rejects a
/// self-trade without mutating anything; structurally unreachable after
/// the engine's skip-scan, kept as an invariant check.
pub fn transfer(registry: &mut ClientRegistry, fill: &Fill) -> Result<(), EngineError> {
    if fill.is_self_trade() {
        return Err(EngineError::SelfTradeRejected);
    }
    if !registry.contains(&fill.buyer) {
        return Err(EngineError::UnknownClient {
            client_id: fill.buyer.clone(),
        });
    }
    if !registry.contains(&fill.seller) {
        return Err(EngineError::UnknownClient {
            client_id: fill.seller.clone(),
        });
    }

    let cost = fill.notional();

    // Both accounts exist and were revalidated by the engine this step;
    // records are never removed, so these lookups cannot fail.
    let buyer = registry
        .account_mut(&fill.buyer)
        .expect("buyer account checked above");
    buyer.debit_cash(cost);
    buyer.credit_asset(fill.quantity);

    let seller = registry
        .account_mut(&fill.seller)
        .expect("seller account checked above");
    seller.credit_cash(cost);
    seller.debit_asset(fill.quantity);

    Ok(())
}
