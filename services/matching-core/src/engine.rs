//! Matching engine core
//!
//! Orchestrates the order book, client registry, and transaction ledger:
//! validates inbound orders against client balances, detects crossed
//! top-of-book interest, re-validates and settles, and appends completed
//! trades to the ledger.
//!
//! Solvency is checked twice by design: once at admission and again at
//! execution time. Nothing is escrowed in between, so a client with
//! several resting orders drawing on one balance can pass admission and
//! still fail at match time; that order is then cancelled automatically.

use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use types::account::ClientAccount;
use types::errors::{BookError, EngineError};
use types::ids::{ClientId, OrderId};
use types::numeric::{notional, Price, Quantity};
use types::order::{Order, OrderIntent, OrderStatus, Side};
use types::trade::{Fill, Trade};

use crate::book::OrderBook;
use crate::clock::{Clock, SystemClock};
use crate::ledger::TransactionLedger;
use crate::matching::{crossing, settlement};
use crate::registry::ClientRegistry;

/// Matching engine for a single instrument
///
/// Single-threaded and synchronous: each public method is one logical
/// critical section that completes or fails without suspension, so a
/// half-matched book is never observable.
#[derive(Debug)]
pub struct MatchingEngine<C: Clock = SystemClock> {
    book: OrderBook,
    registry: ClientRegistry,
    ledger: TransactionLedger<C>,
}

impl MatchingEngine<SystemClock> {
    /// Create an engine stamped by the system clock
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for MatchingEngine<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> MatchingEngine<C> {
    /// Create an engine whose ledger is stamped by the given clock
    pub fn with_clock(clock: C) -> Self {
        Self {
            book: OrderBook::new(),
            registry: ClientRegistry::new(),
            ledger: TransactionLedger::with_clock(clock),
        }
    }

    /// Register a client with initial cash and asset balances
    pub fn register_client(&mut self, client_id: ClientId, cash: Decimal, asset: Decimal) {
        debug!(client = %client_id, %cash, %asset, "client registered");
        self.registry.register(client_id, cash, asset);
    }

    /// Submit a new order after an admission-time solvency check
    ///
    /// A bid must be covered by the client's cash at its full notional; an
    /// ask must be covered by the client's asset balance. Balances are not
    /// reserved; they are re-checked when the order matches.
    pub fn submit_order(
        &mut self,
        side: Side,
        price: Price,
        quantity: Quantity,
        client_id: ClientId,
    ) -> Result<OrderId, EngineError> {
        self.check_solvency(&client_id, side, price, quantity)?;

        let intent = OrderIntent::add(side, price, quantity, client_id.clone());
        let order_id = self.book.submit(intent)?;
        debug!(order = %order_id, client = %client_id, ?side, %price, %quantity, "order admitted");
        Ok(order_id)
    }

    /// Replace the price and quantity of a resting order
    ///
    /// The new terms pass the same solvency gate as a fresh submission.
    /// Amend is logically cancel-then-reinsert, so time priority at the
    /// old price is forfeited.
    pub fn amend_order(
        &mut self,
        order_id: OrderId,
        side: Side,
        price: Price,
        quantity: Quantity,
    ) -> Result<OrderId, EngineError> {
        let client_id = self
            .book
            .get(order_id)
            .map(|order| order.client_id.clone())
            .ok_or(BookError::OrderNotFound { order_id })?;
        self.check_solvency(&client_id, side, price, quantity)?;

        let intent = OrderIntent::amend(order_id, side, price, quantity, client_id);
        self.book.submit(intent)?;
        debug!(order = %order_id, ?side, %price, %quantity, "order amended");
        Ok(order_id)
    }

    /// Cancel a resting order on the addressed side
    pub fn cancel_order(&mut self, order_id: OrderId, side: Side) -> Result<(), EngineError> {
        let mut removed = self.book.remove(side, order_id)?;
        removed.cancel();
        debug!(order = %order_id, ?side, "order cancelled");
        Ok(())
    }

    /// Attempt exactly one match
    ///
    /// Reads the top ask, scans bids from the top skipping the ask
    /// client's own bids, and settles if the selected bid crosses. A party
    /// that fails re-validation has its order removed and the condition is
    /// surfaced as `ExecutionInvalidated`. The engine never drains the
    /// book; callers invoke `execute` again while crossing interest
    /// remains.
    pub fn execute(&mut self) -> Result<Trade, EngineError> {
        if self.book.is_empty(Side::Bid) || self.book.is_empty(Side::Ask) {
            return Err(BookError::EmptyBook.into());
        }

        let ask = self.book.peek_top(Side::Ask)?.clone();

        // Self-trade avoidance: skip over (but do not remove) bids resting
        // for the same client as the top ask.
        let bid = match self
            .book
            .iter_side(Side::Bid)
            .find(|order| order.client_id != ask.client_id)
        {
            Some(order) => order.clone(),
            None => return Err(EngineError::NoCrossing),
        };

        if !crossing::can_match(bid.price, ask.price) {
            return Err(EngineError::NoCrossing);
        }

        // Execution-time re-validation with current balances, exactly as
        // at submission.
        self.revalidate(&bid)?;
        self.revalidate(&ask)?;

        let (price, quantity) = settlement::execution_terms(&bid, &ask);
        let fill = Fill::new(bid.client_id.clone(), ask.client_id.clone(), price, quantity);
        if fill.is_self_trade() {
            // unreachable after the skip-scan; nothing mutated
            return Err(EngineError::SelfTradeRejected);
        }

        // Remove the fully consumed side(s); an order with remainder is
        // reduced in place and keeps its queue position.
        if bid.quantity > quantity {
            self.book.reduce(Side::Bid, bid.order_id, quantity)?;
        } else {
            self.book.remove(Side::Bid, bid.order_id)?;
        }
        if ask.quantity > quantity {
            self.book.reduce(Side::Ask, ask.order_id, quantity)?;
        } else {
            self.book.remove(Side::Ask, ask.order_id)?;
        }

        settlement::transfer(&mut self.registry, &fill)?;
        let trade = self.ledger.append(fill);
        info!(
            buyer = %trade.buyer,
            seller = %trade.seller,
            price = %trade.price,
            quantity = %trade.quantity,
            "trade executed"
        );
        Ok(trade)
    }

    /// Admission-time solvency check against current balances
    fn check_solvency(
        &self,
        client_id: &ClientId,
        side: Side,
        price: Price,
        quantity: Quantity,
    ) -> Result<(), EngineError> {
        let account = self
            .registry
            .account(client_id)
            .ok_or_else(|| EngineError::UnknownClient {
                client_id: client_id.clone(),
            })?;
        match side {
            Side::Bid => {
                let required = notional(price, quantity);
                if !account.can_cover(required) {
                    return Err(EngineError::InsufficientBalance {
                        required,
                        available: account.cash,
                    });
                }
            }
            Side::Ask => {
                if !account.can_deliver(quantity) {
                    return Err(EngineError::InsufficientAsset {
                        required: quantity.as_decimal(),
                        available: account.asset,
                    });
                }
            }
        }
        Ok(())
    }

    /// Re-validate a matched order; on failure the order is removed from
    /// the book (cancelled) and the condition surfaced
    fn revalidate(&mut self, order: &Order) -> Result<(), EngineError> {
        match self.check_solvency(&order.client_id, order.side, order.price, order.quantity) {
            Ok(()) => Ok(()),
            Err(err @ EngineError::UnknownClient { .. }) => Err(err),
            Err(_) => {
                let mut removed = self.book.remove(order.side, order.order_id)?;
                removed.cancel();
                warn!(
                    order = %order.order_id,
                    client = %order.client_id,
                    "resting order no longer solvent; cancelled at execution"
                );
                Err(EngineError::ExecutionInvalidated {
                    order_id: order.order_id,
                })
            }
        }
    }

    /// Best bid price
    pub fn best_bid(&self) -> Result<Price, EngineError> {
        Ok(self.book.best_bid()?)
    }

    /// Best ask price
    pub fn best_ask(&self) -> Result<Price, EngineError> {
        Ok(self.book.best_ask()?)
    }

    /// Midpoint of best bid and best ask
    pub fn mid_price(&self) -> Result<Price, EngineError> {
        Ok(self.book.mid_price()?)
    }

    /// Top-N depth of one side as (price, total quantity), best first
    pub fn depth(&self, side: Side, levels: usize) -> Vec<(Price, Quantity)> {
        self.book.depth(side, levels)
    }

    /// Total resting quantity at a price on one side
    pub fn volume_at(&self, side: Side, price: Price) -> Quantity {
        self.book.volume_at(side, price)
    }

    /// Status of a resting order, or None once it has left the book
    pub fn order_status(&self, order_id: OrderId) -> Option<OrderStatus> {
        self.book.status_of(order_id)
    }

    /// A client's current balances
    pub fn account(&self, client_id: &ClientId) -> Option<&ClientAccount> {
        self.registry.account(client_id)
    }

    /// Mutable access to a client's balances, for the embedding layer
    pub fn account_mut(&mut self, client_id: &ClientId) -> Option<&mut ClientAccount> {
        self.registry.account_mut(client_id)
    }

    /// Full trade history, oldest first
    pub fn transaction_history(&self) -> &[Trade] {
        self.ledger.history()
    }

    /// Lifetime count of completed trades
    pub fn total_volume(&self) -> u64 {
        self.ledger.total_volume()
    }

    /// Trades executed within the last second
    pub fn volume_in_last_second(&self) -> u64 {
        self.ledger.volume_in_last_second()
    }

    /// Read-only view of the order book
    pub fn book(&self) -> &OrderBook {
        &self.book
    }

    /// Read-only view of the client registry
    pub fn registry(&self) -> &ClientRegistry {
        &self.registry
    }
}
