//! Matching core
//!
//! In-memory limit-order matching for a single instrument: an order book
//! with a price-level index, a matching engine with two-phase solvency
//! checks and midpoint execution pricing, a client registry, and an
//! append-only transaction ledger.
//!
//! **Key invariants:**
//! - Bids non-increasing and asks non-decreasing in price, FIFO within a
//!   price level
//! - An order id rests on at most one side, at most once, and is never
//!   reused
//! - No self-trades
//! - Client balances never go negative; solvency is checked before every
//!   balance mutation
//! - Ledger timestamps are non-decreasing in append order
//!
//! The core is single-threaded and synchronous; each public operation is
//! one logical critical section.

pub mod book;
pub mod clock;
pub mod engine;
pub mod ledger;
pub mod matching;
pub mod registry;

pub use engine::MatchingEngine;
