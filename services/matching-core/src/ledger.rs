//! Transaction ledger
//!
//! Append-only record of completed trades. The ledger assigns timestamps
//! from its own clock at append time, so the history is non-decreasing in
//! time; the recent-volume scan relies on that to stop early.

use types::trade::{Fill, Trade};

use crate::clock::{Clock, SystemClock};

/// Append-only trade log with a sliding one-second volume metric
#[derive(Debug, Clone)]
pub struct TransactionLedger<C: Clock = SystemClock> {
    history: Vec<Trade>,
    total: u64,
    clock: C,
}

impl TransactionLedger<SystemClock> {
    /// Create a ledger stamped by the system clock
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for TransactionLedger<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> TransactionLedger<C> {
    /// Create a ledger stamped by the given clock
    pub fn with_clock(clock: C) -> Self {
        Self {
            history: Vec::new(),
            total: 0,
            clock,
        }
    }

    /// Stamp a fill with the current time and append it
    ///
    /// Trades are immutable once appended and never removed.
    pub fn append(&mut self, fill: Fill) -> Trade {
        let trade = Trade::from_fill(fill, self.clock.now());
        self.history.push(trade.clone());
        self.total += 1;
        trade
    }

    /// Full trade history, oldest first
    pub fn history(&self) -> &[Trade] {
        &self.history
    }

    /// Lifetime count of appended trades
    pub fn total_volume(&self) -> u64 {
        self.total
    }

    /// Number of trades executed within the last second
    ///
    /// Scans backward from the newest trade and stops at the first entry
    /// older than the window; correct because append order is time order.
    pub fn volume_in_last_second(&self) -> u64 {
        let cutoff = self.clock.now() - chrono::Duration::seconds(1);
        let mut volume = 0;
        for trade in self.history.iter().rev() {
            if trade.executed_at < cutoff {
                break;
            }
            volume += 1;
        }
        volume
    }
}
