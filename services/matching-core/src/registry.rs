//! Client registry
//!
//! Holds each participant's cash and asset balances. Conceptually owned by
//! the integration layer; within the core only settlement mutates it, and
//! client records are never destroyed.

use std::collections::HashMap;

use rust_decimal::Decimal;
use types::account::ClientAccount;
use types::ids::ClientId;

/// Balance records keyed by client id
#[derive(Debug, Clone, Default)]
pub struct ClientRegistry {
    accounts: HashMap<ClientId, ClientAccount>,
}

impl ClientRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a client with initial balances, replacing any prior record
    pub fn register(&mut self, client_id: ClientId, cash: Decimal, asset: Decimal) {
        self.accounts
            .insert(client_id, ClientAccount::new(cash, asset));
    }

    /// Look up a client's balances
    pub fn account(&self, client_id: &ClientId) -> Option<&ClientAccount> {
        self.accounts.get(client_id)
    }

    /// Mutable access to a client's balances
    ///
    /// Used by settlement, and by the embedding layer for deposits and
    /// withdrawals between matching steps.
    pub fn account_mut(&mut self, client_id: &ClientId) -> Option<&mut ClientAccount> {
        self.accounts.get_mut(client_id)
    }

    pub fn contains(&self, client_id: &ClientId) -> bool {
        self.accounts.contains_key(client_id)
    }

    /// Iterate all registered clients
    pub fn iter(&self) -> impl Iterator<Item = (&ClientId, &ClientAccount)> {
        self.accounts.iter()
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}
