//! # Account store
//!
//! Typed access to the key-value account store, split into two layers:
//!
//! | Layer | Role |
//! |-------|------|
//! | [`AccountBackend`] | Durable key-value storage keyed by address |
//! | [`StateStore`]     | Per-transaction staging over a backend |
//!
//! A [`StateStore`] is created for exactly one transaction. The handler
//! first declares its working set with [`StateStore::cache`] (the batched
//! prefetch step); any read or write of an undeclared address is a
//! [`StoreError::Undeclared`]. Writes land in a staging map and reach the
//! backend only through [`StateStore::commit`] — the processor drops the
//! store instead when the handler returned errors, which is what makes
//! "collect errors but mutate anyway" safe.
//!
//! The store also carries the chain clock: the timestamp of the most
//! recently committed block, the single logical "now" of every
//! time-window check.

use std::collections::{HashMap, HashSet};

use crate::address::Address;
use crate::errors::StoreError;
use crate::types::Account;

/// Durable account storage.
pub trait AccountBackend {
    fn load(&self, address: &Address) -> Option<Account>;
    fn save(&mut self, account: Account);
}

/// In-memory backend used by the replayer and by tests.
#[derive(Debug, Default)]
pub struct MemoryAccounts {
    accounts: HashMap<Address, Account>,
}

impl MemoryAccounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, account: Account) {
        self.accounts.insert(account.address.clone(), account);
    }

    pub fn get(&self, address: &Address) -> Option<&Account> {
        self.accounts.get(address)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Account> {
        self.accounts.values()
    }
}

impl AccountBackend for MemoryAccounts {
    fn load(&self, address: &Address) -> Option<Account> {
        self.accounts.get(address).cloned()
    }

    fn save(&mut self, account: Account) {
        self.accounts.insert(account.address.clone(), account);
    }
}

/// Per-transaction staging store with a declared working set.
pub struct StateStore<'a> {
    backend: &'a mut dyn AccountBackend,
    /// Timestamp of the last committed block.
    now: i64,
    declared: HashSet<Address>,
    staged: HashMap<Address, Account>,
}

impl<'a> StateStore<'a> {
    pub fn new(backend: &'a mut dyn AccountBackend, now: i64) -> Self {
        StateStore {
            backend,
            now,
            declared: HashSet::new(),
            staged: HashMap::new(),
        }
    }

    /// The chain clock.
    pub fn now(&self) -> i64 {
        self.now
    }

    /// Declare the working set for the current transaction. The backend may
    /// use this for batched prefetching; this implementation only records
    /// the set for enforcement.
    pub fn cache(&mut self, addresses: &[Address]) {
        self.declared.extend(addresses.iter().cloned());
    }

    /// Fetch a declared account; fails with `NotFound` if it does not exist.
    pub fn get(&self, address: &Address) -> Result<Account, StoreError> {
        self.check_declared(address)?;
        if let Some(account) = self.staged.get(address) {
            return Ok(account.clone());
        }
        self.backend
            .load(address)
            .ok_or_else(|| StoreError::NotFound(address.clone()))
    }

    /// Fetch a declared account, or a zero-value account if absent.
    pub fn get_or_default(&self, address: &Address) -> Result<Account, StoreError> {
        self.check_declared(address)?;
        if let Some(account) = self.staged.get(address) {
            return Ok(account.clone());
        }
        Ok(self
            .backend
            .load(address)
            .unwrap_or_else(|| Account::new(address.clone())))
    }

    /// Stage a replacement of the stored record.
    pub fn set(&mut self, account: Account) -> Result<(), StoreError> {
        self.check_declared(&account.address)?;
        self.staged.insert(account.address.clone(), account);
        Ok(())
    }

    /// Write all staged records to the backend. Dropping the store without
    /// calling this discards every staged mutation.
    pub fn commit(self) {
        for (_, account) in self.staged {
            self.backend.save(account);
        }
    }

    fn check_declared(&self, address: &Address) -> Result<(), StoreError> {
        if self.declared.contains(address) {
            Ok(())
        } else {
            Err(StoreError::Undeclared(address.clone()))
        }
    }
}
