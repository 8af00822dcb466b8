//! # Transaction processor
//!
//! Drives a transaction through its lifecycle against an account backend:
//! validate, declare the working set, stage the handler's mutations, then
//! commit the staging layer only when the handler returned no errors. A
//! rejected transaction therefore leaves the backend untouched even though
//! the handler kept mutating after its first error.
//!
//! `undo` runs the same stage/commit path with the handler's inverse and
//! is used to unwind committed transactions during chain reorganization.

use tracing::{debug, warn};

use crate::errors::TxError;
use crate::params::ProtocolParams;
use crate::store::{AccountBackend, StateStore};
use crate::transactions::CrowdfundTransaction;

pub struct TransactionProcessor<B: AccountBackend> {
    backend: B,
    params: ProtocolParams,
}

impl<B: AccountBackend> TransactionProcessor<B> {
    pub fn new(backend: B, params: ProtocolParams) -> Self {
        TransactionProcessor { backend, params }
    }

    pub fn params(&self) -> &ProtocolParams {
        &self.params
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Cross-transaction checks over one pending batch: two registrations
    /// resolving to the same fundraiser address reject the later one.
    pub fn check_batch(&self, transactions: &[CrowdfundTransaction]) -> Vec<TxError> {
        let mut errors = Vec::new();
        let registers: Vec<_> = transactions
            .iter()
            .filter_map(|tx| match tx {
                CrowdfundTransaction::Register(register) => Some(register),
                _ => None,
            })
            .collect();

        for (index, register) in registers.iter().enumerate() {
            errors.extend(register.verify_against(&registers[index + 1..]));
        }
        errors
    }

    /// Apply one transaction at chain time `now`. Commits on success;
    /// discards every staged mutation and returns the collected errors
    /// otherwise.
    pub fn apply(
        &mut self,
        now: i64,
        tx: &CrowdfundTransaction,
    ) -> Result<(), Vec<TxError>> {
        let errors = tx.validate();
        if !errors.is_empty() {
            warn!(id = %tx.header().id, kind = tx.kind(), "transaction failed validation");
            return Err(errors);
        }

        let mut store = StateStore::new(&mut self.backend, now);
        store.cache(&tx.working_set());
        let errors = tx.apply(&mut store, &self.params);
        if errors.is_empty() {
            store.commit();
            debug!(id = %tx.header().id, kind = tx.kind(), "transaction applied");
            Ok(())
        } else {
            warn!(id = %tx.header().id, kind = tx.kind(), count = errors.len(), "transaction rejected");
            Err(errors)
        }
    }

    /// Roll back one previously committed transaction.
    pub fn undo(
        &mut self,
        now: i64,
        tx: &CrowdfundTransaction,
    ) -> Result<(), Vec<TxError>> {
        let mut store = StateStore::new(&mut self.backend, now);
        store.cache(&tx.working_set());
        let errors = tx.undo(&mut store, &self.params);
        if errors.is_empty() {
            store.commit();
            debug!(id = %tx.header().id, kind = tx.kind(), "transaction undone");
            Ok(())
        } else {
            warn!(id = %tx.header().id, kind = tx.kind(), count = errors.len(), "undo rejected");
            Err(errors)
        }
    }
}
