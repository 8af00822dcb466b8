//! Error types.
//!
//! Business-rule violations are structured [`TxError`] records collected into
//! lists and attached to a transaction id — they never abort the process.
//! Infrastructure failures at the store boundary are a separate
//! [`StoreError`] enum.

use serde::Serialize;
use thiserror::Error;

use crate::address::Address;

/// A structured business-rule error attached to one transaction.
///
/// `field`, `actual` and `expected` narrow the report down to the offending
/// payload field the way the original wire format did; all three are
/// optional.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TxError {
    pub message: String,
    pub transaction_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
}

impl TxError {
    pub fn new(message: impl Into<String>, transaction_id: impl Into<String>) -> Self {
        TxError {
            message: message.into(),
            transaction_id: transaction_id.into(),
            field: None,
            actual: None,
            expected: None,
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn with_actual(mut self, actual: impl ToString) -> Self {
        self.actual = Some(actual.to_string());
        self
    }

    pub fn with_expected(mut self, expected: impl ToString) -> Self {
        self.expected = Some(expected.to_string());
        self
    }

    /// Wrap a store failure so it travels in the same error list as the
    /// business-rule errors of the transaction that triggered it.
    pub fn from_store(err: StoreError, transaction_id: &str) -> Self {
        TxError::new(err.to_string(), transaction_id)
    }
}

/// Failures at the account-store boundary.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("account not found: {0}")]
    NotFound(Address),

    #[error("address was not declared in the transaction working set: {0}")]
    Undeclared(Address),
}
