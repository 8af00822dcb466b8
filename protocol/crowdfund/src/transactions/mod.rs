//! # Transactions
//!
//! The seven transaction kinds, one module per kind. Each handler owns the
//! full lifecycle of its kind:
//!
//! | Step | Contract |
//! |------|----------|
//! | `working_set` | The exact addresses apply/undo may touch |
//! | `validate`    | Pure payload checks, no store access |
//! | `apply`       | Stages mutations, collects errors, never throws |
//! | `undo`        | Exact algebraic inverse of `apply` |
//!
//! `apply` deliberately keeps mutating after recording an error; the
//! processor discards the whole staging layer when the returned list is
//! non-empty, so a partially-wrong transaction never reaches the backend
//! but a fully-valid one is applied exactly once.

use serde::{Deserialize, Serialize};

use crate::address::{Address, PublicKey};
use crate::errors::TxError;
use crate::params::ProtocolParams;
use crate::store::StateStore;

mod claim;
mod comment;
mod fund;
mod refund;
mod register;
mod start;
mod vote;

pub use claim::{amount_to_claim, ClaimAsset, ClaimTransaction};
pub use comment::{CommentAsset, CommentTransaction};
pub use fund::{FundAsset, FundTransaction};
pub use refund::{RefundAsset, RefundTransaction};
pub use register::{RegisterAsset, RegisterTransaction};
pub use start::{StartAsset, StartTransaction};
pub use vote::{voting_window_open, VoteAsset, VoteTransaction};

/// The envelope fields common to every transaction kind.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxHeader {
    pub id: String,
    pub sender_address: Address,
    pub sender_public_key: PublicKey,
}

/// The closed set of transaction kinds, dispatched by tag.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CrowdfundTransaction {
    Register(RegisterTransaction),
    Fund(FundTransaction),
    Start(StartTransaction),
    Vote(VoteTransaction),
    Claim(ClaimTransaction),
    Refund(RefundTransaction),
    Comment(CommentTransaction),
}

impl CrowdfundTransaction {
    pub fn header(&self) -> &TxHeader {
        match self {
            Self::Register(tx) => &tx.header,
            Self::Fund(tx) => &tx.header,
            Self::Start(tx) => &tx.header,
            Self::Vote(tx) => &tx.header,
            Self::Claim(tx) => &tx.header,
            Self::Refund(tx) => &tx.header,
            Self::Comment(tx) => &tx.header,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Register(_) => "register",
            Self::Fund(_) => "fund",
            Self::Start(_) => "start",
            Self::Vote(_) => "vote",
            Self::Claim(_) => "claim",
            Self::Refund(_) => "refund",
            Self::Comment(_) => "comment",
        }
    }

    /// The addresses this transaction is allowed to touch, declared up
    /// front so the store can batch its reads.
    pub fn working_set(&self) -> Vec<Address> {
        match self {
            Self::Register(tx) => tx.working_set(),
            Self::Fund(tx) => tx.working_set(),
            Self::Start(tx) => tx.working_set(),
            Self::Vote(tx) => tx.working_set(),
            Self::Claim(tx) => tx.working_set(),
            Self::Refund(tx) => tx.working_set(),
            Self::Comment(tx) => tx.working_set(),
        }
    }

    /// Payload-only checks; never reads the store.
    pub fn validate(&self) -> Vec<TxError> {
        match self {
            Self::Register(tx) => tx.validate(),
            Self::Fund(tx) => tx.validate(),
            Self::Start(tx) => tx.validate(),
            Self::Vote(tx) => tx.validate(),
            Self::Claim(tx) => tx.validate(),
            Self::Refund(tx) => tx.validate(),
            Self::Comment(tx) => tx.validate(),
        }
    }

    pub fn apply(&self, store: &mut StateStore<'_>, params: &ProtocolParams) -> Vec<TxError> {
        match self {
            Self::Register(tx) => tx.apply(store),
            Self::Fund(tx) => tx.apply(store, params),
            Self::Start(tx) => tx.apply(store),
            Self::Vote(tx) => tx.apply(store, params),
            Self::Claim(tx) => tx.apply(store, params),
            Self::Refund(tx) => tx.apply(store, params),
            Self::Comment(tx) => tx.apply(store),
        }
    }

    pub fn undo(&self, store: &mut StateStore<'_>, params: &ProtocolParams) -> Vec<TxError> {
        match self {
            Self::Register(tx) => tx.undo(store),
            Self::Fund(tx) => tx.undo(store),
            Self::Start(tx) => tx.undo(store),
            Self::Vote(tx) => tx.undo(store, params),
            Self::Claim(tx) => tx.undo(store),
            Self::Refund(tx) => tx.undo(store),
            Self::Comment(tx) => tx.undo(store),
        }
    }
}

/// Period index at `now` for a project started at `start`, counting from
/// project start and rounding partial periods up.
pub(crate) fn current_period(now: i64, start: i64, period_len: i64) -> i64 {
    ceil_div(now - start, period_len)
}

/// Ceiling division for a possibly-negative numerator and positive divisor.
pub(crate) fn ceil_div(numerator: i64, divisor: i64) -> i64 {
    let quotient = numerator / divisor;
    if numerator % divisor > 0 {
        quotient + 1
    } else {
        quotient
    }
}
