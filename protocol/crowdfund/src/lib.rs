//! # Crowdfund Protocol
//!
//! Application-level semantics of a crowdfunding campaign running as seven
//! custom transaction kinds over a key-value account ledger:
//!
//! | Phase        | Transaction kind(s)                     |
//! |--------------|-----------------------------------------|
//! | Registration | [`transactions::RegisterTransaction`]   |
//! | Funding      | [`transactions::FundTransaction`]       |
//! | Activation   | [`transactions::StartTransaction`]      |
//! | Oversight    | [`transactions::VoteTransaction`]       |
//! | Disbursement | [`transactions::ClaimTransaction`], [`transactions::RefundTransaction`] |
//! | Discussion   | [`transactions::CommentTransaction`]    |
//!
//! ## Architecture
//!
//! Every handler follows the same contract: `validate` is a pure payload
//! check, `apply` stages mutations against a [`store::StateStore`] while
//! collecting structured [`errors::TxError`]s, and `undo` is the exact
//! algebraic inverse of `apply` so committed blocks can be unwound during
//! chain reorganization. The [`processor::TransactionProcessor`] commits a
//! staging layer only when its error list is empty — individual handlers
//! never partially commit.
//!
//! All money and stake arithmetic is arbitrary-precision integer math via
//! [`amount::Amount`], encoded as decimal strings on the wire.

pub mod address;
pub mod amount;
pub mod errors;
pub mod params;
pub mod processor;
pub mod schema;
pub mod store;
pub mod transactions;
pub mod types;

#[cfg(test)]
mod test_refund;
#[cfg(test)]
mod test_undo;

pub use address::{Address, PublicKey};
pub use amount::Amount;
pub use errors::{StoreError, TxError};
pub use params::ProtocolParams;
pub use processor::TransactionProcessor;
pub use store::{AccountBackend, MemoryAccounts, StateStore};
pub use transactions::CrowdfundTransaction;
pub use types::{Account, FundraiserData, FundraiserStatus, Investment, Payment, PaymentKind, Vote, VoteChoice};
