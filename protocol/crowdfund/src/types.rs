//! # Types
//!
//! The fundraiser entity and its append-only sub-records.
//!
//! ## Status as a finite-state machine
//!
//! [`FundraiserStatus`] advances forward-only through the campaign
//! lifecycle:
//!
//! ```text
//! Funding ──(goal reached)──► Funded ──(Start)──► Active ──(final Claim)──► Ended
//!                                                   │
//!                                                   └──(refund vote passes)──► Refund
//! ```
//!
//! `Refund` is terminal for claims; Refund transactions continue to drain
//! the remaining balance to investors. The wire tags are the original
//! string-tagged states (`"FUNDING STATE"` …) so existing records decode
//! unchanged.
//!
//! ## Account extension record
//!
//! A fundraiser is an ordinary [`Account`] whose `fundraiser` extension is
//! populated. `None` models the pristine, unregistered shape that
//! Register's undo restores.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::address::{Address, PublicKey};
use crate::amount::Amount;

/// Lifecycle phase of a fundraiser.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FundraiserStatus {
    /// Accepting investments, goal not yet reached.
    #[serde(rename = "FUNDING STATE")]
    Funding,
    /// Goal reached exactly; waiting for the owner to start the project.
    #[serde(rename = "FUNDED STATE")]
    Funded,
    /// Project running; claims and votes are processed period by period.
    #[serde(rename = "ACTIVE STATE")]
    Active,
    /// Final period claimed.
    #[serde(rename = "ENDED STATE")]
    Ended,
    /// Refund vote passed; investors withdraw pro-rata.
    #[serde(rename = "REFUND STATE")]
    Refund,
}

/// A recorded contribution toward the funding goal. Never mutated; removed
/// only by the exact undo of the Fund transaction that appended it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Investment {
    pub address: Address,
    pub amount: Amount,
    pub timestamp: i64,
    #[serde(default)]
    pub message: String,
}

/// Disbursement kind: an owner claim or an investor refund.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaymentKind {
    Claim,
    Refund,
}

/// A recorded disbursement from the fundraiser. `period` is `-1` for
/// refunds. Keyed by the id of the transaction that created it; undo
/// removes by exact id match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub transaction: String,
    pub period: i32,
    pub recipient: Address,
    pub amount: Amount,
    #[serde(rename = "type")]
    pub kind: PaymentKind,
}

/// A binary choice cast during a voting window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VoteChoice {
    /// Force a refund.
    Refund,
    /// Allow continued claiming.
    Continue,
}

/// One investor vote. `stake` is the integer share of the goal held by the
/// voter at voting time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub address: Address,
    pub stake: Amount,
    pub period: u32,
    #[serde(rename = "vote")]
    pub choice: VoteChoice,
}

/// The fundraiser extension record attached to an account.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundraiserData {
    /// Public key recorded as campaign owner.
    pub owner: PublicKey,
    pub status: FundraiserStatus,
    /// Target amount, fixed at registration.
    pub goal: Amount,
    /// Total number of claim periods, fixed at registration.
    pub periods: u32,
    /// Vote cadence: every `vote_time`-th period opens a voting window.
    pub vote_time: u32,
    /// Timestamp when registration completed.
    pub start_funding: i64,
    /// Timestamp when the active phase began; -1 before then.
    pub start_project: i64,
    pub investments: Vec<Investment>,
    pub payments: Vec<Payment>,
    pub votes: Vec<Vote>,
    pub title: String,
    pub description: String,
    pub site: String,
    pub image: String,
    pub category: String,
}

impl FundraiserData {
    /// Sum of all recorded investments.
    pub fn funds_raised(&self) -> Amount {
        let mut total = Amount::zero();
        for investment in &self.investments {
            total += &investment.amount;
        }
        total
    }

    /// Sum of investments made by `address`.
    pub fn invested_by(&self, address: &Address) -> Amount {
        let mut total = Amount::zero();
        for investment in self.investments.iter().filter(|i| &i.address == address) {
            total += &investment.amount;
        }
        total
    }

    pub fn has_investor(&self, address: &Address) -> bool {
        self.investments.iter().any(|i| &i.address == address)
    }

    /// Sum of all owner claims disbursed so far.
    pub fn total_claimed(&self) -> Amount {
        let mut total = Amount::zero();
        for payment in self.payments.iter().filter(|p| p.kind == PaymentKind::Claim) {
            total += &payment.amount;
        }
        total
    }

    /// Sum of refunds already disbursed to `address`.
    pub fn refunded_to(&self, address: &Address) -> Amount {
        let mut total = Amount::zero();
        for payment in self
            .payments
            .iter()
            .filter(|p| p.kind == PaymentKind::Refund && &p.recipient == address)
        {
            total += &payment.amount;
        }
        total
    }

    pub fn has_claim_for_period(&self, period: i32) -> bool {
        self.payments
            .iter()
            .any(|p| p.kind == PaymentKind::Claim && p.period == period)
    }

    pub fn has_vote(&self, address: &Address, period: u32) -> bool {
        self.votes
            .iter()
            .any(|v| &v.address == address && v.period == period)
    }

    /// Combined stake of all refund votes.
    pub fn refund_vote_tally(&self) -> Amount {
        let mut tally = Amount::zero();
        for vote in self.votes.iter().filter(|v| v.choice == VoteChoice::Refund) {
            tally += &vote.stake;
        }
        tally
    }
}

/// A ledger account. Created lazily on first reference with zero balance
/// and an empty extension record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub address: Address,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key: Option<PublicKey>,
    pub balance: Amount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fundraiser: Option<FundraiserData>,
}

impl Account {
    /// The zero-value account returned by `get_or_default` for an address
    /// the store has never seen.
    pub fn new(address: Address) -> Self {
        Account {
            address,
            public_key: None,
            balance: Amount::zero(),
            fundraiser: None,
        }
    }
}

// Payment kinds and vote choices travel as the original's integer tags
// (claim 0 / refund 1, refund-vote 0 / continue-vote 1).

impl Serialize for PaymentKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(match self {
            PaymentKind::Claim => 0,
            PaymentKind::Refund => 1,
        })
    }
}

impl<'de> Deserialize<'de> for PaymentKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match u8::deserialize(deserializer)? {
            0 => Ok(PaymentKind::Claim),
            1 => Ok(PaymentKind::Refund),
            other => Err(de::Error::custom(format!("invalid payment type: {other}"))),
        }
    }
}

impl Serialize for VoteChoice {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(match self {
            VoteChoice::Refund => 0,
            VoteChoice::Continue => 1,
        })
    }
}

impl<'de> Deserialize<'de> for VoteChoice {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match u8::deserialize(deserializer)? {
            0 => Ok(VoteChoice::Refund),
            1 => Ok(VoteChoice::Continue),
            other => Err(de::Error::custom(format!("invalid vote choice: {other}"))),
        }
    }
}
