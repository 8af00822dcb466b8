//! Vote: investors decide whether the project keeps claiming.
//!
//! Every `vote_time`-th period ends with a voting window spanning its last
//! `vote_window` seconds. Each investor may vote once per period; a vote
//! carries the investor's integer share of the goal as stake. When the
//! combined refund stake exceeds the pass threshold the fundraiser moves
//! irreversibly to REFUND.

use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::amount::Amount;
use crate::errors::TxError;
use crate::params::ProtocolParams;
use crate::schema;
use crate::store::StateStore;
use crate::types::{FundraiserData, FundraiserStatus, Vote, VoteChoice};

use super::{current_period, TxHeader};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VoteAsset {
    pub fundraiser: Address,
    pub period: u32,
    #[serde(rename = "vote")]
    pub choice: VoteChoice,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VoteTransaction {
    #[serde(flatten)]
    pub header: TxHeader,
    pub asset: VoteAsset,
}

/// True when `now` falls inside an open voting window of a project started
/// at `start` with vote cadence `vote_time`.
pub fn voting_window_open(now: i64, start: i64, vote_time: u32, params: &ProtocolParams) -> bool {
    let period = current_period(now, start, params.period);
    if vote_time == 0 || period % vote_time as i64 != 0 {
        return false;
    }
    let end = start + period * params.period;
    let begin = end - params.vote_window;
    now >= begin && now <= end
}

/// Whether the refund tally exceeds the pass ratio.
fn vote_passes(tally: &Amount, params: &ProtocolParams) -> bool {
    tally.scaled(params.vote_pass_den) > Amount::from(params.vote_pass_num as u64)
}

impl VoteTransaction {
    pub fn working_set(&self) -> Vec<Address> {
        vec![self.header.sender_address.clone(), self.asset.fundraiser.clone()]
    }

    pub fn validate(&self) -> Vec<TxError> {
        let mut errors = Vec::new();
        schema::require_min_u32(&mut errors, &self.header.id, ".asset.period", self.asset.period, 1);
        errors
    }

    /// The voter's stake: the integer share of the goal their combined
    /// investments represent.
    fn vote_stake(&self, data: &FundraiserData) -> Amount {
        data.invested_by(&self.header.sender_address).floor_div(&data.goal)
    }

    pub fn apply(&self, store: &mut StateStore<'_>, params: &ProtocolParams) -> Vec<TxError> {
        let mut errors = Vec::new();
        let mut fundraiser = match store.get_or_default(&self.asset.fundraiser) {
            Ok(account) => account,
            Err(err) => {
                errors.push(TxError::from_store(err, &self.header.id));
                return errors;
            }
        };
        let Some(data) = fundraiser.fundraiser.as_mut() else {
            errors.push(
                TxError::new("Fundraiser does not exist.", &self.header.id)
                    .with_field(".asset.fundraiser")
                    .with_actual(&self.asset.fundraiser.0),
            );
            return errors;
        };

        if !voting_window_open(store.now(), data.start_project, data.vote_time, params) {
            errors.push(TxError::new(
                "Fundraiser is not holding a voting at the moment",
                &self.header.id,
            ));
        }

        if data.has_vote(&self.header.sender_address, self.asset.period) {
            errors.push(TxError::new(
                "You already voted for this period",
                &self.header.id,
            ));
        }

        if data.status != FundraiserStatus::Active {
            errors.push(
                TxError::new("Fundraiser is not active", &self.header.id)
                    .with_field(".asset.status")
                    .with_actual(format!("{:?}", data.status))
                    .with_expected(format!("{:?}", FundraiserStatus::Active)),
            );
        }

        let stake = self.vote_stake(data);
        data.votes.push(Vote {
            address: self.header.sender_address.clone(),
            stake,
            period: self.asset.period,
            choice: self.asset.choice,
        });

        if vote_passes(&data.refund_vote_tally(), params) {
            data.status = FundraiserStatus::Refund;
        }

        if let Err(err) = store.set(fundraiser) {
            errors.push(TxError::from_store(err, &self.header.id));
        }
        errors
    }

    /// Removes the caller's vote for the period and re-runs the threshold
    /// rule: ACTIVE is restored only if the remaining refund tally no
    /// longer passes.
    pub fn undo(&self, store: &mut StateStore<'_>, params: &ProtocolParams) -> Vec<TxError> {
        let mut errors = Vec::new();
        let mut fundraiser = match store.get(&self.asset.fundraiser) {
            Ok(account) => account,
            Err(err) => {
                errors.push(TxError::from_store(err, &self.header.id));
                return errors;
            }
        };
        if let Some(data) = fundraiser.fundraiser.as_mut() {
            data.votes
                .retain(|v| !(v.address == self.header.sender_address && v.period == self.asset.period));
            data.status = if vote_passes(&data.refund_vote_tally(), params) {
                FundraiserStatus::Refund
            } else {
                FundraiserStatus::Active
            };
        }

        if let Err(err) = store.set(fundraiser) {
            errors.push(TxError::from_store(err, &self.header.id));
        }
        errors
    }
}
