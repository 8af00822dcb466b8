//! Claim: the owner withdraws the funds allotted to one period.
//!
//! The per-period amount is `goal / periods` with floor division; any
//! remainder is never claimable. Claiming the final period ends the
//! campaign.

use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::amount::Amount;
use crate::errors::TxError;
use crate::params::ProtocolParams;
use crate::schema;
use crate::store::StateStore;
use crate::types::{FundraiserStatus, Payment, PaymentKind};

use super::{current_period, TxHeader};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClaimAsset {
    pub fundraiser: Address,
    pub period: u32,
    pub amount: Amount,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClaimTransaction {
    #[serde(flatten)]
    pub header: TxHeader,
    pub asset: ClaimAsset,
}

/// The fixed per-period disbursement.
pub fn amount_to_claim(goal: &Amount, periods: u32) -> Amount {
    goal.floor_div_u32(periods)
}

impl ClaimTransaction {
    pub fn working_set(&self) -> Vec<Address> {
        vec![self.header.sender_address.clone(), self.asset.fundraiser.clone()]
    }

    pub fn validate(&self) -> Vec<TxError> {
        let id = &self.header.id;
        let mut errors = Vec::new();
        schema::require_non_negative_amount(&mut errors, id, ".asset.amount", &self.asset.amount);
        schema::require_len_range(&mut errors, id, ".asset.message", &self.asset.message, 1, 255);
        errors
    }

    /// The timing gate: the claimed period must carry no prior claim, and
    /// the running period boundary must lie strictly before `now`.
    fn allowed_to_claim(
        &self,
        now: i64,
        start: i64,
        params: &ProtocolParams,
        data: &crate::types::FundraiserData,
    ) -> bool {
        if data.has_claim_for_period(self.asset.period as i32) {
            return false;
        }
        current_period(now, start, params.period) * params.period + start < now
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
        let mut sender = match store.get(&self.header.sender_address) {
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

        let amount = amount_to_claim(&data.goal, data.periods);
        if self.asset.amount != amount {
            errors.push(
                TxError::new("Amount to claim is incorrect", &self.header.id)
                    .with_field(".asset.amount")
                    .with_actual(&self.asset.amount)
                    .with_expected(&amount),
            );
        }
        sender.balance += &amount;
        if let Err(err) = store.set(sender) {
            errors.push(TxError::from_store(err, &self.header.id));
        }

        if !self.allowed_to_claim(store.now(), data.start_project, params, data) {
            errors.push(
                TxError::new(
                    "You are not allowed to claim anything at this moment",
                    &self.header.id,
                )
                .with_field(".asset.fundraiser")
                .with_actual(&self.asset.fundraiser.0),
            );
        }

        if self.header.sender_public_key != data.owner {
            errors.push(
                TxError::new("You are not the owner of this fundraiser", &self.header.id)
                    .with_field(".senderPublicKey")
                    .with_actual(&self.header.sender_public_key)
                    .with_expected(&data.owner),
            );
        }

        if data.status == FundraiserStatus::Refund {
            errors.push(
                TxError::new(
                    "Stakeholders voted not to support this project anymore",
                    &self.header.id,
                )
                .with_field(".asset.status")
                .with_actual(format!("{:?}", data.status))
                .with_expected(format!("{:?}", FundraiserStatus::Active)),
            );
        }

        data.payments.push(Payment {
            transaction: self.header.id.clone(),
            period: self.asset.period as i32,
            recipient: self.header.sender_address.clone(),
            amount: amount.clone(),
            kind: PaymentKind::Claim,
        });
        data.status = if self.asset.period == data.periods {
            FundraiserStatus::Ended
        } else {
            FundraiserStatus::Active
        };
        fundraiser.balance -= &amount;

        if let Err(err) = store.set(fundraiser) {
            errors.push(TxError::from_store(err, &self.header.id));
        }
        errors
    }

    pub fn undo(&self, store: &mut StateStore<'_>) -> Vec<TxError> {
        let mut errors = Vec::new();
        let mut sender = match store.get(&self.header.sender_address) {
            Ok(account) => account,
            Err(err) => {
                errors.push(TxError::from_store(err, &self.header.id));
                return errors;
            }
        };
        sender.balance -= &self.asset.amount;
        if let Err(err) = store.set(sender) {
            errors.push(TxError::from_store(err, &self.header.id));
        }

        let mut fundraiser = match store.get(&self.asset.fundraiser) {
            Ok(account) => account,
            Err(err) => {
                errors.push(TxError::from_store(err, &self.header.id));
                return errors;
            }
        };
        if let Some(data) = fundraiser.fundraiser.as_mut() {
            data.payments.retain(|p| p.transaction != self.header.id);
            data.status = FundraiserStatus::Active;
        }
        fundraiser.balance += &self.asset.amount;

        if let Err(err) = store.set(fundraiser) {
            errors.push(TxError::from_store(err, &self.header.id));
        }
        errors
    }
}
