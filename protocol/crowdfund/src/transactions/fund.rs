//! Fund: move an investment from the sender into the fundraiser.
//!
//! Accepted only while the fundraiser is FUNDING, inside the funding
//! window, and while the running total stays within the goal. A
//! contribution that lands exactly on the goal flips the status to FUNDED.

use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::amount::Amount;
use crate::errors::TxError;
use crate::params::ProtocolParams;
use crate::schema;
use crate::store::StateStore;
use crate::types::{FundraiserStatus, Investment};

use super::TxHeader;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FundAsset {
    /// Public-key reference naming the fundraiser account.
    pub fundraiser: Address,
    pub amount: Amount,
    #[serde(default)]
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FundTransaction {
    #[serde(flatten)]
    pub header: TxHeader,
    pub asset: FundAsset,
}

impl FundTransaction {
    pub fn working_set(&self) -> Vec<Address> {
        vec![self.header.sender_address.clone(), self.asset.fundraiser.clone()]
    }

    pub fn validate(&self) -> Vec<TxError> {
        let id = &self.header.id;
        let mut errors = Vec::new();
        schema::require_non_negative_amount(&mut errors, id, ".asset.amount", &self.asset.amount);
        schema::require_max_len(&mut errors, id, ".asset.message", &self.asset.message, 64);
        errors
    }

    pub fn apply(&self, store: &mut StateStore<'_>, params: &ProtocolParams) -> Vec<TxError> {
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
        let funds_raised = data.funds_raised();

        if data.start_funding + params.fund_window < store.now() {
            errors.push(
                TxError::new("Fundraiser is expired.", &self.header.id)
                    .with_field(".fundingTime")
                    .with_actual(data.start_funding + params.fund_window)
                    .with_expected(format!("> {}", store.now())),
            );
        }

        if data.status != FundraiserStatus::Funding {
            errors.push(
                TxError::new("Fundraiser is not in funding phase.", &self.header.id)
                    .with_field(".asset.status")
                    .with_actual(format!("{:?}", data.status))
                    .with_expected(format!("{:?}", FundraiserStatus::Funding)),
            );
        }

        let new_total = &funds_raised + &self.asset.amount;
        if new_total > data.goal {
            errors.push(
                TxError::new("Fundraiser is not accepting your funds", &self.header.id)
                    .with_field(".asset.amount")
                    .with_actual(&self.asset.amount)
                    .with_expected(format!("should be <= {}", &data.goal - &funds_raised)),
            );
        }

        data.investments.push(Investment {
            address: self.header.sender_address.clone(),
            amount: self.asset.amount.clone(),
            timestamp: store.now(),
            message: self.asset.message.clone(),
        });
        // The most recent funder is restamped as owner on every apply.
        data.owner = self.header.sender_public_key.clone();
        if new_total >= data.goal {
            data.status = FundraiserStatus::Funded;
        }
        fundraiser.balance += &self.asset.amount;

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
        sender.balance += &self.asset.amount;
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
            // Remove the single most recent investment matching this
            // transaction's sender and amount.
            if let Some(index) = data
                .investments
                .iter()
                .rposition(|i| i.address == self.header.sender_address && i.amount == self.asset.amount)
            {
                data.investments.remove(index);
            }
            data.status = FundraiserStatus::Funding;
        }
        fundraiser.balance -= &self.asset.amount;

        if let Err(err) = store.set(fundraiser) {
            errors.push(TxError::from_store(err, &self.header.id));
        }
        errors
    }
}
