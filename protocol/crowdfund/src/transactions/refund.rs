//! Refund: an investor withdraws their pro-rata share of what remains.
//!
//! Available once the stakeholders voted the fundraiser into REFUND, and
//! gated by the funding-outcome checks of the original flow for campaigns
//! that never filled their goal. The payout is computed with integer
//! arithmetic, multiplying before dividing so no precision is lost:
//!
//! ```text
//! allowed = (raised - claimed) * invested_by_sender / raised
//!           - already_refunded_to_sender
//! ```

use serde::{Deserialize, Serialize};

use crate::address::{Address, PublicKey};
use crate::amount::Amount;
use crate::errors::TxError;
use crate::params::ProtocolParams;
use crate::schema;
use crate::store::StateStore;
use crate::types::{FundraiserData, FundraiserStatus, Payment, PaymentKind};

use super::TxHeader;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RefundAsset {
    pub fundraiser: PublicKey,
    pub amount: Amount,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RefundTransaction {
    #[serde(flatten)]
    pub header: TxHeader,
    pub asset: RefundAsset,
}

impl RefundTransaction {
    pub fn fundraiser_address(&self) -> Address {
        Address::from_public_key(&self.asset.fundraiser)
    }

    pub fn working_set(&self) -> Vec<Address> {
        vec![self.header.sender_address.clone(), self.fundraiser_address()]
    }

    pub fn validate(&self) -> Vec<TxError> {
        let mut errors = Vec::new();
        schema::require_non_negative_amount(
            &mut errors,
            &self.header.id,
            ".asset.amount",
            &self.asset.amount,
        );
        errors
    }

    /// The pro-rata amount the sender may still withdraw.
    fn allowed_to_refund(&self, data: &FundraiserData) -> Amount {
        let raised = data.funds_raised();
        let amount_left = &raised - &data.total_claimed();
        let invested = data.invested_by(&self.header.sender_address);
        let share = amount_left.mul(&invested).floor_div(&raised);
        &share - &data.refunded_to(&self.header.sender_address)
    }

    pub fn apply(&self, store: &mut StateStore<'_>, params: &ProtocolParams) -> Vec<TxError> {
        let mut errors = Vec::new();
        let mut fundraiser = match store.get_or_default(&self.fundraiser_address()) {
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
                    .with_actual(&self.asset.fundraiser),
            );
            return errors;
        };

        let allowed = self.allowed_to_refund(data);
        let funds_raised = data.funds_raised();

        if allowed.is_zero() || allowed != self.asset.amount {
            errors.push(
                TxError::new("Amount to claim is incorrect", &self.header.id)
                    .with_field(".asset.amount")
                    .with_actual(&self.asset.amount)
                    .with_expected(&allowed),
            );
        }
        sender.balance += &allowed;
        if let Err(err) = store.set(sender) {
            errors.push(TxError::from_store(err, &self.header.id));
        }

        if !data.has_investor(&self.header.sender_address) {
            errors.push(
                TxError::new("You are not a donor of this fundraiser", &self.header.id)
                    .with_field(".senderId")
                    .with_actual(&self.header.sender_address),
            );
        }

        if funds_raised == data.goal && data.status != FundraiserStatus::Refund {
            errors.push(
                TxError::new("Fundraiser is not in refund state", &self.header.id)
                    .with_field(".asset.status")
                    .with_actual(format!("{:?}", FundraiserStatus::Refund))
                    .with_expected(format!("{:?}", data.status)),
            );
        }

        if funds_raised < data.goal && data.start_funding + params.fund_window < store.now() {
            errors.push(TxError::new(
                "Fundraiser is not finished yet",
                &self.header.id,
            ));
        }

        data.payments.push(Payment {
            transaction: self.header.id.clone(),
            period: -1,
            recipient: self.header.sender_address.clone(),
            amount: allowed.clone(),
            kind: PaymentKind::Refund,
        });
        data.status = FundraiserStatus::Refund;
        fundraiser.balance -= &allowed;

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

        let mut fundraiser = match store.get(&self.fundraiser_address()) {
            Ok(account) => account,
            Err(err) => {
                errors.push(TxError::from_store(err, &self.header.id));
                return errors;
            }
        };
        if let Some(data) = fundraiser.fundraiser.as_mut() {
            data.payments.retain(|p| p.transaction != self.header.id);
        }
        fundraiser.balance += &self.asset.amount;

        if let Err(err) = store.set(fundraiser) {
            errors.push(TxError::from_store(err, &self.header.id));
        }
        errors
    }
}
