//! Start: owner-only transition FUNDED → ACTIVE.
//!
//! Fixes `start_project`, the instant period counting begins.

use serde::{Deserialize, Serialize};

use crate::address::{Address, PublicKey};
use crate::errors::TxError;
use crate::schema;
use crate::store::StateStore;
use crate::types::FundraiserStatus;

use super::TxHeader;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StartAsset {
    pub fundraiser: PublicKey,
    /// Timestamp at which the project officially starts counting time.
    pub timestamp: i64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StartTransaction {
    #[serde(flatten)]
    pub header: TxHeader,
    pub asset: StartAsset,
}

impl StartTransaction {
    pub fn fundraiser_address(&self) -> Address {
        Address::from_public_key(&self.asset.fundraiser)
    }

    pub fn working_set(&self) -> Vec<Address> {
        vec![self.header.sender_address.clone(), self.fundraiser_address()]
    }

    pub fn validate(&self) -> Vec<TxError> {
        let mut errors = Vec::new();
        schema::require_min_i64(&mut errors, &self.header.id, ".asset.timestamp", self.asset.timestamp, 1);
        errors
    }

    pub fn apply(&self, store: &mut StateStore<'_>) -> Vec<TxError> {
        let mut errors = Vec::new();
        let mut fundraiser = match store.get_or_default(&self.fundraiser_address()) {
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

        if data.owner != self.header.sender_public_key {
            errors.push(
                TxError::new("Fundraiser is not owned by you.", &self.header.id)
                    .with_field(".senderPublicKey")
                    .with_actual(&self.header.sender_public_key)
                    .with_expected(&data.owner),
            );
        }

        let funds_raised = data.funds_raised();
        if funds_raised < data.goal {
            errors.push(
                TxError::new("Fundraiser is not fully funded", &self.header.id)
                    .with_field(".asset.amount")
                    .with_actual(&funds_raised)
                    .with_expected(&data.goal),
            );
        }

        if self.asset.timestamp < store.now() {
            errors.push(
                TxError::new("Timestamp should be in the future", &self.header.id)
                    .with_field(".asset.timestamp")
                    .with_actual(self.asset.timestamp)
                    .with_expected(format!("> {}", store.now())),
            );
        }

        if data.status != FundraiserStatus::Funded {
            errors.push(
                TxError::new("Fundraiser has wrong status", &self.header.id)
                    .with_field(".asset.status")
                    .with_actual(format!("{:?}", data.status))
                    .with_expected(format!("{:?}", FundraiserStatus::Funded)),
            );
        }

        data.status = FundraiserStatus::Active;
        data.start_project = self.asset.timestamp;

        if let Err(err) = store.set(fundraiser) {
            errors.push(TxError::from_store(err, &self.header.id));
        }
        errors
    }

    pub fn undo(&self, store: &mut StateStore<'_>) -> Vec<TxError> {
        let mut errors = Vec::new();
        let mut fundraiser = match store.get(&self.fundraiser_address()) {
            Ok(account) => account,
            Err(err) => {
                errors.push(TxError::from_store(err, &self.header.id));
                return errors;
            }
        };
        if let Some(data) = fundraiser.fundraiser.as_mut() {
            data.status = FundraiserStatus::Funded;
            data.start_project = -1;
        }

        if let Err(err) = store.set(fundraiser) {
            errors.push(TxError::from_store(err, &self.header.id));
        }
        errors
    }
}
