//! Register: create a new fundraiser in the FUNDING state.
//!
//! Fundraiser identity is self-addressing: the account's public key is
//! derived from the registration payload content, so the same campaign
//! payload always lands on the same address. A payload may carry an
//! explicit `fundraiser` key, but it must equal the derived one.

use serde::{Deserialize, Serialize};

use crate::address::{Address, PublicKey};
use crate::amount::Amount;
use crate::errors::TxError;
use crate::schema;
use crate::store::StateStore;
use crate::types::{FundraiserData, FundraiserStatus};

use super::TxHeader;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegisterAsset {
    /// Optional explicit fundraiser key; must match the content-derived key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fundraiser: Option<PublicKey>,
    pub goal: Amount,
    /// Every `vote_time`-th period opens a voting window.
    pub vote_time: u32,
    pub periods: u32,
    pub title: String,
    pub description: String,
    pub site: String,
    pub image: String,
    pub category: String,
    pub start: i64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegisterTransaction {
    #[serde(flatten)]
    pub header: TxHeader,
    pub asset: RegisterAsset,
}

impl RegisterTransaction {
    /// Canonical payload bytes hashed into the self-addressing key.
    fn content_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&self.asset.vote_time.to_be_bytes());
        bytes.extend_from_slice(&self.asset.periods.to_be_bytes());
        bytes.extend_from_slice(self.asset.goal.to_string().as_bytes());
        bytes.extend_from_slice(self.asset.title.as_bytes());
        bytes.extend_from_slice(self.asset.description.as_bytes());
        bytes.extend_from_slice(self.asset.site.as_bytes());
        bytes.extend_from_slice(self.asset.image.as_bytes());
        bytes.extend_from_slice(self.asset.category.as_bytes());
        bytes.extend_from_slice(&self.asset.start.to_be_bytes());
        bytes
    }

    /// The content-derived fundraiser public key.
    pub fn derived_public_key(&self) -> PublicKey {
        PublicKey::from_content(&self.content_bytes())
    }

    /// The key the fundraiser account will carry: the explicit one if
    /// supplied, the derived one otherwise.
    pub fn fundraiser_public_key(&self) -> PublicKey {
        self.asset
            .fundraiser
            .clone()
            .unwrap_or_else(|| self.derived_public_key())
    }

    pub fn fundraiser_address(&self) -> Address {
        Address::from_public_key(&self.fundraiser_public_key())
    }

    pub fn working_set(&self) -> Vec<Address> {
        vec![self.header.sender_address.clone(), self.fundraiser_address()]
    }

    pub fn validate(&self) -> Vec<TxError> {
        let id = &self.header.id;
        let mut errors = Vec::new();
        schema::require_non_negative_amount(&mut errors, id, ".asset.goal", &self.asset.goal);
        schema::require_min_u32(&mut errors, id, ".asset.voteTime", self.asset.vote_time, 1);
        schema::require_min_u32(&mut errors, id, ".asset.periods", self.asset.periods, 1);
        schema::require_max_len(&mut errors, id, ".asset.title", &self.asset.title, 50);
        schema::require_max_len(&mut errors, id, ".asset.site", &self.asset.site, 200);

        if let Some(supplied) = &self.asset.fundraiser {
            let derived = self.derived_public_key();
            if supplied != &derived {
                errors.push(
                    TxError::new(
                        "`.asset.fundraiser` is not the correct fundraiser address for this registration.",
                        id,
                    )
                    .with_field(".asset.fundraiser")
                    .with_actual(supplied)
                    .with_expected(derived),
                );
            }
        }
        errors
    }

    /// Reject a second registration for the same fundraiser address within
    /// one pending batch.
    pub fn verify_against(&self, others: &[&RegisterTransaction]) -> Vec<TxError> {
        let address = self.fundraiser_address();
        others
            .iter()
            .filter(|other| other.fundraiser_address() == address)
            .map(|other| {
                TxError::new("Fundraiser with this address already exist.", &other.header.id)
                    .with_field(".asset.fundraiser")
                    .with_actual(self.fundraiser_public_key())
            })
            .collect()
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

        // Duplicate registration guard: the target account must be pristine.
        if !fundraiser.balance.is_zero() || fundraiser.fundraiser.is_some() {
            errors.push(
                TxError::new("Fundraiser with this address already exist.", &self.header.id)
                    .with_field(".asset.fundraiser")
                    .with_actual(self.fundraiser_public_key()),
            );
        }

        fundraiser.public_key = Some(self.derived_public_key());
        fundraiser.fundraiser = Some(FundraiserData {
            owner: self.header.sender_public_key.clone(),
            status: FundraiserStatus::Funding,
            goal: self.asset.goal.clone(),
            vote_time: self.asset.vote_time,
            periods: self.asset.periods,
            title: self.asset.title.clone(),
            description: self.asset.description.clone(),
            site: self.asset.site.clone(),
            image: self.asset.image.clone(),
            category: self.asset.category.clone(),
            payments: Vec::new(),
            investments: Vec::new(),
            votes: Vec::new(),
            start_funding: store.now(),
            start_project: -1,
        });

        if let Err(err) = store.set(fundraiser) {
            errors.push(TxError::from_store(err, &self.header.id));
        }
        errors
    }

    /// Destructive undo: returns the account to its pristine, unregistered
    /// shape. Only valid while no dependent transaction has touched the
    /// record, which the rollback order of the surrounding framework
    /// guarantees.
    pub fn undo(&self, store: &mut StateStore<'_>) -> Vec<TxError> {
        let mut errors = Vec::new();
        let mut fundraiser = match store.get(&self.fundraiser_address()) {
            Ok(account) => account,
            Err(err) => {
                errors.push(TxError::from_store(err, &self.header.id));
                return errors;
            }
        };

        fundraiser.public_key = None;
        fundraiser.fundraiser = None;

        if let Err(err) = store.set(fundraiser) {
            errors.push(TxError::from_store(err, &self.header.id));
        }
        errors
    }
}
