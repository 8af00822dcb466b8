//! Comment: campaign updates and donor comments.
//!
//! Validation-only relative to the lifecycle — comments are communicated
//! but not stored in the extension record. Type 0 is an owner update;
//! type 1 a donor comment, open to the owner and to anyone with an
//! investment on record.

use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::errors::TxError;
use crate::schema;
use crate::store::StateStore;

use super::TxHeader;

/// Owner update (0) or donor comment (1).
pub const COMMENT_TYPE_UPDATE: u8 = 0;
pub const COMMENT_TYPE_DONOR: u8 = 1;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CommentAsset {
    pub fundraiser: Address,
    pub comment: String,
    #[serde(rename = "type")]
    pub comment_type: u8,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CommentTransaction {
    #[serde(flatten)]
    pub header: TxHeader,
    pub asset: CommentAsset,
}

impl CommentTransaction {
    pub fn working_set(&self) -> Vec<Address> {
        vec![self.header.sender_address.clone(), self.asset.fundraiser.clone()]
    }

    pub fn validate(&self) -> Vec<TxError> {
        let id = &self.header.id;
        let mut errors = Vec::new();
        schema::require_len_range(&mut errors, id, ".asset.comment", &self.asset.comment, 1, 255);
        if self.asset.comment_type > COMMENT_TYPE_DONOR {
            errors.push(
                TxError::new("`.asset.type` is out of range", id)
                    .with_field(".asset.type")
                    .with_actual(self.asset.comment_type)
                    .with_expected("0 or 1"),
            );
        }
        errors
    }

    pub fn apply(&self, store: &mut StateStore<'_>) -> Vec<TxError> {
        let mut errors = Vec::new();
        let fundraiser = match store.get_or_default(&self.asset.fundraiser) {
            Ok(account) => account,
            Err(err) => {
                errors.push(TxError::from_store(err, &self.header.id));
                return errors;
            }
        };
        let Some(data) = fundraiser.fundraiser.as_ref() else {
            errors.push(
                TxError::new("Fundraiser does not exist.", &self.header.id)
                    .with_field(".asset.fundraiser")
                    .with_actual(&self.asset.fundraiser.0),
            );
            return errors;
        };

        let is_owner = self.header.sender_public_key == data.owner;

        if self.asset.comment_type == COMMENT_TYPE_DONOR
            && !is_owner
            && !data.has_investor(&self.header.sender_address)
        {
            errors.push(
                TxError::new("You are not a donor of this fundraiser", &self.header.id)
                    .with_field(".senderId")
                    .with_actual(&self.header.sender_address),
            );
        }

        if self.asset.comment_type == COMMENT_TYPE_UPDATE && !is_owner {
            errors.push(
                TxError::new("You are not the owner of this fundraiser", &self.header.id)
                    .with_field(".senderPublicKey")
                    .with_actual(&self.header.sender_public_key)
                    .with_expected(&data.owner),
            );
        }

        errors
    }

    /// No mutation to reverse; reading the sender mirrors apply's account
    /// existence check.
    pub fn undo(&self, store: &mut StateStore<'_>) -> Vec<TxError> {
        let mut errors = Vec::new();
        if let Err(err) = store.get(&self.header.sender_address) {
            errors.push(TxError::from_store(err, &self.header.id));
        }
        errors
    }
}
