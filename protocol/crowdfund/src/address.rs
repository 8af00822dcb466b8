//! Deterministic address and key derivation.
//!
//! Cryptographic identity is an external concern; what the protocol needs
//! from it is (a) a stable mapping from a public key to an account address,
//! used to locate the two accounts every handler touches, and (b) the
//! self-addressing scheme of Register, where a fundraiser's public key is
//! derived from the content of its registration payload.
//!
//! Both are sha256-based and hex-encoded.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Number of hash bytes kept for an address.
const ADDRESS_BYTES: usize = 20;

/// Hex-encoded account address.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(pub String);

/// Hex-encoded public key.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PublicKey(pub String);

impl Address {
    /// Derive the account address owned by `public_key`.
    pub fn from_public_key(public_key: &PublicKey) -> Address {
        let digest = Sha256::digest(public_key.0.as_bytes());
        Address(hex::encode(&digest[..ADDRESS_BYTES]))
    }
}

impl PublicKey {
    /// Derive a self-addressing public key from canonical payload bytes.
    ///
    /// Register uses this so that fundraiser identity is content-derived:
    /// the same registration payload always lands on the same account.
    pub fn from_content(bytes: &[u8]) -> PublicKey {
        PublicKey(hex::encode(Sha256::digest(bytes)))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
