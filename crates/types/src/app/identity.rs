// Path: crates/types/src/app/identity.rs

//! Addresses used by the observer core.
//!
//! Observer addresses and validator operator addresses share the same bytes,
//! so a single `AccountId` is used for both. The consensus address is a
//! distinct type because it is only ever produced by the validator oracle.

use crate::error::TransactionError;
use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The identifier of an external chain (EVM chain id, Bitcoin network id, ...).
pub type ChainId = i64;

/// A 32-byte account address. Rendered as lowercase hex in text form.
#[derive(
    Encode,
    Decode,
    Serialize,
    Deserialize,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Debug,
    Default,
    Hash,
)]
#[serde(transparent)]
pub struct AccountId(#[serde(with = "hex::serde")] pub [u8; 32]);

impl AsRef<[u8]> for AccountId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 32]> for AccountId {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl core::fmt::Display for AccountId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl FromStr for AccountId {
    type Err = TransactionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.strip_prefix("0x").unwrap_or(s);
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(raw, &mut bytes)
            .map_err(|e| TransactionError::Invalid(format!("invalid account id '{}': {}", s, e)))?;
        Ok(Self(bytes))
    }
}

/// A 20-byte validator consensus address, as reported by the validator oracle.
#[derive(
    Encode,
    Decode,
    Serialize,
    Deserialize,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Debug,
    Default,
    Hash,
)]
#[serde(transparent)]
pub struct ConsensusAddress(#[serde(with = "hex::serde")] pub [u8; 20]);

impl AsRef<[u8]> for ConsensusAddress {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// An external chain supported by the observer set.
#[derive(Encode, Decode, Serialize, Deserialize, Clone, PartialEq, Eq, Debug, Default, Hash)]
pub struct Chain {
    /// The chain's numeric identifier.
    pub chain_id: ChainId,
    /// A human-readable name, e.g. `"eth_mainnet"`.
    pub chain_name: String,
}
