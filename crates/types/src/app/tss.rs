// Path: crates/types/src/app/tss.rs

//! Threshold-signature key registry records.

use crate::app::ChainId;
use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// A TSS key produced by a successful key-generation round.
#[derive(Encode, Decode, Serialize, Deserialize, Clone, PartialEq, Eq, Debug, Default)]
pub struct Tss {
    /// The aggregated public key.
    pub tss_pubkey: String,
    /// Grantee public keys of the participants that produced it.
    pub tss_participant_list: Vec<String>,
    /// Block height at which the key became active.
    pub finalized_zeta_height: u64,
    /// Block height the key-generation round was scheduled for.
    pub keygen_zeta_height: u64,
}

/// Status of a key-generation round.
#[derive(Encode, Decode, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug, Default)]
#[serde(rename_all = "snake_case")]
pub enum KeygenStatus {
    /// Requested, awaiting the outcome vote.
    #[default]
    PendingKeygen,
    /// A new key was produced and activated.
    KeyGenSuccess,
    /// The round failed; a blame record was written.
    KeyGenFailed,
}

/// The latest key-generation round.
#[derive(Encode, Decode, Serialize, Deserialize, Clone, PartialEq, Eq, Debug, Default)]
pub struct Keygen {
    /// Round status.
    pub status: KeygenStatus,
    /// Grantee public keys expected to participate.
    pub grantee_pubkeys: Vec<String>,
    /// Block height the round runs at.
    pub block_number: u64,
}

/// An in-flight migration of funds from the previous TSS to the active one.
#[derive(Encode, Decode, Serialize, Deserialize, Clone, PartialEq, Eq, Debug, Default)]
pub struct TssFundMigratorInfo {
    /// The chain whose funds are moving.
    pub chain_id: ChainId,
    /// The cross-chain transaction carrying the migration.
    pub migration_cctx_index: String,
}

/// An append-only audit record of a failed key-generation or signing round.
#[derive(Encode, Decode, Serialize, Deserialize, Clone, PartialEq, Eq, Debug, Default)]
pub struct Blame {
    /// `"{height}-{index}"`.
    pub index: String,
    /// Free-form reason reported by the voters.
    pub failure_reason: String,
    /// Public keys of the nodes blamed for the failure.
    pub nodes: Vec<String>,
}

impl Blame {
    /// Builds the composite blame index.
    pub fn make_index(height: u64, index: &str) -> String {
        format!("{}-{}", height, index)
    }
}
