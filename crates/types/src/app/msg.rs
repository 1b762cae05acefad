// Path: crates/types/src/app/msg.rs

//! SCALE-encoded parameters of the `crosschain` service methods.

use crate::app::{
    AccountId, ChainId, CrosschainFlags, KeygenStatus, ObservationType, ObserverUpdateReason,
    PubKeySet, VoteType,
};
use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// Parameters for `update_observer@v1`.
#[derive(Encode, Decode, Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct UpdateObserverParams {
    /// The observer being replaced.
    pub old_observer_address: AccountId,
    /// The replacement.
    pub new_observer_address: AccountId,
    /// Why the replacement happens.
    pub update_reason: ObserverUpdateReason,
}

/// Parameters for `set_node_keys@v1`.
#[derive(Encode, Decode, Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct SetNodeKeysParams {
    /// The signer's node keys.
    pub pubkey_set: PubKeySet,
}

/// Parameters for `vote_observation@v1`.
#[derive(Encode, Decode, Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct VoteObservationParams {
    /// The external chain the event happened on.
    pub chain_id: ChainId,
    /// `InBoundTx` or `OutBoundTx`.
    pub observation_type: ObservationType,
    /// Fingerprint of the observed event.
    pub digest: Vec<u8>,
    /// The signer's vote.
    pub vote: VoteType,
}

/// Parameters for `update_crosschain_flags@v1`.
#[derive(Encode, Decode, Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct UpdateCrosschainFlagsParams {
    /// The new switches.
    pub flags: CrosschainFlags,
}

/// Parameters for `allocate_nonces@v1`.
#[derive(Encode, Decode, Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct AllocateNoncesParams {
    /// The chain to reserve nonces on.
    pub chain_id: ChainId,
    /// The TSS public key that will sign with them.
    pub tss_pubkey: String,
    /// How many nonces to reserve.
    pub count: u64,
}

/// Parameters for `finalize_nonce@v1`.
#[derive(Encode, Decode, Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct FinalizeNonceParams {
    /// The chain the nonce was used on.
    pub chain_id: ChainId,
    /// The nonce.
    pub nonce: u64,
    /// The cross-chain transaction that used it.
    pub cctx_index: String,
}

/// Parameters for `request_keygen@v1`.
#[derive(Encode, Decode, Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct RequestKeygenParams {
    /// Node keys taking part in the round.
    pub grantee_pubkeys: Vec<String>,
    /// Block at which the round runs.
    pub block_number: u64,
}

/// Parameters for `vote_tss@v1`: a participant's report on a keygen round.
#[derive(Encode, Decode, Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct VoteTssParams {
    /// The generated key, when the round succeeded.
    pub tss_pubkey: String,
    /// The round's block number.
    pub keygen_zeta_height: u64,
    /// `KeyGenSuccess` or `KeyGenFailed`.
    pub status: KeygenStatus,
    /// Blame index reported on failure.
    pub blame_index: String,
    /// Failure description.
    pub failure_reason: String,
    /// Nodes blamed for the failure.
    pub nodes: Vec<String>,
}

/// Parameters for `add_blame_vote@v1`: an observer's report on a failed
/// signing round.
#[derive(Encode, Decode, Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct AddBlameVoteParams {
    /// The chain the signing round was for.
    pub chain_id: ChainId,
    /// Blame index reported by the signers.
    pub blame_index: String,
    /// Failure description.
    pub failure_reason: String,
    /// Nodes blamed for the failure.
    pub nodes: Vec<String>,
}

/// Parameters for `begin_migration@v1`.
#[derive(Encode, Decode, Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct BeginMigrationParams {
    /// The chain whose funds move.
    pub chain_id: ChainId,
    /// The cross-chain transaction moving the funds.
    pub migration_cctx_index: String,
}

/// Parameters for `complete_migration@v1`.
#[derive(Encode, Decode, Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct CompleteMigrationParams {
    /// The chain whose migration finished.
    pub chain_id: ChainId,
}
