// Path: crates/types/src/app/nonce.rs

//! Outbound nonce bookkeeping records.

use crate::app::{AccountId, ChainId};
use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// The next unused outbound nonce of the TSS account on one chain.
#[derive(Encode, Decode, Serialize, Deserialize, Clone, PartialEq, Eq, Debug, Default)]
pub struct ChainNonces {
    /// The account that created the record (genesis or the first finalizer).
    pub creator: AccountId,
    /// The chain this counter belongs to.
    pub chain_id: ChainId,
    /// Lowest nonce not yet bound to a cross-chain transaction.
    pub nonce: u64,
    /// Observers that finalized nonces on this chain.
    pub signers: Vec<AccountId>,
    /// Block height of the last finalization.
    pub finalized_height: u64,
}

/// The half-open window `[nonce_low, nonce_high)` reserved for one signer.
#[derive(Encode, Decode, Serialize, Deserialize, Clone, PartialEq, Eq, Debug, Default)]
pub struct PendingNonces {
    /// The chain this window belongs to.
    pub chain_id: ChainId,
    /// The TSS public key the window is reserved for.
    pub tss: String,
    /// Inclusive lower bound.
    pub nonce_low: u64,
    /// Exclusive upper bound.
    pub nonce_high: u64,
}

impl PendingNonces {
    /// True when every nonce of the window has been consumed.
    pub fn is_drained(&self) -> bool {
        self.nonce_low >= self.nonce_high
    }

    /// True when `nonce` lies inside the window.
    pub fn contains(&self, nonce: u64) -> bool {
        self.nonce_low <= nonce && nonce < self.nonce_high
    }
}

/// The write-once binding of an outbound nonce to a cross-chain transaction.
#[derive(Encode, Decode, Serialize, Deserialize, Clone, PartialEq, Eq, Debug, Default)]
pub struct NonceToCctx {
    /// The chain the nonce belongs to.
    pub chain_id: ChainId,
    /// The bound nonce.
    pub nonce: u64,
    /// Index of the cross-chain transaction using the nonce.
    pub cctx_index: String,
}
