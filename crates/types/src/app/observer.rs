// Path: crates/types/src/app/observer.rs

//! Observer membership records.

use crate::app::{AccountId, Chain, ChainId, Dec};
use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// The ordered list of observers authorized to vote on events of one chain.
///
/// Duplicates are permitted in the stored list; each distinct address is a
/// single voter.
#[derive(Encode, Decode, Serialize, Deserialize, Clone, PartialEq, Eq, Debug, Default)]
pub struct ObserverMapper {
    /// The chain these observers watch.
    pub observer_chain: Chain,
    /// The observer addresses, in registration order.
    pub observer_list: Vec<AccountId>,
}

impl ObserverMapper {
    /// The chain id this mapper is keyed by.
    pub fn chain_id(&self) -> ChainId {
        self.observer_chain.chain_id
    }

    /// True when `address` appears anywhere in the list.
    pub fn contains(&self, address: &AccountId) -> bool {
        self.observer_list.contains(address)
    }
}

/// The lifecycle status of a node account. Transitions are driven externally.
#[derive(Encode, Decode, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug, Default)]
#[serde(rename_all = "snake_case")]
pub enum NodeStatus {
    /// Registered, not yet activated.
    #[default]
    Unknown,
    /// Participating in signing.
    Active,
    /// Excluded from signing.
    Disabled,
}

/// The public keys an observer's node uses for threshold signing.
#[derive(Encode, Decode, Serialize, Deserialize, Clone, PartialEq, Eq, Debug, Default)]
pub struct PubKeySet {
    /// Encoded secp256k1 public key.
    pub secp256k1: String,
    /// Encoded ed25519 public key.
    pub ed25519: String,
}

/// Per-observer operational record, keyed by its operator address.
#[derive(Encode, Decode, Serialize, Deserialize, Clone, PartialEq, Eq, Debug, Default)]
pub struct NodeAccount {
    /// The observer (validator operator) that owns this node.
    pub operator: AccountId,
    /// The hot key the node signs observer messages with.
    pub grantee_address: AccountId,
    /// The node's signing public keys.
    pub grantee_pubkey: PubKeySet,
    /// The node's lifecycle status.
    pub node_status: NodeStatus,
}

/// The number of distinct observers, recorded whenever it changes.
#[derive(Encode, Decode, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct LastObserverCount {
    /// Distinct observers across every chain.
    pub count: u64,
    /// Block height at which `count` last changed.
    pub last_change_height: u64,
}

/// Global switches for inbound observation and outbound signing.
#[derive(Encode, Decode, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub struct CrosschainFlags {
    /// Inbound observations may be voted on.
    pub is_inbound_enabled: bool,
    /// Outbound nonces may be allocated and outbound observations voted on.
    pub is_outbound_enabled: bool,
}

impl Default for CrosschainFlags {
    fn default() -> Self {
        Self {
            is_inbound_enabled: true,
            is_outbound_enabled: true,
        }
    }
}

/// Why an observer address is being replaced.
#[derive(Encode, Decode, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
#[serde(rename_all = "snake_case")]
pub enum ObserverUpdateReason {
    /// The old observer's validator was tombstoned; the old observer replaces itself.
    Tombstoned,
    /// An admin (policy group 2) replaces the observer.
    AdminUpdate,
}

fn default_ballot_threshold() -> Dec {
    Dec::from_raw(660_000_000_000_000_000)
}

/// Module parameters for the observer set.
#[derive(Encode, Decode, Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct ObserverParams {
    /// Chains with an observer list and a nonce counter.
    #[serde(default)]
    pub supported_chains: Vec<Chain>,
    /// Fraction of voters required to finalize an observation ballot.
    #[serde(default = "default_ballot_threshold")]
    pub ballot_threshold: Dec,
    /// Blocks a finalized ballot is kept before pruning. Zero keeps ballots forever.
    #[serde(default)]
    pub ballot_retention_blocks: u64,
}

impl Default for ObserverParams {
    fn default() -> Self {
        Self {
            supported_chains: Vec::new(),
            ballot_threshold: default_ballot_threshold(),
            ballot_retention_blocks: 0,
        }
    }
}

impl ObserverParams {
    /// Looks up a supported chain by id.
    pub fn chain(&self, chain_id: ChainId) -> Option<&Chain> {
        self.supported_chains.iter().find(|c| c.chain_id == chain_id)
    }
}
