// Path: crates/types/src/config/genesis.rs

use crate::app::{
    ChainNonces, CrosschainFlags, Keygen, NodeAccount, ObserverMapper, ObserverParams, Tss,
};
use serde::{Deserialize, Serialize};

/// Records written by `init_genesis` and read back by `export_genesis`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct GenesisState {
    /// Module parameters.
    #[serde(default)]
    pub params: ObserverParams,
    /// Observer lists, one per supported chain.
    #[serde(default)]
    pub observer_mappers: Vec<ObserverMapper>,
    /// Registered node accounts.
    #[serde(default)]
    pub node_accounts: Vec<NodeAccount>,
    /// Inbound/outbound switches.
    #[serde(default)]
    pub crosschain_flags: CrosschainFlags,
    /// Nonce counters. Supported chains without one start at zero.
    #[serde(default)]
    pub chain_nonces: Vec<ChainNonces>,
    /// The active TSS, if any.
    #[serde(default)]
    pub tss: Option<Tss>,
    /// Every finalized TSS key, the active one included, oldest first.
    #[serde(default)]
    pub tss_history: Vec<Tss>,
    /// The latest key-generation round, if any.
    #[serde(default)]
    pub keygen: Option<Keygen>,
}
