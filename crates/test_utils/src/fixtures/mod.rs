//! Sample records with predictable contents.
//!
//! Builders take small integers so that tests can name participants
//! (`account(1)`, `account(2)`) instead of carrying random bytes around.

use std::collections::BTreeMap;
use xchain_types::app::{
    AccountId, Ballot, BallotStatus, Blame, Chain, ChainId, ChainNonces, ConsensusAddress, Dec,
    Keygen, KeygenStatus, NodeAccount, NodeStatus, NonceToCctx, ObservationType, ObserverMapper,
    ObserverParams, PendingNonces, PubKeySet, Tss, TssFundMigratorInfo, VoteType,
};
use xchain_types::config::GenesisState;

/// An account whose 32 bytes all equal `n`.
pub fn account(n: u8) -> AccountId {
    AccountId([n; 32])
}

/// `count` accounts numbered from `start`.
pub fn accounts(start: u8, count: u8) -> Vec<AccountId> {
    (0..count).map(|i| account(start.wrapping_add(i))).collect()
}

/// The consensus address the mock oracle assigns to `operator` by default.
pub fn consensus_of(operator: &AccountId) -> ConsensusAddress {
    let mut bytes = [0u8; 20];
    for (dst, src) in bytes.iter_mut().zip(operator.0.iter()) {
        *dst = *src;
    }
    ConsensusAddress(bytes)
}

/// A chain named after its id.
pub fn chain(chain_id: ChainId) -> Chain {
    Chain {
        chain_id,
        chain_name: format!("chain_{}", chain_id),
    }
}

/// An observer list for `chain_id`.
pub fn observer_mapper(chain_id: ChainId, observers: Vec<AccountId>) -> ObserverMapper {
    ObserverMapper {
        observer_chain: chain(chain_id),
        observer_list: observers,
    }
}

fn short_hex(operator: &AccountId) -> String {
    hex::encode(operator.0.iter().take(8).copied().collect::<Vec<u8>>())
}

/// The secp256k1 grantee key `node_account` assigns to `operator`.
pub fn grantee_pubkey(operator: &AccountId) -> String {
    format!("secp-{}", short_hex(operator))
}

/// An active node account for `operator`.
pub fn node_account(operator: AccountId) -> NodeAccount {
    NodeAccount {
        operator,
        grantee_address: operator,
        grantee_pubkey: PubKeySet {
            secp256k1: grantee_pubkey(&operator),
            ed25519: format!("ed-{}", short_hex(&operator)),
        },
        node_status: NodeStatus::Active,
    }
}

/// A TSS record.
pub fn tss(pubkey: &str, finalized_height: u64) -> Tss {
    Tss {
        tss_pubkey: pubkey.to_string(),
        tss_participant_list: vec![format!("{}-p1", pubkey), format!("{}-p2", pubkey)],
        finalized_zeta_height: finalized_height,
        keygen_zeta_height: finalized_height.saturating_sub(1),
    }
}

/// A pending keygen round for the given grantee keys.
pub fn keygen(grantee_pubkeys: Vec<String>, block_number: u64) -> Keygen {
    Keygen {
        status: KeygenStatus::PendingKeygen,
        grantee_pubkeys,
        block_number,
    }
}

/// A nonce counter.
pub fn chain_nonces(chain_id: ChainId, nonce: u64) -> ChainNonces {
    ChainNonces {
        creator: AccountId::default(),
        chain_id,
        nonce,
        signers: Vec::new(),
        finalized_height: 0,
    }
}

/// A pending window.
pub fn pending_nonces(chain_id: ChainId, tss: &str, low: u64, high: u64) -> PendingNonces {
    PendingNonces {
        chain_id,
        tss: tss.to_string(),
        nonce_low: low,
        nonce_high: high,
    }
}

/// A nonce binding.
pub fn nonce_to_cctx(chain_id: ChainId, nonce: u64) -> NonceToCctx {
    NonceToCctx {
        chain_id,
        nonce,
        cctx_index: format!("cctx-{}-{}", chain_id, nonce),
    }
}

/// A fund migration record.
pub fn fund_migrator(chain_id: ChainId) -> TssFundMigratorInfo {
    TssFundMigratorInfo {
        chain_id,
        migration_cctx_index: format!("migration-{}", chain_id),
    }
}

/// A blame record.
pub fn blame(height: u64, index: &str, nodes: Vec<String>) -> Blame {
    Blame {
        index: Blame::make_index(height, index),
        failure_reason: "keygen timed out".to_string(),
        nodes,
    }
}

/// An in-progress ballot where every voter has yet to vote.
pub fn ballot(index: &str, voters: &[AccountId], threshold: Dec) -> Ballot {
    Ballot {
        index: index.to_string(),
        ballot_identifier: index.to_string(),
        votes: voters
            .iter()
            .map(|v| (*v, VoteType::NotYetVoted))
            .collect::<BTreeMap<_, _>>(),
        observation_type: ObservationType::InBoundTx,
        ballot_threshold: threshold,
        ballot_status: BallotStatus::InProgress,
        ballot_creation_height: 1,
    }
}

/// Genesis for the given chains, each observed by every account in `observers`,
/// with an active node account per observer, an active TSS `"tss-genesis"`,
/// and the given threshold.
pub fn genesis(chain_ids: &[ChainId], observers: &[AccountId], threshold: Dec) -> GenesisState {
    let chains: Vec<Chain> = chain_ids.iter().map(|id| chain(*id)).collect();
    GenesisState {
        params: ObserverParams {
            supported_chains: chains,
            ballot_threshold: threshold,
            ballot_retention_blocks: 0,
        },
        observer_mappers: chain_ids
            .iter()
            .map(|id| observer_mapper(*id, observers.to_vec()))
            .collect(),
        node_accounts: observers.iter().map(|o| node_account(*o)).collect(),
        tss: Some(tss("tss-genesis", 1)),
        tss_history: vec![tss("tss-genesis", 1)],
        ..Default::default()
    }
}
