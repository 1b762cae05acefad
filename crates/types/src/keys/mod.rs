// Path: crates/types/src/keys/mod.rs
//! Defines the state key layout for every persisted entity.
//!
//! Each entity kind lives under its own fixed prefix so that a prefix scan
//! returns exactly the records of that kind, in key order. Numeric key
//! components are big-endian so that byte order equals numeric order.

use crate::app::{AccountId, ChainId};

/// The state key for the singleton `ObserverParams`.
pub const OBSERVER_PARAMS_KEY: &[u8] = b"observer::params";
/// The state key prefix for `ObserverMapper` records, keyed by chain id.
pub const OBSERVER_MAPPER_PREFIX: &[u8] = b"observer::mapper::";
/// The state key prefix for `NodeAccount` records, keyed by operator.
pub const NODE_ACCOUNT_PREFIX: &[u8] = b"observer::node_account::";
/// The state key prefix for `Ballot` records, keyed by ballot index.
pub const BALLOT_PREFIX: &[u8] = b"observer::ballot::";
/// The state key for the singleton `LastObserverCount`.
pub const LAST_OBSERVER_COUNT_KEY: &[u8] = b"observer::last_observer_count";
/// The state key for the singleton `CrosschainFlags`.
pub const CROSSCHAIN_FLAGS_KEY: &[u8] = b"observer::crosschain_flags";

/// The state key prefix for `ChainNonces` records, keyed by chain id.
pub const CHAIN_NONCES_PREFIX: &[u8] = b"crosschain::chain_nonces::";
/// The state key prefix for `PendingNonces` records, keyed by chain id and TSS pubkey.
pub const PENDING_NONCES_PREFIX: &[u8] = b"crosschain::pending_nonces::";
/// The state key prefix for `NonceToCctx` bindings, keyed by chain id and nonce.
pub const NONCE_TO_CCTX_PREFIX: &[u8] = b"crosschain::nonce_to_cctx::";

/// The state key for the currently active `Tss`.
pub const TSS_KEY: &[u8] = b"tss::current";
/// The state key prefix for historical `Tss` records, keyed by finalized height.
pub const TSS_HISTORY_PREFIX: &[u8] = b"tss::history::";
/// The state key for the singleton `Keygen` round.
pub const KEYGEN_KEY: &[u8] = b"tss::keygen";
/// The state key prefix for in-flight `TssFundMigratorInfo` records, keyed by chain id.
pub const TSS_FUND_MIGRATOR_PREFIX: &[u8] = b"tss::fund_migrator::";
/// The state key prefix for `Blame` records, keyed by blame index.
pub const BLAME_PREFIX: &[u8] = b"tss::blame::";

/// Encodes a signed chain id so that byte order matches numeric order.
pub fn chain_id_bytes(chain_id: ChainId) -> [u8; 8] {
    ((chain_id as u64) ^ (1u64 << 63)).to_be_bytes()
}

/// Key of the observer list for `chain_id`.
pub fn observer_mapper_key(chain_id: ChainId) -> Vec<u8> {
    [OBSERVER_MAPPER_PREFIX, &chain_id_bytes(chain_id)].concat()
}

/// Key of the node account owned by `operator`.
pub fn node_account_key(operator: &AccountId) -> Vec<u8> {
    [NODE_ACCOUNT_PREFIX, operator.as_ref()].concat()
}

/// Key of the ballot with the given index.
pub fn ballot_key(index: &str) -> Vec<u8> {
    [BALLOT_PREFIX, index.as_bytes()].concat()
}

/// Key of the nonce counter for `chain_id`.
pub fn chain_nonces_key(chain_id: ChainId) -> Vec<u8> {
    [CHAIN_NONCES_PREFIX, &chain_id_bytes(chain_id)].concat()
}

/// Prefix of every pending window on `chain_id`, regardless of signer.
pub fn pending_nonces_chain_prefix(chain_id: ChainId) -> Vec<u8> {
    [PENDING_NONCES_PREFIX, &chain_id_bytes(chain_id), b"::"].concat()
}

/// Key of the pending window owned by `tss` on `chain_id`.
pub fn pending_nonces_key(chain_id: ChainId, tss: &str) -> Vec<u8> {
    [pending_nonces_chain_prefix(chain_id).as_slice(), tss.as_bytes()].concat()
}

/// Prefix of every nonce binding on `chain_id`.
pub fn nonce_to_cctx_chain_prefix(chain_id: ChainId) -> Vec<u8> {
    [NONCE_TO_CCTX_PREFIX, &chain_id_bytes(chain_id)].concat()
}

/// Key of the binding for `nonce` on `chain_id`.
pub fn nonce_to_cctx_key(chain_id: ChainId, nonce: u64) -> Vec<u8> {
    [
        NONCE_TO_CCTX_PREFIX,
        &chain_id_bytes(chain_id),
        &nonce.to_be_bytes(),
    ]
    .concat()
}

/// Key of the historical TSS record finalized at `height`.
pub fn tss_history_key(finalized_height: u64) -> Vec<u8> {
    [TSS_HISTORY_PREFIX, &finalized_height.to_be_bytes()].concat()
}

/// Key of the fund migration record for `chain_id`.
pub fn fund_migrator_key(chain_id: ChainId) -> Vec<u8> {
    [TSS_FUND_MIGRATOR_PREFIX, &chain_id_bytes(chain_id)].concat()
}

/// Key of the blame record with the given index.
pub fn blame_key(index: &str) -> Vec<u8> {
    [BLAME_PREFIX, index.as_bytes()].concat()
}
