// Path: crates/services/src/query.rs
//! Read-only queries. Single-record lookups report a missing record as
//! `NotFound`; collection queries are paginated by key cursor.

use crate::nonce::{get_chain_nonces, get_nonce_to_cctx, get_pending_nonces, pending_nonces_by_chain};
use crate::observer::ballot::get_ballot;
use crate::observer::mapper::get_observer_mapper;
use crate::observer::node_account::get_node_account;
use crate::observer::{get_crosschain_flags, get_last_observer_count, get_params};
use crate::tss::{get_blame, get_fund_migrator, get_keygen, get_tss, get_tss_history};
use parity_scale_codec::Decode;
use xchain_api::query::{paginate, PageRequest, PageResponse};
use xchain_api::state::StateAccess;
use xchain_types::app::{
    AccountId, Ballot, Blame, ChainId, ChainNonces, CrosschainFlags, Keygen, LastObserverCount,
    NodeAccount, NonceToCctx, ObserverParams, PendingNonces, Tss, TssFundMigratorInfo,
};
use xchain_types::codec::decode_state_value;
use xchain_types::error::{ObserverError, TransactionError};
use xchain_types::keys::{BALLOT_PREFIX, BLAME_PREFIX, NODE_ACCOUNT_PREFIX};
use xchain_types::prelude::OptionExt;

/// One page of a collection query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: PageResponse,
}

fn page_of<T: Decode>(
    state: &dyn StateAccess,
    prefix: &[u8],
    page: &PageRequest,
) -> Result<Page<T>, TransactionError> {
    let (items, pagination) = paginate(state, prefix, page, |_, value| decode_state_value(value))?;
    Ok(Page { items, pagination })
}

fn not_found(what: String) -> TransactionError {
    TransactionError::NotFound(what)
}

pub fn params(state: &dyn StateAccess) -> Result<ObserverParams, TransactionError> {
    get_params(state)
}

pub fn crosschain_flags(state: &dyn StateAccess) -> Result<CrosschainFlags, TransactionError> {
    get_crosschain_flags(state)?.ok_or_else(|| not_found("crosschain flags".into()))
}

pub fn last_observer_count(state: &dyn StateAccess) -> Result<LastObserverCount, TransactionError> {
    Ok(get_last_observer_count(state)?.required(ObserverError::LastObserverCountNotFound)?)
}

/// The observer list of `chain_id`, duplicates included.
pub fn observers_by_chain(
    state: &dyn StateAccess,
    chain_id: ChainId,
) -> Result<Vec<AccountId>, TransactionError> {
    Ok(get_observer_mapper(state, chain_id)?
        .required(ObserverError::ObserverMapperNotFound(chain_id))?
        .observer_list)
}

pub fn node_account(state: &dyn StateAccess, operator: &AccountId) -> Result<NodeAccount, TransactionError> {
    get_node_account(state, operator)?.ok_or_else(|| not_found(format!("node account {}", operator)))
}

pub fn node_account_all(
    state: &dyn StateAccess,
    page: &PageRequest,
) -> Result<Page<NodeAccount>, TransactionError> {
    page_of(state, NODE_ACCOUNT_PREFIX, page)
}

pub fn ballot(state: &dyn StateAccess, index: &str) -> Result<Ballot, TransactionError> {
    Ok(get_ballot(state, index)?.required_with(|| ObserverError::BallotNotFound(index.to_string()))?)
}

pub fn ballots(state: &dyn StateAccess, page: &PageRequest) -> Result<Page<Ballot>, TransactionError> {
    page_of(state, BALLOT_PREFIX, page)
}

pub fn chain_nonces(state: &dyn StateAccess, chain_id: ChainId) -> Result<ChainNonces, TransactionError> {
    get_chain_nonces(state, chain_id)?.ok_or_else(|| not_found(format!("chain nonces for {}", chain_id)))
}

pub fn pending_nonces(
    state: &dyn StateAccess,
    chain_id: ChainId,
    tss: &str,
) -> Result<PendingNonces, TransactionError> {
    get_pending_nonces(state, chain_id, tss)?
        .ok_or_else(|| not_found(format!("pending nonces of {} on chain {}", tss, chain_id)))
}

pub fn pending_nonces_all(
    state: &dyn StateAccess,
    chain_id: ChainId,
) -> Result<Vec<PendingNonces>, TransactionError> {
    Ok(pending_nonces_by_chain(state, chain_id)?)
}

pub fn nonce_to_cctx(
    state: &dyn StateAccess,
    chain_id: ChainId,
    nonce: u64,
) -> Result<NonceToCctx, TransactionError> {
    get_nonce_to_cctx(state, chain_id, nonce)?
        .ok_or_else(|| not_found(format!("binding of nonce {} on chain {}", nonce, chain_id)))
}

pub fn tss(state: &dyn StateAccess) -> Result<Tss, TransactionError> {
    crate::tss::active_tss(state)
}

pub fn tss_history(state: &dyn StateAccess) -> Result<Vec<Tss>, TransactionError> {
    Ok(get_tss_history(state)?)
}

pub fn keygen(state: &dyn StateAccess) -> Result<Keygen, TransactionError> {
    get_keygen(state)?.ok_or_else(|| not_found("keygen".into()))
}

pub fn fund_migrator(
    state: &dyn StateAccess,
    chain_id: ChainId,
) -> Result<TssFundMigratorInfo, TransactionError> {
    get_fund_migrator(state, chain_id)?
        .ok_or_else(|| not_found(format!("fund migration on chain {}", chain_id)))
}

pub fn blame(state: &dyn StateAccess, index: &str) -> Result<Blame, TransactionError> {
    Ok(get_blame(state, index)?
        .required_with(|| xchain_types::error::TssError::BlameNotFound(index.to_string()))?)
}

pub fn blames(state: &dyn StateAccess, page: &PageRequest) -> Result<Page<Blame>, TransactionError> {
    page_of(state, BLAME_PREFIX, page)
}
