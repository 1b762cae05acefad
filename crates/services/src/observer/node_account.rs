// Path: crates/services/src/observer/node_account.rs
//! Node account directory, keyed by operator address.

use crate::store::{exists, load, load_all, save};
use xchain_api::state::StateAccess;
use xchain_types::app::{AccountId, NodeAccount, NodeStatus, PubKeySet};
use xchain_types::error::{ObserverError, StateError, TransactionError};
use xchain_types::keys::{node_account_key, NODE_ACCOUNT_PREFIX};
use xchain_types::prelude::OptionExt;

pub fn get_node_account(
    state: &dyn StateAccess,
    operator: &AccountId,
) -> Result<Option<NodeAccount>, StateError> {
    load(state, &node_account_key(operator))
}

pub fn set_node_account(state: &mut dyn StateAccess, account: &NodeAccount) -> Result<(), StateError> {
    save(state, &node_account_key(&account.operator), account)
}

pub fn remove_node_account(state: &mut dyn StateAccess, operator: &AccountId) -> Result<(), StateError> {
    state.delete(&node_account_key(operator))
}

pub fn get_all_node_accounts(state: &dyn StateAccess) -> Result<Vec<NodeAccount>, StateError> {
    load_all(state, NODE_ACCOUNT_PREFIX)
}

/// Moves a node account between lifecycle statuses.
pub fn set_node_status(
    state: &mut dyn StateAccess,
    operator: &AccountId,
    status: NodeStatus,
) -> Result<NodeAccount, TransactionError> {
    let mut account = get_node_account(state, operator)?
        .required_with(|| ObserverError::NodeAccountNotFound(*operator))?;
    account.node_status = status;
    set_node_account(state, &account)?;
    Ok(account)
}

/// Registers the signing keys of `creator`'s node. The account starts in
/// `NodeStatus::Unknown` and must not exist yet.
pub fn set_node_keys(
    state: &mut dyn StateAccess,
    creator: &AccountId,
    pubkey_set: PubKeySet,
) -> Result<NodeAccount, TransactionError> {
    if exists(state, &node_account_key(creator))? {
        return Err(ObserverError::NodeAccountAlreadyExists(*creator).into());
    }
    let account = NodeAccount {
        operator: *creator,
        grantee_address: *creator,
        grantee_pubkey: pubkey_set,
        node_status: NodeStatus::Unknown,
    };
    set_node_account(state, &account)?;
    log::info!("Registered node keys for {}", creator);
    Ok(account)
}

/// Moves `old`'s node account under `new`, updating the operator field and
/// preserving every other field. An account already stored at `new` is
/// replaced and its keys are dropped.
pub fn rekey_node_account(
    state: &mut dyn StateAccess,
    old: &AccountId,
    new: &AccountId,
) -> Result<NodeAccount, TransactionError> {
    let mut account = get_node_account(state, old)?
        .required_with(|| ObserverError::NodeAccountNotFound(*old))?;
    if let Some(existing) = get_node_account(state, new)? {
        log::warn!(
            "Node account of {} (secp256k1 {}) replaced by keys moved from {}",
            new,
            existing.grantee_pubkey.secp256k1,
            old
        );
    }
    remove_node_account(state, old)?;
    account.operator = *new;
    set_node_account(state, &account)?;
    Ok(account)
}
