// Path: crates/services/src/genesis.rs
//! Import and export of the module's records.

use crate::nonce::{get_all_chain_nonces, get_chain_nonces, set_chain_nonces};
use crate::observer::mapper::{get_all_observer_mappers, refresh_last_observer_count, set_observer_mapper};
use crate::observer::node_account::{get_all_node_accounts, set_node_account};
use crate::observer::{get_crosschain_flags, get_params, set_crosschain_flags, set_params};
use crate::tss::{append_tss_history, get_keygen, get_tss, get_tss_history, set_keygen, set_tss};
use xchain_api::state::StateAccess;
use xchain_types::app::{ChainNonces, CrosschainFlags};
use xchain_types::config::GenesisState;
use xchain_types::error::TransactionError;

/// Writes `genesis` into `state`. Supported chains without a nonce counter
/// start at nonce zero, and the observer count is initialized at height 0.
pub fn init_genesis(state: &mut dyn StateAccess, genesis: &GenesisState) -> Result<(), TransactionError> {
    if !genesis.params.ballot_threshold.is_valid_threshold() {
        return Err(TransactionError::Invalid(format!(
            "genesis ballot_threshold must be in (0, 1], got {}",
            genesis.params.ballot_threshold
        )));
    }
    set_params(state, &genesis.params)?;
    for mapper in &genesis.observer_mappers {
        if genesis.params.chain(mapper.chain_id()).is_none() {
            log::warn!(
                "Observer list for unsupported chain {} imported anyway",
                mapper.chain_id()
            );
        }
        set_observer_mapper(state, mapper)?;
    }
    for account in &genesis.node_accounts {
        set_node_account(state, account)?;
    }
    set_crosschain_flags(state, &genesis.crosschain_flags)?;

    for nonces in &genesis.chain_nonces {
        set_chain_nonces(state, nonces)?;
    }
    for chain in &genesis.params.supported_chains {
        if get_chain_nonces(state, chain.chain_id)?.is_none() {
            set_chain_nonces(
                state,
                &ChainNonces {
                    chain_id: chain.chain_id,
                    ..Default::default()
                },
            )?;
        }
    }

    for tss in &genesis.tss_history {
        append_tss_history(state, tss)?;
    }
    if let Some(tss) = &genesis.tss {
        set_tss(state, tss)?;
        if !genesis.tss_history.contains(tss) {
            append_tss_history(state, tss)?;
        }
    }
    if let Some(keygen) = &genesis.keygen {
        set_keygen(state, keygen)?;
    }

    let count = refresh_last_observer_count(state, 0)?;
    log::info!(
        "Genesis imported: {} chains, {} distinct observers, {} node accounts",
        genesis.params.supported_chains.len(),
        count.count,
        genesis.node_accounts.len()
    );
    Ok(())
}

/// Reads every genesis record back out of `state`.
pub fn export_genesis(state: &dyn StateAccess) -> Result<GenesisState, TransactionError> {
    Ok(GenesisState {
        params: get_params(state)?,
        observer_mappers: get_all_observer_mappers(state)?,
        node_accounts: get_all_node_accounts(state)?,
        crosschain_flags: get_crosschain_flags(state)?.unwrap_or(CrosschainFlags {
            is_inbound_enabled: false,
            is_outbound_enabled: false,
        }),
        chain_nonces: get_all_chain_nonces(state)?,
        tss: get_tss(state)?,
        tss_history: get_tss_history(state)?,
        keygen: get_keygen(state)?,
    })
}
