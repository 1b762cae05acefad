// Path: crates/services/src/observer/mod.rs
//! Observer set: membership lists, node accounts, ballots, and the module
//! singletons (params, crosschain flags, last observer count).

use crate::store::{load, save};
use xchain_api::oracle::PolicyOracle;
use xchain_api::state::StateAccess;
use xchain_api::transaction::context::TxContext;
use xchain_types::app::{CrosschainFlags, LastObserverCount, ObservationType, ObserverParams, PolicyType};
use xchain_types::error::{ObserverError, StateError, TransactionError};
use xchain_types::keys::{CROSSCHAIN_FLAGS_KEY, LAST_OBSERVER_COUNT_KEY, OBSERVER_PARAMS_KEY};
use xchain_types::prelude::OptionExt;

pub mod ballot;
pub mod mapper;
pub mod node_account;
pub mod observation;
pub mod update;

#[cfg(test)]
mod tests;

pub fn get_params(state: &dyn StateAccess) -> Result<ObserverParams, TransactionError> {
    Ok(load::<ObserverParams>(state, OBSERVER_PARAMS_KEY)?.required(ObserverError::ParamsNotFound)?)
}

pub fn set_params(state: &mut dyn StateAccess, params: &ObserverParams) -> Result<(), StateError> {
    save(state, OBSERVER_PARAMS_KEY, params)
}

pub fn get_crosschain_flags(state: &dyn StateAccess) -> Result<Option<CrosschainFlags>, StateError> {
    load(state, CROSSCHAIN_FLAGS_KEY)
}

pub fn set_crosschain_flags(
    state: &mut dyn StateAccess,
    flags: &CrosschainFlags,
) -> Result<(), StateError> {
    save(state, CROSSCHAIN_FLAGS_KEY, flags)
}

/// Fails unless observations of `observation_type` are currently accepted.
/// Missing flags count as disabled.
pub fn ensure_flow_enabled(
    state: &dyn StateAccess,
    observation_type: ObservationType,
) -> Result<(), TransactionError> {
    let flags = get_crosschain_flags(state)?.unwrap_or(CrosschainFlags {
        is_inbound_enabled: false,
        is_outbound_enabled: false,
    });
    match observation_type {
        ObservationType::InBoundTx if !flags.is_inbound_enabled => {
            Err(ObserverError::InboundDisabled.into())
        }
        ObservationType::OutBoundTx if !flags.is_outbound_enabled => {
            Err(ObserverError::OutboundDisabled.into())
        }
        _ => Ok(()),
    }
}

/// Emergency switch for inbound observation and outbound signing.
/// Requires policy group 1.
pub fn update_crosschain_flags(
    state: &mut dyn StateAccess,
    policies: &dyn PolicyOracle,
    ctx: &TxContext,
    flags: CrosschainFlags,
) -> Result<(), TransactionError> {
    if !policies.has_capability(&ctx.signer_account_id, PolicyType::Group1) {
        return Err(TransactionError::Unauthorized(format!(
            "{} lacks policy group 1",
            ctx.signer_account_id
        )));
    }
    set_crosschain_flags(state, &flags)?;
    log::info!(
        "Crosschain flags updated by {}: inbound={}, outbound={}",
        ctx.signer_account_id,
        flags.is_inbound_enabled,
        flags.is_outbound_enabled
    );
    Ok(())
}

pub fn get_last_observer_count(
    state: &dyn StateAccess,
) -> Result<Option<LastObserverCount>, StateError> {
    load(state, LAST_OBSERVER_COUNT_KEY)
}

pub fn set_last_observer_count(
    state: &mut dyn StateAccess,
    count: &LastObserverCount,
) -> Result<(), StateError> {
    save(state, LAST_OBSERVER_COUNT_KEY, count)
}
