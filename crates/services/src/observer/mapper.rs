// Path: crates/services/src/observer/mapper.rs
//! Per-chain observer lists.

use super::{get_last_observer_count, set_last_observer_count};
use crate::store::{load, load_all, save};
use std::collections::BTreeSet;
use xchain_api::state::StateAccess;
use xchain_types::app::{AccountId, ChainId, LastObserverCount, ObserverMapper};
use xchain_types::error::StateError;
use xchain_types::keys::{observer_mapper_key, OBSERVER_MAPPER_PREFIX};

pub fn get_observer_mapper(
    state: &dyn StateAccess,
    chain_id: ChainId,
) -> Result<Option<ObserverMapper>, StateError> {
    load(state, &observer_mapper_key(chain_id))
}

pub fn set_observer_mapper(
    state: &mut dyn StateAccess,
    mapper: &ObserverMapper,
) -> Result<(), StateError> {
    save(state, &observer_mapper_key(mapper.chain_id()), mapper)
}

/// Every observer list, ordered by chain id.
pub fn get_all_observer_mappers(state: &dyn StateAccess) -> Result<Vec<ObserverMapper>, StateError> {
    load_all(state, OBSERVER_MAPPER_PREFIX)
}

pub fn is_observer_for_chain(
    state: &dyn StateAccess,
    chain_id: ChainId,
    address: &AccountId,
) -> Result<bool, StateError> {
    Ok(get_observer_mapper(state, chain_id)?
        .map(|m| m.contains(address))
        .unwrap_or(false))
}

/// Distinct addresses of the observer list, in ballot voter order.
pub fn distinct_observers(mapper: &ObserverMapper) -> Vec<AccountId> {
    mapper
        .observer_list
        .iter()
        .copied()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Replaces every occurrence of `old` with `new`, in place. Length and
/// order are preserved. Returns the number of replaced entries.
pub fn update_observer_list(list: &mut [AccountId], old: &AccountId, new: &AccountId) -> usize {
    let mut replaced = 0;
    for entry in list.iter_mut().filter(|entry| **entry == *old) {
        *entry = *new;
        replaced += 1;
    }
    replaced
}

/// Applies `update_observer_list` to every chain's list, writing back only
/// the lists that changed. Returns the number of lists written.
pub fn update_observer_address(
    state: &mut dyn StateAccess,
    old: &AccountId,
    new: &AccountId,
) -> Result<usize, StateError> {
    let mut changed = 0;
    for mut mapper in get_all_observer_mappers(state)? {
        if update_observer_list(&mut mapper.observer_list, old, new) > 0 {
            set_observer_mapper(state, &mapper)?;
            changed += 1;
        }
    }
    Ok(changed)
}

/// Number of distinct observers across every chain.
pub fn count_distinct_observers(state: &dyn StateAccess) -> Result<u64, StateError> {
    let mut all = BTreeSet::new();
    for mapper in get_all_observer_mappers(state)? {
        all.extend(mapper.observer_list);
    }
    Ok(all.len() as u64)
}

/// Recomputes the distinct observer count and rewrites `LastObserverCount`
/// when it changed (or was never written).
pub fn refresh_last_observer_count(
    state: &mut dyn StateAccess,
    height: u64,
) -> Result<LastObserverCount, StateError> {
    let count = count_distinct_observers(state)?;
    match get_last_observer_count(state)? {
        Some(last) if last.count == count => Ok(last),
        _ => {
            let updated = LastObserverCount {
                count,
                last_change_height: height,
            };
            set_last_observer_count(state, &updated)?;
            log::debug!("Observer count is now {} at height {}", count, height);
            Ok(updated)
        }
    }
}
