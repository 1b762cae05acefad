// Path: crates/services/src/observer/update.rs
//! Replacement of one observer address by another across every chain.

use super::get_last_observer_count;
use super::mapper::{refresh_last_observer_count, update_observer_address};
use super::node_account::{get_node_account, rekey_node_account};
use xchain_api::oracle::{PolicyOracle, ValidatorStatusOracle};
use xchain_api::state::StateAccess;
use xchain_api::transaction::context::TxContext;
use xchain_types::app::{AccountId, ObserverUpdateReason, PolicyType};
use xchain_types::error::{ObserverError, TransactionError};

/// Replaces `old` with `new` in every observer list and moves its node
/// account.
///
/// `Tombstoned` may only be submitted by `old` itself, and only once its
/// validator is tombstoned. `AdminUpdate` requires policy group 2. In both
/// cases `new` must be a bonded validator. All checks run before any write.
pub fn update_observer(
    state: &mut dyn StateAccess,
    validators: &dyn ValidatorStatusOracle,
    policies: &dyn PolicyOracle,
    ctx: &TxContext,
    old: &AccountId,
    new: &AccountId,
    reason: ObserverUpdateReason,
) -> Result<(), TransactionError> {
    if old == new {
        return Err(TransactionError::Invalid(
            "old and new observer addresses are identical".into(),
        ));
    }
    let consensus = validators
        .consensus_addr_of(old)
        .map_err(|e| ObserverError::UpdateObserver(format!("cannot resolve {}: {}", old, e)))?;

    let creator = &ctx.signer_account_id;
    let authorized = match reason {
        ObserverUpdateReason::Tombstoned => creator == old && validators.is_tombstoned(&consensus),
        ObserverUpdateReason::AdminUpdate => policies.has_capability(creator, PolicyType::Group2),
    };
    if !authorized {
        return Err(ObserverError::UpdateObserver(format!(
            "{} may not replace {} with reason {:?}",
            creator, old, reason
        ))
        .into());
    }
    if !validators.is_bonded(new) {
        return Err(
            ObserverError::UpdateObserver(format!("{} is not a bonded validator", new)).into(),
        );
    }
    if get_node_account(state, old)?.is_none() {
        return Err(ObserverError::NodeAccountNotFound(*old).into());
    }
    if get_last_observer_count(state)?.is_none() {
        return Err(ObserverError::LastObserverCountNotFound.into());
    }

    let lists = update_observer_address(state, old, new)?;
    rekey_node_account(state, old, new)?;
    let count = refresh_last_observer_count(state, ctx.block_height)?;
    log::info!(
        "Observer {} replaced by {} ({:?}) in {} lists; {} distinct observers",
        old,
        new,
        reason,
        lists,
        count.count
    );
    Ok(())
}
