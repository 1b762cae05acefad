// Path: crates/services/src/tss/mod.rs
//! TSS registry: the active threshold key, its history, key-generation
//! rounds, blame records, and fund migrations between keys.

use crate::observer::ballot::{add_vote, ballot_index, find_or_create_ballot};
use crate::observer::get_params;
use crate::observer::mapper::{distinct_observers, get_observer_mapper};
use crate::observer::node_account::{get_all_node_accounts, get_node_account};
use crate::store::{exists, load, load_all, save};
use std::collections::BTreeSet;
use xchain_api::oracle::PolicyOracle;
use xchain_api::state::StateAccess;
use xchain_api::transaction::context::TxContext;
use xchain_types::app::{
    AccountId, AddBlameVoteParams, BallotStatus, Blame, ChainId, Dec, Keygen, KeygenStatus,
    ObservationType, PolicyType, Tss, TssFundMigratorInfo, VoteTssParams, VoteType,
};
use xchain_types::error::{ObserverError, StateError, TransactionError, TssError};
use xchain_types::keys::{
    blame_key, chain_id_bytes, fund_migrator_key, tss_history_key, BLAME_PREFIX, KEYGEN_KEY,
    TSS_FUND_MIGRATOR_PREFIX, TSS_HISTORY_PREFIX, TSS_KEY,
};
use xchain_types::prelude::OptionExt;

#[cfg(test)]
mod tests;

// --- Records ---

pub fn get_tss(state: &dyn StateAccess) -> Result<Option<Tss>, StateError> {
    load(state, TSS_KEY)
}

pub fn set_tss(state: &mut dyn StateAccess, tss: &Tss) -> Result<(), StateError> {
    save(state, TSS_KEY, tss)
}

/// The active TSS, or `TssNotFound`.
pub fn active_tss(state: &dyn StateAccess) -> Result<Tss, TransactionError> {
    Ok(get_tss(state)?.required(TssError::TssNotFound)?)
}

pub fn append_tss_history(state: &mut dyn StateAccess, tss: &Tss) -> Result<(), StateError> {
    save(state, &tss_history_key(tss.finalized_zeta_height), tss)
}

/// Every finalized TSS, oldest first. Includes the active one.
pub fn get_tss_history(state: &dyn StateAccess) -> Result<Vec<Tss>, StateError> {
    load_all(state, TSS_HISTORY_PREFIX)
}

/// The TSS that was active before the current one.
pub fn previous_tss(state: &dyn StateAccess) -> Result<Option<Tss>, StateError> {
    let Some(current) = get_tss(state)? else {
        return Ok(None);
    };
    Ok(get_tss_history(state)?
        .into_iter()
        .filter(|t| t.finalized_zeta_height < current.finalized_zeta_height)
        .last())
}

pub fn get_keygen(state: &dyn StateAccess) -> Result<Option<Keygen>, StateError> {
    load(state, KEYGEN_KEY)
}

pub fn set_keygen(state: &mut dyn StateAccess, keygen: &Keygen) -> Result<(), StateError> {
    save(state, KEYGEN_KEY, keygen)
}

pub fn get_fund_migrator(
    state: &dyn StateAccess,
    chain_id: ChainId,
) -> Result<Option<TssFundMigratorInfo>, StateError> {
    load(state, &fund_migrator_key(chain_id))
}

pub fn set_fund_migrator(
    state: &mut dyn StateAccess,
    info: &TssFundMigratorInfo,
) -> Result<(), StateError> {
    save(state, &fund_migrator_key(info.chain_id), info)
}

pub fn get_all_fund_migrators(
    state: &dyn StateAccess,
) -> Result<Vec<TssFundMigratorInfo>, StateError> {
    load_all(state, TSS_FUND_MIGRATOR_PREFIX)
}

pub fn get_blame(state: &dyn StateAccess, index: &str) -> Result<Option<Blame>, StateError> {
    load(state, &blame_key(index))
}

pub fn get_all_blames(state: &dyn StateAccess) -> Result<Vec<Blame>, StateError> {
    load_all(state, BLAME_PREFIX)
}

/// Appends a blame record. Existing records are never overwritten.
pub fn add_blame(state: &mut dyn StateAccess, blame: &Blame) -> Result<(), TransactionError> {
    if exists(state, &blame_key(&blame.index))? {
        return Err(TssError::BlameAlreadyExists(blame.index.clone()).into());
    }
    save(state, &blame_key(&blame.index), blame)?;
    log::info!(
        "Recorded blame {} against {} nodes: {}",
        blame.index,
        blame.nodes.len(),
        blame.failure_reason
    );
    Ok(())
}

// --- Key generation ---

/// Opens a key-generation round for `grantee_pubkeys` at `block_number`.
/// Requires policy group 1.
pub fn request_keygen(
    state: &mut dyn StateAccess,
    policies: &dyn PolicyOracle,
    ctx: &TxContext,
    grantee_pubkeys: Vec<String>,
    block_number: u64,
) -> Result<Keygen, TransactionError> {
    if !policies.has_capability(&ctx.signer_account_id, PolicyType::Group1) {
        return Err(TransactionError::Unauthorized(format!(
            "{} lacks policy group 1",
            ctx.signer_account_id
        )));
    }
    if matches!(get_keygen(state)?, Some(k) if k.status == KeygenStatus::PendingKeygen) {
        return Err(TssError::KeygenInProgress.into());
    }
    if grantee_pubkeys.is_empty() {
        return Err(TransactionError::Invalid("keygen needs at least one grantee".into()));
    }
    if block_number <= ctx.block_height {
        return Err(TransactionError::Invalid(format!(
            "keygen block {} is not after current height {}",
            block_number, ctx.block_height
        )));
    }

    let keygen = Keygen {
        status: KeygenStatus::PendingKeygen,
        grantee_pubkeys,
        block_number,
    };
    set_keygen(state, &keygen)?;
    log::info!(
        "Keygen requested at block {} for {} grantees",
        block_number,
        keygen.grantee_pubkeys.len()
    );
    Ok(keygen)
}

/// The operators whose node key takes part in `keygen`.
fn keygen_voters(state: &dyn StateAccess, keygen: &Keygen) -> Result<Vec<AccountId>, StateError> {
    let grantees: BTreeSet<&str> = keygen.grantee_pubkeys.iter().map(String::as_str).collect();
    Ok(get_all_node_accounts(state)?
        .into_iter()
        .filter(|a| grantees.contains(a.grantee_pubkey.secp256k1.as_str()))
        .map(|a| a.operator)
        .collect())
}

/// Records a keygen participant's vote on the round's outcome.
///
/// Every participant must agree for the key to become active. A failed
/// round is recorded as a blame entry and leaves the active key in place.
pub fn vote_tss(
    state: &mut dyn StateAccess,
    ctx: &TxContext,
    vote: VoteTssParams,
) -> Result<BallotStatus, TransactionError> {
    let mut keygen = get_keygen(state)?.required(TssError::KeygenNotFound)?;
    if keygen.status != KeygenStatus::PendingKeygen {
        return Err(TssError::KeygenNotPending.into());
    }
    if keygen.block_number != vote.keygen_zeta_height {
        return Err(TssError::KeygenHeightMismatch {
            expected: keygen.block_number,
            got: vote.keygen_zeta_height,
        }
        .into());
    }
    let signer = ctx.signer_account_id;
    get_node_account(state, &signer)?.required(ObserverError::NodeAccountNotFound(signer))?;
    let ballot_vote = match vote.status {
        KeygenStatus::KeyGenSuccess => VoteType::SuccessObservation,
        KeygenStatus::KeyGenFailed => VoteType::FailureObservation,
        KeygenStatus::PendingKeygen => {
            return Err(TransactionError::Invalid("keygen vote cannot be pending".into()))
        }
    };

    let index = ballot_index(
        ObservationType::TssKeyGen,
        &[&vote.keygen_zeta_height.to_be_bytes(), vote.tss_pubkey.as_bytes()],
    );
    let voters = keygen_voters(state, &keygen)?;
    find_or_create_ballot(
        state,
        &index,
        ObservationType::TssKeyGen,
        &voters,
        Dec::ONE,
        ctx.block_height,
    )?;
    let ballot = add_vote(state, &index, &signer, ballot_vote)?;

    match ballot.ballot_status {
        BallotStatus::FinalizedSuccess => {
            let tss = Tss {
                tss_pubkey: vote.tss_pubkey.clone(),
                tss_participant_list: keygen.grantee_pubkeys.clone(),
                finalized_zeta_height: ctx.block_height,
                keygen_zeta_height: vote.keygen_zeta_height,
            };
            set_tss(state, &tss)?;
            append_tss_history(state, &tss)?;
            keygen.status = KeygenStatus::KeyGenSuccess;
            set_keygen(state, &keygen)?;
            log::info!(
                "TSS {} activated at height {} (keygen block {})",
                tss.tss_pubkey,
                ctx.block_height,
                vote.keygen_zeta_height
            );
        }
        BallotStatus::FinalizedFailure => {
            add_blame(
                state,
                &Blame {
                    index: Blame::make_index(vote.keygen_zeta_height, &vote.blame_index),
                    failure_reason: vote.failure_reason.clone(),
                    nodes: vote.nodes.clone(),
                },
            )?;
            keygen.status = KeygenStatus::KeyGenFailed;
            set_keygen(state, &keygen)?;
            log::info!("Keygen at block {} failed", vote.keygen_zeta_height);
        }
        BallotStatus::InProgress => {}
    }
    Ok(ballot.ballot_status)
}

/// Casts the signer's vote on a keysign blame. The blame is recorded once
/// the chain's observers reach the ballot threshold.
pub fn add_blame_vote(
    state: &mut dyn StateAccess,
    ctx: &TxContext,
    vote: AddBlameVoteParams,
) -> Result<BallotStatus, TransactionError> {
    let mapper = get_observer_mapper(state, vote.chain_id)?
        .required(ObserverError::ObserverMapperNotFound(vote.chain_id))?;
    let signer = ctx.signer_account_id;
    if !mapper.contains(&signer) {
        return Err(ObserverError::NotObserver {
            chain_id: vote.chain_id,
            address: signer,
        }
        .into());
    }
    let params = get_params(state)?;

    let index = ballot_index(
        ObservationType::TssKeySign,
        &[&chain_id_bytes(vote.chain_id), vote.blame_index.as_bytes()],
    );
    find_or_create_ballot(
        state,
        &index,
        ObservationType::TssKeySign,
        &distinct_observers(&mapper),
        params.ballot_threshold,
        ctx.block_height,
    )?;
    let ballot = add_vote(state, &index, &signer, VoteType::SuccessObservation)?;
    if ballot.ballot_status == BallotStatus::FinalizedSuccess {
        add_blame(
            state,
            &Blame {
                index: Blame::make_index(ballot.ballot_creation_height, &vote.blame_index),
                failure_reason: vote.failure_reason,
                nodes: vote.nodes,
            },
        )?;
    }
    Ok(ballot.ballot_status)
}

// --- Fund migration ---

/// Starts moving funds held by the previous TSS on `chain_id` to the active
/// one. Until completed, the previous TSS stays the authorized signer for
/// the chain. Requires policy group 2.
pub fn begin_migration(
    state: &mut dyn StateAccess,
    policies: &dyn PolicyOracle,
    ctx: &TxContext,
    chain_id: ChainId,
    migration_cctx_index: String,
) -> Result<TssFundMigratorInfo, TransactionError> {
    if !policies.has_capability(&ctx.signer_account_id, PolicyType::Group2) {
        return Err(TransactionError::Unauthorized(format!(
            "{} lacks policy group 2",
            ctx.signer_account_id
        )));
    }
    if get_params(state)?.chain(chain_id).is_none() {
        return Err(TransactionError::Invalid(format!("chain {} is not supported", chain_id)));
    }
    let active = active_tss(state)?;
    let previous = previous_tss(state)?.required(TssError::NoPreviousTss)?;
    if get_fund_migrator(state, chain_id)?.is_some() {
        return Err(TssError::MigrationInFlight(chain_id).into());
    }

    let info = TssFundMigratorInfo {
        chain_id,
        migration_cctx_index,
    };
    set_fund_migrator(state, &info)?;
    log::info!(
        "Fund migration on chain {} started: {} -> {}",
        chain_id,
        previous.tss_pubkey,
        active.tss_pubkey
    );
    Ok(info)
}

/// Ends the migration on `chain_id`, handing the previous TSS's outstanding
/// nonce window to the active TSS. Requires policy group 2 or observer
/// membership on the chain.
pub fn complete_migration(
    state: &mut dyn StateAccess,
    policies: &dyn PolicyOracle,
    ctx: &TxContext,
    chain_id: ChainId,
) -> Result<(), TransactionError> {
    let signer = &ctx.signer_account_id;
    let is_observer = get_observer_mapper(state, chain_id)?
        .map(|m| m.contains(signer))
        .unwrap_or(false);
    if !is_observer && !policies.has_capability(signer, PolicyType::Group2) {
        return Err(TransactionError::Unauthorized(format!(
            "{} may not complete the migration on chain {}",
            signer, chain_id
        )));
    }
    let info = get_fund_migrator(state, chain_id)?.required(TssError::MigrationNotFound(chain_id))?;
    let active = active_tss(state)?;
    let previous = previous_tss(state)?.required(TssError::NoPreviousTss)?;

    crate::nonce::rekey_pending_nonces(state, chain_id, &previous.tss_pubkey, &active.tss_pubkey)?;
    state.delete(&fund_migrator_key(chain_id))?;
    log::info!(
        "Fund migration on chain {} completed ({})",
        chain_id,
        info.migration_cctx_index
    );
    Ok(())
}
