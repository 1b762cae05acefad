// Path: crates/services/src/observer/observation.rs
//! Observer votes on inbound deposits and outbound confirmations.

use super::ballot::{add_vote, ballot_index, find_or_create_ballot};
use super::mapper::{distinct_observers, get_observer_mapper};
use super::{ensure_flow_enabled, get_params};
use xchain_api::state::StateAccess;
use xchain_api::transaction::context::TxContext;
use xchain_types::app::{BallotStatus, ChainId, ObservationType, VoteType};
use xchain_types::error::{ObserverError, TransactionError};
use xchain_types::keys::chain_id_bytes;
use xchain_types::prelude::OptionExt;

/// The ballot index of an observation of `digest` on `chain_id`.
pub fn observation_ballot_index(
    chain_id: ChainId,
    observation_type: ObservationType,
    digest: &[u8],
) -> String {
    ballot_index(observation_type, &[&chain_id_bytes(chain_id), digest])
}

/// Casts the signer's vote on the observation of `digest` and returns the
/// resulting ballot status.
///
/// The first vote creates the ballot over the chain's distinct observers
/// with the module threshold. The caller acts on `FinalizedSuccess` /
/// `FinalizedFailure` exactly once: the ballot rejects every later vote.
pub fn vote_on_observation(
    state: &mut dyn StateAccess,
    ctx: &TxContext,
    chain_id: ChainId,
    observation_type: ObservationType,
    digest: &[u8],
    vote: VoteType,
) -> Result<BallotStatus, TransactionError> {
    if !matches!(
        observation_type,
        ObservationType::InBoundTx | ObservationType::OutBoundTx
    ) {
        return Err(ObserverError::InvalidBallot(format!(
            "{:?} is not an observation type",
            observation_type
        ))
        .into());
    }
    ensure_flow_enabled(state, observation_type)?;

    let params = get_params(state)?;
    if params.chain(chain_id).is_none() {
        return Err(TransactionError::Invalid(format!(
            "chain {} is not supported",
            chain_id
        )));
    }
    let mapper = get_observer_mapper(state, chain_id)?
        .required(ObserverError::ObserverMapperNotFound(chain_id))?;
    let signer = ctx.signer_account_id;
    if !mapper.contains(&signer) {
        return Err(ObserverError::NotObserver {
            chain_id,
            address: signer,
        }
        .into());
    }

    let index = observation_ballot_index(chain_id, observation_type, digest);
    find_or_create_ballot(
        state,
        &index,
        observation_type,
        &distinct_observers(&mapper),
        params.ballot_threshold,
        ctx.block_height,
    )?;
    let ballot = add_vote(state, &index, &signer, vote)?;
    Ok(ballot.ballot_status)
}
