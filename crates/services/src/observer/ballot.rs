// Path: crates/services/src/observer/ballot.rs
//! Ballot manager: creation, vote recording, tallying, and pruning.
//!
//! A ballot's voter universe is fixed when it is created. Votes are
//! write-once and a finalized ballot never changes again; further votes
//! are rejected as if the ballot did not exist.

use crate::store::{exists, load, load_all, save};
use sha2::{Digest, Sha256};
use xchain_api::state::StateAccess;
use xchain_types::app::{AccountId, Ballot, BallotStatus, Dec, ObservationType, VoteType};
use xchain_types::error::{ObserverError, StateError, TransactionError};
use xchain_types::keys::{ballot_key, BALLOT_PREFIX};

/// Derives a ballot index from the observation type and the parts of the
/// event fingerprint. Every part is length-prefixed so that distinct part
/// lists never collide by concatenation.
pub fn ballot_index(observation_type: ObservationType, parts: &[&[u8]]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(observation_type.as_str().as_bytes());
    for part in parts {
        hasher.update((part.len() as u64).to_be_bytes());
        hasher.update(part);
    }
    hex::encode(hasher.finalize())
}

pub fn get_ballot(state: &dyn StateAccess, index: &str) -> Result<Option<Ballot>, StateError> {
    load(state, &ballot_key(index))
}

pub fn set_ballot(state: &mut dyn StateAccess, ballot: &Ballot) -> Result<(), StateError> {
    save(state, &ballot_key(&ballot.index), ballot)
}

/// Creates an in-progress ballot where every distinct voter has yet to vote.
pub fn create_ballot(
    state: &mut dyn StateAccess,
    index: &str,
    observation_type: ObservationType,
    voters: &[AccountId],
    threshold: Dec,
    height: u64,
) -> Result<Ballot, TransactionError> {
    if exists(state, &ballot_key(index))? {
        return Err(ObserverError::BallotAlreadyExists(index.to_string()).into());
    }
    if voters.is_empty() {
        return Err(ObserverError::InvalidBallot(format!("ballot {} has no voters", index)).into());
    }
    if !threshold.is_valid_threshold() {
        return Err(ObserverError::InvalidBallot(format!(
            "threshold {} outside (0, 1]",
            threshold
        ))
        .into());
    }

    let ballot = Ballot {
        index: index.to_string(),
        ballot_identifier: index.to_string(),
        votes: voters.iter().map(|v| (*v, VoteType::NotYetVoted)).collect(),
        observation_type,
        ballot_threshold: threshold,
        ballot_status: BallotStatus::InProgress,
        ballot_creation_height: height,
    };
    set_ballot(state, &ballot)?;
    log::debug!(
        "Created ballot {} ({:?}) with {} voters",
        index,
        observation_type,
        ballot.votes.len()
    );
    Ok(ballot)
}

/// Returns the existing ballot at `index`, or creates it.
pub fn find_or_create_ballot(
    state: &mut dyn StateAccess,
    index: &str,
    observation_type: ObservationType,
    voters: &[AccountId],
    threshold: Dec,
    height: u64,
) -> Result<Ballot, TransactionError> {
    match get_ballot(state, index)? {
        Some(ballot) => Ok(ballot),
        None => create_ballot(state, index, observation_type, voters, threshold, height),
    }
}

/// Records `voter`'s vote and re-evaluates the ballot. Returns the updated
/// ballot; the caller reacts to a status transition.
pub fn add_vote(
    state: &mut dyn StateAccess,
    index: &str,
    voter: &AccountId,
    vote: VoteType,
) -> Result<Ballot, TransactionError> {
    if vote == VoteType::NotYetVoted {
        return Err(ObserverError::InvalidBallot("NotYetVoted is not a vote".into()).into());
    }
    let mut ballot = match get_ballot(state, index)? {
        Some(b) if !b.ballot_status.is_terminal() => b,
        _ => return Err(ObserverError::BallotNotFound(index.to_string()).into()),
    };
    if !ballot.can_vote(voter) {
        return Err(ObserverError::VoterNotEligible {
            index: index.to_string(),
            voter: *voter,
        }
        .into());
    }

    ballot.votes.insert(*voter, vote);
    ballot.ballot_status = ballot.evaluate();
    set_ballot(state, &ballot)?;

    let tally = ballot.tally();
    log::debug!(
        "[Tally] Ballot {}: success={} failure={} total={} threshold={}",
        index,
        tally.success,
        tally.failure,
        tally.total,
        ballot.ballot_threshold
    );
    if ballot.ballot_status.is_terminal() {
        log::info!("Ballot {} finalized as {:?}", index, ballot.ballot_status);
    }
    Ok(ballot)
}

/// Deletes finalized ballots created before `cutoff_height`. Returns how
/// many were removed.
pub fn prune_finalized_ballots(
    state: &mut dyn StateAccess,
    cutoff_height: u64,
) -> Result<usize, StateError> {
    let stale: Vec<String> = load_all::<Ballot>(state, BALLOT_PREFIX)?
        .into_iter()
        .filter(|b| b.ballot_status.is_terminal() && b.ballot_creation_height < cutoff_height)
        .map(|b| b.index)
        .collect();
    for index in &stale {
        state.delete(&ballot_key(index))?;
    }
    if !stale.is_empty() {
        log::debug!("Pruned {} finalized ballots below height {}", stale.len(), cutoff_height);
    }
    Ok(stale.len())
}
