// Path: crates/types/src/app/ballot.rs

//! The ballot record and its tally rule.

use crate::app::{AccountId, Dec};
use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The kind of external event a ballot decides on.
#[derive(Encode, Decode, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ObservationType {
    /// Unspecified.
    EmptyObserverType,
    /// A deposit observed on an external chain.
    InBoundTx,
    /// An outbound transaction observed as mined on an external chain.
    OutBoundTx,
    /// The outcome of a TSS key-generation round.
    TssKeyGen,
    /// The outcome of a TSS signing round.
    TssKeySign,
}

impl ObservationType {
    /// Stable tag mixed into ballot indices.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EmptyObserverType => "empty",
            Self::InBoundTx => "inbound_tx",
            Self::OutBoundTx => "outbound_tx",
            Self::TssKeyGen => "tss_keygen",
            Self::TssKeySign => "tss_keysign",
        }
    }
}

/// A single voter's slot in a ballot.
#[derive(Encode, Decode, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
#[serde(rename_all = "snake_case")]
pub enum VoteType {
    /// The voter attests the event happened as described.
    SuccessObservation,
    /// The voter attests the event failed.
    FailureObservation,
    /// The voter is eligible and has not voted yet.
    NotYetVoted,
}

/// The lifecycle status of a ballot. Terminal statuses never change.
#[derive(Encode, Decode, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
#[serde(rename_all = "snake_case")]
pub enum BallotStatus {
    /// Still accepting votes.
    InProgress,
    /// The success threshold was reached.
    FinalizedSuccess,
    /// Success became unreachable.
    FinalizedFailure,
}

impl BallotStatus {
    /// True for either finalized status.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::InProgress)
    }
}

/// A vote on one observed event.
///
/// The voter universe is fixed at creation. Each voter owns exactly one slot
/// in `votes`, so duplicate addresses in the source observer list collapse
/// into one voter.
#[derive(Encode, Decode, Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct Ballot {
    /// Deterministic identifier derived from the event fingerprint.
    pub index: String,
    /// Human-readable identifier; equal to `index` unless set otherwise.
    pub ballot_identifier: String,
    /// Every eligible voter and its vote.
    pub votes: BTreeMap<AccountId, VoteType>,
    /// The kind of event being decided.
    pub observation_type: ObservationType,
    /// Fraction of voters required for success.
    pub ballot_threshold: Dec,
    /// Current status.
    pub ballot_status: BallotStatus,
    /// Block height at which the ballot was created.
    pub ballot_creation_height: u64,
}

/// Vote counts of a ballot.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct BallotTally {
    /// Votes for success.
    pub success: u64,
    /// Votes for failure.
    pub failure: u64,
    /// Eligible voters.
    pub total: u64,
}

impl Ballot {
    /// Counts the votes cast so far.
    pub fn tally(&self) -> BallotTally {
        let mut t = BallotTally {
            total: self.votes.len() as u64,
            ..Default::default()
        };
        for vote in self.votes.values() {
            match vote {
                VoteType::SuccessObservation => t.success += 1,
                VoteType::FailureObservation => t.failure += 1,
                VoteType::NotYetVoted => {}
            }
        }
        t
    }

    /// The status the current votes imply.
    ///
    /// Success when `success / total >= threshold`; otherwise failure when
    /// `failure / total > 1 - threshold`. Success is checked first.
    pub fn evaluate(&self) -> BallotStatus {
        let t = self.tally();
        if t.total == 0 {
            return BallotStatus::InProgress;
        }
        if self.ballot_threshold.reached_by(t.success, t.total) {
            BallotStatus::FinalizedSuccess
        } else if self.ballot_threshold.complement().exceeded_by(t.failure, t.total) {
            BallotStatus::FinalizedFailure
        } else {
            BallotStatus::InProgress
        }
    }

    /// True when `voter` is eligible and has not voted yet.
    pub fn can_vote(&self, voter: &AccountId) -> bool {
        matches!(self.votes.get(voter), Some(VoteType::NotYetVoted))
    }
}
