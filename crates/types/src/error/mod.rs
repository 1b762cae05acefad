// Path: crates/types/src/error/mod.rs
//! Core error types for the observer core.

use crate::app::{AccountId, ChainId};
use thiserror::Error;

/// A trait for assigning a stable, machine-readable string code to an error.
pub trait ErrorCode {
    /// Returns the unique, stable string identifier for this error variant.
    fn code(&self) -> &'static str;
}

/// The coarse error categories callers branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The addressed record does not exist (or a ballot is already terminal).
    NotFound,
    /// A record that must be unique already exists.
    AlreadyExists,
    /// A nonce is already bound to a cross-chain transaction.
    AlreadyBound,
    /// The voter is not part of the ballot or already voted.
    VoterNotEligible,
    /// An observer replacement was rejected.
    UpdateObserver,
    /// The node account of the observer being replaced is missing.
    NodeAccountNotFound,
    /// The observer count singleton is missing.
    LastObserverCountNotFound,
    /// A nonce range overlaps an outstanding one.
    RangeConflict,
    /// The request is malformed or not allowed in the current state.
    InvalidRequest,
    /// The caller lacks the capability for the operation.
    Unauthorized,
    /// A storage or codec fault.
    Internal,
}

/// Errors related to the state store.
#[derive(Error, Debug)]
pub enum StateError {
    /// The provided value was invalid.
    #[error("Invalid value: {0}")]
    InvalidValue(String),
    /// An error occurred during state deserialization.
    #[error("Decode error: {0}")]
    Decode(String),
}

impl ErrorCode for StateError {
    fn code(&self) -> &'static str {
        match self {
            Self::InvalidValue(_) => "STATE_INVALID_VALUE",
            Self::Decode(_) => "STATE_DECODE_ERROR",
        }
    }
}

/// Errors returned by the validator status oracle.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OracleError {
    /// The operator address is not a known validator.
    #[error("Validator {0} not found")]
    ValidatorNotFound(AccountId),
    /// The oracle could not answer.
    #[error("Oracle unavailable: {0}")]
    Unavailable(String),
}

impl ErrorCode for OracleError {
    fn code(&self) -> &'static str {
        match self {
            Self::ValidatorNotFound(_) => "ORACLE_VALIDATOR_NOT_FOUND",
            Self::Unavailable(_) => "ORACLE_UNAVAILABLE",
        }
    }
}

/// Errors from the observer registry and the ballot manager.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ObserverError {
    /// The ballot does not exist or is already finalized.
    #[error("Ballot {0} not found or already finalized")]
    BallotNotFound(String),
    /// A ballot with this index already exists.
    #[error("Ballot {0} already exists")]
    BallotAlreadyExists(String),
    /// The ballot parameters are unusable.
    #[error("Invalid ballot: {0}")]
    InvalidBallot(String),
    /// The voter is not in the ballot or already voted.
    #[error("Voter {voter} is not eligible to vote on ballot {index}")]
    VoterNotEligible {
        /// The ballot index.
        index: String,
        /// The rejected voter.
        voter: AccountId,
    },
    /// An observer replacement was rejected.
    #[error("Unable to update observer: {0}")]
    UpdateObserver(String),
    /// No node account for the operator.
    #[error("Node account for {0} not found")]
    NodeAccountNotFound(AccountId),
    /// The operator already registered node keys.
    #[error("Node account for {0} already exists")]
    NodeAccountAlreadyExists(AccountId),
    /// The observer count singleton is missing.
    #[error("Last observer count not found")]
    LastObserverCountNotFound,
    /// The chain has no observer list.
    #[error("No observer list for chain {0}")]
    ObserverMapperNotFound(ChainId),
    /// The caller is not an observer of the chain.
    #[error("{address} is not an observer of chain {chain_id}")]
    NotObserver {
        /// The chain.
        chain_id: ChainId,
        /// The caller.
        address: AccountId,
    },
    /// The module parameters are missing.
    #[error("Observer params not found")]
    ParamsNotFound,
    /// Inbound observations are disabled.
    #[error("Inbound observations are disabled")]
    InboundDisabled,
    /// Outbound processing is disabled.
    #[error("Outbound processing is disabled")]
    OutboundDisabled,
}

impl ErrorCode for ObserverError {
    fn code(&self) -> &'static str {
        match self {
            Self::BallotNotFound(_) => "OBSERVER_BALLOT_NOT_FOUND",
            Self::BallotAlreadyExists(_) => "OBSERVER_BALLOT_ALREADY_EXISTS",
            Self::InvalidBallot(_) => "OBSERVER_INVALID_BALLOT",
            Self::VoterNotEligible { .. } => "OBSERVER_VOTER_NOT_ELIGIBLE",
            Self::UpdateObserver(_) => "OBSERVER_UPDATE_REJECTED",
            Self::NodeAccountNotFound(_) => "OBSERVER_NODE_ACCOUNT_NOT_FOUND",
            Self::NodeAccountAlreadyExists(_) => "OBSERVER_NODE_ACCOUNT_EXISTS",
            Self::LastObserverCountNotFound => "OBSERVER_LAST_COUNT_NOT_FOUND",
            Self::ObserverMapperNotFound(_) => "OBSERVER_MAPPER_NOT_FOUND",
            Self::NotObserver { .. } => "OBSERVER_NOT_OBSERVER",
            Self::ParamsNotFound => "OBSERVER_PARAMS_NOT_FOUND",
            Self::InboundDisabled => "OBSERVER_INBOUND_DISABLED",
            Self::OutboundDisabled => "OBSERVER_OUTBOUND_DISABLED",
        }
    }
}

/// Errors from the outbound nonce tracker.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NonceError {
    /// The chain has no nonce counter.
    #[error("Chain nonces for chain {0} not found")]
    ChainNoncesNotFound(ChainId),
    /// The nonce lies in no window reserved for the authorized signer.
    #[error("No pending window on chain {chain_id} covers nonce {nonce}")]
    PendingNoncesNotFound {
        /// The chain.
        chain_id: ChainId,
        /// The nonce looked up.
        nonce: u64,
    },
    /// An outstanding window already exists on the chain.
    #[error("Chain {chain_id} already has an outstanding window [{nonce_low}, {nonce_high})")]
    RangeConflict {
        /// The chain.
        chain_id: ChainId,
        /// Lower bound of the outstanding window.
        nonce_low: u64,
        /// Upper bound of the outstanding window.
        nonce_high: u64,
    },
    /// The nonce is already bound.
    #[error("Nonce {nonce} on chain {chain_id} is already bound")]
    AlreadyBound {
        /// The chain.
        chain_id: ChainId,
        /// The bound nonce.
        nonce: u64,
    },
    /// A range of zero nonces was requested.
    #[error("Nonce range count must be positive")]
    EmptyRange,
    /// The signer is not the one authorized for the chain.
    #[error("Signer {tss} is not authorized for chain {chain_id}")]
    SignerNotAuthorized {
        /// The chain.
        chain_id: ChainId,
        /// The rejected signer.
        tss: String,
    },
    /// A consistency check over the chain's nonce records failed.
    #[error("Nonce invariant violated: {0}")]
    InvariantViolated(String),
}

impl ErrorCode for NonceError {
    fn code(&self) -> &'static str {
        match self {
            Self::ChainNoncesNotFound(_) => "NONCE_CHAIN_NONCES_NOT_FOUND",
            Self::PendingNoncesNotFound { .. } => "NONCE_PENDING_NOT_FOUND",
            Self::RangeConflict { .. } => "NONCE_RANGE_CONFLICT",
            Self::AlreadyBound { .. } => "NONCE_ALREADY_BOUND",
            Self::EmptyRange => "NONCE_EMPTY_RANGE",
            Self::SignerNotAuthorized { .. } => "NONCE_SIGNER_NOT_AUTHORIZED",
            Self::InvariantViolated(_) => "NONCE_INVARIANT_VIOLATED",
        }
    }
}

/// Errors from the TSS registry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TssError {
    /// No TSS is active.
    #[error("No active TSS")]
    TssNotFound,
    /// No key-generation round exists.
    #[error("Keygen not found")]
    KeygenNotFound,
    /// The latest key-generation round is not pending.
    #[error("Keygen is not pending")]
    KeygenNotPending,
    /// A key-generation round is already pending.
    #[error("A keygen round is already pending")]
    KeygenInProgress,
    /// The vote references a different round.
    #[error("Keygen height mismatch. Expected {expected}, got {got}")]
    KeygenHeightMismatch {
        /// Height of the pending round.
        expected: u64,
        /// Height in the vote.
        got: u64,
    },
    /// A migration is already in flight on the chain.
    #[error("Fund migration already in flight on chain {0}")]
    MigrationInFlight(ChainId),
    /// No migration is in flight on the chain.
    #[error("No fund migration in flight on chain {0}")]
    MigrationNotFound(ChainId),
    /// There is no earlier TSS to migrate from.
    #[error("No previous TSS to migrate funds from")]
    NoPreviousTss,
    /// A blame record with this index already exists.
    #[error("Blame {0} already exists")]
    BlameAlreadyExists(String),
    /// No blame record with this index.
    #[error("Blame {0} not found")]
    BlameNotFound(String),
}

impl ErrorCode for TssError {
    fn code(&self) -> &'static str {
        match self {
            Self::TssNotFound => "TSS_NOT_FOUND",
            Self::KeygenNotFound => "TSS_KEYGEN_NOT_FOUND",
            Self::KeygenNotPending => "TSS_KEYGEN_NOT_PENDING",
            Self::KeygenInProgress => "TSS_KEYGEN_IN_PROGRESS",
            Self::KeygenHeightMismatch { .. } => "TSS_KEYGEN_HEIGHT_MISMATCH",
            Self::MigrationInFlight(_) => "TSS_MIGRATION_IN_FLIGHT",
            Self::MigrationNotFound(_) => "TSS_MIGRATION_NOT_FOUND",
            Self::NoPreviousTss => "TSS_NO_PREVIOUS",
            Self::BlameAlreadyExists(_) => "TSS_BLAME_EXISTS",
            Self::BlameNotFound(_) => "TSS_BLAME_NOT_FOUND",
        }
    }
}

/// Errors raised while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// The TOML was malformed.
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    /// The values are inconsistent.
    #[error("Invalid config: {0}")]
    Invalid(String),
}

impl ErrorCode for ConfigError {
    fn code(&self) -> &'static str {
        match self {
            Self::Io(_) => "CONFIG_IO",
            Self::Parse(_) => "CONFIG_PARSE",
            Self::Invalid(_) => "CONFIG_INVALID",
        }
    }
}

/// Errors returned by message handlers and queries.
#[derive(Error, Debug)]
pub enum TransactionError {
    /// An error occurred during serialization.
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// An error occurred during deserialization.
    #[error("Deserialization error: {0}")]
    Deserialization(String),
    /// The request is invalid.
    #[error("Invalid transaction: {0}")]
    Invalid(String),
    /// The signer lacks the capability for the operation.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    /// The method is not supported by the service.
    #[error("Unsupported operation: {0}")]
    Unsupported(String),
    /// A queried record does not exist.
    #[error("Not found: {0}")]
    NotFound(String),
    /// An error originating from the observer module.
    #[error("Observer error: {0}")]
    Observer(#[from] ObserverError),
    /// An error originating from the nonce tracker.
    #[error("Nonce error: {0}")]
    Nonce(#[from] NonceError),
    /// An error originating from the TSS registry.
    #[error("TSS error: {0}")]
    Tss(#[from] TssError),
    /// An error originating from the validator oracle.
    #[error("Oracle error: {0}")]
    Oracle(#[from] OracleError),
    /// An error originating from the state store.
    #[error("State error: {0}")]
    State(#[from] StateError),
}

impl TransactionError {
    /// Maps this error onto the category callers branch on.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Serialization(_) | Self::Deserialization(_) | Self::State(_) => {
                ErrorKind::Internal
            }
            Self::Invalid(_) | Self::Unsupported(_) => ErrorKind::InvalidRequest,
            Self::Unauthorized(_) => ErrorKind::Unauthorized,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Oracle(_) => ErrorKind::Internal,
            Self::Observer(e) => match e {
                ObserverError::BallotNotFound(_)
                | ObserverError::ObserverMapperNotFound(_)
                | ObserverError::ParamsNotFound => ErrorKind::NotFound,
                ObserverError::BallotAlreadyExists(_) => ErrorKind::AlreadyExists,
                ObserverError::VoterNotEligible { .. } => ErrorKind::VoterNotEligible,
                ObserverError::UpdateObserver(_) => ErrorKind::UpdateObserver,
                ObserverError::NodeAccountNotFound(_) => ErrorKind::NodeAccountNotFound,
                ObserverError::LastObserverCountNotFound => ErrorKind::LastObserverCountNotFound,
                ObserverError::NotObserver { .. } => ErrorKind::Unauthorized,
                ObserverError::InvalidBallot(_)
                | ObserverError::NodeAccountAlreadyExists(_)
                | ObserverError::InboundDisabled
                | ObserverError::OutboundDisabled => ErrorKind::InvalidRequest,
            },
            Self::Nonce(e) => match e {
                NonceError::ChainNoncesNotFound(_) | NonceError::PendingNoncesNotFound { .. } => {
                    ErrorKind::NotFound
                }
                NonceError::RangeConflict { .. } => ErrorKind::RangeConflict,
                NonceError::AlreadyBound { .. } => ErrorKind::AlreadyBound,
                NonceError::EmptyRange
                | NonceError::SignerNotAuthorized { .. }
                | NonceError::InvariantViolated(_) => ErrorKind::InvalidRequest,
            },
            Self::Tss(e) => match e {
                TssError::TssNotFound
                | TssError::KeygenNotFound
                | TssError::MigrationNotFound(_)
                | TssError::BlameNotFound(_) => ErrorKind::NotFound,
                TssError::MigrationInFlight(_) | TssError::BlameAlreadyExists(_) => {
                    ErrorKind::AlreadyExists
                }
                TssError::KeygenNotPending
                | TssError::KeygenInProgress
                | TssError::KeygenHeightMismatch { .. }
                | TssError::NoPreviousTss => ErrorKind::InvalidRequest,
            },
        }
    }
}

impl ErrorCode for TransactionError {
    fn code(&self) -> &'static str {
        match self {
            Self::Serialization(_) => "TX_SERIALIZATION_ERROR",
            Self::Deserialization(_) => "TX_DESERIALIZATION_ERROR",
            Self::Invalid(_) => "TX_INVALID",
            Self::Unauthorized(_) => "TX_UNAUTHORIZED",
            Self::Unsupported(_) => "TX_UNSUPPORTED",
            Self::NotFound(_) => "TX_NOT_FOUND",
            Self::Observer(e) => e.code(),
            Self::Nonce(e) => e.code(),
            Self::Tss(e) => e.code(),
            Self::Oracle(e) => e.code(),
            Self::State(e) => e.code(),
        }
    }
}
