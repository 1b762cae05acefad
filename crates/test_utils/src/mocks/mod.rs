//! In-memory oracle implementations.

use crate::fixtures::consensus_of;
use std::collections::{BTreeMap, BTreeSet};
use xchain_api::oracle::ValidatorStatusOracle;
use xchain_types::app::{AccountId, ConsensusAddress};
use xchain_types::error::OracleError;

/// A validator set held in memory.
///
/// Only registered operators resolve to a consensus address; registering
/// does not bond.
#[derive(Debug, Clone, Default)]
pub struct MockValidatorOracle {
    consensus: BTreeMap<AccountId, ConsensusAddress>,
    bonded: BTreeSet<AccountId>,
    tombstoned: BTreeSet<ConsensusAddress>,
}

impl MockValidatorOracle {
    /// An oracle with no validators.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers and bonds each operator.
    pub fn with_bonded(operators: &[AccountId]) -> Self {
        let mut oracle = Self::new();
        for op in operators {
            oracle.register(*op);
            oracle.bond(*op);
        }
        oracle
    }

    /// Registers `operator` as a validator without bonding it.
    pub fn register(&mut self, operator: AccountId) -> &mut Self {
        self.consensus.insert(operator, consensus_of(&operator));
        self
    }

    /// Bonds a registered validator.
    pub fn bond(&mut self, operator: AccountId) -> &mut Self {
        self.bonded.insert(operator);
        self
    }

    /// Unbonds a validator.
    pub fn unbond(&mut self, operator: &AccountId) -> &mut Self {
        self.bonded.remove(operator);
        self
    }

    /// Tombstones the validator behind `operator`.
    pub fn tombstone(&mut self, operator: &AccountId) -> &mut Self {
        self.tombstoned.insert(consensus_of(operator));
        self
    }

    /// Forgets `operator` so that resolving its consensus address fails.
    pub fn remove(&mut self, operator: &AccountId) -> &mut Self {
        self.consensus.remove(operator);
        self.bonded.remove(operator);
        self
    }
}

impl ValidatorStatusOracle for MockValidatorOracle {
    fn is_bonded(&self, operator: &AccountId) -> bool {
        self.bonded.contains(operator)
    }

    fn is_tombstoned(&self, consensus: &ConsensusAddress) -> bool {
        self.tombstoned.contains(consensus)
    }

    fn consensus_addr_of(&self, operator: &AccountId) -> Result<ConsensusAddress, OracleError> {
        self.consensus
            .get(operator)
            .copied()
            .ok_or(OracleError::ValidatorNotFound(*operator))
    }
}
