// Path: crates/api/src/oracle/mod.rs

//! Read-only ports onto state owned by other modules.
//!
//! The observer services never read staking or admin policy records
//! directly; the host injects implementations of these traits.

use std::collections::BTreeMap;
use xchain_types::app::{AccountId, AdminPolicy, ConsensusAddress, PolicyGroups, PolicyType};
use xchain_types::error::OracleError;

/// Staking and slashing status of validators.
pub trait ValidatorStatusOracle: Send + Sync {
    /// True when `operator` is a bonded validator.
    fn is_bonded(&self, operator: &AccountId) -> bool;

    /// True when the validator with this consensus address has been tombstoned.
    fn is_tombstoned(&self, consensus: &ConsensusAddress) -> bool;

    /// Resolves a validator operator to its consensus address.
    fn consensus_addr_of(&self, operator: &AccountId) -> Result<ConsensusAddress, OracleError>;
}

/// Admin capability lookups.
pub trait PolicyOracle: Send + Sync {
    /// True when `address` holds the given policy group.
    fn has_capability(&self, address: &AccountId, policy: PolicyType) -> bool;
}

/// A `PolicyOracle` over a fixed table, built from configuration.
#[derive(Debug, Clone, Default)]
pub struct StaticPolicyOracle {
    groups: BTreeMap<AccountId, PolicyGroups>,
}

impl StaticPolicyOracle {
    /// Builds the table from admin policy entries. Entries for the same
    /// address accumulate.
    pub fn from_policies(policies: &[AdminPolicy]) -> Self {
        let mut groups: BTreeMap<AccountId, PolicyGroups> = BTreeMap::new();
        for policy in policies {
            *groups.entry(policy.address).or_default() |= PolicyGroups::from(policy.policy_type);
        }
        Self { groups }
    }

    /// Grants one more policy group.
    pub fn grant(&mut self, address: AccountId, policy: PolicyType) {
        *self.groups.entry(address).or_default() |= PolicyGroups::from(policy);
    }

    /// The groups held by `address`.
    pub fn groups_of(&self, address: &AccountId) -> PolicyGroups {
        self.groups.get(address).copied().unwrap_or_default()
    }
}

impl PolicyOracle for StaticPolicyOracle {
    fn has_capability(&self, address: &AccountId, policy: PolicyType) -> bool {
        self.groups_of(address).contains(PolicyGroups::from(policy))
    }
}
