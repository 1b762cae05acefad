// Path: crates/types/src/app/policy.rs

//! Admin policy groups.

use crate::app::AccountId;
use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// A single admin capability.
#[derive(Encode, Decode, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PolicyType {
    /// Emergency actions: disabling flows, requesting keygen.
    Group1,
    /// Administrative actions: observer replacement, fund migration.
    Group2,
}

bitflags::bitflags! {
    /// The set of policy groups held by one address.
    #[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
    #[serde(transparent)]
    pub struct PolicyGroups: u8 {
        /// Holds `PolicyType::Group1`.
        const GROUP1 = 0b01;
        /// Holds `PolicyType::Group2`.
        const GROUP2 = 0b10;
    }
}

impl Encode for PolicyGroups {
    fn encode_to<T: parity_scale_codec::Output + ?Sized>(&self, dest: &mut T) {
        self.bits().encode_to(dest)
    }
}

impl Decode for PolicyGroups {
    fn decode<I: parity_scale_codec::Input>(
        input: &mut I,
    ) -> Result<Self, parity_scale_codec::Error> {
        let bits = u8::decode(input)?;
        Self::from_bits(bits).ok_or_else(|| "Invalid bits for PolicyGroups".into())
    }
}

impl From<PolicyType> for PolicyGroups {
    fn from(value: PolicyType) -> Self {
        match value {
            PolicyType::Group1 => PolicyGroups::GROUP1,
            PolicyType::Group2 => PolicyGroups::GROUP2,
        }
    }
}

/// Grants one policy group to one address.
#[derive(Encode, Decode, Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct AdminPolicy {
    /// The address receiving the capability.
    pub address: AccountId,
    /// The capability granted.
    pub policy_type: PolicyType,
}
