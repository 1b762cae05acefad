//! Deterministic randomness for reproducible tests

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use xchain_types::app::{AccountId, ConsensusAddress};

/// Deterministic random number generator for tests
pub struct TestRng {
    rng: StdRng,
}

impl TestRng {
    /// Create a new test RNG with the specified seed
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Create a test RNG with the default seed 12345
    pub fn with_default_seed() -> Self {
        Self::new(12345)
    }

    /// Fill a buffer with random bytes
    pub fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.rng.fill_bytes(dest);
    }

    /// Generate a random value
    pub fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    /// A value in `[low, high)`.
    pub fn gen_range(&mut self, low: u64, high: u64) -> u64 {
        self.rng.gen_range(low..high)
    }

    /// A random account address.
    pub fn account_id(&mut self) -> AccountId {
        let mut bytes = [0u8; 32];
        self.fill_bytes(&mut bytes);
        AccountId(bytes)
    }

    /// `n` distinct random account addresses.
    pub fn account_ids(&mut self, n: usize) -> Vec<AccountId> {
        let mut out = Vec::with_capacity(n);
        while out.len() < n {
            let id = self.account_id();
            if !out.contains(&id) {
                out.push(id);
            }
        }
        out
    }

    /// A random consensus address.
    pub fn consensus_address(&mut self) -> ConsensusAddress {
        let mut bytes = [0u8; 20];
        self.fill_bytes(&mut bytes);
        ConsensusAddress(bytes)
    }

    /// A random hex-encoded public key string.
    pub fn pubkey(&mut self) -> String {
        let mut bytes = [0u8; 33];
        self.fill_bytes(&mut bytes);
        hex::encode(bytes)
    }
}

impl Default for TestRng {
    fn default() -> Self {
        Self::with_default_seed()
    }
}
