// Path: crates/api/src/transaction/context.rs
//! Defines the stable context for transaction execution.

use xchain_types::app::AccountId;

/// Read-only context handed to every message handler.
#[derive(Clone, Debug)]
pub struct TxContext {
    /// The current block height being processed.
    pub block_height: u64,
    /// The `AccountId` of the entity that signed the current transaction.
    /// This is the authoritative source for permission checks within services.
    pub signer_account_id: AccountId,
}

impl TxContext {
    /// Context for a call signed by `signer` at `block_height`.
    pub fn new(block_height: u64, signer_account_id: AccountId) -> Self {
        Self {
            block_height,
            signer_account_id,
        }
    }
}
