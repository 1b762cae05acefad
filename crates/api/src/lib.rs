// Path: crates/api/src/lib.rs

//! # Observer Core API Crate Lints
//!
//! Panics are disallowed in non-test code; every fallible path returns a
//! typed error instead.
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::todo,
        clippy::unimplemented,
        clippy::indexing_slicing
    )
)]
//! # Observer Core API
//!
//! The stable contract between the state-transition services and their
//! environment: the key-value store, the validator and policy oracles, the
//! per-transaction context, and the service dispatch traits.

/// Re-exports all core error types from the central `xchain-types` crate.
pub mod error;
/// Defines traits for services that hook into the block processing lifecycle.
pub mod lifecycle;
/// Read-only ports onto staking and admin policy state.
pub mod oracle;
/// Cursor-based pagination over prefix scans.
pub mod query;
/// The dispatch trait implemented by on-chain services.
pub mod services;
/// The `StateAccess` trait, the copy-on-write overlay, and the in-memory store.
pub mod state;
/// Transaction context and atomic execution.
pub mod transaction;

/// A curated set of the most commonly used traits and types.
pub mod prelude {
    pub use crate::error::{ErrorCode, ErrorKind, StateError, TransactionError};
    pub use crate::lifecycle::OnEndBlock;
    pub use crate::oracle::{PolicyOracle, ValidatorStatusOracle};
    pub use crate::query::{PageRequest, PageResponse};
    pub use crate::services::BlockchainService;
    pub use crate::state::{InMemoryState, StateAccess, StateOverlay};
    pub use crate::transaction::context::TxContext;
    pub use crate::transaction::execute_atomic;
}
