// Path: crates/services/src/lib.rs
#![forbid(unsafe_code)]
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::unimplemented,
        clippy::todo,
        clippy::indexing_slicing
    )
)]

//! # Cross-chain Observer Services
//!
//! State transitions of the observer core: the observer registry and its
//! ballots, the outbound nonce tracker, the TSS registry, genesis, queries,
//! and the `crosschain` service that dispatches signed messages to them.

pub mod genesis;
pub mod module;
pub mod nonce;
pub mod observer;
pub mod query;
pub mod store;
pub mod tss;

pub use module::CrosschainService;
