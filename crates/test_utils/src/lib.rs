// Path: crates/test_utils/src/lib.rs
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::unimplemented,
        clippy::todo,
        clippy::indexing_slicing
    )
)]

//! # Observer Core Test Utilities
//!
//! Deterministic randomness, sample records, mock oracles, and assertion
//! macros shared by the test suites of every crate.

pub mod assertions;
pub mod fixtures;
pub mod mocks;
pub mod randomness;
