// Path: crates/telemetry/src/lib.rs
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

//! # Observer Core Telemetry
//!
//! Structured JSON logging for the observer core. Services log through the
//! `log` facade; `init_tracing` bridges those records into `tracing`.

/// The initialization routine for global structured logging.
pub mod init;

pub use init::{init_from_config, init_tracing, parse_filter};
