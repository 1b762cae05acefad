// Path: crates/types/src/lib.rs
#![forbid(unsafe_code)]
#![deny(missing_docs)]

//! # Cross-chain Observer Types
//!
//! The foundational crate of the workspace: every record persisted by the
//! observer core, the canonical codec used to persist it, the state key
//! layout, the error enums, and the node configuration.
//!
//! ## Architectural Role
//!
//! `xchain-types` has no dependency on any other workspace crate. The API
//! crate builds its storage and oracle traits on these definitions and the
//! services crate implements the state transitions over them.

/// A top-level, crate-wide `Result` type alias with a default error type.
pub type Result<T, E = crate::error::TransactionError> = std::result::Result<T, E>;

/// Domain records: identities, observers, ballots, nonces, and TSS state.
pub mod app;
/// The canonical, deterministic binary codec for consensus-critical state.
pub mod codec;
/// Node configuration loaded from TOML.
pub mod config;
/// A unified set of all error types used across the workspace.
pub mod error;
/// Constants and builders for the state keys of every persisted entity.
pub mod keys;
/// A prelude containing useful extension traits like `OptionExt`.
pub mod prelude;
