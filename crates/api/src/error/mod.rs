// Path: crates/api/src/error/mod.rs
// Re-export all core error types from the central types crate.
pub use xchain_types::error::{
    ConfigError, ErrorCode, ErrorKind, NonceError, ObserverError, OracleError, StateError,
    TransactionError, TssError,
};
pub use xchain_types::Result;
