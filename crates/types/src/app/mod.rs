// Path: crates/types/src/app/mod.rs
//! Records persisted by the observer core.

/// The ballot record and its tally rule.
pub mod ballot;
/// Fixed-point decimal for thresholds.
pub mod decimal;
/// Account, consensus, and chain identifiers.
pub mod identity;
/// Service method parameters.
pub mod msg;
/// Outbound nonce bookkeeping records.
pub mod nonce;
/// Observer membership records and module parameters.
pub mod observer;
/// Admin policy groups.
pub mod policy;
/// Threshold-signature key registry records.
pub mod tss;

pub use ballot::*;
pub use decimal::*;
pub use identity::*;
pub use msg::*;
pub use nonce::*;
pub use observer::*;
pub use policy::*;
pub use tss::*;
