// Path: crates/api/src/state/mod.rs
//! Key-value state access for the observer services.
//!
//! - `StateAccess`: the object-safe store interface every handler runs against.
//! - `StateOverlay`: a copy-on-write layer used to make a handler atomic.
//! - `InMemoryState`: an ordered in-memory store for genesis tooling and tests.

use std::sync::Arc;
use xchain_types::error::StateError;

/// An atomically reference-counted, owned key slice.
pub type StateKey = Arc<[u8]>;
/// An atomically reference-counted, owned value slice.
pub type StateVal = Arc<[u8]>;
/// An owned key-value pair from the state.
pub type StateKVPair = (StateKey, StateVal);
/// A streaming iterator over key-value pairs, in ascending key order.
pub type StateScanIter<'a> = Box<dyn Iterator<Item = Result<StateKVPair, StateError>> + Send + 'a>;

mod accessor;
mod memory;
mod overlay;

pub use accessor::*;
pub use memory::InMemoryState;
pub use overlay::*;
