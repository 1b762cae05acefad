// Path: crates/services/src/store.rs
//! Typed reads and writes of canonical records.

use parity_scale_codec::{Decode, Encode};
use xchain_api::state::StateAccess;
use xchain_types::codec::{decode_state_value, encode_state_value};
use xchain_types::error::StateError;

/// Reads and decodes the record at `key`.
pub fn load<T: Decode>(state: &dyn StateAccess, key: &[u8]) -> Result<Option<T>, StateError> {
    state
        .get(key)?
        .map(|bytes| decode_state_value(&bytes))
        .transpose()
}

/// Encodes and writes `value` at `key`.
pub fn save<T: Encode>(state: &mut dyn StateAccess, key: &[u8], value: &T) -> Result<(), StateError> {
    state.insert(key, &encode_state_value(value)?)
}

/// Decodes every record under `prefix`, in key order.
pub fn load_all<T: Decode>(state: &dyn StateAccess, prefix: &[u8]) -> Result<Vec<T>, StateError> {
    let mut out = Vec::new();
    for entry in state.prefix_scan(prefix)? {
        let (_, value) = entry?;
        out.push(decode_state_value(&value)?);
    }
    Ok(out)
}

/// True when a record exists at `key`.
pub fn exists(state: &dyn StateAccess, key: &[u8]) -> Result<bool, StateError> {
    Ok(state.get(key)?.is_some())
}
