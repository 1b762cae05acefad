// Path: crates/types/src/codec.rs

//! The canonical binary codec for every record written to state.
//!
//! All persisted entities go through SCALE (`parity-scale-codec`) so that two
//! nodes holding the same logical record always hold the same bytes.

use crate::error::StateError;
use parity_scale_codec::{Decode, DecodeAll, Encode};

/// Encodes a value into its canonical byte representation.
pub fn to_bytes_canonical<T: Encode>(v: &T) -> Result<Vec<u8>, String> {
    Ok(v.encode())
}

/// Decodes a value from its canonical byte representation.
///
/// Trailing bytes are rejected: a value must consume the whole input.
pub fn from_bytes_canonical<T: Decode>(b: &[u8]) -> Result<T, String> {
    T::decode_all(&mut &*b).map_err(|e| format!("canonical decode failed: {}", e))
}

/// Decodes a stored record, mapping codec failures into a `StateError`.
pub fn decode_state_value<T: Decode>(b: &[u8]) -> Result<T, StateError> {
    from_bytes_canonical(b).map_err(StateError::Decode)
}

/// Encodes a record for storage, mapping codec failures into a `StateError`.
pub fn encode_state_value<T: Encode>(v: &T) -> Result<Vec<u8>, StateError> {
    to_bytes_canonical(v).map_err(StateError::InvalidValue)
}
