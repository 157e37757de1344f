//! The value codec shared by every storage layout.
//!
//! Values are encoded with bincode's default configuration: fixed-width
//! little-endian integers and length-prefixed sequences. The same value
//! always produces the same bytes, which hashed keys depend on.

use crate::error::{EnvError, Result};
use serde::{de::DeserializeOwned, Serialize};

/// Encode a value to bytes.
pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    bincode::serialize(value).map_err(EnvError::Encode)
}

/// Decode a value from bytes.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    bincode::deserialize(bytes).map_err(EnvError::Decode)
}
