//! Account identifiers exposed by the host environment.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Raw bytes of an account identifier.
pub type AddressBytes = [u8; 32];

/// Errors parsing an address.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AddressError {
    #[error("invalid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    #[error("address must be 32 bytes, got {0}")]
    InvalidLength(usize),
}

/// An account (user or contract) known to the host.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Address(pub AddressBytes);

impl Address {
    /// The zero address (all zeros).
    pub const ZERO: Self = Self([0u8; 32]);

    /// Create an address from raw bytes.
    pub fn from_bytes(bytes: AddressBytes) -> Self {
        Self(bytes)
    }

    /// Get the underlying bytes.
    pub fn as_bytes(&self) -> &AddressBytes {
        &self.0
    }

    /// Convert to a hex string (with 0x prefix).
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Parse from a hex string (with or without 0x prefix).
    pub fn from_hex(s: &str) -> Result<Self, AddressError> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s)?;
        if bytes.len() != 32 {
            return Err(AddressError::InvalidLength(bytes.len()));
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_hex())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_roundtrip() {
        let address = Address([0xAB; 32]);
        let parsed = Address::from_hex(&address.to_hex()).unwrap();
        assert_eq!(parsed, address);
    }

    #[test]
    fn test_from_hex_without_prefix() {
        let hex_str = "11".repeat(32);
        assert_eq!(Address::from_hex(&hex_str).unwrap(), Address([0x11; 32]));
    }

    #[test]
    fn test_from_hex_rejects_bad_input() {
        assert_eq!(
            Address::from_hex("0x1234"),
            Err(AddressError::InvalidLength(2))
        );
        assert!(matches!(
            Address::from_hex("0xzz"),
            Err(AddressError::InvalidHex(_))
        ));
    }
}
