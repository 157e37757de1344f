//! 256-bit storage keys and the key pointer used to walk storage layouts.

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Byte length of an encoded key.
pub const KEY_LEN: usize = 32;

/// Little-endian byte encoding of a [`Key`], as handed to the host.
pub type KeyBytes = [u8; KEY_LEN];

/// A 256-bit unsigned storage location.
///
/// All arithmetic wraps modulo 2^256; layouts never get close to that in
/// practice.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Key(U256);

impl Key {
    /// The storage root of a contract.
    pub const ZERO: Self = Self(U256::ZERO);

    /// The storage root of a contract.
    pub fn zero() -> Self {
        Self::ZERO
    }

    /// Create a key from a small integer.
    pub fn from_u64(value: u64) -> Self {
        Self(U256::from(value))
    }

    /// Create a key from its little-endian byte encoding.
    pub fn from_bytes(bytes: KeyBytes) -> Self {
        Self(U256::from_le_bytes(bytes))
    }

    /// Little-endian byte encoding of the key.
    pub fn to_bytes(&self) -> KeyBytes {
        self.0.to_le_bytes::<KEY_LEN>()
    }

    /// The key as a 256-bit integer.
    pub fn as_u256(&self) -> U256 {
        self.0
    }

    /// Advance the key by one, in place.
    pub fn increment(&mut self) -> &mut Self {
        self.add(1)
    }

    /// Advance the key by `rhs`, in place.
    pub fn add(&mut self, rhs: u64) -> &mut Self {
        self.0 = self.0.wrapping_add(U256::from(rhs));
        self
    }

    /// Return a new key `rhs` slots after this one, leaving `self` untouched.
    pub fn offset(&self, rhs: u64) -> Self {
        let mut key = *self;
        key.add(rhs);
        key
    }

    /// Convert to a hex string of the little-endian bytes.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Key(0x{})", &self.to_hex()[..16])
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.to_hex())
    }
}

impl From<KeyBytes> for Key {
    fn from(bytes: KeyBytes) -> Self {
        Self::from_bytes(bytes)
    }
}

impl From<U256> for Key {
    fn from(value: U256) -> Self {
        Self(value)
    }
}

impl From<Key> for KeyBytes {
    fn from(key: Key) -> Self {
        key.to_bytes()
    }
}

/// Cursor over the key space used while a value is spread across storage.
///
/// Every slot reservation goes through [`KeyPtr::advance`], which moves the
/// cursor forward by one and hands back the new key by value. The root key
/// passed to [`KeyPtr::new`] is copied, never mutated.
#[derive(Debug, Clone)]
pub struct KeyPtr {
    cursor: Key,
}

impl KeyPtr {
    /// Start walking the key space at `root`.
    pub fn new(root: Key) -> Self {
        Self { cursor: root }
    }

    /// Move to the next slot and return its key.
    pub fn advance(&mut self) -> Key {
        self.cursor.increment();
        self.cursor
    }

    /// Move past `footprint` slots without touching them.
    pub fn skip(&mut self, footprint: u64) {
        self.cursor.add(footprint);
    }

    /// The key of the most recently reserved slot (or the root).
    pub fn current(&self) -> Key {
        self.cursor
    }
}
