//! Core primitives for tessera.
//!
//! This crate provides the types every other tessera crate is built on:
//! - Storage keys and the key pointer used to lay values out in storage
//! - Host return codes
//! - Account addresses
//! - 256-bit crypto hashers

pub mod address;
pub mod hash;
pub mod key;
pub mod return_code;

// Re-export commonly used types at the crate root
pub use address::{Address, AddressError};
pub use hash::{Blake3x256, CryptoHasher, Keccak256, Sha2x256, H256};
pub use key::{Key, KeyBytes, KeyPtr, KEY_LEN};
pub use return_code::ReturnCode;
pub use alloy_primitives::U256;
