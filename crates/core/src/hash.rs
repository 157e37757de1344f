//! 256-bit crypto hashers used for hashed storage keys.

use sha2::{Digest, Sha256};
use sha3::Keccak256 as Keccak;

/// A 32-byte hash output.
pub type H256 = [u8; 32];

/// A crypto hasher with a 256-bit output.
pub trait CryptoHasher {
    /// Name exported in storage layout metadata.
    const NAME: &'static str;

    /// Hash arbitrary data.
    fn hash(input: &[u8]) -> H256;

    /// Hash multiple pieces of data as if they were concatenated.
    fn hash_concat(parts: &[&[u8]]) -> H256 {
        Self::hash(&parts.concat())
    }
}

/// The BLAKE3 hasher.
#[derive(Debug, Clone, Copy, Default)]
pub struct Blake3x256;

impl CryptoHasher for Blake3x256 {
    const NAME: &'static str = "Blake3x256";

    fn hash(input: &[u8]) -> H256 {
        blake3::hash(input).into()
    }

    fn hash_concat(parts: &[&[u8]]) -> H256 {
        let mut hasher = blake3::Hasher::new();
        for part in parts {
            hasher.update(part);
        }
        hasher.finalize().into()
    }
}

/// The SHA-2 hasher.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha2x256;

impl CryptoHasher for Sha2x256 {
    const NAME: &'static str = "Sha2x256";

    fn hash(input: &[u8]) -> H256 {
        let mut output = [0u8; 32];
        output.copy_from_slice(&Sha256::digest(input));
        output
    }
}

/// The KECCAK hasher.
#[derive(Debug, Clone, Copy, Default)]
pub struct Keccak256;

impl CryptoHasher for Keccak256 {
    const NAME: &'static str = "Keccak256";

    fn hash(input: &[u8]) -> H256 {
        let mut output = [0u8; 32];
        output.copy_from_slice(&Keccak::digest(input));
        output
    }
}
