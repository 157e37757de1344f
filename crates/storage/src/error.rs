//! Storage layout errors.

use tessera_core::ReturnCode;
use tessera_env::EnvError;
use thiserror::Error;

/// Storage layout and container errors.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Environment error: {0}")]
    Env(#[from] EnvError),

    #[error("Storage entry is empty")]
    EmptyEntry,

    #[error("Index out of bounds: index {index}, length {len}")]
    IndexOutOfBounds { index: u32, len: u32 },

    #[error("Vector is empty")]
    EmptyVector,

    #[error("Container is not bound to a storage key")]
    Unbound,

    #[error("Vector capacity exceeded")]
    CapacityExceeded,
}

impl StorageError {
    /// The host return code carried by this error, if any.
    pub fn return_code(&self) -> Option<ReturnCode> {
        match self {
            StorageError::Env(err) => err.return_code(),
            _ => None,
        }
    }

    /// Check if the error signals an absent value.
    ///
    /// Covers both a host read of a missing key and access to a cleared entry.
    pub fn is_not_found(&self) -> bool {
        match self {
            StorageError::Env(err) => err.is_not_found(),
            StorageError::EmptyEntry => true,
            _ => false,
        }
    }
}

/// Result type for storage layout operations.
pub type Result<T> = std::result::Result<T, StorageError>;
