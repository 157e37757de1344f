//! Errors raised at the host boundary.

use tessera_core::ReturnCode;
use thiserror::Error;

/// Host environment errors.
#[derive(Error, Debug)]
pub enum EnvError {
    #[error("Host call failed: {0}")]
    Host(ReturnCode),

    #[error("Decode error: {0}")]
    Decode(#[source] bincode::Error),

    #[error("Encode error: {0}")]
    Encode(#[source] bincode::Error),

    #[error("Value too large: {size} bytes, limit {limit}")]
    ValueTooLarge { size: usize, limit: usize },

    #[error("Payment not allowed: {0} transferred")]
    PaymentNotAllowed(u128),

    #[error("Database error: {0}")]
    Database(#[from] sled::Error),
}

impl EnvError {
    /// The host return code carried by this error, if any.
    pub fn return_code(&self) -> Option<ReturnCode> {
        match self {
            EnvError::Host(code) => Some(*code),
            _ => None,
        }
    }

    /// Check if the host reported that the key does not exist.
    pub fn is_not_found(&self) -> bool {
        self.return_code() == Some(ReturnCode::KeyNotFound)
    }
}

/// Result type for host environment operations.
pub type Result<T> = std::result::Result<T, EnvError>;
