//! Numeric return codes reported by host functions.

use std::fmt;

/// Every code a host function can hand back to a contract.
///
/// The code space is growable without a version bump: new codes can appear
/// at any time. Codes this crate does not know are kept as
/// [`ReturnCode::Unknown`], so callers must always keep a fallback arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ReturnCode {
    /// API call successful.
    Success,
    /// The called function trapped and its state changes were reverted.
    CalleeTrapped,
    /// The called function ran to completion but reverted its state.
    CalleeReverted,
    /// The passed key does not exist in storage.
    KeyNotFound,
    /// A balance transfer failed.
    TransferFailed,
    /// No code could be found at the supplied code hash.
    CodeNotFound,
    /// The called account is not a contract.
    NotCallable,
    /// A dispatched runtime call returned an error.
    CallRuntimeFailed,
    /// ECDSA public key recovery failed.
    EcdsaRecoverFailed,
    /// A code outside the known set.
    Unknown(u32),
}

impl ReturnCode {
    /// The numeric value of this code.
    pub fn code(&self) -> u32 {
        match self {
            ReturnCode::Success => 0,
            ReturnCode::CalleeTrapped => 1,
            ReturnCode::CalleeReverted => 2,
            ReturnCode::KeyNotFound => 3,
            ReturnCode::TransferFailed => 5,
            ReturnCode::CodeNotFound => 7,
            ReturnCode::NotCallable => 8,
            ReturnCode::CallRuntimeFailed => 10,
            ReturnCode::EcdsaRecoverFailed => 11,
            ReturnCode::Unknown(code) => *code,
        }
    }

    /// Check if this code reports success.
    pub fn is_success(&self) -> bool {
        *self == ReturnCode::Success
    }

    /// Check if the code is outside the known set.
    pub fn is_unknown(&self) -> bool {
        matches!(self, ReturnCode::Unknown(_))
    }
}

impl From<u32> for ReturnCode {
    fn from(code: u32) -> Self {
        match code {
            0 => ReturnCode::Success,
            1 => ReturnCode::CalleeTrapped,
            2 => ReturnCode::CalleeReverted,
            3 => ReturnCode::KeyNotFound,
            5 => ReturnCode::TransferFailed,
            7 => ReturnCode::CodeNotFound,
            8 => ReturnCode::NotCallable,
            10 => ReturnCode::CallRuntimeFailed,
            11 => ReturnCode::EcdsaRecoverFailed,
            other => ReturnCode::Unknown(other),
        }
    }
}

impl From<ReturnCode> for u32 {
    fn from(code: ReturnCode) -> Self {
        code.code()
    }
}

impl fmt::Display for ReturnCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReturnCode::Unknown(code) => write!(f, "unknown return code {}", code),
            known => write!(f, "{:?} ({})", known, known.code()),
        }
    }
}
