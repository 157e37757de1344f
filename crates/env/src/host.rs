//! The raw host interface.
//!
//! Mirrors the primitives an execution engine exposes to a contract. Every
//! call reports a numeric return code (`0` is success); [`Env`](crate::Env)
//! turns those into typed results.

use tessera_core::KeyBytes;

/// Environment properties a contract can query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    Caller,
    Address,
    Balance,
    ValueTransferred,
    Now,
    BlockNumber,
    MinimumBalance,
    GasLeft,
}

/// Storage and environment primitives provided by the execution engine.
pub trait Host {
    /// Read the value stored at `key` into `output`.
    ///
    /// Returns `3` (`KeyNotFound`) if nothing is stored there.
    fn get_storage(&mut self, key: &KeyBytes, output: &mut Vec<u8>) -> u32;

    /// Store `value` at `key`.
    fn set_storage(&mut self, key: &KeyBytes, value: &[u8]) -> u32;

    /// Remove whatever is stored at `key`.
    fn clear_storage(&mut self, key: &KeyBytes) -> u32;

    /// Write the encoded property into `output`.
    fn property(&mut self, property: Property, output: &mut Vec<u8>) -> u32;

    /// Deposit an event with encoded topics and data.
    fn deposit_event(&mut self, topics: &[u8], data: &[u8]) -> u32;
}

impl<H: Host + ?Sized> Host for &mut H {
    fn get_storage(&mut self, key: &KeyBytes, output: &mut Vec<u8>) -> u32 {
        (**self).get_storage(key, output)
    }

    fn set_storage(&mut self, key: &KeyBytes, value: &[u8]) -> u32 {
        (**self).set_storage(key, value)
    }

    fn clear_storage(&mut self, key: &KeyBytes) -> u32 {
        (**self).clear_storage(key)
    }

    fn property(&mut self, property: Property, output: &mut Vec<u8>) -> u32 {
        (**self).property(property, output)
    }

    fn deposit_event(&mut self, topics: &[u8], data: &[u8]) -> u32 {
        (**self).deposit_event(topics, data)
    }
}
