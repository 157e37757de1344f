//! Typed wrapper over the raw host interface.

use crate::codec::{decode, encode};
use crate::config::EnvConfig;
use crate::error::{EnvError, Result};
use crate::event::Event;
use crate::host::{Host, Property};
use serde::{de::DeserializeOwned, Serialize};
use tessera_core::{CryptoHasher, Key, ReturnCode, H256};
use tracing::{trace, warn};

/// A storage read that reports the host return code instead of failing.
///
/// When `code` is not [`ReturnCode::Success`], `value` is a default
/// placeholder and carries no meaning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageResult<T> {
    pub code: ReturnCode,
    pub value: T,
}

impl<T> StorageResult<T> {
    /// Check if the read found a value.
    pub fn is_success(&self) -> bool {
        self.code.is_success()
    }

    /// The value, if the read found one.
    pub fn into_option(self) -> Option<T> {
        if self.code.is_success() {
            Some(self.value)
        } else {
            None
        }
    }
}

/// The execution environment of a contract call.
///
/// Owns the host and is passed explicitly to every storage operation.
pub struct Env<H> {
    host: H,
    config: EnvConfig,
    buffer: Vec<u8>,
}

impl<H: Host> Env<H> {
    /// Create an environment over `host` with the default configuration.
    pub fn new(host: H) -> Self {
        Self::with_config(host, EnvConfig::default())
    }

    /// Create an environment over `host` with the given configuration.
    pub fn with_config(host: H, config: EnvConfig) -> Self {
        Self {
            host,
            config,
            buffer: Vec::new(),
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &EnvConfig {
        &self.config
    }

    /// Get the underlying host.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Get the underlying host mutably.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Consume the environment and return the host.
    pub fn into_host(self) -> H {
        self.host
    }

    // =========================================================================
    // Contract Storage
    // =========================================================================

    /// Read the raw value at `key` into the internal buffer.
    fn read_storage(&mut self, key: &Key) -> Result<ReturnCode> {
        self.buffer.clear();
        let raw = self.host.get_storage(&key.to_bytes(), &mut self.buffer);
        let code = ReturnCode::from(raw);
        trace!(%key, %code, len = self.buffer.len(), "storage get");

        if code.is_unknown() {
            warn!(%key, code = raw, "host returned an unknown code");
        }
        if code.is_success() && self.buffer.len() > self.config.max_value_size {
            return Err(EnvError::ValueTooLarge {
                size: self.buffer.len(),
                limit: self.config.max_value_size,
            });
        }
        Ok(code)
    }

    /// Read and decode the value at `key`.
    ///
    /// A missing key, or any other failure code, is an error.
    pub fn get_contract_storage<V: DeserializeOwned>(&mut self, key: &Key) -> Result<V> {
        match self.read_storage(key)? {
            ReturnCode::Success => decode(&self.buffer),
            code => Err(EnvError::Host(code)),
        }
    }

    /// Read and decode the value at `key`, mapping a missing key to `None`.
    pub fn get_contract_storage_opt<V>(&mut self, key: &Key) -> Result<Option<V>>
    where
        V: DeserializeOwned,
    {
        match self.read_storage(key)? {
            ReturnCode::Success => decode(&self.buffer).map(Some),
            ReturnCode::KeyNotFound => Ok(None),
            code => Err(EnvError::Host(code)),
        }
    }

    /// Read and decode the value at `key`, reporting the host code.
    ///
    /// Only decoding problems are errors; a missing key yields a
    /// [`StorageResult`] with a default value.
    pub fn get_contract_storage_result<V>(&mut self, key: &Key) -> Result<StorageResult<V>>
    where
        V: DeserializeOwned + Default,
    {
        let code = self.read_storage(key)?;
        let value = if code.is_success() {
            decode(&self.buffer)?
        } else {
            V::default()
        };
        Ok(StorageResult { code, value })
    }

    /// Check if anything is stored at `key`, without decoding it.
    pub fn contains_contract_storage(&mut self, key: &Key) -> Result<bool> {
        match self.read_storage(key)? {
            ReturnCode::Success => Ok(true),
            ReturnCode::KeyNotFound => Ok(false),
            code => Err(EnvError::Host(code)),
        }
    }

    /// Encode `value` and store it at `key`.
    pub fn set_contract_storage<V>(&mut self, key: &Key, value: &V) -> Result<()>
    where
        V: Serialize + ?Sized,
    {
        let bytes = encode(value)?;
        if bytes.len() > self.config.max_value_size {
            return Err(EnvError::ValueTooLarge {
                size: bytes.len(),
                limit: self.config.max_value_size,
            });
        }
        trace!(%key, len = bytes.len(), "storage set");
        let raw = self.host.set_storage(&key.to_bytes(), &bytes);
        check(raw)
    }

    /// Remove the value at `key`.
    pub fn clear_contract_storage(&mut self, key: &Key) -> Result<()> {
        trace!(%key, "storage clear");
        let raw = self.host.clear_storage(&key.to_bytes());
        check(raw)
    }

    // =========================================================================
    // Environment Properties
    // =========================================================================

    fn get_property<T: DeserializeOwned>(&mut self, property: Property) -> Result<T> {
        self.buffer.clear();
        let raw = self.host.property(property, &mut self.buffer);
        check(raw)?;
        decode(&self.buffer)
    }

    /// Account that made the call.
    pub fn caller<T: DeserializeOwned>(&mut self) -> Result<T> {
        self.get_property(Property::Caller)
    }

    /// Address of the executing contract.
    pub fn address<T: DeserializeOwned>(&mut self) -> Result<T> {
        self.get_property(Property::Address)
    }

    /// Balance of the executing contract.
    pub fn balance<T: DeserializeOwned>(&mut self) -> Result<T> {
        self.get_property(Property::Balance)
    }

    /// Value sent along with the call.
    pub fn transferred_balance<T: DeserializeOwned>(&mut self) -> Result<T> {
        self.get_property(Property::ValueTransferred)
    }

    /// Timestamp of the current block.
    pub fn block_timestamp<T: DeserializeOwned>(&mut self) -> Result<T> {
        self.get_property(Property::Now)
    }

    /// Number of the current block.
    pub fn block_number<T: DeserializeOwned>(&mut self) -> Result<T> {
        self.get_property(Property::BlockNumber)
    }

    /// Existential deposit.
    pub fn minimum_balance<T: DeserializeOwned>(&mut self) -> Result<T> {
        self.get_property(Property::MinimumBalance)
    }

    /// Gas remaining for the call.
    pub fn gas_left(&mut self) -> Result<u64> {
        self.get_property(Property::GasLeft)
    }

    /// Fail unless the call carried no value.
    pub fn deny_payment(&mut self) -> Result<()> {
        let transferred: u128 = self.transferred_balance()?;
        if transferred != 0 {
            return Err(EnvError::PaymentNotAllowed(transferred));
        }
        Ok(())
    }

    // =========================================================================
    // Events and Hashing
    // =========================================================================

    /// Deposit an event with the host.
    pub fn emit_event<E: Event>(&mut self, event: &E) -> Result<()> {
        let topics = encode(&event.topics())?;
        let data = encode(&(event.event_id(), event))?;
        trace!(id = event.event_id(), len = data.len(), "deposit event");
        let raw = self.host.deposit_event(&topics, &data);
        check(raw)
    }

    /// Hash `input` with the given hasher.
    pub fn hash_bytes<Hs: CryptoHasher>(&self, input: &[u8]) -> H256 {
        Hs::hash(input)
    }
}

/// Turn a raw return code into a result.
fn check(raw: u32) -> Result<()> {
    match ReturnCode::from(raw) {
        ReturnCode::Success => Ok(()),
        code => {
            if code.is_unknown() {
                warn!(code = raw, "host returned an unknown code");
            }
            Err(EnvError::Host(code))
        }
    }
}
