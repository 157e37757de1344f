//! Persistent host over an embedded sled database.
//!
//! Contract storage is kept under `storage:` + contract address + `:` + key
//! bytes, so several contracts can share one database without seeing each
//! other's cells. Values written through one [`SledHost`] are visible to any
//! later host opened on the same database.

use crate::context::CallContext;
use crate::error::Result;
use crate::event::EmittedEvent;
use crate::host::{Host, Property};
use sled::Db;
use std::path::Path;
use tessera_core::{Address, KeyBytes, ReturnCode};
use tracing::error;

/// A host backed by a sled database.
pub struct SledHost {
    db: Db,
    context: CallContext,
    events: Vec<EmittedEvent>,
}

impl SledHost {
    /// Open a database at the given path for calls into `contract`.
    pub fn open<P: AsRef<Path>>(path: P, contract: Address) -> Result<Self> {
        let db = sled::open(path)?;
        Ok(Self::from_db(db, contract))
    }

    /// Open an in-memory database (for testing).
    pub fn open_temporary(contract: Address) -> Result<Self> {
        let db = sled::Config::new().temporary(true).open()?;
        Ok(Self::from_db(db, contract))
    }

    fn from_db(db: Db, contract: Address) -> Self {
        Self {
            db,
            context: CallContext::new(Address::ZERO, contract),
            events: Vec::new(),
        }
    }

    /// A host for another contract sharing the same database.
    pub fn for_contract(&self, contract: Address) -> Self {
        Self::from_db(self.db.clone(), contract)
    }

    /// The contract whose storage this host serves.
    pub fn contract(&self) -> Address {
        self.context.address
    }

    /// Get the call context.
    pub fn context(&self) -> &CallContext {
        &self.context
    }

    /// Get the call context mutably.
    ///
    /// The contract address is part of the context; changing it switches
    /// which storage namespace the host serves.
    pub fn context_mut(&mut self) -> &mut CallContext {
        &mut self.context
    }

    /// Events deposited so far.
    pub fn events(&self) -> &[EmittedEvent] {
        &self.events
    }

    /// Flush all pending writes to disk.
    pub fn flush(&self) -> Result<()> {
        self.db.flush()?;
        Ok(())
    }

    /// Number of cells stored for this contract.
    pub fn cell_count(&self) -> usize {
        self.db.scan_prefix(self.prefix()).count()
    }

    fn prefix(&self) -> Vec<u8> {
        let mut prefix = b"storage:".to_vec();
        prefix.extend_from_slice(self.context.address.as_bytes());
        prefix.push(b':');
        prefix
    }

    /// Create a prefixed key for contract storage.
    /// Format: "storage:" + contract_address + ":" + key
    fn storage_key(&self, key: &KeyBytes) -> Vec<u8> {
        let mut db_key = self.prefix();
        db_key.extend_from_slice(key);
        db_key
    }
}

impl Host for SledHost {
    fn get_storage(&mut self, key: &KeyBytes, output: &mut Vec<u8>) -> u32 {
        match self.db.get(self.storage_key(key)) {
            Ok(Some(value)) => {
                output.extend_from_slice(&value);
                ReturnCode::Success.code()
            }
            Ok(None) => ReturnCode::KeyNotFound.code(),
            Err(err) => {
                error!(%err, "sled read failed");
                ReturnCode::CalleeTrapped.code()
            }
        }
    }

    fn set_storage(&mut self, key: &KeyBytes, value: &[u8]) -> u32 {
        match self.db.insert(self.storage_key(key), value) {
            Ok(_) => ReturnCode::Success.code(),
            Err(err) => {
                error!(%err, "sled write failed");
                ReturnCode::CalleeTrapped.code()
            }
        }
    }

    fn clear_storage(&mut self, key: &KeyBytes) -> u32 {
        match self.db.remove(self.storage_key(key)) {
            Ok(_) => ReturnCode::Success.code(),
            Err(err) => {
                error!(%err, "sled remove failed");
                ReturnCode::CalleeTrapped.code()
            }
        }
    }

    fn property(&mut self, property: Property, output: &mut Vec<u8>) -> u32 {
        match self.context.encode_property(property) {
            Ok(bytes) => {
                output.extend_from_slice(&bytes);
                ReturnCode::Success.code()
            }
            Err(_) => ReturnCode::CalleeTrapped.code(),
        }
    }

    fn deposit_event(&mut self, topics: &[u8], data: &[u8]) -> u32 {
        self.events.push(EmittedEvent {
            topics: topics.to_vec(),
            data: data.to_vec(),
        });
        ReturnCode::Success.code()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::Env;
    use tessera_core::Key;

    #[test]
    fn test_open_temporary() {
        let host = SledHost::open_temporary(Address([0xAA; 32])).unwrap();
        assert_eq!(host.contract(), Address([0xAA; 32]));
        assert_eq!(host.cell_count(), 0);
    }

    #[test]
    fn test_storage_roundtrip() {
        let host = SledHost::open_temporary(Address([0xAA; 32])).unwrap();
        let mut env = Env::new(host);
        let key = Key::from_u64(1);

        env.set_contract_storage(&key, &"value").unwrap();
        let value: String = env.get_contract_storage(&key).unwrap();
        assert_eq!(value, "value");

        env.clear_contract_storage(&key).unwrap();
        assert!(!env.contains_contract_storage(&key).unwrap());
    }

    #[test]
    fn test_storage_isolation() {
        let host_a = SledHost::open_temporary(Address([0xAA; 32])).unwrap();
        let host_b = host_a.for_contract(Address([0xBB; 32]));
        let key = Key::zero();

        let mut env_a = Env::new(host_a);
        let mut env_b = Env::new(host_b);
        env_a.set_contract_storage(&key, &1u32).unwrap();
        env_b.set_contract_storage(&key, &2u32).unwrap();

        assert_eq!(env_a.get_contract_storage::<u32>(&key).unwrap(), 1);
        assert_eq!(env_b.get_contract_storage::<u32>(&key).unwrap(), 2);
        assert_eq!(env_a.host().cell_count(), 1);
    }

    #[test]
    fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let contract = Address([0xCC; 32]);
        let key = Key::from_u64(5);

        {
            let mut env = Env::new(SledHost::open(dir.path(), contract).unwrap());
            env.set_contract_storage(&key, &1234u64).unwrap();
            env.host().flush().unwrap();
        }

        let mut env = Env::new(SledHost::open(dir.path(), contract).unwrap());
        assert_eq!(env.get_contract_storage::<u64>(&key).unwrap(), 1234);
    }
}
