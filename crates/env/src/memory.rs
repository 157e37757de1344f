//! In-memory host, used for tests and local execution.

use crate::context::CallContext;
use crate::event::EmittedEvent;
use crate::host::{Host, Property};
use std::collections::BTreeMap;
use tessera_core::{Key, KeyBytes, ReturnCode};

/// Counts of storage round trips made against a host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HostStats {
    pub reads: usize,
    pub writes: usize,
    pub clears: usize,
}

impl HostStats {
    /// Total number of storage calls.
    pub fn total(&self) -> usize {
        self.reads + self.writes + self.clears
    }
}

/// A host that keeps contract storage in a `BTreeMap`.
#[derive(Debug, Clone, Default)]
pub struct MemoryHost {
    storage: BTreeMap<KeyBytes, Vec<u8>>,
    failures: BTreeMap<KeyBytes, u32>,
    context: CallContext,
    events: Vec<EmittedEvent>,
    stats: HostStats,
}

impl MemoryHost {
    /// Create an empty host with a default call context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty host serving the given call context.
    pub fn with_context(context: CallContext) -> Self {
        Self {
            context,
            ..Self::default()
        }
    }

    /// Get the call context.
    pub fn context(&self) -> &CallContext {
        &self.context
    }

    /// Get the call context mutably.
    pub fn context_mut(&mut self) -> &mut CallContext {
        &mut self.context
    }

    /// Events deposited so far.
    pub fn events(&self) -> &[EmittedEvent] {
        &self.events
    }

    /// Storage round trips made so far.
    pub fn stats(&self) -> HostStats {
        self.stats
    }

    /// Reset the round trip counters.
    pub fn reset_stats(&mut self) {
        self.stats = HostStats::default();
    }

    /// Number of occupied storage cells.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// Check if no storage cell is occupied.
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Raw bytes at `key`, bypassing the counters.
    pub fn raw(&self, key: &Key) -> Option<&[u8]> {
        self.storage.get(&key.to_bytes()).map(Vec::as_slice)
    }

    /// Keys of every occupied storage cell.
    pub fn keys(&self) -> Vec<Key> {
        self.storage.keys().map(|bytes| Key::from_bytes(*bytes)).collect()
    }

    /// Make every read of `key` fail with `code`.
    pub fn inject_failure(&mut self, key: &Key, code: u32) {
        self.failures.insert(key.to_bytes(), code);
    }
}

impl Host for MemoryHost {
    fn get_storage(&mut self, key: &KeyBytes, output: &mut Vec<u8>) -> u32 {
        self.stats.reads += 1;
        if let Some(code) = self.failures.get(key) {
            return *code;
        }
        match self.storage.get(key) {
            Some(value) => {
                output.extend_from_slice(value);
                ReturnCode::Success.code()
            }
            None => ReturnCode::KeyNotFound.code(),
        }
    }

    fn set_storage(&mut self, key: &KeyBytes, value: &[u8]) -> u32 {
        self.stats.writes += 1;
        self.storage.insert(*key, value.to_vec());
        ReturnCode::Success.code()
    }

    fn clear_storage(&mut self, key: &KeyBytes) -> u32 {
        self.stats.clears += 1;
        self.storage.remove(key);
        ReturnCode::Success.code()
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

    #[test]
    fn test_get_missing_key() {
        let mut host = MemoryHost::new();
        let mut output = Vec::new();
        let code = host.get_storage(&[0u8; 32], &mut output);

        assert_eq!(ReturnCode::from(code), ReturnCode::KeyNotFound);
        assert!(output.is_empty());
        assert_eq!(host.stats().reads, 1);
    }

    #[test]
    fn test_set_get_clear_counts() {
        let mut host = MemoryHost::new();
        let key = [1u8; 32];

        host.set_storage(&key, b"value");
        let mut output = Vec::new();
        assert_eq!(host.get_storage(&key, &mut output), 0);
        assert_eq!(output, b"value");

        host.clear_storage(&key);
        assert!(host.is_empty());
        assert_eq!(
            host.stats(),
            HostStats {
                reads: 1,
                writes: 1,
                clears: 1
            }
        );
        assert_eq!(host.stats().total(), 3);

        host.reset_stats();
        assert_eq!(host.stats().total(), 0);
    }

    #[test]
    fn test_injected_failure() {
        let mut host = MemoryHost::new();
        let key = Key::from_u64(4);
        host.set_storage(&key.to_bytes(), b"value");
        host.inject_failure(&key, 1);

        let mut output = Vec::new();
        assert_eq!(host.get_storage(&key.to_bytes(), &mut output), 1);
        assert!(output.is_empty());
    }
}
