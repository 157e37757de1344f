//! A sparse, lazily loaded map from `u32` indices to storage entries.
//!
//! Index `i` lives at `base + (i << 32)`. The upper 32 bits of the 64-bit
//! offset are reserved for the index, so distinct indices never share a key.
//! Sibling values laid out after the base key through a [`KeyPtr`] stay
//! clear of index `1` and above only while fewer than 2^32 keys are reserved
//! between them; that limit is a precondition of every spread layout.

use crate::entry::StorageEntry;
use crate::error::{Result, StorageError};
use crate::layout::{ArrayLayout, Layout, StorageLayout};
use crate::packed::clear_packed_root;
use crate::traits::{PackedLayout, SpreadLayout};
use std::collections::btree_map::{BTreeMap, Entry};
use tessera_core::{Key, KeyPtr};
use tessera_env::{Env, Host};
use tracing::debug;

/// Key distance between consecutive indices.
pub const INDEX_STRIDE: u64 = 1 << 32;

/// Cache of entries addressed by index from a base key.
///
/// Only indices touched in this session are cached; flushing visits those
/// alone, in ascending order.
#[derive(Debug)]
pub struct LazyIndexMap<V> {
    key: Option<Key>,
    entries: BTreeMap<u32, StorageEntry<V>>,
}

impl<V> Default for LazyIndexMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> LazyIndexMap<V> {
    /// A map with no base key yet. Only cache operations are possible until
    /// it is pulled or pushed.
    pub fn new() -> Self {
        Self {
            key: None,
            entries: BTreeMap::new(),
        }
    }

    /// A map rooted at `key`.
    pub fn from_key(key: Key) -> Self {
        Self {
            key: Some(key),
            entries: BTreeMap::new(),
        }
    }

    /// The base key, if bound.
    pub fn key(&self) -> Option<&Key> {
        self.key.as_ref()
    }

    /// The storage key of `index`.
    pub fn key_at(&self, index: u32) -> Option<Key> {
        self.key.map(|base| index_key(&base, index))
    }

    /// Check if `index` has been touched in this session.
    pub fn is_cached(&self, index: u32) -> bool {
        self.entries.contains_key(&index)
    }

    /// Number of cached entries.
    pub fn cached_len(&self) -> usize {
        self.entries.len()
    }

    /// Cache `value` at `index`. Written on the next flush.
    pub fn set(&mut self, index: u32, value: V) {
        match self.entries.entry(index) {
            Entry::Occupied(mut occupied) => occupied.get_mut().set(value),
            Entry::Vacant(vacant) => {
                vacant.insert(StorageEntry::new(value));
            }
        }
    }

    /// Mark `index` as removed without reading it. Cleared on the next flush.
    pub fn delete(&mut self, index: u32) {
        match self.entries.entry(index) {
            Entry::Occupied(mut occupied) => occupied.get_mut().clear(),
            Entry::Vacant(vacant) => {
                vacant.insert(StorageEntry::cleared());
            }
        }
    }

    /// Forget every cached entry without touching the host.
    pub fn clear_cache(&mut self) {
        self.entries.clear();
    }

    fn bind(&mut self, key: Key) {
        self.key = Some(key);
    }
}

impl<V: PackedLayout> LazyIndexMap<V> {
    /// The cached entry at `index`, pulling it from the host on first access.
    pub fn entry_mut<H: Host>(
        &mut self,
        index: u32,
        env: &mut Env<H>,
    ) -> Result<&mut StorageEntry<V>> {
        let base = self.key;
        match self.entries.entry(index) {
            Entry::Occupied(occupied) => Ok(occupied.into_mut()),
            Entry::Vacant(vacant) => {
                let base = base.ok_or(StorageError::Unbound)?;
                let entry = StorageEntry::pull_packed_root(&index_key(&base, index), env)?;
                Ok(vacant.insert(entry))
            }
        }
    }

    /// The value at `index`. Fails with [`StorageError::EmptyEntry`] if absent.
    pub fn get<H: Host>(&mut self, index: u32, env: &mut Env<H>) -> Result<&V> {
        self.entry_mut(index, env)?.get()
    }

    /// The value at `index`, or `None` if absent.
    pub fn try_get<H: Host>(&mut self, index: u32, env: &mut Env<H>) -> Result<Option<&V>> {
        Ok(self.entry_mut(index, env)?.value())
    }

    /// The value at `index` for mutation.
    pub fn get_mut<H: Host>(&mut self, index: u32, env: &mut Env<H>) -> Result<&mut V> {
        self.entry_mut(index, env)?.get_mut()
    }

    /// Check if a value exists at `index`. The answer is cached either way.
    pub fn has<H: Host>(&mut self, index: u32, env: &mut Env<H>) -> Result<bool> {
        Ok(!self.entry_mut(index, env)?.is_cleared())
    }

    /// Remove and return the value at `index`, reading it first if needed.
    pub fn remove<H: Host>(&mut self, index: u32, env: &mut Env<H>) -> Result<Option<V>> {
        Ok(self.entry_mut(index, env)?.take())
    }

    /// Clear `index` on the host directly, bypassing the cache.
    ///
    /// The caller must not read `index` through a stale cached entry
    /// afterwards.
    pub fn clear_at<H: Host>(&self, index: u32, env: &mut Env<H>) -> Result<()> {
        let key = self.key_at(index).ok_or(StorageError::Unbound)?;
        env.clear_contract_storage(&key)?;
        Ok(())
    }

    /// Write every dirty cached entry.
    pub fn flush<H: Host>(&mut self, env: &mut Env<H>) -> Result<()> {
        let base = self.key.ok_or(StorageError::Unbound)?;
        let mut flushed = 0usize;
        for (index, entry) in self.entries.iter_mut() {
            if entry.is_dirty() {
                entry.push_packed_root(&index_key(&base, *index), env)?;
                flushed += 1;
            }
        }
        debug!(%base, cached = self.entries.len(), flushed, "flushed lazy index map");
        Ok(())
    }

    /// Clear every cached index on the host and mark it cleared.
    pub fn clear_cached<H: Host>(&mut self, env: &mut Env<H>) -> Result<()> {
        let base = self.key.ok_or(StorageError::Unbound)?;
        for (index, entry) in self.entries.iter_mut() {
            let key = index_key(&base, *index);
            match entry.value() {
                Some(value) => clear_packed_root(value, &key, env)?,
                None => env.clear_contract_storage(&key)?,
            }
            entry.clear();
        }
        Ok(())
    }
}

fn index_key(base: &Key, index: u32) -> Key {
    base.offset(u64::from(index) << 32)
}

impl<V: PackedLayout> SpreadLayout for LazyIndexMap<V> {
    const FOOTPRINT: u64 = 1;

    fn pull_spread<H: Host>(ptr: &mut KeyPtr, _env: &mut Env<H>) -> Result<Self> {
        Ok(Self::from_key(ptr.advance()))
    }

    fn push_spread<H: Host>(&mut self, ptr: &mut KeyPtr, env: &mut Env<H>) -> Result<()> {
        self.bind(ptr.advance());
        self.flush(env)
    }

    fn clear_spread<H: Host>(&mut self, ptr: &mut KeyPtr, env: &mut Env<H>) -> Result<()> {
        self.bind(ptr.advance());
        self.clear_cached(env)
    }
}

impl<V> StorageLayout for LazyIndexMap<V> {
    fn layout(ptr: &mut KeyPtr) -> Layout {
        let offset = ptr.advance();
        Layout::Array(ArrayLayout {
            offset,
            len: u32::MAX,
            cells_per_elem: INDEX_STRIDE,
            layout: Box::new(Layout::cell::<V>(offset)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_env::MemoryHost;

    fn setup() -> (LazyIndexMap<u32>, Env<MemoryHost>) {
        (LazyIndexMap::from_key(Key::from_u64(1)), Env::new(MemoryHost::new()))
    }

    #[test]
    fn test_key_at() {
        let map = LazyIndexMap::<u8>::from_key(Key::from_u64(1));
        assert_eq!(map.key_at(0), Some(Key::from_u64(1)));
        assert_eq!(map.key_at(1), Some(Key::from_u64(1 + INDEX_STRIDE)));
        assert_eq!(map.key(), Some(&Key::from_u64(1)));
        assert_eq!(LazyIndexMap::<u8>::new().key_at(0), None);
    }

    #[test]
    fn test_max_index_stays_in_second_limb() {
        let map = LazyIndexMap::<u8>::from_key(Key::from_u64(u64::MAX));
        let key = map.key_at(u32::MAX).unwrap();
        let mut expected = Key::from_u64(u64::MAX);
        expected.add(u64::from(u32::MAX) << 32);
        assert_eq!(key, expected);
        assert_ne!(key, map.key_at(0).unwrap());
    }

    #[test]
    fn test_set_is_deferred() {
        let (mut map, mut env) = setup();
        map.set(3, 30);
        assert_eq!(*map.get(3, &mut env).unwrap(), 30);
        assert_eq!(env.host().stats().total(), 0);

        map.flush(&mut env).unwrap();
        assert_eq!(env.host().stats().writes, 1);
        assert!(env.host().raw(&map.key_at(3).unwrap()).is_some());
    }

    #[test]
    fn test_has_caches_absence() {
        let (mut map, mut env) = setup();
        assert!(!map.has(7, &mut env).unwrap());
        assert!(!map.has(7, &mut env).unwrap());
        assert!(matches!(map.get(7, &mut env), Err(StorageError::EmptyEntry)));
        assert_eq!(env.host().stats().reads, 1);
    }

    #[test]
    fn test_remove_reads_and_delete_does_not() {
        let (mut map, mut env) = setup();
        map.set(0, 1);
        map.set(1, 2);
        map.flush(&mut env).unwrap();

        let mut fresh = LazyIndexMap::<u32>::from_key(Key::from_u64(1));
        env.host_mut().reset_stats();
        assert_eq!(fresh.remove(0, &mut env).unwrap(), Some(1));
        fresh.delete(1);
        assert_eq!(env.host().stats().reads, 1);

        fresh.flush(&mut env).unwrap();
        assert!(env.host().is_empty());
    }

    #[test]
    fn test_unbound_access() {
        let mut map = LazyIndexMap::<u32>::new();
        let mut env = Env::new(MemoryHost::new());
        map.set(0, 1);

        assert_eq!(*map.get(0, &mut env).unwrap(), 1);
        assert!(matches!(map.get(1, &mut env), Err(StorageError::Unbound)));
        assert!(matches!(map.flush(&mut env), Err(StorageError::Unbound)));
    }

    #[test]
    fn test_clear_at_bypasses_cache() {
        let (mut map, mut env) = setup();
        map.set(2, 9);
        map.flush(&mut env).unwrap();

        map.clear_at(2, &mut env).unwrap();
        assert!(env.host().is_empty());
        assert!(map.is_cached(2));
    }

    #[test]
    fn test_spread_binds_base_key() {
        let mut env = Env::new(MemoryHost::new());
        let mut map = LazyIndexMap::new();
        map.set(1, String::from("one"));

        let mut ptr = KeyPtr::new(Key::from_u64(10));
        map.push_spread(&mut ptr, &mut env).unwrap();
        assert_eq!(map.key(), Some(&Key::from_u64(11)));

        let mut ptr = KeyPtr::new(Key::from_u64(10));
        let mut pulled = LazyIndexMap::<String>::pull_spread(&mut ptr, &mut env).unwrap();
        assert_eq!(pulled.get(1, &mut env).unwrap(), "one");

        let mut ptr = KeyPtr::new(Key::from_u64(10));
        pulled.clear_spread(&mut ptr, &mut env).unwrap();
        assert!(env.host().is_empty());
        assert_eq!(ptr.current(), Key::from_u64(11));
    }
}
